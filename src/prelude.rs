pub use crate::context::Context;
pub use crate::errors::{Error, Result};
pub use crate::settings::Settings;

pub use crate::driver::capabilities::{Capabilities, Capability, Profile, Version};
pub use crate::driver::headless::{Call, HeadlessDriver, Journal};
pub use crate::driver::{Driver, ImageDesc};

pub use crate::enums::*;

pub use crate::handle::Handle;
pub use crate::resource::BoundResource;

pub use crate::buffer::{
    ArrayBuffer, Buffer, BufferKind, BufferMap, CopyReadBuffer, CopyWriteBuffer, IndexBuffer,
    IndexedBufferKind, PixelPackBuffer, PixelUnpackBuffer, TextureBuffer,
    TransformFeedbackBuffer, UniformBuffer,
};

pub use crate::texture::{
    PixelLayout, SingleImage, Texture, Texture1D, Texture1DArray, Texture2D, Texture2DArray,
    Texture3D, TextureCubeMap, TextureKind, TextureRectangle,
};

pub use crate::feedback::{SessionState, TransformFeedback};

pub use cgmath::Vector3;
