//! Type-safe replacements for the raw `GLenum` constants used by the wrappers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The family of a server-side object. Objects of one kind share one namespace of ids.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Buffer,
    Texture,
    TransformFeedback,
    VertexArray,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            ObjectKind::Buffer => "Buffer",
            ObjectKind::Texture => "Texture",
            ObjectKind::TransformFeedback => "TransformFeedback",
            ObjectKind::VertexArray => "VertexArray",
        };

        write!(f, "{}", name)
    }
}

/// A binding point that holds at most one object at a time.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    /// Source of vertex attributes.
    ArrayBuffer,
    /// Source of indices for indexed draws.
    ElementArrayBuffer,
    /// Storage of buffer textures.
    TextureBuffer,
    CopyReadBuffer,
    CopyWriteBuffer,
    /// Destination of pixel read-backs.
    PixelPackBuffer,
    /// Source of pixel uploads.
    PixelUnpackBuffer,
    /// Generic binding point of uniform block storage.
    UniformBuffer,
    /// Generic binding point of transform feedback outputs.
    TransformFeedbackBuffer,
    Texture1D,
    Texture2D,
    Texture3D,
    Texture1DArray,
    Texture2DArray,
    TextureRectangle,
    TextureCubeMap,
    TransformFeedback,
    VertexArray,
}

impl Target {
    pub const ALL: [Target; 18] = [
        Target::ArrayBuffer,
        Target::ElementArrayBuffer,
        Target::TextureBuffer,
        Target::CopyReadBuffer,
        Target::CopyWriteBuffer,
        Target::PixelPackBuffer,
        Target::PixelUnpackBuffer,
        Target::UniformBuffer,
        Target::TransformFeedbackBuffer,
        Target::Texture1D,
        Target::Texture2D,
        Target::Texture3D,
        Target::Texture1DArray,
        Target::Texture2DArray,
        Target::TextureRectangle,
        Target::TextureCubeMap,
        Target::TransformFeedback,
        Target::VertexArray,
    ];

    /// The kind of objects this target accepts.
    pub fn kind(self) -> ObjectKind {
        match self {
            Target::ArrayBuffer
            | Target::ElementArrayBuffer
            | Target::TextureBuffer
            | Target::CopyReadBuffer
            | Target::CopyWriteBuffer
            | Target::PixelPackBuffer
            | Target::PixelUnpackBuffer
            | Target::UniformBuffer
            | Target::TransformFeedbackBuffer => ObjectKind::Buffer,
            Target::Texture1D
            | Target::Texture2D
            | Target::Texture3D
            | Target::Texture1DArray
            | Target::Texture2DArray
            | Target::TextureRectangle
            | Target::TextureCubeMap => ObjectKind::Texture,
            Target::TransformFeedback => ObjectKind::TransformFeedback,
            Target::VertexArray => ObjectKind::VertexArray,
        }
    }

    /// Returns the name of the matching GL constant.
    pub fn name(self) -> &'static str {
        match self {
            Target::ArrayBuffer => "GL_ARRAY_BUFFER",
            Target::ElementArrayBuffer => "GL_ELEMENT_ARRAY_BUFFER",
            Target::TextureBuffer => "GL_TEXTURE_BUFFER",
            Target::CopyReadBuffer => "GL_COPY_READ_BUFFER",
            Target::CopyWriteBuffer => "GL_COPY_WRITE_BUFFER",
            Target::PixelPackBuffer => "GL_PIXEL_PACK_BUFFER",
            Target::PixelUnpackBuffer => "GL_PIXEL_UNPACK_BUFFER",
            Target::UniformBuffer => "GL_UNIFORM_BUFFER",
            Target::TransformFeedbackBuffer => "GL_TRANSFORM_FEEDBACK_BUFFER",
            Target::Texture1D => "GL_TEXTURE_1D",
            Target::Texture2D => "GL_TEXTURE_2D",
            Target::Texture3D => "GL_TEXTURE_3D",
            Target::Texture1DArray => "GL_TEXTURE_1D_ARRAY",
            Target::Texture2DArray => "GL_TEXTURE_2D_ARRAY",
            Target::TextureRectangle => "GL_TEXTURE_RECTANGLE",
            Target::TextureCubeMap => "GL_TEXTURE_CUBE_MAP",
            Target::TransformFeedback => "GL_TRANSFORM_FEEDBACK",
            Target::VertexArray => "GL_VERTEX_ARRAY",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A buffer target that owns an array of binding points in addition to its
/// generic one.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexedTarget {
    UniformBuffer,
    TransformFeedbackBuffer,
}

impl IndexedTarget {
    /// The generic binding point that indexed binds also update.
    pub fn target(self) -> Target {
        match self {
            IndexedTarget::UniformBuffer => Target::UniformBuffer,
            IndexedTarget::TransformFeedbackBuffer => Target::TransformFeedbackBuffer,
        }
    }
}

impl fmt::Display for IndexedTarget {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.target().name())
    }
}

/// Hint about the expected usage pattern of a buffer data store.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BufferUsage {
    StreamDraw,
    StreamRead,
    StreamCopy,
    StaticDraw,
    StaticRead,
    StaticCopy,
    DynamicDraw,
    DynamicRead,
    DynamicCopy,
}

impl Default for BufferUsage {
    fn default() -> Self {
        BufferUsage::StaticDraw
    }
}

/// Access policy of a whole-buffer mapping.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MapAccess {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl MapAccess {
    pub fn readable(self) -> bool {
        self != MapAccess::WriteOnly
    }

    pub fn writable(self) -> bool {
        self != MapAccess::ReadOnly
    }
}

impl Default for MapAccess {
    fn default() -> Self {
        MapAccess::ReadWrite
    }
}

bitflags! {
    /// Access flags of a ranged mapping.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MapAccessFlags: u32 {
        const READ              = 0x0001;
        const WRITE             = 0x0002;
        const INVALIDATE_RANGE  = 0x0004;
        const INVALIDATE_BUFFER = 0x0008;
        const FLUSH_EXPLICIT    = 0x0010;
        const UNSYNCHRONIZED    = 0x0020;
    }
}

impl Default for MapAccessFlags {
    fn default() -> Self {
        MapAccessFlags::READ | MapAccessFlags::WRITE
    }
}

/// Component type of client-side pixel or vertex data.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Byte,
    UnsignedByte,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    Fixed,
    HalfFloat,
    Float,
    Double,
}

impl DataType {
    /// Size of one component in bytes.
    pub fn size(self) -> usize {
        match self {
            DataType::Byte | DataType::UnsignedByte => 1,
            DataType::Short | DataType::UnsignedShort | DataType::HalfFloat => 2,
            DataType::Int | DataType::UnsignedInt | DataType::Fixed | DataType::Float => 4,
            DataType::Double => 8,
        }
    }
}

/// Type of the indices stored in an index buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexType {
    UnsignedByte,
    UnsignedShort,
    UnsignedInt,
}

impl IndexType {
    pub fn size(self) -> usize {
        DataType::from(self).size()
    }
}

impl From<IndexType> for DataType {
    fn from(ty: IndexType) -> Self {
        match ty {
            IndexType::UnsignedByte => DataType::UnsignedByte,
            IndexType::UnsignedShort => DataType::UnsignedShort,
            IndexType::UnsignedInt => DataType::UnsignedInt,
        }
    }
}

/// Layout of client-side pixel data.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelFormat {
    Red,
    Rg,
    Rgb,
    Bgr,
    Rgba,
    Bgra,
    Depth,
    DepthStencil,
}

impl PixelFormat {
    /// Number of components of one pixel.
    pub fn components(self) -> usize {
        match self {
            PixelFormat::Red | PixelFormat::Depth => 1,
            PixelFormat::Rg | PixelFormat::DepthStencil => 2,
            PixelFormat::Rgb | PixelFormat::Bgr => 3,
            PixelFormat::Rgba | PixelFormat::Bgra => 4,
        }
    }
}

/// Storage format of texture images on the server.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InternalFormat {
    R8,
    Rg8,
    Rgb8,
    Rgba8,
    Srgb8,
    Srgb8Alpha8,
    R16F,
    Rg16F,
    Rgb16F,
    Rgba16F,
    R32F,
    Rg32F,
    Rgb32F,
    Rgba32F,
    Depth16,
    Depth24,
    Depth32F,
    Depth24Stencil8,
}

/// One of the six images of a cube map.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CubeFace {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PositiveX,
        CubeFace::NegativeX,
        CubeFace::PositiveY,
        CubeFace::NegativeY,
        CubeFace::PositiveZ,
        CubeFace::NegativeZ,
    ];
}

/// Specify how the texture is sampled.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureFilter {
    Nearest,
    Linear,
    NearestMipmapNearest,
    LinearMipmapNearest,
    NearestMipmapLinear,
    LinearMipmapLinear,
}

impl TextureFilter {
    /// Whether this filter reads from more than the base level.
    pub fn uses_mipmaps(self) -> bool {
        match self {
            TextureFilter::Nearest | TextureFilter::Linear => false,
            _ => true,
        }
    }
}

/// Sets the wrap parameter for texture coordinates.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureWrap {
    /// Samples at coord x + 1 map to coord x.
    Repeat,
    /// Samples at coord x + 1 map to coord 1 - x.
    Mirror,
    /// Samples at coord x + 1 map to coord 1.
    Clamp,
    /// Samples outside the texture return the border color.
    ClampToBorder,
}

/// A single texture parameter assignment.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureParameter {
    MinFilter(TextureFilter),
    MagFilter(TextureFilter),
    WrapS(TextureWrap),
    WrapT(TextureWrap),
    WrapR(TextureWrap),
    BaseLevel(u32),
    MaxLevel(u32),
}

/// Primitive type captured by a transform feedback session.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedbackPrimitive {
    Points,
    Lines,
    Triangles,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn targets() {
        for &v in Target::ALL.iter() {
            assert!(v.name().starts_with("GL_"));
        }

        assert_eq!(Target::UniformBuffer.kind(), ObjectKind::Buffer);
        assert_eq!(Target::TextureCubeMap.kind(), ObjectKind::Texture);
        assert_eq!(
            IndexedTarget::TransformFeedbackBuffer.target(),
            Target::TransformFeedbackBuffer
        );
    }

    #[test]
    fn sizes() {
        assert_eq!(IndexType::UnsignedShort.size(), 2);
        assert_eq!(DataType::Double.size(), 8);
        assert_eq!(PixelFormat::Bgra.components(), 4);
        assert!(TextureFilter::LinearMipmapLinear.uses_mipmaps());
        assert!(!TextureFilter::Linear.uses_mipmaps());
    }

    #[test]
    fn map_access() {
        assert!(MapAccess::ReadOnly.readable());
        assert!(!MapAccess::ReadOnly.writable());
        assert!(MapAccessFlags::default().contains(MapAccessFlags::WRITE));
    }
}
