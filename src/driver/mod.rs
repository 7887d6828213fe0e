//! The driver is responsible for only one thing: forwarding calls to the low-level
//! graphics API. It knows nothing about handles, reference counts or validation.

pub mod capabilities;
pub mod headless;

#[cfg(not(target_arch = "wasm32"))]
pub mod gl;

use cgmath::Vector3;

use crate::enums::*;
use crate::errors::*;

use self::capabilities::Capabilities;

/// Description of one texture image passed to `tex_image` and `tex_sub_image`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ImageDesc {
    /// Storage format on the server, ignored by sub-image updates.
    pub internal_format: InternalFormat,
    /// Layout of the client-side pixels.
    pub format: PixelFormat,
    /// Component type of the client-side pixels.
    pub data_type: DataType,
    /// Width, height and depth. Unused dimensions are 1.
    pub extent: Vector3<u32>,
}

impl ImageDesc {
    /// Number of bytes of a tightly packed image with this description, `None` if
    /// it does not fit in `usize`.
    pub fn len(&self) -> Option<usize> {
        self.texels()?.checked_mul(self.texel_size())
    }

    pub fn is_empty(&self) -> bool {
        self.texels() == Some(0)
    }

    #[inline]
    pub fn texel_size(&self) -> usize {
        self.format.components() * self.data_type.size()
    }

    #[inline]
    pub fn texels(&self) -> Option<usize> {
        (self.extent.x as usize)
            .checked_mul(self.extent.y as usize)?
            .checked_mul(self.extent.z as usize)
    }
}

/// The set of driver entry points the wrappers forward to.
///
/// Every call acts on the driver's current context. Implementations report failures
/// as `Error::Driver` and never retry.
pub trait Driver {
    /// The capability table, populated once when the driver is created.
    fn capabilities(&self) -> &Capabilities;

    /// Allocates a new object and returns its non-zero id.
    unsafe fn create_object(&mut self, kind: ObjectKind) -> Result<u32>;

    unsafe fn delete_object(&mut self, kind: ObjectKind, id: u32) -> Result<()>;

    /// Makes `id` the current object of `target`, 0 clears the binding.
    unsafe fn bind(&mut self, target: Target, id: u32) -> Result<()>;

    /// Binds `id` to the indexed binding point and to the generic point of `target`.
    unsafe fn bind_indexed(&mut self, target: IndexedTarget, index: u32, id: u32) -> Result<()>;

    unsafe fn bind_indexed_range(
        &mut self,
        target: IndexedTarget,
        index: u32,
        id: u32,
        offset: usize,
        size: usize,
    ) -> Result<()>;

    /// Reads back the object currently bound to `target`.
    unsafe fn binding(&mut self, target: Target) -> Result<u32>;

    unsafe fn indexed_binding(&mut self, target: IndexedTarget, index: u32) -> Result<u32>;

    /// (Re)creates the data store of the buffer bound to `target`. If `bytes` is
    /// `None` the store is `size` bytes of undefined content.
    unsafe fn buffer_data(
        &mut self,
        target: Target,
        size: usize,
        bytes: Option<&[u8]>,
        usage: BufferUsage,
    ) -> Result<()>;

    unsafe fn buffer_sub_data(&mut self, target: Target, offset: usize, bytes: &[u8])
        -> Result<()>;

    unsafe fn buffer_size(&mut self, target: Target) -> Result<usize>;

    /// Maps the whole store of the buffer bound to `target` into client memory.
    /// The pointer stays valid until `unmap_buffer`.
    unsafe fn map_buffer(&mut self, target: Target, access: MapAccess) -> Result<*mut u8>;

    unsafe fn map_buffer_range(
        &mut self,
        target: Target,
        offset: usize,
        len: usize,
        access: MapAccessFlags,
    ) -> Result<*mut u8>;

    /// Returns `false` if the store contents were corrupted while mapped.
    unsafe fn unmap_buffer(&mut self, target: Target) -> Result<bool>;

    unsafe fn active_texture(&mut self, unit: u32) -> Result<()>;

    /// Defines a texture image.
    ///
    /// # Safety
    ///
    /// `bytes`, when given, must hold at least `desc.len()` bytes. The driver reads
    /// the whole image from it.
    unsafe fn tex_image(
        &mut self,
        target: Target,
        face: Option<CubeFace>,
        level: u32,
        desc: ImageDesc,
        bytes: Option<&[u8]>,
    ) -> Result<()>;

    /// Overwrites a box of an existing texture image.
    ///
    /// # Safety
    ///
    /// `bytes` must hold at least `desc.len()` bytes.
    unsafe fn tex_sub_image(
        &mut self,
        target: Target,
        face: Option<CubeFace>,
        level: u32,
        offset: Vector3<u32>,
        desc: ImageDesc,
        bytes: &[u8],
    ) -> Result<()>;

    unsafe fn tex_parameter(&mut self, target: Target, param: TextureParameter) -> Result<()>;

    unsafe fn generate_mipmap(&mut self, target: Target) -> Result<()>;

    /// Starts capturing on the currently bound transform feedback object.
    unsafe fn begin_feedback(&mut self, mode: FeedbackPrimitive) -> Result<()>;

    unsafe fn end_feedback(&mut self) -> Result<()>;

    unsafe fn pause_feedback(&mut self) -> Result<()>;

    unsafe fn resume_feedback(&mut self) -> Result<()>;
}

/// Creates the OpenGL driver.
///
/// # Safety
///
/// The GL function pointers must have been loaded (see `gl::GLDriver::load_with`)
/// and the context they belong to must be current on this thread.
#[cfg(not(target_arch = "wasm32"))]
pub unsafe fn new() -> Result<Box<dyn Driver>> {
    let driver = self::gl::driver::GLDriver::new()?;
    Ok(Box::new(driver))
}

pub fn new_headless() -> Box<dyn Driver> {
    Box::new(self::headless::HeadlessDriver::new())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn image_len() {
        let desc = ImageDesc {
            internal_format: InternalFormat::Rgba8,
            format: PixelFormat::Rgba,
            data_type: DataType::UnsignedByte,
            extent: Vector3::new(4, 2, 1),
        };

        assert_eq!(desc.len(), Some(32));
        assert!(!desc.is_empty());

        let huge = ImageDesc {
            extent: Vector3::new(u32::max_value(), u32::max_value(), u32::max_value()),
            ..desc
        };

        assert_eq!(huge.texels(), None);
        assert_eq!(huge.len(), None);
    }
}
