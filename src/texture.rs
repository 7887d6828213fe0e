//! Texture objects, typed by the target they are created for.

use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use cgmath::Vector3;

use crate::context::Context;
use crate::driver::capabilities::Capability;
use crate::driver::ImageDesc;
use crate::enums::*;
use crate::errors::*;
use crate::handle::Handle;
use crate::resource::BoundResource;

pub trait TextureKind: 'static {
    const TARGET: Target;
    /// Number of meaningful extent components of one image.
    const DIMENSIONS: u32;
    const CAPABILITY: Option<Capability>;
}

/// Kinds with a single image per mipmap level, that is everything but cube maps.
pub trait SingleImage: TextureKind {}

macro_rules! texture_kinds {
    ($($name:ident => $target:ident, $dimensions:expr, $capability:expr;)+) => {
        $(
            #[derive(Debug, Copy, Clone, PartialEq, Eq)]
            pub struct $name;

            impl TextureKind for $name {
                const TARGET: Target = Target::$target;
                const DIMENSIONS: u32 = $dimensions;
                const CAPABILITY: Option<Capability> = $capability;
            }
        )+
    };
}

texture_kinds! {
    Texture1DTarget => Texture1D, 1, None;
    Texture2DTarget => Texture2D, 2, None;
    Texture3DTarget => Texture3D, 3, Some(Capability::Texture3D);
    Texture1DArrayTarget => Texture1DArray, 2, Some(Capability::TextureArray);
    Texture2DArrayTarget => Texture2DArray, 3, Some(Capability::TextureArray);
    TextureRectangleTarget => TextureRectangle, 2, Some(Capability::TextureRectangle);
    TextureCubeMapTarget => TextureCubeMap, 2, Some(Capability::TextureCubeMap);
}

impl SingleImage for Texture1DTarget {}
impl SingleImage for Texture2DTarget {}
impl SingleImage for Texture3DTarget {}
impl SingleImage for Texture1DArrayTarget {}
impl SingleImage for Texture2DArrayTarget {}
impl SingleImage for TextureRectangleTarget {}

pub type Texture1D = Texture<Texture1DTarget>;
pub type Texture2D = Texture<Texture2DTarget>;
pub type Texture3D = Texture<Texture3DTarget>;
pub type Texture1DArray = Texture<Texture1DArrayTarget>;
pub type Texture2DArray = Texture<Texture2DArrayTarget>;
pub type TextureRectangle = Texture<TextureRectangleTarget>;
pub type TextureCubeMap = Texture<TextureCubeMapTarget>;

/// Layout of the client-side pixels of an upload.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PixelLayout {
    pub format: PixelFormat,
    pub data_type: DataType,
}

impl PixelLayout {
    pub fn new(format: PixelFormat, data_type: DataType) -> Self {
        PixelLayout { format, data_type }
    }
}

/// A texture object created for the target `K`.
///
/// The driver ties a texture to the first target it is bound to, so unlike buffers
/// textures can not be cast.
pub struct Texture<K: TextureKind> {
    resource: BoundResource,
    _kind: PhantomData<K>,
}

impl<K: TextureKind> Clone for Texture<K> {
    fn clone(&self) -> Self {
        Texture {
            resource: self.resource.clone(),
            _kind: PhantomData,
        }
    }
}

impl<K: TextureKind> fmt::Debug for Texture<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Texture<{}>({:?})", K::TARGET, self.resource.handle())
    }
}

impl<K: TextureKind> Texture<K> {
    pub fn new(ctx: &Rc<Context>) -> Result<Self> {
        if let Some(capability) = K::CAPABILITY {
            ctx.require(capability)?;
        }

        let handle = Handle::create(ctx, ObjectKind::Texture)?;
        Ok(Texture {
            resource: BoundResource::new(handle, K::TARGET),
            _kind: PhantomData,
        })
    }

    #[inline]
    pub fn handle(&self) -> &Handle {
        self.resource.handle()
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.resource.id()
    }

    #[inline]
    pub fn target(&self) -> Target {
        K::TARGET
    }

    /// Binds the texture to the active texture unit.
    #[inline]
    pub fn bind(&self) -> Result<()> {
        self.resource.bind()
    }

    #[inline]
    pub fn unbind(&self) -> Result<()> {
        self.resource.unbind()
    }

    /// Whether the texture is current on the active texture unit.
    #[inline]
    pub fn is_current(&self) -> Result<bool> {
        self.resource.is_current()
    }

    /// Activates the texture unit `unit` and binds the texture to it.
    pub fn bind_to_unit(&self, unit: u32) -> Result<()> {
        self.resource.context()?.active_texture(unit)?;
        self.resource.bind()
    }

    pub fn release(&mut self) {
        self.resource.release();
    }

    /// Sets the minifying and magnifying filters.
    pub fn set_filter(&self, min: TextureFilter, mag: TextureFilter) -> Result<()> {
        self.parameters(
            "set_filter",
            &[
                TextureParameter::MinFilter(min),
                TextureParameter::MagFilter(mag),
            ],
        )
    }

    /// Sets the wrap mode of every meaningful coordinate.
    pub fn set_wrap(&self, wrap: TextureWrap) -> Result<()> {
        let params = [
            TextureParameter::WrapS(wrap),
            TextureParameter::WrapT(wrap),
            TextureParameter::WrapR(wrap),
        ];

        let count = match K::TARGET {
            // Layers are never wrapped.
            Target::Texture1DArray => 1,
            Target::Texture2DArray => 2,
            _ => K::DIMENSIONS as usize,
        };

        self.parameters("set_wrap", &params[..count])
    }

    /// Restricts sampling to the mipmap levels `base..=max`.
    pub fn set_levels(&self, base: u32, max: u32) -> Result<()> {
        if base > max {
            return Err(Error::OutOfBounds);
        }

        self.parameters(
            "set_levels",
            &[
                TextureParameter::BaseLevel(base),
                TextureParameter::MaxLevel(max),
            ],
        )
    }

    /// Builds the mipmap chain from the base level.
    pub fn generate_mipmap(&self) -> Result<()> {
        let ctx = self.resource.context()?;
        ctx.require(Capability::GenerateMipmap)?;
        self.resource.require_current("generate_mipmap")?;
        ctx.call(|v| unsafe { v.generate_mipmap(K::TARGET) })
    }

    fn parameters(&self, operation: &'static str, params: &[TextureParameter]) -> Result<()> {
        self.resource.require_current(operation)?;
        let ctx = self.resource.context()?;

        for &param in params {
            ctx.call(|v| unsafe { v.tex_parameter(K::TARGET, param) })?;
        }

        Ok(())
    }

    fn image(
        &self,
        face: Option<CubeFace>,
        level: u32,
        desc: ImageDesc,
        data: Option<&[u8]>,
    ) -> Result<()> {
        self.resource.require_current("upload")?;
        let ctx = self.resource.context()?;

        if ctx.settings().validation {
            Self::check_extent(&desc)?;
        }

        if let Some(data) = data {
            check_len(&desc, data.len())?;
        }

        ctx.call(|v| unsafe { v.tex_image(K::TARGET, face, level, desc, data) })
    }

    fn sub_image(
        &self,
        face: Option<CubeFace>,
        level: u32,
        offset: Vector3<u32>,
        desc: ImageDesc,
        data: &[u8],
    ) -> Result<()> {
        self.resource.require_current("sub_upload")?;
        let ctx = self.resource.context()?;

        if ctx.settings().validation {
            Self::check_extent(&desc)?;
        }

        check_len(&desc, data.len())?;

        ctx.call(|v| unsafe { v.tex_sub_image(K::TARGET, face, level, offset, desc, data) })
    }

    /// Unused dimensions have to be 1.
    fn check_extent(desc: &ImageDesc) -> Result<()> {
        let extent = desc.extent;
        let unused = match K::DIMENSIONS {
            1 => extent.y != 1 || extent.z != 1,
            2 => extent.z != 1,
            _ => false,
        };

        if unused {
            return Err(Error::Layout(format!(
                "{} images have {} dimension(s), got {}x{}x{}.",
                K::TARGET,
                K::DIMENSIONS,
                extent.x,
                extent.y,
                extent.z
            )));
        }

        Ok(())
    }
}

/// Pixel data is expected to be tightly packed. The driver reads the whole image
/// from the slice, so this holds whatever the settings.
fn check_len(desc: &ImageDesc, len: usize) -> Result<()> {
    let extent = desc.extent;
    match desc.len() {
        Some(needed) if len >= needed => Ok(()),
        Some(needed) => Err(Error::Layout(format!(
            "{}x{}x{} image needs {} bytes of pixel data, got {}.",
            extent.x, extent.y, extent.z, needed, len
        ))),
        None => Err(Error::Layout(format!(
            "{}x{}x{} image is too large.",
            extent.x, extent.y, extent.z
        ))),
    }
}

impl<K: SingleImage> Texture<K> {
    /// Defines the image of mipmap level `level`. Without `data` the image content is
    /// undefined.
    pub fn upload(
        &self,
        level: u32,
        internal_format: InternalFormat,
        extent: Vector3<u32>,
        layout: PixelLayout,
        data: Option<&[u8]>,
    ) -> Result<()> {
        let desc = desc(internal_format, extent, layout);
        self.image(None, level, desc, data)
    }

    /// Overwrites the box at `offset` of mipmap level `level`.
    pub fn sub_upload(
        &self,
        level: u32,
        offset: Vector3<u32>,
        extent: Vector3<u32>,
        layout: PixelLayout,
        data: &[u8],
    ) -> Result<()> {
        let desc = desc(InternalFormat::Rgba8, extent, layout);
        self.sub_image(None, level, offset, desc, data)
    }
}

impl Texture<TextureCubeMapTarget> {
    /// Defines the image of `face` at mipmap level `level`.
    pub fn upload_face(
        &self,
        face: CubeFace,
        level: u32,
        internal_format: InternalFormat,
        extent: Vector3<u32>,
        layout: PixelLayout,
        data: Option<&[u8]>,
    ) -> Result<()> {
        let desc = desc(internal_format, extent, layout);
        self.image(Some(face), level, desc, data)
    }

    pub fn sub_upload_face(
        &self,
        face: CubeFace,
        level: u32,
        offset: Vector3<u32>,
        extent: Vector3<u32>,
        layout: PixelLayout,
        data: &[u8],
    ) -> Result<()> {
        let desc = desc(InternalFormat::Rgba8, extent, layout);
        self.sub_image(Some(face), level, offset, desc, data)
    }
}

// Sub-image updates keep the storage format of the image, `internal_format` is
// ignored by the driver there.
#[inline]
fn desc(internal_format: InternalFormat, extent: Vector3<u32>, layout: PixelLayout) -> ImageDesc {
    ImageDesc {
        internal_format,
        format: layout.format,
        data_type: layout.data_type,
        extent,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::settings::Settings;

    #[test]
    fn extents() {
        let layout = PixelLayout::new(PixelFormat::Rgba, DataType::UnsignedByte);
        let image = |extent| desc(InternalFormat::Rgba8, extent, layout);

        assert!(Texture1D::check_extent(&image(Vector3::new(4, 1, 1))).is_ok());
        assert!(Texture1D::check_extent(&image(Vector3::new(4, 2, 1))).is_err());
        assert!(Texture2DArray::check_extent(&image(Vector3::new(2, 2, 3))).is_ok());

        assert!(check_len(&image(Vector3::new(4, 1, 1)), 16).is_ok());
        assert!(check_len(&image(Vector3::new(4, 4, 1)), 63).is_err());
        assert!(check_len(&image(Vector3::new(2, 2, 3)), 48).is_ok());

        let max = u32::max_value();
        match check_len(&image(Vector3::new(max, max, max)), 16) {
            Err(Error::Layout(_)) => {}
            v => panic!("{:?}", v),
        }
    }

    #[test]
    fn wrap_coordinates() {
        let ctx = Context::headless(Settings::validated());
        let tex = Texture1DArray::new(&ctx).unwrap();
        tex.bind().unwrap();
        tex.set_wrap(TextureWrap::Clamp).unwrap();
        tex.set_levels(0, 4).unwrap();
        assert!(tex.set_levels(2, 1).is_err());
    }
}
