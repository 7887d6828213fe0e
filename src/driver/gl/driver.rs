use std::os::raw::c_void;
use std::ptr;

use cgmath::Vector3;
use gl::types::*;

use crate::driver::capabilities::Capabilities;
use crate::driver::{Driver, ImageDesc};
use crate::enums::*;
use crate::errors::*;

use super::capabilities;
use super::types;

/// Forwards every call to the OpenGL context that is current on this thread.
pub struct GLDriver {
    capabilities: Capabilities,
}

impl GLDriver {
    /// Creates a driver on top of already loaded function pointers.
    ///
    /// # Safety
    ///
    /// The OpenGL context must be current in the thread.
    pub unsafe fn new() -> Result<Self> {
        let capabilities = capabilities::parse()?;
        info!("GLDriver {:#?}", capabilities);
        Ok(GLDriver { capabilities })
    }

    /// Loads the function pointers with `loader` and creates the driver.
    ///
    /// # Safety
    ///
    /// The OpenGL context `loader` resolves symbols for must be current in the thread.
    pub unsafe fn load_with<F>(loader: F) -> Result<Self>
    where
        F: FnMut(&str) -> *const c_void,
    {
        gl::load_with(loader);
        GLDriver::new()
    }
}

impl Driver for GLDriver {
    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    unsafe fn create_object(&mut self, kind: ObjectKind) -> Result<u32> {
        let mut id = 0;
        match kind {
            ObjectKind::Buffer => gl::GenBuffers(1, &mut id),
            ObjectKind::Texture => gl::GenTextures(1, &mut id),
            ObjectKind::TransformFeedback => gl::GenTransformFeedbacks(1, &mut id),
            ObjectKind::VertexArray => gl::GenVertexArrays(1, &mut id),
        }

        check()?;
        Ok(id)
    }

    unsafe fn delete_object(&mut self, kind: ObjectKind, id: u32) -> Result<()> {
        match kind {
            ObjectKind::Buffer => gl::DeleteBuffers(1, &id),
            ObjectKind::Texture => gl::DeleteTextures(1, &id),
            ObjectKind::TransformFeedback => gl::DeleteTransformFeedbacks(1, &id),
            ObjectKind::VertexArray => gl::DeleteVertexArrays(1, &id),
        }

        check()
    }

    unsafe fn bind(&mut self, target: Target, id: u32) -> Result<()> {
        match target.kind() {
            ObjectKind::Buffer => gl::BindBuffer(target.into(), id),
            ObjectKind::Texture => gl::BindTexture(target.into(), id),
            ObjectKind::TransformFeedback => gl::BindTransformFeedback(target.into(), id),
            ObjectKind::VertexArray => gl::BindVertexArray(id),
        }

        check()
    }

    unsafe fn bind_indexed(&mut self, target: IndexedTarget, index: u32, id: u32) -> Result<()> {
        gl::BindBufferBase(target.into(), index, id);
        check()
    }

    unsafe fn bind_indexed_range(
        &mut self,
        target: IndexedTarget,
        index: u32,
        id: u32,
        offset: usize,
        size: usize,
    ) -> Result<()> {
        gl::BindBufferRange(
            target.into(),
            index,
            id,
            offset as GLintptr,
            size as GLsizeiptr,
        );

        check()
    }

    unsafe fn binding(&mut self, target: Target) -> Result<u32> {
        let mut id = 0;
        gl::GetIntegerv(types::binding_query(target), &mut id);
        check()?;
        Ok(id as u32)
    }

    unsafe fn indexed_binding(&mut self, target: IndexedTarget, index: u32) -> Result<u32> {
        let mut id = 0;
        gl::GetIntegeri_v(types::indexed_binding_query(target), index, &mut id);
        check()?;
        Ok(id as u32)
    }

    unsafe fn buffer_data(
        &mut self,
        target: Target,
        size: usize,
        bytes: Option<&[u8]>,
        usage: BufferUsage,
    ) -> Result<()> {
        let value = match bytes {
            Some(v) if !v.is_empty() => v.as_ptr() as *const c_void,
            _ => ptr::null(),
        };

        gl::BufferData(target.into(), size as GLsizeiptr, value, usage.into());
        check()
    }

    unsafe fn buffer_sub_data(
        &mut self,
        target: Target,
        offset: usize,
        bytes: &[u8],
    ) -> Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }

        gl::BufferSubData(
            target.into(),
            offset as GLintptr,
            bytes.len() as GLsizeiptr,
            bytes.as_ptr() as *const c_void,
        );

        check()
    }

    unsafe fn buffer_size(&mut self, target: Target) -> Result<usize> {
        let mut size = 0;
        gl::GetBufferParameteriv(target.into(), gl::BUFFER_SIZE, &mut size);
        check()?;
        Ok(size.max(0) as usize)
    }

    unsafe fn map_buffer(&mut self, target: Target, access: MapAccess) -> Result<*mut u8> {
        let ptr = gl::MapBuffer(target.into(), access.into()) as *mut u8;
        check()?;

        if ptr.is_null() && self.buffer_size(target)? > 0 {
            driver_bail!("[GL] glMapBuffer returned a null pointer.");
        }

        Ok(ptr)
    }

    unsafe fn map_buffer_range(
        &mut self,
        target: Target,
        offset: usize,
        len: usize,
        access: MapAccessFlags,
    ) -> Result<*mut u8> {
        let ptr = gl::MapBufferRange(
            target.into(),
            offset as GLintptr,
            len as GLsizeiptr,
            access.into(),
        ) as *mut u8;

        check()?;

        if ptr.is_null() {
            driver_bail!("[GL] glMapBufferRange returned a null pointer.");
        }

        Ok(ptr)
    }

    unsafe fn unmap_buffer(&mut self, target: Target) -> Result<bool> {
        let intact = gl::UnmapBuffer(target.into());
        check()?;
        Ok(intact == gl::TRUE)
    }

    unsafe fn active_texture(&mut self, unit: u32) -> Result<()> {
        gl::ActiveTexture(gl::TEXTURE0 + unit);
        check()
    }

    unsafe fn tex_image(
        &mut self,
        target: Target,
        face: Option<CubeFace>,
        level: u32,
        desc: ImageDesc,
        bytes: Option<&[u8]>,
    ) -> Result<()> {
        let value = match bytes {
            Some(v) if !v.is_empty() => v.as_ptr() as *const c_void,
            _ => ptr::null(),
        };

        let internal_format: GLenum = desc.internal_format.into();
        let image_target = image_target(target, face);
        let (w, h, d) = extent(desc.extent);

        match dimensions(target) {
            1 => gl::TexImage1D(
                image_target,
                level as GLint,
                internal_format as GLint,
                w,
                0,
                desc.format.into(),
                desc.data_type.into(),
                value,
            ),
            2 => gl::TexImage2D(
                image_target,
                level as GLint,
                internal_format as GLint,
                w,
                h,
                0,
                desc.format.into(),
                desc.data_type.into(),
                value,
            ),
            _ => gl::TexImage3D(
                image_target,
                level as GLint,
                internal_format as GLint,
                w,
                h,
                d,
                0,
                desc.format.into(),
                desc.data_type.into(),
                value,
            ),
        }

        check()
    }

    unsafe fn tex_sub_image(
        &mut self,
        target: Target,
        face: Option<CubeFace>,
        level: u32,
        offset: Vector3<u32>,
        desc: ImageDesc,
        bytes: &[u8],
    ) -> Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }

        let value = bytes.as_ptr() as *const c_void;
        let image_target = image_target(target, face);
        let (x, y, z) = extent(offset);
        let (w, h, d) = extent(desc.extent);

        match dimensions(target) {
            1 => gl::TexSubImage1D(
                image_target,
                level as GLint,
                x,
                w,
                desc.format.into(),
                desc.data_type.into(),
                value,
            ),
            2 => gl::TexSubImage2D(
                image_target,
                level as GLint,
                x,
                y,
                w,
                h,
                desc.format.into(),
                desc.data_type.into(),
                value,
            ),
            _ => gl::TexSubImage3D(
                image_target,
                level as GLint,
                x,
                y,
                z,
                w,
                h,
                d,
                desc.format.into(),
                desc.data_type.into(),
                value,
            ),
        }

        check()
    }

    unsafe fn tex_parameter(&mut self, target: Target, param: TextureParameter) -> Result<()> {
        let (name, value) = types::texture_parameter(param);
        gl::TexParameteri(target.into(), name, value);
        check()
    }

    unsafe fn generate_mipmap(&mut self, target: Target) -> Result<()> {
        gl::GenerateMipmap(target.into());
        check()
    }

    unsafe fn begin_feedback(&mut self, mode: FeedbackPrimitive) -> Result<()> {
        gl::BeginTransformFeedback(mode.into());
        check()
    }

    unsafe fn end_feedback(&mut self) -> Result<()> {
        gl::EndTransformFeedback();
        check()
    }

    unsafe fn pause_feedback(&mut self) -> Result<()> {
        gl::PauseTransformFeedback();
        check()
    }

    unsafe fn resume_feedback(&mut self) -> Result<()> {
        gl::ResumeTransformFeedback();
        check()
    }
}

/// Cube maps upload through the target of one of their faces.
fn image_target(target: Target, face: Option<CubeFace>) -> GLenum {
    match face {
        Some(face) => face.into(),
        None => target.into(),
    }
}

/// Number of extent components the image calls of `target` take.
fn dimensions(target: Target) -> u32 {
    match target {
        Target::Texture1D => 1,
        Target::Texture2D
        | Target::Texture1DArray
        | Target::TextureRectangle
        | Target::TextureCubeMap => 2,
        _ => 3,
    }
}

#[inline]
fn extent(v: Vector3<u32>) -> (GLsizei, GLsizei, GLsizei) {
    (v.x as GLsizei, v.y as GLsizei, v.z as GLsizei)
}

unsafe fn check() -> Result<()> {
    match gl::GetError() {
        gl::NO_ERROR => Ok(()),

        gl::INVALID_ENUM => {
            driver_bail!("[GL] An unacceptable value is specified for an enumerated argument.")
        }

        gl::INVALID_VALUE => driver_bail!("[GL] A numeric argument is out of range."),

        gl::INVALID_OPERATION => {
            driver_bail!("[GL] The specified operation is not allowed in the current state.")
        }

        gl::OUT_OF_MEMORY => {
            driver_bail!("[GL] There is not enough memory left to execute the command.")
        }

        v => driver_bail!("[GL] Oops, Unknown OpenGL error {:#x}.", v),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn image_targets() {
        assert_eq!(image_target(Target::Texture2D, None), gl::TEXTURE_2D);
        assert_eq!(
            image_target(Target::TextureCubeMap, Some(CubeFace::NegativeY)),
            gl::TEXTURE_CUBE_MAP_NEGATIVE_Y
        );
    }

    #[test]
    fn image_dimensions() {
        assert_eq!(dimensions(Target::Texture1D), 1);
        assert_eq!(dimensions(Target::Texture1DArray), 2);
        assert_eq!(dimensions(Target::TextureCubeMap), 2);
        assert_eq!(dimensions(Target::Texture2DArray), 3);
        assert_eq!(dimensions(Target::Texture3D), 3);
    }
}
