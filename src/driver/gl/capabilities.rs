//! Fills the capability table from the strings and limits of the current GL context.

use std::ffi;

use gl::types::*;

use crate::driver::capabilities::{Capabilities, Capability, Profile, Version};
use crate::errors::*;

macro_rules! extensions {
    ($($string:expr => $field:ident,)+) => {
        /// Contains data about the list of extensions.
        #[derive(Debug, Clone, Copy, Default)]
        pub struct Extensions {
            $(
                pub $field: bool,
            )+
        }

        impl Extensions {
            /// Returns the list of extensions supported by the current context.
            ///
            /// *Safety*: the OpenGL context must be current in the thread and
            /// `version` must be the one of that context.
            pub unsafe fn parse(version: Version) -> Result<Extensions> {
                let strings: Vec<String> = if version >= Version::GL(3, 0) || version >= Version::ES(3, 0) {
                    let mut num_extensions = 0;
                    gl::GetIntegerv(gl::NUM_EXTENSIONS, &mut num_extensions);

                    let mut strings = Vec::with_capacity(num_extensions as usize);
                    for i in 0..num_extensions {
                        let ext = gl::GetStringi(gl::EXTENSIONS, i as GLuint);
                        strings.push(parse_c_str(ext as *const _, "GL_EXTENSIONS")?);
                    }

                    strings
                } else {
                    let list = gl::GetString(gl::EXTENSIONS);
                    parse_c_str(list as *const _, "GL_EXTENSIONS")?
                        .split(' ')
                        .map(|e| e.to_owned())
                        .collect()
                };

                let mut extensions = Extensions::default();
                for extension in strings {
                    match &extension[..] {
                        $(
                            $string => extensions.$field = true,
                        )+
                        _ => ()
                    }
                }

                Ok(extensions)
            }
        }
    }
}

extensions! {
    "GL_ARB_map_buffer_range" => gl_arb_map_buffer_range,
    "GL_ARB_uniform_buffer_object" => gl_arb_uniform_buffer_object,
    "GL_ARB_texture_buffer_object" => gl_arb_texture_buffer_object,
    "GL_EXT_texture_buffer_object" => gl_ext_texture_buffer_object,
    "GL_ARB_copy_buffer" => gl_arb_copy_buffer,
    "GL_ARB_pixel_buffer_object" => gl_arb_pixel_buffer_object,
    "GL_EXT_transform_feedback" => gl_ext_transform_feedback,
    "GL_ARB_transform_feedback2" => gl_arb_transform_feedback2,
    "GL_EXT_texture3D" => gl_ext_texture_3d,
    "GL_OES_texture_3D" => gl_oes_texture_3d,
    "GL_EXT_texture_array" => gl_ext_texture_array,
    "GL_ARB_texture_rectangle" => gl_arb_texture_rectangle,
    "GL_ARB_vertex_array_object" => gl_arb_vertex_array_object,
    "GL_OES_vertex_array_object" => gl_oes_vertex_array_object,
    "GL_ARB_framebuffer_object" => gl_arb_framebuffer_object,
    "GL_EXT_framebuffer_object" => gl_ext_framebuffer_object,
}

impl Extensions {
    fn capabilities(&self, version: Version) -> Vec<Capability> {
        let gl3 = version >= Version::GL(3, 0);
        let es3 = version >= Version::ES(3, 0);

        let mut caps = vec![Capability::TextureCubeMap];

        if gl3 || es3 || self.gl_arb_map_buffer_range {
            caps.push(Capability::MapBufferRange);
        }

        if version >= Version::GL(3, 1) || es3 || self.gl_arb_uniform_buffer_object {
            caps.push(Capability::UniformBuffer);
        }

        if version >= Version::GL(3, 1)
            || version >= Version::ES(3, 2)
            || self.gl_arb_texture_buffer_object
            || self.gl_ext_texture_buffer_object
        {
            caps.push(Capability::TextureBuffer);
        }

        if version >= Version::GL(3, 1) || es3 || self.gl_arb_copy_buffer {
            caps.push(Capability::CopyBuffer);
        }

        if version >= Version::GL(2, 1) || es3 || self.gl_arb_pixel_buffer_object {
            caps.push(Capability::PixelBuffer);
        }

        if gl3 || es3 || self.gl_ext_transform_feedback {
            caps.push(Capability::TransformFeedback);
        }

        if version >= Version::GL(4, 0) || es3 || self.gl_arb_transform_feedback2 {
            caps.push(Capability::TransformFeedbackPause);
        }

        if version >= Version::GL(1, 2) || es3 || self.gl_ext_texture_3d || self.gl_oes_texture_3d
        {
            caps.push(Capability::Texture3D);
        }

        if gl3 || es3 || self.gl_ext_texture_array {
            caps.push(Capability::TextureArray);
        }

        if version >= Version::GL(3, 1) || self.gl_arb_texture_rectangle {
            caps.push(Capability::TextureRectangle);
        }

        if gl3 || es3 || self.gl_arb_vertex_array_object || self.gl_oes_vertex_array_object {
            caps.push(Capability::VertexArrayObject);
        }

        if gl3
            || version >= Version::ES(2, 0)
            || self.gl_arb_framebuffer_object
            || self.gl_ext_framebuffer_object
        {
            caps.push(Capability::GenerateMipmap);
        }

        caps
    }
}

/// Builds the capability table of the current context.
///
/// *Safety*: the OpenGL context must be current in the thread.
pub unsafe fn parse() -> Result<Capabilities> {
    let desc = parse_str(gl::VERSION)?;
    let version = Version::parse(&desc)
        .ok_or_else(|| driver_err!("[GL] Version string '{}' is malformed.", desc))?;

    let extensions = Extensions::parse(version)?;

    let mut caps = Capabilities::new(version);
    caps.vendor = parse_str(gl::VENDOR)?;
    caps.renderer = parse_str(gl::RENDERER)?;
    caps.profile = parse_profile(version);
    caps.max_combined_texture_image_units =
        parse_integer(gl::MAX_COMBINED_TEXTURE_IMAGE_UNITS, 2);

    for v in extensions.capabilities(version) {
        caps.insert(v);
    }

    if caps.has(Capability::UniformBuffer) {
        caps.max_uniform_buffer_bindings = parse_integer(gl::MAX_UNIFORM_BUFFER_BINDINGS, 0);
    }

    if caps.has(Capability::TransformFeedback) {
        caps.max_transform_feedback_buffers =
            parse_integer(gl::MAX_TRANSFORM_FEEDBACK_SEPARATE_ATTRIBS, 0);
    }

    Ok(caps)
}

#[inline]
unsafe fn parse_c_str(s: *const ::std::os::raw::c_char, what: &str) -> Result<String> {
    if s.is_null() {
        driver_bail!("[GL] String of {} is null.", what);
    }

    String::from_utf8(ffi::CStr::from_ptr(s).to_bytes().to_vec())
        .map_err(|_| driver_err!("[GL] String of {} is malformed.", what))
}

#[inline]
unsafe fn parse_str(id: GLenum) -> Result<String> {
    let s = gl::GetString(id);
    parse_c_str(s as *const _, &format!("{:#x}", id))
}

#[inline]
unsafe fn parse_integer(id: GLenum, fallback: u32) -> u32 {
    let mut val = fallback as GLint;
    gl::GetIntegerv(id, &mut val);
    val.max(0) as u32
}

#[inline]
unsafe fn parse_profile(version: Version) -> Option<Profile> {
    if version >= Version::GL(3, 2) {
        let mut val = 0;
        gl::GetIntegerv(gl::CONTEXT_PROFILE_MASK, &mut val);
        let val = val as GLenum;
        if (val & gl::CONTEXT_COMPATIBILITY_PROFILE_BIT) != 0 {
            Some(Profile::Compatibility)
        } else if (val & gl::CONTEXT_CORE_PROFILE_BIT) != 0 {
            Some(Profile::Core)
        } else {
            None
        }
    } else {
        None
    }
}
