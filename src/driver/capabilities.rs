//! Runtime capability table of a driver.
//!
//! Instead of compiling wrappers in or out depending on which entry points the
//! headers declare, every driver fills a `Capabilities` table when it is created and
//! the wrappers query it before touching optional functionality.

use std::cmp;
use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Describes the OpenGL context profile.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Profile {
    /// The context uses only future-compatible functions and definitions.
    Core,
    /// The context includes all immediate mode functions and definitions.
    Compatibility,
}

/// Describes a version.
///
/// A version can only be compared to another version if they belong to the same API.
/// For example, both `Version::GL(3, 0) >= Version::ES(3, 0)` and `Version::ES(3, 0) >=
/// Version::GL(3, 0)` return `false`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Version {
    /// Regular OpenGL.
    GL(u8, u8),
    /// OpenGL embedded system.
    ES(u8, u8),
}

impl PartialOrd for Version {
    #[inline]
    fn partial_cmp(&self, other: &Version) -> Option<cmp::Ordering> {
        let (es1, major1, minor1) = match *self {
            Version::GL(major, minor) => (false, major, minor),
            Version::ES(major, minor) => (true, major, minor),
        };

        let (es2, major2, minor2) = match *other {
            Version::GL(major, minor) => (false, major, minor),
            Version::ES(major, minor) => (true, major, minor),
        };

        if es1 != es2 {
            None
        } else {
            match major1.cmp(&major2) {
                cmp::Ordering::Equal => Some(minor1.cmp(&minor2)),
                v => Some(v),
            }
        }
    }
}

impl Version {
    /// Parses a `GL_VERSION` string such as `"4.5.0 NVIDIA 390.77"` or
    /// `"OpenGL ES 3.0 Mesa 18.0"`.
    pub fn parse(desc: &str) -> Option<Version> {
        let (es, desc) = if desc.starts_with("OpenGL ES-") {
            // "OpenGL ES-CM 1.1", the profile name is two characters.
            (true, desc.get(13..)?)
        } else if desc.starts_with("OpenGL ES ") {
            (true, desc.get(10..)?)
        } else {
            (false, desc)
        };

        let desc = desc.split(' ').next()?;
        let mut iter = desc.split('.');
        let major = iter.next()?.parse().ok()?;
        let minor = iter.next()?.parse().ok()?;

        if es {
            Some(Version::ES(major, minor))
        } else {
            Some(Version::GL(major, minor))
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Version::GL(major, minor) => write!(f, "OpenGL {}.{}", major, minor),
            Version::ES(major, minor) => write!(f, "OpenGL ES {}.{}", major, minor),
        }
    }
}

/// Optional functionality a driver may or may not provide.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// `glMapBufferRange`.
    MapBufferRange,
    /// `GL_UNIFORM_BUFFER` and its indexed binding points.
    UniformBuffer,
    /// `GL_TEXTURE_BUFFER`.
    TextureBuffer,
    /// `GL_COPY_READ_BUFFER` and `GL_COPY_WRITE_BUFFER`.
    CopyBuffer,
    /// `GL_PIXEL_PACK_BUFFER` and `GL_PIXEL_UNPACK_BUFFER`.
    PixelBuffer,
    /// Transform feedback objects and `glBeginTransformFeedback`.
    TransformFeedback,
    /// `glPauseTransformFeedback` and `glResumeTransformFeedback`.
    TransformFeedbackPause,
    Texture3D,
    TextureArray,
    TextureRectangle,
    TextureCubeMap,
    VertexArrayObject,
    GenerateMipmap,
}

impl Capability {
    pub const ALL: [Capability; 13] = [
        Capability::MapBufferRange,
        Capability::UniformBuffer,
        Capability::TextureBuffer,
        Capability::CopyBuffer,
        Capability::PixelBuffer,
        Capability::TransformFeedback,
        Capability::TransformFeedbackPause,
        Capability::Texture3D,
        Capability::TextureArray,
        Capability::TextureRectangle,
        Capability::TextureCubeMap,
        Capability::VertexArrayObject,
        Capability::GenerateMipmap,
    ];
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Represents the capabilities of the context.
///
/// Contrary to the binding state, these values never change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capabilities {
    /// Returns a version or release number.
    pub version: Version,
    /// The company responsible for this implementation.
    pub vendor: String,
    /// The name of the renderer.
    pub renderer: String,
    /// The context profile if available. `None` before OpenGL 3.2.
    pub profile: Option<Profile>,
    /// Maximum number of texture units, `glActiveTexture` accepts
    /// `GL_TEXTURE0` up to `GL_TEXTURE0` + this value - 1.
    pub max_combined_texture_image_units: u32,
    /// Number of indexed binding points of `GL_UNIFORM_BUFFER`.
    pub max_uniform_buffer_bindings: u32,
    /// Number of indexed binding points of `GL_TRANSFORM_FEEDBACK_BUFFER`.
    pub max_transform_feedback_buffers: u32,

    supported: HashSet<Capability>,
}

impl Capabilities {
    /// Creates a table which supports nothing optional.
    pub fn new(version: Version) -> Self {
        Capabilities {
            version,
            vendor: String::new(),
            renderer: String::new(),
            profile: None,
            max_combined_texture_image_units: 8,
            max_uniform_buffer_bindings: 0,
            max_transform_feedback_buffers: 0,
            supported: HashSet::new(),
        }
    }

    /// Creates a table which supports everything, shaped like a 4.5 core context.
    pub fn full() -> Self {
        let mut caps = Capabilities::new(Version::GL(4, 5));
        caps.profile = Some(Profile::Core);
        caps.max_combined_texture_image_units = 32;
        caps.max_uniform_buffer_bindings = 36;
        caps.max_transform_feedback_buffers = 4;
        caps.supported = Capability::ALL.iter().cloned().collect();
        caps
    }

    #[inline]
    pub fn has(&self, capability: Capability) -> bool {
        self.supported.contains(&capability)
    }

    pub fn with(mut self, capability: Capability) -> Self {
        self.supported.insert(capability);
        self
    }

    pub fn without(mut self, capability: Capability) -> Self {
        self.supported.remove(&capability);
        self
    }

    pub fn insert(&mut self, capability: Capability) {
        self.supported.insert(capability);
    }

    /// Iterates over the supported capabilities in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.supported.iter().cloned()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn version_order() {
        assert!(Version::GL(3, 1) > Version::GL(3, 0));
        assert!(Version::GL(4, 0) > Version::GL(3, 3));
        assert!(!(Version::GL(3, 0) >= Version::ES(3, 0)));
        assert!(!(Version::ES(3, 0) >= Version::GL(3, 0)));
    }

    #[test]
    fn version_parse() {
        assert_eq!(
            Version::parse("4.5.0 NVIDIA 390.77"),
            Some(Version::GL(4, 5))
        );
        assert_eq!(
            Version::parse("OpenGL ES 3.0 Mesa 18.0.5"),
            Some(Version::ES(3, 0))
        );
        assert_eq!(Version::parse("OpenGL ES-CM 1.1"), Some(Version::ES(1, 1)));
        assert_eq!(Version::parse("garbage"), None);
        assert_eq!(Version::parse("OpenGL ES-"), None);
        assert_eq!(Version::parse("OpenGL ES-CM"), None);
    }

    #[test]
    fn table() {
        let caps = Capabilities::full().without(Capability::TextureRectangle);
        assert!(caps.has(Capability::MapBufferRange));
        assert!(!caps.has(Capability::TextureRectangle));

        let caps = Capabilities::new(Version::ES(2, 0)).with(Capability::TextureCubeMap);
        assert_eq!(caps.iter().count(), 1);
    }
}
