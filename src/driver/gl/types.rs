use gl::types::*;

use crate::enums::*;

impl From<Target> for GLenum {
    fn from(target: Target) -> Self {
        match target {
            Target::ArrayBuffer => gl::ARRAY_BUFFER,
            Target::ElementArrayBuffer => gl::ELEMENT_ARRAY_BUFFER,
            Target::TextureBuffer => gl::TEXTURE_BUFFER,
            Target::CopyReadBuffer => gl::COPY_READ_BUFFER,
            Target::CopyWriteBuffer => gl::COPY_WRITE_BUFFER,
            Target::PixelPackBuffer => gl::PIXEL_PACK_BUFFER,
            Target::PixelUnpackBuffer => gl::PIXEL_UNPACK_BUFFER,
            Target::UniformBuffer => gl::UNIFORM_BUFFER,
            Target::TransformFeedbackBuffer => gl::TRANSFORM_FEEDBACK_BUFFER,
            Target::Texture1D => gl::TEXTURE_1D,
            Target::Texture2D => gl::TEXTURE_2D,
            Target::Texture3D => gl::TEXTURE_3D,
            Target::Texture1DArray => gl::TEXTURE_1D_ARRAY,
            Target::Texture2DArray => gl::TEXTURE_2D_ARRAY,
            Target::TextureRectangle => gl::TEXTURE_RECTANGLE,
            Target::TextureCubeMap => gl::TEXTURE_CUBE_MAP,
            Target::TransformFeedback => gl::TRANSFORM_FEEDBACK,
            // Vertex arrays are bound through `glBindVertexArray`, which takes no target.
            Target::VertexArray => gl::VERTEX_ARRAY_BINDING,
        }
    }
}

/// The `glGetIntegerv` query that reads back the current binding of `target`.
pub fn binding_query(target: Target) -> GLenum {
    match target {
        Target::ArrayBuffer => gl::ARRAY_BUFFER_BINDING,
        Target::ElementArrayBuffer => gl::ELEMENT_ARRAY_BUFFER_BINDING,
        // The binding queries of these targets share the value of the target itself.
        Target::TextureBuffer => gl::TEXTURE_BUFFER,
        Target::CopyReadBuffer => gl::COPY_READ_BUFFER,
        Target::CopyWriteBuffer => gl::COPY_WRITE_BUFFER,
        Target::PixelPackBuffer => gl::PIXEL_PACK_BUFFER_BINDING,
        Target::PixelUnpackBuffer => gl::PIXEL_UNPACK_BUFFER_BINDING,
        Target::UniformBuffer => gl::UNIFORM_BUFFER_BINDING,
        Target::TransformFeedbackBuffer => gl::TRANSFORM_FEEDBACK_BUFFER_BINDING,
        Target::Texture1D => gl::TEXTURE_BINDING_1D,
        Target::Texture2D => gl::TEXTURE_BINDING_2D,
        Target::Texture3D => gl::TEXTURE_BINDING_3D,
        Target::Texture1DArray => gl::TEXTURE_BINDING_1D_ARRAY,
        Target::Texture2DArray => gl::TEXTURE_BINDING_2D_ARRAY,
        Target::TextureRectangle => gl::TEXTURE_BINDING_RECTANGLE,
        Target::TextureCubeMap => gl::TEXTURE_BINDING_CUBE_MAP,
        Target::TransformFeedback => gl::TRANSFORM_FEEDBACK_BINDING,
        Target::VertexArray => gl::VERTEX_ARRAY_BINDING,
    }
}

impl From<IndexedTarget> for GLenum {
    fn from(target: IndexedTarget) -> Self {
        target.target().into()
    }
}

pub fn indexed_binding_query(target: IndexedTarget) -> GLenum {
    binding_query(target.target())
}

impl From<BufferUsage> for GLenum {
    fn from(usage: BufferUsage) -> Self {
        match usage {
            BufferUsage::StreamDraw => gl::STREAM_DRAW,
            BufferUsage::StreamRead => gl::STREAM_READ,
            BufferUsage::StreamCopy => gl::STREAM_COPY,
            BufferUsage::StaticDraw => gl::STATIC_DRAW,
            BufferUsage::StaticRead => gl::STATIC_READ,
            BufferUsage::StaticCopy => gl::STATIC_COPY,
            BufferUsage::DynamicDraw => gl::DYNAMIC_DRAW,
            BufferUsage::DynamicRead => gl::DYNAMIC_READ,
            BufferUsage::DynamicCopy => gl::DYNAMIC_COPY,
        }
    }
}

impl From<MapAccess> for GLenum {
    fn from(access: MapAccess) -> Self {
        match access {
            MapAccess::ReadOnly => gl::READ_ONLY,
            MapAccess::WriteOnly => gl::WRITE_ONLY,
            MapAccess::ReadWrite => gl::READ_WRITE,
        }
    }
}

impl From<MapAccessFlags> for GLbitfield {
    fn from(flags: MapAccessFlags) -> Self {
        let mut bits = 0;
        let table = [
            (MapAccessFlags::READ, gl::MAP_READ_BIT),
            (MapAccessFlags::WRITE, gl::MAP_WRITE_BIT),
            (MapAccessFlags::INVALIDATE_RANGE, gl::MAP_INVALIDATE_RANGE_BIT),
            (MapAccessFlags::INVALIDATE_BUFFER, gl::MAP_INVALIDATE_BUFFER_BIT),
            (MapAccessFlags::FLUSH_EXPLICIT, gl::MAP_FLUSH_EXPLICIT_BIT),
            (MapAccessFlags::UNSYNCHRONIZED, gl::MAP_UNSYNCHRONIZED_BIT),
        ];

        for &(flag, bit) in table.iter() {
            if flags.contains(flag) {
                bits |= bit;
            }
        }

        bits
    }
}

impl From<DataType> for GLenum {
    fn from(ty: DataType) -> Self {
        match ty {
            DataType::Byte => gl::BYTE,
            DataType::UnsignedByte => gl::UNSIGNED_BYTE,
            DataType::Short => gl::SHORT,
            DataType::UnsignedShort => gl::UNSIGNED_SHORT,
            DataType::Int => gl::INT,
            DataType::UnsignedInt => gl::UNSIGNED_INT,
            DataType::Fixed => gl::FIXED,
            DataType::HalfFloat => gl::HALF_FLOAT,
            DataType::Float => gl::FLOAT,
            DataType::Double => gl::DOUBLE,
        }
    }
}

impl From<PixelFormat> for GLenum {
    fn from(format: PixelFormat) -> Self {
        match format {
            PixelFormat::Red => gl::RED,
            PixelFormat::Rg => gl::RG,
            PixelFormat::Rgb => gl::RGB,
            PixelFormat::Bgr => gl::BGR,
            PixelFormat::Rgba => gl::RGBA,
            PixelFormat::Bgra => gl::BGRA,
            PixelFormat::Depth => gl::DEPTH_COMPONENT,
            PixelFormat::DepthStencil => gl::DEPTH_STENCIL,
        }
    }
}

impl From<InternalFormat> for GLenum {
    fn from(format: InternalFormat) -> Self {
        match format {
            InternalFormat::R8 => gl::R8,
            InternalFormat::Rg8 => gl::RG8,
            InternalFormat::Rgb8 => gl::RGB8,
            InternalFormat::Rgba8 => gl::RGBA8,
            InternalFormat::Srgb8 => gl::SRGB8,
            InternalFormat::Srgb8Alpha8 => gl::SRGB8_ALPHA8,
            InternalFormat::R16F => gl::R16F,
            InternalFormat::Rg16F => gl::RG16F,
            InternalFormat::Rgb16F => gl::RGB16F,
            InternalFormat::Rgba16F => gl::RGBA16F,
            InternalFormat::R32F => gl::R32F,
            InternalFormat::Rg32F => gl::RG32F,
            InternalFormat::Rgb32F => gl::RGB32F,
            InternalFormat::Rgba32F => gl::RGBA32F,
            InternalFormat::Depth16 => gl::DEPTH_COMPONENT16,
            InternalFormat::Depth24 => gl::DEPTH_COMPONENT24,
            InternalFormat::Depth32F => gl::DEPTH_COMPONENT32F,
            InternalFormat::Depth24Stencil8 => gl::DEPTH24_STENCIL8,
        }
    }
}

impl From<CubeFace> for GLenum {
    fn from(face: CubeFace) -> Self {
        match face {
            CubeFace::PositiveX => gl::TEXTURE_CUBE_MAP_POSITIVE_X,
            CubeFace::NegativeX => gl::TEXTURE_CUBE_MAP_NEGATIVE_X,
            CubeFace::PositiveY => gl::TEXTURE_CUBE_MAP_POSITIVE_Y,
            CubeFace::NegativeY => gl::TEXTURE_CUBE_MAP_NEGATIVE_Y,
            CubeFace::PositiveZ => gl::TEXTURE_CUBE_MAP_POSITIVE_Z,
            CubeFace::NegativeZ => gl::TEXTURE_CUBE_MAP_NEGATIVE_Z,
        }
    }
}

impl From<TextureFilter> for GLenum {
    fn from(filter: TextureFilter) -> Self {
        match filter {
            TextureFilter::Nearest => gl::NEAREST,
            TextureFilter::Linear => gl::LINEAR,
            TextureFilter::NearestMipmapNearest => gl::NEAREST_MIPMAP_NEAREST,
            TextureFilter::LinearMipmapNearest => gl::LINEAR_MIPMAP_NEAREST,
            TextureFilter::NearestMipmapLinear => gl::NEAREST_MIPMAP_LINEAR,
            TextureFilter::LinearMipmapLinear => gl::LINEAR_MIPMAP_LINEAR,
        }
    }
}

impl From<TextureWrap> for GLenum {
    fn from(wrap: TextureWrap) -> Self {
        match wrap {
            TextureWrap::Repeat => gl::REPEAT,
            TextureWrap::Mirror => gl::MIRRORED_REPEAT,
            TextureWrap::Clamp => gl::CLAMP_TO_EDGE,
            TextureWrap::ClampToBorder => gl::CLAMP_TO_BORDER,
        }
    }
}

/// Splits a texture parameter into the `glTexParameteri` name and value.
pub fn texture_parameter(param: TextureParameter) -> (GLenum, GLint) {
    match param {
        TextureParameter::MinFilter(v) => (gl::TEXTURE_MIN_FILTER, GLenum::from(v) as GLint),
        TextureParameter::MagFilter(v) => (gl::TEXTURE_MAG_FILTER, GLenum::from(v) as GLint),
        TextureParameter::WrapS(v) => (gl::TEXTURE_WRAP_S, GLenum::from(v) as GLint),
        TextureParameter::WrapT(v) => (gl::TEXTURE_WRAP_T, GLenum::from(v) as GLint),
        TextureParameter::WrapR(v) => (gl::TEXTURE_WRAP_R, GLenum::from(v) as GLint),
        TextureParameter::BaseLevel(v) => (gl::TEXTURE_BASE_LEVEL, v as GLint),
        TextureParameter::MaxLevel(v) => (gl::TEXTURE_MAX_LEVEL, v as GLint),
    }
}

impl From<FeedbackPrimitive> for GLenum {
    fn from(mode: FeedbackPrimitive) -> Self {
        match mode {
            FeedbackPrimitive::Points => gl::POINTS,
            FeedbackPrimitive::Lines => gl::LINES,
            FeedbackPrimitive::Triangles => gl::TRIANGLES,
        }
    }
}
