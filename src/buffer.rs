//! Buffer objects, typed by the target they are bound to.

use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;
use std::rc::Rc;
use std::slice;

use bytemuck::Pod;

use crate::context::Context;
use crate::driver::capabilities::{Capability, Profile};
use crate::enums::*;
use crate::errors::*;
use crate::handle::Handle;
use crate::resource::BoundResource;

/// The binding target a `Buffer` is used with.
pub trait BufferKind: 'static {
    const TARGET: Target;
    /// Driver support the target depends on, if any.
    const CAPABILITY: Option<Capability>;
}

/// Targets that own an array of indexed binding points.
pub trait IndexedBufferKind: BufferKind {
    const INDEXED: IndexedTarget;
}

macro_rules! buffer_kinds {
    ($($(#[$attr:meta])* $name:ident => $target:ident, $capability:expr;)+) => {
        $(
            $(#[$attr])*
            #[derive(Debug, Copy, Clone, PartialEq, Eq)]
            pub struct $name;

            impl BufferKind for $name {
                const TARGET: Target = Target::$target;
                const CAPABILITY: Option<Capability> = $capability;
            }
        )+
    };
}

buffer_kinds! {
    /// Vertex attributes.
    ArrayTarget => ArrayBuffer, None;
    /// Vertex indices.
    ElementArrayTarget => ElementArrayBuffer, None;
    TextureBufferTarget => TextureBuffer, Some(Capability::TextureBuffer);
    CopyReadTarget => CopyReadBuffer, Some(Capability::CopyBuffer);
    CopyWriteTarget => CopyWriteBuffer, Some(Capability::CopyBuffer);
    PixelPackTarget => PixelPackBuffer, Some(Capability::PixelBuffer);
    PixelUnpackTarget => PixelUnpackBuffer, Some(Capability::PixelBuffer);
    UniformTarget => UniformBuffer, Some(Capability::UniformBuffer);
    TransformFeedbackTarget => TransformFeedbackBuffer, Some(Capability::TransformFeedback);
}

impl IndexedBufferKind for UniformTarget {
    const INDEXED: IndexedTarget = IndexedTarget::UniformBuffer;
}

impl IndexedBufferKind for TransformFeedbackTarget {
    const INDEXED: IndexedTarget = IndexedTarget::TransformFeedbackBuffer;
}

pub type ArrayBuffer = Buffer<ArrayTarget>;
pub type IndexBuffer = Buffer<ElementArrayTarget>;
pub type TextureBuffer = Buffer<TextureBufferTarget>;
pub type CopyReadBuffer = Buffer<CopyReadTarget>;
pub type CopyWriteBuffer = Buffer<CopyWriteTarget>;
pub type PixelPackBuffer = Buffer<PixelPackTarget>;
pub type PixelUnpackBuffer = Buffer<PixelUnpackTarget>;
pub type UniformBuffer = Buffer<UniformTarget>;
pub type TransformFeedbackBuffer = Buffer<TransformFeedbackTarget>;

/// A buffer object used with the target `K`.
///
/// Clones share the underlying object. The same object can be used with other
/// targets through `cast`.
pub struct Buffer<K: BufferKind> {
    resource: BoundResource,
    _kind: PhantomData<K>,
}

impl<K: BufferKind> Clone for Buffer<K> {
    fn clone(&self) -> Self {
        Buffer {
            resource: self.resource.clone(),
            _kind: PhantomData,
        }
    }
}

impl<K: BufferKind> fmt::Debug for Buffer<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Buffer<{}>({:?})", K::TARGET, self.resource.handle())
    }
}

impl<K: BufferKind> Buffer<K> {
    /// Creates a new buffer object without a data store.
    pub fn new(ctx: &Rc<Context>) -> Result<Self> {
        if let Some(capability) = K::CAPABILITY {
            ctx.require(capability)?;
        }

        let handle = Handle::create(ctx, ObjectKind::Buffer)?;
        Ok(Buffer::wrap(handle))
    }

    /// Wraps an existing buffer handle.
    pub fn from_handle(handle: Handle) -> Result<Self> {
        if handle.kind() != ObjectKind::Buffer {
            return Err(Error::InvalidHandle(ObjectKind::Buffer));
        }

        if let Some(capability) = K::CAPABILITY {
            handle.context()?.require(capability)?;
        }

        Ok(Buffer::wrap(handle))
    }

    fn wrap(handle: Handle) -> Self {
        Buffer {
            resource: BoundResource::new(handle, K::TARGET),
            _kind: PhantomData,
        }
    }

    /// Shares this buffer object with another target.
    pub fn cast<T: BufferKind>(&self) -> Result<Buffer<T>> {
        Buffer::from_handle(self.resource.handle().clone())
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

    #[inline]
    pub fn bind(&self) -> Result<()> {
        self.resource.bind()
    }

    #[inline]
    pub fn unbind(&self) -> Result<()> {
        self.resource.unbind()
    }

    #[inline]
    pub fn is_current(&self) -> Result<bool> {
        self.resource.is_current()
    }

    /// Gives up this owner's share of the buffer object.
    pub fn release(&mut self) {
        self.resource.release();
    }

    /// Replaces the data store with a copy of `bytes`.
    pub fn data(&self, bytes: &[u8], usage: BufferUsage) -> Result<()> {
        let ctx = self.prepare_store("data")?;
        ctx.call(|v| unsafe { v.buffer_data(K::TARGET, bytes.len(), Some(bytes), usage) })
    }

    /// Replaces the data store with a copy of `data`.
    pub fn data_typed<T: Pod>(&self, data: &[T], usage: BufferUsage) -> Result<()> {
        self.data(bytemuck::cast_slice(data), usage)
    }

    /// Replaces the data store with `size` bytes of undefined content.
    pub fn reserve(&self, size: usize, usage: BufferUsage) -> Result<()> {
        let ctx = self.prepare_store("reserve")?;
        ctx.call(|v| unsafe { v.buffer_data(K::TARGET, size, None, usage) })
    }

    /// Overwrites the store starting at `offset`.
    pub fn sub_data(&self, offset: usize, bytes: &[u8]) -> Result<()> {
        let ctx = self.prepare_store("sub_data")?;

        if ctx.settings().validation {
            let size = ctx.call(|v| unsafe { v.buffer_size(K::TARGET) })?;
            if exceeds(offset, bytes.len(), size) {
                return Err(Error::OutOfBounds);
            }
        }

        ctx.call(|v| unsafe { v.buffer_sub_data(K::TARGET, offset, bytes) })
    }

    pub fn sub_data_typed<T: Pod>(&self, offset: usize, data: &[T]) -> Result<()> {
        self.sub_data(offset, bytemuck::cast_slice(data))
    }

    /// Size of the data store in bytes.
    pub fn size(&self) -> Result<usize> {
        self.resource.require_current("size")?;
        let ctx = self.resource.context()?;
        ctx.call(|v| unsafe { v.buffer_size(K::TARGET) })
    }

    /// Maps the whole data store into client memory until the returned guard drops.
    pub fn map(&mut self, access: MapAccess) -> Result<BufferMap<'_>> {
        self.resource.require_current("map")?;
        let ctx = self.resource.context()?;
        let id = self.id();

        ctx.begin_mapping(id)?;
        let mapped = ctx.call(|v| unsafe {
            let len = v.buffer_size(K::TARGET)?;
            let ptr = v.map_buffer(K::TARGET, access)?;
            Ok((ptr, len))
        });

        match mapped {
            Ok((ptr, len)) => Ok(BufferMap::new(ctx, id, K::TARGET, ptr, len, access.writable())),
            Err(err) => {
                ctx.end_mapping(id)?;
                Err(err)
            }
        }
    }

    /// Maps `len` bytes starting at `offset` into client memory until the returned
    /// guard drops.
    pub fn map_range(
        &mut self,
        offset: usize,
        len: usize,
        access: MapAccessFlags,
    ) -> Result<BufferMap<'_>> {
        let ctx = self.resource.context()?;
        ctx.require(Capability::MapBufferRange)?;
        self.resource.require_current("map_range")?;

        if ctx.settings().validation {
            let size = ctx.call(|v| unsafe { v.buffer_size(K::TARGET) })?;
            if exceeds(offset, len, size) {
                return Err(Error::OutOfBounds);
            }
        }

        let id = self.id();
        ctx.begin_mapping(id)?;
        let mapped = ctx.call(|v| unsafe { v.map_buffer_range(K::TARGET, offset, len, access) });

        match mapped {
            Ok(ptr) => {
                let writable = access.contains(MapAccessFlags::WRITE);
                Ok(BufferMap::new(ctx, id, K::TARGET, ptr, len, writable))
            }
            Err(err) => {
                ctx.end_mapping(id)?;
                Err(err)
            }
        }
    }

    fn prepare_store(&self, operation: &'static str) -> Result<&Rc<Context>> {
        self.resource.require_current(operation)?;
        let ctx = self.resource.context()?;

        if ctx.settings().validation {
            if ctx.is_mapped(self.id()) {
                return Err(Error::AlreadyMapped(self.id()));
            }

            if K::TARGET == Target::ArrayBuffer
                && ctx.capabilities().profile == Some(Profile::Core)
                && ctx.query(Target::VertexArray)? == 0
            {
                warn!(
                    "{} uploads {} while no vertex array object is bound, core profiles \
                     will refuse to draw from it.",
                    self.resource.handle(),
                    K::TARGET
                );
            }
        }

        Ok(ctx)
    }
}

impl<K: IndexedBufferKind> Buffer<K> {
    /// Binds the whole buffer to the binding point `index`.
    pub fn bind_base(&self, index: u32) -> Result<()> {
        let ctx = self.resource.context()?;
        ctx.bind_indexed(K::INDEXED, index, self.id())
    }

    /// Binds `size` bytes starting at `offset` to the binding point `index`.
    pub fn bind_range(&self, index: u32, offset: usize, size: usize) -> Result<()> {
        let ctx = self.resource.context()?;
        ctx.bind_indexed_range(K::INDEXED, index, self.id(), offset, size)
    }

    /// Whether this buffer is bound to the binding point `index`.
    pub fn is_bound_at(&self, index: u32) -> Result<bool> {
        let ctx = self.resource.context()?;
        Ok(ctx.query_indexed(K::INDEXED, index)? == self.id())
    }

    /// Clears the binding point `index`. With validation enabled this buffer has to
    /// be the one bound there.
    pub fn unbind_base(&self, index: u32) -> Result<()> {
        let ctx = self.resource.context()?;

        if ctx.settings().validation && !self.is_bound_at(index)? {
            return Err(Error::Binding {
                resource: self.handle().to_string(),
                operation: "unbind_base",
                target: K::TARGET,
            });
        }

        ctx.unbind_indexed(K::INDEXED, index)
    }
}

/// Whether `len` bytes at `offset` reach past the end of a `size` byte store.
#[inline]
fn exceeds(offset: usize, len: usize, size: usize) -> bool {
    offset.checked_add(len).map_or(true, |end| end > size)
}

/// A live mapping of a buffer data store.
///
/// Dereferences to the mapped bytes. The store is unmapped when the guard drops,
/// whatever path leaves the scope.
pub struct BufferMap<'a> {
    ctx: Rc<Context>,
    id: u32,
    target: Target,
    ptr: *mut u8,
    len: usize,
    writable: bool,
    unmapped: bool,
    _borrow: PhantomData<&'a mut [u8]>,
}

impl<'a> BufferMap<'a> {
    fn new(
        ctx: &Rc<Context>,
        id: u32,
        target: Target,
        ptr: *mut u8,
        len: usize,
        writable: bool,
    ) -> Self {
        BufferMap {
            ctx: ctx.clone(),
            id,
            target,
            ptr,
            len,
            writable,
            unmapped: false,
            _borrow: PhantomData,
        }
    }

    /// Number of mapped bytes.
    #[inline]
    pub fn size(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    pub fn as_slice(&self) -> &[u8] {
        if self.len == 0 || self.ptr.is_null() {
            return &[];
        }

        unsafe { slice::from_raw_parts(self.ptr, self.len) }
    }

    /// The mapped bytes, if the mapping was created with write access.
    pub fn as_mut_slice(&mut self) -> Result<&mut [u8]> {
        if !self.writable {
            return Err(Error::ReadOnly(self.id));
        }

        if self.len == 0 || self.ptr.is_null() {
            return Ok(&mut []);
        }

        Ok(unsafe { slice::from_raw_parts_mut(self.ptr, self.len) })
    }

    /// Views the mapped bytes as a slice of `T`.
    pub fn typed<T: Pod>(&self) -> Result<&[T]> {
        bytemuck::try_cast_slice(self.as_slice()).map_err(|err| Error::Layout(format!("{:?}", err)))
    }

    pub fn typed_mut<T: Pod>(&mut self) -> Result<&mut [T]> {
        let bytes = self.as_mut_slice()?;
        bytemuck::try_cast_slice_mut(bytes).map_err(|err| Error::Layout(format!("{:?}", err)))
    }

    /// Unmaps the store now. Returns `false` if its contents were corrupted while
    /// mapped and have to be uploaded again.
    pub fn unmap(mut self) -> Result<bool> {
        self.finish()
    }

    fn finish(&mut self) -> Result<bool> {
        if self.unmapped {
            return Ok(true);
        }

        self.unmapped = true;
        self.ctx.end_mapping(self.id)?;

        if self.ctx.query(self.target)? != self.id {
            warn!(
                "Buffer #{} was unbound from {} while mapped, binding it again to unmap.",
                self.id, self.target
            );

            self.ctx.bind(self.target, self.id)?;
        }

        let target = self.target;
        self.ctx.call(|v| unsafe { v.unmap_buffer(target) })
    }
}

impl<'a> Deref for BufferMap<'a> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl<'a> Drop for BufferMap<'a> {
    fn drop(&mut self) {
        if let Err(err) = self.finish() {
            error!("Failed to unmap Buffer #{}. {}", self.id, err);
        }
    }
}

impl<'a> fmt::Debug for BufferMap<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("BufferMap")
            .field("id", &self.id)
            .field("target", &self.target)
            .field("size", &self.len)
            .field("writable", &self.writable)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::settings::Settings;

    #[test]
    fn kinds() {
        let ctx = Context::headless(Settings::default());
        let buf = ArrayBuffer::new(&ctx).unwrap();
        assert_eq!(buf.target(), Target::ArrayBuffer);
        assert_eq!(buf.cast::<CopyWriteTarget>().unwrap().id(), buf.id());

        assert_eq!(UniformTarget::INDEXED.target(), UniformTarget::TARGET);
        assert_eq!(
            TransformFeedbackTarget::INDEXED.target(),
            TransformFeedbackTarget::TARGET
        );
    }

    #[test]
    fn ranges_past_the_end() {
        let ctx = Context::headless(Settings::validated());
        let mut buf = CopyWriteBuffer::new(&ctx).unwrap();
        buf.bind().unwrap();
        buf.reserve(4, BufferUsage::DynamicDraw).unwrap();

        let max = usize::max_value();
        for v in &[buf.sub_data(max, &[1]), buf.sub_data(3, &[1, 2])] {
            match v {
                Err(Error::OutOfBounds) => {}
                v => panic!("{:?}", v),
            }
        }

        match buf.map_range(max, 2, MapAccessFlags::READ) {
            Err(Error::OutOfBounds) => {}
            v => panic!("{:?}", v),
        }

        assert!(!ctx.is_mapped(buf.id()));
        buf.sub_data(2, &[1, 2]).unwrap();
    }

    #[test]
    fn read_only_mapping() {
        let ctx = Context::headless(Settings::validated());
        let mut buf = CopyReadBuffer::new(&ctx).unwrap();
        buf.bind().unwrap();
        buf.data(&[1, 2, 3, 4], BufferUsage::StaticRead).unwrap();

        let mut map = buf.map(MapAccess::ReadOnly).unwrap();
        assert_eq!(&map[..], &[1, 2, 3, 4]);
        assert!(map.as_mut_slice().is_err());
        assert!(map.unmap().unwrap());
    }
}
