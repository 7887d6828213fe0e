//! A driver that keeps every object in client memory.
//!
//! It follows the OpenGL error rules closely enough to exercise the wrappers without a
//! GPU, and records every call it receives into a `Journal`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use cgmath::Vector3;

use crate::enums::*;
use crate::errors::*;

use super::capabilities::Capabilities;
use super::{Driver, ImageDesc};

/// One recorded driver call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Create(ObjectKind, u32),
    Delete(ObjectKind, u32),
    Bind(Target, u32),
    BindIndexed(IndexedTarget, u32, u32),
    Binding(Target),
    IndexedBinding(IndexedTarget, u32),
    BufferData(Target, usize),
    BufferSubData(Target, usize, usize),
    BufferSize(Target),
    Map(Target),
    MapRange(Target, usize, usize),
    Unmap(Target),
    ActiveTexture(u32),
    TexImage(Target, u32),
    TexSubImage(Target, u32),
    TexParameter(Target, TextureParameter),
    GenerateMipmap(Target),
    BeginFeedback(FeedbackPrimitive),
    EndFeedback,
    PauseFeedback,
    ResumeFeedback,
}

/// Shared, ordered record of the calls a `HeadlessDriver` received. Cloning the
/// journal yields another view of the same record.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    calls: Rc<RefCell<Vec<Call>>>,
}

impl Journal {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.borrow().is_empty()
    }

    /// Counts the calls matching `pred`.
    pub fn count<F>(&self, pred: F) -> usize
    where
        F: Fn(&Call) -> bool,
    {
        self.calls.borrow().iter().filter(|v| pred(v)).count()
    }

    /// Index of the first call matching `pred`.
    pub fn position<F>(&self, pred: F) -> Option<usize>
    where
        F: Fn(&Call) -> bool,
    {
        self.calls.borrow().iter().position(|v| pred(v))
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    fn push(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

#[derive(Debug, Default)]
struct BufferStore {
    data: Vec<u8>,
    mapped: bool,
}

#[derive(Debug, Default)]
struct TextureStore {
    target: Option<Target>,
    images: HashMap<(Option<CubeFace>, u32), (ImageDesc, Vec<u8>)>,
    mipmapped: bool,
}

#[derive(Debug, Default, Clone, Copy)]
struct FeedbackStore {
    active: Option<FeedbackPrimitive>,
    paused: bool,
}

#[derive(Debug)]
enum Object {
    Buffer(BufferStore),
    Texture(TextureStore),
    TransformFeedback(FeedbackStore),
    VertexArray,
}

impl Object {
    fn kind(&self) -> ObjectKind {
        match *self {
            Object::Buffer(_) => ObjectKind::Buffer,
            Object::Texture(_) => ObjectKind::Texture,
            Object::TransformFeedback(_) => ObjectKind::TransformFeedback,
            Object::VertexArray => ObjectKind::VertexArray,
        }
    }
}

pub struct HeadlessDriver {
    capabilities: Capabilities,
    journal: Journal,
    next: u32,
    objects: HashMap<u32, Object>,
    // Texture targets are keyed by the texture unit, everything else by unit 0.
    bindings: HashMap<(u32, Target), u32>,
    indexed: HashMap<(IndexedTarget, u32), u32>,
    active_unit: u32,
    default_feedback: FeedbackStore,
}

impl Default for HeadlessDriver {
    fn default() -> Self {
        HeadlessDriver::new()
    }
}

impl HeadlessDriver {
    /// Creates a driver that supports every capability.
    pub fn new() -> Self {
        HeadlessDriver::with_capabilities(Capabilities::full())
    }

    pub fn with_capabilities(capabilities: Capabilities) -> Self {
        HeadlessDriver {
            capabilities,
            journal: Journal::default(),
            next: 1,
            objects: HashMap::new(),
            bindings: HashMap::new(),
            indexed: HashMap::new(),
            active_unit: 0,
            default_feedback: FeedbackStore::default(),
        }
    }

    /// Another view of the call journal, usable after the driver has been boxed.
    pub fn journal(&self) -> Journal {
        self.journal.clone()
    }

    #[inline]
    fn slot(&self, target: Target) -> (u32, Target) {
        if target.kind() == ObjectKind::Texture {
            (self.active_unit, target)
        } else {
            (0, target)
        }
    }

    #[inline]
    fn bound(&self, target: Target) -> u32 {
        self.bindings
            .get(&self.slot(target))
            .cloned()
            .unwrap_or(0)
    }

    fn bound_buffer(&mut self, target: Target, op: &str) -> Result<&mut BufferStore> {
        let id = self.bound(target);
        match self.objects.get_mut(&id) {
            Some(Object::Buffer(buf)) if id != 0 => Ok(buf),
            _ => driver_bail!(
                "GL_INVALID_OPERATION: {} with no buffer bound to {}.",
                op,
                target
            ),
        }
    }

    fn bound_texture(&mut self, target: Target, op: &str) -> Result<&mut TextureStore> {
        let id = self.bound(target);
        match self.objects.get_mut(&id) {
            Some(Object::Texture(tex)) if id != 0 => Ok(tex),
            _ => driver_bail!(
                "GL_INVALID_OPERATION: {} with no texture bound to {}.",
                op,
                target
            ),
        }
    }

    fn current_feedback(&mut self) -> &mut FeedbackStore {
        let id = self.bound(Target::TransformFeedback);
        match self.objects.get_mut(&id) {
            Some(Object::TransformFeedback(v)) => v,
            _ => &mut self.default_feedback,
        }
    }

    fn indexed_limit(&self, target: IndexedTarget) -> u32 {
        match target {
            IndexedTarget::UniformBuffer => self.capabilities.max_uniform_buffer_bindings,
            IndexedTarget::TransformFeedbackBuffer => {
                self.capabilities.max_transform_feedback_buffers
            }
        }
    }

    fn check_face(target: Target, face: Option<CubeFace>) -> Result<()> {
        match (target == Target::TextureCubeMap, face.is_some()) {
            (true, false) => driver_bail!("GL_INVALID_ENUM: cube map images need a face."),
            (false, true) => driver_bail!("GL_INVALID_ENUM: {} has no faces.", target),
            _ => Ok(()),
        }
    }
}

impl Driver for HeadlessDriver {
    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    unsafe fn create_object(&mut self, kind: ObjectKind) -> Result<u32> {
        let id = self.next;
        self.next += 1;

        let object = match kind {
            ObjectKind::Buffer => Object::Buffer(BufferStore::default()),
            ObjectKind::Texture => Object::Texture(TextureStore::default()),
            ObjectKind::TransformFeedback => Object::TransformFeedback(FeedbackStore::default()),
            ObjectKind::VertexArray => Object::VertexArray,
        };

        self.objects.insert(id, object);
        self.journal.push(Call::Create(kind, id));
        Ok(id)
    }

    unsafe fn delete_object(&mut self, kind: ObjectKind, id: u32) -> Result<()> {
        self.journal.push(Call::Delete(kind, id));

        match self.objects.get(&id) {
            Some(Object::TransformFeedback(v)) if v.active.is_some() => driver_bail!(
                "GL_INVALID_OPERATION: TransformFeedback #{} is active and can not be deleted.",
                id
            ),
            Some(v) if v.kind() == kind => {}
            // Unused names are silently ignored.
            _ => return Ok(()),
        }

        self.objects.remove(&id);
        self.bindings
            .retain(|&(_, target), v| !(target.kind() == kind && *v == id));

        if kind == ObjectKind::Buffer {
            self.indexed.retain(|_, v| *v != id);
        }

        Ok(())
    }

    unsafe fn bind(&mut self, target: Target, id: u32) -> Result<()> {
        self.journal.push(Call::Bind(target, id));

        if target == Target::TransformFeedback {
            let current = *self.current_feedback();
            if current.active.is_some() && !current.paused && self.bound(target) != id {
                driver_bail!(
                    "GL_INVALID_OPERATION: the current transform feedback is active and not paused."
                );
            }
        }

        if id != 0 {
            match self.objects.get_mut(&id) {
                Some(Object::Texture(tex)) if target.kind() == ObjectKind::Texture => {
                    match tex.target {
                        Some(v) if v != target => driver_bail!(
                            "GL_INVALID_OPERATION: Texture #{} was created as {}, not {}.",
                            id,
                            v,
                            target
                        ),
                        _ => tex.target = Some(target),
                    }
                }
                Some(v) if v.kind() == target.kind() => {}
                _ => driver_bail!(
                    "GL_INVALID_OPERATION: #{} is not a {} name.",
                    id,
                    target.kind()
                ),
            }
        }

        let slot = self.slot(target);
        self.bindings.insert(slot, id);
        Ok(())
    }

    unsafe fn bind_indexed(&mut self, target: IndexedTarget, index: u32, id: u32) -> Result<()> {
        self.journal.push(Call::BindIndexed(target, index, id));

        if index >= self.indexed_limit(target) {
            driver_bail!("GL_INVALID_VALUE: {} index {} is out of range.", target, index);
        }

        if id != 0 {
            match self.objects.get(&id) {
                Some(Object::Buffer(_)) => {}
                _ => driver_bail!("GL_INVALID_OPERATION: #{} is not a Buffer name.", id),
            }
        }

        self.indexed.insert((target, index), id);
        self.bindings.insert((0, target.target()), id);
        Ok(())
    }

    unsafe fn bind_indexed_range(
        &mut self,
        target: IndexedTarget,
        index: u32,
        id: u32,
        offset: usize,
        size: usize,
    ) -> Result<()> {
        if id != 0 {
            if size == 0 {
                driver_bail!("GL_INVALID_VALUE: range size must be greater than zero.");
            }

            if let Some(Object::Buffer(buf)) = self.objects.get(&id) {
                if exceeds(offset, size, buf.data.len()) {
                    driver_bail!("GL_INVALID_VALUE: range exceeds the buffer store.");
                }
            }
        }

        self.bind_indexed(target, index, id)
    }

    unsafe fn binding(&mut self, target: Target) -> Result<u32> {
        self.journal.push(Call::Binding(target));
        Ok(self.bound(target))
    }

    unsafe fn indexed_binding(&mut self, target: IndexedTarget, index: u32) -> Result<u32> {
        self.journal.push(Call::IndexedBinding(target, index));

        if index >= self.indexed_limit(target) {
            driver_bail!("GL_INVALID_VALUE: {} index {} is out of range.", target, index);
        }

        Ok(self.indexed.get(&(target, index)).cloned().unwrap_or(0))
    }

    unsafe fn buffer_data(
        &mut self,
        target: Target,
        size: usize,
        bytes: Option<&[u8]>,
        _: BufferUsage,
    ) -> Result<()> {
        self.journal.push(Call::BufferData(target, size));

        let buf = self.bound_buffer(target, "glBufferData")?;
        if buf.mapped {
            driver_bail!("GL_INVALID_OPERATION: glBufferData on a mapped buffer.");
        }

        buf.data = match bytes {
            Some(bytes) => bytes[..size].to_vec(),
            None => vec![0; size],
        };

        Ok(())
    }

    unsafe fn buffer_sub_data(
        &mut self,
        target: Target,
        offset: usize,
        bytes: &[u8],
    ) -> Result<()> {
        self.journal
            .push(Call::BufferSubData(target, offset, bytes.len()));

        let buf = self.bound_buffer(target, "glBufferSubData")?;
        if buf.mapped {
            driver_bail!("GL_INVALID_OPERATION: glBufferSubData on a mapped buffer.");
        }

        if exceeds(offset, bytes.len(), buf.data.len()) {
            driver_bail!("GL_INVALID_VALUE: glBufferSubData range exceeds the buffer store.");
        }

        buf.data[offset..offset + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    unsafe fn buffer_size(&mut self, target: Target) -> Result<usize> {
        self.journal.push(Call::BufferSize(target));
        Ok(self.bound_buffer(target, "glGetBufferParameteriv")?.data.len())
    }

    unsafe fn map_buffer(&mut self, target: Target, _: MapAccess) -> Result<*mut u8> {
        self.journal.push(Call::Map(target));

        let buf = self.bound_buffer(target, "glMapBuffer")?;
        if buf.mapped {
            driver_bail!("GL_INVALID_OPERATION: buffer is already mapped.");
        }

        buf.mapped = true;
        Ok(buf.data.as_mut_ptr())
    }

    unsafe fn map_buffer_range(
        &mut self,
        target: Target,
        offset: usize,
        len: usize,
        access: MapAccessFlags,
    ) -> Result<*mut u8> {
        self.journal.push(Call::MapRange(target, offset, len));

        if !access.intersects(MapAccessFlags::READ | MapAccessFlags::WRITE) {
            driver_bail!("GL_INVALID_OPERATION: neither READ nor WRITE access requested.");
        }

        let buf = self.bound_buffer(target, "glMapBufferRange")?;
        if buf.mapped {
            driver_bail!("GL_INVALID_OPERATION: buffer is already mapped.");
        }

        if len == 0 || exceeds(offset, len, buf.data.len()) {
            driver_bail!("GL_INVALID_VALUE: glMapBufferRange range is invalid.");
        }

        buf.mapped = true;
        Ok(buf.data.as_mut_ptr().add(offset))
    }

    unsafe fn unmap_buffer(&mut self, target: Target) -> Result<bool> {
        self.journal.push(Call::Unmap(target));

        let buf = self.bound_buffer(target, "glUnmapBuffer")?;
        if !buf.mapped {
            driver_bail!("GL_INVALID_OPERATION: buffer is not mapped.");
        }

        buf.mapped = false;
        Ok(true)
    }

    unsafe fn active_texture(&mut self, unit: u32) -> Result<()> {
        self.journal.push(Call::ActiveTexture(unit));

        if unit >= self.capabilities.max_combined_texture_image_units {
            driver_bail!("GL_INVALID_ENUM: texture unit {} is out of range.", unit);
        }

        self.active_unit = unit;
        Ok(())
    }

    unsafe fn tex_image(
        &mut self,
        target: Target,
        face: Option<CubeFace>,
        level: u32,
        desc: ImageDesc,
        bytes: Option<&[u8]>,
    ) -> Result<()> {
        self.journal.push(Call::TexImage(target, level));
        Self::check_face(target, face)?;

        if target == Target::TextureRectangle && level != 0 {
            driver_bail!("GL_INVALID_VALUE: rectangle textures have a single level.");
        }

        let len = match desc.len() {
            Some(v) => v,
            None => driver_bail!("GL_OUT_OF_MEMORY: image is too large."),
        };

        let data = match bytes {
            Some(bytes) if bytes.len() < len => {
                driver_bail!("GL_INVALID_OPERATION: not enough pixel data.")
            }
            Some(bytes) => bytes[..len].to_vec(),
            None => vec![0; len],
        };

        let tex = self.bound_texture(target, "glTexImage")?;
        tex.images.insert((face, level), (desc, data));
        Ok(())
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
        self.journal.push(Call::TexSubImage(target, level));
        Self::check_face(target, face)?;

        match desc.len() {
            Some(len) if bytes.len() >= len => {}
            _ => driver_bail!("GL_INVALID_OPERATION: not enough pixel data."),
        }

        let tex = self.bound_texture(target, "glTexSubImage")?;
        let (image, data) = match tex.images.get_mut(&(face, level)) {
            Some(v) => v,
            None => driver_bail!("GL_INVALID_OPERATION: level {} is not defined.", level),
        };

        if exceeds(offset.x as usize, desc.extent.x as usize, image.extent.x as usize)
            || exceeds(offset.y as usize, desc.extent.y as usize, image.extent.y as usize)
            || exceeds(offset.z as usize, desc.extent.z as usize, image.extent.z as usize)
        {
            driver_bail!("GL_INVALID_VALUE: sub-image exceeds the texture image.");
        }

        let texel = image.texel_size();
        if desc.texel_size() != texel {
            driver_bail!("GL_INVALID_OPERATION: pixel layout does not match the image.");
        }

        let row = desc.extent.x as usize * texel;
        for z in 0..desc.extent.z as usize {
            for y in 0..desc.extent.y as usize {
                let src = (z * desc.extent.y as usize + y) * row;
                let dz = offset.z as usize + z;
                let dy = offset.y as usize + y;
                let dst = ((dz * image.extent.y as usize + dy) * image.extent.x as usize
                    + offset.x as usize)
                    * texel;
                data[dst..dst + row].copy_from_slice(&bytes[src..src + row]);
            }
        }

        Ok(())
    }

    unsafe fn tex_parameter(&mut self, target: Target, param: TextureParameter) -> Result<()> {
        self.journal.push(Call::TexParameter(target, param));

        if let TextureParameter::MagFilter(v) = param {
            if v.uses_mipmaps() {
                driver_bail!("GL_INVALID_ENUM: magnification filters can not use mipmaps.");
            }
        }

        self.bound_texture(target, "glTexParameter")?;
        Ok(())
    }

    unsafe fn generate_mipmap(&mut self, target: Target) -> Result<()> {
        self.journal.push(Call::GenerateMipmap(target));

        if target == Target::TextureRectangle {
            driver_bail!("GL_INVALID_ENUM: rectangle textures have no mipmaps.");
        }

        let tex = self.bound_texture(target, "glGenerateMipmap")?;
        if !tex.images.keys().any(|&(_, level)| level == 0) {
            driver_bail!("GL_INVALID_OPERATION: the base level is not defined.");
        }

        tex.mipmapped = true;
        Ok(())
    }

    unsafe fn begin_feedback(&mut self, mode: FeedbackPrimitive) -> Result<()> {
        self.journal.push(Call::BeginFeedback(mode));

        let fb = self.current_feedback();
        if fb.active.is_some() {
            driver_bail!("GL_INVALID_OPERATION: transform feedback is already active.");
        }

        fb.active = Some(mode);
        fb.paused = false;
        Ok(())
    }

    unsafe fn end_feedback(&mut self) -> Result<()> {
        self.journal.push(Call::EndFeedback);

        let fb = self.current_feedback();
        if fb.active.is_none() {
            driver_bail!("GL_INVALID_OPERATION: transform feedback is not active.");
        }

        fb.active = None;
        fb.paused = false;
        Ok(())
    }

    unsafe fn pause_feedback(&mut self) -> Result<()> {
        self.journal.push(Call::PauseFeedback);

        let fb = self.current_feedback();
        if fb.active.is_none() || fb.paused {
            driver_bail!("GL_INVALID_OPERATION: transform feedback is not running.");
        }

        fb.paused = true;
        Ok(())
    }

    unsafe fn resume_feedback(&mut self) -> Result<()> {
        self.journal.push(Call::ResumeFeedback);

        let fb = self.current_feedback();
        if fb.active.is_none() || !fb.paused {
            driver_bail!("GL_INVALID_OPERATION: transform feedback is not paused.");
        }

        fb.paused = false;
        Ok(())
    }
}

/// Whether `len` bytes at `offset` reach past `limit`, overflow included.
fn exceeds(offset: usize, len: usize, limit: usize) -> bool {
    offset.checked_add(len).map_or(true, |end| end > limit)
}
