//! The object every wrapper goes through to reach the driver.
//!
//! A `Context` owns one driver, its capability table, the binding cache and the
//! settings. It is shared through `Rc` by all the handles created from it and is
//! not meant to leave the thread its driver belongs to.

use std::cell::{RefCell, RefMut};
use std::collections::HashSet;
use std::rc::Rc;

use crate::binding::BindingTable;
use crate::driver::capabilities::{Capabilities, Capability};
use crate::driver::{self, Driver};
use crate::enums::{IndexedTarget, ObjectKind, Target};
use crate::errors::*;
use crate::settings::Settings;

pub struct Context {
    driver: RefCell<Box<dyn Driver>>,
    capabilities: Capabilities,
    settings: Settings,
    bindings: RefCell<BindingTable>,
    mapped: RefCell<HashSet<u32>>,
}

impl Context {
    /// Creates a context on top of `driver`.
    pub fn new(driver: Box<dyn Driver>, settings: Settings) -> Rc<Context> {
        let capabilities = driver.capabilities().clone();
        info!("Context {:#?}", settings);
        info!("Capabilities {:#?}", capabilities);

        Rc::new(Context {
            driver: RefCell::new(driver),
            capabilities,
            settings,
            bindings: RefCell::new(BindingTable::new()),
            mapped: RefCell::new(HashSet::new()),
        })
    }

    /// Creates a context on top of the headless driver.
    pub fn headless(settings: Settings) -> Rc<Context> {
        Context::new(driver::new_headless(), settings)
    }

    /// Creates a context on top of the OpenGL driver.
    ///
    /// # Safety
    ///
    /// The GL function pointers must be loaded and their context must be current on
    /// this thread for as long as the returned context is alive.
    #[cfg(not(target_arch = "wasm32"))]
    pub unsafe fn gl(settings: Settings) -> Result<Rc<Context>> {
        Ok(Context::new(driver::new()?, settings))
    }

    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[inline]
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Fails with `Error::Unsupported` if dependency checks are enabled and the
    /// driver does not provide `capability`.
    pub fn require(&self, capability: Capability) -> Result<()> {
        if self.settings.check_dependencies && !self.capabilities.has(capability) {
            return Err(Error::Unsupported(capability));
        }

        Ok(())
    }

    /// Raw access to the driver.
    ///
    /// Calls made through it bypass the binding cache. That is harmless, since
    /// binding queries always re-read the driver.
    ///
    /// The driver stays borrowed until the returned guard drops. Any wrapper call made
    /// meanwhile, including the deletion of a dropped handle, fails with
    /// `Error::Driver`.
    pub fn driver(&self) -> RefMut<'_, dyn Driver + 'static> {
        RefMut::map(self.driver.borrow_mut(), |v| &mut **v)
    }

    /// Runs `func` with exclusive access to the driver.
    pub(crate) fn call<T, F>(&self, func: F) -> Result<T>
    where
        F: FnOnce(&mut dyn Driver) -> Result<T>,
    {
        let mut driver = match self.driver.try_borrow_mut() {
            Ok(v) => v,
            Err(_) => driver_bail!("The driver is already borrowed through `Context::driver`."),
        };

        func(&mut **driver)
    }

    /// Makes `id` the current object of `target`.
    pub fn bind(&self, target: Target, id: u32) -> Result<()> {
        if self.settings.diagnostics {
            trace!("Bind {} #{}.", target, id);
        }

        self.call(|v| unsafe { v.bind(target, id) })?;
        self.bindings.borrow_mut().set(target, id);
        Ok(())
    }

    /// Binds 0 to `target`.
    #[inline]
    pub fn unbind(&self, target: Target) -> Result<()> {
        self.bind(target, 0)
    }

    /// Binds `id` to the binding point `index` of `target`, and to its generic
    /// binding point as well.
    pub fn bind_indexed(&self, target: IndexedTarget, index: u32, id: u32) -> Result<()> {
        self.check_index(target, index)?;

        if self.settings.diagnostics {
            trace!("Bind {}[{}] #{}.", target, index, id);
        }

        self.call(|v| unsafe { v.bind_indexed(target, index, id) })?;
        self.bindings.borrow_mut().set_indexed(target, index, id);
        Ok(())
    }

    /// Binds the `size` bytes starting at `offset` of the buffer `id` to the binding
    /// point `index` of `target`.
    pub fn bind_indexed_range(
        &self,
        target: IndexedTarget,
        index: u32,
        id: u32,
        offset: usize,
        size: usize,
    ) -> Result<()> {
        self.check_index(target, index)?;

        if self.settings.diagnostics {
            trace!(
                "Bind {}[{}] #{} ({} bytes at {}).",
                target,
                index,
                id,
                size,
                offset
            );
        }

        self.call(|v| unsafe { v.bind_indexed_range(target, index, id, offset, size) })?;
        self.bindings.borrow_mut().set_indexed(target, index, id);
        Ok(())
    }

    #[inline]
    pub fn unbind_indexed(&self, target: IndexedTarget, index: u32) -> Result<()> {
        self.bind_indexed(target, index, 0)
    }

    /// Selects the texture unit later texture binds apply to.
    pub fn active_texture(&self, unit: u32) -> Result<()> {
        if unit >= self.capabilities.max_combined_texture_image_units {
            return Err(Error::OutOfBounds);
        }

        self.call(|v| unsafe { v.active_texture(unit) })?;
        self.bindings.borrow_mut().set_active_unit(unit);
        Ok(())
    }

    #[inline]
    pub fn active_unit(&self) -> u32 {
        self.bindings.borrow().active_unit()
    }

    /// The object currently bound to `target`.
    ///
    /// The driver is always asked, binds made behind our back included. The cache is
    /// refreshed with its answer.
    pub fn query(&self, target: Target) -> Result<u32> {
        let id = self.call(|v| unsafe { v.binding(target) })?;
        self.bindings.borrow_mut().set(target, id);
        Ok(id)
    }

    pub fn query_indexed(&self, target: IndexedTarget, index: u32) -> Result<u32> {
        self.check_index(target, index)?;

        let id = self.call(|v| unsafe { v.indexed_binding(target, index) })?;
        self.bindings.borrow_mut().refresh_indexed(target, index, id);
        Ok(id)
    }

    /// A snapshot of the binding cache.
    pub fn bindings(&self) -> Vec<(crate::binding::Slot, u32)> {
        self.bindings.borrow().iter().collect()
    }

    pub(crate) fn create_object(&self, kind: ObjectKind) -> Result<u32> {
        let id = self.call(|v| unsafe { v.create_object(kind) })?;
        if id == 0 {
            driver_bail!("Failed to create {} object.", kind);
        }

        if self.settings.diagnostics {
            trace!("Create {} #{}.", kind, id);
        }

        Ok(id)
    }

    pub(crate) fn delete_object(&self, kind: ObjectKind, id: u32) -> Result<()> {
        if self.settings.diagnostics {
            trace!("Delete {} #{}.", kind, id);
        }

        self.bindings.borrow_mut().forget(kind, id);
        if kind == ObjectKind::Buffer {
            self.mapped.borrow_mut().remove(&id);
        }

        self.call(|v| unsafe { v.delete_object(kind, id) })
    }

    pub(crate) fn begin_mapping(&self, id: u32) -> Result<()> {
        if !self.mapped.borrow_mut().insert(id) {
            return Err(Error::AlreadyMapped(id));
        }

        Ok(())
    }

    pub(crate) fn end_mapping(&self, id: u32) -> Result<()> {
        if !self.mapped.borrow_mut().remove(&id) {
            return Err(Error::NotMapped(id));
        }

        Ok(())
    }

    #[inline]
    pub fn is_mapped(&self, id: u32) -> bool {
        self.mapped.borrow().contains(&id)
    }

    fn check_index(&self, target: IndexedTarget, index: u32) -> Result<()> {
        let limit = match target {
            IndexedTarget::UniformBuffer => self.capabilities.max_uniform_buffer_bindings,
            IndexedTarget::TransformFeedbackBuffer => {
                self.capabilities.max_transform_feedback_buffers
            }
        };

        if index >= limit {
            return Err(Error::OutOfBounds);
        }

        Ok(())
    }
}

impl ::std::fmt::Debug for Context {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        f.debug_struct("Context")
            .field("settings", &self.settings)
            .field("capabilities", &self.capabilities)
            .field("bindings", &self.bindings.borrow())
            .finish()
    }
}
