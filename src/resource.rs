use std::rc::Rc;

use crate::context::Context;
use crate::enums::Target;
use crate::errors::*;
use crate::handle::Handle;

/// A handle together with the target it binds to.
///
/// This is the piece every wrapper builds on: operations that act on "the bound
/// object" call `require_current` first, so a foreign bind between our bind and our
/// operation surfaces as `Error::Binding` instead of silently modifying something
/// else.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundResource {
    handle: Handle,
    target: Target,
}

impl BoundResource {
    pub fn new(handle: Handle, target: Target) -> Self {
        BoundResource { handle, target }
    }

    #[inline]
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    #[inline]
    pub fn target(&self) -> Target {
        self.target
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.handle.id()
    }

    #[inline]
    pub fn context(&self) -> Result<&Rc<Context>> {
        self.handle.context()
    }

    /// Makes this object the current one of its target.
    pub fn bind(&self) -> Result<()> {
        let ctx = self.context()?;
        ctx.bind(self.target, self.handle.id())
    }

    /// Clears the binding of the target. With validation enabled this object has to
    /// be the current one.
    pub fn unbind(&self) -> Result<()> {
        self.require_current("unbind")?;
        self.context()?.unbind(self.target)
    }

    /// Whether this object is the current one of its target. The driver is always
    /// re-queried.
    pub fn is_current(&self) -> Result<bool> {
        let ctx = self.context()?;
        Ok(ctx.query(self.target)? == self.handle.id())
    }

    /// Fails with `Error::Binding` if validation is enabled and this object is not
    /// the current one of its target. A no-op otherwise.
    pub fn require_current(&self, operation: &'static str) -> Result<()> {
        let ctx = self.context()?;
        if !ctx.settings().validation {
            return Ok(());
        }

        if !self.is_current()? {
            return Err(Error::Binding {
                resource: self.handle.to_string(),
                operation,
                target: self.target,
            });
        }

        Ok(())
    }

    /// Gives up this owner's share of the object.
    pub fn release(&mut self) {
        self.handle.release();
    }
}
