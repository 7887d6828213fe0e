use std::fmt;
use std::rc::Rc;

use crate::context::Context;
use crate::enums::ObjectKind;
use crate::errors::*;

struct Object {
    ctx: Rc<Context>,
    kind: ObjectKind,
    id: u32,
}

impl Drop for Object {
    fn drop(&mut self) {
        if let Err(err) = self.ctx.delete_object(self.kind, self.id) {
            error!("Failed to delete {} #{}. {}", self.kind, self.id, err);
        }
    }
}

/// A shared owner of one server-side object.
///
/// Clones refer to the same object. The object is deleted when the last owner is
/// released or dropped.
#[derive(Clone)]
pub struct Handle {
    kind: ObjectKind,
    object: Option<Rc<Object>>,
}

impl Handle {
    /// Creates a new object of `kind`.
    pub fn create(ctx: &Rc<Context>, kind: ObjectKind) -> Result<Self> {
        let id = ctx.create_object(kind)?;
        let object = Object {
            ctx: ctx.clone(),
            kind,
            id,
        };

        Ok(Handle {
            kind,
            object: Some(Rc::new(object)),
        })
    }

    /// Gives up this owner's share of the object. The object is deleted if this was
    /// the last one. Releasing twice does nothing.
    pub fn release(&mut self) {
        self.object = None;
    }

    /// The object id, 0 once released.
    #[inline]
    pub fn id(&self) -> u32 {
        self.object.as_ref().map(|v| v.id).unwrap_or(0)
    }

    #[inline]
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Number of owners sharing the object, 0 once released.
    #[inline]
    pub fn ref_count(&self) -> usize {
        self.object.as_ref().map(Rc::strong_count).unwrap_or(0)
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.object.is_some()
    }

    /// The context the object lives in.
    pub fn context(&self) -> Result<&Rc<Context>> {
        match self.object {
            Some(ref v) => Ok(&v.ctx),
            None => Err(Error::InvalidHandle(self.kind)),
        }
    }
}

impl PartialEq for Handle {
    fn eq(&self, rhs: &Self) -> bool {
        self.kind == rhs.kind && self.id() == rhs.id()
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}Handle({}, {})", self.kind, self.id(), self.ref_count())
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} #{}", self.kind, self.id())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::settings::Settings;

    #[test]
    fn shared_ownership() {
        let ctx = Context::headless(Settings::validated());
        let mut a = Handle::create(&ctx, ObjectKind::Texture).unwrap();
        let b = a.clone();

        assert!(a.id() != 0);
        assert_eq!(a, b);
        assert_eq!(a.ref_count(), 2);

        a.release();
        assert_eq!(a.id(), 0);
        assert!(!a.is_valid());
        assert_eq!(b.ref_count(), 1);
        assert!(a.context().is_err());

        a.release();
        assert_eq!(b.ref_count(), 1);
        assert_eq!(format!("{}", b), format!("Texture #{}", b.id()));
    }
}
