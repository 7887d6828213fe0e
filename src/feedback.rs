//! Transform feedback objects and their capture sessions.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::context::Context;
use crate::driver::capabilities::Capability;
use crate::enums::{FeedbackPrimitive, ObjectKind, Target};
use crate::errors::*;
use crate::handle::Handle;
use crate::resource::BoundResource;

/// State of the capture session of a transform feedback object.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Active(FeedbackPrimitive),
    Paused(FeedbackPrimitive),
}

impl SessionState {
    /// The primitive mode of the running session.
    pub fn primitive(self) -> Option<FeedbackPrimitive> {
        match self {
            SessionState::Idle => None,
            SessionState::Active(v) | SessionState::Paused(v) => Some(v),
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::Idle
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            SessionState::Idle => "idle",
            SessionState::Active(_) => "active",
            SessionState::Paused(_) => "paused",
        };

        write!(f, "{}", name)
    }
}

struct Session {
    resource: BoundResource,
    state: Cell<SessionState>,
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.state.get() == SessionState::Idle {
            return;
        }

        // Active objects can not be deleted, so the session is ended before the
        // handle goes away.
        let result = self.resource.context().and_then(|ctx| {
            self.resource.bind()?;
            ctx.call(|v| unsafe { v.end_feedback() })
        });

        if let Err(err) = result {
            error!(
                "Failed to end the session of {}. {}",
                self.resource.handle(),
                err
            );
        }
    }
}

/// A transform feedback object.
///
/// Clones share the object and its session. A session that is still running when
/// the last clone drops is ended before the object is deleted.
#[derive(Clone)]
pub struct TransformFeedback {
    session: Rc<Session>,
}

impl TransformFeedback {
    pub fn new(ctx: &Rc<Context>) -> Result<Self> {
        ctx.require(Capability::TransformFeedback)?;

        let handle = Handle::create(ctx, ObjectKind::TransformFeedback)?;
        let session = Session {
            resource: BoundResource::new(handle, Target::TransformFeedback),
            state: Cell::new(SessionState::Idle),
        };

        Ok(TransformFeedback {
            session: Rc::new(session),
        })
    }

    /// Creates an object, binds it and starts capturing `mode` primitives.
    pub fn begin_new(ctx: &Rc<Context>, mode: FeedbackPrimitive) -> Result<Self> {
        let feedback = TransformFeedback::new(ctx)?;
        feedback.bind()?;
        feedback.begin(mode)?;
        Ok(feedback)
    }

    #[inline]
    pub fn handle(&self) -> &Handle {
        self.session.resource.handle()
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.session.resource.id()
    }

    #[inline]
    pub fn state(&self) -> SessionState {
        self.session.state.get()
    }

    #[inline]
    pub fn bind(&self) -> Result<()> {
        self.session.resource.bind()
    }

    #[inline]
    pub fn unbind(&self) -> Result<()> {
        self.session.resource.unbind()
    }

    #[inline]
    pub fn is_current(&self) -> Result<bool> {
        self.session.resource.is_current()
    }

    /// Starts capturing `mode` primitives. Only valid while idle.
    pub fn begin(&self, mode: FeedbackPrimitive) -> Result<()> {
        match self.state() {
            SessionState::Idle => {}
            state => return Err(self.refuse("begin", state)),
        }

        self.transition("begin", SessionState::Active(mode), |ctx| {
            ctx.call(|v| unsafe { v.begin_feedback(mode) })
        })
    }

    /// Suspends capturing. Only valid while active.
    pub fn pause(&self) -> Result<()> {
        let mode = match self.state() {
            SessionState::Active(mode) => mode,
            state => return Err(self.refuse("pause", state)),
        };

        self.transition("pause", SessionState::Paused(mode), |ctx| {
            ctx.require(Capability::TransformFeedbackPause)?;
            ctx.call(|v| unsafe { v.pause_feedback() })
        })
    }

    /// Continues a paused session. Only valid while paused.
    pub fn resume(&self) -> Result<()> {
        let mode = match self.state() {
            SessionState::Paused(mode) => mode,
            state => return Err(self.refuse("resume", state)),
        };

        self.transition("resume", SessionState::Active(mode), |ctx| {
            ctx.require(Capability::TransformFeedbackPause)?;
            ctx.call(|v| unsafe { v.resume_feedback() })
        })
    }

    /// Ends the session, whether it is active or paused.
    pub fn end(&self) -> Result<()> {
        if self.state() == SessionState::Idle {
            return Err(self.refuse("end", SessionState::Idle));
        }

        self.transition("end", SessionState::Idle, |ctx| {
            ctx.call(|v| unsafe { v.end_feedback() })
        })
    }

    fn transition<F>(&self, operation: &'static str, next: SessionState, func: F) -> Result<()>
    where
        F: FnOnce(&Rc<Context>) -> Result<()>,
    {
        let resource = &self.session.resource;
        resource.require_current(operation)?;
        func(resource.context()?)?;

        if resource.context()?.settings().diagnostics {
            trace!("{} {} -> {}.", resource.handle(), self.state(), next);
        }

        self.session.state.set(next);
        Ok(())
    }

    fn refuse(&self, operation: &'static str, state: SessionState) -> Error {
        Error::State {
            resource: self.handle().to_string(),
            operation,
            state,
        }
    }
}

impl fmt::Debug for TransformFeedback {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TransformFeedback")
            .field("handle", self.handle())
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn states() {
        assert_eq!(SessionState::default(), SessionState::Idle);
        assert_eq!(SessionState::Idle.primitive(), None);
        assert_eq!(
            SessionState::Paused(FeedbackPrimitive::Lines).primitive(),
            Some(FeedbackPrimitive::Lines)
        );

        assert_eq!(SessionState::Idle.to_string(), "idle");
        assert_eq!(
            SessionState::Active(FeedbackPrimitive::Points).to_string(),
            "active"
        );
    }
}
