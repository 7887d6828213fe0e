use crate::driver::capabilities::Capability;
use crate::enums::{ObjectKind, Target};
use crate::feedback::SessionState;

#[derive(Debug, Fail)]
pub enum Error {
    #[fail(
        display = "{} requires {} to be bound to {}, but it is not the current binding.",
        operation, resource, target
    )]
    Binding {
        resource: String,
        operation: &'static str,
        target: Target,
    },
    #[fail(
        display = "{} is not allowed on {} while it is {}.",
        operation, resource, state
    )]
    State {
        resource: String,
        operation: &'static str,
        state: SessionState,
    },
    #[fail(display = "Driver: {}", _0)]
    Driver(String),
    #[fail(display = "{} handle is invalid (released or never allocated).", _0)]
    InvalidHandle(ObjectKind),
    #[fail(display = "The driver does not support {}.", _0)]
    Unsupported(Capability),
    #[fail(display = "Buffer #{} is already mapped.", _0)]
    AlreadyMapped(u32),
    #[fail(display = "Buffer #{} is not mapped.", _0)]
    NotMapped(u32),
    #[fail(display = "Buffer #{} is mapped without write access.", _0)]
    ReadOnly(u32),
    #[fail(display = "Mapped range can not be viewed as the requested type: {}.", _0)]
    Layout(String),
    #[fail(display = "Out of bounds.")]
    OutOfBounds,
}

pub type Result<T> = ::std::result::Result<T, Error>;

macro_rules! driver_err {
    ($e:expr) => {
        $crate::errors::Error::Driver(String::from($e))
    };
    ($fmt:expr, $($arg:tt)+) => {
        $crate::errors::Error::Driver(format!($fmt, $($arg)+))
    };
}

macro_rules! driver_bail {
    ($($arg:tt)+) => {
        return Err(driver_err!($($arg)+))
    };
}
