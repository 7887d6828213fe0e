//! Reference-counted OpenGL object handles with bind-state tracking.
//!
//! Every object (buffer, texture, transform feedback) is owned through a shared
//! [`Handle`](handle/struct.Handle.html) and bound through a
//! [`Context`](context/struct.Context.html), which remembers which object is current
//! for each binding target. When validation is enabled the context re-queries the
//! driver before operations that act on "the currently bound object", and refuses
//! to run them against anything else.
//!
//! The driver itself sits behind the [`Driver`](driver/trait.Driver.html) trait.
//! An OpenGL implementation and an in-memory headless one are provided.

#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;
#[macro_use]
extern crate bitflags;

#[macro_use]
pub mod errors;

pub mod binding;
pub mod buffer;
pub mod context;
pub mod driver;
pub mod enums;
pub mod feedback;
pub mod handle;
pub mod resource;
pub mod settings;
pub mod texture;

pub mod prelude;
