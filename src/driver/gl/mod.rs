pub mod capabilities;
pub mod driver;
pub mod types;

pub use self::driver::GLDriver;
