#[macro_use]
pub mod macros;
pub mod log_setup;
pub mod shared;

pub use shared::Shared;
