//! Core types, constants, parameter tables and error types.

pub mod constants;
mod error;
mod params;
mod traits;
mod types;

pub use error::*;
pub use params::*;
pub use traits::*;
pub use types::*;
