//! API request handlers.

mod collections;
mod upload;

pub use collections::*;
pub use upload::*;
