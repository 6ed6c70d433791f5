//! Shelf Application Library
//!
//! Resource modules and wiring for the Shelf REST API.

pub mod modules;

/// Re-export commonly used types
pub use modules::*;
