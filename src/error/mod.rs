//! Error handling module
//!
//! Defines process-level error types with exit codes and the structured
//! errors and warnings produced by configuration validation

pub mod types;
pub mod validation;

pub use types::*;
pub use validation::*;
