//! Operations module
//!
//! Turns validation outcomes into output: lint reports and the rendered
//! normalized configuration

pub mod lint;
pub mod render;

pub use lint::*;
pub use render::*;
