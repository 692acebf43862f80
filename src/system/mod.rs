//! System abstraction for filesystem access
//!
//! Loading and discovering `conda-forge.yml` goes through [`System`] so that
//! both can be exercised against an in-memory filesystem.

use std::io;
use std::path::{Path, PathBuf};

pub mod mock;
pub mod real;

pub use mock::MockSystem;
pub use real::RealSystem;

/// Filesystem operations used while locating and reading configuration
///
/// # Implementations
/// - `RealSystem`: delegates to `std::env` and `std::fs`
/// - `MockSystem`: in-memory files for tests
pub trait System: Send + Sync {
    /// Get the current working directory
    fn current_dir(&self) -> io::Result<PathBuf>;

    /// Read entire file contents as a string
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Check if a path points to a file
    fn is_file(&self, path: &Path) -> bool;
}
