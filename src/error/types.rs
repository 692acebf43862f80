//! Custom error types with exit codes

use thiserror::Error;

/// Main error type for forgeyml operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ForgeError {
    /// Configuration Error - missing, unreadable or unparsable configuration file
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Validation Error - the configuration was read but did not validate
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Filesystem Error - file operation failed
    #[error("Filesystem error: {message}")]
    Filesystem { message: String },
}

impl ForgeError {
    /// Get the appropriate exit code for this error type
    #[must_use]
    #[inline]
    pub const fn exit_code(&self) -> i32 {
        match *self {
            Self::Configuration { .. } => 1,
            Self::Validation { .. } => 2,
            Self::Filesystem { .. } => 3,
        }
    }

    /// Create a configuration error
    #[inline]
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a validation error
    #[inline]
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a filesystem error
    #[inline]
    pub fn filesystem<S: Into<String>>(message: S) -> Self {
        Self::Filesystem {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ForgeError::configuration("missing").exit_code(), 1);
        assert_eq!(ForgeError::validation("2 problem(s)").exit_code(), 2);
        assert_eq!(ForgeError::filesystem("permission denied").exit_code(), 3);
    }

    #[test]
    fn test_downcast_through_context() {
        let err = anyhow::Error::new(ForgeError::filesystem("read failed")).context("Loading conda-forge.yml");
        assert_eq!(err.downcast_ref::<ForgeError>().map(ForgeError::exit_code), Some(3));
    }
}
