//! Error types for statement preparation
//!
//! Scanning itself never fails. Errors only come from the preparation
//! layer: configured limits and invalid configuration.

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for statement preparation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Error {
    // =========================================================================
    // Limit Errors
    // =========================================================================
    /// SQL text exceeds the configured maximum length
    #[error("SQL text too long: {length} bytes exceeds maximum of {max} bytes")]
    SqlTooLong { length: usize, max: usize },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Parser configuration failed validation
    #[error("invalid parser configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Check if this error came from the SQL size limit
    pub fn is_size_limit(&self) -> bool {
        matches!(self, Error::SqlTooLong { .. })
    }
}
