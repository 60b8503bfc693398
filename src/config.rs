//! Parser configuration
//!
//! [`ParserConfig`] is passed explicitly to the preparation layer. It holds
//! the identifier rules, whether positional binds are accepted, an optional
//! cap on SQL length, and the statement cache size.

use crate::error::{Error, Result};
use crate::scanner::{IdentifierPolicy, ScanOptions};

/// Default number of prepared statements kept in a cache
pub const DEFAULT_STMTCACHESIZE: usize = 20;

/// Characters that can never be identifier characters
const RESERVED_CHARS: &[char] = &[':', '\'', '"', '-', '/', '*'];

/// Configuration for statement preparation.
///
/// # Examples
///
/// ```rust
/// use oracle_sql_binds::ParserConfig;
///
/// let config = ParserConfig::new()
///     .with_positional_binds(true)
///     .with_max_sql_length(64 * 1024);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Accept `:1`, `:2`, ... as positional binds
    pub positional_binds: bool,
    /// Maximum SQL length in bytes (None = unlimited)
    pub max_sql_length: Option<usize>,
    /// Number of prepared statements to cache (0 disables caching)
    pub stmt_cache_size: usize,
    /// Identifier character rules for unquoted bind names
    pub identifiers: IdentifierPolicy,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            positional_binds: false,
            max_sql_length: None,
            stmt_cache_size: DEFAULT_STMTCACHESIZE,
            identifiers: IdentifierPolicy::ORACLE,
        }
    }
}

impl ParserConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept or reject positional (`:1`) binds
    pub fn with_positional_binds(mut self, enabled: bool) -> Self {
        self.positional_binds = enabled;
        self
    }

    /// Reject SQL text longer than `max` bytes
    pub fn with_max_sql_length(mut self, max: usize) -> Self {
        self.max_sql_length = Some(max);
        self
    }

    /// Use custom identifier character rules
    pub fn with_identifier_policy(mut self, policy: IdentifierPolicy) -> Self {
        self.identifiers = policy;
        self
    }

    /// Set the statement cache size
    ///
    /// A size of 0 disables statement caching.
    pub fn set_stmtcachesize(&mut self, size: usize) {
        self.stmt_cache_size = size;
    }

    /// Get the statement cache size
    pub fn stmtcachesize(&self) -> usize {
        self.stmt_cache_size
    }

    /// Check the configuration for inconsistent settings
    pub fn validate(&self) -> Result<()> {
        if self.max_sql_length == Some(0) {
            return Err(Error::InvalidConfig(
                "max_sql_length must be positive".to_string(),
            ));
        }

        let extra = self.identifiers.extra_chars();
        if let Some(ch) = extra
            .iter()
            .find(|&&ch| ch.is_whitespace() || RESERVED_CHARS.contains(&ch))
        {
            return Err(Error::InvalidConfig(format!(
                "{:?} cannot be an identifier character",
                ch
            )));
        }

        Ok(())
    }

    /// Reject SQL text that exceeds the configured maximum length
    pub fn check_sql_length(&self, sql: &str) -> Result<()> {
        match self.max_sql_length {
            Some(max) if sql.len() > max => Err(Error::SqlTooLong {
                length: sql.len(),
                max,
            }),
            _ => Ok(()),
        }
    }

    /// Scanner options derived from this configuration
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            identifiers: self.identifiers,
            positional_binds: self.positional_binds,
        }
    }
}
