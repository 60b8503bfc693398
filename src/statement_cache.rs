//! Statement caching for repeated preparation
//!
//! Preparing a statement scans its full text. Applications tend to run the
//! same handful of statements over and over, so prepared statements are
//! cached by SQL text and reused instead of being scanned again.
//!
//! - DDL statements are never cached
//! - When the cache is full the least recently used entry is evicted
//! - A cache size of 0 disables caching entirely

use indexmap::IndexMap;

use crate::config::ParserConfig;
use crate::error::Result;
use crate::statement::Statement;

/// Wrapper for a cached statement with usage tracking
#[derive(Debug)]
struct CachedStatement {
    /// The prepared statement
    statement: Statement,
    /// Cache clock value at last use
    last_used: u64,
}

impl CachedStatement {
    fn new(statement: Statement, now: u64) -> Self {
        Self {
            statement,
            last_used: now,
        }
    }

    fn touch(&mut self, now: u64) {
        self.last_used = now;
    }
}

/// Client-side cache of prepared statements using LRU eviction
///
/// # Example
///
/// ```rust
/// use oracle_sql_binds::{ParserConfig, StatementCache};
///
/// let config = ParserConfig::default();
/// let mut cache = StatementCache::from_config(&config);
///
/// // First call scans the SQL
/// let stmt = cache.get_or_prepare("SELECT * FROM users WHERE id = :id", &config)?;
/// assert_eq!(stmt.bind_names(), ["ID"]);
///
/// // Second call is served from the cache
/// let again = cache.get_or_prepare("SELECT * FROM users WHERE id = :id", &config)?;
/// assert_eq!(again.bind_names(), stmt.bind_names());
/// assert_eq!(cache.len(), 1);
/// # Ok::<(), oracle_sql_binds::Error>(())
/// ```
#[derive(Debug)]
pub struct StatementCache {
    /// The cache using IndexMap for O(1) lookup
    cache: IndexMap<String, CachedStatement>,
    /// Maximum number of statements to cache
    max_size: usize,
    /// Logical clock, advanced on every get and put
    clock: u64,
}

impl StatementCache {
    /// Create a new statement cache with the given maximum size
    ///
    /// A size of 0 effectively disables caching.
    pub fn new(max_size: usize) -> Self {
        Self {
            cache: IndexMap::with_capacity(max_size),
            max_size,
            clock: 0,
        }
    }

    /// Create a cache sized from the configuration
    pub fn from_config(config: &ParserConfig) -> Self {
        Self::new(config.stmtcachesize())
    }

    /// Get a statement from the cache, if available
    ///
    /// Updates LRU ordering on hit.
    pub fn get(&mut self, sql: &str) -> Option<Statement> {
        if self.max_size == 0 {
            return None;
        }

        let now = self.tick();
        match self.cache.get_mut(sql) {
            Some(cached) => {
                cached.touch(now);
                tracing::trace!(sql = sql, "Statement cache hit");
                Some(cached.statement.clone())
            }
            None => {
                tracing::trace!(sql = sql, "Statement cache miss");
                None
            }
        }
    }

    /// Store a statement in the cache, keyed by its SQL text
    ///
    /// An existing entry for the same text is replaced.
    /// DDL statements are never cached. If the cache is full, the least
    /// recently used statement is evicted.
    pub fn put(&mut self, statement: Statement) {
        if self.max_size == 0 {
            return;
        }

        if statement.is_ddl() {
            tracing::trace!(sql = statement.sql(), "Not caching DDL statement");
            return;
        }

        let now = self.tick();
        if let Some(cached) = self.cache.get_mut(statement.sql()) {
            cached.statement = statement;
            cached.touch(now);
            tracing::trace!(sql = cached.statement.sql(), "Updated existing cache entry");
            return;
        }

        if self.cache.len() >= self.max_size {
            self.evict_lru();
        }

        tracing::trace!(
            sql = statement.sql(),
            binds = statement.bind_info().len(),
            "Adding statement to cache"
        );
        self.cache
            .insert(statement.sql().to_string(), CachedStatement::new(statement, now));
    }

    /// Return the cached statement for `sql`, preparing and caching it on a miss
    ///
    /// The configuration is checked on every call. An entry scanned with
    /// different scan options counts as a miss and is replaced.
    pub fn get_or_prepare(&mut self, sql: &str, config: &ParserConfig) -> Result<Statement> {
        config.validate()?;
        config.check_sql_length(sql)?;

        if let Some(statement) = self.get(sql) {
            if statement.scan_options() == config.scan_options() {
                return Ok(statement);
            }
            tracing::trace!(sql = sql, "Cached statement scanned with other options");
        }

        let statement = Statement::prepare(sql, config)?;
        self.put(statement.clone());
        Ok(statement)
    }

    /// Remove a statement from the cache
    pub fn remove(&mut self, sql: &str) -> Option<Statement> {
        self.cache
            .shift_remove(sql)
            .map(|cached| cached.statement)
    }

    /// Check if a statement is cached without touching it
    pub fn contains(&self, sql: &str) -> bool {
        self.cache.contains_key(sql)
    }

    /// Clear all cached statements
    pub fn clear(&mut self) {
        self.cache.clear();
        tracing::debug!("Statement cache cleared");
    }

    /// Get the current number of cached statements
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Get the maximum cache size
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Evict the least recently used entry
    fn evict_lru(&mut self) {
        let lru_key = self
            .cache
            .iter()
            .min_by_key(|(_, cached)| cached.last_used)
            .map(|(key, _)| key.clone());

        match lru_key {
            Some(key) => {
                self.cache.shift_remove(&key);
                tracing::trace!(sql = %key, "Evicted LRU statement from cache");
            }
            None => tracing::warn!("Statement cache full but has no entries to evict"),
        }
    }
}
