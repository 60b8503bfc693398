//! Tests for statement caching functionality
//!
//! These tests verify cache hits and misses, LRU eviction and the rules for
//! which statements are cached.

use oracle_sql_binds::{
    Error, IdentifierPolicy, ParserConfig, Statement, StatementCache, StatementType,
};

mod cache_basic_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cache_creation() {
        let cache = StatementCache::new(10);
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        assert_eq!(cache.max_size(), 10);
    }

    #[test]
    fn test_cache_from_config() {
        let cache = StatementCache::from_config(&ParserConfig::default());
        assert_eq!(cache.max_size(), oracle_sql_binds::DEFAULT_STMTCACHESIZE);

        let mut config = ParserConfig::default();
        config.set_stmtcachesize(3);
        assert_eq!(StatementCache::from_config(&config).max_size(), 3);
    }

    #[test]
    fn test_cache_put_and_get() {
        let mut cache = StatementCache::new(5);
        let sql = "SELECT * FROM t WHERE id = :id";

        cache.put(Statement::new(sql));
        assert_eq!(cache.len(), 1);

        let stmt = cache.get(sql).expect("Should retrieve cached statement");
        assert_eq!(stmt.sql(), sql);
        assert_eq!(stmt.bind_names(), ["ID"]);
    }

    #[test]
    fn test_cache_preserves_statement_type() {
        let mut cache = StatementCache::new(5);

        cache.put(Statement::new("SELECT * FROM emp"));
        cache.put(Statement::new("INSERT INTO t VALUES (1)"));
        cache.put(Statement::new("BEGIN NULL; END;"));

        assert_eq!(
            cache.get("SELECT * FROM emp").unwrap().statement_type(),
            StatementType::Query
        );
        assert_eq!(
            cache.get("INSERT INTO t VALUES (1)").unwrap().statement_type(),
            StatementType::Dml
        );
        assert_eq!(
            cache.get("BEGIN NULL; END;").unwrap().statement_type(),
            StatementType::PlSql
        );
    }

    #[test]
    fn test_lookup_is_exact_text() {
        let mut cache = StatementCache::new(5);
        cache.put(Statement::new("select 1 from dual"));
        assert!(cache.get("SELECT 1 FROM DUAL").is_none());
        assert!(cache.get("select 1 from dual ").is_none());
    }
}

mod cache_policy_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ddl_never_cached() {
        let mut cache = StatementCache::new(5);
        cache.put(Statement::new("CREATE TABLE t (x NUMBER)"));
        cache.put(Statement::new("DROP TABLE t"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_size_disables_cache() {
        let mut cache = StatementCache::new(0);
        cache.put(Statement::new("SELECT 1 FROM dual"));
        assert!(cache.is_empty());

        let config = ParserConfig::default();
        let stmt = cache.get_or_prepare("SELECT :a FROM dual", &config).unwrap();
        assert_eq!(stmt.bind_names(), ["A"]);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_lru_eviction() {
        let mut cache = StatementCache::new(2);
        cache.put(Statement::new("SELECT 1 FROM dual"));
        cache.put(Statement::new("SELECT 2 FROM dual"));

        // Touch the first statement so the second becomes least recently used
        assert!(cache.get("SELECT 1 FROM dual").is_some());

        cache.put(Statement::new("SELECT 3 FROM dual"));
        assert_eq!(cache.len(), 2);
        assert!(cache.contains("SELECT 1 FROM dual"));
        assert!(!cache.contains("SELECT 2 FROM dual"));
        assert!(cache.contains("SELECT 3 FROM dual"));
    }

    #[test]
    fn test_update_refreshes_entry() {
        let mut cache = StatementCache::new(2);
        cache.put(Statement::new("SELECT 1 FROM dual"));
        cache.put(Statement::new("SELECT 2 FROM dual"));
        cache.put(Statement::new("SELECT 1 FROM dual"));
        assert_eq!(cache.len(), 2);

        cache.put(Statement::new("SELECT 3 FROM dual"));
        assert!(cache.contains("SELECT 1 FROM dual"));
        assert!(!cache.contains("SELECT 2 FROM dual"));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cache = StatementCache::new(5);
        cache.put(Statement::new("SELECT 1 FROM dual"));
        cache.put(Statement::new("SELECT 2 FROM dual"));

        let removed = cache.remove("SELECT 1 FROM dual").unwrap();
        assert_eq!(removed.sql(), "SELECT 1 FROM dual");
        assert!(cache.remove("SELECT 1 FROM dual").is_none());
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }
}

mod get_or_prepare_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_prepares_on_miss_and_caches() {
        let config = ParserConfig::default();
        let mut cache = StatementCache::from_config(&config);

        let stmt = cache
            .get_or_prepare("begin :x := :x + 1; end;", &config)
            .unwrap();
        assert!(stmt.is_plsql());
        assert_eq!(stmt.bind_names(), ["X"]);
        assert!(cache.contains("begin :x := :x + 1; end;"));

        let again = cache
            .get_or_prepare("begin :x := :x + 1; end;", &config)
            .unwrap();
        assert_eq!(again.bind_info(), stmt.bind_info());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_size_limit_error_not_cached() {
        let config = ParserConfig::new().with_max_sql_length(8);
        let mut cache = StatementCache::from_config(&config);

        let err = cache
            .get_or_prepare("SELECT 1 FROM dual", &config)
            .unwrap_err();
        assert!(matches!(err, Error::SqlTooLong { length: 18, max: 8 }));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_ddl_prepared_but_not_cached() {
        let config = ParserConfig::default();
        let mut cache = StatementCache::from_config(&config);

        let stmt = cache
            .get_or_prepare("TRUNCATE TABLE t", &config)
            .unwrap();
        assert!(stmt.is_ddl());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_size_limit_applies_to_cache_hits() {
        let mut cache = StatementCache::new(5);
        let sql = "SELECT :a FROM dual";

        cache.get_or_prepare(sql, &ParserConfig::default()).unwrap();
        assert!(cache.contains(sql));

        let capped = ParserConfig::new().with_max_sql_length(8);
        let err = cache.get_or_prepare(sql, &capped).unwrap_err();
        assert_eq!(err, Error::SqlTooLong { length: 19, max: 8 });
    }

    #[test]
    fn test_hit_with_other_scan_options_is_rescanned() {
        let mut cache = StatementCache::new(5);
        let sql = "SELECT :1 FROM dual";

        let positional = ParserConfig::new().with_positional_binds(true);
        let stmt = cache.get_or_prepare(sql, &positional).unwrap();
        assert_eq!(stmt.bind_names(), ["1"]);

        let stmt = cache.get_or_prepare(sql, &ParserConfig::default()).unwrap();
        assert!(stmt.bind_names().is_empty());
        assert_eq!(stmt.scan_options(), ParserConfig::default().scan_options());
        assert_eq!(cache.len(), 1);

        // The entry now holds the default-options statement
        let cached = cache.get(sql).unwrap();
        assert!(cached.bind_names().is_empty());
    }

    #[test]
    fn test_invalid_config_rejected_on_hit() {
        let mut cache = StatementCache::new(5);
        let sql = "select :a from dual";
        cache.get_or_prepare(sql, &ParserConfig::default()).unwrap();

        let config =
            ParserConfig::new().with_identifier_policy(IdentifierPolicy::new(&['_', '\'']));
        let err = cache.get_or_prepare(sql, &config).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}
