#![warn(missing_docs)]

//! # oracle-sql-binds
//!
//! Bind-variable scanning and statement preparation for Oracle SQL and
//! PL/SQL text, as performed by thin-mode drivers before a statement is sent
//! to the server.
//!
//! The core is a single-pass lexical [`Scanner`] that finds bind markers
//! (`:name`, `:"Quoted Name"`) while skipping string literals,
//! alternative-quote literals (`q'[...]'`), quoted identifiers, line comments
//! and nested block comments. It never fails: text that ends inside an
//! unterminated construct simply yields no further binds.
//!
//! ## Quick Start
//!
//! ```rust
//! use oracle_sql_binds::extract_bind_names;
//!
//! let names = extract_bind_names(
//!     "select :a, q'{contains ' and \" and : fine}', :b from dual",
//! );
//! assert_eq!(names, vec!["A", "B"]);
//! ```
//!
//! ## Statement Preparation
//!
//! ```rust
//! use oracle_sql_binds::{ParserConfig, Statement, StatementType};
//!
//! # fn example() -> oracle_sql_binds::Result<()> {
//! let config = ParserConfig::new().with_max_sql_length(32 * 1024);
//! let stmt = Statement::prepare(
//!     "INSERT INTO t (x) VALUES (:val) RETURNING id INTO :id",
//!     &config,
//! )?;
//!
//! assert_eq!(stmt.statement_type(), StatementType::Dml);
//! assert!(stmt.is_returning());
//! assert_eq!(stmt.bind_names(), ["VAL", "ID"]);
//! assert!(stmt.bind_info()[1].is_return_bind);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Positional Binds
//!
//! A colon followed by a digit is not a bind marker by default. Enable
//! positional binds to accept `:1`, `:2`, ...:
//!
//! ```rust
//! use oracle_sql_binds::{ParserConfig, Statement};
//!
//! let config = ParserConfig::new().with_positional_binds(true);
//! let stmt = Statement::prepare("SELECT * FROM t WHERE a = :1 AND b = :2", &config).unwrap();
//! assert_eq!(stmt.bind_names(), ["1", "2"]);
//! ```

pub mod config;
pub mod error;
pub mod scanner;
pub mod statement;
pub mod statement_cache;

// Re-export commonly used types
pub use config::{ParserConfig, DEFAULT_STMTCACHESIZE};
pub use error::{Error, Result};
pub use scanner::{
    extract_bind_names, extract_bind_names_with, IdentifierPolicy, LexMode, Lexeme, ScanOptions,
    Scanner,
};
pub use statement::{BindInfo, Statement, StatementType};
pub use statement_cache::StatementCache;
