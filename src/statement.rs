//! SQL Statement preparation
//!
//! This module turns SQL text into a [`Statement`]: its type, whether it is
//! a DML returning statement, and its bind variables in order of appearance.
//! All of it is derived from the lexemes of a single [`Scanner`] pass.

use indexmap::IndexSet;

use crate::config::ParserConfig;
use crate::error::Result;
use crate::scanner::{Lexeme, ScanOptions, Scanner};

/// Statement type determined by the first keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatementType {
    /// Unknown or unparsed statement
    #[default]
    Unknown,
    /// SELECT query
    Query,
    /// DML: INSERT, UPDATE, DELETE, MERGE
    Dml,
    /// DDL: CREATE, ALTER, DROP, etc.
    Ddl,
    /// PL/SQL block: BEGIN, DECLARE, CALL
    PlSql,
    /// COMMIT
    Commit,
    /// ROLLBACK
    Rollback,
}

impl StatementType {
    /// Classify a statement by its first keyword (case-insensitive)
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword.to_uppercase().as_str() {
            "SELECT" | "WITH" => StatementType::Query,
            "INSERT" | "UPDATE" | "DELETE" | "MERGE" => StatementType::Dml,
            "CREATE" | "ALTER" | "DROP" | "GRANT" | "REVOKE" | "ANALYZE" | "AUDIT"
            | "COMMENT" | "TRUNCATE" => StatementType::Ddl,
            "DECLARE" | "BEGIN" | "CALL" => StatementType::PlSql,
            "COMMIT" => StatementType::Commit,
            "ROLLBACK" => StatementType::Rollback,
            _ => StatementType::Unknown,
        }
    }
}

/// A bind variable occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindInfo {
    /// Parameter name (without leading colon)
    pub name: String,
    /// Whether this is a RETURNING INTO bind
    pub is_return_bind: bool,
}

impl BindInfo {
    /// Create a new bind parameter with the given name
    pub fn new(name: impl Into<String>, is_return_bind: bool) -> Self {
        Self {
            name: name.into(),
            is_return_bind,
        }
    }
}

/// A prepared SQL statement
#[derive(Debug, Clone)]
pub struct Statement {
    /// The original SQL text
    sql: String,
    /// Statement type
    statement_type: StatementType,
    /// Bind occurrences in order of appearance
    bind_info_list: Vec<BindInfo>,
    /// Unique bind names in order of first appearance
    bind_names: Vec<String>,
    /// Whether this is a DML RETURNING statement
    is_returning: bool,
    /// Options the text was scanned with
    scan_options: ScanOptions,
}

impl Statement {
    /// Prepare a statement with the default scan options
    ///
    /// No size limit applies. Use [`Statement::prepare`] to enforce one.
    pub fn new(sql: impl Into<String>) -> Self {
        Self::with_options(sql, ScanOptions::default())
    }

    /// Prepare a statement under the given configuration
    pub fn prepare(sql: impl Into<String>, config: &ParserConfig) -> Result<Self> {
        let sql = sql.into();
        config.validate()?;
        config.check_sql_length(&sql)?;
        Ok(Self::with_options(sql, config.scan_options()))
    }

    /// Prepare a statement with explicit scan options
    pub fn with_options(sql: impl Into<String>, options: ScanOptions) -> Self {
        let sql = sql.into();

        let mut statement_type = StatementType::Unknown;
        let mut keyword_found = false;
        let mut returning_found = false;
        let mut is_returning = false;
        let mut bind_info_list = Vec::new();
        let mut bind_names = IndexSet::new();

        for lexeme in Scanner::with_options(&sql, options) {
            match lexeme {
                Lexeme::Word(word) => {
                    if !keyword_found {
                        keyword_found = true;
                        statement_type = StatementType::from_keyword(word);
                        // DDL never carries binds
                        if statement_type == StatementType::Ddl {
                            break;
                        }
                    } else if statement_type == StatementType::Dml && !returning_found {
                        returning_found = word.eq_ignore_ascii_case("RETURNING")
                            || word.eq_ignore_ascii_case("RETURN");
                    } else if returning_found && !is_returning {
                        is_returning = word.eq_ignore_ascii_case("INTO");
                    }
                }
                Lexeme::Bind(name) => {
                    // PL/SQL binds by name; SQL binds each occurrence
                    if statement_type == StatementType::PlSql && bind_names.contains(&name) {
                        continue;
                    }
                    bind_info_list.push(BindInfo::new(name.clone(), is_returning));
                    bind_names.insert(name);
                }
            }
        }

        tracing::trace!(
            sql = %sql,
            statement_type = ?statement_type,
            binds = bind_info_list.len(),
            "Prepared statement"
        );

        Self {
            sql,
            statement_type,
            bind_info_list,
            bind_names: bind_names.into_iter().collect(),
            is_returning,
            scan_options: options,
        }
    }

    /// Get the SQL text
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Get the SQL length in bytes
    pub fn sql_length(&self) -> usize {
        self.sql.len()
    }

    /// Get the statement type
    pub fn statement_type(&self) -> StatementType {
        self.statement_type
    }

    /// Check if this is a query (SELECT)
    pub fn is_query(&self) -> bool {
        self.statement_type == StatementType::Query
    }

    /// Check if this is a DML statement
    pub fn is_dml(&self) -> bool {
        self.statement_type == StatementType::Dml
    }

    /// Check if this is a DDL statement
    pub fn is_ddl(&self) -> bool {
        self.statement_type == StatementType::Ddl
    }

    /// Check if this is a PL/SQL block
    pub fn is_plsql(&self) -> bool {
        self.statement_type == StatementType::PlSql
    }

    /// Check if this is a RETURNING statement
    pub fn is_returning(&self) -> bool {
        self.is_returning
    }

    /// Get the bind occurrences in order of appearance
    ///
    /// SQL statements list every occurrence; PL/SQL lists each name once.
    pub fn bind_info(&self) -> &[BindInfo] {
        &self.bind_info_list
    }

    /// Get the unique bind names in order of first appearance
    pub fn bind_names(&self) -> &[String] {
        &self.bind_names
    }

    /// Get the options the statement was scanned with
    pub fn scan_options(&self) -> ScanOptions {
        self.scan_options
    }

    /// Check if the statement references the given (normalized) bind name
    pub fn has_bind(&self, name: &str) -> bool {
        self.bind_names.iter().any(|n| n == name)
    }
}
