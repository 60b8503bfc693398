//! Lexical scanner for bind variables in SQL and PL/SQL text
//!
//! The scanner walks a statement once, left to right, and yields the lexemes
//! that matter for statement preparation: unquoted words (keywords and
//! identifiers) and bind markers. Everything inside string literals,
//! alternative-quote literals (`q'[...]'`), quoted identifiers and comments is
//! consumed without producing anything.
//!
//! Bind markers follow the thin-mode rules:
//! - A bind is a `:` immediately followed by a letter or a double quote.
//! - Unquoted names may contain letters, digits and the characters of the
//!   active [`IdentifierPolicy`] (`_`, `$` and `#` by default). They are
//!   upper-cased with Unicode case mapping.
//! - Quoted names (`:"My Bind"`) keep their case and may contain anything
//!   except a lone double quote; `""` stands for an embedded quote.
//! - A colon that directly follows a string literal is JSON key syntax
//!   (`json {'key' : :val}`), not a bind marker.
//!
//! Malformed text never produces an error. When the text ends inside a
//! literal or comment the construct is treated as closed at end of text.

use std::iter::{FusedIterator, Peekable};
use std::str::CharIndices;

use indexmap::IndexSet;

/// Characters accepted in unquoted identifiers besides Unicode alphanumerics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifierPolicy {
    extra_chars: &'static [char],
}

impl IdentifierPolicy {
    /// Oracle identifier rules: alphanumerics plus `_`, `$` and `#`
    pub const ORACLE: IdentifierPolicy = IdentifierPolicy {
        extra_chars: &['_', '$', '#'],
    };

    /// Create a policy with the given extra identifier characters
    pub const fn new(extra_chars: &'static [char]) -> Self {
        Self { extra_chars }
    }

    /// Extra characters allowed after the first identifier character
    pub fn extra_chars(&self) -> &'static [char] {
        self.extra_chars
    }

    /// Check if the character can start an identifier
    pub fn is_start(&self, ch: char) -> bool {
        ch.is_alphabetic()
    }

    /// Check if the character can continue an identifier
    pub fn is_part(&self, ch: char) -> bool {
        ch.is_alphanumeric() || self.extra_chars.contains(&ch)
    }
}

impl Default for IdentifierPolicy {
    fn default() -> Self {
        Self::ORACLE
    }
}

/// Options controlling what the scanner accepts as a bind name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanOptions {
    /// Identifier character rules for unquoted names
    pub identifiers: IdentifierPolicy,
    /// Accept `:1`, `:2`, ... as positional binds named by their digits
    pub positional_binds: bool,
}

/// Lexical mode the scanner is currently in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexMode {
    /// Ordinary SQL text
    #[default]
    Normal,
    /// `--` comment running to the end of the line
    LineComment,
    /// `/* ... */` comment; nested openers increase the depth
    BlockComment {
        /// Number of unclosed `/*` openers
        depth: u32,
    },
    /// `'...'` string literal
    QuotedString,
    /// `q'<open>...<close>'` string literal
    AlternativeQuotedString {
        /// Delimiter that must precede the final `'`
        closer: char,
    },
    /// `"..."` quoted identifier
    QuotedIdentifier,
}

/// A lexeme produced while in [`LexMode::Normal`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lexeme<'a> {
    /// Unquoted word (keyword or identifier) exactly as written
    Word(&'a str),
    /// Bind variable name, without the colon and already normalized
    Bind(String),
}

impl Lexeme<'_> {
    /// Return the bind name if this lexeme is a bind marker
    pub fn into_bind_name(self) -> Option<String> {
        match self {
            Lexeme::Bind(name) => Some(name),
            Lexeme::Word(_) => None,
        }
    }
}

/// Closing delimiter for an alternative-quote opening delimiter
pub fn closing_delimiter(open: char) -> char {
    match open {
        '[' => ']',
        '{' => '}',
        '(' => ')',
        '<' => '>',
        other => other,
    }
}

/// Single-pass scanner over one SQL or PL/SQL statement
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    sql: &'a str,
    chars: Peekable<CharIndices<'a>>,
    mode: LexMode,
    options: ScanOptions,
    /// Last significant token was a string literal
    after_literal: bool,
}

impl<'a> Scanner<'a> {
    /// Create a scanner with the default options
    pub fn new(sql: &'a str) -> Self {
        Self::with_options(sql, ScanOptions::default())
    }

    /// Create a scanner with explicit options
    pub fn with_options(sql: &'a str, options: ScanOptions) -> Self {
        Self {
            sql,
            chars: sql.char_indices().peekable(),
            mode: LexMode::Normal,
            options,
            after_literal: false,
        }
    }

    /// Current lexical mode
    ///
    /// Once the scanner is exhausted this reports the construct the text
    /// ended in, or [`LexMode::Normal`] if everything was closed.
    pub fn mode(&self) -> LexMode {
        self.mode
    }

    /// Byte offset of the next unread character
    fn offset(&mut self) -> usize {
        self.chars.peek().map_or(self.sql.len(), |&(pos, _)| pos)
    }

    fn next_if_char(&mut self, expected: char) -> bool {
        self.chars.next_if(|&(_, ch)| ch == expected).is_some()
    }

    /// Consume characters while `pred` holds and return the end offset
    fn consume_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        while self.chars.next_if(|&(_, ch)| pred(ch)).is_some() {}
        self.offset()
    }

    /// Consume through the closing `quote`, where a doubled quote is an
    /// escaped quote. Returns the offset of the closing quote.
    fn find_closing_quote(&mut self, quote: char) -> Option<usize> {
        while let Some((pos, ch)) = self.chars.next() {
            if ch == quote && !self.next_if_char(quote) {
                return Some(pos);
            }
        }
        None
    }

    fn normal(&mut self, start: usize, ch: char) -> Option<Lexeme<'a>> {
        let after_literal = std::mem::take(&mut self.after_literal);
        match ch {
            c if c.is_whitespace() => {
                self.after_literal = after_literal;
                None
            }
            '-' if self.next_if_char('-') => {
                self.mode = LexMode::LineComment;
                None
            }
            '/' if self.next_if_char('*') => {
                self.mode = LexMode::BlockComment { depth: 1 };
                None
            }
            '\'' => {
                self.mode = LexMode::QuotedString;
                None
            }
            '"' => {
                self.mode = LexMode::QuotedIdentifier;
                None
            }
            ':' if !after_literal => self.bind(),
            c if self.options.identifiers.is_start(c) => self.word(start),
            _ => None,
        }
    }

    fn word(&mut self, start: usize) -> Option<Lexeme<'a>> {
        let sql = self.sql;
        let policy = self.options.identifiers;
        let end = self.consume_while(|c| policy.is_part(c));
        let word = &sql[start..end];

        // q'...' and nq'...' only start at a word boundary
        let is_quote_prefix = word.eq_ignore_ascii_case("q") || word.eq_ignore_ascii_case("nq");
        if is_quote_prefix && self.next_if_char('\'') {
            if let Some((_, open)) = self.chars.next() {
                self.mode = LexMode::AlternativeQuotedString {
                    closer: closing_delimiter(open),
                };
            }
            return None;
        }

        Some(Lexeme::Word(word))
    }

    /// Parse the name following a `:`. The colon is already consumed.
    fn bind(&mut self) -> Option<Lexeme<'a>> {
        let &(start, first) = self.chars.peek()?;
        let policy = self.options.identifiers;

        let name = if first == '"' {
            self.chars.next();
            let Some(close) = self.find_closing_quote('"') else {
                self.mode = LexMode::QuotedIdentifier;
                return None;
            };
            let raw = &self.sql[start + 1..close];
            if raw.is_empty() {
                return None;
            }
            raw.replace("\"\"", "\"")
        } else if policy.is_start(first) {
            let end = self.consume_while(|c| policy.is_part(c));
            self.sql[start..end].to_uppercase()
        } else if self.options.positional_binds && first.is_ascii_digit() {
            let end = self.consume_while(|c| c.is_ascii_digit());
            self.sql[start..end].to_string()
        } else {
            return None;
        };

        tracing::trace!(name = %name, "Found bind variable");
        Some(Lexeme::Bind(name))
    }

    fn skip_line_comment(&mut self) -> bool {
        for (_, ch) in self.chars.by_ref() {
            if ch == '\n' {
                return true;
            }
        }
        // End of text also ends a line comment
        true
    }

    fn skip_block_comment(&mut self, mut depth: u32) -> bool {
        while let Some((_, ch)) = self.chars.next() {
            match ch {
                '/' if self.next_if_char('*') => depth += 1,
                '*' if self.next_if_char('/') => {
                    depth -= 1;
                    if depth == 0 {
                        return true;
                    }
                }
                _ => {}
            }
        }
        self.mode = LexMode::BlockComment { depth };
        false
    }

    fn skip_alternative_quoted(&mut self, closer: char) -> bool {
        while let Some((_, ch)) = self.chars.next() {
            if ch == closer && self.next_if_char('\'') {
                return true;
            }
        }
        false
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Lexeme<'a>;

    fn next(&mut self) -> Option<Lexeme<'a>> {
        loop {
            let closed = match self.mode {
                LexMode::Normal => {
                    let (start, ch) = self.chars.next()?;
                    if let Some(lexeme) = self.normal(start, ch) {
                        return Some(lexeme);
                    }
                    continue;
                }
                LexMode::LineComment => self.skip_line_comment(),
                LexMode::BlockComment { depth } => self.skip_block_comment(depth),
                LexMode::QuotedString => self.find_closing_quote('\'').is_some(),
                LexMode::AlternativeQuotedString { closer } => {
                    self.skip_alternative_quoted(closer)
                }
                LexMode::QuotedIdentifier => self.find_closing_quote('"').is_some(),
            };

            if !closed {
                tracing::debug!(mode = ?self.mode, "SQL text ended inside unterminated construct");
                return None;
            }

            self.after_literal = matches!(
                self.mode,
                LexMode::QuotedString | LexMode::AlternativeQuotedString { .. }
            );
            self.mode = LexMode::Normal;
        }
    }
}

impl FusedIterator for Scanner<'_> {}

/// Extract the ordered, de-duplicated bind names from a statement
///
/// Names appear in order of first occurrence. Unquoted names are
/// upper-cased; quoted names are returned exactly as written with `""`
/// collapsed to `"`.
///
/// # Example
///
/// ```
/// use oracle_sql_binds::extract_bind_names;
///
/// let names = extract_bind_names("begin :out := :a + :A + :\"b\"; end;");
/// assert_eq!(names, vec!["OUT", "A", "b"]);
/// ```
pub fn extract_bind_names(sql: &str) -> Vec<String> {
    extract_bind_names_with(sql, ScanOptions::default())
}

/// Extract bind names using explicit scan options
pub fn extract_bind_names_with(sql: &str, options: ScanOptions) -> Vec<String> {
    let names: IndexSet<String> = Scanner::with_options(sql, options)
        .filter_map(Lexeme::into_bind_name)
        .collect();
    names.into_iter().collect()
}
