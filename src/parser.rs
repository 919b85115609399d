//! Heuristic parsers for the statements found in lookup-table exports.
//!
//! Each parser recognizes one family of statements by its leading keywords
//! and turns it into an [`IndexEvent`]. Parsers are tolerant rather than
//! validating: anything outside the column/value blocks they need (storage
//! clauses, `USING INDEX`, `ENABLE`, ...) is ignored.
//!
//! | Parser | Statements |
//! |--------|------------|
//! | [`PkParser`] | `ALTER TABLE t ADD [CONSTRAINT c] PRIMARY KEY (...)`, `CREATE UNIQUE INDEX i ON t (...)` |
//! | [`DdlParser`] | `CREATE TABLE t (...)`, `ALTER TABLE t ADD [(]...[)]` |
//! | [`InsertParser`] | `INSERT INTO t (...) VALUES (...)` |
//!
//! [`ParserSet`] tries them in that order; the first parser whose
//! [`StatementParser::matches`] accepts the statement owns it.
//!
//! # Example
//!
//! ```
//! use lookup_differ::parser::{IndexEvent, ParseInput, ParseOptions, Parsed, ParserSet};
//!
//! let parsers = ParserSet::new();
//! let input = ParseInput {
//!     file: "t1.sql",
//!     line: 1,
//!     raw:  "ALTER TABLE T1 ADD PRIMARY KEY (C1)",
//!     code: "ALTER TABLE T1 ADD PRIMARY KEY (C1)"
//! };
//!
//! let parsed = parsers.parse(&input, &ParseOptions::default());
//! assert!(matches!(
//!     parsed,
//!     Some(Ok(Parsed::Event(IndexEvent::PrimaryKey(_))))
//! ));
//! ```

mod ddl;
mod insert;
mod pk;
mod types;

use compact_str::CompactString;
pub use ddl::DdlParser;
use indexmap::IndexMap;
pub use insert::InsertParser;
pub use pk::PkParser;
pub use types::{IndexEvent, ParseInput, ParseOptions, ParseResult, Parsed, fold_key};
use tracing::trace;

use crate::{
    index::ColumnDef,
    sql::{clean_identifier, first_token, split_top_level_comma, strip_keyword}
};

/// Regex fragment for a possibly schema-qualified, possibly quoted name.
pub(crate) const IDENT: &str = r#"(?:"[^"]*"|[\w$#]+)(?:\s*\.\s*(?:"[^"]*"|[\w$#]+))*"#;

/// Leading keywords of table-level constraint clauses.
const CONSTRAINT_KEYWORDS: [&str; 6] = [
    "CONSTRAINT",
    "PRIMARY KEY",
    "UNIQUE",
    "FOREIGN KEY",
    "CHECK",
    "SUPPLEMENTAL LOG"
];

/// A parser for one family of statements.
///
/// Parsers are stateless and must be `Send + Sync`: files are parsed in
/// parallel with one shared [`ParserSet`].
pub trait StatementParser: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Whether this parser owns the statement.
    ///
    /// A statement that matches but then fails to parse is a parse error,
    /// not an ignored statement.
    fn matches(&self, code: &str) -> bool;

    /// Parse an owned statement.
    fn parse(&self, input: &ParseInput<'_>, options: &ParseOptions) -> ParseResult;
}

/// Ordered collection of parsers with first-match dispatch.
pub struct ParserSet {
    parsers: Vec<Box<dyn StatementParser>>
}

impl Default for ParserSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserSet {
    /// Parser set with the primary key, DDL and INSERT parsers.
    pub fn new() -> Self {
        Self {
            parsers: vec![
                Box::new(PkParser),
                Box::new(DdlParser),
                Box::new(InsertParser)
            ]
        }
    }

    /// Dispatch a statement.
    ///
    /// Returns `None` when no parser owns the statement (`SET DEFINE OFF`,
    /// `COMMIT`, `GRANT`, ...).
    pub fn parse(&self, input: &ParseInput<'_>, options: &ParseOptions) -> Option<ParseResult> {
        self.parsers
            .iter()
            .find(|p| p.matches(input.code))
            .map(|p| {
                trace!(parser = p.name(), file = input.file, line = input.line, "parsing statement");
                p.parse(input, options)
            })
    }
}

/// Whether a column-list clause is a constraint rather than a column.
pub(crate) fn is_constraint_clause(clause: &str) -> bool {
    CONSTRAINT_KEYWORDS
        .iter()
        .any(|kw| strip_keyword(clause, kw).is_some())
}

/// Column definitions of a `( ... )` body, constraints excluded.
///
/// A repeated column keeps its first definition.
pub(crate) fn column_defs(
    body: &str,
    line: usize,
    options: &ParseOptions
) -> IndexMap<CompactString, ColumnDef> {
    let mut columns = IndexMap::new();
    for clause in split_top_level_comma(body) {
        if is_constraint_clause(clause) {
            continue;
        }
        let name = clean_identifier(first_token(clause));
        if name.is_empty() {
            continue;
        }
        columns
            .entry(options.key(&name))
            .or_insert_with(|| ColumnDef {
                name,
                sql_definition: clause.to_string(),
                source_line: line
            });
    }
    columns
}
