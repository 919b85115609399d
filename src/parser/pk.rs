//! Primary key declarations.

use std::sync::LazyLock;

use regex::Regex;
use smallvec::SmallVec;

use super::{
    IDENT, StatementParser,
    types::{IndexEvent, ParseInput, ParseOptions, ParseResult, Parsed}
};
use crate::{
    index::PrimaryKey,
    sql::{clean_identifier, first_balanced, first_token, split_top_level_comma, terminate}
};

static ALTER_PK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?is)^ALTER\s+TABLE\s+(?P<name>{IDENT})\s+ADD(?:\s+|\s*\(\s*)(?:CONSTRAINT\s+{IDENT}\s+)?PRIMARY\s+KEY\s*\("
    ))
    .expect("valid regex")
});

static UNIQUE_INDEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?is)^CREATE\s+UNIQUE\s+INDEX\s+{IDENT}\s+ON\s+(?P<name>{IDENT})\s*\("
    ))
    .expect("valid regex")
});

/// Parser for `ALTER TABLE ... ADD [CONSTRAINT c] PRIMARY KEY (...)`, with
/// or without parentheses around the constraint, and
/// `CREATE UNIQUE INDEX ... ON t (...)`.
///
/// A unique index is treated as a primary key so that exports that only
/// carry an index still get key-based row matching.
pub struct PkParser;

impl StatementParser for PkParser {
    fn name(&self) -> &'static str {
        "primary-key"
    }

    fn matches(&self, code: &str) -> bool {
        ALTER_PK.is_match(code) || UNIQUE_INDEX.is_match(code)
    }

    fn parse(&self, input: &ParseInput<'_>, options: &ParseOptions) -> ParseResult {
        let caps = ALTER_PK
            .captures(input.code)
            .or_else(|| UNIQUE_INDEX.captures(input.code))
            .ok_or("unrecognized primary key declaration")?;
        let table_name = clean_identifier(&caps["name"]);
        if !options.accepts_table(&table_name) {
            return Ok(Parsed::Skipped);
        }
        let open = caps.get(0).map_or(0, |m| m.end() - 1);
        let list = first_balanced(&input.code[open..], '(', ')')
            .ok_or_else(|| format!("unbalanced key column list for {}", table_name))?;
        let columns: SmallVec<[_; 4]> = split_top_level_comma(list)
            .into_iter()
            .map(|col| clean_identifier(first_token(col)))
            .filter(|col| !col.is_empty())
            .collect();
        if columns.is_empty() {
            return Err(format!("empty key column list for {}", table_name));
        }
        Ok(Parsed::Event(IndexEvent::PrimaryKey(PrimaryKey {
            table_name,
            columns,
            ddl_text: terminate(input.raw),
            file: input.file.to_string(),
            line: input.line
        })))
    }
}
