//! Inputs and outputs shared by the statement parsers.

use compact_str::CompactString;
use indexmap::IndexMap;

use crate::index::{ColumnDef, DataRow, PrimaryKey, TableSchema};

/// Read-only configuration every parser honors.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Fold table and column keys to upper case
    pub case_insensitive: bool,
    /// Only index tables whose name contains this text
    pub table_contains:   Option<String>
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            case_insensitive: true,
            table_contains:   None
        }
    }
}

impl ParseOptions {
    /// Lookup key for a cleaned table or column name.
    pub fn key(&self, name: &str) -> CompactString {
        fold_key(name, self.case_insensitive)
    }

    /// Whether the table filter lets this cleaned table name through.
    pub fn accepts_table(&self, name: &str) -> bool {
        match self.table_contains.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(filter) if self.case_insensitive => {
                name.to_lowercase().contains(&filter.to_lowercase())
            }
            Some(filter) => name.contains(filter)
        }
    }
}

/// Lookup key for a table or column name: upper-cased when matching is
/// case-insensitive, unchanged otherwise.
pub fn fold_key(name: &str, case_insensitive: bool) -> CompactString {
    if case_insensitive {
        CompactString::from(name.to_uppercase())
    } else {
        CompactString::from(name)
    }
}

/// One statement handed to a parser.
#[derive(Debug, Clone, Copy)]
pub struct ParseInput<'a> {
    /// File the statement came from
    pub file: &'a str,
    /// 1-based start line
    pub line: usize,
    /// Raw statement text as written in the export
    pub raw:  &'a str,
    /// Comment-free, whitespace-flattened statement text
    pub code: &'a str
}

/// Contribution of one statement to an export index.
#[derive(Debug, Clone)]
pub enum IndexEvent {
    /// A full `CREATE TABLE`
    CreateTable(TableSchema),
    /// Columns from `ALTER TABLE ... ADD`
    AddColumns {
        table_name: CompactString,
        file:       String,
        line:       usize,
        columns:    IndexMap<CompactString, ColumnDef>
    },
    /// A primary key or unique index declaration
    PrimaryKey(PrimaryKey),
    /// One `INSERT` row
    Row(DataRow)
}

/// Successful parser result.
#[derive(Debug, Clone)]
pub enum Parsed {
    /// The statement contributes to the index
    Event(IndexEvent),
    /// The statement was understood but has nothing to index (filtered
    /// table, constraint-only `ALTER`)
    Skipped
}

/// Parser result; the error is a human-readable reason.
pub type ParseResult = Result<Parsed, String>;
