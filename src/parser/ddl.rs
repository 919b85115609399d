//! `CREATE TABLE` and `ALTER TABLE ... ADD` column parsing.

use std::sync::LazyLock;

use regex::Regex;

use super::{
    IDENT, StatementParser, column_defs, is_constraint_clause,
    types::{IndexEvent, ParseInput, ParseOptions, ParseResult, Parsed}
};
use crate::{
    index::TableSchema,
    sql::{clean_identifier, first_balanced, split_top_level_comma, strip_keyword, terminate}
};

static CREATE_TABLE_HEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^CREATE\s+TABLE\b").expect("valid regex"));

static CREATE_TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?is)^CREATE\s+TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?(?P<name>{IDENT})\s*\("
    ))
    .expect("valid regex")
});

static ALTER_ADD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?is)^ALTER\s+TABLE\s+(?P<name>{IDENT})\s+ADD\b"))
        .expect("valid regex")
});

/// Parser for table DDL: full `CREATE TABLE` statements and column
/// additions via `ALTER TABLE ... ADD`.
///
/// Constraint clauses (`CONSTRAINT`, `PRIMARY KEY`, `UNIQUE`,
/// `FOREIGN KEY`, `CHECK`) are not columns and are left out of the schema.
pub struct DdlParser;

impl StatementParser for DdlParser {
    fn name(&self) -> &'static str {
        "ddl"
    }

    fn matches(&self, code: &str) -> bool {
        CREATE_TABLE_HEAD.is_match(code) || ALTER_ADD.is_match(code)
    }

    fn parse(&self, input: &ParseInput<'_>, options: &ParseOptions) -> ParseResult {
        if CREATE_TABLE_HEAD.is_match(input.code) {
            parse_create_table(input, options)
        } else {
            parse_alter_add(input, options)
        }
    }
}

fn parse_create_table(input: &ParseInput<'_>, options: &ParseOptions) -> ParseResult {
    let caps = CREATE_TABLE
        .captures(input.code)
        .ok_or("CREATE TABLE without a recognizable table name and column list")?;
    let table_name = clean_identifier(&caps["name"]);
    if !options.accepts_table(&table_name) {
        return Ok(Parsed::Skipped);
    }
    let open = caps.get(0).map_or(0, |m| m.end() - 1);
    let body = first_balanced(&input.code[open..], '(', ')')
        .ok_or_else(|| format!("unbalanced column list in CREATE TABLE {}", table_name))?;
    let columns = column_defs(body, input.line, options);
    Ok(Parsed::Event(IndexEvent::CreateTable(TableSchema {
        table_name,
        file: input.file.to_string(),
        source_line: input.line,
        full_create_statement: Some(terminate(input.raw)),
        columns
    })))
}

fn parse_alter_add(input: &ParseInput<'_>, options: &ParseOptions) -> ParseResult {
    let caps = ALTER_ADD
        .captures(input.code)
        .ok_or("ALTER TABLE without a recognizable table name")?;
    let table_name = clean_identifier(&caps["name"]);
    if !options.accepts_table(&table_name) {
        return Ok(Parsed::Skipped);
    }
    let rest = &input.code[caps.get(0).map_or(0, |m| m.end())..];
    let rest = strip_keyword(rest, "COLUMN").unwrap_or(rest.trim_start());
    if is_constraint_clause(rest) {
        return Ok(Parsed::Skipped);
    }
    let body = if rest.starts_with('(') {
        first_balanced(rest, '(', ')')
            .ok_or_else(|| format!("unbalanced column list in ALTER TABLE {}", table_name))?
    } else {
        rest
    };
    let columns = column_defs(body, input.line, options);
    if columns.is_empty() {
        let clauses = split_top_level_comma(body);
        if !clauses.is_empty() && clauses.iter().all(|c| is_constraint_clause(c)) {
            return Ok(Parsed::Skipped);
        }
        return Err(format!(
            "ALTER TABLE {} ADD without column definitions",
            table_name
        ));
    }
    Ok(Parsed::Event(IndexEvent::AddColumns {
        table_name,
        file: input.file.to_string(),
        line: input.line,
        columns
    }))
}
