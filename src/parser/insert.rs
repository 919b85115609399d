//! Single-row `INSERT INTO ... (cols) VALUES (vals)` parsing.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

use super::{
    IDENT, StatementParser,
    types::{IndexEvent, ParseInput, ParseOptions, ParseResult, Parsed}
};
use crate::{
    index::{DataRow, RowValue},
    sql::{
        balanced_span, clean_identifier, first_balanced, first_token, normalize_value,
        split_top_level_comma, strip_keyword, terminate
    }
};

static INSERT_HEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^INSERT\s+INTO\b").expect("valid regex"));

static INSERT_INTO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?is)^INSERT\s+INTO\s+(?P<name>{IDENT})\s*"))
        .expect("valid regex")
});

/// Parser for single-row inserts with an explicit column list.
///
/// Values are split on top-level commas, so function calls such as
/// `TO_DATE('2024-01-01', 'YYYY-MM-DD')` stay one value. Each value is
/// stored normalized; see [`normalize_value`].
pub struct InsertParser;

impl StatementParser for InsertParser {
    fn name(&self) -> &'static str {
        "insert"
    }

    fn matches(&self, code: &str) -> bool {
        INSERT_HEAD.is_match(code)
    }

    fn parse(&self, input: &ParseInput<'_>, options: &ParseOptions) -> ParseResult {
        let caps = INSERT_INTO
            .captures(input.code)
            .ok_or("INSERT without a recognizable table name")?;
        let table_name = clean_identifier(&caps["name"]);
        if !options.accepts_table(&table_name) {
            return Ok(Parsed::Skipped);
        }

        let rest = &input.code[caps.get(0).map_or(0, |m| m.end())..];
        if !rest.starts_with('(') {
            return Err(format!("INSERT INTO {} without a column list", table_name));
        }
        let span = balanced_span(rest, '(', ')')
            .ok_or_else(|| format!("unbalanced column list in INSERT INTO {}", table_name))?;
        let column_list = &rest[span.clone()];
        let after_columns = &rest[span.end + 1..];
        let values_part = strip_keyword(after_columns, "VALUES")
            .ok_or_else(|| format!("INSERT INTO {} without VALUES", table_name))?;
        let value_list = first_balanced(values_part, '(', ')')
            .ok_or_else(|| format!("unbalanced VALUES list in INSERT INTO {}", table_name))?;

        let names = split_top_level_comma(column_list);
        let values = split_top_level_comma(value_list);
        if names.len() != values.len() {
            return Err(format!(
                "column/value count mismatch ({} columns, {} values)",
                names.len(),
                values.len()
            ));
        }

        let mut columns = IndexMap::with_capacity(names.len());
        for (name, value) in names.into_iter().zip(values) {
            let token = first_token(name);
            let column = clean_identifier(token);
            columns.entry(options.key(&column)).or_insert(RowValue {
                column,
                sql_name: token.trim().into(),
                value: normalize_value(value)
            });
        }

        Ok(Parsed::Event(IndexEvent::Row(DataRow {
            table_name,
            file: input.file.to_string(),
            source_line: input.line,
            columns,
            original_insert_sql: terminate(input.raw)
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_with(code: &str, options: &ParseOptions) -> ParseResult {
        InsertParser.parse(
            &ParseInput {
                file: "data.sql",
                line: 4,
                raw: code,
                code
            },
            options
        )
    }

    fn row(code: &str) -> DataRow {
        match parse_with(code, &ParseOptions::default()) {
            Ok(Parsed::Event(IndexEvent::Row(row))) => row,
            other => panic!("expected row, got {:?}", other)
        }
    }

    #[test]
    fn test_insert_basic() {
        let row = row("INSERT INTO T1 (C1, C2) VALUES (1, 'a')");
        assert_eq!(row.table_name, "T1");
        assert_eq!(row.columns["C1"].value, "1");
        assert_eq!(row.columns["C2"].value, "'a'");
        assert_eq!(row.original_insert_sql, "INSERT INTO T1 (C1, C2) VALUES (1, 'a');");
        assert_eq!(row.source_line, 4);
    }

    #[test]
    fn test_insert_quoted_commas_and_functions() {
        let row = row(
            r#"Insert into "APP"."T2" ("ID","VAL","D") values (1,'x, y',to_date('01-JAN-24','DD-MON-RR'))"#
        );
        assert_eq!(row.table_name, "T2");
        assert_eq!(row.columns.len(), 3);
        assert_eq!(row.columns["VAL"].value, "'x, y'");
        assert_eq!(row.columns["D"].value, "to_date('01-JAN-24','DD-MON-RR')");
    }

    #[test]
    fn test_insert_null_normalized() {
        let row = row("INSERT INTO T1 (C1, C2) VALUES (1, null)");
        assert_eq!(row.columns["C2"].value, "NULL");
    }

    #[test]
    fn test_insert_count_mismatch() {
        let err = parse_with("INSERT INTO T1 (C1, C2) VALUES (1)", &ParseOptions::default()).unwrap_err();
        assert_eq!(err, "column/value count mismatch (2 columns, 1 values)");
    }

    #[test]
    fn test_insert_without_column_list() {
        assert!(parse_with("INSERT INTO T1 VALUES (1)", &ParseOptions::default()).is_err());
    }

    #[test]
    fn test_insert_select_is_error() {
        assert!(parse_with("INSERT INTO T1 (C1) SELECT C1 FROM T0", &ParseOptions::default()).is_err());
    }

    #[test]
    fn test_insert_case_sensitive_keys() {
        let options = ParseOptions {
            case_insensitive: false,
            ..ParseOptions::default()
        };
        let Ok(Parsed::Event(IndexEvent::Row(row))) =
            parse_with("INSERT INTO t1 (Code) VALUES ('A')", &options)
        else {
            panic!("expected row");
        };
        assert!(row.columns.contains_key("Code"));
        assert!(!row.columns.contains_key("CODE"));
    }
}
