//! Row-level differences for one table.

use std::collections::{HashMap, HashSet};

use compact_str::CompactString;
use smallvec::SmallVec;

use crate::{
    diff::types::{Finding, FindingKind},
    index::{DataRow, ExportIndex, PrimaryKey, RowValue},
    parser::fold_key
};

/// Diff the rows of one source table against the target.
///
/// Uses the source primary key, then the target's; without either, rows are
/// matched on all values and only missing rows are reported.
pub(super) fn diff_table_rows(
    key: &str,
    source: &ExportIndex,
    target: &ExportIndex,
    case_insensitive: bool
) -> Vec<Finding> {
    let rows = source.rows_of(key);
    if rows.is_empty() {
        return Vec::new();
    }
    let table = source.display_name(key);
    let target_rows = target.rows_of(key);
    match source
        .primary_keys
        .get(key)
        .or_else(|| target.primary_keys.get(key))
    {
        Some(pk) => diff_by_primary_key(table, pk, rows, target_rows, case_insensitive),
        None => diff_by_identity(table, rows, target_rows)
    }
}

fn diff_by_identity(table: &str, rows: &[DataRow], target_rows: &[DataRow]) -> Vec<Finding> {
    let mut findings = Vec::with_capacity(1);
    let first = &rows[0];
    findings.push(Finding::new(
        FindingKind::WarnNoPk,
        table,
        first.file.clone(),
        Some(first.source_line),
        "No primary key or unique index found; rows matched on all column values, mismatches not detected."
    ));

    let known: HashSet<String> = target_rows.iter().map(DataRow::fallback_identity).collect();
    for row in rows {
        if !known.contains(&row.fallback_identity()) {
            findings.push(
                Finding::new(
                    FindingKind::RowMissing,
                    table,
                    row.file.clone(),
                    Some(row.source_line),
                    "Row exists in SOURCE but not in TARGET."
                )
                .with_dml(row.original_insert_sql.clone())
            );
        }
    }
    findings
}

fn diff_by_primary_key(
    table: &str,
    pk: &PrimaryKey,
    rows: &[DataRow],
    target_rows: &[DataRow],
    case_insensitive: bool
) -> Vec<Finding> {
    let keys: SmallVec<[CompactString; 4]> = pk
        .columns
        .iter()
        .map(|c| fold_key(c, case_insensitive))
        .collect();

    let mut by_key: HashMap<SmallVec<[&str; 4]>, &DataRow> = HashMap::with_capacity(target_rows.len());
    for row in target_rows {
        by_key.entry(row.pk_tuple(&keys)).or_insert(row);
    }

    let mut findings = Vec::new();
    for row in rows {
        let tuple = row.pk_tuple(&keys);
        let identity = describe_key(&pk.columns, &tuple);
        match by_key.get(&tuple) {
            None => findings.push(
                Finding::new(
                    FindingKind::RowMissing,
                    table,
                    row.file.clone(),
                    Some(row.source_line),
                    format!("Row exists in SOURCE but not in TARGET: {}", identity)
                )
                .with_dml(row.original_insert_sql.clone())
            ),
            Some(other) if same_values(row, other) => {}
            Some(other) => {
                let changed = changed_columns(row, other, &keys);
                let predicate = where_clause(row, &pk.columns, &keys, &tuple);
                let (message, dml) = if changed.is_empty() {
                    (
                        format!(
                            "Row differs between SOURCE and TARGET only in columns SOURCE does not define: {}",
                            identity
                        ),
                        format!(
                            "-- No-op UPDATE {} WHERE {}: no SOURCE column differs",
                            table, predicate
                        )
                    )
                } else {
                    let names: Vec<&str> = changed.iter().map(|v| v.column.as_str()).collect();
                    let sets: Vec<String> = changed
                        .iter()
                        .map(|v| format!("{} = {}", v.sql_name, v.value))
                        .collect();
                    (
                        format!(
                            "Row differs between SOURCE and TARGET: {} (columns: {})",
                            identity,
                            names.join(", ")
                        ),
                        format!("UPDATE {} SET {} WHERE {};", table, sets.join(", "), predicate)
                    )
                };
                findings.push(
                    Finding::new(
                        FindingKind::RowMismatch,
                        table,
                        row.file.clone(),
                        Some(row.source_line),
                        message
                    )
                    .with_dml(dml)
                );
            }
        }
    }
    findings
}

fn same_values(row: &DataRow, other: &DataRow) -> bool {
    row.columns.len() == other.columns.len()
        && row
            .columns
            .iter()
            .all(|(key, v)| other.value(key) == Some(v.value.as_str()))
}

/// Non-key source columns whose value differs in the target.
fn changed_columns<'a>(
    row: &'a DataRow,
    other: &DataRow,
    keys: &[CompactString]
) -> Vec<&'a RowValue> {
    row.columns
        .iter()
        .filter(|(key, _)| !keys.contains(key))
        .filter(|(key, v)| other.value(key) != Some(v.value.as_str()))
        .map(|(_, v)| v)
        .collect()
}

/// Key predicate; columns are spelled the way the source INSERT spells
/// them so quoted identifiers keep their quotes.
fn where_clause(
    row: &DataRow,
    columns: &[CompactString],
    keys: &[CompactString],
    tuple: &[&str]
) -> String {
    columns
        .iter()
        .zip(keys)
        .zip(tuple)
        .map(|((column, key), value)| {
            let name = row
                .columns
                .get(key)
                .map_or(column.as_str(), |v| v.sql_name.as_str());
            if *value == "NULL" {
                format!("{} IS NULL", name)
            } else {
                format!("{} = {}", name, value)
            }
        })
        .collect::<Vec<_>>()
        .join(" AND ")
}

fn describe_key(columns: &[CompactString], tuple: &[&str]) -> String {
    columns
        .iter()
        .zip(tuple)
        .map(|(column, value)| format!("{}={}", column, value))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{index::ExportIndexBuilder, parser::ParseOptions};

    fn index(sql: &str) -> ExportIndex {
        ExportIndexBuilder::new(ParseOptions::default()).index_sources([("data.sql", sql)])
    }

    #[test]
    fn test_pk_update_generation() {
        let source = index(
            "ALTER TABLE T2 ADD PRIMARY KEY (ID);\nINSERT INTO T2 (ID, VAL) VALUES (1, 'Old');"
        );
        let target = index("INSERT INTO T2 (ID, VAL) VALUES (1, 'Changed');");
        let findings = diff_table_rows("T2", &source, &target, true);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::RowMismatch);
        assert_eq!(
            findings[0].dml.as_deref(),
            Some("UPDATE T2 SET VAL = 'Old' WHERE ID = 1;")
        );
    }

    #[test]
    fn test_target_pk_used_when_source_has_none() {
        let source = index("INSERT INTO T2 (ID, VAL) VALUES (1, 'Old');");
        let target = index(
            "CREATE UNIQUE INDEX UX ON T2 (ID);\nINSERT INTO T2 (ID, VAL) VALUES (1, 'New');"
        );
        let findings = diff_table_rows("T2", &source, &target, true);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::RowMismatch);
    }

    #[test]
    fn test_missing_row_with_pk() {
        let source = index(
            "ALTER TABLE T1 ADD PRIMARY KEY (ID);\nINSERT INTO T1 (ID) VALUES (1);\nINSERT INTO T1 (ID) VALUES (2);"
        );
        let target = index("INSERT INTO T1 (ID) VALUES (1);");
        let findings = diff_table_rows("T1", &source, &target, true);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::RowMissing);
        assert_eq!(findings[0].dml.as_deref(), Some("INSERT INTO T1 (ID) VALUES (2);"));
        assert_eq!(findings[0].line, Some(3));
    }

    #[test]
    fn test_no_pk_warns_once_and_matches_on_values() {
        let source = index(
            "INSERT INTO T3 (A, B) VALUES (1, 'x');\nINSERT INTO T3 (A, B) VALUES (2, 'y');"
        );
        let target = index("INSERT INTO T3 (B, A) VALUES ('x', 1);\nINSERT INTO T3 (A, B) VALUES (2, 'z');");
        let findings = diff_table_rows("T3", &source, &target, true);
        let kinds: Vec<_> = findings.iter().map(|f| f.kind).collect();
        assert_eq!(kinds, [FindingKind::WarnNoPk, FindingKind::RowMissing]);
        assert_eq!(findings[1].line, Some(2));
    }

    #[test]
    fn test_noop_update_when_only_target_has_extra_column() {
        let source = index("ALTER TABLE T4 ADD PRIMARY KEY (ID);\nINSERT INTO T4 (ID) VALUES (1);");
        let target = index("INSERT INTO T4 (ID, EXTRA) VALUES (1, 'e');");
        let findings = diff_table_rows("T4", &source, &target, true);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::RowMismatch);
        assert!(findings[0].dml.as_deref().unwrap().starts_with("-- No-op UPDATE T4 WHERE ID = 1"));
    }

    #[test]
    fn test_null_key_uses_is_null() {
        let source = index(
            "ALTER TABLE T5 ADD PRIMARY KEY (ID, LANG);\nINSERT INTO T5 (ID, LANG, V) VALUES (1, NULL, 'a');"
        );
        let target = index("INSERT INTO T5 (ID, LANG, V) VALUES (1, null, 'b');");
        let findings = diff_table_rows("T5", &source, &target, true);
        assert_eq!(
            findings[0].dml.as_deref(),
            Some("UPDATE T5 SET V = 'a' WHERE ID = 1 AND LANG IS NULL;")
        );
    }

    #[test]
    fn test_update_keeps_quoted_column_spelling() {
        let source = index(
            "ALTER TABLE T7 ADD PRIMARY KEY (\"ID\");\nINSERT INTO T7 (\"ID\", \"val\") VALUES (1, 'a');"
        );
        let target = index("INSERT INTO T7 (\"ID\", \"val\") VALUES (1, 'b');");
        let findings = diff_table_rows("T7", &source, &target, true);
        assert_eq!(
            findings[0].dml.as_deref(),
            Some("UPDATE T7 SET \"val\" = 'a' WHERE \"ID\" = 1;")
        );
        assert!(findings[0].message.ends_with("(columns: val)"));
    }

    #[test]
    fn test_equal_rows_yield_nothing() {
        let sql = "ALTER TABLE T6 ADD PRIMARY KEY (ID);\nINSERT INTO T6 (ID, V) VALUES (1,   'a');";
        let target = "INSERT INTO T6 (V, ID) VALUES ('a', 1);";
        assert!(diff_table_rows("T6", &index(sql), &index(target), true).is_empty());
    }
}
