//! Structural differences: tables, columns and primary keys.

use crate::{
    diff::types::{Finding, FindingKind},
    index::ExportIndex
};

/// Source tables with a schema or rows that the target does not know at all.
pub(super) fn missing_tables(source: &ExportIndex, target: &ExportIndex) -> Vec<Finding> {
    let mut findings = Vec::new();
    for key in &source.tables {
        let schema = source.schemas.get(key);
        let first_row = source.rows_of(key).first();
        if (schema.is_none() && first_row.is_none()) || target.has_table(key) {
            continue;
        }
        let (file, line) = match (schema, first_row) {
            (Some(schema), _) => (schema.file.as_str(), schema.source_line),
            (None, Some(row)) => (row.file.as_str(), row.source_line),
            (None, None) => continue
        };
        let mut finding = Finding::new(
            FindingKind::TableMissing,
            source.display_name(key),
            file,
            Some(line),
            "Table exists in SOURCE but not in TARGET."
        );
        finding.ddl = schema.and_then(|s| s.full_create_statement.clone());
        findings.push(finding);
    }
    findings
}

/// Source columns absent from a target table that has a schema.
pub(super) fn missing_columns(source: &ExportIndex, target: &ExportIndex) -> Vec<Finding> {
    let mut findings = Vec::new();
    for key in &source.tables {
        let (Some(src), Some(tgt)) = (source.schemas.get(key), target.schemas.get(key)) else {
            continue;
        };
        for (column_key, column) in &src.columns {
            if tgt.columns.contains_key(column_key) {
                continue;
            }
            findings.push(
                Finding::new(
                    FindingKind::ColumnMissing,
                    src.table_name.clone(),
                    src.file.clone(),
                    Some(column.source_line),
                    format!("Column exists in SOURCE but not in TARGET: {}", column.name)
                )
                .with_ddl(format!(
                    "ALTER TABLE {} ADD ({});",
                    src.table_name, column.sql_definition
                ))
            );
        }
    }
    findings
}

/// Primary keys declared in source for tables the target has without one.
pub(super) fn missing_primary_keys(source: &ExportIndex, target: &ExportIndex) -> Vec<Finding> {
    let mut findings = Vec::new();
    for key in &source.tables {
        let Some(pk) = source.primary_keys.get(key) else {
            continue;
        };
        if !target.has_table(key) || target.primary_keys.contains_key(key) {
            continue;
        }
        findings.push(
            Finding::new(
                FindingKind::PkMissing,
                source.display_name(key),
                pk.file.clone(),
                Some(pk.line),
                format!(
                    "Primary key exists in SOURCE but not in TARGET: ({})",
                    pk.columns.join(", ")
                )
            )
            .with_ddl(pk.ddl_text.clone())
        );
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{index::ExportIndexBuilder, parser::ParseOptions};

    fn index(sql: &str) -> ExportIndex {
        ExportIndexBuilder::new(ParseOptions::default()).index_sources([("x.sql", sql)])
    }

    #[test]
    fn test_missing_table_carries_create() {
        let source = index("CREATE TABLE T1 (C1 NUMBER);");
        let findings = missing_tables(&source, &ExportIndex::default());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].ddl.as_deref(), Some("CREATE TABLE T1 (C1 NUMBER);"));
    }

    #[test]
    fn test_table_with_target_rows_only_is_present() {
        let source = index("CREATE TABLE T1 (C1 NUMBER);");
        let target = index("INSERT INTO T1 (C1) VALUES (1);");
        assert!(missing_tables(&source, &target).is_empty());
    }

    #[test]
    fn test_table_with_target_pk_only_is_present() {
        let source = index("CREATE TABLE T1 (C1 NUMBER);");
        let target = index("ALTER TABLE T1 ADD PRIMARY KEY (C1);");
        assert!(missing_tables(&source, &target).is_empty());
    }

    #[test]
    fn test_row_only_table_missing_without_ddl() {
        let source = index("INSERT INTO T1 (C1) VALUES (1);");
        let findings = missing_tables(&source, &ExportIndex::default());
        assert_eq!(findings.len(), 1);
        assert!(findings[0].ddl.is_none());
    }

    #[test]
    fn test_missing_column_ddl() {
        let source = index("CREATE TABLE T1 (C1 NUMBER, C2 VARCHAR2(100));");
        let target = index("CREATE TABLE t1 (c1 NUMBER);");
        let findings = missing_columns(&source, &target);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].message, "Column exists in SOURCE but not in TARGET: C2");
        assert_eq!(findings[0].ddl.as_deref(), Some("ALTER TABLE T1 ADD (C2 VARCHAR2(100));"));
    }

    #[test]
    fn test_missing_pk_only_when_target_has_table() {
        let source = index("CREATE TABLE T1 (C1 NUMBER);\nALTER TABLE T1 ADD PRIMARY KEY (C1);");
        assert!(missing_primary_keys(&source, &ExportIndex::default()).is_empty());

        let target = index("CREATE TABLE T1 (C1 NUMBER);");
        let findings = missing_primary_keys(&source, &target);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].ddl.as_deref(), Some("ALTER TABLE T1 ADD PRIMARY KEY (C1);"));

        let keyed = index("CREATE TABLE T1 (C1 NUMBER);\nCREATE UNIQUE INDEX UX ON T1 (C1);");
        assert!(missing_primary_keys(&source, &keyed).is_empty());
    }
}
