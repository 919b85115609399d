//! SQL patch generation from diff findings.
//!
//! Given a [`DiffReport`], [`render_patches`] builds the contents of every
//! patch file in memory and [`PatchWriter`] writes them to an output
//! directory:
//!
//! | File | Content |
//! |------|---------|
//! | `missing_tables.sql` | `CREATE TABLE` text of every missing table |
//! | `schema_patch.sql` | `ALTER TABLE ... ADD` and primary key DDL |
//! | `insert_patch.sql` | `INSERT` statements for missing rows |
//! | `update_patch.sql` | `UPDATE` statements for mismatched rows |
//! | `<table>_insert.sql` | Missing rows of one table |
//! | `<table>_update.sql` | Mismatched rows of one table |
//! | `created_tables.txt` | Names of missing tables, one per line |
//!
//! Every statement ends with exactly one `;`.

use std::path::PathBuf;

use indexmap::{IndexMap, IndexSet};
use tracing::info;

use crate::{
    diff::{DiffReport, Finding, FindingKind},
    error::AppResult,
    output::write_artifact,
    sql::terminate
};

pub const MISSING_TABLES_FILE: &str = "missing_tables.sql";
pub const SCHEMA_PATCH_FILE: &str = "schema_patch.sql";
pub const INSERT_PATCH_FILE: &str = "insert_patch.sql";
pub const UPDATE_PATCH_FILE: &str = "update_patch.sql";
pub const CREATED_TABLES_FILE: &str = "created_tables.txt";

/// Rendered patch files, keyed by file name, in write order.
#[derive(Debug, Clone, Default)]
pub struct PatchSet {
    pub files: IndexMap<String, String>
}

impl PatchSet {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.files.get(name).map(String::as_str)
    }
}

/// Writes a [`PatchSet`] into a directory.
#[derive(Debug, Clone)]
pub struct PatchWriter {
    out_dir: PathBuf
}

impl PatchWriter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into()
        }
    }

    /// Render and write all patch files, returning their paths.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or a file cannot
    /// be written.
    pub fn write(&self, report: &DiffReport) -> AppResult<Vec<PathBuf>> {
        let patches = render_patches(report);
        let mut written = Vec::with_capacity(patches.files.len());
        for (name, content) in &patches.files {
            let path = self.out_dir.join(name);
            write_artifact(&path, content)?;
            written.push(path);
        }
        info!(dir = %self.out_dir.display(), files = written.len(), "patch files written");
        Ok(written)
    }
}

/// Render every patch file for a report.
pub fn render_patches(report: &DiffReport) -> PatchSet {
    let missing: IndexSet<&str> = report
        .of_kind(FindingKind::TableMissing)
        .map(|f| f.table.as_str())
        .collect();

    let mut files = IndexMap::new();
    files.insert(MISSING_TABLES_FILE.to_string(), missing_tables_sql(report));
    files.insert(SCHEMA_PATCH_FILE.to_string(), schema_patch_sql(report));
    files.insert(
        INSERT_PATCH_FILE.to_string(),
        grouped_sql(
            "-- Data patch: insert missing rows (SOURCE -> TARGET)\n",
            report.of_kind(FindingKind::RowMissing),
            &missing
        )
    );
    files.insert(
        UPDATE_PATCH_FILE.to_string(),
        grouped_sql(
            "-- Data patch: update mismatched rows (SOURCE -> TARGET)\n",
            report.of_kind(FindingKind::RowMismatch),
            &missing
        )
    );

    for (kind, suffix) in [
        (FindingKind::RowMissing, "insert"),
        (FindingKind::RowMismatch, "update")
    ] {
        let mut per_table: IndexMap<&str, Vec<&Finding>> = IndexMap::new();
        for finding in report.of_kind(kind) {
            per_table.entry(finding.table.as_str()).or_default().push(finding);
        }
        for (table, findings) in per_table {
            let name = format!("{}_{}.sql", table_file_stem(table), suffix);
            let content = grouped_sql("", findings.into_iter(), &missing);
            files
                .entry(name)
                .and_modify(|existing: &mut String| existing.push_str(&content))
                .or_insert(content);
        }
    }

    let mut created = String::new();
    for table in &missing {
        created.push_str(table);
        created.push('\n');
    }
    files.insert(CREATED_TABLES_FILE.to_string(), created);

    PatchSet {
        files
    }
}

fn missing_tables_sql(report: &DiffReport) -> String {
    let mut out = String::from("-- Tables present in SOURCE but missing in TARGET\n");
    for finding in report.of_kind(FindingKind::TableMissing) {
        out.push('\n');
        match &finding.ddl {
            Some(ddl) => push_statement(&mut out, ddl),
            None => {
                out.push_str("-- ");
                out.push_str(&finding.table);
                out.push('\n');
            }
        }
    }
    out
}

fn schema_patch_sql(report: &DiffReport) -> String {
    let mut out = String::from("-- Schema patch: missing columns and primary keys (SOURCE -> TARGET)\n");
    for finding in &report.findings {
        if !matches!(finding.kind, FindingKind::ColumnMissing | FindingKind::PkMissing) {
            continue;
        }
        if let Some(ddl) = &finding.ddl {
            push_statement(&mut out, ddl);
        }
    }
    out
}

fn grouped_sql<'a>(
    header: &str,
    findings: impl Iterator<Item = &'a Finding>,
    missing: &IndexSet<&str>
) -> String {
    let mut out = String::from(header);
    let mut current: Option<&str> = None;
    for finding in findings {
        let Some(dml) = &finding.dml else {
            continue;
        };
        if current != Some(finding.table.as_str()) {
            current = Some(finding.table.as_str());
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str("-- Table: ");
            out.push_str(&finding.table);
            if missing.contains(finding.table.as_str()) {
                out.push_str(" (MISSING IN TARGET)");
            }
            out.push('\n');
        }
        push_statement(&mut out, dml);
    }
    out
}

/// Append a statement on its own line; comment lines are kept as written.
fn push_statement(out: &mut String, sql: &str) {
    if sql.trim_start().starts_with("--") {
        out.push_str(sql.trim_end());
    } else {
        out.push_str(&terminate(sql));
    }
    out.push('\n');
}

/// Lower-cased table name safe for use as a file name.
pub fn table_file_stem(table: &str) -> String {
    let stem: String = table
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect();
    if stem.is_empty() { String::from("_") } else { stem }
}
