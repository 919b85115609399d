//! Type definitions for diff results.
//!
//! - [`FindingKind`] - The seven kinds of difference
//! - [`Finding`] - One difference with its location and generated SQL
//! - [`DiffSummary`] - Counts per kind and the clean/dirty verdict
//! - [`DiffReport`] - Ordered finding list

use compact_str::CompactString;
use serde::Serialize;

/// Kind of a finding.
///
/// Serialized in `SCREAMING_SNAKE_CASE` (`TABLE_MISSING`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FindingKind {
    /// Table present in source, absent in target
    TableMissing,
    /// Column present in source, absent in target
    ColumnMissing,
    /// Primary key declared in source, absent in target
    PkMissing,
    /// Source row with no matching target row
    RowMissing,
    /// Source row whose matching target row has other values
    RowMismatch,
    /// Table with rows but no primary key on either side
    WarnNoPk,
    /// Statement or file that could not be indexed
    ParseError
}

impl FindingKind {
    /// All kinds in report order.
    pub const ALL: [FindingKind; 7] = [
        Self::TableMissing,
        Self::ColumnMissing,
        Self::PkMissing,
        Self::RowMissing,
        Self::RowMismatch,
        Self::WarnNoPk,
        Self::ParseError
    ];

    /// Wire name, e.g. `TABLE_MISSING`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TableMissing => "TABLE_MISSING",
            Self::ColumnMissing => "COLUMN_MISSING",
            Self::PkMissing => "PK_MISSING",
            Self::RowMissing => "ROW_MISSING",
            Self::RowMismatch => "ROW_MISMATCH",
            Self::WarnNoPk => "WARN_NO_PK",
            Self::ParseError => "PARSE_ERROR"
        }
    }

    /// Section title in reports.
    pub fn title(&self) -> &'static str {
        match self {
            Self::TableMissing => "Tables missing in target",
            Self::ColumnMissing => "Columns missing in target",
            Self::PkMissing => "Primary keys missing in target",
            Self::RowMissing => "Missing rows",
            Self::RowMismatch => "Mismatched rows",
            Self::WarnNoPk => "Tables without primary key",
            Self::ParseError => "Parse errors"
        }
    }

    /// Whether findings of this kind make a run dirty.
    pub fn is_blocking(&self) -> bool {
        !matches!(self, Self::WarnNoPk)
    }
}

impl std::fmt::Display for FindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single difference between the source and target exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Kind of difference
    pub kind:    FindingKind,
    /// Table name with source casing; empty for file-level parse errors
    pub table:   CompactString,
    /// File the finding points at, relative to its export directory
    pub file:    String,
    /// 1-based line, when known
    pub line:    Option<usize>,
    /// Human-readable description
    pub message: String,
    /// Generated or captured DDL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ddl:     Option<String>,
    /// Generated or captured DML
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dml:     Option<String>
}

impl Finding {
    pub fn new(
        kind: FindingKind,
        table: impl Into<CompactString>,
        file: impl Into<String>,
        line: Option<usize>,
        message: impl Into<String>
    ) -> Self {
        Self {
            kind,
            table: table.into(),
            file: file.into(),
            line,
            message: message.into(),
            ddl: None,
            dml: None
        }
    }

    pub fn with_ddl(mut self, ddl: impl Into<String>) -> Self {
        self.ddl = Some(ddl.into());
        self
    }

    pub fn with_dml(mut self, dml: impl Into<String>) -> Self {
        self.dml = Some(dml.into());
        self
    }

    /// `file:line`, or just the file when the line is unknown.
    pub fn location(&self) -> String {
        match self.line {
            Some(line) => format!("{}:{}", self.file, line),
            None => self.file.clone()
        }
    }
}

/// Counts per finding kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffSummary {
    pub missing_tables:  usize,
    pub missing_columns: usize,
    pub missing_pks:     usize,
    pub missing_rows:    usize,
    pub mismatched_rows: usize,
    pub warnings:        usize,
    pub parse_errors:    usize
}

impl DiffSummary {
    /// Count for one kind.
    pub fn count(&self, kind: FindingKind) -> usize {
        match kind {
            FindingKind::TableMissing => self.missing_tables,
            FindingKind::ColumnMissing => self.missing_columns,
            FindingKind::PkMissing => self.missing_pks,
            FindingKind::RowMissing => self.missing_rows,
            FindingKind::RowMismatch => self.mismatched_rows,
            FindingKind::WarnNoPk => self.warnings,
            FindingKind::ParseError => self.parse_errors
        }
    }

    /// A run is clean when nothing but warnings was found.
    pub fn is_clean(&self) -> bool {
        FindingKind::ALL
            .iter()
            .filter(|kind| kind.is_blocking())
            .all(|kind| self.count(*kind) == 0)
    }
}

/// Ordered findings of one diff run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiffReport {
    /// Findings in emission order
    pub findings: Vec<Finding>
}

impl DiffReport {
    pub fn new(findings: Vec<Finding>) -> Self {
        Self {
            findings
        }
    }

    pub fn count(&self, kind: FindingKind) -> usize {
        self.findings.iter().filter(|f| f.kind == kind).count()
    }

    pub fn of_kind(&self, kind: FindingKind) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.kind == kind)
    }

    pub fn summary(&self) -> DiffSummary {
        let mut summary = DiffSummary::default();
        for finding in &self.findings {
            match finding.kind {
                FindingKind::TableMissing => summary.missing_tables += 1,
                FindingKind::ColumnMissing => summary.missing_columns += 1,
                FindingKind::PkMissing => summary.missing_pks += 1,
                FindingKind::RowMissing => summary.missing_rows += 1,
                FindingKind::RowMismatch => summary.mismatched_rows += 1,
                FindingKind::WarnNoPk => summary.warnings += 1,
                FindingKind::ParseError => summary.parse_errors += 1
            }
        }
        summary
    }

    pub fn is_clean(&self) -> bool {
        self.summary().is_clean()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }
}
