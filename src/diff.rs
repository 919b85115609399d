//! Structural and data diff between two export indexes.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │ source index │──┐    ┌────────────┐     ┌────────────┐
//! └──────────────┘  ├───▶│ DiffEngine │────▶│ DiffReport │
//! ┌──────────────┐  │    └────────────┘     └────────────┘
//! │ target index │──┘          │
//! └──────────────┘      ┌──────┴──────┐
//!                       │ table diffs │
//!                       │ (parallel)  │
//!                       └─────────────┘
//! ```
//!
//! Findings are emitted in a fixed order: missing tables, missing columns,
//! missing primary keys, per-table row diffs in table-indexing order, then
//! parse errors (source side first). Row diffs run per table in parallel
//! with [`rayon`]; both indexes are read-only throughout.
//!
//! # Example
//!
//! ```
//! use lookup_differ::{
//!     diff::{DiffEngine, FindingKind},
//!     index::ExportIndexBuilder,
//!     parser::ParseOptions
//! };
//!
//! let builder = ExportIndexBuilder::new(ParseOptions::default());
//! let source = builder.index_sources([("t1.sql", "CREATE TABLE T1 (C1 NUMBER, C2 NUMBER);")]);
//! let target = builder.index_sources([("t1.sql", "CREATE TABLE T1 (C1 NUMBER);")]);
//!
//! let report = DiffEngine::new(true).diff(&source, &target);
//! assert_eq!(report.count(FindingKind::ColumnMissing), 1);
//! ```

mod data;
mod schema;
mod types;

use rayon::prelude::*;
use tracing::info;
pub use types::{DiffReport, DiffSummary, Finding, FindingKind};

use crate::index::ExportIndex;

/// Compares a source export against a target export.
#[derive(Debug, Clone, Copy)]
pub struct DiffEngine {
    case_insensitive: bool
}

impl Default for DiffEngine {
    fn default() -> Self {
        Self::new(true)
    }
}

impl DiffEngine {
    /// Create an engine; `case_insensitive` must match the mode both
    /// indexes were built with.
    pub fn new(case_insensitive: bool) -> Self {
        Self {
            case_insensitive
        }
    }

    /// Diff `source` against `target`.
    ///
    /// Every finding describes what the target lacks relative to the source.
    pub fn diff(&self, source: &ExportIndex, target: &ExportIndex) -> DiffReport {
        let mut findings = schema::missing_tables(source, target);
        findings.extend(schema::missing_columns(source, target));
        findings.extend(schema::missing_primary_keys(source, target));

        let row_findings: Vec<Vec<Finding>> = source
            .tables
            .iter()
            .collect::<Vec<_>>()
            .par_iter()
            .map(|key| data::diff_table_rows(key, source, target, self.case_insensitive))
            .collect();
        findings.extend(row_findings.into_iter().flatten());

        findings.extend(parse_errors("SOURCE", source));
        findings.extend(parse_errors("TARGET", target));

        let report = DiffReport::new(findings);
        let summary = report.summary();
        info!(
            missing_tables = summary.missing_tables,
            missing_columns = summary.missing_columns,
            missing_pks = summary.missing_pks,
            missing_rows = summary.missing_rows,
            mismatched_rows = summary.mismatched_rows,
            warnings = summary.warnings,
            parse_errors = summary.parse_errors,
            "diff complete"
        );
        report
    }
}

/// Parse issues of one side as findings, in file then line order.
fn parse_errors(side: &str, index: &ExportIndex) -> Vec<Finding> {
    let mut issues: Vec<_> = index.parse_errors.iter().collect();
    issues.sort_by(|a, b| a.file.cmp(&b.file).then(a.line.cmp(&b.line)));
    issues
        .into_iter()
        .map(|issue| {
            Finding::new(
                FindingKind::ParseError,
                "",
                issue.file.clone(),
                issue.line,
                format!("{}: {}", side, issue.message)
            )
        })
        .collect()
}
