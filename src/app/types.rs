//! Application types for CLI commands.
//!
//! This module defines the values passed between the command line, the
//! diff pipeline and the binary: raw parameters, the resolved request, the
//! run result and the final command output.

use std::path::PathBuf;

use crate::{
    cli::Format,
    diff::{DiffReport, DiffSummary, Finding}
};

/// Parameters for the diff command, as given on the command line.
///
/// Optional values left unset here fall back to the loaded configuration
/// when the request is resolved.
///
/// # Example
///
/// ```
/// use lookup_differ::{app::DiffParams, cli::Format};
///
/// let params = DiffParams {
///     source_dir:       "exports/prod".into(),
///     target_dir:       "exports/uat".into(),
///     out_dir:          Some("patches".into()),
///     json_out:         None,
///     html_out:         None,
///     table_contains:   None,
///     case_insensitive: None,
///     output_format:    Format::Text,
///     no_color:         false
/// };
/// ```
#[derive(Debug, Clone)]
pub struct DiffParams {
    /// Directory of the reference export.
    pub source_dir:       PathBuf,
    /// Directory of the export being checked.
    pub target_dir:       PathBuf,
    /// Patch output directory.
    pub out_dir:          Option<PathBuf>,
    /// JSON finding dump path.
    pub json_out:         Option<PathBuf>,
    /// HTML report path.
    pub html_out:         Option<PathBuf>,
    /// Table name substring filter.
    pub table_contains:   Option<String>,
    /// Case-insensitive name matching, when given explicitly.
    pub case_insensitive: Option<bool>,
    /// Stdout rendering of the result.
    pub output_format:    Format,
    /// Disable colored terminal output.
    pub no_color:         bool
}

/// Fully resolved inputs of one diff run.
#[derive(Debug, Clone)]
pub struct LookupDifferRequest {
    pub source_dir:       PathBuf,
    pub target_dir:       PathBuf,
    pub case_insensitive: bool,
    pub table_contains:   Option<String>,
    /// Enables patch generation
    pub out_dir:          Option<PathBuf>,
    /// Enables the JSON finding dump
    pub json_out:         Option<PathBuf>,
    /// Enables the HTML report
    pub html_out:         Option<PathBuf>
}

impl LookupDifferRequest {
    /// Request with default matching and no artifacts.
    pub fn new(source_dir: impl Into<PathBuf>, target_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir:       source_dir.into(),
            target_dir:       target_dir.into(),
            case_insensitive: true,
            table_contains:   None,
            out_dir:          None,
            json_out:         None,
            html_out:         None
        }
    }
}

/// Result of one diff run.
#[derive(Debug, Clone)]
pub struct LookupDifferResult {
    /// Every finding in report order.
    pub report:      DiffReport,
    /// Counts per finding kind.
    pub summary:     DiffSummary,
    /// Capped plain-text report.
    pub report_text: String,
    /// Files written by this run, in write order.
    pub artifacts:   Vec<PathBuf>
}

impl LookupDifferResult {
    /// No blocking finding was produced. Warnings alone keep a run clean.
    pub fn is_clean(&self) -> bool {
        self.summary.is_clean()
    }

    pub fn findings(&self) -> &[Finding] {
        &self.report.findings
    }
}

/// Output from CLI command execution.
///
/// # Example
///
/// ```
/// use lookup_differ::app::CommandOutput;
///
/// let output = CommandOutput {
///     exit_code: 0,
///     stdout:    "Result: CLEAN".to_string()
/// };
/// assert_eq!(output.exit_code, 0);
/// ```
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code for the process (0=clean, 1=differences).
    pub exit_code: i32,
    /// Rendered result to print to stdout.
    pub stdout:    String
}
