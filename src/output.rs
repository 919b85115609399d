//! Report rendering and artifact writing.
//!
//! Renderers are pure views over a [`DiffReport`]:
//!
//! - [`render_text`] - capped plain-text summary, optionally colored
//! - [`findings_json`] - every finding as a JSON array
//! - [`render_html`] - self-contained HTML page with a filterable table
//!
//! [`write_artifact`] writes any rendered output to disk whole: the content
//! goes to a temporary sibling file which is then renamed over the target.

mod html;
mod text;

use std::{fs, path::Path};

pub use html::{escape_html, render_html};
use serde::Serialize;
pub use text::render_text;
use tracing::debug;

use crate::{
    diff::{DiffReport, DiffSummary, Finding},
    error::{AppResult, file_write_error, serialization_error}
};

/// Output format for the result printed to stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml
}

/// Output options
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format:           OutputFormat,
    pub colored:          bool,
    /// Findings listed per kind in the text report
    pub max_per_kind:     usize,
    /// Parse errors listed in the text report
    pub max_parse_errors: usize
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format:           OutputFormat::Text,
            colored:          true,
            max_per_kind:     50,
            max_parse_errors: 10
        }
    }
}

/// Serializable view of a diff result
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultView<'a> {
    pub summary:  DiffSummary,
    pub clean:    bool,
    pub findings: &'a [Finding]
}

impl<'a> ResultView<'a> {
    pub fn new(report: &'a DiffReport) -> Self {
        let summary = report.summary();
        Self {
            summary,
            clean: summary.is_clean(),
            findings: &report.findings
        }
    }
}

/// Render the result in the configured stdout format.
pub fn format_result(report: &DiffReport, opts: &OutputOptions) -> AppResult<String> {
    match opts.format {
        OutputFormat::Json => serde_json::to_string_pretty(&ResultView::new(report))
            .map_err(|e| serialization_error("JSON", e)),
        OutputFormat::Yaml => serde_yaml::to_string(&ResultView::new(report))
            .map_err(|e| serialization_error("YAML", e)),
        OutputFormat::Text => Ok(render_text(report, opts))
    }
}

/// All findings as a pretty-printed JSON array.
pub fn findings_json(findings: &[Finding]) -> AppResult<String> {
    serde_json::to_string_pretty(findings).map_err(|e| serialization_error("JSON", e))
}

/// Write the JSON finding dump.
pub fn write_json(path: &Path, report: &DiffReport) -> AppResult<()> {
    let json = findings_json(&report.findings)?;
    write_artifact(path, &json)
}

/// Write the HTML report.
pub fn write_html(path: &Path, report: &DiffReport) -> AppResult<()> {
    write_artifact(path, &render_html(report))
}

/// Write `content` to `path` as UTF-8, creating parent directories.
///
/// The file is written next to its destination first and renamed into
/// place, so an existing file is never left half-written.
pub fn write_artifact(path: &Path, content: &str) -> AppResult<()> {
    let shown = path.display().to_string();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| file_write_error(&shown, e))?;
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    if let Err(e) = fs::write(&tmp, content) {
        let _ = fs::remove_file(&tmp);
        return Err(file_write_error(&shown, e));
    }
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(file_write_error(&shown, e));
    }
    debug!(path = %shown, bytes = content.len(), "artifact written");
    Ok(())
}
