//! Diff execution logic.
//!
//! [`run_lookup_diff`] is the synchronous pipeline: index both exports,
//! diff them, write the requested artifacts and render the text report.
//! [`run_diff`] drives it from the async binary on a blocking worker.

use std::{
    io::{self, IsTerminal},
    path::Path,
    time::Duration
};

use indicatif::{ProgressBar, ProgressStyle};
use tokio::task;
use tracing::info;

use super::{
    helpers::{calculate_exit_code, create_output_options, parse_options, resolve_request},
    types::{CommandOutput, DiffParams, LookupDifferRequest, LookupDifferResult}
};
use crate::{
    config::Config,
    diff::DiffEngine,
    error::{AppResult, directory_not_found_error, task_error},
    index::ExportIndexBuilder,
    output::{OutputFormat, OutputOptions, format_result, render_text, write_html, write_json},
    patch::PatchWriter
};

/// Executes one complete diff of a source export against a target export.
///
/// 1. **Validation**: both directories must exist before anything is parsed
/// 2. **Indexing**: both exports are indexed side by side
/// 3. **Diffing**: schema, keys and rows are compared
/// 4. **Artifacts**: patch files, JSON dump and HTML report when requested
///
/// # Errors
///
/// Returns an error if either directory is missing or an artifact cannot be
/// written. Unparseable statements are reported as findings instead.
///
/// # Example
///
/// ```no_run
/// use lookup_differ::{
///     app::{LookupDifferRequest, run_lookup_diff},
///     output::OutputOptions
/// };
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let request = LookupDifferRequest::new("exports/prod", "exports/uat");
/// let result = run_lookup_diff(&request, &OutputOptions::default())?;
/// println!("{}", result.report_text);
/// # Ok(())
/// # }
/// ```
pub fn run_lookup_diff(
    request: &LookupDifferRequest,
    opts: &OutputOptions
) -> AppResult<LookupDifferResult> {
    ensure_directory("Source", &request.source_dir)?;
    ensure_directory("Target", &request.target_dir)?;
    info!(
        source = %request.source_dir.display(),
        target = %request.target_dir.display(),
        case_insensitive = request.case_insensitive,
        "lookup diff started"
    );

    let builder = ExportIndexBuilder::new(parse_options(request));
    let (source, target) = rayon::join(
        || builder.build(&request.source_dir),
        || builder.build(&request.target_dir)
    );
    let (source, target) = (source?, target?);

    let report = DiffEngine::new(request.case_insensitive).diff(&source, &target);

    let mut artifacts = Vec::new();
    if let Some(out_dir) = &request.out_dir {
        artifacts.extend(PatchWriter::new(out_dir).write(&report)?);
    }
    if let Some(path) = &request.json_out {
        write_json(path, &report)?;
        artifacts.push(path.clone());
    }
    if let Some(path) = &request.html_out {
        write_html(path, &report)?;
        artifacts.push(path.clone());
    }

    let summary = report.summary();
    info!(
        findings = report.len(),
        clean = summary.is_clean(),
        artifacts = artifacts.len(),
        "lookup diff finished"
    );

    Ok(LookupDifferResult {
        report_text: render_text(&report, opts),
        summary,
        report,
        artifacts
    })
}

/// Runs the `diff` command.
///
/// CLI parameters are merged over `config`, the pipeline runs on a blocking
/// worker and the result is rendered in the requested stdout format.
///
/// # Errors
///
/// Returns any error of [`run_lookup_diff`], or a service error when the
/// worker task panics.
pub async fn run_diff(params: DiffParams, config: Config) -> AppResult<CommandOutput> {
    let request = resolve_request(&params, &config);
    let opts = create_output_options(params.output_format, params.no_color, &config);

    let spinner = (opts.format == OutputFormat::Text && io::stderr().is_terminal())
        .then(|| spinner("Indexing exports..."));

    let worker_opts = opts.clone();
    let joined = task::spawn_blocking(move || run_lookup_diff(&request, &worker_opts)).await;
    if let Some(pb) = &spinner {
        pb.finish_and_clear();
    }
    let result = joined.map_err(task_error)??;

    let stdout = match opts.format {
        OutputFormat::Text => result.report_text.clone(),
        OutputFormat::Json | OutputFormat::Yaml => format_result(&result.report, &opts)?
    };

    Ok(CommandOutput {
        exit_code: calculate_exit_code(&result.summary),
        stdout
    })
}

fn ensure_directory(role: &str, dir: &Path) -> AppResult<()> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(directory_not_found_error(role, &dir.display().to_string()))
    }
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::{cli::Format, diff::FindingKind, error::AppErrorKind};

    fn plain() -> OutputOptions {
        OutputOptions {
            colored: false,
            ..OutputOptions::default()
        }
    }

    fn export(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    #[test]
    fn test_missing_source_directory_is_fatal() {
        let target = export(&[]);
        let request = LookupDifferRequest::new("/no/such/export/dir", target.path());
        let err = run_lookup_diff(&request, &plain()).unwrap_err();
        assert_eq!(err.kind, AppErrorKind::BadRequest);
    }

    #[test]
    fn test_missing_target_directory_is_fatal() {
        let source = export(&[]);
        let request = LookupDifferRequest::new(source.path(), "/no/such/export/dir");
        let err = run_lookup_diff(&request, &plain()).unwrap_err();
        assert_eq!(err.kind, AppErrorKind::BadRequest);
    }

    #[test]
    fn test_run_writes_requested_artifacts() {
        let source = export(&[("t1.sql", "CREATE TABLE T1 (C1 NUMBER);\n")]);
        let target = export(&[]);
        let out = TempDir::new().unwrap();

        let mut request = LookupDifferRequest::new(source.path(), target.path());
        request.out_dir = Some(out.path().join("patches"));
        request.json_out = Some(out.path().join("report/findings.json"));
        request.html_out = Some(out.path().join("report/index.html"));

        let result = run_lookup_diff(&request, &plain()).unwrap();
        assert!(!result.is_clean());
        assert_eq!(result.summary.missing_tables, 1);
        assert_eq!(result.findings()[0].kind, FindingKind::TableMissing);
        assert!(result.report_text.contains("Missing tables: 1"));
        assert!(out.path().join("patches/missing_tables.sql").exists());
        assert!(out.path().join("report/findings.json").exists());
        assert!(out.path().join("report/index.html").exists());
        assert_eq!(result.artifacts.last(), request.html_out.as_ref());
    }

    #[tokio::test]
    async fn test_run_diff_clean_exit_code() {
        let source = export(&[("t1.sql", "CREATE TABLE T1 (C1 NUMBER);\n")]);
        let target = export(&[("t1.sql", "CREATE TABLE t1 (c1 NUMBER);\n")]);
        let params = DiffParams {
            source_dir:       source.path().to_path_buf(),
            target_dir:       target.path().to_path_buf(),
            out_dir:          None,
            json_out:         None,
            html_out:         None,
            table_contains:   None,
            case_insensitive: None,
            output_format:    Format::Json,
            no_color:         true
        };
        let output = run_diff(params, Config::default()).await.unwrap();
        assert_eq!(output.exit_code, 0);
        let value: serde_json::Value = serde_json::from_str(&output.stdout).unwrap();
        assert_eq!(value["clean"], true);
    }
}
