//! Helper functions for CLI operations.
//!
//! This module provides the small pieces of glue between the command line,
//! the loaded configuration and the diff pipeline: exit code calculation and
//! the merging of CLI arguments over configuration values.

use super::{
    convert::convert_format,
    types::{DiffParams, LookupDifferRequest}
};
use crate::{
    cli::Format,
    config::Config,
    diff::DiffSummary,
    output::OutputOptions,
    parser::ParseOptions
};

/// Calculates the process exit code of a finished diff.
///
/// - `0` - Clean run (warnings allowed)
/// - `1` - Differences or parse errors found
///
/// Fatal errors never reach this point; the binary maps them to `2`.
///
/// # Example
///
/// ```
/// use lookup_differ::{app::calculate_exit_code, diff::DiffSummary};
///
/// assert_eq!(calculate_exit_code(&DiffSummary::default()), 0);
/// ```
pub fn calculate_exit_code(summary: &DiffSummary) -> i32 {
    if summary.is_clean() { 0 } else { 1 }
}

/// Merges CLI parameters over configuration into a run request.
///
/// Every value given on the command line wins; anything left unset falls
/// back to the corresponding `[diff]` or `[output]` config value.
///
/// # Arguments
///
/// * `params` - Parameters parsed from the command line
/// * `config` - Configuration loaded from files and environment
///
/// # Returns
///
/// The resolved [`LookupDifferRequest`].
pub fn resolve_request(params: &DiffParams, config: &Config) -> LookupDifferRequest {
    LookupDifferRequest {
        source_dir:       params.source_dir.clone(),
        target_dir:       params.target_dir.clone(),
        case_insensitive: params
            .case_insensitive
            .unwrap_or(config.diff.case_insensitive),
        table_contains:   params
            .table_contains
            .clone()
            .or_else(|| config.diff.table_contains.clone())
            .filter(|filter| !filter.is_empty()),
        out_dir:          params
            .out_dir
            .clone()
            .or_else(|| config.output.out_dir.clone()),
        json_out:         params
            .json_out
            .clone()
            .or_else(|| config.output.json_out.clone()),
        html_out:         params
            .html_out
            .clone()
            .or_else(|| config.output.html_out.clone())
    }
}

/// Creates output options from CLI flags and report caps in config.
pub fn create_output_options(format: Format, no_color: bool, config: &Config) -> OutputOptions {
    OutputOptions {
        format:           convert_format(format),
        colored:          !no_color,
        max_per_kind:     config.output.max_per_kind,
        max_parse_errors: config.output.max_parse_errors
    }
}

/// Parser options shared by both sides of a request.
pub fn parse_options(request: &LookupDifferRequest) -> ParseOptions {
    ParseOptions {
        case_insensitive: request.case_insensitive,
        table_contains:   request.table_contains.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::output::OutputFormat;

    fn params() -> DiffParams {
        DiffParams {
            source_dir:       "src_dir".into(),
            target_dir:       "tgt_dir".into(),
            out_dir:          None,
            json_out:         None,
            html_out:         None,
            table_contains:   None,
            case_insensitive: None,
            output_format:    Format::Text,
            no_color:         false
        }
    }

    #[test]
    fn test_calculate_exit_code() {
        assert_eq!(calculate_exit_code(&DiffSummary::default()), 0);

        let warnings_only = DiffSummary {
            warnings: 3,
            ..DiffSummary::default()
        };
        assert_eq!(calculate_exit_code(&warnings_only), 0);

        let parse_errors = DiffSummary {
            parse_errors: 1,
            ..DiffSummary::default()
        };
        assert_eq!(calculate_exit_code(&parse_errors), 1);
    }

    #[test]
    fn test_resolve_request_falls_back_to_config() {
        let mut config = Config::default();
        config.diff.case_insensitive = false;
        config.diff.table_contains = Some("LKP".to_string());
        config.output.out_dir = Some(PathBuf::from("patches"));

        let request = resolve_request(&params(), &config);
        assert!(!request.case_insensitive);
        assert_eq!(request.table_contains.as_deref(), Some("LKP"));
        assert_eq!(request.out_dir, Some(PathBuf::from("patches")));
        assert!(request.json_out.is_none());
    }

    #[test]
    fn test_resolve_request_cli_wins() {
        let mut config = Config::default();
        config.diff.case_insensitive = false;
        config.output.html_out = Some(PathBuf::from("config.html"));

        let cli = DiffParams {
            case_insensitive: Some(true),
            html_out: Some(PathBuf::from("cli.html")),
            table_contains: Some(String::new()),
            ..params()
        };
        let request = resolve_request(&cli, &config);
        assert!(request.case_insensitive);
        assert_eq!(request.html_out, Some(PathBuf::from("cli.html")));
        assert!(request.table_contains.is_none());
    }

    #[test]
    fn test_create_output_options() {
        let mut config = Config::default();
        config.output.max_per_kind = 7;
        let opts = create_output_options(Format::Json, true, &config);
        assert_eq!(opts.format, OutputFormat::Json);
        assert!(!opts.colored);
        assert_eq!(opts.max_per_kind, 7);
        assert_eq!(opts.max_parse_errors, 10);
    }

    #[test]
    fn test_parse_options_follow_request() {
        let mut request = LookupDifferRequest::new("a", "b");
        request.case_insensitive = false;
        request.table_contains = Some("X".to_string());
        let opts = parse_options(&request);
        assert!(!opts.case_insensitive);
        assert_eq!(opts.table_contains.as_deref(), Some("X"));
    }
}
