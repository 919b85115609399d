use std::path::PathBuf;

use clap::Parser;
use lookup_differ::cli::{Cli, Commands, Format};

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn test_camel_case_flags() {
    let cli = parse(&[
        "lookup-differ",
        "diff",
        "--sourceDir",
        "prod",
        "--targetDir",
        "uat",
        "--outDir",
        "patches",
        "--jsonOut",
        "f.json",
        "--htmlOut",
        "r.html",
        "--tableContains",
        "LKP",
        "--caseInsensitive",
        "false"
    ]);
    let Commands::Diff {
        source_dir,
        target_dir,
        out_dir,
        json_out,
        html_out,
        table_contains,
        case_insensitive,
        output_format,
        no_color
    } = cli.command;
    assert_eq!(source_dir, PathBuf::from("prod"));
    assert_eq!(target_dir, PathBuf::from("uat"));
    assert_eq!(out_dir, Some(PathBuf::from("patches")));
    assert_eq!(json_out, Some(PathBuf::from("f.json")));
    assert_eq!(html_out, Some(PathBuf::from("r.html")));
    assert_eq!(table_contains.as_deref(), Some("LKP"));
    assert_eq!(case_insensitive, Some(false));
    assert!(matches!(output_format, Format::Text));
    assert!(!no_color);
    assert_eq!(cli.verbose, 0);
}

#[test]
fn test_kebab_case_aliases_and_options() {
    let cli = parse(&[
        "lookup-differ",
        "-vv",
        "diff",
        "--source-dir",
        "a",
        "--target-dir",
        "b",
        "--case-insensitive",
        "yes",
        "-f",
        "yaml",
        "--no-color"
    ]);
    assert_eq!(cli.verbose, 2);
    let Commands::Diff {
        case_insensitive,
        output_format,
        no_color,
        out_dir,
        ..
    } = cli.command;
    assert_eq!(case_insensitive, Some(true));
    assert!(matches!(output_format, Format::Yaml));
    assert!(no_color);
    assert!(out_dir.is_none());
}

#[test]
fn test_case_insensitive_defaults_to_unset() {
    let cli = parse(&["lookup-differ", "diff", "--sourceDir", "a", "--targetDir", "b"]);
    let Commands::Diff {
        case_insensitive, ..
    } = cli.command;
    assert!(case_insensitive.is_none());
}

#[test]
fn test_source_and_target_are_required() {
    assert!(Cli::try_parse_from(["lookup-differ", "diff", "--sourceDir", "a"]).is_err());
    assert!(Cli::try_parse_from(["lookup-differ", "diff", "--targetDir", "b"]).is_err());
}

#[test]
fn test_rejects_unknown_format() {
    let result = Cli::try_parse_from([
        "lookup-differ",
        "diff",
        "--sourceDir",
        "a",
        "--targetDir",
        "b",
        "-f",
        "sarif"
    ]);
    assert!(result.is_err());
}
