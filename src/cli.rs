use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum, builder::BoolishValueParser};

/// Lookup Differ - Diff two directories of exported lookup-table SQL and
/// generate patches
#[derive(Parser, Debug)]
#[command(name = "lookup-differ")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare a source export directory against a target export directory
    Diff {
        /// Directory of the reference export (e.g. PROD)
        #[arg(long = "sourceDir", visible_alias = "source-dir")]
        source_dir: PathBuf,

        /// Directory of the export to check (e.g. UAT)
        #[arg(long = "targetDir", visible_alias = "target-dir")]
        target_dir: PathBuf,

        /// Write SQL patch files into this directory
        #[arg(long = "outDir", visible_alias = "out-dir")]
        out_dir: Option<PathBuf>,

        /// Write all findings as a JSON array to this file
        #[arg(long = "jsonOut", visible_alias = "json-out")]
        json_out: Option<PathBuf>,

        /// Write a self-contained HTML report to this file
        #[arg(long = "htmlOut", visible_alias = "html-out")]
        html_out: Option<PathBuf>,

        /// Only diff tables whose name contains this text
        #[arg(long = "tableContains", visible_alias = "table-contains")]
        table_contains: Option<String>,

        /// Compare table and column names case-insensitively [default: true]
        #[arg(
            long = "caseInsensitive",
            visible_alias = "case-insensitive",
            value_name = "BOOL",
            action = ArgAction::Set,
            value_parser = BoolishValueParser::new()
        )]
        case_insensitive: Option<bool>,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        output_format: Format,

        /// Disable colored output
        #[arg(long)]
        no_color: bool
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Format {
    Text,
    Json,
    Yaml
}
