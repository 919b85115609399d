//! # Lookup Differ
//!
//! Compare two directories of exported lookup-table SQL and generate the
//! patches that bring the target in line with the source.
//!
//! # Quick Start
//!
//! ```bash
//! # Summary of what UAT lacks compared to PROD
//! lookup-differ diff --sourceDir exports/prod --targetDir exports/uat
//!
//! # Generate patch files plus JSON and HTML reports
//! lookup-differ diff --sourceDir exports/prod --targetDir exports/uat \
//!     --outDir patches --jsonOut report/findings.json --htmlOut report/index.html
//!
//! # Machine-readable result on stdout, debug logging on stderr
//! lookup-differ -vv diff --sourceDir exports/prod --targetDir exports/uat -f json
//! ```
//!
//! # Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Clean (warnings only) |
//! | 1 | Differences or parse errors found |
//! | 2 | Invalid invocation or fatal error |
//!
//! # Logging
//!
//! Logs go to stderr. `RUST_LOG` takes precedence; otherwise `-v` enables
//! `info` and `-vv` enables `debug` for this crate.

use std::process;

use clap::Parser;
use lookup_differ::{
    app::{DiffParams, run_diff},
    cli::{Cli, Commands},
    config::Config,
    error::AppResult
};
use tokio::main;
use tracing_subscriber::EnvFilter;

#[main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    }
}

async fn run(cli: Cli) -> AppResult<i32> {
    let config = Config::load()?;

    match cli.command {
        Commands::Diff {
            source_dir,
            target_dir,
            out_dir,
            json_out,
            html_out,
            table_contains,
            case_insensitive,
            output_format,
            no_color
        } => {
            let params = DiffParams {
                source_dir,
                target_dir,
                out_dir,
                json_out,
                html_out,
                table_contains,
                case_insensitive,
                output_format,
                no_color
            };
            let output = run_diff(params, config).await?;
            println!("{}", output.stdout.trim_end());
            Ok(output.exit_code)
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "lookup_differ=warn",
        1 => "lookup_differ=info",
        _ => "lookup_differ=debug"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
