//! Application logic for the Lookup Differ CLI.
//!
//! This module contains the orchestration behind the `diff` command,
//! separated from the binary entry point so it can be driven from tests.
//!
//! - [`types`] - request, result and command output value objects
//! - [`helpers`] - exit codes and CLI/config merging
//! - [`convert`] - CLI enums to internal types
//! - [`run`] - the diff pipeline itself

mod convert;
mod helpers;
mod run;
mod types;

pub use convert::convert_format;
pub use helpers::{calculate_exit_code, create_output_options, parse_options, resolve_request};
pub use run::{run_diff, run_lookup_diff};
pub use types::{CommandOutput, DiffParams, LookupDifferRequest, LookupDifferResult};
