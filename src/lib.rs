//! # Lookup Differ Library
//!
//! Heuristic diffing of exported lookup-table SQL.
//!
//! Two export directories are indexed into [`index::ExportIndex`] values,
//! compared by [`diff::DiffEngine`] and turned into SQL patches by
//! [`patch::PatchWriter`]. [`app::run_lookup_diff`] wires the whole pipeline
//! together.

pub mod app;
pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod index;
pub mod output;
pub mod parser;
pub mod patch;
pub mod sql;
