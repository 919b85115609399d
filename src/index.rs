//! Structural and data index of one export directory.
//!
//! [`ExportIndexBuilder`] walks a directory for `.sql` files, splits and
//! parses each file independently (in parallel), then merges the results in
//! sorted path order into one [`ExportIndex`]:
//!
//! - the first `CREATE TABLE` for a table wins; an earlier `ALTER TABLE ...
//!   ADD` creates a stub that the `CREATE TABLE` upgrades
//! - column additions never overwrite an existing column
//! - the first primary key declaration for a table wins
//! - rows are appended in file order
//!
//! Statements that belong to a parser but cannot be parsed, and files that
//! cannot be read as UTF-8, are recorded in [`ExportIndex::parse_errors`]
//! and never stop the walk.
//!
//! # Example
//!
//! ```
//! use lookup_differ::{index::ExportIndexBuilder, parser::ParseOptions};
//!
//! let builder = ExportIndexBuilder::new(ParseOptions::default());
//! let index = builder.index_sources([(
//!     "t1.sql",
//!     "CREATE TABLE t1 (c1 NUMBER);\nINSERT INTO t1 (c1) VALUES (1);"
//! )]);
//!
//! assert!(index.schemas.contains_key("T1"));
//! assert_eq!(index.rows_of("T1").len(), 1);
//! ```

mod builder;
mod types;

pub use builder::{ExportIndexBuilder, FileParse, collect_sql_files};
pub use types::{
    ColumnDef, DataRow, ExportIndex, ParseIssue, PrimaryKey, RowValue, TableSchema
};
