//! Lexical layer for exported SQL scripts.
//!
//! Export dumps are split into top-level statements by a small state machine
//! that understands string literals, quoted identifiers, `--` and `/* */`
//! comments, and the SQL*Plus conventions found in Oracle exports (a lone `/`
//! line terminates a statement, `PROMPT`/`REM` lines are ignored).
//!
//! # Example
//!
//! ```
//! use lookup_differ::sql::split_statements;
//!
//! let script = "-- banner\nCREATE TABLE T1 (C1 NUMBER);\nINSERT INTO T1 (C1) VALUES ('a;b');\n";
//! let statements = split_statements(script);
//!
//! assert_eq!(statements.len(), 2);
//! assert_eq!(statements[0].line, 2);
//! assert_eq!(statements[1].text, "INSERT INTO T1 (C1) VALUES ('a;b')");
//! ```

mod splitter;
mod tokens;

pub use splitter::{Statement, flatten, split_statements, strip_comments};
pub use tokens::{
    balanced_span, clean_identifier, first_balanced, first_token, normalize_value,
    split_top_level_comma, strip_keyword, terminate
};
