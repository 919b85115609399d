use std::{
    fs,
    path::{Path, PathBuf}
};

use indexmap::map::Entry;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::types::{ExportIndex, ParseIssue, TableSchema};
use crate::{
    error::{AppResult, directory_not_found_error},
    parser::{IndexEvent, ParseInput, ParseOptions, Parsed, ParserSet},
    sql::split_statements
};

/// Parse output of a single file, before merging.
#[derive(Debug, Default)]
pub struct FileParse {
    /// File, relative to the scanned directory
    pub file:   String,
    /// Indexable statements in file order
    pub events: Vec<IndexEvent>,
    /// Statements that could not be parsed
    pub issues: Vec<ParseIssue>
}

/// Builds an [`ExportIndex`] from a directory of `.sql` files.
pub struct ExportIndexBuilder {
    options: ParseOptions,
    parsers: ParserSet
}

impl ExportIndexBuilder {
    /// Create a builder with the default parser set.
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            parsers: ParserSet::new()
        }
    }

    /// Index every `.sql` file under `dir`.
    ///
    /// Files are parsed in parallel and merged in sorted path order.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` is not an existing directory. Unreadable
    /// files and unparseable statements are recorded as parse issues.
    pub fn build(&self, dir: &Path) -> AppResult<ExportIndex> {
        if !dir.is_dir() {
            return Err(directory_not_found_error(
                "Export",
                &dir.display().to_string()
            ));
        }

        let (files, walk_issues) = collect_sql_files(dir);
        debug!(dir = %dir.display(), files = files.len(), "collected export files");

        let parsed: Vec<FileParse> = files
            .par_iter()
            .map(|path| self.parse_file(dir, path))
            .collect();

        let mut index = ExportIndex {
            files_scanned: files.len(),
            parse_errors: walk_issues,
            ..ExportIndex::default()
        };
        for file in parsed {
            self.merge(&mut index, file);
        }

        info!(
            dir = %dir.display(),
            files = index.files_scanned,
            tables = index.tables.len(),
            rows = index.row_count(),
            parse_errors = index.parse_errors.len(),
            "indexed export"
        );
        Ok(index)
    }

    /// Index in-memory sources, merged in the given order.
    pub fn index_sources<'a>(
        &self,
        sources: impl IntoIterator<Item = (&'a str, &'a str)>
    ) -> ExportIndex {
        let mut index = ExportIndex::default();
        for (file, content) in sources {
            index.files_scanned += 1;
            let parsed = self.parse_source(file, content);
            self.merge(&mut index, parsed);
        }
        index
    }

    /// Read and parse one file.
    ///
    /// Read failures and invalid UTF-8 become a single file-level issue.
    pub fn parse_file(&self, root: &Path, path: &Path) -> FileParse {
        let file = relative_name(root, path);
        let content = match fs::read(path) {
            Ok(bytes) => String::from_utf8(bytes).map_err(|e| format!("file is not valid UTF-8: {}", e)),
            Err(e) => Err(format!("cannot read file: {}", e))
        };
        match content {
            Ok(text) => self.parse_source(&file, &text),
            Err(message) => {
                warn!(file = %file, reason = %message, "skipping unreadable export file");
                FileParse {
                    issues: vec![ParseIssue {
                        file: file.clone(),
                        line: None,
                        message
                    }],
                    file,
                    ..FileParse::default()
                }
            }
        }
    }

    /// Split and parse the text of one file.
    ///
    /// Statements no parser owns are ignored; statements a parser owns but
    /// cannot parse become issues.
    pub fn parse_source(&self, file: &str, content: &str) -> FileParse {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut parsed = FileParse {
            file: file.to_string(),
            ..FileParse::default()
        };

        for statement in split_statements(content) {
            let code = statement.code();
            if code.is_empty() {
                continue;
            }
            let input = ParseInput {
                file,
                line: statement.line,
                raw: statement.text,
                code: &code
            };
            match self.parsers.parse(&input, &self.options) {
                Some(Ok(Parsed::Event(event))) => parsed.events.push(event),
                Some(Ok(Parsed::Skipped)) | None => {}
                Some(Err(message)) => {
                    debug!(file = %file, line = statement.line, reason = %message, "statement not indexed");
                    parsed.issues.push(ParseIssue {
                        file: file.to_string(),
                        line: Some(statement.line),
                        message
                    });
                }
            }
        }
        parsed
    }

    fn merge(&self, index: &mut ExportIndex, parsed: FileParse) {
        index.parse_errors.extend(parsed.issues);
        for event in parsed.events {
            match event {
                IndexEvent::CreateTable(schema) => {
                    let key = self.options.key(&schema.table_name);
                    index.tables.insert(key.clone());
                    match index.schemas.entry(key) {
                        Entry::Occupied(mut entry) => {
                            let (file, line) = (schema.file.clone(), schema.source_line);
                            if !entry.get_mut().absorb_create(schema) {
                                debug!(table = %entry.key(), file = %file, line, "duplicate CREATE TABLE ignored");
                            }
                        }
                        Entry::Vacant(entry) => {
                            entry.insert(schema);
                        }
                    }
                }
                IndexEvent::AddColumns {
                    table_name,
                    file,
                    line,
                    columns
                } => {
                    let key = self.options.key(&table_name);
                    index.tables.insert(key.clone());
                    index
                        .schemas
                        .entry(key)
                        .or_insert_with(|| TableSchema::stub(table_name, file, line))
                        .add_columns(columns);
                }
                IndexEvent::PrimaryKey(pk) => {
                    let key = self.options.key(&pk.table_name);
                    index.tables.insert(key.clone());
                    match index.primary_keys.entry(key) {
                        Entry::Occupied(entry) => {
                            debug!(table = %entry.key(), file = %pk.file, line = pk.line, "duplicate primary key ignored");
                        }
                        Entry::Vacant(entry) => {
                            entry.insert(pk);
                        }
                    }
                }
                IndexEvent::Row(row) => {
                    let key = self.options.key(&row.table_name);
                    index.tables.insert(key.clone());
                    index.rows.entry(key).or_default().push(row);
                }
            }
        }
    }
}

/// Collect `.sql` files under `dir` (extension matched case-insensitively),
/// sorted by path.
///
/// Subdirectories that cannot be listed are reported as issues.
pub fn collect_sql_files(dir: &Path) -> (Vec<PathBuf>, Vec<ParseIssue>) {
    let mut files = Vec::new();
    let mut issues = Vec::new();
    walk(dir, dir, &mut files, &mut issues);
    files.sort();
    (files, issues)
}

fn walk(root: &Path, dir: &Path, files: &mut Vec<PathBuf>, issues: &mut Vec<ParseIssue>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "cannot list directory");
            issues.push(ParseIssue {
                file:    relative_name(root, dir),
                line:    None,
                message: format!("cannot list directory: {}", e)
            });
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            walk(root, &path, files, issues);
        } else if is_sql_file(&path) {
            files.push(path);
        }
    }
}

fn is_sql_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("sql"))
}

fn relative_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let name = relative.to_string_lossy().replace('\\', "/");
    if name.is_empty() { String::from(".") } else { name }
}
