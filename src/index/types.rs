use compact_str::CompactString;
use indexmap::{IndexMap, IndexSet};
use smallvec::SmallVec;

/// One column of a table definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    /// Cleaned column name with original casing
    pub name:           CompactString,
    /// Full column clause, e.g. `"C2" VARCHAR2(100) DEFAULT 'x'`
    pub sql_definition: String,
    /// Line of the statement that declared the column
    pub source_line:    usize
}

/// Table definition assembled from `CREATE TABLE` and `ALTER TABLE ... ADD`.
///
/// A schema created by an `ALTER TABLE ... ADD` seen before any
/// `CREATE TABLE` is a stub: it has no `full_create_statement` until a
/// `CREATE TABLE` for the same table is absorbed.
#[derive(Debug, Clone)]
pub struct TableSchema {
    /// Cleaned, unqualified table name with original casing
    pub table_name:            CompactString,
    /// File of the defining statement
    pub file:                  String,
    /// Line of the defining statement
    pub source_line:           usize,
    /// Original `CREATE TABLE` text, semicolon-terminated
    pub full_create_statement: Option<String>,
    /// Columns keyed by (possibly case-folded) column name
    pub columns:               IndexMap<CompactString, ColumnDef>
}

impl TableSchema {
    /// Schema known only from column additions.
    pub fn stub(table_name: CompactString, file: String, source_line: usize) -> Self {
        Self {
            table_name,
            file,
            source_line,
            full_create_statement: None,
            columns: IndexMap::new()
        }
    }

    /// Whether the schema came from a real `CREATE TABLE`.
    pub fn has_create_statement(&self) -> bool {
        self.full_create_statement.is_some()
    }

    /// Merge columns without overwriting existing keys.
    ///
    /// Returns the number of columns actually added.
    pub fn add_columns(&mut self, columns: IndexMap<CompactString, ColumnDef>) -> usize {
        let before = self.columns.len();
        for (key, column) in columns {
            self.columns.entry(key).or_insert(column);
        }
        self.columns.len() - before
    }

    /// Upgrade a stub with a `CREATE TABLE` schema.
    ///
    /// The created table's columns come first in declaration order; columns
    /// only known from earlier `ALTER TABLE ... ADD` statements are kept and
    /// appended. Returns `false` without changes when this schema already
    /// has a `CREATE TABLE`.
    pub fn absorb_create(&mut self, create: TableSchema) -> bool {
        if self.has_create_statement() {
            return false;
        }
        let stub_columns = std::mem::take(&mut self.columns);
        self.table_name = create.table_name;
        self.file = create.file;
        self.source_line = create.source_line;
        self.full_create_statement = create.full_create_statement;
        self.columns = create.columns;
        self.add_columns(stub_columns);
        true
    }
}

/// Primary key, or a unique index standing in for one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryKey {
    /// Cleaned table name
    pub table_name: CompactString,
    /// Key columns in declaration order, original casing
    pub columns:    SmallVec<[CompactString; 4]>,
    /// Declaring statement, semicolon-terminated
    pub ddl_text:   String,
    /// File of the declaring statement
    pub file:       String,
    /// Line of the declaring statement
    pub line:       usize
}

/// Value of one column in a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowValue {
    /// Column name with original casing
    pub column:   CompactString,
    /// Column as written in the statement, quotes included
    pub sql_name: CompactString,
    /// Normalized literal
    pub value:    String
}

/// One `INSERT` row.
#[derive(Debug, Clone)]
pub struct DataRow {
    /// Cleaned table name
    pub table_name:          CompactString,
    /// File of the statement
    pub file:                String,
    /// Line of the statement
    pub source_line:         usize,
    /// Values keyed by (possibly case-folded) column name
    pub columns:             IndexMap<CompactString, RowValue>,
    /// Original statement, semicolon-terminated
    pub original_insert_sql: String
}

impl DataRow {
    /// Normalized value of a column key.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.columns.get(key).map(|v| v.value.as_str())
    }

    /// Values of the given key columns; absent columns read as `NULL`.
    pub fn pk_tuple(&self, keys: &[CompactString]) -> SmallVec<[&str; 4]> {
        keys.iter()
            .map(|key| self.value(key).unwrap_or("NULL"))
            .collect()
    }

    /// Canonical identity from all values sorted by column key.
    pub fn fallback_identity(&self) -> String {
        let mut pairs: Vec<_> = self
            .columns
            .iter()
            .map(|(key, v)| (key.as_str(), v.value.as_str()))
            .collect();
        pairs.sort_unstable();
        let mut identity = String::new();
        for (key, value) in pairs {
            identity.push_str(key);
            identity.push('=');
            identity.push_str(value);
            identity.push('\u{1f}');
        }
        identity
    }
}

/// A statement or file that could not be indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// File, relative to the scanned directory
    pub file:    String,
    /// Statement line; `None` for whole-file failures
    pub line:    Option<usize>,
    /// Human-readable reason
    pub message: String
}

/// Everything indexed from one export directory.
///
/// All maps are keyed by table key (case-folded when the index was built
/// case-insensitively).
#[derive(Debug, Clone, Default)]
pub struct ExportIndex {
    /// Table keys in first-seen order
    pub tables:        IndexSet<CompactString>,
    /// Table definitions
    pub schemas:       IndexMap<CompactString, TableSchema>,
    /// First primary key per table
    pub primary_keys:  IndexMap<CompactString, PrimaryKey>,
    /// Rows per table in file order
    pub rows:          IndexMap<CompactString, Vec<DataRow>>,
    /// Statements and files that were skipped
    pub parse_errors:  Vec<ParseIssue>,
    /// Number of `.sql` files read
    pub files_scanned: usize
}

impl ExportIndex {
    /// Whether the table has a schema, rows or a primary key.
    pub fn has_table(&self, key: &str) -> bool {
        self.schemas.contains_key(key)
            || self.rows.contains_key(key)
            || self.primary_keys.contains_key(key)
    }

    /// Name with original casing, from the first record that has one.
    pub fn display_name<'a>(&'a self, key: &'a str) -> &'a str {
        if let Some(schema) = self.schemas.get(key) {
            return &schema.table_name;
        }
        if let Some(row) = self.rows.get(key).and_then(|rows| rows.first()) {
            return &row.table_name;
        }
        if let Some(pk) = self.primary_keys.get(key) {
            return &pk.table_name;
        }
        key
    }

    /// Rows of a table; empty when it has none.
    pub fn rows_of(&self, key: &str) -> &[DataRow] {
        self.rows.get(key).map_or(&[], Vec::as_slice)
    }

    /// Total number of indexed rows.
    pub fn row_count(&self) -> usize {
        self.rows.values().map(Vec::len).sum()
    }
}
