use lookup_differ::{
    index::{ExportIndex, ExportIndexBuilder},
    parser::{IndexEvent, ParseInput, ParseOptions, Parsed, ParserSet}
};

fn index(sql: &str) -> ExportIndex {
    ExportIndexBuilder::new(ParseOptions::default()).index_sources([("export.sql", sql)])
}

#[test]
fn test_default_parser_set_dispatch() {
    let parsers = ParserSet::new();
    let options = ParseOptions::default();
    let kinds: Vec<&str> = [
        "ALTER TABLE T1 ADD (CONSTRAINT T1_PK PRIMARY KEY (ID))",
        "ALTER TABLE T1 ADD (CONSTRAINT T1_UK UNIQUE (CODE))",
        "CREATE TABLE T1 (ID NUMBER, CODE VARCHAR2(5))",
        "INSERT INTO T1 (ID, CODE) VALUES (1, 'A')",
        "COMMIT"
    ]
    .into_iter()
    .map(|code| {
        let input = ParseInput {
            file: "dispatch.sql",
            line: 1,
            raw: code,
            code
        };
        match parsers.parse(&input, &options) {
            Some(Ok(Parsed::Event(IndexEvent::PrimaryKey(_)))) => "pk",
            Some(Ok(Parsed::Event(IndexEvent::CreateTable(_)))) => "create",
            Some(Ok(Parsed::Event(IndexEvent::Row(_)))) => "row",
            Some(Ok(Parsed::Skipped)) => "skipped",
            Some(_) => "other",
            None => "none"
        }
    })
    .collect();
    assert_eq!(kinds, ["pk", "skipped", "create", "row", "none"]);
}

#[test]
fn test_oracle_noise_is_ignored() {
    let index = index(
        "SET DEFINE OFF;\n\
         GRANT SELECT ON T1 TO APP_RO;\n\
         CREATE INDEX T1_IX ON T1 (C2);\n\
         COMMIT;\n\
         ALTER TABLE T1 MODIFY (C1 NOT NULL);\n"
    );
    assert!(index.tables.is_empty());
    assert!(index.parse_errors.is_empty());
}

#[test]
fn test_keywords_match_case_insensitively() {
    let index = index("create table t1 (c1 number);\nInsert into t1 (c1) values (1);\n");
    assert!(index.schemas.contains_key("T1"));
    assert_eq!(index.rows_of("T1").len(), 1);
    assert_eq!(index.rows_of("T1")[0].value("C1"), Some("1"));
}

#[test]
fn test_create_table_variants() {
    let index = index(
        "CREATE TABLE IF NOT EXISTS lookup_codes (code VARCHAR(10), label VARCHAR(50));\n\
         CREATE TABLE \"APP\".\"T2\" (\"ID\" NUMBER(10,0), \"NAME\" VARCHAR2(30 BYTE) DEFAULT 'x, y');\n"
    );
    assert_eq!(index.schemas["LOOKUP_CODES"].table_name, "lookup_codes");
    let t2 = &index.schemas["T2"];
    assert_eq!(t2.columns.len(), 2);
    assert_eq!(
        t2.columns["NAME"].sql_definition,
        "\"NAME\" VARCHAR2(30 BYTE) DEFAULT 'x, y'"
    );
}

#[test]
fn test_alter_add_forms() {
    let index = index(
        "CREATE TABLE T1 (C1 NUMBER);\n\
         ALTER TABLE T1 ADD (C2 NUMBER, C3 DATE);\n\
         ALTER TABLE T1 ADD C4 VARCHAR2(5);\n\
         ALTER TABLE T1 ADD COLUMN c5 INTEGER;\n\
         ALTER TABLE T1 ADD CONSTRAINT T1_UK UNIQUE (C2);\n"
    );
    let columns: Vec<&str> = index.schemas["T1"]
        .columns
        .values()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(columns, ["C1", "C2", "C3", "C4", "c5"]);
    assert!(index.parse_errors.is_empty());
    assert!(index.primary_keys.is_empty());
}

#[test]
fn test_primary_key_forms() {
    let index = index(
        "ALTER TABLE T1 ADD CONSTRAINT T1_PK PRIMARY KEY (\"ID\", CODE) USING INDEX;\n\
         CREATE UNIQUE INDEX T2_UK ON APP.T2 (NAME);\n\
         CREATE UNIQUE INDEX T1_UK ON T1 (OTHER);\n"
    );
    let t1 = &index.primary_keys["T1"];
    assert_eq!(t1.columns.as_slice(), ["ID", "CODE"]);
    assert_eq!(
        t1.ddl_text,
        "ALTER TABLE T1 ADD CONSTRAINT T1_PK PRIMARY KEY (\"ID\", CODE) USING INDEX;"
    );
    assert_eq!(index.primary_keys["T2"].columns.as_slice(), ["NAME"]);
}

#[test]
fn test_insert_values_are_normalized() {
    let index = index(
        "INSERT INTO T1 (ID, D, N, S) VALUES (1, TO_DATE('2024-01-01',\n   'YYYY-MM-DD'), null, 'a,  b');\n"
    );
    let row = &index.rows_of("T1")[0];
    assert_eq!(row.value("D"), Some("TO_DATE('2024-01-01', 'YYYY-MM-DD')"));
    assert_eq!(row.value("N"), Some("NULL"));
    assert_eq!(row.value("S"), Some("'a,  b'"));
    assert_eq!(row.source_line, 1);
    assert!(row.original_insert_sql.ends_with("'a,  b');"));
}

#[test]
fn test_unparseable_indexed_statements_become_issues() {
    let index = index(
        "INSERT INTO T1 VALUES (1, 2);\n\
         INSERT INTO T1 (A, B) VALUES (1);\n\
         CREATE TABLE T2 BROKEN;\n"
    );
    assert!(index.rows.is_empty());
    let lines: Vec<Option<usize>> = index.parse_errors.iter().map(|e| e.line).collect();
    assert_eq!(lines, [Some(1), Some(2), Some(3)]);
    assert_eq!(
        index.parse_errors[1].message,
        "column/value count mismatch (2 columns, 1 values)"
    );
}

#[test]
fn test_table_filter_skips_other_tables() {
    let options = ParseOptions {
        table_contains: Some("LKP".to_string()),
        ..ParseOptions::default()
    };
    let index = ExportIndexBuilder::new(options).index_sources([(
        "export.sql",
        "CREATE TABLE LKP_A (C1 NUMBER);\n\
         CREATE TABLE T_OTHER (C1 NUMBER);\n\
         INSERT INTO T_OTHER (C1) VALUES (1);\n\
         INSERT INTO T_OTHER (C1) VALUES (1, 2);\n"
    )]);
    let tables: Vec<&str> = index.tables.iter().map(|t| t.as_str()).collect();
    assert_eq!(tables, ["LKP_A"]);
    assert!(index.parse_errors.is_empty());
}

#[test]
fn test_parse_source_emits_events_in_file_order() {
    let builder = ExportIndexBuilder::new(ParseOptions::default());
    let parsed = builder.parse_source(
        "a.sql",
        "\u{feff}ALTER TABLE T1 ADD (C2 NUMBER);\nCREATE TABLE T1 (C1 NUMBER);\n"
    );
    assert_eq!(parsed.events.len(), 2);
    assert!(matches!(parsed.events[0], IndexEvent::AddColumns { .. }));
    assert!(matches!(parsed.events[1], IndexEvent::CreateTable(_)));
}

#[test]
fn test_first_declaration_wins() {
    let index = ExportIndexBuilder::new(ParseOptions::default()).index_sources([
        ("a.sql", "CREATE TABLE T1 (C1 NUMBER);\nALTER TABLE T1 ADD PRIMARY KEY (C1);\n"),
        ("b.sql", "CREATE TABLE T1 (X NUMBER);\nALTER TABLE T1 ADD PRIMARY KEY (X);\n")
    ]);
    let schema = &index.schemas["T1"];
    assert_eq!(schema.file, "a.sql");
    assert!(schema.columns.contains_key("C1"));
    assert!(!schema.columns.contains_key("X"));
    assert_eq!(index.primary_keys["T1"].file, "a.sql");
}
