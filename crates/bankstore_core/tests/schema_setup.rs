use bankstore_core::db::schema::SCHEMA_VERSION;
use bankstore_core::db::{
    default_schema_name, has_table, open_db, open_db_in_memory, table_names, DbError,
};
use bankstore_core::{RepoError, SqliteBankRepository};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_creates_both_tables() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), SCHEMA_VERSION);
    assert!(has_table(&conn, "client").unwrap());
    assert!(has_table(&conn, "account").unwrap());
    assert!(!has_table(&conn, "conta").unwrap());
    assert_eq!(default_schema_name(&conn).unwrap(), "main");
}

#[test]
fn opening_same_file_twice_does_not_duplicate_tables() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("banco.db");

    let first = open_db(&path).unwrap();
    let tables_before = table_names(&first).unwrap();
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(table_names(&second).unwrap(), tables_before);
    assert_eq!(tables_before, vec!["account", "client"]);
    assert_eq!(schema_version(&second), SCHEMA_VERSION);
}

#[test]
fn reopening_keeps_persisted_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("banco.db");

    let conn = open_db(&path).unwrap();
    conn.execute(
        "INSERT INTO client (name, national_id, address) VALUES ('Ana', '321654987', 'Rua D');",
        [],
    )
    .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM client;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 42;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 42);
            assert_eq!(latest_supported, SCHEMA_VERSION);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn repository_rejects_connection_without_schema() {
    let mut conn = Connection::open_in_memory().unwrap();

    match SqliteBankRepository::try_new(&mut conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, SCHEMA_VERSION),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_stamped_connection_missing_account_table() {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!(
        "CREATE TABLE client (id INTEGER PRIMARY KEY, name TEXT, national_id TEXT, address TEXT);
         PRAGMA user_version = {SCHEMA_VERSION};"
    ))
    .unwrap();

    let result = SqliteBankRepository::try_new(&mut conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("account"))
    ));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}
