use todos_core::db::migrations::latest_version;
use todos_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "todos");
}

#[test]
fn open_db_reports_the_path_it_could_not_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("todos.db");

    let err = open_db(&path).unwrap_err();
    match &err {
        DbError::Open { path: reported, .. } => assert_eq!(reported, &path),
        other => panic!("expected open error, got {other:?}"),
    }
    assert!(err.to_string().contains("todos.db"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todos.db");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute("INSERT INTO todos (title) VALUES ('kept');", [])
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let count: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM todos;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn schema_rejects_negative_position_and_empty_title() {
    let conn = open_db_in_memory().unwrap();

    assert!(conn
        .execute("INSERT INTO todos (title, position) VALUES ('x', -1);", [])
        .is_err());
    assert!(conn
        .execute("INSERT INTO todos (title) VALUES ('');", [])
        .is_err());
}

#[test]
fn schema_defaults_fill_completed_and_timestamps() {
    let conn = open_db_in_memory().unwrap();
    conn.execute("INSERT INTO todos (title) VALUES ('defaults');", [])
        .unwrap();

    let (completed, created, updated): (i64, i64, i64) = conn
        .query_row(
            "SELECT completed, created, updated FROM todos;",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();
    assert_eq!(completed, 0);
    assert!(created > 1_600_000_000_000, "created should be epoch ms");
    assert_eq!(created, updated);
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
