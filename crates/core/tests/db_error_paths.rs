use codescope_core::db::{DbError, ProjectDb, ProjectLayout};
use rusqlite::Connection;
use tempfile::tempdir;

#[test]
fn project_db_open_errors_on_unsupported_schema_version() {
    let tmp = tempdir().expect("temp dir");
    let layout = ProjectLayout::new(tmp.path());
    std::fs::create_dir_all(&layout.meta_dir).expect("create .codescope dir");

    {
        let conn = Connection::open(&layout.db_path).expect("open raw sqlite db");
        conn.pragma_update(None, "user_version", 99_i32).expect("set user_version pragma");
    }

    match ProjectDb::open(&layout.db_path) {
        Err(DbError::UnsupportedSchemaVersion { found, min_supported, max_supported }) => {
            assert_eq!(found, 99);
            assert_eq!(min_supported, 0);
            assert_eq!(max_supported, 2);
        }
        Err(err) => panic!("expected UnsupportedSchemaVersion error, got different DbError: {err}"),
        Ok(_) => panic!("expected UnsupportedSchemaVersion error, got Ok(_)"),
    }
}

#[test]
fn version_one_database_is_upgraded_in_place() {
    let tmp = tempdir().expect("temp dir");
    let path = tmp.path().join("project.db");
    {
        let conn = Connection::open(&path).expect("open raw");
        conn.execute_batch(
            r#"
            CREATE TABLE projects (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                name       TEXT NOT NULL,
                kind       TEXT NOT NULL,
                settings   TEXT,
                created_at TEXT NOT NULL
            );
            INSERT INTO projects (name, kind, created_at) VALUES ('Old', 'python', '2024-01-01T00:00:00Z');
            PRAGMA user_version = 1;
            "#,
        )
        .expect("seed v1 schema");
    }

    let db = ProjectDb::open(&path).expect("upgrade");
    let projects = db.list_projects().expect("list");
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].name, "Old");
    let id = projects[0].id.expect("id");
    assert!(db.latest_analysis(id).expect("query new table").is_none());
}

#[test]
fn corrupt_json_column_surfaces_as_json_error() {
    let db = ProjectDb::open_in_memory().expect("open");
    db.connection()
        .execute(
            "INSERT INTO projects (name, kind, settings, created_at) VALUES ('x', 'python', '{bad', 'now')",
            [],
        )
        .expect("raw insert");

    match db.list_projects() {
        Err(DbError::Json(_)) => {}
        other => panic!("expected Json error, got {other:?}"),
    }
}
