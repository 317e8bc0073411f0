// Database service module
// SQLite database connection and schema management

mod connection;
mod schema;

pub use connection::Database;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn table_exists(db: &Database, name: &str) -> bool {
        let count: i64 = db
            .connection()
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                [name],
                |row| row.get(0),
            )
            .unwrap();
        count == 1
    }

    #[test]
    fn test_new_database_in_memory() {
        let result = Database::new(":memory:");
        assert!(result.is_ok(), "Should create in-memory database");
    }

    #[test]
    fn test_new_database_with_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db_path_str = db_path.to_str().unwrap();

        let db = Database::new(db_path_str).unwrap();
        assert!(Path::new(db_path_str).exists(), "Database file should exist");
        assert_eq!(db.path(), db_path_str);
    }

    #[test]
    fn test_initialize_schema_creates_tables() {
        let db = Database::open_initialized(":memory:").unwrap();
        for table in ["users", "calendars", "events", "event_reminders", "holidays"] {
            assert!(table_exists(&db, table), "{} table should exist", table);
        }
    }

    fn has_column(db: &Database, table: &str, column: &str) -> bool {
        let mut stmt = db
            .connection()
            .prepare(&format!("PRAGMA table_info({})", table))
            .unwrap();
        let names: Vec<String> = stmt
            .query_map([], |row| row.get(1))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        names.iter().any(|name| name == column)
    }

    #[test]
    fn test_initialize_schema_is_idempotent() {
        let db = Database::open_initialized(":memory:").unwrap();
        assert!(db.initialize_schema().is_ok());
        assert!(has_column(&db, "events", "color"));
        assert!(has_column(&db, "holidays", "fetched_at"));
    }

    #[test]
    fn test_remote_ids_are_unique_per_owner() {
        let db = Database::open_initialized(":memory:").unwrap();
        let conn = db.connection();
        conn.execute_batch(
            "INSERT INTO users (name) VALUES ('Ada');
             INSERT INTO calendars (user_id, name, remote_id) VALUES (1, 'Work', 'w');
             INSERT INTO calendars (user_id, name) VALUES (1, 'Local A');
             INSERT INTO calendars (user_id, name) VALUES (1, 'Local B');",
        )
        .unwrap();

        let duplicate = conn.execute(
            "INSERT INTO calendars (user_id, name, remote_id) VALUES (1, 'Copy', 'w')",
            [],
        );
        assert!(duplicate.is_err());
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let db = Database::new(":memory:").unwrap();
        let enabled: i64 = db
            .connection()
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1, "Foreign keys should be enabled");
    }
}
