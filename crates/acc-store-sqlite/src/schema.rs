//! Database schema management.

use rusqlite::Connection;
use tokio_rusqlite::Error;

/// Initialize the database schema.
pub fn init_schema(conn: &Connection) -> Result<(), Error> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

const SCHEMA: &str = r#"
PRAGMA foreign_keys = ON;

-- Saved excerpts; the anchor is stored as kind + value
CREATE TABLE IF NOT EXISTS excerpts (
    id TEXT PRIMARY KEY,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL,
    source_url TEXT NOT NULL,
    anchor_kind TEXT NOT NULL CHECK (anchor_kind IN ('id', 'index', 'fingerprint')),
    anchor_value TEXT NOT NULL
);

-- Tags keep their insertion order
CREATE TABLE IF NOT EXISTS excerpt_tags (
    excerpt_id TEXT NOT NULL,
    tag TEXT NOT NULL,
    position INTEGER NOT NULL,
    PRIMARY KEY (excerpt_id, tag),
    FOREIGN KEY (excerpt_id) REFERENCES excerpts(id) ON DELETE CASCADE
);

-- User titles live apart from the immutable excerpt
CREATE TABLE IF NOT EXISTS excerpt_titles (
    excerpt_id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    FOREIGN KEY (excerpt_id) REFERENCES excerpts(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_excerpts_created ON excerpts(created_at);
CREATE INDEX IF NOT EXISTS idx_excerpts_source ON excerpts(source_url);
CREATE INDEX IF NOT EXISTS idx_excerpt_tags_tag ON excerpt_tags(tag);
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn table_exists(conn: &Connection, name: &str) -> bool {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")
            .unwrap();
        stmt.exists([name]).unwrap()
    }

    #[test]
    fn test_schema_creation() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        assert!(table_exists(&conn, "excerpts"));
        assert!(table_exists(&conn, "excerpt_tags"));
        assert!(table_exists(&conn, "excerpt_titles"));
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        let on: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(on, 1);
    }

    #[test]
    fn test_unknown_anchor_kind_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        let result = conn.execute(
            "INSERT INTO excerpts VALUES ('x', 'c', '2024-01-01T00:00:00Z', 'https://a.b/', 'bogus', 'v')",
            [],
        );
        assert!(result.is_err());
    }
}
