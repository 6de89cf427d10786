//! v001: the `projects` and `images` tables.

use rusqlite::Connection;

/// Schema for an empty store.
const UP_SQL: &str = r#"
-- Projects (a single row keyed "current")
CREATE TABLE IF NOT EXISTS projects (
    id         TEXT PRIMARY KEY NOT NULL,
    title      TEXT NOT NULL,
    data       TEXT NOT NULL,                -- project document as JSON
    updated_at TEXT NOT NULL                 -- RFC-3339
);

-- Images referenced by exercise cards
CREATE TABLE IF NOT EXISTS images (
    id          TEXT PRIMARY KEY NOT NULL,   -- UUID v4
    mime        TEXT NOT NULL,               -- image/png, image/jpeg, ...
    data        BLOB NOT NULL,
    blake3_hash TEXT NOT NULL,
    file_name   TEXT,
    created_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_images_created_at ON images(created_at);
"#;

/// Create the v1 tables.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
