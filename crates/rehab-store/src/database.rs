//! SQLite connection for the rehab-grid store.
//!
//! Every constructor brings the schema up to date before returning, so a
//! [`Database`] in hand always has the current tables.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use rusqlite::Connection;

use crate::error::{Result, StoreError};
use crate::migrations;

/// File name of the store inside the data directory.
pub const DB_FILE_NAME: &str = "rehab-grid.db";

/// Open SQLite connection with the schema migrated.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Platform data directory for the application:
    /// - Linux:   `~/.local/share/rehab-grid`
    /// - macOS:   `~/Library/Application Support/com.rehab-grid.rehab-grid`
    /// - Windows: `{FOLDERID_RoamingAppData}\rehab-grid\rehab-grid\data`
    pub fn default_data_dir() -> Result<PathBuf> {
        let project_dirs =
            ProjectDirs::from("com", "rehab-grid", "rehab-grid").ok_or(StoreError::NoDataDir)?;
        Ok(project_dirs.data_dir().to_path_buf())
    }

    /// Open (or create) the database inside `data_dir`, creating the
    /// directory when needed.
    pub fn open_in_dir(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        Self::open_at(&data_dir.join(DB_FILE_NAME))
    }

    /// Open (or create) the store file at `path` in WAL mode.
    pub fn open_at(path: &Path) -> Result<Self> {
        tracing::info!(path = %path.display(), "opening database");

        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::init(conn)
    }

    /// Open a private in-memory database. Nothing survives the handle.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        migrations::run_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Raw connection for the per-table helpers.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// File backing the store; `None` for in-memory stores.
    pub fn path(&self) -> Option<PathBuf> {
        self.conn
            .path()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    }
}
