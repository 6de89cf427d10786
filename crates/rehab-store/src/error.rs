use rehab_shared::MediaError;
use thiserror::Error;

/// Everything that can go wrong while reading or writing the local store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite error.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The platform has no per-user data directory.
    #[error("No platform data directory available")]
    NoDataDir,

    /// Creating the data directory failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The requested project or image row does not exist.
    #[error("No such record")]
    NotFound,

    /// Migration failure.
    #[error("Schema migration failed: {0}")]
    Migration(String),

    /// The stored project document could not be (de)serialized.
    #[error("Project JSON error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Stored image bytes no longer match their recorded hash.
    #[error("Image {id} is corrupt: content hash mismatch")]
    Corrupt { id: String },

    /// Stored MIME type is outside the allow-list.
    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    /// Timestamp column could not be parsed.
    #[error("Bad timestamp column: {0}")]
    ChronoParse(#[from] chrono::ParseError),

    /// No later millisecond exists after this `updatedAt`.
    #[error("Cannot stamp a save after {0}")]
    StampOutOfRange(chrono::DateTime<chrono::Utc>),

    /// The store handle was closed.
    #[error("Store is closed")]
    Closed,

    /// A previous operation panicked while holding the connection.
    #[error("Store lock poisoned")]
    LockPoisoned,

    /// The blocking task running a database operation failed.
    #[error("Background task failed: {0}")]
    Task(String),
}

/// Result alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
