//! Row types persisted in the local SQLite database.

use chrono::{DateTime, Utc};
use rehab_shared::{ImageBlob, ImageId, Project};

/// The stored project row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRecord {
    /// Always [`CURRENT_PROJECT_ID`](rehab_shared::constants::CURRENT_PROJECT_ID).
    pub id: String,
    /// Copy of `meta.title`, kept as a column for listing.
    pub title: String,
    pub project: Project,
    pub updated_at: DateTime<Utc>,
}

/// A stored image together with its metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub id: ImageId,
    pub blob: ImageBlob,
    /// BLAKE3 hex digest of the bytes, checked on every read.
    pub blake3_hash: String,
    /// Original upload name without extension, when known.
    pub file_name: Option<String>,
    pub created_at: DateTime<Utc>,
}
