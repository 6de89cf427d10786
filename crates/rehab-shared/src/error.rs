use thiserror::Error;

/// Failure classes a caller maps to distinct user messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    /// Input does not match the project schema.
    Structure,
    /// Input exceeds a cardinality bound.
    Oversized,
    /// Input lacks the meta/settings/items sections entirely.
    MissingProjectData,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required project data: {0}")]
    MissingProjectData(&'static str),

    #[error("Invalid project structure: {0}")]
    Structure(String),

    #[error("Too many items: {count} (max {max})")]
    TooManyItems { count: usize, max: usize },
}

impl ValidationError {
    pub fn kind(&self) -> ValidationKind {
        match self {
            ValidationError::MissingProjectData(_) => ValidationKind::MissingProjectData,
            ValidationError::Structure(_) => ValidationKind::Structure,
            ValidationError::TooManyItems { .. } => ValidationKind::Oversized,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    #[error("Unsupported image type: {0}")]
    UnsupportedType(String),

    #[error("Image data does not match any supported format")]
    UnrecognizedContent,

    #[error("Image too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },

    #[error("Empty image data")]
    Empty,
}
