use rehab_shared::{ValidationError, ValidationKind};
use thiserror::Error;

/// Coarse class of an import failure, used to pick the message shown to the
/// user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportCategory {
    Validation,
    Corrupted,
    Oversized,
    ResourceExhaustion,
}

/// Errors produced while reading an external project file.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("File too large: {size} bytes (max {max})")]
    FileTooLarge { size: usize, max: usize },

    #[error("Unsupported file format")]
    InvalidFormat,

    #[error("Corrupted archive: {0}")]
    CorruptedArchive(String),

    #[error("Archive has no readable project.json")]
    NoProject,

    #[error("Too many images in archive: {count} (max {max})")]
    TooManyImages { count: usize, max: usize },

    #[error("Archive expands beyond {max} bytes")]
    ExtractedTooLarge { max: u64 },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ImportError {
    pub fn category(&self) -> ImportCategory {
        match self {
            ImportError::FileTooLarge { .. } => ImportCategory::Oversized,
            ImportError::InvalidFormat => ImportCategory::Validation,
            ImportError::CorruptedArchive(_) | ImportError::NoProject => ImportCategory::Corrupted,
            ImportError::TooManyImages { .. } | ImportError::ExtractedTooLarge { .. } => {
                ImportCategory::ResourceExhaustion
            }
            ImportError::Validation(e) => match e.kind() {
                ValidationKind::Oversized => ImportCategory::Oversized,
                ValidationKind::Structure | ValidationKind::MissingProjectData => {
                    ImportCategory::Validation
                }
            },
        }
    }

    /// Message shown to the user, one per failure variant.
    pub fn user_message(&self) -> &'static str {
        match self {
            ImportError::FileTooLarge { .. } => "ファイルサイズが大きすぎます",
            ImportError::InvalidFormat => "対応していないファイル形式です",
            ImportError::CorruptedArchive(_) => "ZIPファイルが破損しています",
            ImportError::NoProject => "ZIPファイルにプロジェクトデータがありません",
            ImportError::TooManyImages { .. } => "ZIPファイル内の画像数が多すぎます",
            ImportError::ExtractedTooLarge { .. } => "ZIPファイルの展開後サイズが大きすぎます",
            ImportError::Validation(e) => match e.kind() {
                ValidationKind::Oversized => "カードの枚数が上限を超えています",
                ValidationKind::MissingProjectData => "プロジェクトデータが見つかりません",
                ValidationKind::Structure => "ファイル形式が正しくありません",
            },
        }
    }
}

/// Errors produced while writing an archive.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Archive write error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
