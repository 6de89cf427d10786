//! File type detection and download naming.

use chrono::NaiveDate;

use crate::error::ImportError;
use crate::json_codec::import_from_json;
use crate::zip_codec::import_from_archive;
use crate::ImportResult;

/// Container format of a project file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Json,
    Zip,
}

impl FileKind {
    pub fn extension(self) -> &'static str {
        match self {
            FileKind::Json => "json",
            FileKind::Zip => "zip",
        }
    }

    /// Extension first, then the `PK` local-header magic.
    pub fn detect(file_name: &str, bytes: &[u8]) -> Option<Self> {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("json") => Some(FileKind::Json),
            Some("zip") => Some(FileKind::Zip),
            _ if bytes.starts_with(b"PK") => Some(FileKind::Zip),
            _ => None,
        }
    }
}

/// Detect the format of `bytes` and import it with the matching codec.
pub fn import_project(file_name: &str, bytes: &[u8]) -> Result<ImportResult, ImportError> {
    let kind = FileKind::detect(file_name, bytes).ok_or(ImportError::InvalidFormat)?;
    tracing::debug!(file_name, ?kind, size = bytes.len(), "importing project file");
    match kind {
        FileKind::Json => import_from_json(bytes),
        FileKind::Zip => import_from_archive(bytes),
    }
}

/// `rehab-grid-YYYY-MM-DD.{json,zip}`
pub fn download_file_name(kind: FileKind, date: NaiveDate) -> String {
    format!("rehab-grid-{}.{}", date.format("%Y-%m-%d"), kind.extension())
}

/// [`download_file_name`] for today's local date.
pub fn download_file_name_today(kind: FileKind) -> String {
    download_file_name(kind, chrono::Local::now().date_naive())
}
