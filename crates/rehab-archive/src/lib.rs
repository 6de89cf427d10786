//! # rehab-archive
//!
//! Conversion between a [`Project`] and the two external file formats: a ZIP
//! archive carrying the images, and a bare JSON document without them.
//! Importing never touches a store; callers receive an [`ImportResult`] and
//! decide what to persist.

pub mod detect;
pub mod json_codec;
pub mod zip_codec;

mod error;

use std::collections::HashMap;

use rehab_shared::{ImageBlob, Project};

pub use detect::{download_file_name, download_file_name_today, import_project, FileKind};
pub use error::{ExportError, ImportCategory, ImportError};
pub use json_codec::{export_to_json, import_from_json};
pub use zip_codec::{export_to_archive, import_from_archive};

/// A validated project read from a file, plus the images it carried keyed
/// by their path inside the file.
#[derive(Debug, Clone)]
pub struct ImportResult {
    pub project: Project,
    pub images: HashMap<String, ImageBlob>,
}

impl ImportResult {
    /// Wrap a project that brings no image payloads.
    pub fn without_images(project: Project) -> Self {
        Self {
            project,
            images: HashMap::new(),
        }
    }
}
