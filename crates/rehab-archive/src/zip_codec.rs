//! ZIP archive codec: `project.json` plus one file per resolved image under
//! `images/`.

use std::collections::HashMap;
use std::io::{self, Cursor, Read, Write};

use rehab_shared::constants::{
    ARCHIVE_IMAGE_DIR, ARCHIVE_PROJECT_ENTRY, MAX_IMPORT_ZIP_SIZE, MAX_ZIP_EXTRACTED_SIZE,
    MAX_ZIP_IMAGE_COUNT, SCHEMA_VERSION,
};
use rehab_shared::{validate, ImageBlob, ImageId, ImageRef, Project};
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{ExportError, ImportError};
use crate::ImportResult;

/// Write `project` and the images in `resolved` into a ZIP archive.
///
/// Local references are rewritten to `images/img_NNN.ext`, numbered from 1
/// in item order; an id shared by several items is written once. Local
/// references missing from `resolved` become empty. Sample references are
/// left alone. The output depends only on the inputs.
pub fn export_to_archive(
    project: &Project,
    resolved: &HashMap<ImageId, ImageBlob>,
) -> Result<Vec<u8>, ExportError> {
    let mut entries: Vec<(ImageId, String, &ImageBlob)> = Vec::new();
    for id in project.local_image_ids() {
        let Some(blob) = resolved.get(&id) else {
            tracing::warn!(image_id = %id, "image missing from store, dropping reference");
            continue;
        };
        let path = format!(
            "{ARCHIVE_IMAGE_DIR}img_{:03}.{}",
            entries.len() + 1,
            blob.mime().extension()
        );
        entries.push((id, path, blob));
    }
    let path_of: HashMap<&ImageId, &str> = entries
        .iter()
        .map(|(id, path, _)| (id, path.as_str()))
        .collect();

    let mut document = project.clone();
    document.meta.schema_version = SCHEMA_VERSION.to_string();
    for item in &mut document.items {
        if let ImageRef::Local(id) = &item.image_source {
            let rewritten = path_of
                .get(id)
                .map_or(ImageRef::None, |path| ImageRef::Local(ImageId::from(*path)));
            item.image_source = rewritten;
        }
    }
    let json = serde_json::to_vec_pretty(&document)?;

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut zip = ZipWriter::new(&mut cursor);
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default());

        zip.start_file(ARCHIVE_PROJECT_ENTRY, options)?;
        zip.write_all(&json)?;

        for (_, path, blob) in &entries {
            zip.start_file(path.as_str(), options)?;
            zip.write_all(blob.data())?;
        }
        zip.finish()?;
    }

    tracing::info!(
        items = document.items.len(),
        images = entries.len(),
        "project exported to archive"
    );
    Ok(cursor.into_inner())
}

/// Read an archive produced by [`export_to_archive`] (or by the web
/// application) without touching any store.
///
/// Every local reference in the returned project is a key of
/// [`ImportResult::images`].
pub fn import_from_archive(bytes: &[u8]) -> Result<ImportResult, ImportError> {
    if bytes.len() > MAX_IMPORT_ZIP_SIZE {
        return Err(ImportError::FileTooLarge {
            size: bytes.len(),
            max: MAX_IMPORT_ZIP_SIZE,
        });
    }

    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ImportError::CorruptedArchive(e.to_string()))?;
    let mut budget = ExtractionBudget::new(MAX_ZIP_EXTRACTED_SIZE);

    let raw_project = read_project_entry(&mut archive, &mut budget)?;

    let image_count = archive.file_names().filter(|name| is_image_entry(name)).count();
    if image_count > MAX_ZIP_IMAGE_COUNT {
        return Err(ImportError::TooManyImages {
            count: image_count,
            max: MAX_ZIP_IMAGE_COUNT,
        });
    }

    let extracted = read_image_entries(&mut archive, &mut budget)?;

    let mut project = validate(raw_project)?;
    project.meta.schema_version = SCHEMA_VERSION.to_string();

    let mut images = HashMap::new();
    for item in &mut project.items {
        let Some(path) = item.image_source.local_id().map(|id| id.as_str().to_owned()) else {
            continue;
        };
        match extracted.get(&path) {
            Some(blob) => {
                images.entry(path).or_insert_with(|| blob.clone());
            }
            None => {
                tracing::warn!(%path, item_id = %item.id, "no usable image for reference, clearing");
                item.image_source = ImageRef::None;
            }
        }
    }

    tracing::info!(
        items = project.items.len(),
        images = images.len(),
        "archive imported"
    );
    Ok(ImportResult { project, images })
}

fn is_image_entry(name: &str) -> bool {
    name.len() > ARCHIVE_IMAGE_DIR.len()
        && name.starts_with(ARCHIVE_IMAGE_DIR)
        && !name.ends_with('/')
}

fn read_project_entry(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    budget: &mut ExtractionBudget,
) -> Result<serde_json::Value, ImportError> {
    let mut file = match archive.by_name(ARCHIVE_PROJECT_ENTRY) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Err(ImportError::NoProject),
        Err(e) => return Err(ImportError::CorruptedArchive(e.to_string())),
    };
    let data = match budget.read_entry(&mut file)? {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!(error = %e, "project.json could not be read");
            return Err(ImportError::NoProject);
        }
    };
    serde_json::from_slice(&data).map_err(|e| {
        tracing::warn!(error = %e, "project.json is not valid JSON");
        ImportError::NoProject
    })
}

/// Decompress every image entry, keeping those whose bytes are an allowed
/// image format. Unreadable or unrecognised entries are skipped.
fn read_image_entries(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    budget: &mut ExtractionBudget,
) -> Result<HashMap<String, ImageBlob>, ImportError> {
    let mut found = HashMap::new();
    for index in 0..archive.len() {
        let mut file = match archive.by_index(index) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping unreadable archive entry");
                continue;
            }
        };
        if !file.is_file() || !is_image_entry(file.name()) {
            continue;
        }
        let name = file.name().to_string();

        let data = match budget.read_entry(&mut file)? {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(entry = %name, error = %e, "skipping damaged image entry");
                continue;
            }
        };
        match ImageBlob::sniffed(data) {
            Ok(blob) => {
                tracing::debug!(entry = %name, mime = %blob.mime(), size = blob.len(), "image entry accepted");
                found.insert(name, blob);
            }
            Err(e) => {
                tracing::warn!(entry = %name, error = %e, "skipping entry that is not an allowed image");
            }
        }
    }
    Ok(found)
}

/// Running total of decompressed bytes. Sizes come from what the decoder
/// actually produced, never from entry headers.
struct ExtractionBudget {
    limit: u64,
    remaining: u64,
}

impl ExtractionBudget {
    fn new(limit: u64) -> Self {
        Self {
            limit,
            remaining: limit,
        }
    }

    /// Read one entry. The outer error aborts the import; the inner one is
    /// a damaged entry the caller may skip.
    fn read_entry(&mut self, entry: impl Read) -> Result<io::Result<Vec<u8>>, ImportError> {
        let mut data = Vec::new();
        let outcome = entry.take(self.remaining + 1).read_to_end(&mut data);
        self.consume(data.len() as u64)?;
        Ok(outcome.map(|_| data))
    }

    fn consume(&mut self, bytes: u64) -> Result<(), ImportError> {
        if bytes > self.remaining {
            return Err(ImportError::ExtractedTooLarge { max: self.limit });
        }
        self.remaining -= bytes;
        Ok(())
    }
}
