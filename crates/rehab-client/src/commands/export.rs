//! Export the session project as a ZIP backup or a text-only JSON file.

use std::path::{Path, PathBuf};

use tracing::info;

use rehab_archive::{download_file_name_today, export_to_archive, export_to_json, FileKind};

use crate::error::Result;
use crate::state::AppState;

/// An exported file ready to be written.
#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub kind: FileKind,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Full backup: project plus every referenced stored image.
pub async fn export_zip(state: &AppState) -> Result<ExportedFile> {
    let project = &state.session.project;
    let ids = project.local_image_ids();
    let images = state.store.get_images(&ids).await?;
    let bytes = export_to_archive(project, &images)?;

    info!(
        referenced = ids.len(),
        found = images.len(),
        size = bytes.len(),
        "archive exported"
    );
    Ok(ExportedFile {
        kind: FileKind::Zip,
        file_name: download_file_name_today(FileKind::Zip),
        bytes,
    })
}

/// Text-only export; stored image references are cleared.
pub fn export_json(state: &AppState) -> Result<ExportedFile> {
    let json = export_to_json(&state.session.project)?;
    info!(size = json.len(), "json exported");
    Ok(ExportedFile {
        kind: FileKind::Json,
        file_name: download_file_name_today(FileKind::Json),
        bytes: json.into_bytes(),
    })
}

/// Write an export into `dir` under its download name, or to `path` when
/// one is given. Returns the written path.
pub async fn write_export(file: &ExportedFile, dir: &Path, path: Option<&Path>) -> Result<PathBuf> {
    let target = path.map_or_else(|| dir.join(&file.file_name), Path::to_path_buf);
    tokio::fs::write(&target, &file.bytes).await?;
    info!(path = %target.display(), "export written");
    Ok(target)
}

#[cfg(test)]
mod tests {
    use rehab_archive::import_project;
    use rehab_shared::ImageRef;

    use super::*;
    use crate::commands::images::add_image;
    use crate::commands::project::add_card;
    use crate::state::in_memory_state;

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];

    #[tokio::test]
    async fn zip_export_carries_stored_images() {
        let (mut state, _store) = in_memory_state().await;
        let saved = add_image(&state, PNG.to_vec(), "a.png").await.unwrap();
        add_card(&mut state, "画像あり", Some(saved.id.as_str())).await.unwrap();
        add_card(&mut state, "サンプル", Some("sample_standing_01")).await.unwrap();

        let file = export_zip(&state).await.unwrap();
        assert!(file.file_name.starts_with("rehab-grid-"));
        assert!(file.file_name.ends_with(".zip"));

        let imported = import_project(&file.file_name, &file.bytes).unwrap();
        assert_eq!(imported.images.len(), 1);
        assert_eq!(
            imported.project.items[0].image_source,
            ImageRef::parse("images/img_001.png")
        );
        assert_eq!(
            imported.project.items[1].image_source,
            ImageRef::Sample("sample_standing_01".into())
        );
    }

    #[tokio::test]
    async fn json_export_drops_stored_references() {
        let (mut state, _store) = in_memory_state().await;
        let saved = add_image(&state, PNG.to_vec(), "a.png").await.unwrap();
        add_card(&mut state, "画像あり", Some(saved.id.as_str())).await.unwrap();

        let file = export_json(&state).unwrap();
        assert!(file.file_name.ends_with(".json"));
        let text = String::from_utf8(file.bytes).unwrap();
        assert!(!text.contains(saved.id.as_str()));
    }

    #[tokio::test]
    async fn writes_under_download_name() {
        let (state, _store) = in_memory_state().await;
        let dir = tempfile::tempdir().unwrap();
        let file = export_json(&state).unwrap();

        let written = write_export(&file, dir.path(), None).await.unwrap();
        assert_eq!(written, dir.path().join(&file.file_name));
        assert_eq!(std::fs::read(&written).unwrap(), file.bytes);
    }
}
