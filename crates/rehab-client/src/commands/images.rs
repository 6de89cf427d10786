//! Image upload into the local store.

use tracing::info;

use rehab_shared::media::file_name_without_extension;
use rehab_shared::{ImageBlob, ImageId};

use crate::error::Result;
use crate::state::AppState;

/// Response payload returned after an image is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedImage {
    pub id: ImageId,
    pub display_name: String,
    pub size: usize,
}

/// Store an uploaded image under a fresh id.
///
/// The size ceiling is checked before the content; the type is taken from
/// the magic bytes, never from the name.
pub async fn add_image(state: &AppState, bytes: Vec<u8>, file_name: &str) -> Result<SavedImage> {
    let blob = ImageBlob::from_upload(bytes)?;
    let id = ImageId::generate();
    let display_name = file_name_without_extension(file_name).to_string();

    state.store.save_image(&id, &blob, Some(&display_name)).await?;

    info!(
        image_id = %id,
        mime = %blob.mime(),
        size = blob.len(),
        "image saved"
    );
    Ok(SavedImage {
        id,
        display_name,
        size: blob.len(),
    })
}

/// Read an image file from disk and store it.
pub async fn add_image_file(state: &AppState, path: &std::path::Path) -> Result<SavedImage> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image");
    add_image(state, bytes, file_name).await
}
