//! Store housekeeping: orphan cleanup and project deletion.

use std::collections::HashSet;

use tracing::{info, warn};

use rehab_shared::ImageId;

use crate::error::Result;
use crate::state::{AppState, EditorSession};

/// Delete every stored image the stored project does not reference.
/// Returns the number of images removed.
pub async fn cleanup_orphans(state: &AppState) -> Result<usize> {
    let referenced: HashSet<ImageId> = match state.store.load_project().await? {
        Some(project) => project.local_image_ids().into_iter().collect(),
        None => HashSet::new(),
    };

    let mut removed = 0usize;
    for id in state.store.list_image_ids().await? {
        if referenced.contains(&id) {
            continue;
        }
        if state.store.delete_image(&id).await? {
            tracing::debug!(image_id = %id, "orphan image removed");
            removed += 1;
        }
    }

    info!(removed, kept = referenced.len(), "orphan cleanup finished");
    Ok(removed)
}

/// Outcome of [`delete_project`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedProject {
    pub existed: bool,
    pub images_removed: usize,
}

/// Delete the project record, then every image it referenced, and reset
/// the session to an empty project.
///
/// The record goes first so a failure part way leaves orphans rather than
/// dangling references.
pub async fn delete_project(state: &mut AppState) -> Result<DeletedProject> {
    let stored = state.store.load_project().await?;
    let existed = state.store.delete_project().await?;

    let mut ids: Vec<ImageId> = stored.map(|p| p.local_image_ids()).unwrap_or_default();
    for id in state.session.project.local_image_ids() {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    let mut images_removed = 0usize;
    for id in &ids {
        match state.store.delete_image(id).await {
            Ok(true) => images_removed += 1,
            Ok(false) => {}
            Err(e) => warn!(image_id = %id, error = %e, "could not remove image, left as orphan"),
        }
    }

    state.session = EditorSession::empty();
    info!(existed, images_removed, "project deleted");
    Ok(DeletedProject {
        existed,
        images_removed,
    })
}

#[cfg(test)]
mod tests {
    use rehab_store::ProjectRepository;

    use super::*;
    use crate::commands::images::add_image;
    use crate::commands::project::{add_card, remove_card};
    use crate::state::in_memory_state;

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];

    #[tokio::test]
    async fn cleanup_keeps_referenced_images() {
        let (mut state, store) = in_memory_state().await;
        let kept = add_image(&state, PNG.to_vec(), "kept.png").await.unwrap();
        let dropped = add_image(&state, PNG.to_vec(), "dropped.png").await.unwrap();
        add_card(&mut state, "残す", Some(kept.id.as_str())).await.unwrap();
        let card = add_card(&mut state, "消す", Some(dropped.id.as_str()))
            .await
            .unwrap();
        remove_card(&mut state, &card).await.unwrap();

        assert_eq!(cleanup_orphans(&state).await.unwrap(), 1);
        assert_eq!(store.list_image_ids().await.unwrap(), vec![kept.id]);
        assert_eq!(cleanup_orphans(&state).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn cleanup_without_project_removes_everything() {
        let (state, store) = in_memory_state().await;
        add_image(&state, PNG.to_vec(), "a.png").await.unwrap();
        assert_eq!(cleanup_orphans(&state).await.unwrap(), 1);
        assert!(store.list_image_ids().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_cascades_to_referenced_images() {
        let (mut state, store) = in_memory_state().await;
        let used = add_image(&state, PNG.to_vec(), "used.png").await.unwrap();
        let unrelated = add_image(&state, PNG.to_vec(), "other.png").await.unwrap();
        add_card(&mut state, "カード", Some(used.id.as_str())).await.unwrap();

        let deleted = delete_project(&mut state).await.unwrap();
        assert_eq!(
            deleted,
            DeletedProject {
                existed: true,
                images_removed: 1
            }
        );
        assert!(store.load_project().await.unwrap().is_none());
        assert_eq!(store.list_image_ids().await.unwrap(), vec![unrelated.id]);
        assert!(state.session.project.items.is_empty());

        let again = delete_project(&mut state).await.unwrap();
        assert!(!again.existed);
    }
}
