//! Merges an externally sourced project (imported file or template) into
//! the live session and the store.
//!
//! The merge runs as ordered steps:
//!
//! 1. **PersistImages**: every carried image is saved under a fresh id and
//!    the items referencing its path are rewritten. A failure deletes the
//!    images this run wrote and aborts with nothing else changed.
//! 2. The session's meta, settings and items are replaced wholesale. This
//!    is an in-memory swap and cannot fail.
//! 3. **PersistProject**: the new project is saved. A failure restores the
//!    previous session.
//!
//! Images belonging to the replaced project are left in the store; the
//! orphan cleanup command removes them.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rehab_archive::ImportResult;
use rehab_shared::{ImageId, ImageRef, Project};
use rehab_store::{ProjectRepository, StoreError};
use thiserror::Error;

use crate::state::EditorSession;

/// Steps of [`Reconciler::apply`] that touch the store. Swapping the
/// session in between them is infallible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStep {
    PersistImages,
    PersistProject,
}

impl std::fmt::Display for ImportStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ImportStep::PersistImages => "persist images",
            ImportStep::PersistProject => "persist project",
        })
    }
}

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("The current project has unsaved work; confirmation required")]
    ConfirmationRequired,

    #[error("Failed to save imported images ({saved} saved before the failure): {source}")]
    PersistImages {
        saved: usize,
        #[source]
        source: StoreError,
    },

    #[error("Failed to save imported project: {0}")]
    PersistProject(#[source] StoreError),
}

impl ReconcileError {
    /// Step the failure happened in, if any.
    pub fn step(&self) -> Option<ImportStep> {
        match self {
            ReconcileError::ConfirmationRequired => None,
            ReconcileError::PersistImages { .. } => Some(ImportStep::PersistImages),
            ReconcileError::PersistProject(_) => Some(ImportStep::PersistProject),
        }
    }
}

/// An import waiting for the user's go-ahead. Dropping it cancels the
/// import; nothing has been written yet.
#[derive(Debug)]
pub struct PendingImport {
    result: ImportResult,
    requires_confirmation: bool,
}

impl PendingImport {
    /// Whether applying would overwrite work in the current session.
    pub fn requires_confirmation(&self) -> bool {
        self.requires_confirmation
    }

    /// The project that would replace the session.
    pub fn project(&self) -> &Project {
        &self.result.project
    }

    pub fn image_count(&self) -> usize {
        self.result.images.len()
    }

    /// The user agreed to overwrite.
    pub fn confirm(self) -> ConfirmedImport {
        ConfirmedImport {
            result: self.result,
        }
    }

    /// Continue without asking, allowed only when nothing would be lost.
    pub fn proceed(self) -> Result<ConfirmedImport, ReconcileError> {
        if self.requires_confirmation {
            return Err(ReconcileError::ConfirmationRequired);
        }
        Ok(self.confirm())
    }
}

/// An import cleared to be applied.
#[derive(Debug)]
pub struct ConfirmedImport {
    result: ImportResult,
}

/// Outcome of a successful [`Reconciler::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedImport {
    pub items: usize,
    pub images: Vec<ImageId>,
    pub updated_at: DateTime<Utc>,
}

pub struct Reconciler {
    store: Arc<dyn ProjectRepository>,
}

impl Reconciler {
    pub fn new(store: Arc<dyn ProjectRepository>) -> Self {
        Self { store }
    }

    pub fn stage(result: ImportResult, session: &EditorSession) -> PendingImport {
        PendingImport {
            requires_confirmation: session.has_unsaved_work(),
            result,
        }
    }

    pub async fn apply(
        &self,
        confirmed: ConfirmedImport,
        session: &mut EditorSession,
    ) -> Result<AppliedImport, ReconcileError> {
        let ImportResult {
            mut project,
            images,
        } = confirmed.result;

        // PersistImages
        let mut paths: Vec<&String> = images.keys().collect();
        paths.sort();
        let mut written: Vec<ImageId> = Vec::with_capacity(paths.len());
        let mut path_to_id: HashMap<&str, ImageId> = HashMap::with_capacity(paths.len());
        for path in paths {
            let id = ImageId::generate();
            let file_name = display_name(path);
            tracing::debug!(%path, image_id = %id, "saving imported image");
            if let Err(source) = self.store.save_image(&id, &images[path], file_name).await {
                tracing::warn!(%path, error = %source, "image save failed, rolling back");
                self.delete_written(&written).await;
                return Err(ReconcileError::PersistImages {
                    saved: written.len(),
                    source,
                });
            }
            written.push(id.clone());
            path_to_id.insert(path.as_str(), id);
        }
        for item in &mut project.items {
            if let ImageRef::Local(path) = &item.image_source {
                let rewritten = path_to_id
                    .get(path.as_str())
                    .map_or(ImageRef::None, |id| ImageRef::Local(id.clone()));
                item.image_source = rewritten;
            }
        }

        // Swap the session in
        let previous = session.replace(project);

        // PersistProject
        match self.store.save_project(&session.project).await {
            Ok(updated_at) => {
                session.mark_saved(updated_at);
                tracing::info!(
                    title = %session.project.meta.title,
                    items = session.project.items.len(),
                    images = written.len(),
                    "import applied"
                );
                Ok(AppliedImport {
                    items: session.project.items.len(),
                    images: written,
                    updated_at,
                })
            }
            Err(e) => {
                tracing::warn!(error = %e, "project save failed, restoring previous session");
                session.restore(previous);
                self.delete_written(&written).await;
                Err(ReconcileError::PersistProject(e))
            }
        }
    }

    /// Best-effort removal of images written by a failed run.
    async fn delete_written(&self, written: &[ImageId]) {
        for id in written {
            if let Err(e) = self.store.delete_image(id).await {
                tracing::warn!(image_id = %id, error = %e, "could not remove image, left as orphan");
            }
        }
    }
}

fn display_name(path: &str) -> Option<&str> {
    Path::new(path).file_stem().and_then(|s| s.to_str())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use rehab_shared::{ExerciseItem, ImageBlob, ImageMime};
    use rehab_store::ProjectStore;

    use super::*;

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];

    /// Store wrapper that fails the n-th image save or every project save.
    struct FlakyStore {
        inner: ProjectStore,
        fail_image_save_at: Option<usize>,
        fail_project_save: bool,
        image_saves: AtomicUsize,
    }

    impl FlakyStore {
        fn new(inner: ProjectStore) -> Self {
            Self {
                inner,
                fail_image_save_at: None,
                fail_project_save: false,
                image_saves: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ProjectRepository for FlakyStore {
        async fn save_project(&self, project: &Project) -> rehab_store::Result<DateTime<Utc>> {
            if self.fail_project_save {
                return Err(StoreError::Task("injected project failure".into()));
            }
            self.inner.save_project(project).await
        }
        async fn load_project(&self) -> rehab_store::Result<Option<Project>> {
            self.inner.load_project().await
        }
        async fn delete_project(&self) -> rehab_store::Result<bool> {
            self.inner.delete_project().await
        }
        async fn save_image(
            &self,
            id: &ImageId,
            blob: &ImageBlob,
            file_name: Option<&str>,
        ) -> rehab_store::Result<()> {
            let n = self.image_saves.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail_image_save_at == Some(n) {
                return Err(StoreError::Task("injected image failure".into()));
            }
            self.inner.save_image(id, blob, file_name).await
        }
        async fn get_image(&self, id: &ImageId) -> rehab_store::Result<Option<ImageBlob>> {
            self.inner.get_image(id).await
        }
        async fn get_images(
            &self,
            ids: &[ImageId],
        ) -> rehab_store::Result<HashMap<ImageId, ImageBlob>> {
            self.inner.get_images(ids).await
        }
        async fn delete_image(&self, id: &ImageId) -> rehab_store::Result<bool> {
            self.inner.delete_image(id).await
        }
        async fn list_image_ids(&self) -> rehab_store::Result<Vec<ImageId>> {
            self.inner.list_image_ids().await
        }
    }

    fn archive_result(image_count: usize) -> ImportResult {
        let mut project = Project::new("インポート");
        let mut images = HashMap::new();
        for i in 0..image_count {
            let path = format!("images/img_{:03}.png", i + 1);
            project.items.push(ExerciseItem::new(
                i as i64,
                format!("カード{i}"),
                ImageRef::Local(ImageId::from(path.as_str())),
            ));
            images.insert(path, ImageBlob::new(PNG.to_vec(), ImageMime::Png));
        }
        ImportResult { project, images }
    }

    async fn stored_project(store: &ProjectStore) -> Project {
        let mut project = Project::new("既存");
        project
            .items
            .push(ExerciseItem::new(0, "既存カード", ImageRef::None));
        store.save_project(&project).await.unwrap();
        store.load_project().await.unwrap().unwrap()
    }

    #[test]
    fn confirmation_gate() {
        let empty = EditorSession::empty();
        let pending = Reconciler::stage(archive_result(0), &empty);
        assert!(!pending.requires_confirmation());
        assert!(pending.proceed().is_ok());

        let mut busy = EditorSession::empty();
        busy.edit(|p| p.items.push(ExerciseItem::new(0, "x", ImageRef::None)));
        let pending = Reconciler::stage(archive_result(0), &busy);
        assert!(pending.requires_confirmation());
        let err = pending.proceed().unwrap_err();
        assert!(matches!(err, ReconcileError::ConfirmationRequired));
        assert_eq!(err.step(), None);
        let pending = Reconciler::stage(archive_result(0), &busy);
        let _confirmed = pending.confirm();
    }

    #[tokio::test]
    async fn apply_persists_images_and_project() {
        let store = ProjectStore::open_in_memory().unwrap();
        let reconciler = Reconciler::new(Arc::new(store.clone()));
        let mut session = EditorSession::empty();

        let pending = Reconciler::stage(archive_result(3), &session);
        let applied = reconciler
            .apply(pending.proceed().unwrap(), &mut session)
            .await
            .unwrap();

        assert_eq!(applied.items, 3);
        assert_eq!(applied.images.len(), 3);
        assert!(!session.dirty);
        assert_eq!(session.project.meta.updated_at, applied.updated_at);

        let stored = store.load_project().await.unwrap().unwrap();
        assert_eq!(stored, session.project);
        for item in &stored.items {
            let id = item.image_source.local_id().expect("rewritten to store id");
            assert!(store.get_image(id).await.unwrap().is_some());
        }
    }

    #[tokio::test]
    async fn image_failure_leaves_previous_project_intact() {
        let store = ProjectStore::open_in_memory().unwrap();
        let previous = stored_project(&store).await;
        let mut session = EditorSession::loaded(previous.clone());

        let mut flaky = FlakyStore::new(store.clone());
        flaky.fail_image_save_at = Some(2);
        let reconciler = Reconciler::new(Arc::new(flaky));

        let pending = Reconciler::stage(archive_result(3), &session);
        let err = reconciler
            .apply(pending.confirm(), &mut session)
            .await
            .unwrap_err();

        assert!(matches!(err, ReconcileError::PersistImages { saved: 1, .. }));
        assert_eq!(err.step(), Some(ImportStep::PersistImages));
        assert_eq!(session.project, previous);
        assert_eq!(store.load_project().await.unwrap(), Some(previous));
        assert!(store.list_image_ids().await.unwrap().is_empty(), "compensated");
    }

    #[tokio::test]
    async fn project_failure_restores_session() {
        let store = ProjectStore::open_in_memory().unwrap();
        let previous = stored_project(&store).await;
        let mut session = EditorSession::loaded(previous.clone());
        session.dirty = true;
        let before = session.clone();

        let mut flaky = FlakyStore::new(store.clone());
        flaky.fail_project_save = true;
        let reconciler = Reconciler::new(Arc::new(flaky));

        let pending = Reconciler::stage(archive_result(2), &session);
        let err = reconciler
            .apply(pending.confirm(), &mut session)
            .await
            .unwrap_err();

        assert_eq!(err.step(), Some(ImportStep::PersistProject));
        assert_eq!(session, before);
        assert_eq!(store.load_project().await.unwrap(), Some(previous));
        assert!(store.list_image_ids().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn previous_images_are_not_deleted() {
        let store = ProjectStore::open_in_memory().unwrap();
        let old = ImageId::generate();
        store
            .save_image(&old, &ImageBlob::new(PNG.to_vec(), ImageMime::Png), None)
            .await
            .unwrap();
        let reconciler = Reconciler::new(Arc::new(store.clone()));
        let mut session = EditorSession::empty();

        let pending = Reconciler::stage(archive_result(1), &session);
        reconciler
            .apply(pending.confirm(), &mut session)
            .await
            .unwrap();

        let ids = store.list_image_ids().await.unwrap();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&old));
    }

    #[test]
    fn display_name_is_file_stem() {
        assert_eq!(display_name("images/img_001.png"), Some("img_001"));
    }
}
