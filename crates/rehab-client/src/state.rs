//! Application state shared by every command.
//!
//! [`EditorSession`] is the in-memory copy of the project the user is
//! editing. [`AppState`] bundles it with the store handle and the template
//! resolver.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rehab_shared::constants::DEFAULT_PROJECT_TITLE;
use rehab_shared::Project;
use rehab_store::{ProjectRepository, ProjectStore};

use crate::config::ClientConfig;
use crate::error::Result;
use crate::templates::{BundledTemplates, DirTemplates, TemplateResolver, TemplateSource};

/// The live editing session.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorSession {
    pub project: Project,
    /// Edited since the last successful save.
    pub dirty: bool,
}

impl EditorSession {
    /// Session over a project that matches the stored copy.
    pub fn loaded(project: Project) -> Self {
        Self {
            project,
            dirty: false,
        }
    }

    /// Fresh untitled project.
    pub fn empty() -> Self {
        Self::loaded(Project::new(DEFAULT_PROJECT_TITLE))
    }

    /// Whether replacing the project would lose anything the user made.
    pub fn has_unsaved_work(&self) -> bool {
        self.dirty || !self.project.items.is_empty()
    }

    /// Swap in a new project wholesale and return the previous session.
    pub fn replace(&mut self, project: Project) -> EditorSession {
        std::mem::replace(self, Self::loaded(project))
    }

    pub fn restore(&mut self, previous: EditorSession) {
        *self = previous;
    }

    /// Record a successful save.
    pub fn mark_saved(&mut self, updated_at: DateTime<Utc>) {
        self.project.meta.updated_at = updated_at;
        self.dirty = false;
    }

    /// Run an edit against the project and flag the session dirty.
    pub fn edit<T>(&mut self, f: impl FnOnce(&mut Project) -> T) -> T {
        self.dirty = true;
        f(&mut self.project)
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::empty()
    }
}

/// Central application state.
pub struct AppState {
    pub config: ClientConfig,
    pub store: Arc<dyn ProjectRepository>,
    pub templates: TemplateResolver,
    pub session: EditorSession,
}

impl AppState {
    /// Open the configured store and load the stored project, if any.
    pub async fn open(config: ClientConfig) -> Result<Self> {
        let store = ProjectStore::open(&config.data_dir).await?;
        let source: Arc<dyn TemplateSource> = match &config.template_dir {
            Some(dir) => Arc::new(DirTemplates::new(dir.clone())),
            None => Arc::new(BundledTemplates),
        };
        Self::with_parts(config, Arc::new(store), TemplateResolver::new(source)).await
    }

    /// Assemble state from explicit parts and load the stored project.
    pub async fn with_parts(
        config: ClientConfig,
        store: Arc<dyn ProjectRepository>,
        templates: TemplateResolver,
    ) -> Result<Self> {
        let session = match store.load_project().await? {
            Some(project) => {
                tracing::info!(
                    title = %project.meta.title,
                    items = project.items.len(),
                    "loaded stored project"
                );
                EditorSession::loaded(project)
            }
            None => {
                tracing::info!("no stored project, starting empty");
                EditorSession::empty()
            }
        };
        Ok(Self {
            config,
            store,
            templates,
            session,
        })
    }

    /// Persist the session project and clear the dirty flag.
    pub async fn save(&mut self) -> Result<DateTime<Utc>> {
        let stamp = self.store.save_project(&self.session.project).await?;
        self.session.mark_saved(stamp);
        Ok(stamp)
    }
}

/// State over a private in-memory store and the bundled templates. The
/// returned store handle shares the connection.
#[cfg(test)]
pub(crate) async fn in_memory_state() -> (AppState, ProjectStore) {
    let store = ProjectStore::open_in_memory().unwrap();
    let templates = TemplateResolver::new(Arc::new(BundledTemplates));
    let state = AppState::with_parts(ClientConfig::default(), Arc::new(store.clone()), templates)
        .await
        .unwrap();
    (state, store)
}

#[cfg(test)]
mod tests {
    use rehab_shared::{ExerciseItem, ImageRef};

    use super::*;

    #[test]
    fn unsaved_work_detection() {
        let mut session = EditorSession::empty();
        assert!(!session.has_unsaved_work());

        session.edit(|p| p.meta.title = "新しい".into());
        assert!(session.has_unsaved_work());

        session.mark_saved(Utc::now());
        assert!(!session.has_unsaved_work());

        session.project.items.push(ExerciseItem::new(0, "x", ImageRef::None));
        assert!(session.has_unsaved_work(), "cards count as work even when saved");
    }

    #[test]
    fn replace_and_restore() {
        let mut session = EditorSession::empty();
        session.edit(|p| p.meta.title = "前".into());
        let before = session.clone();

        let previous = session.replace(Project::new("後"));
        assert_eq!(session.project.meta.title, "後");
        assert!(!session.dirty);

        session.restore(previous);
        assert_eq!(session, before);
    }
}
