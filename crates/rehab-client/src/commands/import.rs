//! Import a project file or apply a template.
//!
//! Both go through the same two phases: staging produces a
//! [`PendingImport`] without touching anything, and [`apply`] runs the
//! reconciler once the caller has dealt with confirmation.

use std::path::Path;

use tracing::info;

use rehab_archive::{import_project, ImportResult};

use crate::error::Result;
use crate::reconciler::{AppliedImport, ConfirmedImport, PendingImport, Reconciler};
use crate::state::AppState;

/// Parse and validate file bytes.
pub fn stage_file(state: &AppState, file_name: &str, bytes: &[u8]) -> Result<PendingImport> {
    let result = import_project(file_name, bytes)?;
    info!(
        file_name,
        items = result.project.items.len(),
        images = result.images.len(),
        "import staged"
    );
    Ok(Reconciler::stage(result, &state.session))
}

pub async fn stage_path(state: &AppState, path: &Path) -> Result<PendingImport> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    stage_file(state, file_name, &bytes)
}

/// Load a template as an import without images.
pub async fn stage_template(state: &AppState, template_id: &str) -> Result<PendingImport> {
    let project = state.templates.load(template_id).await?;
    Ok(Reconciler::stage(
        ImportResult::without_images(project),
        &state.session,
    ))
}

/// Persist a confirmed import and make it the session project.
pub async fn apply(state: &mut AppState, confirmed: ConfirmedImport) -> Result<AppliedImport> {
    let reconciler = Reconciler::new(state.store.clone());
    let applied = reconciler.apply(confirmed, &mut state.session).await?;
    Ok(applied)
}
