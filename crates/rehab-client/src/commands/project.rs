//! Project-level commands: inspect the sheet, start over, add and remove
//! cards.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use rehab_shared::constants::{MAX_ITEM_COUNT, TEXT_LIMITS};
use rehab_shared::samples::{find_sample, is_known_sample};
use rehab_shared::sanitize::sanitize_and_truncate;
use rehab_shared::{ExerciseItem, ImageRef, Project};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::state::AppState;

/// What `show` prints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub title: String,
    pub updated_at: DateTime<Utc>,
    pub columns: usize,
    pub unsaved: bool,
    pub cards: Vec<CardSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSummary {
    pub id: String,
    pub order: i64,
    pub title: String,
    pub image: ImageSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ImageSummary {
    Local {
        id: String,
    },
    /// `location` is the asset under the configured sample base; unknown
    /// sample ids have none.
    Sample {
        id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        location: Option<String>,
    },
    None,
}

impl ImageSummary {
    fn describe(source: &ImageRef, config: &ClientConfig) -> Self {
        match source {
            ImageRef::Local(id) => ImageSummary::Local { id: id.to_string() },
            ImageRef::Sample(id) => ImageSummary::Sample {
                id: id.clone(),
                location: find_sample(id).map(|sample| config.sample_location(sample.asset)),
            },
            ImageRef::None => ImageSummary::None,
        }
    }
}

pub fn show(state: &AppState) -> ProjectSummary {
    let project = &state.session.project;
    let mut cards: Vec<CardSummary> = project
        .items
        .iter()
        .map(|item| CardSummary {
            id: item.id.clone(),
            order: item.order,
            title: item.title.clone(),
            image: ImageSummary::describe(&item.image_source, &state.config),
        })
        .collect();
    cards.sort_by_key(|c| c.order);
    ProjectSummary {
        title: project.meta.title.clone(),
        updated_at: project.meta.updated_at,
        columns: project.settings.layout_type.columns(),
        unsaved: state.session.dirty,
        cards,
    }
}

/// Replace the session with a fresh project and save it. The caller is
/// responsible for asking before discarding existing cards.
pub async fn new_project(state: &mut AppState, title: &str) -> Result<DateTime<Utc>> {
    let title = sanitize_and_truncate(title, TEXT_LIMITS.project_title);
    state.session.replace(Project::new(title));
    let stamp = state.save().await?;
    info!(title = %state.session.project.meta.title, "new project created");
    Ok(stamp)
}

/// Append a card and save. `image` is a stored image id or a sample id.
pub async fn add_card(state: &mut AppState, title: &str, image: Option<&str>) -> Result<String> {
    if state.session.project.items.len() >= MAX_ITEM_COUNT {
        return Err(ClientError::ItemLimit {
            max: MAX_ITEM_COUNT,
        });
    }

    let image_source = match image {
        Some(raw) => resolve_card_image(state, raw).await?,
        None => ImageRef::None,
    };

    let title = sanitize_and_truncate(title, TEXT_LIMITS.title);
    let item = ExerciseItem::new(state.session.project.next_order(), title, image_source);
    let item_id = item.id.clone();
    state.session.edit(|p| p.items.push(item));
    state.save().await?;

    info!(item_id = %item_id, cards = state.session.project.items.len(), "card added");
    Ok(item_id)
}

/// Remove a card by id and save. The card's image stays in the store.
pub async fn remove_card(state: &mut AppState, item_id: &str) -> Result<()> {
    if !state.session.project.items.iter().any(|i| i.id == item_id) {
        return Err(ClientError::CardNotFound(item_id.to_string()));
    }
    state.session.edit(|p| p.items.retain(|i| i.id != item_id));
    state.save().await?;
    info!(item_id, "card removed");
    Ok(())
}

/// Cards may only point at images that exist.
async fn resolve_card_image(state: &AppState, raw: &str) -> Result<ImageRef> {
    let source = ImageRef::parse(raw);
    let exists = match &source {
        ImageRef::Sample(id) => is_known_sample(id),
        ImageRef::Local(id) => state.store.get_image(id).await?.is_some(),
        ImageRef::None => true,
    };
    if exists {
        Ok(source)
    } else {
        Err(ClientError::ImageNotFound(raw.to_string()))
    }
}
