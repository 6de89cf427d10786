use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::constants::{
    DEFAULT_PROJECT_TITLE, DEFAULT_THEME_COLOR, SAMPLE_IMAGE_ID_PREFIX, SCHEMA_VERSION,
};

// ---------------------------------------------------------------------------
// Image references
// ---------------------------------------------------------------------------

/// Opaque id of an image record in the local store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(String);

impl ImageId {
    /// Fresh, never reused id for a new image record.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for ImageId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ImageId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for ImageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What an item's `imageSource` points at.
///
/// On the wire this is a plain string: `""` is [`ImageRef::None`], a value
/// carrying the sample prefix is [`ImageRef::Sample`], anything else is a
/// [`ImageRef::Local`] reference. Inside an archive `Local` holds the
/// relative entry path instead of a store id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ImageRef {
    Local(ImageId),
    Sample(String),
    #[default]
    None,
}

impl ImageRef {
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            ImageRef::None
        } else if raw.starts_with(SAMPLE_IMAGE_ID_PREFIX) {
            ImageRef::Sample(raw.to_string())
        } else {
            ImageRef::Local(ImageId::from(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ImageRef::Local(id) => id.as_str(),
            ImageRef::Sample(id) => id,
            ImageRef::None => "",
        }
    }

    pub fn local_id(&self) -> Option<&ImageId> {
        match self {
            ImageRef::Local(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, ImageRef::None)
    }
}

impl Serialize for ImageRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ImageRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ImageRef::parse(&raw))
    }
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Training,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutType {
    Grid1,
    #[default]
    Grid2,
    Grid3,
    Grid4,
}

impl LayoutType {
    pub fn columns(self) -> usize {
        match self {
            LayoutType::Grid1 => 1,
            LayoutType::Grid2 => 2,
            LayoutType::Grid3 => 3,
            LayoutType::Grid4 => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMeta {
    /// Files written by the web application call this field `version`.
    #[serde(alias = "version")]
    pub schema_version: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub project_type: ProjectType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    pub layout_type: LayoutType,
    pub theme_color: String,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            layout_type: LayoutType::default(),
            theme_color: DEFAULT_THEME_COLOR.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dosages {
    pub reps: String,
    pub sets: String,
    pub frequency: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Precaution {
    pub id: String,
    pub value: String,
}

/// One exercise card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseItem {
    pub id: String,
    pub order: i64,
    pub title: String,
    pub image_source: ImageRef,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosages: Option<Dosages>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precautions: Option<Vec<Precaution>>,
}

impl ExerciseItem {
    pub fn new(order: i64, title: impl Into<String>, image_source: ImageRef) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            order,
            title: title.into(),
            image_source,
            description: String::new(),
            dosages: None,
            precautions: None,
        }
    }
}

/// The single user-editable document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub meta: ProjectMeta,
    pub settings: ProjectSettings,
    pub items: Vec<ExerciseItem>,
}

impl Project {
    /// Empty project with default settings, stamped with the current time.
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            meta: ProjectMeta {
                schema_version: SCHEMA_VERSION.to_string(),
                created_at: now,
                updated_at: now,
                title: title.into(),
                author: None,
                project_type: ProjectType::Training,
            },
            settings: ProjectSettings::default(),
            items: Vec::new(),
        }
    }

    /// Local image ids in first-reference order, without duplicates.
    pub fn local_image_ids(&self) -> Vec<ImageId> {
        let mut seen = HashSet::new();
        self.items
            .iter()
            .filter_map(|item| item.image_source.local_id())
            .filter(|id| seen.insert((*id).clone()))
            .cloned()
            .collect()
    }

    /// Order value one past the current maximum.
    pub fn next_order(&self) -> i64 {
        self.items.iter().map(|item| item.order).max().map_or(0, |max| max + 1)
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::new(DEFAULT_PROJECT_TITLE)
    }
}
