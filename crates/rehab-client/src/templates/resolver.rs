//! Turns a catalog entry into a ready-to-apply [`Project`].

use std::collections::HashMap;
use std::io;
use std::sync::Arc;

use chrono::Utc;
use rehab_shared::constants::SCHEMA_VERSION;
use rehab_shared::samples::is_known_sample;
use rehab_shared::{validate, ImageRef, Project, ValidationError};
use thiserror::Error;
use uuid::Uuid;

use super::catalog::{find_template, TemplateMetadata, TEMPLATES};
use super::source::TemplateSource;

/// Project document of a template.
pub const TEMPLATE_PROJECT_FILE: &str = "project.json";

/// Build-time map from template-relative image paths to sample ids.
pub const TEMPLATE_IMAGE_MAP_FILE: &str = "image-map.json";

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Unknown template: {0}")]
    NotFound(String),

    #[error("Failed to load template {id}: {reason}")]
    Load { id: String, reason: String },

    #[error("Template {id} has invalid data: {source}")]
    InvalidData {
        id: String,
        #[source]
        source: ValidationError,
    },
}

impl TemplateError {
    pub fn user_message(&self) -> &'static str {
        match self {
            TemplateError::NotFound(_) => "テンプレートが見つかりません",
            TemplateError::Load { .. } => "テンプレートの読み込みに失敗しました",
            TemplateError::InvalidData { .. } => "テンプレートのデータが不正です",
        }
    }
}

/// Catalog lookups plus loading through a [`TemplateSource`].
#[derive(Clone)]
pub struct TemplateResolver {
    source: Arc<dyn TemplateSource>,
}

impl TemplateResolver {
    pub fn new(source: Arc<dyn TemplateSource>) -> Self {
        Self { source }
    }

    pub fn list(&self) -> &'static [TemplateMetadata] {
        TEMPLATES
    }

    /// Load, validate and normalize a template.
    ///
    /// Image references resolve only to known sample ids; everything else
    /// becomes empty, so applying a template never needs the image table.
    /// Item and precaution ids are regenerated and both timestamps set to
    /// now.
    pub async fn load(&self, template_id: &str) -> Result<Project, TemplateError> {
        let meta =
            find_template(template_id).ok_or_else(|| TemplateError::NotFound(template_id.to_string()))?;

        let load_err = |reason: String| TemplateError::Load {
            id: meta.id.to_string(),
            reason,
        };

        let raw = self
            .source
            .read_file(meta.path, TEMPLATE_PROJECT_FILE)
            .await
            .map_err(|e| load_err(e.to_string()))?;
        let value: serde_json::Value =
            serde_json::from_slice(&raw).map_err(|e| load_err(e.to_string()))?;

        let mut project = validate(value).map_err(|source| TemplateError::InvalidData {
            id: meta.id.to_string(),
            source,
        })?;

        let image_map = self.image_map(meta).await.map_err(load_err)?;

        let now = Utc::now();
        project.meta.schema_version = SCHEMA_VERSION.to_string();
        project.meta.created_at = now;
        project.meta.updated_at = now;

        let mut unresolved = 0usize;
        for item in &mut project.items {
            item.id = Uuid::new_v4().to_string();
            for precaution in item.precautions.iter_mut().flatten() {
                precaution.id = Uuid::new_v4().to_string();
            }
            let resolved = resolve_image(&item.image_source, &image_map);
            if resolved.is_none() && !item.image_source.is_none() {
                unresolved += 1;
                tracing::warn!(
                    template = meta.id,
                    image = item.image_source.as_str(),
                    "template image not resolvable, clearing"
                );
            }
            item.image_source = resolved;
        }

        tracing::info!(
            template = meta.id,
            items = project.items.len(),
            unresolved,
            "template loaded"
        );
        Ok(project)
    }

    async fn image_map(&self, meta: &TemplateMetadata) -> Result<HashMap<String, String>, String> {
        match self.source.read_file(meta.path, TEMPLATE_IMAGE_MAP_FILE).await {
            Ok(raw) => serde_json::from_slice(&raw).map_err(|e| e.to_string()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.to_string()),
        }
    }
}

fn resolve_image(source: &ImageRef, image_map: &HashMap<String, String>) -> ImageRef {
    match source {
        ImageRef::Sample(id) if is_known_sample(id) => ImageRef::Sample(id.clone()),
        ImageRef::Local(path) => image_map
            .get(path.as_str())
            .filter(|id| is_known_sample(id))
            .map_or(ImageRef::None, |id| ImageRef::Sample(id.clone())),
        _ => ImageRef::None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use async_trait::async_trait;

    use super::*;
    use crate::templates::BundledTemplates;

    /// In-memory source keyed by `path/file`.
    struct MapSource(HashMap<String, Vec<u8>>);

    #[async_trait]
    impl TemplateSource for MapSource {
        async fn read_file(&self, template_path: &str, file: &str) -> io::Result<Vec<u8>> {
            self.0
                .get(&format!("{template_path}/{file}"))
                .cloned()
                .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
        }
    }

    fn resolver_with(files: &[(&str, &str)]) -> TemplateResolver {
        let map = files
            .iter()
            .map(|(k, v)| (k.to_string(), v.as_bytes().to_vec()))
            .collect();
        TemplateResolver::new(Arc::new(MapSource(map)))
    }

    const PROJECT: &str = r##"{
        "meta": { "version": "1.0.0", "createdAt": "2025-01-01T00:00:00Z",
                  "updatedAt": "2025-01-01T00:00:00Z", "title": "嚥下体操", "projectType": "training" },
        "settings": { "layoutType": "grid2", "themeColor": "#3b82f6" },
        "items": [
            { "id": "a", "order": 0, "title": "口唇体操", "imageSource": "sample_sitting_10", "description": "" },
            { "id": "b", "order": 1, "title": "舌体操", "imageSource": "images/tongue.webp", "description": "",
              "precautions": [{ "id": "p", "value": "むせたら中止" }] },
            { "id": "c", "order": 2, "title": "首", "imageSource": "images/unknown.webp", "description": "" },
            { "id": "d", "order": 3, "title": "肩", "imageSource": "sample_nope_99", "description": "" },
            { "id": "e", "order": 4, "title": "発声", "imageSource": "", "description": "" }
        ]
    }"##;

    #[tokio::test]
    async fn every_bundled_template_loads_with_catalog_card_count() {
        let resolver = TemplateResolver::new(Arc::new(BundledTemplates));
        for meta in resolver.list() {
            let project = resolver.load(meta.id).await.unwrap();
            assert_eq!(project.items.len(), meta.card_count, "{}", meta.id);
            for item in &project.items {
                assert!(item.image_source.local_id().is_none(), "{}", meta.id);
            }
        }
    }

    #[tokio::test]
    async fn remaps_images_and_regenerates_ids() {
        let resolver = resolver_with(&[
            ("swallowing/project.json", PROJECT),
            (
                "swallowing/image-map.json",
                r#"{ "images/tongue.webp": "sample_sitting_11" }"#,
            ),
        ]);
        let before = Utc::now();
        let project = resolver.load("swallowing").await.unwrap();

        let sources: Vec<ImageRef> = project.items.iter().map(|i| i.image_source.clone()).collect();
        assert_eq!(
            sources,
            vec![
                ImageRef::Sample("sample_sitting_10".into()),
                ImageRef::Sample("sample_sitting_11".into()),
                ImageRef::None,
                ImageRef::None,
                ImageRef::None,
            ]
        );

        let ids: HashSet<&str> = project.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids.len(), 5);
        assert!(!ids.contains("a"));
        let precaution = &project.items[1].precautions.as_ref().unwrap()[0];
        assert_ne!(precaution.id, "p");
        assert_eq!(precaution.value, "むせたら中止");

        assert!(project.meta.created_at >= before);
        assert_eq!(project.meta.created_at, project.meta.updated_at);
        assert_eq!(project.meta.schema_version, SCHEMA_VERSION);
        assert_eq!(project.settings.theme_color, "#3b82f6");
    }

    #[tokio::test]
    async fn error_classes() {
        let resolver = resolver_with(&[
            ("swallowing/project.json", "{ broken"),
            ("low-back-pain/project.json", r#"{ "meta": {}, "settings": {}, "items": [] }"#),
            ("shoulder-stiffness/project.json", PROJECT),
            ("shoulder-stiffness/image-map.json", "[1, 2]"),
        ]);

        assert!(matches!(
            resolver.load("nope").await,
            Err(TemplateError::NotFound(_))
        ));
        assert!(matches!(
            resolver.load("swallowing").await,
            Err(TemplateError::Load { .. })
        ));
        assert!(matches!(
            resolver.load("full-body-workout").await,
            Err(TemplateError::Load { .. })
        ));
        assert!(matches!(
            resolver.load("low-back-pain").await,
            Err(TemplateError::InvalidData { .. })
        ));
        assert!(matches!(
            resolver.load("shoulder-stiffness").await,
            Err(TemplateError::Load { .. })
        ));
    }
}
