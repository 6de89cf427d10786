//! Bare JSON codec. Carries no image payloads, so local references are
//! dropped on the way out and on the way in.

use std::collections::HashMap;

use rehab_shared::constants::{MAX_IMPORT_JSON_SIZE, SCHEMA_VERSION};
use rehab_shared::{validate_slice, ImageRef, Project};

use crate::error::{ExportError, ImportError};
use crate::ImportResult;

/// Pretty-printed project document. Sample references survive, local ones
/// become empty.
pub fn export_to_json(project: &Project) -> Result<String, ExportError> {
    let mut document = project.clone();
    document.meta.schema_version = SCHEMA_VERSION.to_string();
    clear_local_refs(&mut document);
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Parse and validate a bare JSON project file.
pub fn import_from_json(bytes: &[u8]) -> Result<ImportResult, ImportError> {
    if bytes.len() > MAX_IMPORT_JSON_SIZE {
        return Err(ImportError::FileTooLarge {
            size: bytes.len(),
            max: MAX_IMPORT_JSON_SIZE,
        });
    }

    let mut project = validate_slice(bytes)?;
    project.meta.schema_version = SCHEMA_VERSION.to_string();
    let cleared = clear_local_refs(&mut project);

    tracing::info!(
        items = project.items.len(),
        cleared_refs = cleared,
        "JSON project imported"
    );
    Ok(ImportResult {
        project,
        images: HashMap::new(),
    })
}

fn clear_local_refs(project: &mut Project) -> usize {
    let mut cleared = 0;
    for item in &mut project.items {
        if matches!(item.image_source, ImageRef::Local(_)) {
            item.image_source = ImageRef::None;
            cleared += 1;
        }
    }
    cleared
}

#[cfg(test)]
mod tests {
    use rehab_shared::{ExerciseItem, ImageId, ValidationKind};

    use super::*;

    #[test]
    fn export_keeps_samples_and_drops_local_images() {
        let mut project = Project::new("腰痛体操");
        project.items = vec![
            ExerciseItem::new(0, "膝抱え", ImageRef::Sample("sample_lying_03".into())),
            ExerciseItem::new(1, "骨盤傾斜", ImageRef::Local(ImageId::from("img-1"))),
        ];
        let json = export_to_json(&project).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(doc["items"][0]["imageSource"], "sample_lying_03");
        assert_eq!(doc["items"][1]["imageSource"], "");
        assert_eq!(doc["meta"]["schemaVersion"], SCHEMA_VERSION);
        assert!(json.contains('\n'), "pretty printed");
    }

    #[test]
    fn import_round_trip() {
        let mut project = Project::new("肩こり体操");
        project.items = vec![ExerciseItem::new(
            0,
            "肩回し",
            ImageRef::Sample("sample_sitting_02".into()),
        )];
        let json = export_to_json(&project).unwrap();
        let result = import_from_json(json.as_bytes()).unwrap();
        assert_eq!(result.project.items, project.items);
        assert!(result.images.is_empty());
    }

    #[test]
    fn import_clears_local_refs_from_foreign_files() {
        let mut project = Project::new("p");
        project.items = vec![ExerciseItem::new(0, "x", ImageRef::Local(ImageId::from("abc")))];
        let json = serde_json::to_string(&project).unwrap();
        let result = import_from_json(json.as_bytes()).unwrap();
        assert_eq!(result.project.items[0].image_source, ImageRef::None);
    }

    #[test]
    fn empty_input_is_structural() {
        match import_from_json(b"").unwrap_err() {
            ImportError::Validation(e) => assert_eq!(e.kind(), ValidationKind::Structure),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn oversized_json_is_rejected() {
        let big = vec![b' '; MAX_IMPORT_JSON_SIZE + 1];
        assert!(matches!(
            import_from_json(&big),
            Err(ImportError::FileTooLarge { .. })
        ));
    }
}
