//! Trust boundary for project documents that come from outside the process:
//! imported files, archives and template assets.
//!
//! [`validate`] either rejects the input with a classified
//! [`ValidationError`] or returns a [`Project`] whose free-text fields are
//! sanitized and cut to their display limits.

use std::collections::HashSet;

use chrono::{DateTime, Datelike, Utc};
use serde_json::Value;

use crate::constants::{
    MAX_ITEM_COUNT, MAX_ITEM_ID_LEN, MAX_PRECAUTIONS_COUNT, MAX_TIMESTAMP_YEAR, TEXT_LIMITS,
};
use crate::error::ValidationError;
use crate::sanitize::{sanitize, sanitize_and_truncate};
use crate::types::{ExerciseItem, Project, ProjectMeta};

/// Validate and normalize an untrusted project document.
pub fn validate(raw: Value) -> Result<Project, ValidationError> {
    check_sections(&raw)?;

    let item_count = raw
        .get("items")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    if item_count > MAX_ITEM_COUNT {
        return Err(ValidationError::TooManyItems {
            count: item_count,
            max: MAX_ITEM_COUNT,
        });
    }

    let mut project: Project = serde_json::from_value(raw)
        .map_err(|e| ValidationError::Structure(e.to_string()))?;

    check_timestamps(&project.meta)?;
    check_items(&project.items)?;
    normalize_text(&mut project);
    Ok(project)
}

/// Parse then [`validate`]. Empty or non-JSON input is a structural error.
pub fn validate_str(text: &str) -> Result<Project, ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::Structure("empty document".to_string()));
    }
    let raw: Value =
        serde_json::from_str(text).map_err(|e| ValidationError::Structure(e.to_string()))?;
    validate(raw)
}

/// Same as [`validate_str`] for raw bytes; invalid UTF-8 is structural.
pub fn validate_slice(bytes: &[u8]) -> Result<Project, ValidationError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| ValidationError::Structure(format!("invalid UTF-8: {e}")))?;
    validate_str(text)
}

fn check_sections(raw: &Value) -> Result<(), ValidationError> {
    let Some(obj) = raw.as_object() else {
        return Err(ValidationError::Structure(
            "project document must be a JSON object".to_string(),
        ));
    };
    if !obj.get("meta").is_some_and(Value::is_object) {
        return Err(ValidationError::MissingProjectData("meta"));
    }
    if !obj.get("settings").is_some_and(Value::is_object) {
        return Err(ValidationError::MissingProjectData("settings"));
    }
    if !obj.get("items").is_some_and(Value::is_array) {
        return Err(ValidationError::MissingProjectData("items"));
    }
    Ok(())
}

fn check_timestamps(meta: &ProjectMeta) -> Result<(), ValidationError> {
    let in_range = |t: &DateTime<Utc>| (1..=MAX_TIMESTAMP_YEAR).contains(&t.year());
    if !in_range(&meta.created_at) || !in_range(&meta.updated_at) {
        return Err(ValidationError::Structure(format!(
            "timestamp outside years 1..={MAX_TIMESTAMP_YEAR}"
        )));
    }
    Ok(())
}

fn check_id(id: &str, what: &str) -> Result<(), ValidationError> {
    if id.is_empty() {
        return Err(ValidationError::Structure(format!("{what} id is empty")));
    }
    if id.chars().count() > MAX_ITEM_ID_LEN {
        return Err(ValidationError::Structure(format!(
            "{what} id longer than {MAX_ITEM_ID_LEN} characters"
        )));
    }
    if id.chars().any(char::is_control) {
        return Err(ValidationError::Structure(format!(
            "{what} id contains control characters"
        )));
    }
    Ok(())
}

fn check_items(items: &[ExerciseItem]) -> Result<(), ValidationError> {
    let mut ids = HashSet::with_capacity(items.len());
    let mut orders = HashSet::with_capacity(items.len());
    for item in items {
        check_id(&item.id, "item")?;
        if !ids.insert(item.id.as_str()) {
            return Err(ValidationError::Structure(format!(
                "duplicate item id {:?}",
                item.id
            )));
        }
        if !orders.insert(item.order) {
            return Err(ValidationError::Structure(format!(
                "duplicate item order {}",
                item.order
            )));
        }
        for precaution in item.precautions.iter().flatten() {
            check_id(&precaution.id, "precaution")?;
        }
    }
    Ok(())
}

fn normalize_text(project: &mut Project) {
    let meta = &mut project.meta;
    meta.title = sanitize_and_truncate(&meta.title, TEXT_LIMITS.project_title);
    meta.author = meta.author.as_deref().map(sanitize);
    project.settings.theme_color = sanitize(&project.settings.theme_color);

    for item in &mut project.items {
        item.title = sanitize_and_truncate(&item.title, TEXT_LIMITS.title);
        item.description = sanitize_and_truncate(&item.description, TEXT_LIMITS.description);
        if let Some(dosages) = item.dosages.as_mut() {
            dosages.reps = sanitize_and_truncate(&dosages.reps, TEXT_LIMITS.reps);
            dosages.sets = sanitize_and_truncate(&dosages.sets, TEXT_LIMITS.sets);
            dosages.frequency = sanitize_and_truncate(&dosages.frequency, TEXT_LIMITS.frequency);
        }
        if let Some(precautions) = item.precautions.as_mut() {
            precautions.truncate(MAX_PRECAUTIONS_COUNT);
            for precaution in precautions.iter_mut() {
                precaution.value = sanitize_and_truncate(&precaution.value, TEXT_LIMITS.precaution);
            }
        }
    }
}
