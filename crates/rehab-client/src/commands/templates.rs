use crate::state::AppState;
use crate::templates::TemplateMetadata;

/// Catalog entries in display order.
pub fn list_templates(state: &AppState) -> &'static [TemplateMetadata] {
    state.templates.list()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::in_memory_state;

    #[tokio::test]
    async fn lists_the_static_catalog() {
        let (state, _) = in_memory_state().await;
        let templates = list_templates(&state);
        assert_eq!(templates.len(), 8);
        assert_eq!(templates[0].id, "in-bed-for-stroke");

        let json = serde_json::to_value(templates[3]).unwrap();
        assert_eq!(json["cardCount"], 5);
    }
}
