use serde_json::Value;

use super::{list, text_field};

/// Non-empty highlight titles in payload order.
pub fn extract_highlights(highlights: Option<&Value>) -> Vec<String> {
    list(highlights, "highlights")
        .iter()
        .filter_map(|highlight| text_field(highlight, "title"))
        .collect()
}
