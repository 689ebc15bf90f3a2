use serde_json::Value;
use tracing::warn;

use super::{list, text_field};
use crate::models::Amenities;

/// Group amenity entries by category title.
///
/// Items render as `"<title>"` or `"<title>: (<subtitle>)"`. Items without a
/// title are skipped and categories left empty are dropped.
pub fn extract_amenities(amenities: Option<&Value>) -> Amenities {
    let mut grouped = Amenities::new();

    for entry in list(amenities, "amenities") {
        let (Some(category), Some(values)) = (text_field(entry, "title"), entry.get("values")) else {
            warn!("skipping malformed amenity entry");
            continue;
        };

        let items: Vec<String> = list(Some(values), "amenities.values")
            .iter()
            .filter_map(amenity_label)
            .collect();

        if !items.is_empty() {
            grouped.insert(category, items);
        }
    }

    grouped
}

fn amenity_label(item: &Value) -> Option<String> {
    let title = text_field(item, "title")?;
    Some(match text_field(item, "subtitle") {
        Some(subtitle) => format!("{title}: ({subtitle})"),
        None => title,
    })
}
