use serde_json::Value;

use super::{flag, list, text};
use crate::models::PropertyDetails;

/// Room type, host flags and layout items of the listing.
pub fn extract_property_details(payload: &Value) -> PropertyDetails {
    let layout = list(
        payload.get("sub_description").and_then(|s| s.get("items")),
        "sub_description.items",
    )
    .iter()
    .filter_map(layout_item)
    .collect();

    PropertyDetails {
        room_type: payload.get("room_type").and_then(text).unwrap_or_default(),
        is_guest_favorite: flag(payload, "is_guest_favorite"),
        is_super_host: flag(payload, "is_super_host"),
        layout,
    }
}

fn layout_item(item: &Value) -> Option<String> {
    let label = match item {
        Value::Object(_) => item.get("title").and_then(text),
        other => text(other),
    };
    label.filter(|l| !l.is_empty())
}
