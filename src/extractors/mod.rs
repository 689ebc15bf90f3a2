//! Pure functions mapping one slice of the raw payload to a normalized value.
//!
//! Every extractor accepts anything: missing keys, wrong types and empty
//! collections yield an empty or zero value and a log event, never an error.

mod amenities;
mod highlights;
mod house_rules;
mod images;
mod location;
mod price;
mod property;
mod rating;
mod reviews;

pub use amenities::extract_amenities;
pub use highlights::extract_highlights;
pub use house_rules::extract_house_rules;
pub use images::extract_images;
pub use location::{clean_html_content, extract_location_info, LocationInfo};
pub use price::{extract_price, numeric_price};
pub use property::extract_property_details;
pub use rating::average_rating;
pub use reviews::{extract_reviews_summary, MAX_REVIEWS};

use serde_json::Value;
use tracing::warn;

/// Trimmed display text of a scalar. Strings are trimmed, numbers are
/// rendered; everything else has no text.
pub(crate) fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Non-empty trimmed text stored under `key` of an object.
pub(crate) fn text_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(text)
        .filter(|s| !s.is_empty())
}

/// The array under a payload section. Absent or null sections are empty;
/// any other shape is logged and treated as empty.
pub(crate) fn list<'a>(value: Option<&'a Value>, section: &str) -> &'a [Value] {
    match value {
        Some(Value::Array(items)) => items,
        None | Some(Value::Null) => &[],
        Some(other) => {
            warn!(section, kind = kind(other), "expected a list, ignoring section");
            &[]
        }
    }
}

/// Boolean flag of the payload; anything but `true` counts as unset.
pub(crate) fn flag(payload: &Value, key: &str) -> bool {
    payload.get(key).and_then(Value::as_bool).unwrap_or(false)
}

pub(crate) fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
