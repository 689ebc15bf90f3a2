//! Required-field contract for listing documents, plus small input checks.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, warn};

use crate::models::ListingRecord;

/// Default limit applied by [`sanitize_string`]
pub const DEFAULT_MAX_STRING_LEN: usize = 1000;

/// Which fields a document must carry before it may be stored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// `id`, `url` and `cost`
    #[default]
    Standard,
    /// Standard plus a positive `duration`
    Strict,
}

impl ValidationMode {
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            ValidationMode::Standard => &["id", "url", "cost"],
            ValidationMode::Strict => &["id", "url", "cost", "duration"],
        }
    }
}

/// Check a normalized record against the required-field contract.
pub fn validate_listing(record: &ListingRecord, mode: ValidationMode) -> bool {
    match serde_json::to_value(record) {
        Ok(document) => validate_document(&document, mode),
        Err(e) => {
            error!(listing_id = record.id, error = %e, "listing is not serializable");
            false
        }
    }
}

/// Check a JSON listing document. Every violation is logged; none raises.
pub fn validate_document(document: &Value, mode: ValidationMode) -> bool {
    if document.as_object().map_or(true, |map| map.is_empty()) {
        error!("listing data must be a non-empty mapping");
        return false;
    }

    let missing = missing_fields(document, mode.required_fields());
    if !missing.is_empty() {
        error!(?missing, "missing required fields");
        return false;
    }

    let mut valid = true;

    if !is_valid_listing_id(&document["id"]) {
        error!(id = %document["id"], "ID must be a positive integer");
        valid = false;
    }

    let url_ok = document["url"]
        .as_str()
        .is_some_and(|url| !url.trim().is_empty());
    if !url_ok {
        error!("URL must be a non-empty string");
        valid = false;
    }

    let cost_ok = document["cost"].as_f64().is_some_and(|cost| cost >= 0.0);
    if !cost_ok {
        error!(cost = %document["cost"], "cost must be a non-negative number");
        valid = false;
    }

    if mode == ValidationMode::Strict {
        let duration_ok = document["duration"].as_i64().is_some_and(|d| d > 0);
        if !duration_ok {
            error!(duration = %document["duration"], "duration must be a positive integer");
            valid = false;
        }
    }

    valid
}

/// Required keys absent from `document`, in the order they were asked for.
pub fn missing_fields<'a>(document: &Value, required: &[&'a str]) -> Vec<&'a str> {
    required
        .iter()
        .copied()
        .filter(|field| document.get(*field).is_none())
        .collect()
}

/// A listing ID is a JSON integer greater than zero.
pub fn is_valid_listing_id(value: &Value) -> bool {
    value.as_i64().is_some_and(|id| id > 0) || value.as_u64().is_some_and(|id| id > 0)
}

pub fn is_valid_url_format(url: &str) -> bool {
    let url = url.trim();
    !url.is_empty() && (url.starts_with("http://") || url.starts_with("https://"))
}

/// Database files are `.db` files with a non-empty stem.
pub fn is_valid_database_path(path: &str) -> bool {
    let path = path.trim();
    path.ends_with(".db") && path.len() > 3
}

/// Trimmed text of a value, truncated to `max_len` characters.
pub fn sanitize_string(value: &Value, max_len: usize) -> String {
    let text = match value {
        Value::Null => return String::new(),
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    };

    let len = text.chars().count();
    if len > max_len {
        warn!(from = len, to = max_len, "string truncated");
        text.chars().take(max_len).collect()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn accepts_minimal_document() {
        let doc = json!({"id": 12345, "url": "https://www.airbnb.com/rooms/12345", "cost": 0});
        assert!(validate_document(&doc, ValidationMode::Standard));
    }

    #[rstest]
    #[case(json!({}))]
    #[case(json!([1]))]
    #[case(json!({"id": 12345, "url": "https://www.airbnb.com/rooms/12345"}))]
    #[case(json!({"id": 0, "url": "https://www.airbnb.com/rooms/1", "cost": 10}))]
    #[case(json!({"id": "12345", "url": "https://www.airbnb.com/rooms/1", "cost": 10}))]
    #[case(json!({"id": 1.5, "url": "https://www.airbnb.com/rooms/1", "cost": 10}))]
    #[case(json!({"id": 1, "url": "   ", "cost": 10}))]
    #[case(json!({"id": 1, "url": 7, "cost": 10}))]
    #[case(json!({"id": 1, "url": "https://www.airbnb.com/rooms/1", "cost": -1}))]
    #[case(json!({"id": 1, "url": "https://www.airbnb.com/rooms/1", "cost": "100"}))]
    fn rejects_invalid_documents(#[case] doc: Value) {
        assert!(!validate_document(&doc, ValidationMode::Standard));
    }

    #[test]
    fn strict_mode_requires_duration() {
        let doc = json!({"id": 1, "url": "https://www.airbnb.com/rooms/1", "cost": 10});
        assert!(validate_document(&doc, ValidationMode::Standard));
        assert!(!validate_document(&doc, ValidationMode::Strict));

        let with_duration = json!({"id": 1, "url": "https://x", "cost": 10, "duration": 3});
        assert!(validate_document(&with_duration, ValidationMode::Strict));

        let zero = json!({"id": 1, "url": "https://x", "cost": 10, "duration": 0});
        assert!(!validate_document(&zero, ValidationMode::Strict));
    }

    #[test]
    fn typed_records_are_checked() {
        let record = ListingRecord::new(5, "https://www.airbnb.com/rooms/5", 2, 120.0);
        assert!(validate_listing(&record, ValidationMode::Strict));

        let mut negative = record.clone();
        negative.cost = -3.0;
        assert!(!validate_listing(&negative, ValidationMode::Standard));

        let mut nan = record;
        nan.cost = f64::NAN;
        assert!(!validate_listing(&nan, ValidationMode::Standard));
    }

    #[test]
    fn reports_missing_fields_in_order() {
        let doc = json!({"id": 1, "name": "x"});
        assert_eq!(missing_fields(&doc, &["id", "url", "duration"]), vec!["url", "duration"]);
        assert_eq!(missing_fields(&json!({}), &["id", "name"]), vec!["id", "name"]);
        assert!(missing_fields(&doc, &["id", "name"]).is_empty());
    }

    #[rstest]
    #[case(json!(12345), true)]
    #[case(json!(0), false)]
    #[case(json!(-1), false)]
    #[case(json!("12345"), false)]
    #[case(json!(123.45), false)]
    #[case(json!(null), false)]
    fn listing_id_check(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(is_valid_listing_id(&value), expected);
    }

    #[rstest]
    #[case("http://example.com", true)]
    #[case("https://example.com", true)]
    #[case("", false)]
    #[case("   ", false)]
    #[case("example.com", false)]
    fn url_format_check(#[case] url: &str, #[case] expected: bool) {
        assert_eq!(is_valid_url_format(url), expected);
    }

    #[rstest]
    #[case("/path/to/database.db", true)]
    #[case("", false)]
    #[case("/path/to/database", false)]
    #[case("/path/to/database.txt", false)]
    #[case(".db", false)]
    fn database_path_check(#[case] path: &str, #[case] expected: bool) {
        assert_eq!(is_valid_database_path(path), expected);
    }

    #[test]
    fn sanitizes_strings() {
        assert_eq!(sanitize_string(&json!("  Hello World  "), DEFAULT_MAX_STRING_LEN), "Hello World");
        assert_eq!(sanitize_string(&json!(null), DEFAULT_MAX_STRING_LEN), "");
        assert_eq!(sanitize_string(&json!(12345), DEFAULT_MAX_STRING_LEN), "12345");

        let long = "a".repeat(1500);
        let cut = sanitize_string(&json!(long), DEFAULT_MAX_STRING_LEN);
        assert_eq!(cut, "a".repeat(1000));
    }
}
