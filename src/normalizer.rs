//! Composes the extractors into one [`ListingRecord`].

use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::error::NormalizeError;
use crate::extractors::{
    average_rating, extract_amenities, extract_highlights, extract_house_rules, extract_images,
    extract_location_info, extract_price, extract_property_details, extract_reviews_summary, flag,
};
use crate::models::{ListingId, ListingRecord, RawPayload};

/// Turns raw payloads into listing records
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    debug_dump_dir: Option<PathBuf>,
}

impl Normalizer {
    /// Normalizer that never writes debug artifacts
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizer that dumps each raw payload to `<dir>/listing_<id>.json`
    pub fn with_debug_dump(dir: impl Into<PathBuf>) -> Self {
        Self {
            debug_dump_dir: Some(dir.into()),
        }
    }

    pub fn from_dump_dir(dir: Option<PathBuf>) -> Self {
        Self { debug_dump_dir: dir }
    }

    /// Build the record for one listing. The arguments are checked before
    /// any extraction happens.
    pub fn normalize(
        &self,
        payload: &RawPayload,
        listing_id: ListingId,
        url: &str,
        stay_nights: i64,
    ) -> Result<ListingRecord, NormalizeError> {
        check_input(payload, listing_id, url, stay_nights)?;

        if let Some(dir) = &self.debug_dump_dir {
            write_debug_dump(dir, payload, listing_id);
        }

        build_record(payload, listing_id, url.trim(), stay_nights).map_err(|e| {
            error!(listing_id, error = %e, "failed to process listing data");
            e
        })
    }
}

fn check_input(
    payload: &RawPayload,
    listing_id: ListingId,
    url: &str,
    stay_nights: i64,
) -> Result<(), NormalizeError> {
    let populated = payload.as_object().is_some_and(|map| !map.is_empty());
    if !populated {
        return Err(NormalizeError::InvalidInput(
            "payload must be a non-empty mapping".into(),
        ));
    }
    if listing_id <= 0 {
        return Err(NormalizeError::InvalidInput(
            "listing ID must be a positive integer".into(),
        ));
    }
    if url.trim().is_empty() {
        return Err(NormalizeError::InvalidInput("URL must be non-empty".into()));
    }
    if stay_nights <= 0 {
        return Err(NormalizeError::InvalidInput(
            "stay length must be a positive integer".into(),
        ));
    }
    Ok(())
}

fn build_record(
    payload: &Value,
    listing_id: ListingId,
    url: &str,
    stay_nights: i64,
) -> Result<ListingRecord, NormalizeError> {
    let mut record = ListingRecord::new(listing_id, url, stay_nights, extract_price(payload));

    record.coordinates = coordinates(payload)
        .map_err(|source| NormalizeError::Extraction { listing_id, source })?;
    record.super_host = flag(payload, "is_super_host");
    record.is_guest_favorite = flag(payload, "is_guest_favorite");
    record.capacity = capacity(payload.get("person_capacity"));
    record.average_rating = average_rating(payload.get("rating"));

    let house_rules = extract_house_rules(payload.get("house_rules"));
    record.check_in_out = house_rules.check_in_out.clone();
    record.house_rules = house_rules;

    record.amenities = extract_amenities(payload.get("amenities"));
    record.images = extract_images(payload.get("images"));

    let location = extract_location_info(payload.get("location_descriptions"));
    record.location = location.location;
    record.getting_around = location.getting_around;

    record.highlights = extract_highlights(payload.get("highlights"));
    record.reviews_summary = extract_reviews_summary(payload.get("reviews"));
    record.property_details = extract_property_details(payload);

    debug!(
        listing_id,
        cost = record.cost,
        images = record.images.len(),
        amenities = record.amenities.len(),
        "normalized listing"
    );
    Ok(record)
}

fn coordinates(payload: &Value) -> Result<String, serde_json::Error> {
    match payload.get("coordinates") {
        Some(coords @ Value::Object(_)) => serde_json::to_string(coords),
        None | Some(Value::Null) => Ok("{}".to_string()),
        Some(_) => {
            warn!("invalid coordinates data");
            Ok("{}".to_string())
        }
    }
}

fn capacity(value: Option<&Value>) -> u32 {
    let parsed = match value {
        None | Some(Value::Null) => return 0,
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.trunc() as u64)),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        Some(_) => None,
    };
    match parsed.and_then(|c| u32::try_from(c).ok()) {
        Some(capacity) => capacity,
        None => {
            warn!(capacity = ?value, "invalid person capacity, defaulting to 0");
            0
        }
    }
}

/// Best effort: a failed dump is logged and otherwise ignored.
fn write_debug_dump(dir: &Path, payload: &Value, listing_id: ListingId) {
    let path = dir.join(format!("listing_{listing_id}.json"));
    let written = serde_json::to_string_pretty(payload)
        .map_err(|e| e.to_string())
        .and_then(|json| std::fs::write(&path, json).map_err(|e| e.to_string()));

    match written {
        Ok(()) => info!(listing_id, path = %path.display(), "raw data written"),
        Err(e) => warn!(listing_id, path = %path.display(), error = %e, "failed to write raw data"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const URL: &str = "https://www.airbnb.com/rooms/12345?check_in=2024-01-15&check_out=2024-01-20";

    fn sample_payload() -> Value {
        json!({
            "price": {"main": {"discountedPrice": "$80", "price": "$100"}},
            "coordinates": {"latitude": 35.66, "longitude": 139.70},
            "is_super_host": true,
            "is_guest_favorite": true,
            "person_capacity": 4,
            "room_type": "Entire rental unit",
            "rating": {"accuracy": 4.9, "cleanliness": 4.7, "review_count": 88},
            "house_rules": {
                "additional": "No parties\nNo smoking",
                "general": [
                    {"title": "Checking in and out", "values": [{"title": "Check-in after 3:00 pm"}]},
                    {"title": "During your stay", "values": [{"title": "No pets"}]}
                ]
            },
            "amenities": [{"title": "Kitchen", "values": [{"title": "Kettle"}]}],
            "images": [{"url": "https://img/1.jpg"}, {"url": "https://img/2.jpg"}],
            "location_descriptions": [
                {"title": "Shibuya, Tokyo, Japan", "content": "Lively"},
                {"title": "Getting around", "content": "Metro<br />Bus"}
            ],
            "highlights": [{"title": "Great check-in experience"}],
            "reviews": [{"comments": "Great", "rating": 5, "language": "en", "localizedDate": "May 2024"}],
            "sub_description": {"items": ["4 guests", "1 bedroom"]}
        })
    }

    #[test]
    fn assembles_full_record() {
        let record = Normalizer::new()
            .normalize(&sample_payload(), 12345, URL, 5)
            .unwrap();

        assert_eq!(record.id, 12345);
        assert_eq!(record.url, URL);
        assert_eq!(record.duration, 5);
        assert_eq!(record.cost, 80.0);
        assert_eq!(record.coordinates, r#"{"latitude":35.66,"longitude":139.7}"#);
        assert!(record.super_host);
        assert!(record.is_guest_favorite);
        assert_eq!(record.capacity, 4);
        assert_eq!(record.average_rating, 4.8);
        assert_eq!(record.check_in_out, vec!["Check-in after 3:00 pm"]);
        assert_eq!(record.house_rules.check_in_out, record.check_in_out);
        assert_eq!(record.house_rules.additional_rules, vec!["No parties", "No smoking"]);
        assert_eq!(record.amenities.get("Kitchen").unwrap(), &["Kettle".to_string()]);
        assert_eq!(record.cover(), "https://img/1.jpg");
        assert_eq!(record.location, "Shibuya, Tokyo, Japan");
        assert_eq!(record.getting_around, "Metro\nBus");
        assert_eq!(record.highlights, vec!["Great check-in experience"]);
        assert_eq!(record.reviews_summary.len(), 1);
        assert_eq!(record.property_details.room_type, "Entire rental unit");
        assert_eq!(record.property_details.layout, vec!["4 guests", "1 bedroom"]);
        assert_eq!(record.notes, None);
    }

    #[test]
    fn rejects_insufficient_input() {
        let normalizer = Normalizer::new();
        let payload = sample_payload();

        for (payload, id, url, nights) in [
            (json!({}), 1, URL, 1),
            (json!(null), 1, URL, 1),
            (json!([1, 2]), 1, URL, 1),
            (payload.clone(), 0, URL, 1),
            (payload.clone(), -4, URL, 1),
            (payload.clone(), 1, "   ", 1),
            (payload.clone(), 1, URL, 0),
        ] {
            assert!(matches!(
                normalizer.normalize(&payload, id, url, nights),
                Err(NormalizeError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn damaged_sections_degrade_to_defaults() {
        let payload = json!({
            "price": "n/a",
            "coordinates": [1, 2],
            "person_capacity": "lots",
            "rating": "great",
            "house_rules": 3,
            "amenities": {"Kitchen": []},
            "images": "https://img/1.jpg",
            "location_descriptions": null
        });

        let record = Normalizer::new().normalize(&payload, 9, URL, 2).unwrap();

        assert_eq!(record, ListingRecord::new(9, URL, 2, 0.0));
    }

    #[test]
    fn writes_debug_dump_when_configured() {
        let dir = tempfile::TempDir::new().unwrap();
        let normalizer = Normalizer::with_debug_dump(dir.path());

        normalizer.normalize(&sample_payload(), 12345, URL, 5).unwrap();

        let dumped = std::fs::read_to_string(dir.path().join("listing_12345.json")).unwrap();
        let value: Value = serde_json::from_str(&dumped).unwrap();
        assert_eq!(value, sample_payload());
    }

    #[test]
    fn unwritable_dump_dir_does_not_fail() {
        let dir = tempfile::TempDir::new().unwrap();
        let normalizer = Normalizer::with_debug_dump(dir.path().join("missing/nested"));
        assert!(normalizer.normalize(&sample_payload(), 1, URL, 1).is_ok());
    }
}
