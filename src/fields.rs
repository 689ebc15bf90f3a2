//! Selectable listing fields and read-time access to them.

use serde_json::Value;
use tracing::warn;

use crate::error::FieldError;
use crate::models::ListingRecord;

/// Human-readable label to logical record key, in display order
pub const FIELD_CATALOG: &[(&str, &str)] = &[
    ("ID", "id"),
    ("Rating", "average_rating"),
    ("URL", "url"),
    ("Duration", "duration"),
    ("Location", "location"),
    ("Coordinates", "coordinates"),
    ("Getting Around", "getting_around"),
    ("Check In/ Out Timing", "check_in_out"),
    ("Layout", "property_details.layout"),
    ("Capacity", "capacity"),
    ("Cost", "cost"),
    ("Super Host", "super_host"),
    ("Guest Favorite", "is_guest_favorite"),
    ("Amenities", "amenities"),
    ("Highlights", "highlights"),
    ("Reviews Summary", "reviews_summary"),
    ("House Rules", "house_rules"),
    ("Property Details", "property_details"),
    ("Notes", "notes"),
    ("Images", "images"),
    ("Cover", "cover"),
];

/// Labels accepted by [`field_value`].
pub fn available_fields() -> Vec<&'static str> {
    FIELD_CATALOG.iter().map(|(label, _)| *label).collect()
}

/// Logical record key behind a label.
pub fn field_key(label: &str) -> Option<&'static str> {
    FIELD_CATALOG
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, key)| *key)
}

/// Value of the field called `label` on `listing`.
///
/// `Cost` is the stored resolved cost and `Cover` the first image (or `""`).
/// Any other field is read from the record by its dotted key, `""` when absent.
pub fn field_value(label: &str, listing: &ListingRecord) -> Result<Value, FieldError> {
    let key = field_key(label).ok_or_else(|| FieldError::UnknownField(label.to_string()))?;

    let value = match key {
        "cost" => Value::from(listing.cost),
        "cover" => Value::from(listing.cover()),
        _ => match serde_json::to_value(listing) {
            Ok(mut doc) => key
                .split('.')
                .try_fold(&mut doc, |node, part| node.get_mut(part))
                .map(Value::take)
                .unwrap_or_else(|| Value::from("")),
            Err(e) => {
                warn!(listing_id = listing.id, field = label, error = %e, "listing is not serializable");
                Value::from("")
            }
        },
    };
    Ok(value)
}
