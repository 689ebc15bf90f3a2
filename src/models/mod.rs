use chrono::NaiveDate;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Untyped payload handed over by the details source
pub type RawPayload = serde_json::Value;

/// Numeric identity of a listing
pub type ListingId = i64;

/// Identity and stay window parsed from a listing URL
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StayQuery {
    pub listing_id: ListingId,
    pub stay_nights: i64,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub adults: u32,
}

/// Amenity descriptions grouped by category, in payload order.
///
/// Serialized as a JSON object whose key order follows the insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Amenities(Vec<(String, Vec<String>)>);

impl Amenities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a category. A repeated category replaces the earlier items
    /// but keeps its original position.
    pub fn insert(&mut self, category: String, items: Vec<String>) {
        match self.0.iter_mut().find(|(name, _)| *name == category) {
            Some((_, existing)) => *existing = items,
            None => self.0.push((category, items)),
        }
    }

    pub fn get(&self, category: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, items)| items.as_slice())
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(name, items)| (name.as_str(), items.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Amenities {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (category, items) in &self.0 {
            map.serialize_entry(category, items)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Amenities {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AmenitiesVisitor;

        impl<'de> Visitor<'de> for AmenitiesVisitor {
            type Value = Amenities;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of amenity category to amenity list")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Amenities, A::Error> {
                let mut amenities = Amenities::new();
                while let Some((category, items)) = access.next_entry::<String, Vec<String>>()? {
                    amenities.insert(category, items);
                }
                Ok(amenities)
            }
        }

        deserializer.deserialize_map(AmenitiesVisitor)
    }
}

/// One English review kept in the summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReviewEntry {
    pub comment: String,
    pub rating: i64,
    #[serde(default)]
    pub date: String,
}

/// A titled group of general house rules
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneralRuleGroup {
    pub category: String,
    pub rules: Vec<String>,
}

/// House rules split into their three buckets
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HouseRules {
    #[serde(default)]
    pub additional_rules: Vec<String>,
    #[serde(default)]
    pub general_rules: Vec<GeneralRuleGroup>,
    #[serde(default)]
    pub check_in_out: Vec<String>,
}

/// Room type, host flags and layout of the property
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PropertyDetails {
    #[serde(default)]
    pub room_type: String,
    #[serde(default)]
    pub is_guest_favorite: bool,
    #[serde(default)]
    pub is_super_host: bool,
    #[serde(default)]
    pub layout: Vec<String>,
}

/// Normalized listing, the unit of storage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListingRecord {
    pub id: ListingId,
    pub url: String,
    pub duration: i64,
    pub cost: f64,
    /// Serialized latitude/longitude object, `{}` when unknown
    #[serde(default = "empty_coordinates")]
    pub coordinates: String,
    #[serde(default)]
    pub super_host: bool,
    #[serde(default)]
    pub is_guest_favorite: bool,
    #[serde(default)]
    pub capacity: u32,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub check_in_out: Vec<String>,
    #[serde(default)]
    pub amenities: Amenities,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub getting_around: String,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub reviews_summary: Vec<ReviewEntry>,
    #[serde(default)]
    pub house_rules: HouseRules,
    #[serde(default)]
    pub property_details: PropertyDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ListingRecord {
    /// Minimal record with every optional section at its default
    pub fn new(id: ListingId, url: impl Into<String>, duration: i64, cost: f64) -> Self {
        Self {
            id,
            url: url.into(),
            duration,
            cost,
            coordinates: empty_coordinates(),
            super_host: false,
            is_guest_favorite: false,
            capacity: 0,
            average_rating: 0.0,
            check_in_out: Vec::new(),
            amenities: Amenities::new(),
            images: Vec::new(),
            location: String::new(),
            getting_around: String::new(),
            highlights: Vec::new(),
            reviews_summary: Vec::new(),
            house_rules: HouseRules::default(),
            property_details: PropertyDetails::default(),
            notes: None,
        }
    }

    /// First image, used as the thumbnail
    pub fn cover(&self) -> &str {
        self.images.first().map(String::as_str).unwrap_or("")
    }
}

fn empty_coordinates() -> String {
    "{}".to_string()
}
