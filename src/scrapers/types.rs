use serde::{Deserialize, Serialize};

use crate::models::{ListingId, StayQuery};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parameters passed to a details source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DetailsRequest {
    /// Listing (room) id
    pub room_id: ListingId,
    /// Check-in date, `YYYY-MM-DD`
    pub check_in: String,
    /// Check-out date, `YYYY-MM-DD`
    pub check_out: String,
    /// Number of adult guests
    pub adults: u32,
    /// Currency the prices should be quoted in
    pub currency: String,
}

impl DetailsRequest {
    pub fn from_query(query: &StayQuery, currency: impl Into<String>) -> Self {
        Self {
            room_id: query.listing_id,
            check_in: query.check_in.format(DATE_FORMAT).to_string(),
            check_out: query.check_out.format(DATE_FORMAT).to_string(),
            adults: query.adults,
            currency: currency.into(),
        }
    }

    /// Query string pairs understood by the details service
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("room_id", self.room_id.to_string()),
            ("check_in", self.check_in.clone()),
            ("check_out", self.check_out.clone()),
            ("adults", self.adults.to_string()),
            ("currency", self.currency.clone()),
        ]
    }
}
