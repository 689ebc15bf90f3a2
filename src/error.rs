use std::path::PathBuf;
use thiserror::Error;

use crate::models::ListingId;
pub use crate::store::StoreError;

/// Malformed or inconsistent listing URL
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("invalid listing URL format: {0}")]
    InvalidFormat(String),

    #[error("check-out date {check_out} must be after check-in date {check_in}")]
    InvalidDateOrder { check_in: String, check_out: String },
}

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("invalid normalization input: {0}")]
    InvalidInput(String),

    #[error("failed to extract listing {listing_id}: {source}")]
    Extraction {
        listing_id: ListingId,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("unknown field: {0}")]
    UnknownField(String),
}

/// Errors surfaced by [`crate::service::ListingService`]
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Url(#[from] UrlError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error("processed listing {0} failed validation")]
    InvalidRecord(ListingId),

    #[error("database path {} must name a .db file", .0.display())]
    InvalidDatabasePath(PathBuf),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
