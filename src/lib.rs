//! Normalize scraped short-term rental listings into flat, validated records
//! and keep them in a SQLite document store.

pub mod config;
pub mod error;
pub mod extractors;
pub mod fields;
pub mod models;
pub mod normalizer;
pub mod scrapers;
pub mod service;
pub mod store;
pub mod url_parser;
pub mod validation;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use models::{ListingRecord, RawPayload, StayQuery};
pub use normalizer::Normalizer;
pub use service::ListingService;
pub use store::{ListingStore, StoreError};
