//! Durable listing documents keyed by listing id (SQLite, WAL journaling).

mod error;
mod sqlite;

pub use error::StoreError;
pub use sqlite::ListingStore;
