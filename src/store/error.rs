use thiserror::Error;

use crate::models::ListingId;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("listing has no positive id (got {0})")]
    MissingIdentity(ListingId),

    #[error("stored document for listing {id} is corrupt: {source}")]
    CorruptDocument {
        id: ListingId,
        #[source]
        source: serde_json::Error,
    },

    #[error("listing {id} has a non-finite {field}")]
    NonFinite { id: ListingId, field: &'static str },

    #[error("failed to serialize listing {id}: {source}")]
    Serialize {
        id: ListingId,
        #[source]
        source: serde_json::Error,
    },

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
