//! End-to-end listing flows: URL -> details -> record -> store, and back.

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::models::{ListingId, ListingRecord, RawPayload};
use crate::normalizer::Normalizer;
use crate::scrapers::{fetch_or_empty, DetailsRequest, DetailsSource};
use crate::store::ListingStore;
use crate::url_parser::parse_listing_url;
use crate::validation::{
    is_valid_database_path, sanitize_string, validate_listing, ValidationMode,
    DEFAULT_MAX_STRING_LEN,
};

/// Listing operations over one open store
pub struct ListingService {
    store: ListingStore,
    normalizer: Normalizer,
    validation: ValidationMode,
    currency: String,
}

impl ListingService {
    /// Open the configured store and make sure its schema exists.
    pub fn open(config: &AppConfig) -> Result<Self> {
        if !is_valid_database_path(&config.database_path.to_string_lossy()) {
            error!(path = %config.database_path.display(), "database path must name a .db file");
            return Err(Error::InvalidDatabasePath(config.database_path.clone()));
        }
        let store = ListingStore::open(&config.database_path)?;
        Self::with_store(store, config)
    }

    /// Wrap an already opened store.
    pub fn with_store(mut store: ListingStore, config: &AppConfig) -> Result<Self> {
        store.ensure_schema()?;
        Ok(Self {
            store,
            normalizer: Normalizer::from_dump_dir(config.debug_dump_dir.clone()),
            validation: config.validation,
            currency: config.currency.clone(),
        })
    }

    /// Fetch, normalize, validate and store the listing behind `url`.
    pub async fn add_listing(
        &mut self,
        url: &str,
        source: &dyn DetailsSource,
    ) -> Result<ListingRecord> {
        info!(url, "adding listing");
        let query = parse_listing_url(url)?;
        let request = DetailsRequest::from_query(&query, self.currency.clone());
        let payload = fetch_or_empty(source, &request).await;
        self.ingest(url, &payload)
    }

    /// Normalize an already fetched payload for `url` and store it.
    pub fn ingest(&mut self, url: &str, payload: &RawPayload) -> Result<ListingRecord> {
        let query = parse_listing_url(url)?;
        debug!(listing_id = query.listing_id, nights = query.stay_nights, "parsed listing url");

        let record =
            self.normalizer
                .normalize(payload, query.listing_id, url, query.stay_nights)?;

        if !validate_listing(&record, self.validation) {
            error!(listing_id = record.id, "processed listing data is invalid");
            return Err(Error::InvalidRecord(record.id));
        }

        self.store.put(&record)?;
        info!(listing_id = record.id, cost = record.cost, "listing added");
        Ok(record)
    }

    /// Correct the stored cost. `false` when the listing is unknown.
    pub fn update_listing_cost(&mut self, id: ListingId, cost: f64) -> Result<bool> {
        self.rewrite(id, |record| {
            debug!(listing_id = id, from = record.cost, to = cost, "updating cost");
            record.cost = cost;
        })
    }

    /// Attach user notes to a stored listing. `false` when it is unknown.
    ///
    /// Notes are trimmed and cut to [`DEFAULT_MAX_STRING_LEN`] characters.
    pub fn set_notes(&mut self, id: ListingId, notes: &str) -> Result<bool> {
        let notes = sanitize_string(&Value::from(notes), DEFAULT_MAX_STRING_LEN);
        self.rewrite(id, |record| record.notes = Some(notes))
    }

    /// Stored listing with `notes` defaulted to empty.
    pub fn listing_by_id(&self, id: ListingId) -> Result<Option<ListingRecord>> {
        let listing = self.store.get(id)?.map(|mut record| {
            record.notes.get_or_insert_with(String::new);
            record
        });
        if listing.is_none() {
            warn!(listing_id = id, "listing not found");
        }
        Ok(listing)
    }

    pub fn listings_by_location(&self, location: &str) -> Result<Vec<ListingRecord>> {
        Ok(self.store.find_by_location(location)?)
    }

    pub fn all_listings(&self) -> Result<Vec<ListingRecord>> {
        Ok(self.store.list_all()?)
    }

    pub fn listing_count(&self) -> Result<usize> {
        Ok(self.store.count()?)
    }

    pub fn delete_listing(&mut self, id: ListingId) -> Result<bool> {
        Ok(self.store.delete(id)?)
    }

    pub fn listing_exists(&self, id: ListingId) -> Result<bool> {
        Ok(self.store.exists(id)?)
    }

    pub fn store(&self) -> &ListingStore {
        &self.store
    }

    /// Release the store connection.
    pub fn close(self) -> Result<()> {
        Ok(self.store.close()?)
    }

    /// Read, modify and rewrite a whole document.
    fn rewrite(&mut self, id: ListingId, edit: impl FnOnce(&mut ListingRecord)) -> Result<bool> {
        let Some(mut record) = self.store.get(id)? else {
            warn!(listing_id = id, "listing not found in database");
            return Ok(false);
        };

        edit(&mut record);

        if !validate_listing(&record, self.validation) {
            return Err(Error::InvalidRecord(id));
        }
        self.store.put(&record)?;
        info!(listing_id = id, "listing updated");
        Ok(true)
    }
}
