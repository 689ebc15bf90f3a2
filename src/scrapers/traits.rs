use crate::models::RawPayload;
use crate::scrapers::types::DetailsRequest;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, error, info};

/// Common trait for all listing detail sources
/// The scrape itself is external; implementations only hand back its raw payload
#[async_trait]
pub trait DetailsSource: Send + Sync {
    /// Fetch the raw details payload for one stay query
    async fn fetch_details(&self, request: &DetailsRequest) -> Result<RawPayload>;

    /// Get the name of the details source
    fn source_name(&self) -> &'static str;
}

/// Fetch details, turning any source failure into an empty payload.
///
/// The normalizer rejects the empty payload, so a failed fetch surfaces as
/// invalid input rather than as a source-specific error.
pub async fn fetch_or_empty(source: &dyn DetailsSource, request: &DetailsRequest) -> RawPayload {
    info!(
        room_id = request.room_id,
        check_in = %request.check_in,
        check_out = %request.check_out,
        adults = request.adults,
        currency = %request.currency,
        source = source.source_name(),
        "fetching listing details"
    );

    match source.fetch_details(request).await {
        Ok(payload) => {
            debug!(
                fields = payload.as_object().map_or(0, |m| m.len()),
                "fetched listing details"
            );
            payload
        }
        Err(e) => {
            let reason = format!("{e:#}");
            error!(room_id = request.room_id, error = %reason, "failed to fetch listing details");
            Value::Object(Map::new())
        }
    }
}
