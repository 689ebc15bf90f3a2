use crate::models::RawPayload;
use crate::scrapers::traits::DetailsSource;
use crate::scrapers::types::DetailsRequest;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

/// Replays saved payloads instead of scraping
///
/// Points either at a single JSON file or at a directory of
/// `listing_<id>.json` dumps as written by the normalizer.
pub struct FileDetailsSource {
    path: PathBuf,
}

impl FileDetailsSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File that will be read for `request`
    pub fn payload_path(&self, request: &DetailsRequest) -> PathBuf {
        if self.path.is_dir() {
            self.path.join(format!("listing_{}.json", request.room_id))
        } else {
            self.path.clone()
        }
    }
}

#[async_trait]
impl DetailsSource for FileDetailsSource {
    async fn fetch_details(&self, request: &DetailsRequest) -> Result<RawPayload> {
        let path = self.payload_path(request);
        debug!("Reading saved payload from {}", path.display());

        let raw = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read payload file {}", path.display()))?;

        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse payload file {}", path.display()))
    }

    fn source_name(&self) -> &'static str {
        "file"
    }
}
