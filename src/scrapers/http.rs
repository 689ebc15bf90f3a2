use crate::models::RawPayload;
use crate::scrapers::traits::DetailsSource;
use crate::scrapers::types::DetailsRequest;
use crate::validation::is_valid_url_format;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Details source backed by an external HTTP details service
///
/// Issues `GET <endpoint>?room_id=..&check_in=..&check_out=..&adults=..&currency=..`
/// and expects the raw listing payload back as JSON.
pub struct HttpDetailsSource {
    client: Client,
    endpoint: String,
}

impl HttpDetailsSource {
    /// Create a source with a 30 second timeout
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Self::with_timeout(endpoint, Duration::from_secs(30))
    }

    /// Create a source; the endpoint must be an `http(s)://` URL
    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let endpoint = endpoint.into();
        if !is_valid_url_format(&endpoint) {
            anyhow::bail!("Invalid details endpoint '{}'", endpoint);
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("stay-scout/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.trim().to_string(),
        })
    }
}

#[async_trait]
impl DetailsSource for HttpDetailsSource {
    async fn fetch_details(&self, request: &DetailsRequest) -> Result<RawPayload> {
        debug!("Fetching details from {}", self.endpoint);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&request.query_pairs())
            .send()
            .await
            .context("Failed to reach details service")?;

        if !response.status().is_success() {
            warn!("Details service returned status: {}", response.status());
            anyhow::bail!("Details service returned {}", response.status());
        }

        response
            .json::<RawPayload>()
            .await
            .context("Failed to decode details payload")
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
