use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::Config;
use crate::crawl::{CrawlBatchRequest, CrawlService};
use crate::data_models::CrawlItem;
use crate::errors::LeadError;
use crate::normalizer::SearchResponse;
use crate::search::{SearchBatchRequest, SearchService};

/// HTTP client for the Scrapeulous API, which serves both the search and
/// the extraction function behind one endpoint.
#[derive(Debug, Clone)]
pub struct ScrapeulousClient {
    http: Client,
    api_url: String,
}

impl ScrapeulousClient {
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self, LeadError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LeadError::Config(format!("failed to build http client: {e}")))?;
        Ok(ScrapeulousClient {
            http,
            api_url: api_url.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, LeadError> {
        Self::new(config.api_url.clone(), config.timeout())
    }

    async fn post<B, T>(&self, service: &'static str, body: &B) -> Result<T, LeadError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let res = self
            .http
            .post(&self.api_url)
            .json(body)
            .send()
            .await
            .map_err(|e| LeadError::upstream(service, format!("request failed: {e}")))?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(LeadError::upstream(
                service,
                format!("unexpected status {status}: {}", snippet(&text)),
            ));
        }

        let text = res
            .text()
            .await
            .map_err(|e| LeadError::upstream(service, format!("failed to read body: {e}")))?;
        serde_json::from_str(&text).map_err(|e| {
            LeadError::upstream(
                service,
                format!("unparseable response ({e}): {}", snippet(&text)),
            )
        })
    }
}

fn snippet(text: &str) -> &str {
    match text.char_indices().nth(200) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[async_trait]
impl SearchService for ScrapeulousClient {
    async fn search(&self, request: &SearchBatchRequest) -> Result<SearchResponse, LeadError> {
        self.post("search", request).await
    }
}

#[async_trait]
impl CrawlService for ScrapeulousClient {
    async fn crawl(&self, request: &CrawlBatchRequest) -> Result<Vec<CrawlItem>, LeadError> {
        self.post("crawl", request).await
    }
}
