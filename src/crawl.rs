use async_trait::async_trait;
use futures::StreamExt;
use futures::stream;
use serde::Serialize;

use crate::config::ApiKey;
use crate::data_models::{CrawlItem, LeadRecord, marker_text};
use crate::errors::{ItemParseError, LeadError};

pub const CRAWL_FUNCTION: &str = "social.js";

/// One batch of urls for the extraction service.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CrawlBatchRequest {
    #[serde(rename = "API_KEY")]
    pub api_key: String,
    pub function: String,
    pub items: Vec<String>,
    pub region: String,
}

/// The content-extraction service.
///
/// An error from [`CrawlService::crawl`] means the whole batch failed.
/// Per-url failures are reported inside the returned items.
#[async_trait]
pub trait CrawlService: Send + Sync {
    async fn crawl(&self, request: &CrawlBatchRequest) -> Result<Vec<CrawlItem>, LeadError>;
}

#[async_trait]
impl<T> CrawlService for &T
where
    T: CrawlService + ?Sized,
{
    async fn crawl(&self, request: &CrawlBatchRequest) -> Result<Vec<CrawlItem>, LeadError> {
        (**self).crawl(request).await
    }
}

/// Submits urls to the extraction service in bounded batches.
pub struct CrawlDispatcher<'a, C: ?Sized> {
    service: &'a C,
    api_key: &'a ApiKey,
    region: String,
    batch_size: usize,
    concurrency: usize,
}

impl<'a, C> CrawlDispatcher<'a, C>
where
    C: CrawlService + ?Sized,
{
    pub fn new(service: &'a C, api_key: &'a ApiKey, batch_size: usize) -> Self {
        CrawlDispatcher {
            service,
            api_key,
            region: "us".to_string(),
            batch_size,
            concurrency: 1,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Number of batches in flight at once. Output order does not depend on
    /// it.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn batches(&self, urls: &[String]) -> Vec<CrawlBatchRequest> {
        urls.chunks(self.batch_size)
            .map(|chunk| CrawlBatchRequest {
                api_key: self.api_key.as_str().to_string(),
                function: CRAWL_FUNCTION.to_string(),
                items: chunk.to_vec(),
                region: self.region.clone(),
            })
            .collect()
    }

    /// Crawls every url and returns the records in batch order.
    ///
    /// The first failed batch aborts the crawl. Error-marked records are
    /// kept; they are dropped at export.
    pub async fn run(&self, urls: Vec<String>) -> Result<Vec<LeadRecord>, LeadError> {
        if self.batch_size == 0 {
            return Err(LeadError::Config("batch size must be at least 1".into()));
        }

        let requests = self.batches(&urls);
        let total = requests.len();
        log::info!(
            "crawling {} urls in {} batch(es) of up to {}",
            urls.len(),
            total,
            self.batch_size
        );

        let mut responses = stream::iter(requests.into_iter().enumerate())
            .map(|(i, request)| async move {
                log::debug!("crawl batch {}/{} ({} urls)", i + 1, total, request.items.len());
                self.service.crawl(&request).await
            })
            .buffered(self.concurrency);

        let mut records = Vec::new();
        let mut skipped = 0;
        while let Some(items) = responses.next().await {
            let (batch_records, batch_skipped) = flatten_items(items?);
            records.extend(batch_records);
            skipped += batch_skipped;
        }

        let failed = records.iter().filter(|r| r.is_error()).count();
        log::info!(
            "crawled {} records, {} with errors, {} malformed items skipped",
            records.len(),
            failed,
            skipped
        );
        Ok(records)
    }
}

/// Crawls `urls` strictly one batch after another.
pub async fn run_crawl<C>(
    service: &C,
    api_key: &ApiKey,
    urls: Vec<String>,
    batch_size: usize,
) -> Result<Vec<LeadRecord>, LeadError>
where
    C: CrawlService + ?Sized,
{
    CrawlDispatcher::new(service, api_key, batch_size)
        .run(urls)
        .await
}

/// Turns one batch response into lead records, returning how many items
/// could not be read.
pub fn flatten_items(items: Vec<CrawlItem>) -> (Vec<LeadRecord>, usize) {
    let mut records = Vec::new();
    let mut skipped = 0;
    let mut index = 0;

    let mut decode = |value: serde_json::Value, source: Option<&str>, records: &mut Vec<LeadRecord>| {
        index += 1;
        match serde_json::from_value::<LeadRecord>(value) {
            Ok(mut record) => {
                if record.url.is_none() {
                    record.url = source.map(str::to_string);
                }
                records.push(record);
            }
            Err(e) => {
                skipped += 1;
                let err = ItemParseError {
                    kind: "crawl",
                    index: index - 1,
                    reason: e.to_string(),
                };
                log::warn!("{err}");
            }
        }
    };

    for item in items {
        match item {
            CrawlItem::Wrapped {
                item,
                results,
                error_message,
                error,
            } => {
                if results.is_empty() {
                    if let Some(message) = error_message.or(error) {
                        records.push(LeadRecord {
                            url: item.clone(),
                            error_message: Some(marker_text(message)),
                            ..Default::default()
                        });
                    }
                }
                for value in results {
                    decode(value, item.as_deref(), &mut records);
                }
            }
            CrawlItem::Record(value) => decode(value, None, &mut records),
        }
    }

    (records, skipped)
}
