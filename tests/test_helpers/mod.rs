#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Mutex;

use leadharvest::crawl::{CrawlBatchRequest, CrawlService};
use leadharvest::data_models::CrawlItem;
use leadharvest::errors::LeadError;
use leadharvest::normalizer::SearchResponse;
use leadharvest::search::{SearchBatchRequest, SearchService};

/// Search service answering every request with the same body.
pub struct FakeSearch {
    response: Result<Value, String>,
    pub requests: Mutex<Vec<SearchBatchRequest>>,
}

impl FakeSearch {
    pub fn responding(body: Value) -> Self {
        FakeSearch {
            response: Ok(body),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        FakeSearch {
            response: Err(message.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl SearchService for FakeSearch {
    async fn search(&self, request: &SearchBatchRequest) -> Result<SearchResponse, LeadError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.response {
            Ok(body) => serde_json::from_value(body.clone())
                .map_err(|e| LeadError::upstream("search", e)),
            Err(message) => Err(LeadError::upstream("search", message)),
        }
    }
}

/// Crawl service that answers with one record per url, using
/// `error_for` to decide which urls come back with an error marker.
pub struct FakeCrawl {
    error_for: Vec<String>,
    fail_batch: Option<usize>,
    pub requests: Mutex<Vec<CrawlBatchRequest>>,
}

impl FakeCrawl {
    pub fn new() -> Self {
        FakeCrawl {
            error_for: Vec::new(),
            fail_batch: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_errors_for(mut self, urls: &[&str]) -> Self {
        self.error_for = urls.iter().map(|u| u.to_string()).collect();
        self
    }

    /// Makes the n-th call (0-based) fail as a whole.
    pub fn failing_batch(mut self, n: usize) -> Self {
        self.fail_batch = Some(n);
        self
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.items.len())
            .collect()
    }
}

#[async_trait]
impl CrawlService for FakeCrawl {
    async fn crawl(&self, request: &CrawlBatchRequest) -> Result<Vec<CrawlItem>, LeadError> {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len() - 1
        };
        if self.fail_batch == Some(call) {
            return Err(LeadError::upstream("crawl", "502 Bad Gateway"));
        }

        let items = request
            .items
            .iter()
            .map(|url| {
                if self.error_for.contains(url) {
                    json!({"item": url, "results": [{"error_message": "RequestError: timeout"}]})
                } else {
                    json!({"item": url, "results": [{
                        "page_title": format!("Title of {url}"),
                        "email_addresses": ["info@example.com"],
                        "phone_numbers": ["617-555-0100"],
                        "facebook": [],
                        "instagram": [],
                        "linkedin": [],
                        "twitter": [],
                        "github": []
                    }]})
                }
            })
            .collect::<Vec<_>>();
        Ok(serde_json::from_value(Value::Array(items)).unwrap())
    }
}

pub fn urls(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("https://lead{i}.example")).collect()
}

/// Search response in the paged shape with the given links for one query.
pub fn serp(links: &[&str]) -> Value {
    let organic: Vec<Value> = links.iter().map(|l| json!({"link": l})).collect();
    json!([{"item": "query", "results": [[{"organic_results": organic}]]}])
}
