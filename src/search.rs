use async_trait::async_trait;
use serde::Serialize;

use crate::config::{ApiKey, Profile};
use crate::errors::LeadError;
use crate::filter::Blocklist;
use crate::normalizer::{Normalized, SearchResponse, normalize};

pub const SEARCH_FUNCTION: &str = "google_scraper.js";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GoogleParams {
    pub hl: String,
    pub gl: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num: Option<u32>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchOptions {
    pub google_params: GoogleParams,
    pub num_pages: u32,
}

/// One request covering the whole query catalog.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchBatchRequest {
    #[serde(rename = "API_KEY")]
    pub api_key: String,
    pub function: String,
    pub items: Vec<String>,
    pub region: String,
    pub options: SearchOptions,
}

impl SearchBatchRequest {
    pub fn new(api_key: &ApiKey, profile: &Profile) -> Self {
        SearchBatchRequest {
            api_key: api_key.as_str().to_string(),
            function: SEARCH_FUNCTION.to_string(),
            items: profile.queries.clone(),
            region: profile.region.clone(),
            options: SearchOptions {
                google_params: GoogleParams {
                    hl: profile.language.clone(),
                    gl: profile.country.clone(),
                    num: profile.results_per_page,
                },
                num_pages: profile.num_pages,
            },
        }
    }
}

/// The search-aggregation service.
///
/// Implementations return `LeadError::Upstream` when the call fails or the
/// body is not a list of per-query results.
#[async_trait]
pub trait SearchService: Send + Sync {
    async fn search(&self, request: &SearchBatchRequest) -> Result<SearchResponse, LeadError>;
}

#[async_trait]
impl<T> SearchService for &T
where
    T: SearchService + ?Sized,
{
    async fn search(&self, request: &SearchBatchRequest) -> Result<SearchResponse, LeadError> {
        (**self).search(request).await
    }
}

/// Runs the query catalog through the search service and returns the
/// filtered, deduplicated lead candidate urls.
pub async fn run_search<S>(
    service: &S,
    api_key: &ApiKey,
    profile: &Profile,
) -> Result<Vec<String>, LeadError>
where
    S: SearchService + ?Sized,
{
    let request = SearchBatchRequest::new(api_key, profile);
    log::info!(
        "searching {} queries ({} page(s) each)",
        request.items.len(),
        request.options.num_pages
    );

    let response = service.search(&request).await?;
    let blocklist = Blocklist::new(profile.blocklist.iter().cloned());
    let normalized = normalize(response, &blocklist);
    report(&normalized);

    Ok(normalized.urls)
}

fn report(normalized: &Normalized) {
    log::info!("got {} results", normalized.results);
    log::info!(
        "{}/{} results failed",
        normalized.failed,
        normalized.results
    );
    log::info!(
        "filtered {} urls. {} left.",
        normalized.filtered_out,
        normalized.urls.len()
    );
}
