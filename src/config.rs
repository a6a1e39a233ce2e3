use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::LeadError;
use crate::export::ExportSchema;

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    Config {
        api_url: get_env_or_default("SCRAPEULOUS_API_URL", DEFAULT_API_URL),
        region: get_env_or_default("LEADHARVEST_REGION", DEFAULT_REGION),
        timeout_secs: parse_timeout(&get_env_or_default(
            "LEADHARVEST_TIMEOUT_SECS",
            &DEFAULT_TIMEOUT_SECS.to_string(),
        )),
    }
});

pub const DEFAULT_API_URL: &str = "https://scrapeulous.com/api";
pub const DEFAULT_REGION: &str = "us";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Process-level settings that come from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub region: String,
    pub timeout_secs: u64,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_timeout(raw: &str) -> u64 {
    raw.trim().parse().unwrap_or_else(|e| {
        log::warn!(
            "invalid LEADHARVEST_TIMEOUT_SECS {raw:?} ({e}), using {DEFAULT_TIMEOUT_SECS}s"
        );
        DEFAULT_TIMEOUT_SECS
    })
}

/// Scrapeulous API key, validated once at startup and passed explicitly.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(raw: impl Into<String>) -> Result<Self, LeadError> {
        let raw = raw.into();
        let key = raw.trim();
        if key.is_empty() {
            return Err(LeadError::Config("API key must not be empty".into()));
        }
        if key.chars().any(char::is_whitespace) {
            return Err(LeadError::Config(
                "API key must not contain whitespace".into(),
            ));
        }
        Ok(ApiKey(key.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// keep the key out of logs
impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Everything that stays fixed for one run: what to search, what to drop,
/// how to batch the crawl and how to lay out the output.
#[derive(Debug, Clone)]
pub struct Profile {
    pub name: String,
    pub queries: Vec<String>,
    pub blocklist: Vec<String>,
    pub batch_size: usize,
    pub num_pages: u32,
    pub results_per_page: Option<u32>,
    pub language: String,
    pub country: String,
    pub region: String,
    pub schema: ExportSchema,
    pub output: PathBuf,
}

const LAW_PRACTICES: [&str; 5] = [
    "criminal lawyer",
    "civil rights violation lawyer",
    "dui lawyer",
    "business lawyer",
    "immigration lawyer",
];

const LAW_CITIES: [&str; 5] = ["new york", "boston", "san francisco", "seattle", "detroit"];

const LAW_BLOCKLIST: [&str; 9] = [
    "youtube.com",
    "wikipedia.org",
    "yelp.com",
    "facebook.com",
    "en.wikipedia.org",
    "www.linkedin.com",
    "linkedin.com",
    "www.justia.com",
    "superlawyers.com",
];

impl Profile {
    /// Law firm leads with social profile columns, crawled 20 urls at a time.
    pub fn law() -> Self {
        let queries = LAW_PRACTICES
            .iter()
            .flat_map(|practice| LAW_CITIES.iter().map(move |city| format!("{practice} {city}")))
            .collect();

        Profile {
            name: "law".to_string(),
            queries,
            blocklist: LAW_BLOCKLIST.iter().map(|d| d.to_string()).collect(),
            batch_size: 20,
            num_pages: 1,
            results_per_page: None,
            language: "en".to_string(),
            country: "en".to_string(),
            region: DEFAULT_REGION.to_string(),
            schema: ExportSchema::Social,
            output: PathBuf::from("law-leads.csv"),
        }
    }

    /// Same catalog, larger crawl batches, exported with the source url and
    /// without social columns.
    pub fn law_urls() -> Self {
        Profile {
            name: "law-urls".to_string(),
            batch_size: 99,
            schema: ExportSchema::Url,
            ..Profile::law()
        }
    }

    pub fn validate(&self) -> Result<(), LeadError> {
        if self.batch_size == 0 {
            return Err(LeadError::Config("batch size must be at least 1".into()));
        }
        if self.num_pages == 0 {
            return Err(LeadError::Config("page count must be at least 1".into()));
        }
        if self.queries.is_empty() {
            return Err(LeadError::Config(format!(
                "profile {} has an empty query catalog",
                self.name
            )));
        }
        Ok(())
    }
}

impl FromStr for Profile {
    type Err = LeadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "law" => Ok(Profile::law()),
            "law-urls" => Ok(Profile::law_urls()),
            other => Err(LeadError::Config(format!(
                "unknown profile {other:?}, expected one of: law, law-urls"
            ))),
        }
    }
}
