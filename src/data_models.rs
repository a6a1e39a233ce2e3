use serde::{Deserialize, Deserializer, Serialize};

/// Contact information extracted from one crawled url.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(from = "RawLeadRecord")]
pub struct LeadRecord {
    pub url: Option<String>,
    pub page_title: Option<String>,
    pub email_addresses: Vec<String>,
    pub phone_numbers: Vec<String>,

    // social profiles, any of them may be missing
    pub facebook: Vec<String>,
    pub instagram: Vec<String>,
    pub linkedin: Vec<String>,
    pub twitter: Vec<String>,
    pub github: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Wire form of a record. `item` is the url that was submitted, `url` the
/// one the extractor reports; either may be missing.
#[derive(Deserialize)]
struct RawLeadRecord {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    item: Option<String>,
    #[serde(default)]
    page_title: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    email_addresses: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    phone_numbers: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    facebook: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    instagram: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    linkedin: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    twitter: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    github: Vec<String>,
    #[serde(default, deserialize_with = "present")]
    error_message: Option<serde_json::Value>,
    // social.js answers invalid urls with `{"error": ...}`
    #[serde(default, deserialize_with = "present")]
    error: Option<serde_json::Value>,
}

impl From<RawLeadRecord> for LeadRecord {
    fn from(raw: RawLeadRecord) -> Self {
        LeadRecord {
            url: raw.url.or(raw.item),
            page_title: raw.page_title,
            email_addresses: raw.email_addresses,
            phone_numbers: raw.phone_numbers,
            facebook: raw.facebook,
            instagram: raw.instagram,
            linkedin: raw.linkedin,
            twitter: raw.twitter,
            github: raw.github,
            error_message: raw.error_message.or(raw.error).map(marker_text),
        }
    }
}

impl LeadRecord {
    pub fn new(url: impl Into<String>) -> LeadRecord {
        LeadRecord {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn failed(url: impl Into<String>, error_message: impl Into<String>) -> LeadRecord {
        LeadRecord {
            url: Some(url.into()),
            error_message: Some(error_message.into()),
            ..Default::default()
        }
    }

    /// Records carrying an error marker have no usable contact fields.
    pub fn is_error(&self) -> bool {
        self.error_message.is_some()
    }
}

/// One entry of a crawl response.
///
/// The extraction service either returns records directly or wraps the
/// records found for each submitted url.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum CrawlItem {
    Wrapped {
        #[serde(default)]
        item: Option<String>,
        results: Vec<serde_json::Value>,
        #[serde(default, deserialize_with = "present")]
        error_message: Option<serde_json::Value>,
        #[serde(default, deserialize_with = "present")]
        error: Option<serde_json::Value>,
    },
    Record(serde_json::Value),
}

/// Text of an error marker. A present but null marker still counts, it just
/// has no message.
pub fn marker_text(marker: serde_json::Value) -> String {
    match marker {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Keeps a present key, even when its value is null.
fn present<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(value)) if value.is_empty() => Vec::new(),
        Some(OneOrMany::One(value)) => vec![value],
        Some(OneOrMany::Many(values)) => values,
        None => Vec::new(),
    })
}
