use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors for a single pipeline run.
///
/// Problems with one search result or one crawled item are not represented
/// here; those are counted and skipped where they occur.
#[derive(Debug, Error)]
pub enum LeadError {
    /// Missing or invalid run configuration. Raised before any network call.
    #[error("configuration error: {0}")]
    Config(String),

    /// An upstream service call failed or returned an unusable body.
    #[error("{service} service failed: {message}")]
    Upstream {
        service: &'static str,
        message: String,
    },

    /// The export destination could not be written.
    #[error("failed to export leads to {}: {source}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LeadError {
    pub fn upstream(service: &'static str, message: impl ToString) -> Self {
        LeadError::Upstream {
            service,
            message: message.to_string(),
        }
    }

    pub fn export(path: impl Into<PathBuf>, source: impl Into<std::io::Error>) -> Self {
        LeadError::Export {
            path: path.into(),
            source: source.into(),
        }
    }
}

/// A single malformed item inside an otherwise valid response.
#[derive(Debug, Error)]
#[error("skipping malformed {kind} item #{index}: {reason}")]
pub struct ItemParseError {
    pub kind: &'static str,
    pub index: usize,
    pub reason: String,
}
