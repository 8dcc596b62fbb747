//! Search source boundary — the consolidation core only ever sees `SearchSource`.
//!
//! Default backend: `SerperClient` (Google results via serper.dev).

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub mod serper;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("SERPER_API_KEY is not set")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One raw organic result. Every field may be missing; a field of the
/// wrong type is treated as missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(default, deserialize_with = "string_or_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub snippet: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub source: Option<String>,
}

fn string_or_none<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match serde_json::Value::deserialize(d)? {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}

/// Anything that can turn a free-text query into an ordered list of hits.
///
/// Implementations may return fewer hits than `result_count_hint`.
#[async_trait]
pub trait SearchSource: Send + Sync {
    async fn search(
        &self,
        query_text: &str,
        result_count_hint: usize,
    ) -> Result<Vec<SearchHit>, SearchError>;
}
