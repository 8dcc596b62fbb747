use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{SearchError, SearchHit, SearchSource};

const SERPER_API_URL: &str = "https://google.serper.dev/search";

#[derive(Debug, Serialize)]
struct SerperRequest<'a> {
    q: &'a str,
    num: usize,
    autocorrect: bool,
}

#[derive(Debug, Default, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Option<Vec<serde_json::Value>>,
}

/// Serper.dev client. One instance (and its connection pool) is reused for
/// every query of a run.
pub struct SerperClient {
    client: Client,
    api_key: String,
}

impl SerperClient {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, SearchError> {
        if api_key.trim().is_empty() {
            return Err(SearchError::MissingApiKey);
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, api_key })
    }
}

#[async_trait]
impl SearchSource for SerperClient {
    async fn search(
        &self,
        query_text: &str,
        result_count_hint: usize,
    ) -> Result<Vec<SearchHit>, SearchError> {
        let body = SerperRequest {
            q: query_text,
            num: result_count_hint,
            autocorrect: true,
        };

        let response = self
            .client
            .post(SERPER_API_URL)
            .header("X-API-KEY", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(SearchError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        let hits = parse_organic(&text)?;
        debug!("Serper returned {} organic hits for '{}'", hits.len(), query_text);
        Ok(hits)
    }
}

/// Pulls the `organic` array out of a Serper response body.
/// Items that are not JSON objects are dropped; the rest are kept.
fn parse_organic(body: &str) -> Result<Vec<SearchHit>, SearchError> {
    let parsed: SerperResponse = serde_json::from_str(body)?;
    let hits = parsed
        .organic
        .unwrap_or_default()
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<SearchHit>(item) {
            Ok(hit) => Some(hit),
            Err(e) => {
                debug!("Dropping malformed organic result: {e}");
                None
            }
        })
        .collect();
    Ok(hits)
}
