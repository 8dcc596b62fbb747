//! LLM Client — the single point of entry for language-model calls in job-alert.
//!
//! Talks to an Ollama-compatible `/api/generate` endpoint. Responses arrive as
//! newline-delimited JSON chunks whose `response` fragments are concatenated.
use std::time::Duration;

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

pub mod prompts;

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "mistral:7b";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// One line of the streamed generate response.
#[derive(Debug, Deserialize)]
struct GenerateChunk {
    #[serde(default)]
    response: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    base_url: String,
    model: String,
}

impl LlmClient {
    pub fn new(base_url: String, model: String, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends one generate request and returns the concatenated completion text.
    pub async fn call(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: true,
        };

        info!("Sending request to {} (model: {})", url, self.model);
        let response = self.client.post(&url).json(&body).send().await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        let completion = collect_stream(&text)?;
        debug!("LLM completion: {} chars", completion.len());
        Ok(completion)
    }
}

/// Concatenates the `response` fragments of a newline-delimited JSON stream.
/// Blank lines are skipped; a chunk carrying `error` aborts the whole call.
fn collect_stream(body: &str) -> Result<String, LlmError> {
    let mut out = String::new();
    for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let chunk: GenerateChunk = serde_json::from_str(line)?;
        if let Some(message) = chunk.error {
            return Err(LlmError::Api { status: 200, message });
        }
        out.push_str(&chunk.response);
        if chunk.done {
            break;
        }
    }
    if out.trim().is_empty() {
        return Err(LlmError::EmptyContent);
    }
    Ok(out)
}

pub fn parse_json_reply<T: DeserializeOwned>(text: &str) -> Result<T, LlmError> {
    serde_json::from_str(strip_json_fences(text)).map_err(LlmError::Parse)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_stream_concatenates_fragments() {
        let body = concat!(
            r#"{"model":"mistral:7b","response":"{\"sum","done":false}"#,
            "\n\n",
            r#"{"model":"mistral:7b","response":"mary\": 1}","done":false}"#,
            "\n",
            r#"{"model":"mistral:7b","response":"","done":true}"#,
            "\n"
        );
        assert_eq!(collect_stream(body).unwrap(), "{\"summary\": 1}");
    }

    #[test]
    fn test_collect_stream_surfaces_error_chunk() {
        let body = r#"{"error":"model 'mistral:7b' not found"}"#;
        let err = collect_stream(body).unwrap_err();
        assert!(matches!(err, LlmError::Api { ref message, .. } if message.contains("not found")));
    }

    #[test]
    fn test_collect_stream_empty_is_error() {
        assert!(matches!(collect_stream(""), Err(LlmError::EmptyContent)));
        let blank = r#"{"response":"  ","done":true}"#;
        assert!(matches!(collect_stream(blank), Err(LlmError::EmptyContent)));
    }

    #[test]
    fn test_collect_stream_rejects_garbage() {
        assert!(matches!(collect_stream("not json"), Err(LlmError::Parse(_))));
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = LlmClient::new(
            "http://localhost:11434/".to_string(),
            DEFAULT_MODEL.to_string(),
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(client.base_url, "http://localhost:11434");
        assert_eq!(client.model(), "mistral:7b");
    }
}
