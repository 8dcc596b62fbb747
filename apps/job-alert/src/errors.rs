use thiserror::Error;

use crate::email::EmailError;
use crate::llm_client::LlmError;
use crate::search::SearchError;

/// Application-level error type.
/// Only configuration and delivery failures reach `main`; per-query search
/// errors and summarizer errors are absorbed further down.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Email error: {0}")]
    Email(#[from] EmailError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Errors raised while building clients from configuration are config errors.
    pub fn config(err: impl std::fmt::Display) -> Self {
        AppError::Config(err.to_string())
    }
}
