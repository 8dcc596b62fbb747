//! Summarizer — asks the LLM for a structured digest of the final result set.

use tracing::{info, warn};

use crate::digest::prompts::{SUMMARIZER_INTRO, SUMMARIZER_SYSTEM, SUMMARY_PROMPT_TEMPLATE};
use crate::digest::DigestSummary;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{parse_json_reply, LlmClient, LlmError};
use crate::models::job::JobRecord;

/// Prompt overrides; `None` falls back to the built-in texts.
#[derive(Debug, Clone, Default)]
pub struct SummaryPrompts {
    pub system_message: Option<String>,
    pub prompt_intro: Option<String>,
}

pub struct Summarizer {
    llm: LlmClient,
    prompts: SummaryPrompts,
}

impl Summarizer {
    pub fn new(llm: LlmClient, prompts: SummaryPrompts) -> Self {
        Self { llm, prompts }
    }

    /// Returns the parsed summary, or `None` when the LLM call fails or its
    /// reply is not the expected JSON. Callers fall back to the raw job list.
    pub async fn summarize(&self, jobs: &[JobRecord]) -> Option<DigestSummary> {
        info!("Starting job listings summarization for {} jobs", jobs.len());

        let prompt = match build_prompt(jobs, &self.prompts) {
            Ok(p) => p,
            Err(e) => {
                warn!("Could not serialize jobs for the summary prompt: {e}");
                return None;
            }
        };

        let reply = match self.llm.call(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!("LLM summarization failed, using fallback formatting: {e}");
                return None;
            }
        };
        info!("Summary generation completed");

        match parse_summary(&reply) {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!("Could not parse LLM JSON response, using fallback formatting: {e}");
                None
            }
        }
    }
}

pub fn build_prompt(jobs: &[JobRecord], prompts: &SummaryPrompts) -> Result<String, LlmError> {
    let system = non_empty(prompts.system_message.as_deref()).unwrap_or(SUMMARIZER_SYSTEM);
    let intro = non_empty(prompts.prompt_intro.as_deref()).unwrap_or(SUMMARIZER_INTRO);
    let jobs_json = serde_json::to_string_pretty(jobs)?;

    Ok(SUMMARY_PROMPT_TEMPLATE
        .replace("{system_message}", system)
        .replace("{json_instruction}", JSON_ONLY_INSTRUCTION)
        .replace("{prompt_intro}", intro)
        .replace("{jobs_json}", &jobs_json))
}

pub fn parse_summary(reply: &str) -> Result<DigestSummary, LlmError> {
    parse_json_reply(reply)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
