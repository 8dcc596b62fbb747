// Digest stage: LLM summary, HTML rendering, subject line.
// Consumes the final ResultSet; knows nothing about how it was produced.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

pub mod html;
pub mod prompts;
pub mod summarizer;

/// Structured digest returned by the summarizer LLM.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DigestSummary {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub summary: String,
    #[serde(default)]
    pub jobs: Vec<SummarizedJob>,
}

/// One job as re-described by the LLM. Every field is optional in the reply.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummarizedJob {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub company: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub location: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub url: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub salary: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub employment_type: String,
    #[serde(default, deserialize_with = "lenient_score")]
    pub relevance_score: Option<f64>,
}

/// `null` → "".
fn string_or_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

/// Accepts `66.5`, `"66.5"` or `"66.5%"`; anything else becomes `None`.
fn lenient_score<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let value = serde_json::Value::deserialize(d)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    })
}

pub fn subject_line(job_count: usize, date: NaiveDate) -> String {
    format!(
        "🚀 Your Job Alert Digest - {} New Opportunities | {}",
        job_count,
        html::format_date(date)
    )
}
