use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder values substituted when a raw search hit omits a field.
pub const MISSING_TITLE: &str = "No title available";
pub const MISSING_URL: &str = "#";
pub const MISSING_SNIPPET: &str = "No description available";
pub const DEFAULT_SOURCE: &str = "Google Search";

/// Employment type inferred from a posting snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmploymentType {
    Remote,
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    Contract,
    Freelance,
}

impl EmploymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentType::Remote => "Remote",
            EmploymentType::FullTime => "Full-time",
            EmploymentType::PartTime => "Part-time",
            EmploymentType::Contract => "Contract",
            EmploymentType::Freelance => "Freelance",
        }
    }
}

impl fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One (keyword, location) pair from the query plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub keyword: String,
    pub location: String,
}

impl SearchQuery {
    pub fn new(keyword: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            location: location.into(),
        }
    }

    /// The free-text query sent to the search source.
    pub fn text(&self) -> String {
        format!("{} jobs in {}", self.keyword, self.location)
    }
}

/// Builds the keyword-major, location-minor query plan.
///
/// Order matters: it decides which duplicate is seen first and which
/// queries are skipped once the result cap is reached.
pub fn query_plan(keywords: &[String], locations: &[String]) -> Vec<SearchQuery> {
    keywords
        .iter()
        .flat_map(|keyword| {
            locations
                .iter()
                .map(move |location| SearchQuery::new(keyword.clone(), location.clone()))
        })
        .collect()
}

/// A single discovered job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub source: String,
    /// The location of the query that produced this hit.
    pub location: String,
    /// The keyword of the query that produced this hit.
    pub keyword: String,
    pub date_found: DateTime<Utc>,
    pub company: String,
    pub employment_type: Option<EmploymentType>,
    pub salary: String,
    /// `None` until the scorer has run.
    pub relevance_score: Option<f64>,
}

impl JobRecord {
    pub fn score(&self) -> f64 {
        self.relevance_score.unwrap_or(0.0)
    }
}

/// The final, ordered and capped output of one consolidation run.
pub type ResultSet = Vec<JobRecord>;
