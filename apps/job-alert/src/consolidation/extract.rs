//! Field Extractor — best-effort company / employment type / salary hints
//! pulled out of a hit's title and snippet.
//!
//! Every rule set is an ordered table: the first rule that matches wins.
//! Extraction never fails; no match yields an empty value.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::job::{
    EmploymentType, JobRecord, SearchQuery, DEFAULT_SOURCE, MISSING_SNIPPET, MISSING_TITLE,
    MISSING_URL,
};
use crate::search::SearchHit;

// ────────────────────────────────────────────────────────────────────────────
// Rule tables
// ────────────────────────────────────────────────────────────────────────────

/// Title separators that introduce a company name ("Engineer at Acme").
const COMPANY_SEPARATORS: &[&str] = &[" at "];

/// Snippet needles → employment type, in priority order.
const EMPLOYMENT_RULES: &[(&[&str], EmploymentType)] = &[
    (&["remote"], EmploymentType::Remote),
    (&["full-time", "full time"], EmploymentType::FullTime),
    (&["part-time", "part time"], EmploymentType::PartTime),
    (&["contract"], EmploymentType::Contract),
    (&["freelance"], EmploymentType::Freelance),
];

/// Salary patterns, tried in order.
/// 1. currency amounts: `$50,000`, `$50k`, `$90k-$110k`, `$90k - 110k`
/// 2. bare ranges with a yearly unit: `50,000 - 70,000 per year`
static SALARY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\$[\d,]+k?(?:\s*-\s*\$?[\d,]+k?)?",
        r"(?i)[\d,]+k?\s*-\s*[\d,]+k?\s*(?:per year|annually|/year)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

// ────────────────────────────────────────────────────────────────────────────
// Extractors
// ────────────────────────────────────────────────────────────────────────────

/// Company name from a title such as "Rust Engineer at Acme Corp".
/// Uses the text after the last separator, trimmed and title-cased.
pub fn extract_company(title: &str) -> String {
    let lower = title.to_lowercase();
    for sep in COMPANY_SEPARATORS {
        if lower.contains(sep) {
            let tail = lower.rsplit(sep).next().unwrap_or_default();
            return title_case(tail.trim());
        }
    }
    String::new()
}

pub fn extract_employment_type(snippet: &str) -> Option<EmploymentType> {
    let lower = snippet.to_lowercase();
    EMPLOYMENT_RULES
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| lower.contains(n)))
        .map(|(_, kind)| *kind)
}

pub fn extract_salary(snippet: &str) -> String {
    SALARY_PATTERNS
        .iter()
        .find_map(|re| re.find(snippet))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Upper-cases the first cased letter of every word and lower-cases the rest.
/// Any non-alphabetic character starts a new word ("o'reilly" → "O'Reilly").
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Builds an unscored `JobRecord` from one raw hit.
///
/// Missing fields get placeholders; extraction runs on the raw (possibly
/// empty) title and snippet so placeholders never leak into derived fields.
pub fn build_record(hit: &SearchHit, query: &SearchQuery, found_at: DateTime<Utc>) -> JobRecord {
    let raw_title = hit.title.as_deref().unwrap_or_default();
    let raw_snippet = hit.snippet.as_deref().unwrap_or_default();

    JobRecord {
        title: hit.title.clone().unwrap_or_else(|| MISSING_TITLE.to_string()),
        url: hit.link.clone().unwrap_or_else(|| MISSING_URL.to_string()),
        snippet: hit
            .snippet
            .clone()
            .unwrap_or_else(|| MISSING_SNIPPET.to_string()),
        source: hit
            .source
            .clone()
            .unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
        location: query.location.clone(),
        keyword: query.keyword.clone(),
        date_found: found_at,
        company: extract_company(raw_title),
        employment_type: extract_employment_type(raw_snippet),
        salary: extract_salary(raw_snippet),
        relevance_score: None,
    }
}
