use anyhow::{bail, Context, Result};

use crate::digest::summarizer::SummaryPrompts;
use crate::llm_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub serper_api_key: String,
    pub keywords: Vec<String>,
    pub locations: Vec<String>,
    pub max_results: usize,
    pub recipient_name: String,
    pub ollama_url: String,
    pub ollama_model: String,
    pub summary_prompts: SummaryPrompts,
    pub fuzzy_dedup_threshold: Option<f64>,
    pub search_timeout_secs: u64,
    pub llm_timeout_secs: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key → value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let keywords = parse_list(&require(&lookup, "JOB_KEYWORDS")?);
        if keywords.is_empty() {
            bail!("JOB_KEYWORDS must contain at least one keyword");
        }
        let locations = parse_list(&require(&lookup, "JOB_LOCATIONS")?);
        if locations.is_empty() {
            bail!("JOB_LOCATIONS must contain at least one location");
        }

        let max_results = optional(&lookup, "MAX_RESULTS")
            .unwrap_or_else(|| "10".to_string())
            .parse::<usize>()
            .context("MAX_RESULTS must be a positive integer")?;
        if max_results == 0 {
            bail!("MAX_RESULTS must be a positive integer");
        }

        let fuzzy_dedup_threshold = match optional(&lookup, "FUZZY_DEDUP_THRESHOLD") {
            Some(raw) => {
                let value = raw
                    .parse::<f64>()
                    .context("FUZZY_DEDUP_THRESHOLD must be a number")?;
                if !(value > 0.0 && value <= 1.0) {
                    bail!("FUZZY_DEDUP_THRESHOLD must be in (0, 1], got {value}");
                }
                Some(value)
            }
            None => None,
        };

        Ok(Config {
            serper_api_key: require(&lookup, "SERPER_API_KEY")?,
            keywords,
            locations,
            max_results,
            recipient_name: optional(&lookup, "RECIPIENT_NAME")
                .unwrap_or_else(|| "Job Seeker".to_string()),
            ollama_url: optional(&lookup, "OLLAMA_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            ollama_model: optional(&lookup, "OLLAMA_MODEL")
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            summary_prompts: SummaryPrompts {
                system_message: optional(&lookup, "SUMMARIZER_SYSTEM_MESSAGE"),
                prompt_intro: optional(&lookup, "SUMMARIZER_PROMPT_INTRO"),
            },
            fuzzy_dedup_threshold,
            search_timeout_secs: seconds(&lookup, "SEARCH_TIMEOUT_SECS", 30)?,
            llm_timeout_secs: seconds(&lookup, "LLM_TIMEOUT_SECS", 300)?,
            rust_log: optional(&lookup, "RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

/// SMTP delivery settings. Only needed when the digest is actually sent.
#[derive(Debug, Clone)]
pub struct EmailSettings {
    pub server: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub to: String,
}

impl EmailSettings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(EmailSettings {
            server: require(&lookup, "SMTP_SERVER")?,
            port: optional(&lookup, "SMTP_PORT")
                .unwrap_or_else(|| "587".to_string())
                .parse::<u16>()
                .context("SMTP_PORT must be a valid port number")?,
            user: require(&lookup, "EMAIL_USER")?,
            password: require(&lookup, "EMAIL_PASS")?,
            to: require(&lookup, "EMAIL_TO")?,
        })
    }
}

/// Splits a comma-separated list, trimming entries and dropping blanks.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn require<F: Fn(&str) -> Option<String>>(lookup: &F, key: &str) -> Result<String> {
    optional(lookup, key)
        .with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and whitespace-only values are treated the same.
fn optional<F: Fn(&str) -> Option<String>>(lookup: &F, key: &str) -> Option<String> {
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn seconds<F: Fn(&str) -> Option<String>>(lookup: &F, key: &str, default: u64) -> Result<u64> {
    match optional(lookup, key) {
        Some(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("{key} must be a whole number of seconds")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn minimal() -> Vec<(&'static str, &'static str)> {
        vec![
            ("SERPER_API_KEY", "secret"),
            ("JOB_KEYWORDS", "rust, backend ,,"),
            ("JOB_LOCATIONS", "Remote,Berlin"),
        ]
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_lookup(lookup_from(&minimal())).unwrap();
        assert_eq!(config.keywords, vec!["rust", "backend"]);
        assert_eq!(config.locations, vec!["Remote", "Berlin"]);
        assert_eq!(config.max_results, 10);
        assert_eq!(config.recipient_name, "Job Seeker");
        assert_eq!(config.ollama_url, DEFAULT_BASE_URL);
        assert_eq!(config.ollama_model, DEFAULT_MODEL);
        assert_eq!(config.fuzzy_dedup_threshold, None);
        assert_eq!(config.search_timeout_secs, 30);
        assert_eq!(config.llm_timeout_secs, 300);
        assert_eq!(config.rust_log, "info");
        assert!(config.summary_prompts.system_message.is_none());
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let pairs: Vec<_> = minimal()
            .into_iter()
            .filter(|(k, _)| *k != "SERPER_API_KEY")
            .collect();
        let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(err.to_string().contains("SERPER_API_KEY"));
    }

    #[test]
    fn test_blank_api_key_is_fatal() {
        let mut pairs = minimal();
        pairs[0] = ("SERPER_API_KEY", "   ");
        assert!(Config::from_lookup(lookup_from(&pairs)).is_err());
    }

    #[test]
    fn test_max_results_must_be_positive() {
        let mut pairs = minimal();
        pairs.push(("MAX_RESULTS", "0"));
        assert!(Config::from_lookup(lookup_from(&pairs)).is_err());

        let mut pairs = minimal();
        pairs.push(("MAX_RESULTS", "many"));
        assert!(Config::from_lookup(lookup_from(&pairs)).is_err());
    }

    #[test]
    fn test_empty_keyword_list_rejected() {
        let mut pairs = minimal();
        pairs[1] = ("JOB_KEYWORDS", " , ,");
        let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(err.to_string().contains("JOB_KEYWORDS"));
    }

    #[test]
    fn test_fuzzy_threshold_bounds() {
        let mut pairs = minimal();
        pairs.push(("FUZZY_DEDUP_THRESHOLD", "0.8"));
        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.fuzzy_dedup_threshold, Some(0.8));

        let mut pairs = minimal();
        pairs.push(("FUZZY_DEDUP_THRESHOLD", "1.5"));
        assert!(Config::from_lookup(lookup_from(&pairs)).is_err());
    }

    #[test]
    fn test_email_settings() {
        let settings = EmailSettings::from_lookup(lookup_from(&[
            ("SMTP_SERVER", "smtp.example.com"),
            ("EMAIL_USER", "alerts@example.com"),
            ("EMAIL_PASS", "hunter2"),
            ("EMAIL_TO", "seeker@example.com"),
        ]))
        .unwrap();
        assert_eq!(settings.port, 587);
        assert_eq!(settings.server, "smtp.example.com");

        let err = EmailSettings::from_lookup(lookup_from(&[("SMTP_SERVER", "smtp.example.com")]))
            .unwrap_err();
        assert!(err.to_string().contains("EMAIL_USER"));
    }

    #[test]
    fn test_parse_list_preserves_order() {
        assert_eq!(parse_list("b, a ,c"), vec!["b", "a", "c"]);
        assert!(parse_list("").is_empty());
    }
}
