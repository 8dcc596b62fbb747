use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};
use strsim::normalized_levenshtein;
use tracing::info;

use crate::models::job::JobRecord;

static RE_NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());

/// Why a job was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum DuplicateKind {
    /// Same normalized (title, company, location) triple.
    Exact,
    /// Normalized title is at least `threshold` similar to one already kept.
    Similar { score: f64 },
}

/// Per-run duplicate detector.
///
/// Construct one per pipeline run; the seen-set spans every query of that run
/// and is dropped with it.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen_keys: HashSet<String>,
    seen_titles: Vec<String>,
    similarity_threshold: Option<f64>,
    similar_skipped: usize,
}

impl Deduplicator {
    /// Exact composite-key matching only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a secondary title-similarity check: a job whose normalized title is
    /// at least `threshold` similar (normalized Levenshtein) to an already kept
    /// title is rejected even when its identity key is new.
    pub fn with_similarity_threshold(threshold: f64) -> Self {
        Self {
            similarity_threshold: Some(threshold),
            ..Self::default()
        }
    }

    pub fn is_duplicate(&mut self, job: &JobRecord) -> bool {
        match self.check(job) {
            Some(DuplicateKind::Exact) => {
                info!("Exact duplicate found: {}", job.title);
                true
            }
            Some(DuplicateKind::Similar { score }) => {
                info!("Similar duplicate found ({:.2}): {}", score, job.title);
                self.similar_skipped += 1;
                true
            }
            None => false,
        }
    }

    /// Checks `job` against everything seen so far in this run and registers it
    /// when it is new. A rejected job leaves the seen-set untouched.
    pub fn check(&mut self, job: &JobRecord) -> Option<DuplicateKind> {
        let key = identity_key(job);

        if self.seen_keys.contains(&key) {
            return Some(DuplicateKind::Exact);
        }

        let title = normalize_text(&job.title);
        if let Some(threshold) = self.similarity_threshold {
            let best = self
                .seen_titles
                .iter()
                .map(|seen| normalized_levenshtein(&title, seen))
                .fold(0.0_f64, f64::max);
            if best >= threshold {
                return Some(DuplicateKind::Similar { score: best });
            }
        }

        self.seen_keys.insert(key);
        if self.similarity_threshold.is_some() {
            self.seen_titles.push(title);
        }
        None
    }

    pub fn seen_count(&self) -> usize {
        self.seen_keys.len()
    }

    /// Jobs rejected by the fuzzy title check alone.
    pub fn similar_skipped(&self) -> usize {
        self.similar_skipped
    }
}

/// Lowercase, trim, then drop everything that is not a word character or whitespace.
pub fn normalize_text(text: &str) -> String {
    RE_NON_WORD
        .replace_all(text.trim().to_lowercase().as_str(), "")
        .into_owned()
}

/// SHA-256 (hex) of the normalized `title|company|location` composite.
pub fn identity_key(job: &JobRecord) -> String {
    let composite = format!(
        "{}|{}|{}",
        normalize_text(&job.title),
        normalize_text(&job.company),
        normalize_text(&job.location)
    );
    let mut hasher = Sha256::new();
    hasher.update(composite.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}
