//! Relevance Scorer — keyword-driven, field-weighted score in [0, 100].
//!
//! Pure and deterministic: the score depends only on the job's text fields and
//! the keyword list the scorer was built with. Scores from scorers built with
//! different keyword lists are not comparable.

use crate::models::job::JobRecord;

/// Fixed per-field weights.
#[derive(Debug, Clone, Copy)]
pub struct FieldWeights {
    pub title: f64,
    pub company: f64,
    pub snippet: f64,
    pub location: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            title: 3.0,
            company: 1.5,
            snippet: 1.0,
            location: 0.5,
        }
    }
}

impl FieldWeights {
    fn sum(&self) -> f64 {
        self.title + self.company + self.snippet + self.location
    }
}

const EXACT_MATCH_BONUS: f64 = 2.0;

/// Scores jobs against the run's keyword list.
///
/// Algorithm, per weighted field (title, company, snippet, location):
/// 1. empty field → 0
/// 2. for each keyword found as a substring → `+ weight × 2.0`
/// 3. for each multi-word keyword → `+ (tokens present / tokens) × weight`,
///    independent of step 2
///
/// Total = Σ field scores, normalized by Σ(weight × 2.0 × keyword_count),
/// × 100, rounded to 2 decimals and clamped to [0, 100].
#[derive(Debug, Clone)]
pub struct RelevanceScorer {
    keywords: Vec<String>,
    weights: FieldWeights,
}

impl RelevanceScorer {
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Self {
        Self {
            keywords: keywords
                .iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .collect(),
            weights: FieldWeights::default(),
        }
    }

    #[cfg(test)]
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn score(&self, job: &JobRecord) -> f64 {
        let w = &self.weights;
        let raw = self.field_score(&job.title, w.title)
            + self.field_score(&job.company, w.company)
            + self.field_score(&job.snippet, w.snippet)
            + self.field_score(&job.location, w.location);

        let max_possible = w.sum() * EXACT_MATCH_BONUS * self.keywords.len() as f64;
        if max_possible <= 0.0 {
            return 0.0;
        }

        round2(raw / max_possible * 100.0).clamp(0.0, 100.0)
    }

    fn field_score(&self, text: &str, weight: f64) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        let text = text.to_lowercase();

        self.keywords
            .iter()
            .map(|keyword| {
                let mut score = 0.0;
                if text.contains(keyword.as_str()) {
                    score += weight * EXACT_MATCH_BONUS;
                }
                let tokens: Vec<&str> = keyword.split_whitespace().collect();
                if tokens.len() > 1 {
                    let present = tokens.iter().filter(|t| text.contains(**t)).count();
                    score += present as f64 / tokens.len() as f64 * weight;
                }
                score
            })
            .sum()
    }
}

/// Two decimals, ties to even (78.125 → 78.12).
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn job(title: &str, company: &str, snippet: &str, location: &str) -> JobRecord {
        JobRecord {
            title: title.to_string(),
            url: "#".to_string(),
            snippet: snippet.to_string(),
            source: "test".to_string(),
            location: location.to_string(),
            keyword: String::new(),
            date_found: Utc::now(),
            company: company.to_string(),
            employment_type: None,
            salary: String::new(),
            relevance_score: None,
        }
    }

    #[test]
    fn test_empty_keywords_score_zero() {
        let scorer = RelevanceScorer::new::<&str>(&[]);
        let s = scorer.score(&job("Rust Engineer", "Acme", "rust rust rust", "Remote"));
        assert_eq!(s, 0.0);
    }

    #[test]
    fn test_blank_keyword_matches_every_non_empty_field() {
        // title 6.0 + snippet 2.0 + location 1.0 = 9.0 ; max 24.0 → 37.5
        let scorer = RelevanceScorer::new(&["rust", "  "]);
        assert_eq!(scorer.keywords(), &["rust".to_string(), String::new()]);
        assert_eq!(scorer.score(&job("Chef", "", "cooking", "Paris")), 37.5);
    }

    #[test]
    fn test_exact_half_rounds_to_even() {
        // title: 6.0 exact + 3.0 partial ; location: 3/4 × 0.5 = 0.375
        // 9.375 / 12.0 × 100 = 78.125 → 78.12
        let scorer = RelevanceScorer::new(&["alpha beta gamma delta"]);
        let s = scorer.score(&job("alpha beta gamma delta", "", "", "alpha beta gamma"));
        assert_eq!(s, 78.12);
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
    }

    #[test]
    fn test_keywords_are_trimmed_and_lowercased() {
        let scorer = RelevanceScorer::new(&["  Rust ", "GO"]);
        assert_eq!(scorer.keywords(), &["rust".to_string(), "go".to_string()]);
    }

    #[test]
    fn test_title_only_single_keyword() {
        // title: 3.0 * 2.0 = 6.0 ; max = 6.0 * 2.0 * 1 = 12.0 → 50%
        let scorer = RelevanceScorer::new(&["rust"]);
        let s = scorer.score(&job("Rust Engineer", "", "", ""));
        assert_eq!(s, 50.0);
    }

    #[test]
    fn test_partial_multi_word_match() {
        // snippet has "python" but not "developer": 1/2 * 1.0 = 0.5
        // max = 6.0 * 2.0 = 12.0 → 4.17
        let scorer = RelevanceScorer::new(&["python developer"]);
        let s = scorer.score(&job("", "", "We love python", ""));
        assert_eq!(s, 4.17);
    }

    #[test]
    fn test_exact_and_partial_both_fire() {
        // title: 6.0 exact + 3.0 partial = 9.0 ; location "Remote": nothing
        // max 12.0 → 75%
        let scorer = RelevanceScorer::new(&["python developer"]);
        let s = scorer.score(&job("Python Developer", "", "", "Remote"));
        assert_eq!(s, 75.0);
    }

    #[test]
    fn test_score_is_clamped_to_100() {
        let scorer = RelevanceScorer::new(&["python developer"]);
        let text = "python developer";
        let s = scorer.score(&job(text, text, text, text));
        assert_eq!(s, 100.0);
    }

    #[test]
    fn test_rounded_to_two_decimals() {
        let scorer = RelevanceScorer::new(&["rust", "kafka", "aws"]);
        let s = scorer.score(&job("Rust", "", "aws", ""));
        // (6.0 + 2.0) / 36.0 * 100 = 22.222…
        assert_eq!(s, 22.22);
    }

    #[test]
    fn test_score_bounds_hold() {
        let scorer = RelevanceScorer::new(&["rust engineer", "remote", "acme"]);
        let cases = [
            job("", "", "", ""),
            job("Rust Engineer", "Acme", "remote rust engineer at acme", "Remote"),
            job("Chef", "Diner", "cooking", "Paris"),
        ];
        for j in &cases {
            let s = scorer.score(j);
            assert!((0.0..=100.0).contains(&s), "score {s} out of bounds");
        }
    }

    #[test]
    fn test_adding_exact_match_never_decreases_score() {
        let scorer = RelevanceScorer::new(&["kubernetes", "go"]);
        let without = scorer.score(&job("Backend Engineer", "Initech", "python services", "Remote"));
        let with = scorer.score(&job(
            "Backend Engineer kubernetes",
            "Initech",
            "python services",
            "Remote",
        ));
        assert!(with >= without, "{with} < {without}");
    }

    #[test]
    fn test_deterministic() {
        let scorer = RelevanceScorer::new(&["data engineer", "spark"]);
        let j = job("Data Engineer", "Hooli", "Spark and Airflow", "NYC");
        assert_eq!(scorer.score(&j), scorer.score(&j));
    }

    #[test]
    fn test_placeholder_job_scores_low_but_defined() {
        let scorer = RelevanceScorer::new(&["rust developer"]);
        let s = scorer.score(&job(
            "No title available",
            "",
            "No description available",
            "Remote",
        ));
        assert!(s >= 0.0 && s < 10.0, "score was {s}");
    }
}
