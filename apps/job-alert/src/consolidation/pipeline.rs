//! Consolidation Pipeline — extraction → dedup → scoring → global sort → truncation
//! across the whole query plan.
//!
//! Queries run one at a time in plan order. Once `max_results` jobs have been
//! kept, no further queries are issued. The final set is therefore the best of
//! the jobs actually examined, not a guaranteed global top-K.

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::consolidation::dedup::Deduplicator;
use crate::consolidation::extract::build_record;
use crate::consolidation::scoring::RelevanceScorer;
use crate::models::job::{query_plan, JobRecord, ResultSet};
use crate::search::SearchSource;

/// Run-level knobs for one consolidation pass.
#[derive(Debug, Clone)]
pub struct ConsolidationOptions {
    pub max_results: usize,
    /// Enables the secondary fuzzy title check in the deduplicator.
    pub similarity_threshold: Option<f64>,
}

impl ConsolidationOptions {
    pub fn new(max_results: usize) -> Self {
        Self {
            max_results,
            similarity_threshold: None,
        }
    }
}

/// Counters describing what one run did.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConsolidationStats {
    pub queries_planned: usize,
    pub queries_issued: usize,
    pub queries_failed: usize,
    pub hits_received: usize,
    pub duplicates_skipped: usize,
    /// Subset of `duplicates_skipped` caught by the fuzzy title check.
    pub similar_duplicates_skipped: usize,
    /// Jobs accumulated before the final truncation.
    pub jobs_kept: usize,
    pub early_exit: bool,
}

#[derive(Debug, Clone)]
pub struct ConsolidatedResults {
    pub jobs: ResultSet,
    pub stats: ConsolidationStats,
}

/// Runs the full query plan against `source` and returns a deduplicated,
/// score-sorted result set of at most `options.max_results` jobs.
///
/// A failing query is logged and treated as zero hits.
pub async fn consolidate(
    source: &dyn SearchSource,
    keywords: &[String],
    locations: &[String],
    options: &ConsolidationOptions,
) -> ConsolidatedResults {
    let max_results = options.max_results;
    let plan = query_plan(keywords, locations);
    let scorer = RelevanceScorer::new(keywords);
    let mut dedup = match options.similarity_threshold {
        Some(threshold) => Deduplicator::with_similarity_threshold(threshold),
        None => Deduplicator::new(),
    };

    let mut stats = ConsolidationStats {
        queries_planned: plan.len(),
        ..ConsolidationStats::default()
    };
    let mut accumulated: Vec<JobRecord> = Vec::new();

    for (i, query) in plan.iter().enumerate() {
        let text = query.text();
        info!("Search {}/{}: '{}'", i + 1, plan.len(), text);
        stats.queries_issued += 1;

        let hits = match source.search(&text, max_results).await {
            Ok(hits) => hits,
            Err(e) => {
                error!("Error during search for '{}': {}", text, e);
                stats.queries_failed += 1;
                continue;
            }
        };
        info!("Received {} results for query: '{}'", hits.len(), text);
        stats.hits_received += hits.len();

        let found_at = Utc::now();
        for hit in &hits {
            let mut job = build_record(hit, query, found_at);

            if dedup.is_duplicate(&job) {
                info!("Skipping duplicate job: {}", job.title);
                stats.duplicates_skipped += 1;
                continue;
            }

            let score = scorer.score(&job);
            job.relevance_score = Some(score);
            info!("Job '{}' - Relevance Score: {}", job.title, score);
            accumulated.push(job);
        }

        if accumulated.len() >= max_results {
            info!("Reached maximum results limit ({}), stopping search", max_results);
            stats.early_exit = i + 1 < plan.len();
            break;
        }
    }

    stats.jobs_kept = accumulated.len();
    stats.similar_duplicates_skipped = dedup.similar_skipped();
    debug!("Deduplicator tracked {} unique jobs", dedup.seen_count());
    let jobs = rank_and_truncate(accumulated, max_results);

    info!(
        "Job search completed. Returning {} unique, scored results",
        jobs.len()
    );
    if let Some((min, max, avg)) = score_distribution(&jobs) {
        info!("Relevance scores - Min: {}, Max: {}, Avg: {:.2}", min, max, avg);
    }

    ConsolidatedResults { jobs, stats }
}

/// Stable sort by score descending (ties keep encounter order), then cap.
pub fn rank_and_truncate(mut jobs: Vec<JobRecord>, max_results: usize) -> ResultSet {
    jobs.sort_by(|a, b| b.score().total_cmp(&a.score()));
    jobs.truncate(max_results);
    jobs
}

/// (min, max, average) relevance score, or `None` for an empty set.
pub fn score_distribution(jobs: &[JobRecord]) -> Option<(f64, f64, f64)> {
    if jobs.is_empty() {
        return None;
    }
    let scores = jobs.iter().map(JobRecord::score);
    let min = scores.clone().fold(f64::INFINITY, f64::min);
    let max = scores.clone().fold(f64::NEG_INFINITY, f64::max);
    let avg = scores.sum::<f64>() / jobs.len() as f64;
    Some((min, max, avg))
}
