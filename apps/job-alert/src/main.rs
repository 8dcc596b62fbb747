mod config;
mod consolidation;
mod digest;
mod email;
mod errors;
mod llm_client;
mod models;
mod search;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use tracing::{info, info_span, warn, Instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use crate::config::{Config, EmailSettings};
use crate::consolidation::pipeline::{consolidate, ConsolidationOptions};
use crate::digest::html::{render_enhanced, render_simple, DigestContext};
use crate::digest::subject_line;
use crate::digest::summarizer::Summarizer;
use crate::email::EmailSender;
use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::search::serper::SerperClient;
use crate::search::SearchError;

/// Search for jobs, rank them, and mail an HTML digest.
#[derive(Debug, Parser)]
#[command(name = "job-alert", version, about)]
struct Cli {
    /// Render the digest without sending email.
    #[arg(long)]
    dry_run: bool,

    /// Where to write the HTML in dry-run mode (stdout if omitted).
    #[arg(long, value_name = "PATH", requires = "dry_run")]
    out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting job-alert v{}", env!("CARGO_PKG_VERSION"));

    let span = info_span!("run", run_id = %Uuid::new_v4());
    run(cli, config).instrument(span).await?;
    Ok(())
}

async fn run(cli: Cli, config: Config) -> Result<(), AppError> {
    info!(
        "Search parameters - Keywords: {:?}, Locations: {:?}, Max results: {}",
        config.keywords, config.locations, config.max_results
    );

    // Email settings are checked up front so a bad setup fails before any query
    let sender = if cli.dry_run {
        info!("Dry run: email delivery disabled");
        None
    } else {
        let settings = EmailSettings::from_env().map_err(AppError::config)?;
        Some(EmailSender::new(settings))
    };

    let search = SerperClient::new(
        config.serper_api_key.clone(),
        Duration::from_secs(config.search_timeout_secs),
    )
    .map_err(|e| match e {
        SearchError::MissingApiKey => AppError::config(e),
        other => AppError::Search(other),
    })?;

    let options = ConsolidationOptions {
        similarity_threshold: config.fuzzy_dedup_threshold,
        ..ConsolidationOptions::new(config.max_results)
    };
    let results = consolidate(&search, &config.keywords, &config.locations, &options).await;
    info!(
        queries_issued = results.stats.queries_issued,
        queries_failed = results.stats.queries_failed,
        duplicates_skipped = results.stats.duplicates_skipped,
        early_exit = results.stats.early_exit,
        "Job search completed. Found {} job listings",
        results.jobs.len()
    );

    let today = Utc::now().date_naive();
    let ctx = DigestContext {
        recipient_name: &config.recipient_name,
        keywords: &config.keywords,
        locations: &config.locations,
        date: today,
    };

    let summary = if results.jobs.is_empty() {
        warn!("No jobs found, skipping summarization");
        None
    } else {
        let llm = LlmClient::new(
            config.ollama_url.clone(),
            config.ollama_model.clone(),
            Duration::from_secs(config.llm_timeout_secs),
        )?;
        info!("LLM client initialized (model: {})", llm.model());
        Summarizer::new(llm, config.summary_prompts.clone())
            .summarize(&results.jobs)
            .await
    };

    info!("Formatting email with HTML template...");
    let html = match &summary {
        Some(summary) => render_enhanced(&ctx, summary),
        None => render_simple(&ctx, &results.jobs),
    };
    let subject = subject_line(results.jobs.len(), today);

    match sender {
        Some(sender) => {
            info!("Preparing to send email digest...");
            sender.send(&subject, &html).await?;
        }
        None => write_dry_run(cli.out.as_deref(), &subject, &html).await?,
    }

    info!("Job Alert System completed successfully");
    Ok(())
}

async fn write_dry_run(
    out: Option<&std::path::Path>,
    subject: &str,
    html: &str,
) -> Result<(), AppError> {
    match out {
        Some(path) => {
            tokio::fs::write(path, html)
                .await
                .map_err(|e| anyhow::anyhow!("Could not write {}: {e}", path.display()))?;
            info!("Digest '{}' written to {}", subject, path.display());
        }
        None => {
            info!("Digest '{}' written to stdout", subject);
            println!("{html}");
        }
    }
    Ok(())
}
