//! HTML digest rendering.
//!
//! Two entry points: `render_enhanced` for a parsed LLM summary and
//! `render_simple` for the raw result set when no summary is available.
//! All interpolated text is escaped.

use chrono::NaiveDate;
use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::digest::DigestSummary;
use crate::models::job::JobRecord;

const SIMPLE_SUMMARY: &str = "We found new job opportunities matching your search criteria.";
const DEFAULT_SUMMARY: &str = "New job opportunities found for your search criteria.";

/// Everything the page chrome needs besides the job cards.
#[derive(Debug, Clone)]
pub struct DigestContext<'a> {
    pub recipient_name: &'a str,
    pub keywords: &'a [String],
    pub locations: &'a [String],
    pub date: NaiveDate,
}

/// Score badge colour: green ≥ 75, orange ≥ 50, red ≥ 25, grey below.
pub fn score_color(score: f64) -> &'static str {
    if score >= 75.0 {
        "#059669"
    } else if score >= 50.0 {
        "#D97706"
    } else if score >= 25.0 {
        "#DC2626"
    } else {
        "#6B7280"
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}

pub fn render_enhanced(ctx: &DigestContext<'_>, summary: &DigestSummary) -> String {
    let cards: String = summary
        .jobs
        .iter()
        .map(|job| {
            job_card(&JobCard {
                title: or_default(&job.title, "Job Title Not Available"),
                score: job.relevance_score.unwrap_or(0.0),
                badge: job.employment_type.clone(),
                company: &job.company,
                location: or_default(&job.location, "Not specified"),
                salary: &job.salary,
                description: or_default(&job.description, "No description available"),
                url: &job.url,
            })
        })
        .collect();

    let intro = or_default(&summary.summary, DEFAULT_SUMMARY);
    page(ctx, summary.jobs.len(), intro, &cards)
}

pub fn render_simple(ctx: &DigestContext<'_>, jobs: &[JobRecord]) -> String {
    let cards: String = jobs
        .iter()
        .map(|job| {
            let badge: Vec<&str> = job
                .employment_type
                .map(|t| t.as_str())
                .into_iter()
                .chain((!job.salary.is_empty()).then_some(job.salary.as_str()))
                .collect();
            job_card(&JobCard {
                title: &job.title,
                score: job.score(),
                badge: badge.join(" | "),
                company: &job.company,
                location: or_default(&job.location, "Not specified"),
                salary: "",
                description: &job.snippet,
                url: &job.url,
            })
        })
        .collect();

    page(ctx, jobs.len(), SIMPLE_SUMMARY, &cards)
}

struct JobCard<'a> {
    title: &'a str,
    score: f64,
    badge: String,
    company: &'a str,
    location: &'a str,
    salary: &'a str,
    description: &'a str,
    url: &'a str,
}

fn job_card(card: &JobCard<'_>) -> String {
    let badge = if card.badge.is_empty() {
        String::new()
    } else {
        format!(
            r#"<span style="background:#EEF2FF;color:#4F46E5;padding:4px 12px;border-radius:20px;font-size:12px;">{}</span>"#,
            encode_text(&card.badge)
        )
    };
    let company = optional_line("Company", card.company);
    let salary = optional_line("Salary", card.salary);

    format!(
        r#"
<div style="background:white;border-radius:12px;padding:24px;margin-bottom:20px;border-left:4px solid #4F46E5;">
  <h3 style="margin:0 0 12px 0;color:#1F2937;font-size:18px;">{title}
    <span style="background:{color};color:white;padding:4px 8px;border-radius:12px;font-size:11px;margin-left:8px;">Score: {score}%</span>
  </h3>
  {badge}
  {company}
  <p style="margin:0 0 8px 0;color:#6B7280;font-size:14px;"><strong>Location:</strong> {location}</p>
  {salary}
  <p style="margin:0 0 16px 0;color:#374151;font-size:14px;">{description}</p>
  <a href="{href}" style="display:inline-block;background:#4F46E5;color:white;text-decoration:none;padding:12px 24px;border-radius:8px;">Apply Now →</a>
</div>"#,
        title = encode_text(card.title),
        color = score_color(card.score),
        score = card.score,
        badge = badge,
        company = company,
        location = encode_text(card.location),
        salary = salary,
        description = encode_text(card.description),
        href = encode_double_quoted_attribute(safe_href(card.url)),
    )
}

fn optional_line(label: &str, value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    format!(
        r#"<p style="margin:0 0 8px 0;color:#6B7280;font-size:14px;"><strong>{}:</strong> {}</p>"#,
        label,
        encode_text(value)
    )
}

/// Only http(s) links are rendered; anything else becomes "#".
fn safe_href(url: &str) -> &str {
    let lower = url.trim_start().to_ascii_lowercase();
    if lower.starts_with("https://") || lower.starts_with("http://") {
        url.trim_start()
    } else {
        "#"
    }
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

fn page(ctx: &DigestContext<'_>, job_count: usize, summary: &str, cards: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Job Alert Digest</title>
</head>
<body style="margin:0;padding:0;font-family:-apple-system,'Segoe UI',Roboto,Arial,sans-serif;background-color:#F9FAFB;">
<div style="max-width:600px;margin:0 auto;">
  <div style="background:#4F46E5;padding:32px 24px;text-align:center;">
    <h1 style="margin:0;color:white;font-size:28px;">Your Job Alert Digest</h1>
    <p style="margin:8px 0 0 0;color:#E0E7FF;font-size:16px;">{date}</p>
  </div>
  <div style="padding:32px 24px;">
    <div style="background:white;border-radius:12px;padding:24px;margin-bottom:24px;">
      <h2 style="margin:0 0 12px 0;color:#1F2937;font-size:20px;">Hello {recipient}!</h2>
      <p style="margin:0;color:#6B7280;font-size:16px;">{summary}</p>
    </div>
    <table role="presentation" width="100%" style="margin-bottom:32px;"><tr>
      <td style="background:white;border-radius:12px;padding:20px;text-align:center;">
        <div style="font-size:24px;font-weight:700;color:#4F46E5;">{job_count}</div>
        <div style="font-size:14px;color:#6B7280;">New Jobs</div>
      </td>
      <td style="background:white;border-radius:12px;padding:20px;text-align:center;">
        <div style="font-size:24px;font-weight:700;color:#059669;">{keyword_count}</div>
        <div style="font-size:14px;color:#6B7280;">Keywords</div>
      </td>
    </tr></table>
    <div style="background:#EEF2FF;border-radius:12px;padding:20px;margin-bottom:32px;">
      <h3 style="margin:0 0 12px 0;color:#4338CA;font-size:16px;">Your Search Criteria</h3>
      <p style="margin:0 0 8px 0;color:#6B7280;font-size:14px;"><strong>Keywords:</strong> {keywords}</p>
      <p style="margin:0;color:#6B7280;font-size:14px;"><strong>Locations:</strong> {locations}</p>
    </div>
    <h2 style="margin:0 0 24px 0;color:#1F2937;font-size:22px;">Latest Opportunities (Sorted by Relevance)</h2>
    {cards}
  </div>
  <div style="background:#374151;padding:24px;text-align:center;">
    <p style="margin:0;color:#D1D5DB;font-size:14px;">Job Alert System • Jobs ranked by relevance</p>
  </div>
</div>
</body>
</html>
"#,
        date = format_date(ctx.date),
        recipient = encode_text(ctx.recipient_name),
        summary = encode_text(summary),
        job_count = job_count,
        keyword_count = ctx.keywords.len(),
        keywords = encode_text(&ctx.keywords.join(", ")),
        locations = encode_text(&ctx.locations.join(", ")),
        cards = cards,
    )
}
