// Summarizer prompt templates.

/// Default system message. Overridable via SUMMARIZER_SYSTEM_MESSAGE.
pub const SUMMARIZER_SYSTEM: &str = "You are a professional job market analyst. \
    Your task is to analyze job listings and create structured summaries.";

/// Default prompt intro. Overridable via SUMMARIZER_PROMPT_INTRO.
pub const SUMMARIZER_INTRO: &str =
    "Please analyze the following job listings and provide a comprehensive summary.";

/// Summary prompt template.
/// Replace: {system_message}, {json_instruction}, {prompt_intro}, {jobs_json}
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"{system_message}

IMPORTANT: Format your response as JSON with the following structure:
{
  "summary": "Brief overview of job market for these searches",
  "jobs": [
    {
      "title": "Job Title",
      "company": "Company Name (if available)",
      "location": "Location",
      "description": "Brief 1-2 sentence description",
      "url": "Application URL",
      "salary": "Salary range (if mentioned)",
      "employment_type": "Full-time/Part-time/Contract/Remote (if mentioned)",
      "relevance_score": relevance_score_from_original_data
    }
  ]
}
{json_instruction}

{prompt_intro}

{jobs_json}"#;
