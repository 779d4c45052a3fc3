//! Structured extraction: turns raw resume text into a `CandidateSummary`.

use tracing::{info, warn};

use crate::llm_client::{LlmError, TextCompletion};
use crate::pipeline::models::CandidateSummary;
use crate::pipeline::parsing::{parse_reply, Parsed};
use crate::pipeline::prompts::{fill, SUMMARIZE_PROMPT_TEMPLATE};

/// Summarises a resume. Malformed replies degrade to the "Parsing failed"
/// sentinel; backend errors are returned to the caller untouched.
pub async fn summarize_resume(
    llm: &dyn TextCompletion,
    resume_text: &str,
) -> Result<CandidateSummary, LlmError> {
    let prompt = fill(SUMMARIZE_PROMPT_TEMPLATE, &[("resume_text", resume_text)]);
    let reply = llm.complete(&prompt).await?;

    let parsed = parse_reply::<CandidateSummary>(&reply);
    if matches!(parsed, Parsed::Fallback) {
        warn!("Resume summary reply was not parseable, using sentinel");
    }
    info!("Resume summarised (parse tier: {})", parsed.tier());

    Ok(parsed.unwrap_or_else(CandidateSummary::parsing_failed))
}
