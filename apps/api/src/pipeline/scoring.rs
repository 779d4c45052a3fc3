//! Scoring: rates a `CandidateSummary` against `JobRequirements`.

use tracing::{info, warn};

use crate::llm_client::{LlmError, TextCompletion};
use crate::pipeline::models::{CandidateSummary, JobRequirements, MatchResult};
use crate::pipeline::parsing::{parse_reply, Parsed};
use crate::pipeline::prompts::{fill, MATCH_PROMPT_TEMPLATE};

pub async fn score_candidate(
    llm: &dyn TextCompletion,
    summary: &CandidateSummary,
    job: &JobRequirements,
) -> Result<MatchResult, LlmError> {
    let prompt = build_match_prompt(summary, job)?;
    let reply = llm.complete(&prompt).await?;

    let parsed = parse_reply::<MatchResult>(&reply);
    if matches!(parsed, Parsed::Fallback) {
        warn!("Match reply was not parseable, using sentinel");
    }
    let result = parsed.unwrap_or_else(MatchResult::parsing_failed);
    info!("Candidate scored {}/100", result.score);

    Ok(result)
}

fn build_match_prompt(summary: &CandidateSummary, job: &JobRequirements) -> Result<String, LlmError> {
    let candidate_json = serde_json::to_string(summary)?;
    Ok(fill(
        MATCH_PROMPT_TEMPLATE,
        &[
            ("title", job.title.as_str()),
            ("description", job.description.as_str()),
            ("must_have_skills", job.must_have_skills.as_str()),
            ("candidate_json", candidate_json.as_str()),
        ],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testing::ScriptedCompletion;

    fn job() -> JobRequirements {
        JobRequirements {
            title: "Backend Engineer".to_string(),
            description: "Build APIs".to_string(),
            must_have_skills: "Python".to_string(),
        }
    }

    #[test]
    fn test_prompt_embeds_job_and_serialized_summary() {
        let summary = CandidateSummary {
            summary: "Dev".to_string(),
            skills: vec!["Python".to_string()],
            experience_years: 5,
            education: "BSc".to_string(),
        };
        let prompt = build_match_prompt(&summary, &job()).unwrap();
        assert!(prompt.contains("Job Title: Backend Engineer"));
        assert!(prompt.contains("Description: Build APIs"));
        assert!(prompt.contains("Must-have Skills: Python"));
        assert!(prompt.contains(r#""experience_years":5"#));
        assert!(prompt.contains(r#"{ "score": <integer>, "reasoning": "<2-line explanation>" }"#));
    }

    #[test]
    fn test_placeholder_text_in_job_fields_stays_literal() {
        let job = JobRequirements {
            title: "Lead {candidate_json}".to_string(),
            description: "Owns {must_have_skills} hiring".to_string(),
            must_have_skills: "Rust".to_string(),
        };
        let prompt = build_match_prompt(&CandidateSummary::default(), &job).unwrap();
        assert!(prompt.contains("Job Title: Lead {candidate_json}\n"));
        assert!(prompt.contains("Description: Owns {must_have_skills} hiring\n"));
        assert!(prompt.contains("Must-have Skills: Rust\n"));
        assert_eq!(prompt.matches(r#""experience_years":0"#).count(), 1);
    }

    #[tokio::test]
    async fn test_json_embedded_in_prose_is_extracted() {
        let llm = ScriptedCompletion::new([r#"Sure! {"score": 85, "reasoning": "Good fit"} Hope that helps"#]);
        let result = score_candidate(&llm, &CandidateSummary::default(), &job())
            .await
            .unwrap();
        assert_eq!(
            result,
            MatchResult {
                score: 85,
                reasoning: "Good fit".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_unparseable_reply_yields_parsing_failed() {
        let llm = ScriptedCompletion::new(["no idea"]);
        let result = score_candidate(&llm, &CandidateSummary::default(), &job())
            .await
            .unwrap();
        assert_eq!(result, MatchResult::parsing_failed());
    }

    #[tokio::test]
    async fn test_backend_failure_propagates() {
        let llm = ScriptedCompletion::failing(529, "overloaded");
        let result = score_candidate(&llm, &CandidateSummary::default(), &job()).await;
        assert!(matches!(result, Err(LlmError::Api { status: 529, .. })));
    }
}
