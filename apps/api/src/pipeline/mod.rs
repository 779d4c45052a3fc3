//! Evaluation pipeline: summarise → score → decide → notify.
//!
//! Stages run strictly in order within one evaluation, each producing exactly
//! one record that later stages read. Only the two completion calls can fail
//! the evaluation; every other failure degrades to a sentinel or a status.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::llm_client::{LlmError, TextCompletion};

pub mod decision;
pub mod extraction;
pub mod handlers;
pub mod mailer;
pub mod models;
pub mod notification;
pub mod parsing;
pub mod prompts;
pub mod scoring;

#[cfg(test)]
pub mod testing;

use models::{CandidateSummary, Decision, JobRequirements, MatchResult, Notification};
use notification::Notifier;

/// Everything one evaluation saw and produced.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineContext {
    pub evaluation_id: Uuid,
    pub evaluated_at: DateTime<Utc>,
    pub resume_text: String,
    pub job_requirements: JobRequirements,
    pub candidate_name: String,
    pub candidate_email: String,
    pub resume_summary: CandidateSummary,
    pub match_result: MatchResult,
    pub decision_result: Decision,
    pub email_content: Notification,
}

/// The stage sequence plus its collaborators. Cheap to clone; holds no
/// per-evaluation state, so concurrent evaluations need no coordination.
#[derive(Clone)]
pub struct Pipeline {
    llm: Arc<dyn TextCompletion>,
    notifier: Arc<Notifier>,
}

impl Pipeline {
    pub fn new(llm: Arc<dyn TextCompletion>, notifier: Arc<Notifier>) -> Self {
        Self { llm, notifier }
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Evaluates one candidate against one job.
    pub async fn run(
        &self,
        resume_text: String,
        job_requirements: JobRequirements,
        candidate_name: String,
        candidate_email: String,
    ) -> Result<PipelineContext, LlmError> {
        let evaluation_id = Uuid::new_v4();
        info!(
            "Evaluation {evaluation_id} started for '{}'",
            job_requirements.title
        );

        let resume_summary = extraction::summarize_resume(self.llm.as_ref(), &resume_text).await?;
        let match_result =
            scoring::score_candidate(self.llm.as_ref(), &resume_summary, &job_requirements).await?;
        let decision_result = decision::decide(&match_result);
        let email_content = self
            .notifier
            .notify(&decision_result, &candidate_name, &candidate_email)
            .await;

        info!(
            "Evaluation {evaluation_id} finished: {}",
            decision_result.decision
        );

        Ok(PipelineContext {
            evaluation_id,
            evaluated_at: Utc::now(),
            resume_text,
            job_requirements,
            candidate_name,
            candidate_email,
            resume_summary,
            match_result,
            decision_result,
            email_content,
        })
    }
}
