//! Decision policy: deterministic mapping from score to outcome. No I/O.

use tracing::info;

use crate::pipeline::models::{Decision, MatchResult, Outcome};

/// Minimum score for an `Accepted` outcome.
pub const ACCEPT_THRESHOLD: u8 = 70;

pub const ACCEPTED_FEEDBACK: &str =
    "Strong match — consider inviting the candidate for an interview.";
pub const REJECTED_FEEDBACK: &str = "Profile does not fully meet role requirements. \
    Candidate may need more experience or key skills.";

pub fn outcome_for(score: u8) -> Outcome {
    if score >= ACCEPT_THRESHOLD {
        Outcome::Accepted
    } else {
        Outcome::Rejected
    }
}

pub fn feedback_for(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Accepted => ACCEPTED_FEEDBACK,
        Outcome::Rejected => REJECTED_FEEDBACK,
    }
}

pub fn decide(result: &MatchResult) -> Decision {
    let decision = outcome_for(result.score);
    info!(
        "Decision: {decision} (score {}, threshold {ACCEPT_THRESHOLD})",
        result.score
    );

    Decision {
        decision,
        threshold: ACCEPT_THRESHOLD,
        score: result.score,
        feedback: feedback_for(decision).to_string(),
        reasoning: result.reasoning.clone(),
    }
}
