//! Notification: renders the result letter and optionally dispatches it.
//!
//! Dispatch is attempted at most once. Every failure ends up as
//! `DispatchStatus::Failed`; nothing here aborts the evaluation.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{DispatchMode, SmtpConfig};
use crate::pipeline::models::{Decision, DispatchStatus, Notification, Outcome};

const DEFAULT_CANDIDATE_NAME: &str = "Candidate";

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("authentication")]
    Authentication,

    #[error("{0}")]
    Transport(String),
}

/// Sender identity and credential for the mail transport.
#[derive(Debug, Clone)]
pub struct SenderCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// A transport that delivers one message per call.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(
        &self,
        credentials: &SenderCredentials,
        mail: &OutgoingMail,
    ) -> Result<(), DispatchError>;
}

/// Renders notifications and decides whether to hand them to the `Mailer`.
pub struct Notifier {
    mode: DispatchMode,
    credentials: Option<SenderCredentials>,
    mailer: Arc<dyn Mailer>,
}

impl Notifier {
    pub fn new(
        mode: DispatchMode,
        credentials: Option<SenderCredentials>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            mode,
            credentials,
            mailer,
        }
    }

    /// Builds a notifier from SMTP settings. Credentials are kept only when both
    /// the identity and the secret are present.
    pub fn from_config(smtp: &SmtpConfig, mailer: Arc<dyn Mailer>) -> Self {
        let credentials = match (&smtp.username, &smtp.password) {
            (Some(username), Some(password)) => Some(SenderCredentials {
                username: username.clone(),
                password: password.clone(),
            }),
            _ => None,
        };
        Self::new(smtp.dispatch, credentials, mailer)
    }

    /// Renders the notification without handing it to the transport,
    /// whatever the dispatch mode.
    pub fn render(
        &self,
        decision: &Decision,
        candidate_name: &str,
        candidate_email: &str,
    ) -> Notification {
        Notification {
            recipient: candidate_email.to_string(),
            subject: render_subject(decision.decision),
            body: render_body(decision, candidate_name),
            dispatch_status: DispatchStatus::Simulated,
        }
    }

    pub async fn notify(
        &self,
        decision: &Decision,
        candidate_name: &str,
        candidate_email: &str,
    ) -> Notification {
        let mut notification = self.render(decision, candidate_name, candidate_email);

        if self.mode == DispatchMode::Enabled {
            let mail = OutgoingMail {
                to: candidate_email.trim().to_string(),
                subject: notification.subject.clone(),
                body: notification.body.clone(),
            };
            notification.dispatch_status = match self.dispatch(&mail).await {
                Ok(()) => DispatchStatus::Sent,
                Err(e) => {
                    warn!("Notification dispatch failed: {e}");
                    DispatchStatus::Failed(e.to_string())
                }
            };
        }
        info!("Notification prepared ({})", notification.dispatch_status);

        notification
    }

    async fn dispatch(&self, mail: &OutgoingMail) -> Result<(), DispatchError> {
        if mail.to.is_empty() {
            return Err(DispatchError::Configuration(
                "recipient address missing".to_string(),
            ));
        }
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            DispatchError::Configuration("sender credentials missing".to_string())
        })?;
        self.mailer.send(credentials, mail).await
    }
}

pub fn render_subject(outcome: Outcome) -> String {
    format!("Application Update — Your Result: {outcome}")
}

pub fn render_body(decision: &Decision, candidate_name: &str) -> String {
    let name = match candidate_name.trim() {
        "" => DEFAULT_CANDIDATE_NAME,
        name => name,
    };
    let score = decision.score;
    let feedback = &decision.feedback;

    match decision.decision {
        Outcome::Accepted => format!(
            "Dear {name},\n\n\
             Congratulations!\n\n\
             After reviewing your resume and qualifications, we are pleased to inform you \
             that your application has been shortlisted.\n\n\
             Your evaluation score: {score}/100\n\
             Feedback: {feedback}\n\n\
             Our recruitment team will reach out to you soon for the next steps.\n\n\
             Regards,\n\
             HR Team"
        ),
        Outcome::Rejected => format!(
            "Dear {name},\n\n\
             Thank you for applying for this position.\n\
             After evaluation, we regret to inform you that your profile was not \
             shortlisted at this time.\n\n\
             Your evaluation score: {score}/100\n\
             Feedback: {feedback}\n\n\
             We encourage you to apply again in the future.\n\n\
             Regards,\n\
             HR Team"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::decision::decide;
    use crate::pipeline::models::MatchResult;
    use crate::pipeline::testing::RecordingMailer;

    fn decision(score: u8) -> Decision {
        decide(&MatchResult {
            score,
            reasoning: "r".to_string(),
        })
    }

    fn credentials() -> Option<SenderCredentials> {
        Some(SenderCredentials {
            username: "hr@acme.test".to_string(),
            password: "secret".to_string(),
        })
    }

    #[test]
    fn test_subject_format() {
        assert_eq!(
            render_subject(Outcome::Accepted),
            "Application Update — Your Result: Accepted"
        );
        assert_eq!(
            render_subject(Outcome::Rejected),
            "Application Update — Your Result: Rejected"
        );
    }

    #[test]
    fn test_accepted_body() {
        let body = render_body(&decision(82), "Jane Doe");
        assert!(body.starts_with("Dear Jane Doe,\n\nCongratulations!"));
        assert!(body.contains("Your evaluation score: 82/100\n"));
        assert!(body.contains("Feedback: Strong match"));
        assert!(body.ends_with("Regards,\nHR Team"));
    }

    #[test]
    fn test_rejected_body_and_default_name() {
        let body = render_body(&decision(40), "  ");
        assert!(body.starts_with("Dear Candidate,\n\nThank you for applying"));
        assert!(body.contains("was not shortlisted at this time."));
        assert!(body.contains("Your evaluation score: 40/100"));
        assert!(body.contains("apply again in the future"));
    }

    #[tokio::test]
    async fn test_disabled_never_calls_transport() {
        let mailer = Arc::new(RecordingMailer::succeeding());
        let notifier = Notifier::new(DispatchMode::Disabled, credentials(), mailer.clone());

        let n = notifier.notify(&decision(90), "Jane", "jane@x.com").await;
        assert_eq!(n.dispatch_status, DispatchStatus::Simulated);
        assert_eq!(n.recipient, "jane@x.com");
        assert_eq!(mailer.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_enabled_sends_once() {
        let mailer = Arc::new(RecordingMailer::succeeding());
        let notifier = Notifier::new(DispatchMode::Enabled, credentials(), mailer.clone());

        let n = notifier.notify(&decision(90), "Jane", "jane@x.com").await;
        assert_eq!(n.dispatch_status, DispatchStatus::Sent);
        assert_eq!(mailer.sent_count(), 1);
        let sent = mailer.sent();
        assert_eq!(sent[0].to, "jane@x.com");
        assert_eq!(sent[0].subject, "Application Update — Your Result: Accepted");
    }

    #[test]
    fn test_render_never_dispatches_when_enabled() {
        let mailer = Arc::new(RecordingMailer::succeeding());
        let notifier = Notifier::new(DispatchMode::Enabled, credentials(), mailer.clone());

        let n = notifier.render(&decision(90), "Jane", "jane@x.com");
        assert_eq!(n.dispatch_status, DispatchStatus::Simulated);
        assert!(n.body.starts_with("Dear Jane,"));
        assert_eq!(mailer.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_enabled_missing_recipient_skips_transport() {
        let mailer = Arc::new(RecordingMailer::succeeding());
        let notifier = Notifier::new(DispatchMode::Enabled, credentials(), mailer.clone());

        let n = notifier.notify(&decision(90), "Jane", "").await;
        match n.dispatch_status {
            DispatchStatus::Failed(reason) => assert!(reason.contains("configuration error")),
            other => panic!("Expected Failed, got {other:?}"),
        }
        assert_eq!(mailer.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_enabled_missing_credentials_skips_transport() {
        let mailer = Arc::new(RecordingMailer::succeeding());
        let notifier = Notifier::new(DispatchMode::Enabled, None, mailer.clone());

        let n = notifier.notify(&decision(50), "Jane", "jane@x.com").await;
        assert_eq!(
            n.dispatch_status,
            DispatchStatus::Failed("configuration error: sender credentials missing".to_string())
        );
        assert_eq!(mailer.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_authentication_failure_reported() {
        let mailer = Arc::new(RecordingMailer::failing(|| DispatchError::Authentication));
        let notifier = Notifier::new(DispatchMode::Enabled, credentials(), mailer.clone());

        let n = notifier.notify(&decision(50), "Jane", "jane@x.com").await;
        assert_eq!(n.dispatch_status, DispatchStatus::Failed("authentication".to_string()));
        assert_eq!(mailer.sent_count(), 1);
    }

    #[tokio::test]
    async fn test_other_transport_failure_keeps_message() {
        let mailer = Arc::new(RecordingMailer::failing(|| {
            DispatchError::Transport("connection refused".to_string())
        }));
        let notifier = Notifier::new(DispatchMode::Enabled, credentials(), mailer.clone());

        let n = notifier.notify(&decision(50), "Jane", "jane@x.com").await;
        assert_eq!(
            n.dispatch_status,
            DispatchStatus::Failed("connection refused".to_string())
        );
    }

    #[test]
    fn test_from_config_requires_both_identity_and_secret() {
        let smtp = SmtpConfig {
            host: "smtp.test".to_string(),
            port: 587,
            username: Some("hr@acme.test".to_string()),
            password: None,
            dispatch: DispatchMode::Enabled,
        };
        let notifier = Notifier::from_config(&smtp, Arc::new(RecordingMailer::succeeding()));
        assert!(notifier.credentials.is_none());
        assert_eq!(notifier.mode, DispatchMode::Enabled);
    }
}
