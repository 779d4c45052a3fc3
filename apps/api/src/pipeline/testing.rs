//! Test doubles for the completion backend and the mail transport.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm_client::{LlmError, TextCompletion};
use crate::pipeline::notification::{DispatchError, Mailer, OutgoingMail, SenderCredentials};

/// Replays canned replies in order and records every prompt it receives.
pub struct ScriptedCompletion {
    replies: Mutex<VecDeque<Result<String, (u16, String)>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedCompletion {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails with the given API status.
    pub fn failing(status: u16, message: &str) -> Self {
        Self {
            replies: Mutex::new(VecDeque::from([Err((status, message.to_string()))])),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextCompletion for ScriptedCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let mut replies = self.replies.lock().unwrap();
        match replies.pop_front() {
            Some(Ok(reply)) => Ok(reply.trim().to_string()),
            Some(Err((status, message))) => {
                replies.push_front(Err((status, message.clone())));
                Err(LlmError::Api { status, message })
            }
            None => Err(LlmError::EmptyContent),
        }
    }
}

/// Records sent mail; optionally fails every send.
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
    failure: Option<fn() -> DispatchError>,
}

impl RecordingMailer {
    pub fn succeeding() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failure: None,
        }
    }

    pub fn failing(failure: fn() -> DispatchError) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failure: Some(failure),
        }
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(
        &self,
        _credentials: &SenderCredentials,
        mail: &OutgoingMail,
    ) -> Result<(), DispatchError> {
        self.sent.lock().unwrap().push(mail.clone());
        match self.failure {
            Some(failure) => Err(failure()),
            None => Ok(()),
        }
    }
}
