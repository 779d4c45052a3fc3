//! SMTP transport. A fresh STARTTLS connection is opened for every message.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use crate::pipeline::notification::{DispatchError, Mailer, OutgoingMail, SenderCredentials};

/// SMTP reply codes that mean the login was refused.
const AUTH_FAILURE_CODES: &[&str] = &["530", "534", "535"];

pub struct SmtpMailer {
    host: String,
    port: u16,
}

impl SmtpMailer {
    pub fn new(host: String, port: u16) -> Self {
        Self { host, port }
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(
        &self,
        credentials: &SenderCredentials,
        mail: &OutgoingMail,
    ) -> Result<(), DispatchError> {
        let message = build_message(credentials, mail)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)
            .map_err(classify)?
            .port(self.port)
            .credentials(Credentials::new(
                credentials.username.clone(),
                credentials.password.clone(),
            ))
            .build();

        debug!("Sending notification via {}:{}", self.host, self.port);
        transport.send(message).await.map_err(classify)?;
        Ok(())
    }
}

fn build_message(
    credentials: &SenderCredentials,
    mail: &OutgoingMail,
) -> Result<Message, DispatchError> {
    let from = credentials
        .username
        .parse::<Mailbox>()
        .map_err(|e| DispatchError::Configuration(format!("invalid sender address: {e}")))?;
    let to = mail
        .to
        .parse::<Mailbox>()
        .map_err(|e| DispatchError::Configuration(format!("invalid recipient address: {e}")))?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(mail.subject.as_str())
        .header(ContentType::TEXT_PLAIN)
        .body(mail.body.clone())
        .map_err(|e| DispatchError::Transport(e.to_string()))
}

fn is_auth_refusal(code: &str) -> bool {
    AUTH_FAILURE_CODES.contains(&code)
}

fn classify(err: lettre::transport::smtp::Error) -> DispatchError {
    let auth_refused = err
        .status()
        .map(|code| is_auth_refusal(&code.to_string()))
        .unwrap_or(false);
    if auth_refused {
        DispatchError::Authentication
    } else {
        DispatchError::Transport(err.to_string())
    }
}
