use anyhow::{bail, Context, Result};

use crate::llm_client::ANTHROPIC_API_URL;

/// Whether the notification stage may reach a real mail transport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DispatchMode {
    #[default]
    Disabled,
    Enabled,
}

impl DispatchMode {
    /// Parses the `EMAIL_SEND` flag. An unset flag means disabled.
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        let Some(raw) = raw else {
            return Ok(DispatchMode::Disabled);
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "false" | "disabled" => Ok(DispatchMode::Disabled),
            "true" | "enabled" => Ok(DispatchMode::Enabled),
            other => bail!("EMAIL_SEND must be one of true/enabled/false/disabled, got '{other}'"),
        }
    }
}

/// SMTP settings. Identity and credential are only required once dispatch is enabled.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub dispatch: DispatchMode,
}

/// Application configuration loaded from environment variables.
/// Fails at startup if the backend API key is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub llm_api_url: String,
    pub smtp: SmtpConfig,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            llm_api_url: optional_env("LLM_API_URL")
                .unwrap_or_else(|| ANTHROPIC_API_URL.to_string()),
            smtp: SmtpConfig {
                host: optional_env("EMAIL_HOST").unwrap_or_else(|| "smtp.gmail.com".to_string()),
                port: optional_env("EMAIL_PORT")
                    .unwrap_or_else(|| "587".to_string())
                    .parse::<u16>()
                    .context("EMAIL_PORT must be a valid port number")?,
                username: optional_env("EMAIL_USER"),
                password: optional_env("EMAIL_PASS"),
                dispatch: DispatchMode::parse(optional_env("EMAIL_SEND").as_deref())?,
            },
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Reads a variable, treating empty values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNSET_VAR: &str = "TRIAGE_API_TEST_NEVER_SET_7F3A";

    #[test]
    fn test_require_env_names_missing_variable() {
        let err = require_env(UNSET_VAR).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("Required environment variable '{UNSET_VAR}' is not set")
        );
    }

    #[test]
    fn test_optional_env_unset_is_none() {
        assert_eq!(optional_env(UNSET_VAR), None);
    }

    #[test]
    fn test_dispatch_defaults_to_disabled() {
        assert_eq!(DispatchMode::parse(None).unwrap(), DispatchMode::Disabled);
        assert_eq!(DispatchMode::default(), DispatchMode::Disabled);
    }

    #[test]
    fn test_dispatch_accepts_boolean_and_named_values() {
        assert_eq!(DispatchMode::parse(Some("TRUE")).unwrap(), DispatchMode::Enabled);
        assert_eq!(DispatchMode::parse(Some("enabled")).unwrap(), DispatchMode::Enabled);
        assert_eq!(DispatchMode::parse(Some("false")).unwrap(), DispatchMode::Disabled);
        assert_eq!(DispatchMode::parse(Some(" disabled ")).unwrap(), DispatchMode::Disabled);
    }

    #[test]
    fn test_dispatch_rejects_unknown_value() {
        let err = DispatchMode::parse(Some("sometimes")).unwrap_err();
        assert!(err.to_string().contains("sometimes"));
    }
}
