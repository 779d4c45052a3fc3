//! Records produced and consumed by the evaluation stages.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// What the candidate is evaluated against. Supplied once per evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobRequirements {
    pub title: String,
    pub description: String,
    pub must_have_skills: String,
}

/// Structured resume summary produced by the extraction stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateSummary {
    #[serde(deserialize_with = "lenient_string")]
    pub summary: String,
    #[serde(deserialize_with = "lenient_skills")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "lenient_experience_years")]
    pub experience_years: u32,
    #[serde(deserialize_with = "lenient_string")]
    pub education: String,
}

impl CandidateSummary {
    pub fn parsing_failed() -> Self {
        Self {
            summary: "Parsing failed".to_string(),
            skills: vec![],
            experience_years: 0,
            education: String::new(),
        }
    }
}

/// Fit score (0 to 100) and rationale produced by the scoring stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchResult {
    #[serde(deserialize_with = "lenient_score")]
    pub score: u8,
    #[serde(deserialize_with = "lenient_string")]
    pub reasoning: String,
}

impl MatchResult {
    pub fn parsing_failed() -> Self {
        Self {
            score: 0,
            reasoning: "Parsing failed".to_string(),
        }
    }

    pub fn invalid_data() -> Self {
        Self {
            score: 0,
            reasoning: "Invalid data".to_string(),
        }
    }

    /// Decodes a match result that crossed a serialization boundary.
    /// Accepts an object or a JSON-encoded string of one.
    pub fn from_wire(value: &Value) -> Self {
        decode_wire(value).unwrap_or_else(Self::invalid_data)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Accepted,
    #[default]
    Rejected,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Accepted => f.write_str("Accepted"),
            Outcome::Rejected => f.write_str("Rejected"),
        }
    }
}

/// Accept/reject outcome derived from a `MatchResult`.
///
/// `decision` is `Accepted` iff `score >= threshold`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Decision {
    #[serde(deserialize_with = "lenient_outcome")]
    pub decision: Outcome,
    #[serde(deserialize_with = "lenient_threshold")]
    pub threshold: u8,
    #[serde(deserialize_with = "lenient_score")]
    pub score: u8,
    #[serde(deserialize_with = "lenient_string")]
    pub feedback: String,
    #[serde(deserialize_with = "lenient_string")]
    pub reasoning: String,
}

impl Default for Decision {
    fn default() -> Self {
        Self {
            decision: Outcome::Rejected,
            threshold: super::decision::ACCEPT_THRESHOLD,
            score: 0,
            feedback: String::new(),
            reasoning: String::new(),
        }
    }
}

impl Decision {
    pub fn no_feedback() -> Self {
        Self {
            feedback: "No feedback available".to_string(),
            ..Self::default()
        }
    }

    /// Decodes a decision that crossed a serialization boundary.
    /// Accepts an object or a JSON-encoded string of one.
    pub fn from_wire(value: &Value) -> Self {
        decode_wire(value).unwrap_or_else(Self::no_feedback)
    }
}

/// Outcome of the dispatch attempt for a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum DispatchStatus {
    Simulated,
    Sent,
    Failed(String),
}

impl fmt::Display for DispatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchStatus::Simulated => f.write_str("Not sent (simulation mode)"),
            DispatchStatus::Sent => f.write_str("Email sent successfully"),
            DispatchStatus::Failed(reason) => write!(f, "Failed to send email: {reason}"),
        }
    }
}

/// Rendered result message plus how its dispatch went. Terminal artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub dispatch_status: DispatchStatus,
}

fn decode_wire<T: serde::de::DeserializeOwned>(value: &Value) -> Option<T> {
    match value {
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(inner @ Value::Object(_)) => serde_json::from_value(inner).ok(),
            _ => None,
        },
        Value::Object(_) => serde_json::from_value(value.clone()).ok(),
        _ => None,
    }
}

/// Reads a JSON number or numeric string as an `f64`.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Scores arrive as ints, floats or strings. Rounded and clamped into 0..=100;
/// anything non-numeric reads as 0.
fn lenient_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(numeric(&value)
        .filter(|n| n.is_finite())
        .map(|n| n.round().clamp(0.0, 100.0) as u8)
        .unwrap_or(0))
}

/// Explicit `null` reads the same as a missing field.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_skills<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_outcome<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Outcome, D::Error> {
    Ok(Option::<Outcome>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_threshold<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    Ok(Option::<u8>::deserialize(deserializer)?.unwrap_or(super::decision::ACCEPT_THRESHOLD))
}

fn lenient_experience_years<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(numeric(&value)
        .filter(|n| n.is_finite())
        .map(|n| n.max(0.0).min(u32::MAX as f64) as u32)
        .unwrap_or(0))
}
