//! Best-effort JSON extraction from free-form model replies.
//!
//! Two tiers, in order:
//! 1. the whole reply is a JSON object;
//! 2. the greedy span from the first `{` to the last `}` is a JSON object.
//!
//! The span in tier 2 is deliberately greedy. A reply holding two separate
//! objects (`{..} and {..}`) yields an invalid span and falls through to the
//! sentinel rather than picking one of them.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Which tier produced the value.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed<T> {
    /// The reply was a JSON object as-is.
    Strict(T),
    /// A JSON object was found embedded in surrounding prose.
    Embedded(T),
    /// Nothing usable; the caller substitutes its sentinel.
    Fallback,
}

impl<T> Parsed<T> {
    pub fn tier(&self) -> &'static str {
        match self {
            Parsed::Strict(_) => "strict",
            Parsed::Embedded(_) => "embedded",
            Parsed::Fallback => "fallback",
        }
    }

    pub fn unwrap_or_else(self, sentinel: impl FnOnce() -> T) -> T {
        match self {
            Parsed::Strict(value) | Parsed::Embedded(value) => value,
            Parsed::Fallback => sentinel(),
        }
    }
}

pub fn parse_reply<T: DeserializeOwned>(reply: &str) -> Parsed<T> {
    if let Some(value) = decode_object(reply) {
        return Parsed::Strict(value);
    }
    if let Some(value) = brace_span(reply).and_then(decode_object) {
        return Parsed::Embedded(value);
    }
    Parsed::Fallback
}

/// First `{` through last `}`, inclusive.
fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

fn decode_object<T: DeserializeOwned>(text: &str) -> Option<T> {
    match serde_json::from_str::<Value>(text.trim()) {
        Ok(value @ Value::Object(_)) => serde_json::from_value(value).ok(),
        _ => None,
    }
}
