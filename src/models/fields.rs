//! Lenient JSON field shapes.
//!
//! The matching service serves records straight out of CSV-backed frames, so
//! identifiers arrive as strings or numbers and coordinates as numbers,
//! numeric strings, junk strings or `null`. These helpers accept all of them
//! and leave the validity decision to the caller.

use serde::{Deserialize, Deserializer, Serialize};

/// A numeric field that may arrive in any JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseNumber {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl LooseNumber {
    /// The value as a finite `f64`, if it is one.
    ///
    /// Numeric strings are parsed after trimming. `NaN`, infinities and
    /// anything non-numeric yield `None`.
    pub fn as_finite(&self) -> Option<f64> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
            Self::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for LooseNumber {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Finite value of an optional loose number.
pub fn finite(value: &Option<LooseNumber>) -> Option<f64> {
    value.as_ref().and_then(LooseNumber::as_finite)
}

/// Deserialize an identifier that may be a JSON string or number.
pub fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(i) => i.to_string(),
        RawId::Float(f) => f.to_string(),
    })
}

/// Trimmed, non-empty text of an optional string field.
pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
