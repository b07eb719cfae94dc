//! FILENAME: core/engine/src/value.rs
//! PURPOSE: Result values as they come back from a query.
//! CONTEXT: Every value carries both its raw form (used for comparisons and
//! drill-down) and the string the formatting engine already produced for it.

use serde::{Deserialize, Serialize};

/// The raw, unformatted value of a result cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum RawValue {
    #[default]
    Null,
    Boolean(bool),
    Number(f64),
    Text(String),
}

impl RawValue {
    pub fn text(s: impl Into<String>) -> Self {
        RawValue::Text(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }

    /// Numeric interpretation of the value.
    /// Text is parsed (surrounding whitespace ignored); booleans and nulls have none.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawValue::Number(n) => Some(*n),
            RawValue::Text(s) => s.trim().parse::<f64>().ok(),
            RawValue::Boolean(_) | RawValue::Null => None,
        }
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Boolean(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

/// A single query result: raw value plus its pre-formatted display string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultValue {
    #[serde(default)]
    pub raw: RawValue,
    pub formatted: String,
}

impl ResultValue {
    pub fn new(raw: impl Into<RawValue>, formatted: impl Into<String>) -> Self {
        ResultValue {
            raw: raw.into(),
            formatted: formatted.into(),
        }
    }

    /// A value whose raw form is the number and whose display is its plain rendering.
    pub fn number(n: f64) -> Self {
        ResultValue {
            raw: RawValue::Number(n),
            formatted: format!("{}", n),
        }
    }

    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        ResultValue {
            raw: RawValue::Text(s.clone()),
            formatted: s,
        }
    }
}
