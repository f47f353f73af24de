//! Lenient parsing of caller-supplied numbers
//!
//! Forms hand us quantities as numbers, numeric strings, strings with a unit
//! glued on ("3 kg"), or garbage. Everything is coerced to a finite,
//! non-negative value once here so the calculator never has to re-check.

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

/// A numeric field as it appears in a loosely-typed document
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
    /// Booleans, arrays, objects: never a usable number
    Other(Value),
}

/// Reads the leading number of a string, the way a form field would
pub struct QuantityParser {
    leading_number: Regex,
}

impl QuantityParser {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(QuantityParser {
            // Sign, digits with optional '.' or ',' decimal part, optional exponent
            leading_number: Regex::new(
                r"^\s*([+-]?(?:\d+(?:[.,]\d*)?|[.,]\d+)(?:[eE][+-]?\d+)?)",
            )?,
        })
    }

    /// Leading number of `text`, or `None` if it does not start with one
    pub fn leading_number(&self, text: &str) -> Option<f64> {
        let cap = self.leading_number.captures(text)?;
        cap[1].replace(',', ".").parse::<f64>().ok()
    }

    /// Coerce a quantity: missing, unparsable, negative and non-finite
    /// values become 0.
    pub fn quantity(&self, raw: Option<&RawNumber>) -> f64 {
        let value = match raw {
            Some(RawNumber::Number(n)) => *n,
            Some(RawNumber::Text(text)) => self.leading_number(text).unwrap_or(0.0),
            Some(RawNumber::Other(_)) | None => 0.0,
        };
        non_negative(value)
    }

    /// Coerce an optional catalog figure (calorie density, unit cost).
    /// Missing or unparsable stays `None`; a parsed value is clamped like a
    /// quantity.
    pub fn optional(&self, raw: Option<&RawNumber>) -> Option<f64> {
        match raw? {
            RawNumber::Number(n) => Some(non_negative(*n)),
            RawNumber::Text(text) => self.leading_number(text).map(non_negative),
            RawNumber::Other(_) => None,
        }
    }

    /// Coerce a portion count. Missing or unparsable means 1; other values
    /// are truncated and kept as-is, including zero and negatives.
    pub fn portion_count(&self, raw: Option<&RawNumber>) -> i64 {
        let value = match raw {
            Some(RawNumber::Number(n)) => Some(*n),
            Some(RawNumber::Text(text)) => self.leading_number(text),
            Some(RawNumber::Other(_)) | None => None,
        };
        match value {
            Some(v) if v.is_finite() => v.trunc() as i64,
            _ => 1,
        }
    }

    /// Coerce a count of portions ordered; anything unusable is 0.
    pub fn portions_ordered(&self, raw: Option<&RawNumber>) -> u64 {
        self.quantity(raw).trunc() as u64
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
