//! Real-world length parsing and formatting.
//!
//! Users type lengths the way they would on a tape measure: `5'6"`, `5' 6`,
//! `2'`, `24"` or just `24`. Everything is normalized to inches. Parsing never
//! fails loudly; it reports `None` so an input field can flag itself while the
//! user is still typing.

#[cfg(test)]
#[path = "units_test.rs"]
mod units_test;

use crate::consts::INCHES_PER_FOOT;

/// Parse free-form length text into inches.
///
/// Grammars are tried in order: feet-and-inches (`F'I"`, `F' I`), feet only
/// (`F'`), inches with a mark (`N"`), then a bare number taken as inches.
/// Feet and inch components are unsigned decimals. A bare number may carry a
/// sign and is returned as-is; positivity is the caller's rule (see
/// [`parse_positive_length`]).
#[must_use]
pub fn parse_length(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some((feet, rest)) = trimmed.split_once('\'') {
        let feet = parse_unsigned(feet)?;
        let rest = rest.trim_start();
        if rest.is_empty() {
            return Some(feet * INCHES_PER_FOOT);
        }
        let inches = parse_unsigned(rest.strip_suffix('"').unwrap_or(rest))?;
        return Some(feet * INCHES_PER_FOOT + inches);
    }

    if let Some(inches) = trimmed.strip_suffix('"') {
        return parse_unsigned(inches);
    }

    parse_signed(trimmed)
}

/// Parse a length and keep it only if strictly positive.
#[must_use]
pub fn parse_positive_length(text: &str) -> Option<f64> {
    parse_length(text).filter(|inches| *inches > 0.0)
}

/// Validation state of a length field as the user types.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LengthInput {
    /// A usable, strictly positive length in inches.
    Valid(f64),
    /// Nothing typed yet.
    Empty,
    /// Parses, but to zero. Not flagged; the user is likely mid-edit.
    Zero,
    /// Unrecognized text or a negative value.
    Invalid,
}

impl LengthInput {
    /// Classify raw field text.
    #[must_use]
    pub fn classify(text: &str) -> Self {
        if text.trim().is_empty() {
            return Self::Empty;
        }
        match parse_length(text) {
            Some(inches) if inches > 0.0 => Self::Valid(inches),
            Some(inches) if inches == 0.0 => Self::Zero,
            _ => Self::Invalid,
        }
    }

    /// Whether the field should be rendered as an error.
    #[must_use]
    pub fn is_error(self) -> bool {
        matches!(self, Self::Invalid)
    }

    /// The usable length, if any.
    #[must_use]
    pub fn inches(self) -> Option<f64> {
        match self {
            Self::Valid(inches) => Some(inches),
            _ => None,
        }
    }
}

/// Human-readable length: `66.0 inches (5'6.0")`, `24.0 inches (2')`, `8.5 inches`.
#[must_use]
pub fn format_length(inches: f64) -> String {
    let mut out = format!("{inches:.1} inches");
    if inches >= INCHES_PER_FOOT {
        let feet = (inches / INCHES_PER_FOOT).floor();
        let rem = inches % INCHES_PER_FOOT;
        out.push_str(&format!(" ({feet:.0}'"));
        if rem > 0.0 {
            out.push_str(&format!("{rem:.1}\""));
        }
        out.push(')');
    }
    out
}

/// `\d+(\.\d+)?`
fn parse_unsigned(text: &str) -> Option<f64> {
    let (int, frac) = match text.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (text, None),
    };
    if int.is_empty() || !int.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if let Some(frac) = frac {
        if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
    }
    to_f64(text)
}

/// Optional sign, then `\d+(\.\d+)?` or `\.\d+`.
fn parse_signed(text: &str) -> Option<f64> {
    let unsigned = text.strip_prefix(['-', '+']).unwrap_or(text);
    let valid = match unsigned.strip_prefix('.') {
        Some(frac) => !frac.is_empty() && frac.bytes().all(|b| b.is_ascii_digit()),
        None => parse_unsigned(unsigned).is_some(),
    };
    if !valid {
        return None;
    }
    to_f64(text)
}

fn to_f64(text: &str) -> Option<f64> {
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => None,
    }
}
