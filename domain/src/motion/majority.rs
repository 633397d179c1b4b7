//! Majority threshold parsing.
//!
//! A majority is stored as the raw string the proposer (or config) supplied
//! and parsed on demand. Three syntaxes are accepted:
//!
//! | Syntax | Example | Meaning |
//! |--------|---------|---------|
//! | fraction | `"2/3"` | numerator / denominator |
//! | percent | `"66%"` | value / 100 |
//! | decimal | `"0.6"` | as-is |
//!
//! The parsed value is always clamped to `[0, 1]`. Malformed input falls
//! back to 0.5 rather than failing — a deliberate non-throwing policy so a
//! persisted motion can never become unresolvable through a bad threshold.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A majority threshold as the raw user-facing string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Majority(String);

impl Majority {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn raw(&self) -> &str {
        &self.0
    }

    /// The threshold in `[0, 1]`; 0.5 for malformed input.
    pub fn threshold(&self) -> f64 {
        parse_majority(&self.0)
    }
}

impl Default for Majority {
    fn default() -> Self {
        Self("1/2".to_string())
    }
}

impl fmt::Display for Majority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Majority {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Parse a majority string into a threshold in `[0, 1]`.
///
/// # Example
///
/// ```
/// use votum_domain::parse_majority;
///
/// assert!((parse_majority("2/3") - 2.0 / 3.0).abs() < 1e-9);
/// assert_eq!(parse_majority("66%"), 0.66);
/// assert_eq!(parse_majority("bogus"), 0.5);
/// ```
pub fn parse_majority(s: &str) -> f64 {
    let s = s.trim();

    if let Some(pct) = s.strip_suffix('%') {
        return match pct.trim().parse::<f64>() {
            Ok(v) => (v / 100.0).clamp(0.0, 1.0),
            Err(_) => 0.5,
        };
    }

    if let Some((num, den)) = s.split_once('/') {
        return match (num.trim().parse::<f64>(), den.trim().parse::<f64>()) {
            // A zero denominator means "unreachable": clamp to full unanimity.
            (Ok(_), Ok(d)) if d == 0.0 => 1.0,
            (Ok(n), Ok(d)) => (n / d).clamp(0.0, 1.0),
            _ => 0.5,
        };
    }

    match s.parse::<f64>() {
        Ok(v) => v.clamp(0.0, 1.0),
        Err(_) => 0.5,
    }
}
