//! Human-readable duration parsing ("8h30m") and its canonical form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Malformed or non-positive duration text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid duration {text:?}: {reason}")]
pub struct InvalidDuration {
    /// The rejected input text.
    pub text: String,
    /// What the parser expected instead.
    pub reason: &'static str,
}

/// A duration combining hour and minute units, stored as whole seconds.
///
/// The grammar is `<H>h`, `<M>m`, or `<H>h<M>m` — hours before minutes,
/// each unit at most once, and the total must be positive. Parsing happens
/// once when a schedule is loaded; at fire time only the stored seconds
/// value is read.
///
/// The canonical text form is `<H>h` when the minute component is zero,
/// `<H>h<M>m` otherwise, so `format` then `parse` always round-trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DurationSpec(i64);

impl DurationSpec {
    /// Parses duration text into whole seconds.
    pub fn parse(text: &str) -> Result<Self, InvalidDuration> {
        let invalid = |reason| InvalidDuration {
            text: text.to_string(),
            reason,
        };

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(invalid("duration is empty"));
        }

        let mut seconds: i64 = 0;
        let mut digits = String::new();
        let mut seen_hours = false;
        let mut seen_minutes = false;

        for ch in trimmed.chars() {
            if ch.is_ascii_digit() {
                digits.push(ch);
                continue;
            }
            let unit_seconds = match ch {
                'h' if !seen_hours && !seen_minutes => {
                    seen_hours = true;
                    3600
                }
                'm' if !seen_minutes => {
                    seen_minutes = true;
                    60
                }
                'h' | 'm' => return Err(invalid("units must be 'h' then 'm', each at most once")),
                _ => return Err(invalid("expected digits followed by 'h' or 'm'")),
            };
            let value: i64 = digits
                .parse()
                .map_err(|_| invalid("expected a number before the unit"))?;
            digits.clear();
            seconds = value
                .checked_mul(unit_seconds)
                .and_then(|v| seconds.checked_add(v))
                .ok_or_else(|| invalid("duration is too large"))?;
        }

        if !digits.is_empty() {
            return Err(invalid("trailing digits without a unit"));
        }
        if seconds <= 0 {
            return Err(invalid("duration must be positive"));
        }
        Ok(Self(seconds))
    }

    /// Returns the duration as whole seconds.
    pub const fn seconds(self) -> i64 {
        self.0
    }
}

impl FromStr for DurationSpec {
    type Err = InvalidDuration;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DurationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.0 / 3600;
        let minutes = (self.0 % 3600) / 60;
        if minutes == 0 {
            write!(f, "{hours}h")
        } else {
            write!(f, "{hours}h{minutes}m")
        }
    }
}

impl TryFrom<String> for DurationSpec {
    type Error = InvalidDuration;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DurationSpec> for String {
    fn from(spec: DurationSpec) -> Self {
        spec.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hour_and_minute_combinations() {
        assert_eq!(DurationSpec::parse("8h").unwrap().seconds(), 8 * 3600);
        assert_eq!(
            DurationSpec::parse("7h30m").unwrap().seconds(),
            7 * 3600 + 30 * 60
        );
        assert_eq!(DurationSpec::parse("45m").unwrap().seconds(), 45 * 60);
        assert_eq!(DurationSpec::parse("90m").unwrap().seconds(), 90 * 60);
    }

    #[test]
    fn rejects_malformed_text() {
        assert!(DurationSpec::parse("").is_err());
        assert!(DurationSpec::parse("abc").is_err());
        assert!(DurationSpec::parse("-1h").is_err());
        assert!(DurationSpec::parse("8").is_err());
        assert!(DurationSpec::parse("h").is_err());
        assert!(DurationSpec::parse("8h30").is_err());
    }

    #[test]
    fn rejects_units_out_of_order_or_repeated() {
        assert!(DurationSpec::parse("30m8h").is_err());
        assert!(DurationSpec::parse("1h2h").is_err());
        assert!(DurationSpec::parse("10m5m").is_err());
    }

    #[test]
    fn rejects_zero_duration() {
        assert!(DurationSpec::parse("0h").is_err());
        assert!(DurationSpec::parse("0h0m").is_err());
    }

    #[test]
    fn formats_canonically() {
        assert_eq!(DurationSpec::parse("8h").unwrap().to_string(), "8h");
        assert_eq!(DurationSpec::parse("8h0m").unwrap().to_string(), "8h");
        assert_eq!(DurationSpec::parse("7h30m").unwrap().to_string(), "7h30m");
        assert_eq!(DurationSpec::parse("45m").unwrap().to_string(), "0h45m");
        assert_eq!(DurationSpec::parse("90m").unwrap().to_string(), "1h30m");
    }

    #[test]
    fn format_then_parse_round_trips() {
        for text in ["8h", "7h30m", "45m", "90m", "1h1m", "23h59m"] {
            let parsed = DurationSpec::parse(text).unwrap();
            let reparsed = DurationSpec::parse(&parsed.to_string()).unwrap();
            assert_eq!(reparsed, parsed, "round-trip failed for {text:?}");
        }
    }

    #[test]
    fn serde_uses_canonical_text() {
        let spec: DurationSpec = serde_json::from_str("\"7h30m\"").unwrap();
        assert_eq!(spec.seconds(), 27000);
        assert_eq!(serde_json::to_string(&spec).unwrap(), "\"7h30m\"");

        let result: Result<DurationSpec, _> = serde_json::from_str("\"soon\"");
        assert!(result.is_err());
    }
}
