//! Five-field cron expression parsing and minute matching.
//!
//! Supports the conventional syntax: `*`, single values, ranges (`a-b`),
//! steps (`*/n`, `a-b/n`, `a/n`), comma-separated lists, and three-letter
//! names for months and weekdays. Day-of-week `7` is treated as Sunday.
//!
//! When both day-of-month and day-of-week are restricted, a date matching
//! either field matches the expression, as in conventional cron. A field
//! counts as restricted when it does not begin with `*`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, TimeZone, Timelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Malformed recurrence expression.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CronParseError {
    /// The expression did not have exactly five fields.
    #[error("expected 5 fields (minute hour day-of-month month day-of-week), got {found}")]
    FieldCount { found: usize },

    /// A field failed to parse.
    #[error("invalid {field} field {value:?}: {reason}")]
    Field {
        field: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Bounds and naming rules for one cron field.
struct FieldSpec {
    name: &'static str,
    min: u32,
    max: u32,
    names: &'static [&'static str],
    names_base: u32,
    wrap_sunday: bool,
}

const MINUTE: FieldSpec = FieldSpec {
    name: "minute",
    min: 0,
    max: 59,
    names: &[],
    names_base: 0,
    wrap_sunday: false,
};

const HOUR: FieldSpec = FieldSpec {
    name: "hour",
    min: 0,
    max: 23,
    names: &[],
    names_base: 0,
    wrap_sunday: false,
};

const DAY_OF_MONTH: FieldSpec = FieldSpec {
    name: "day-of-month",
    min: 1,
    max: 31,
    names: &[],
    names_base: 0,
    wrap_sunday: false,
};

const MONTH: FieldSpec = FieldSpec {
    name: "month",
    min: 1,
    max: 12,
    names: &[
        "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    ],
    names_base: 1,
    wrap_sunday: false,
};

const DAY_OF_WEEK: FieldSpec = FieldSpec {
    name: "day-of-week",
    min: 0,
    max: 7,
    names: &["sun", "mon", "tue", "wed", "thu", "fri", "sat"],
    names_base: 0,
    wrap_sunday: true,
};

/// A parsed five-field cron expression.
///
/// Parsing happens once; matching a minute boundary is a handful of bit
/// tests. The original text is kept for display and serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CronExpr {
    text: String,
    minutes: u64,
    hours: u64,
    days_of_month: u64,
    months: u64,
    days_of_week: u64,
    dom_restricted: bool,
    dow_restricted: bool,
}

impl CronExpr {
    /// Parses a five-field expression: minute hour day-of-month month
    /// day-of-week.
    pub fn parse(text: &str) -> Result<Self, CronParseError> {
        let fields: Vec<&str> = text.split_whitespace().collect();
        if fields.len() != 5 {
            return Err(CronParseError::FieldCount {
                found: fields.len(),
            });
        }

        Ok(Self {
            text: fields.join(" "),
            minutes: parse_field(&MINUTE, fields[0])?,
            hours: parse_field(&HOUR, fields[1])?,
            days_of_month: parse_field(&DAY_OF_MONTH, fields[2])?,
            months: parse_field(&MONTH, fields[3])?,
            days_of_week: parse_field(&DAY_OF_WEEK, fields[4])?,
            dom_restricted: !fields[2].starts_with('*'),
            dow_restricted: !fields[4].starts_with('*'),
        })
    }

    /// Reports whether the expression matches the given instant's minute.
    pub fn matches<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> bool {
        if self.minutes & bit(at.minute()) == 0 {
            return false;
        }
        if self.hours & bit(at.hour()) == 0 {
            return false;
        }
        if self.months & bit(at.month()) == 0 {
            return false;
        }

        let dom = self.days_of_month & bit(at.day()) != 0;
        let dow = self.days_of_week & bit(at.weekday().num_days_from_sunday()) != 0;
        if self.dom_restricted && self.dow_restricted {
            dom || dow
        } else {
            dom && dow
        }
    }

    /// Returns the expression text with normalized whitespace.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

const fn bit(value: u32) -> u64 {
    1 << value
}

fn parse_field(spec: &FieldSpec, raw: &str) -> Result<u64, CronParseError> {
    let invalid = |reason: &'static str| CronParseError::Field {
        field: spec.name,
        value: raw.to_string(),
        reason,
    };

    let mut mask = 0u64;
    for part in raw.split(',') {
        let (range, step) = match part.split_once('/') {
            Some((range, step)) => {
                let step: u32 = step
                    .parse()
                    .ok()
                    .filter(|s| *s >= 1)
                    .ok_or_else(|| invalid("step must be a positive number"))?;
                (range, step)
            }
            None => (part, 1),
        };

        let (lo, hi) = if range == "*" {
            (spec.min, spec.max)
        } else if let Some((a, b)) = range.split_once('-') {
            let lo = parse_value(spec, a).ok_or_else(|| invalid("unrecognized range start"))?;
            let hi = parse_value(spec, b).ok_or_else(|| invalid("unrecognized range end"))?;
            (lo, hi)
        } else {
            let value =
                parse_value(spec, range).ok_or_else(|| invalid("unrecognized value"))?;
            // "a/step" runs to the end of the field's range, as conventional
            if part.contains('/') {
                (value, spec.max)
            } else {
                (value, value)
            }
        };

        if lo > hi {
            return Err(invalid("range start exceeds range end"));
        }

        let mut value = lo;
        while value <= hi {
            let normalized = if spec.wrap_sunday && value == 7 { 0 } else { value };
            mask |= bit(normalized);
            // A step past u32::MAX has already run off the field's range.
            match value.checked_add(step) {
                Some(next) => value = next,
                None => break,
            }
        }
    }

    if mask == 0 {
        return Err(invalid("field is empty"));
    }
    Ok(mask)
}

fn parse_value(spec: &FieldSpec, s: &str) -> Option<u32> {
    if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        let value: u32 = s.parse().ok()?;
        (spec.min..=spec.max).contains(&value).then_some(value)
    } else {
        let lower = s.to_ascii_lowercase();
        spec.names
            .iter()
            .position(|name| *name == lower)
            .and_then(|index| u32::try_from(index).ok())
            .map(|index| spec.names_base + index)
    }
}

impl FromStr for CronExpr {
    type Err = CronParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CronExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl TryFrom<String> for CronExpr {
    type Error = CronParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CronExpr> for String {
    fn from(expr: CronExpr) -> Self {
        expr.text
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert_eq!(
            CronExpr::parse("0 17 * *"),
            Err(CronParseError::FieldCount { found: 4 })
        );
        assert_eq!(
            CronExpr::parse("0 17 * * 1-5 2024"),
            Err(CronParseError::FieldCount { found: 6 })
        );
        assert_eq!(
            CronExpr::parse(""),
            Err(CronParseError::FieldCount { found: 0 })
        );
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(CronExpr::parse("60 * * * *").is_err());
        assert!(CronExpr::parse("* 24 * * *").is_err());
        assert!(CronExpr::parse("* * 32 * *").is_err());
        assert!(CronExpr::parse("* * * 13 *").is_err());
        assert!(CronExpr::parse("* * * * 8").is_err());
    }

    #[test]
    fn rejects_malformed_fields() {
        assert!(CronExpr::parse("a * * * *").is_err());
        assert!(CronExpr::parse("*/0 * * * *").is_err());
        assert!(CronExpr::parse("10-5 * * * *").is_err());
    }

    #[test]
    fn weekday_range_matches_workdays_only() {
        let expr = CronExpr::parse("0 17 * * 1-5").unwrap();
        // 2024-05-01 is a Wednesday, 2024-05-04 a Saturday
        assert!(expr.matches(&at(2024, 5, 1, 17, 0)));
        assert!(!expr.matches(&at(2024, 5, 1, 17, 1)));
        assert!(!expr.matches(&at(2024, 5, 1, 18, 0)));
        assert!(!expr.matches(&at(2024, 5, 4, 17, 0)));
    }

    #[test]
    fn weekday_names_match() {
        let expr = CronExpr::parse("0 9 * * mon-fri").unwrap();
        assert!(expr.matches(&at(2024, 5, 1, 9, 0)));
        assert!(!expr.matches(&at(2024, 5, 4, 9, 0)));

        let expr = CronExpr::parse("0 0 * jan *").unwrap();
        assert!(expr.matches(&at(2024, 1, 15, 0, 0)));
        assert!(!expr.matches(&at(2024, 2, 15, 0, 0)));
    }

    #[test]
    fn step_matches_every_nth_minute() {
        let expr = CronExpr::parse("*/15 * * * *").unwrap();
        for minute in [0, 15, 30, 45] {
            assert!(expr.matches(&at(2024, 5, 1, 12, minute)));
        }
        assert!(!expr.matches(&at(2024, 5, 1, 12, 10)));
    }

    #[test]
    fn oversized_step_keeps_only_the_start_value() {
        // u32::MAX as the step must neither panic nor wrap into extra bits.
        let expr = CronExpr::parse("59/4294967295 * * * *").unwrap();
        assert!(expr.matches(&at(2024, 5, 1, 12, 59)));
        for minute in 0..59 {
            assert!(!expr.matches(&at(2024, 5, 1, 12, minute)));
        }

        let expr = CronExpr::parse("0/4294967294 * * * *").unwrap();
        assert!(expr.matches(&at(2024, 5, 1, 12, 0)));
        assert!(!expr.matches(&at(2024, 5, 1, 12, 1)));
    }

    #[test]
    fn sunday_accepts_both_spellings() {
        let zero = CronExpr::parse("0 0 * * 0").unwrap();
        let seven = CronExpr::parse("0 0 * * 7").unwrap();
        // 2024-09-15 is a Sunday
        assert!(zero.matches(&at(2024, 9, 15, 0, 0)));
        assert!(seven.matches(&at(2024, 9, 15, 0, 0)));
        assert!(!seven.matches(&at(2024, 9, 16, 0, 0)));
    }

    #[test]
    fn restricted_dom_and_dow_combine_as_or() {
        // "the 13th, or any Friday"
        let expr = CronExpr::parse("0 0 13 * 5").unwrap();
        // 2024-09-13 is Friday the 13th
        assert!(expr.matches(&at(2024, 9, 13, 0, 0)));
        // 2024-09-20 is a Friday but not the 13th
        assert!(expr.matches(&at(2024, 9, 20, 0, 0)));
        // 2024-10-13 is a Sunday the 13th
        assert!(expr.matches(&at(2024, 10, 13, 0, 0)));
        // 2024-09-14 is a Saturday the 14th
        assert!(!expr.matches(&at(2024, 9, 14, 0, 0)));
    }

    #[test]
    fn unrestricted_dow_requires_dom_match() {
        let expr = CronExpr::parse("0 0 13 * *").unwrap();
        assert!(expr.matches(&at(2024, 9, 13, 0, 0)));
        assert!(!expr.matches(&at(2024, 9, 20, 0, 0)));
    }

    #[test]
    fn list_fields_match_each_element() {
        let expr = CronExpr::parse("0,30 8,18 * * *").unwrap();
        assert!(expr.matches(&at(2024, 5, 1, 8, 0)));
        assert!(expr.matches(&at(2024, 5, 1, 18, 30)));
        assert!(!expr.matches(&at(2024, 5, 1, 12, 0)));
        assert!(!expr.matches(&at(2024, 5, 1, 8, 15)));
    }

    #[test]
    fn serde_round_trips_normalized_text() {
        let expr: CronExpr = serde_json::from_str("\"0  17 * *  1-5\"").unwrap();
        assert_eq!(expr.as_str(), "0 17 * * 1-5");
        assert_eq!(
            serde_json::to_string(&expr).unwrap(),
            "\"0 17 * * 1-5\""
        );

        let result: Result<CronExpr, _> = serde_json::from_str("\"0 17 * *\"");
        assert!(result.is_err());
    }
}
