use dcbor::Date;
use dcbor::prelude::*;

use crate::pattern::{Matcher, Path, Pattern, compile_as_atomic, vm::Instr};

/// Pattern for matching dCBOR dates (CBOR tag 1).
#[derive(Debug, Clone)]
pub enum DatePattern {
    /// Matches any date.
    Any,
    /// Matches a specific date.
    Value(Date),
    /// Matches dates within an inclusive range.
    Range(Date, Date),
    /// Matches dates on or after the given date.
    Earliest(Date),
    /// Matches dates on or before the given date.
    Latest(Date),
    /// Matches a date by its ISO-8601 string representation.
    Iso8601(String),
    /// Matches dates whose ISO-8601 representation matches a regex.
    Regex(regex::Regex),
}

impl PartialEq for DatePattern {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (DatePattern::Any, DatePattern::Any) => true,
            (DatePattern::Value(a), DatePattern::Value(b)) => a == b,
            (DatePattern::Range(a0, a1), DatePattern::Range(b0, b1)) => {
                a0 == b0 && a1 == b1
            }
            (DatePattern::Earliest(a), DatePattern::Earliest(b)) => a == b,
            (DatePattern::Latest(a), DatePattern::Latest(b)) => a == b,
            (DatePattern::Iso8601(a), DatePattern::Iso8601(b)) => a == b,
            (DatePattern::Regex(a), DatePattern::Regex(b)) => {
                a.as_str() == b.as_str()
            }
            _ => false,
        }
    }
}

impl DatePattern {
    /// Creates a new `DatePattern` that matches any date.
    pub fn any() -> Self { DatePattern::Any }

    /// Creates a new `DatePattern` that matches a specific date.
    pub fn value(date: Date) -> Self { DatePattern::Value(date) }

    /// Creates a new `DatePattern` that matches dates within a range
    /// (inclusive).
    pub fn range(range: std::ops::RangeInclusive<Date>) -> Self {
        let (start, end) = range.into_inner();
        DatePattern::Range(start, end)
    }

    /// Creates a new `DatePattern` that matches dates on or after `date`.
    pub fn earliest(date: Date) -> Self { DatePattern::Earliest(date) }

    /// Creates a new `DatePattern` that matches dates on or before `date`.
    pub fn latest(date: Date) -> Self { DatePattern::Latest(date) }

    /// Creates a new `DatePattern` that matches a date by its ISO-8601
    /// string representation.
    pub fn string(iso_string: impl Into<String>) -> Self {
        DatePattern::Iso8601(iso_string.into())
    }

    /// Creates a new `DatePattern` that matches dates whose ISO-8601
    /// representation matches `regex`.
    pub fn regex(regex: regex::Regex) -> Self { DatePattern::Regex(regex) }
}

fn as_date(cbor: &CBOR) -> Option<Date> { Date::try_from(cbor.clone()).ok() }

impl Matcher for DatePattern {
    fn paths_with_captures(
        &self,
        cbor: &CBOR,
    ) -> (Vec<Path>, std::collections::HashMap<String, Vec<Path>>) {
        let is_hit = as_date(cbor).is_some_and(|date| match self {
            DatePattern::Any => true,
            DatePattern::Value(want) => date == *want,
            DatePattern::Range(min, max) => date >= *min && date <= *max,
            DatePattern::Earliest(min) => date >= *min,
            DatePattern::Latest(max) => date <= *max,
            DatePattern::Iso8601(iso) => {
                Date::from_string(iso).is_ok_and(|want| date == want)
            }
            DatePattern::Regex(regex) => regex.is_match(&date.to_string()),
        });
        let paths = if is_hit { vec![vec![cbor.clone()]] } else { vec![] };
        (paths, std::collections::HashMap::new())
    }

    fn compile(
        &self,
        code: &mut Vec<Instr>,
        literals: &mut Vec<Pattern>,
        captures: &mut Vec<String>,
    ) {
        compile_as_atomic(
            &Pattern::Value(crate::pattern::value::ValuePattern::Date(
                self.clone(),
            )),
            code,
            literals,
            captures,
        );
    }
}

impl std::fmt::Display for DatePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatePattern::Any => write!(f, "date"),
            DatePattern::Value(date) => write!(f, "date'{}'", date),
            DatePattern::Range(min, max) => {
                write!(f, "date'{}..{}'", min, max)
            }
            DatePattern::Earliest(min) => write!(f, "date'{}..'", min),
            DatePattern::Latest(max) => write!(f, "date'..{}'", max),
            DatePattern::Iso8601(iso) => write!(f, "date'{}'", iso),
            DatePattern::Regex(regex) => write!(f, "date'/{}/'", regex),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_pattern_display() {
        assert_eq!(DatePattern::any().to_string(), "date");
        assert_eq!(
            DatePattern::value(Date::from_ymd(2023, 12, 25)).to_string(),
            "date'2023-12-25'"
        );
        assert_eq!(
            DatePattern::range(
                Date::from_ymd(2023, 12, 20)..=Date::from_ymd(2023, 12, 30)
            )
            .to_string(),
            "date'2023-12-20..2023-12-30'"
        );
        assert_eq!(
            DatePattern::earliest(Date::from_ymd(2023, 12, 25)).to_string(),
            "date'2023-12-25..'"
        );
        assert_eq!(
            DatePattern::latest(Date::from_ymd(2023, 12, 25)).to_string(),
            "date'..2023-12-25'"
        );
    }

    #[test]
    fn test_date_pattern_matches() {
        let date = Date::from_ymd(2023, 12, 25);
        let date_cbor = date.to_cbor();

        assert!(DatePattern::any().matches(&date_cbor));
        assert!(DatePattern::value(date.clone()).matches(&date_cbor));
        assert!(
            !DatePattern::value(Date::from_ymd(2023, 12, 24))
                .matches(&date_cbor)
        );
        assert!(
            DatePattern::range(
                Date::from_ymd(2023, 12, 20)..=Date::from_ymd(2023, 12, 30)
            )
            .matches(&date_cbor)
        );
        assert!(!DatePattern::any().matches(&"2023-12-25".to_cbor()));
    }
}
