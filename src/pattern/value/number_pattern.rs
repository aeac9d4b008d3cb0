use dcbor::Simple;
use dcbor::prelude::*;

use crate::pattern::{Matcher, Path, Pattern, compile_as_atomic, vm::Instr};

/// Pattern for matching numeric (integer or floating-point) CBOR values.
#[derive(Debug, Clone, Copy)]
pub enum NumberPattern {
    /// Matches any number.
    Any,
    /// Matches the exact value.
    Exact(f64),
    /// Matches values within an inclusive range.
    Range(f64, f64),
    /// Matches values strictly greater than the given value.
    GreaterThan(f64),
    /// Matches values greater than or equal to the given value.
    GreaterThanOrEqual(f64),
    /// Matches values strictly less than the given value.
    LessThan(f64),
    /// Matches values less than or equal to the given value.
    LessThanOrEqual(f64),
    /// Matches the NaN value.
    NaN,
}

impl NumberPattern {
    /// Creates a new `NumberPattern` that matches any number.
    pub fn any() -> Self { NumberPattern::Any }

    /// Creates a new `NumberPattern` that matches the exact number.
    pub fn value<T: Into<f64>>(value: T) -> Self {
        NumberPattern::Exact(value.into())
    }

    /// Creates a new `NumberPattern` that matches numbers in the inclusive
    /// range.
    pub fn range<A: Into<f64> + Copy>(
        range: std::ops::RangeInclusive<A>,
    ) -> Self {
        NumberPattern::Range((*range.start()).into(), (*range.end()).into())
    }

    /// Creates a new `NumberPattern` that matches numbers strictly greater
    /// than `value`.
    pub fn greater_than<T: Into<f64>>(value: T) -> Self {
        NumberPattern::GreaterThan(value.into())
    }

    /// Creates a new `NumberPattern` that matches numbers greater than or
    /// equal to `value`.
    pub fn greater_than_or_equal<T: Into<f64>>(value: T) -> Self {
        NumberPattern::GreaterThanOrEqual(value.into())
    }

    /// Creates a new `NumberPattern` that matches numbers strictly less than
    /// `value`.
    pub fn less_than<T: Into<f64>>(value: T) -> Self {
        NumberPattern::LessThan(value.into())
    }

    /// Creates a new `NumberPattern` that matches numbers less than or equal
    /// to `value`.
    pub fn less_than_or_equal<T: Into<f64>>(value: T) -> Self {
        NumberPattern::LessThanOrEqual(value.into())
    }

    /// Creates a new `NumberPattern` that matches the NaN value.
    pub fn nan() -> Self { NumberPattern::NaN }
}

impl PartialEq for NumberPattern {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NumberPattern::Any, NumberPattern::Any) => true,
            (NumberPattern::Exact(a), NumberPattern::Exact(b)) => a == b,
            (NumberPattern::Range(a0, a1), NumberPattern::Range(b0, b1)) => {
                a0 == b0 && a1 == b1
            }
            (
                NumberPattern::GreaterThan(a),
                NumberPattern::GreaterThan(b),
            ) => a == b,
            (
                NumberPattern::GreaterThanOrEqual(a),
                NumberPattern::GreaterThanOrEqual(b),
            ) => a == b,
            (NumberPattern::LessThan(a), NumberPattern::LessThan(b)) => {
                a == b
            }
            (
                NumberPattern::LessThanOrEqual(a),
                NumberPattern::LessThanOrEqual(b),
            ) => a == b,
            (NumberPattern::NaN, NumberPattern::NaN) => true,
            _ => false,
        }
    }
}

/// Numeric value of a CBOR integer or floating-point leaf, or `None` for
/// anything else.
fn as_f64(cbor: &CBOR) -> Option<f64> {
    match cbor.as_case() {
        CBORCase::Unsigned(u) => Some(*u as f64),
        CBORCase::Negative(n) => Some(*n as f64),
        CBORCase::Simple(Simple::Float(f)) => Some(*f),
        _ => None,
    }
}

impl Matcher for NumberPattern {
    fn paths_with_captures(
        &self,
        cbor: &CBOR,
    ) -> (Vec<Path>, std::collections::HashMap<String, Vec<Path>>) {
        let is_hit = as_f64(cbor).is_some_and(|value| match self {
            NumberPattern::Any => !value.is_nan(),
            NumberPattern::Exact(want) => value == *want,
            NumberPattern::Range(min, max) => value >= *min && value <= *max,
            NumberPattern::GreaterThan(min) => value > *min,
            NumberPattern::GreaterThanOrEqual(min) => value >= *min,
            NumberPattern::LessThan(max) => value < *max,
            NumberPattern::LessThanOrEqual(max) => value <= *max,
            NumberPattern::NaN => value.is_nan(),
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
            &Pattern::Value(crate::pattern::value::ValuePattern::Number(
                *self,
            )),
            code,
            literals,
            captures,
        );
    }
}

fn fmt_num(f: &mut std::fmt::Formatter<'_>, v: f64) -> std::fmt::Result {
    if v == f64::INFINITY {
        write!(f, "Infinity")
    } else if v == f64::NEG_INFINITY {
        write!(f, "-Infinity")
    } else if v.fract() == 0.0 && v.abs() < 1e15 {
        write!(f, "{}", v as i64)
    } else {
        write!(f, "{}", v)
    }
}

impl std::fmt::Display for NumberPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumberPattern::Any => write!(f, "number"),
            NumberPattern::Exact(v) => fmt_num(f, *v),
            NumberPattern::Range(min, max) => {
                fmt_num(f, *min)?;
                write!(f, "..")?;
                fmt_num(f, *max)
            }
            NumberPattern::GreaterThan(v) => {
                write!(f, ">")?;
                fmt_num(f, *v)
            }
            NumberPattern::GreaterThanOrEqual(v) => {
                write!(f, ">=")?;
                fmt_num(f, *v)
            }
            NumberPattern::LessThan(v) => {
                write!(f, "<")?;
                fmt_num(f, *v)
            }
            NumberPattern::LessThanOrEqual(v) => {
                write!(f, "<=")?;
                fmt_num(f, *v)
            }
            NumberPattern::NaN => write!(f, "NaN"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_pattern_display() {
        assert_eq!(NumberPattern::any().to_string(), "number");
        assert_eq!(NumberPattern::value(42).to_string(), "42");
        assert_eq!(NumberPattern::range(1..=5).to_string(), "1..5");
        assert_eq!(NumberPattern::greater_than(3).to_string(), ">3");
        assert_eq!(NumberPattern::nan().to_string(), "NaN");
    }

    #[test]
    fn test_number_pattern_matches() {
        let n = 42.to_cbor();
        assert!(NumberPattern::any().matches(&n));
        assert!(NumberPattern::value(42).matches(&n));
        assert!(NumberPattern::range(40..=50).matches(&n));
        assert!(!NumberPattern::range(0..=10).matches(&n));
        assert!(NumberPattern::greater_than(10).matches(&n));
        assert!(!NumberPattern::less_than(10).matches(&n));
        assert!(!NumberPattern::any().matches(&"text".to_cbor()));
    }
}
