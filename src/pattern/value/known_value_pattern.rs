use bc_components::tags;
use dcbor::prelude::*;
use known_values::{KNOWN_VALUES, KnownValue};

use crate::pattern::{Matcher, Path, Pattern, compile_as_atomic, vm::Instr};

/// Pattern for matching dCBOR known values (CBOR tag 40000).
#[derive(Debug, Clone)]
pub enum KnownValuePattern {
    /// Matches any known value.
    Any,
    /// Matches the specific known value.
    Value(KnownValue),
    /// Matches a known value by its registered name.
    Named(String),
    /// Matches known values whose registered name matches a regex.
    Regex(regex::Regex),
}

impl PartialEq for KnownValuePattern {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (KnownValuePattern::Any, KnownValuePattern::Any) => true,
            (KnownValuePattern::Value(a), KnownValuePattern::Value(b)) => {
                a == b
            }
            (KnownValuePattern::Named(a), KnownValuePattern::Named(b)) => {
                a == b
            }
            (KnownValuePattern::Regex(a), KnownValuePattern::Regex(b)) => {
                a.as_str() == b.as_str()
            }
            _ => false,
        }
    }
}

impl KnownValuePattern {
    /// Creates a new `KnownValuePattern` that matches any known value.
    pub fn any() -> Self { KnownValuePattern::Any }

    /// Creates a new `KnownValuePattern` that matches a specific known value.
    pub fn value(value: KnownValue) -> Self { KnownValuePattern::Value(value) }

    /// Creates a new `KnownValuePattern` that matches a known value by name.
    pub fn named(name: impl Into<String>) -> Self {
        KnownValuePattern::Named(name.into())
    }

    /// Creates a new `KnownValuePattern` that matches known values whose
    /// registered name matches `regex`.
    pub fn regex(regex: regex::Regex) -> Self {
        KnownValuePattern::Regex(regex)
    }
}

fn as_known_value(cbor: &CBOR) -> Option<KnownValue> {
    if let CBORCase::Tagged(tag, content) = cbor.as_case() {
        if tag.value() == tags::TAG_KNOWN_VALUE {
            if let CBORCase::Unsigned(v) = content.as_case() {
                return Some(KnownValue::new(*v));
            }
        }
    }
    None
}

impl Matcher for KnownValuePattern {
    fn paths_with_captures(
        &self,
        cbor: &CBOR,
    ) -> (Vec<Path>, std::collections::HashMap<String, Vec<Path>>) {
        let is_hit = as_known_value(cbor).is_some_and(|value| match self {
            KnownValuePattern::Any => true,
            KnownValuePattern::Value(want) => value == *want,
            KnownValuePattern::Named(name) => KNOWN_VALUES
                .get()
                .as_ref()
                .and_then(|store| store.known_value_named(name))
                .is_some_and(|want| value == *want),
            KnownValuePattern::Regex(regex) => regex.is_match(&value.name()),
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
            &Pattern::Value(crate::pattern::value::ValuePattern::KnownValue(
                self.clone(),
            )),
            code,
            literals,
            captures,
        );
    }
}

impl std::fmt::Display for KnownValuePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KnownValuePattern::Any => write!(f, "known"),
            KnownValuePattern::Value(value) => {
                write!(f, "'{}'", value.name())
            }
            KnownValuePattern::Named(name) => write!(f, "'{}'", name),
            KnownValuePattern::Regex(regex) => {
                write!(f, "'/{}/'", regex.as_str())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_value_pattern_display() {
        let pattern = KnownValuePattern::any();
        assert_eq!(pattern.to_string(), "known");
        let pattern = KnownValuePattern::named("date");
        assert_eq!(pattern.to_string(), "'date'");
    }
}
