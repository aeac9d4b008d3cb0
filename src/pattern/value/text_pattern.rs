use dcbor::prelude::*;

use crate::pattern::{Matcher, Path, Pattern, compile_as_atomic, vm::Instr};

/// Pattern for matching text (CBOR major type 3) values.
#[derive(Debug, Clone)]
pub enum TextPattern {
    /// Matches any text.
    Any,
    /// Matches the specific text.
    Value(String),
    /// Matches text whose contents match a regex.
    Regex(regex::Regex),
}

impl PartialEq for TextPattern {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TextPattern::Any, TextPattern::Any) => true,
            (TextPattern::Value(a), TextPattern::Value(b)) => a == b,
            (TextPattern::Regex(a), TextPattern::Regex(b)) => {
                a.as_str() == b.as_str()
            }
            _ => false,
        }
    }
}

impl TextPattern {
    /// Creates a new `TextPattern` that matches any text.
    pub fn any() -> Self { TextPattern::Any }

    /// Creates a new `TextPattern` that matches the specific text.
    pub fn value<T: Into<String>>(value: T) -> Self {
        TextPattern::Value(value.into())
    }

    /// Creates a new `TextPattern` that matches text against a regex.
    pub fn regex(regex: regex::Regex) -> Self { TextPattern::Regex(regex) }
}

fn as_text(cbor: &CBOR) -> Option<String> {
    match cbor.as_case() {
        CBORCase::Text(s) => Some(s.clone()),
        _ => None,
    }
}

impl Matcher for TextPattern {
    fn paths_with_captures(
        &self,
        cbor: &CBOR,
    ) -> (Vec<Path>, std::collections::HashMap<String, Vec<Path>>) {
        let is_hit = as_text(cbor).is_some_and(|value| match self {
            TextPattern::Any => true,
            TextPattern::Value(want) => value == *want,
            TextPattern::Regex(regex) => regex.is_match(&value),
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
            &Pattern::Value(crate::pattern::value::ValuePattern::Text(
                self.clone(),
            )),
            code,
            literals,
            captures,
        );
    }
}

impl std::fmt::Display for TextPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextPattern::Any => write!(f, "text"),
            TextPattern::Value(value) => write!(f, "{:?}", value),
            TextPattern::Regex(regex) => write!(f, "/{}/", regex),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_pattern_display() {
        assert_eq!(TextPattern::any().to_string(), "text");
        assert_eq!(TextPattern::value("Hello").to_string(), r#""Hello""#);
        assert_eq!(
            TextPattern::regex(regex::Regex::new(r"^\d+$").unwrap())
                .to_string(),
            r"/^\d+$/"
        );
    }

    #[test]
    fn test_text_pattern_matches() {
        let hello = "Hello".to_cbor();
        assert!(TextPattern::any().matches(&hello));
        assert!(TextPattern::value("Hello").matches(&hello));
        assert!(!TextPattern::value("World").matches(&hello));
        assert!(
            TextPattern::regex(regex::Regex::new(r"^H").unwrap())
                .matches(&hello)
        );
        assert!(!TextPattern::any().matches(&42.to_cbor()));
    }
}
