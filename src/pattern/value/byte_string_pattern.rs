use dcbor::prelude::*;

use crate::pattern::{Matcher, Path, Pattern, compile_as_atomic, vm::Instr};

/// Pattern for matching byte string (CBOR major type 2) values.
#[derive(Debug, Clone)]
pub enum ByteStringPattern {
    /// Matches any byte string.
    Any,
    /// Matches the specific byte string.
    Value(Vec<u8>),
    /// Matches a byte string against a binary regex.
    Regex(regex::bytes::Regex),
}

impl PartialEq for ByteStringPattern {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ByteStringPattern::Any, ByteStringPattern::Any) => true,
            (ByteStringPattern::Value(a), ByteStringPattern::Value(b)) => {
                a == b
            }
            (ByteStringPattern::Regex(a), ByteStringPattern::Regex(b)) => {
                a.as_str() == b.as_str()
            }
            _ => false,
        }
    }
}

impl ByteStringPattern {
    /// Creates a new `ByteStringPattern` that matches any byte string.
    pub fn any() -> Self { ByteStringPattern::Any }

    /// Creates a new `ByteStringPattern` that matches a specific byte string.
    pub fn value(value: impl AsRef<[u8]>) -> Self {
        ByteStringPattern::Value(value.as_ref().to_vec())
    }

    /// Creates a new `ByteStringPattern` that matches a byte string against a
    /// binary regex.
    pub fn regex(regex: regex::bytes::Regex) -> Self {
        ByteStringPattern::Regex(regex)
    }
}

fn as_byte_string(cbor: &CBOR) -> Option<Vec<u8>> {
    CBOR::try_into_byte_string(cbor.clone()).ok()
}

impl Matcher for ByteStringPattern {
    fn paths_with_captures(
        &self,
        cbor: &CBOR,
    ) -> (Vec<Path>, std::collections::HashMap<String, Vec<Path>>) {
        let is_hit = as_byte_string(cbor).is_some_and(|bytes| match self {
            ByteStringPattern::Any => true,
            ByteStringPattern::Value(want) => &bytes == want,
            ByteStringPattern::Regex(regex) => regex.is_match(&bytes),
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
            &Pattern::Value(crate::pattern::value::ValuePattern::ByteString(
                self.clone(),
            )),
            code,
            literals,
            captures,
        );
    }
}

impl std::fmt::Display for ByteStringPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ByteStringPattern::Any => write!(f, "bytes"),
            ByteStringPattern::Value(value) => {
                write!(f, "h'{}'", hex::encode(value))
            }
            ByteStringPattern::Regex(regex) => {
                write!(f, "h'/{}/'", regex.as_str())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_string_pattern_display() {
        assert_eq!(ByteStringPattern::any().to_string(), "bytes");
        assert_eq!(
            ByteStringPattern::value([0xde, 0xad]).to_string(),
            "h'dead'"
        );
    }

    #[test]
    fn test_byte_string_pattern_matches() {
        let bytes_cbor = CBOR::to_byte_string(vec![1, 2, 3]);
        assert!(ByteStringPattern::any().matches(&bytes_cbor));
        assert!(ByteStringPattern::value([1, 2, 3]).matches(&bytes_cbor));
        assert!(!ByteStringPattern::value([1, 2]).matches(&bytes_cbor));
        assert!(!ByteStringPattern::any().matches(&"nope".to_cbor()));
    }
}
