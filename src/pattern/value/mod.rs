//! Patterns that match a single CBOR leaf value in isolation: booleans,
//! null, numbers, text, byte strings, dates, digests, and known values.

mod bool_pattern;
mod byte_string_pattern;
mod date_pattern;
mod digest_pattern;
mod known_value_pattern;
mod null_pattern;
mod number_pattern;
mod text_pattern;

pub use bool_pattern::BoolPattern;
pub use byte_string_pattern::ByteStringPattern;
pub use date_pattern::DatePattern;
pub use digest_pattern::DigestPattern;
pub use known_value_pattern::KnownValuePattern;
pub use null_pattern::NullPattern;
pub use number_pattern::NumberPattern;
pub use text_pattern::TextPattern;

use dcbor::CBOR;

use crate::pattern::{Matcher, Path, vm::Instr};

/// Dispatches to the eight value-pattern variants named by the grammar's
/// `bool`, `null`, `number`, `text`, `bstr`, `date`, `digest`, and
/// known-value primaries.
#[derive(Debug, Clone, PartialEq)]
pub enum ValuePattern {
    Bool(BoolPattern),
    Null(NullPattern),
    Number(NumberPattern),
    Text(TextPattern),
    ByteString(ByteStringPattern),
    Date(DatePattern),
    Digest(DigestPattern),
    KnownValue(KnownValuePattern),
}

impl Matcher for ValuePattern {
    fn paths_with_captures(
        &self,
        cbor: &CBOR,
    ) -> (Vec<Path>, std::collections::HashMap<String, Vec<Path>>) {
        match self {
            ValuePattern::Bool(p) => p.paths_with_captures(cbor),
            ValuePattern::Null(p) => p.paths_with_captures(cbor),
            ValuePattern::Number(p) => p.paths_with_captures(cbor),
            ValuePattern::Text(p) => p.paths_with_captures(cbor),
            ValuePattern::ByteString(p) => p.paths_with_captures(cbor),
            ValuePattern::Date(p) => p.paths_with_captures(cbor),
            ValuePattern::Digest(p) => p.paths_with_captures(cbor),
            ValuePattern::KnownValue(p) => p.paths_with_captures(cbor),
        }
    }

    fn compile(
        &self,
        code: &mut Vec<Instr>,
        literals: &mut Vec<crate::pattern::Pattern>,
        captures: &mut Vec<String>,
    ) {
        match self {
            ValuePattern::Bool(p) => p.compile(code, literals, captures),
            ValuePattern::Null(p) => p.compile(code, literals, captures),
            ValuePattern::Number(p) => p.compile(code, literals, captures),
            ValuePattern::Text(p) => p.compile(code, literals, captures),
            ValuePattern::ByteString(p) => p.compile(code, literals, captures),
            ValuePattern::Date(p) => p.compile(code, literals, captures),
            ValuePattern::Digest(p) => p.compile(code, literals, captures),
            ValuePattern::KnownValue(p) => p.compile(code, literals, captures),
        }
    }
}

impl std::fmt::Display for ValuePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValuePattern::Bool(p) => write!(f, "{}", p),
            ValuePattern::Null(p) => write!(f, "{}", p),
            ValuePattern::Number(p) => write!(f, "{}", p),
            ValuePattern::Text(p) => write!(f, "{}", p),
            ValuePattern::ByteString(p) => write!(f, "{}", p),
            ValuePattern::Date(p) => write!(f, "{}", p),
            ValuePattern::Digest(p) => write!(f, "{}", p),
            ValuePattern::KnownValue(p) => write!(f, "{}", p),
        }
    }
}
