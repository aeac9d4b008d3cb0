//! # Pattern
//!
//! A `Pattern` is one of three kinds:
//!
//! - **Value patterns** match a single CBOR scalar: booleans, null, numbers,
//!   text, byte strings, dates, digests, and known values.
//! - **Structure patterns** match the shape of a CBOR container: arrays,
//!   maps, and tagged values.
//! - **Meta patterns** combine and modify other patterns: conjunction,
//!   disjunction, negation, repetition, capture, search, and sequence.
//!
//! `Pattern::paths`/`matches` implement the direct tree-walking matcher.
//! `Pattern::compile` produces a `vm::Program` that an independent bytecode
//! interpreter (`vm::run`) executes; both are expected to agree on every
//! input.

use std::collections::HashMap;

use dcbor::Date;
use dcbor::prelude::*;
use known_values::KnownValue;

use super::{
    Matcher, Path,
    meta::MetaPattern,
    structure::{ArrayPattern, MapPattern, StructurePattern, TaggedPattern},
    value::{
        BoolPattern, ByteStringPattern, DatePattern, DigestPattern,
        KnownValuePattern, NullPattern, NumberPattern, TextPattern,
        ValuePattern,
    },
    vm::{self, Instr},
};
use crate::{Interval, Quantifier, Reluctance};

/// The top-level pattern type.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Matches a single CBOR scalar.
    Value(ValuePattern),
    /// Matches the shape of a CBOR container.
    Structure(StructurePattern),
    /// Combines or modifies other patterns.
    Meta(MetaPattern),
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Pattern::Value(a), Pattern::Value(b)) => a == b,
            (Pattern::Structure(a), Pattern::Structure(b)) => a == b,
            (Pattern::Meta(a), Pattern::Meta(b)) => a == b,
            _ => false,
        }
    }
}

impl Matcher for Pattern {
    fn paths_with_captures(
        &self,
        cbor: &CBOR,
    ) -> (Vec<Path>, HashMap<String, Vec<Path>>) {
        match self {
            Pattern::Value(p) => p.paths_with_captures(cbor),
            Pattern::Structure(p) => p.paths_with_captures(cbor),
            Pattern::Meta(p) => p.paths_with_captures(cbor),
        }
    }

    fn compile(
        &self,
        code: &mut Vec<Instr>,
        literals: &mut Vec<Pattern>,
        captures: &mut Vec<String>,
    ) {
        match self {
            Pattern::Value(p) => p.compile(code, literals, captures),
            Pattern::Structure(p) => p.compile(code, literals, captures),
            Pattern::Meta(p) => p.compile(code, literals, captures),
        }
    }

    fn is_complex(&self) -> bool {
        match self {
            Pattern::Value(p) => p.is_complex(),
            Pattern::Structure(p) => p.is_complex(),
            Pattern::Meta(p) => p.is_complex(),
        }
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Pattern::Value(p) => write!(f, "{}", p),
            Pattern::Structure(p) => write!(f, "{}", p),
            Pattern::Meta(p) => write!(f, "{}", p),
        }
    }
}

impl Pattern {
    /// Compiles this pattern into a runnable bytecode `Program`.
    pub fn compile_program(&self) -> vm::Program {
        let mut code = Vec::new();
        let mut literals = Vec::new();
        let mut capture_names = Vec::new();
        self.compile(&mut code, &mut literals, &mut capture_names);
        code.push(Instr::Accept);
        vm::Program { code, literals, capture_names }
    }

    /// Runs this pattern's compiled bytecode against `cbor`, returning the
    /// matching paths and any named captures.
    pub fn run(&self, cbor: &CBOR) -> (Vec<Path>, HashMap<String, Vec<Path>>) {
        vm::run(&self.compile_program(), cbor)
    }
}

// region: Value pattern constructors

impl Pattern {
    pub fn any() -> Self { Pattern::Meta(MetaPattern::Any) }

    pub fn any_bool() -> Self {
        Pattern::Value(ValuePattern::Bool(BoolPattern::any()))
    }

    pub fn bool(value: bool) -> Self {
        Pattern::Value(ValuePattern::Bool(BoolPattern::exact(value)))
    }

    pub fn null() -> Self { Pattern::Value(ValuePattern::Null(NullPattern)) }

    pub fn any_number() -> Self {
        Pattern::Value(ValuePattern::Number(NumberPattern::any()))
    }

    pub fn number(value: f64) -> Self {
        Pattern::Value(ValuePattern::Number(NumberPattern::value(value)))
    }

    pub fn number_range(min: f64, max: f64) -> Self {
        Pattern::Value(ValuePattern::Number(NumberPattern::range(min..=max)))
    }

    pub fn number_greater_than(value: f64) -> Self {
        Pattern::Value(ValuePattern::Number(NumberPattern::greater_than(
            value,
        )))
    }

    pub fn number_greater_than_or_equal(value: f64) -> Self {
        Pattern::Value(ValuePattern::Number(
            NumberPattern::greater_than_or_equal(value),
        ))
    }

    pub fn number_less_than(value: f64) -> Self {
        Pattern::Value(ValuePattern::Number(NumberPattern::less_than(value)))
    }

    pub fn number_less_than_or_equal(value: f64) -> Self {
        Pattern::Value(ValuePattern::Number(
            NumberPattern::less_than_or_equal(value),
        ))
    }

    pub fn number_nan() -> Self {
        Pattern::Value(ValuePattern::Number(NumberPattern::nan()))
    }

    pub fn any_text() -> Self {
        Pattern::Value(ValuePattern::Text(TextPattern::Any))
    }

    pub fn text(value: impl Into<String>) -> Self {
        Pattern::Value(ValuePattern::Text(TextPattern::Value(value.into())))
    }

    pub fn text_regex(regex: regex::Regex) -> Self {
        Pattern::Value(ValuePattern::Text(TextPattern::Regex(regex)))
    }

    pub fn any_byte_string() -> Self {
        Pattern::Value(ValuePattern::ByteString(ByteStringPattern::Any))
    }

    pub fn byte_string(value: impl AsRef<[u8]>) -> Self {
        Pattern::Value(ValuePattern::ByteString(ByteStringPattern::Value(
            value.as_ref().to_vec(),
        )))
    }

    pub fn byte_string_binary_regex(regex: regex::bytes::Regex) -> Self {
        Pattern::Value(ValuePattern::ByteString(ByteStringPattern::Regex(
            regex,
        )))
    }

    pub fn any_date() -> Self {
        Pattern::Value(ValuePattern::Date(DatePattern::any()))
    }

    pub fn date(date: Date) -> Self {
        Pattern::Value(ValuePattern::Date(DatePattern::value(date)))
    }

    pub fn date_range(range: std::ops::RangeInclusive<Date>) -> Self {
        Pattern::Value(ValuePattern::Date(DatePattern::range(range)))
    }

    pub fn date_earliest(date: Date) -> Self {
        Pattern::Value(ValuePattern::Date(DatePattern::earliest(date)))
    }

    pub fn date_latest(date: Date) -> Self {
        Pattern::Value(ValuePattern::Date(DatePattern::latest(date)))
    }

    pub fn date_iso8601(iso_string: impl Into<String>) -> Self {
        Pattern::Value(ValuePattern::Date(DatePattern::string(iso_string)))
    }

    pub fn date_regex(regex: regex::Regex) -> Self {
        Pattern::Value(ValuePattern::Date(DatePattern::regex(regex)))
    }

    pub fn any_digest() -> Self {
        Pattern::Value(ValuePattern::Digest(DigestPattern::any()))
    }

    pub fn digest(digest: bc_components::Digest) -> Self {
        Pattern::Value(ValuePattern::Digest(DigestPattern::digest(digest)))
    }

    pub fn digest_prefix(prefix: impl AsRef<[u8]>) -> Self {
        Pattern::Value(ValuePattern::Digest(DigestPattern::prefix(prefix)))
    }

    pub fn digest_binary_regex(regex: regex::bytes::Regex) -> Self {
        Pattern::Value(ValuePattern::Digest(DigestPattern::binary_regex(
            regex,
        )))
    }

    pub fn any_known_value() -> Self {
        Pattern::Value(ValuePattern::KnownValue(KnownValuePattern::any()))
    }

    pub fn known_value(value: KnownValue) -> Self {
        Pattern::Value(ValuePattern::KnownValue(KnownValuePattern::value(
            value,
        )))
    }

    pub fn known_value_named(name: impl Into<String>) -> Self {
        Pattern::Value(ValuePattern::KnownValue(KnownValuePattern::named(
            name,
        )))
    }

    pub fn known_value_regex(regex: regex::Regex) -> Self {
        Pattern::Value(ValuePattern::KnownValue(KnownValuePattern::regex(
            regex,
        )))
    }
}

// endregion

// region: Structure pattern constructors

impl Pattern {
    pub fn any_array() -> Self {
        Pattern::Structure(StructurePattern::Array(ArrayPattern::any()))
    }

    pub fn array_with_length(interval: Interval) -> Self {
        Pattern::Structure(StructurePattern::Array(ArrayPattern::length(
            interval,
        )))
    }

    pub fn array_with_elements(pattern: Pattern) -> Self {
        Pattern::Structure(StructurePattern::Array(ArrayPattern::elements(
            pattern,
        )))
    }

    pub fn any_map() -> Self {
        Pattern::Structure(StructurePattern::Map(MapPattern::any()))
    }

    pub fn map_with_length(interval: Interval) -> Self {
        Pattern::Structure(StructurePattern::Map(MapPattern::length(
            interval,
        )))
    }

    pub fn map_with_constraints(pairs: Vec<(Pattern, Pattern)>) -> Self {
        Pattern::Structure(StructurePattern::Map(MapPattern::constraints(
            pairs,
        )))
    }

    pub fn any_tagged() -> Self {
        Pattern::Structure(StructurePattern::Tagged(TaggedPattern::any()))
    }

    pub fn tagged_with_value(value: u64, content: Pattern) -> Self {
        Pattern::Structure(StructurePattern::Tagged(TaggedPattern::tag(
            value, content,
        )))
    }

    pub fn tagged_with_name(
        name: impl Into<String>,
        content: Pattern,
    ) -> Self {
        Pattern::Structure(StructurePattern::Tagged(TaggedPattern::name(
            name, content,
        )))
    }

    pub fn tagged_with_regex(regex: regex::Regex, content: Pattern) -> Self {
        Pattern::Structure(StructurePattern::Tagged(TaggedPattern::regex(
            regex, content,
        )))
    }
}

// endregion

// region: Meta pattern constructors

impl Pattern {
    pub fn and(patterns: Vec<Pattern>) -> Self {
        Pattern::Meta(MetaPattern::and(patterns))
    }

    pub fn or(patterns: Vec<Pattern>) -> Self {
        Pattern::Meta(MetaPattern::or(patterns))
    }

    pub fn not_matching(pattern: Pattern) -> Self {
        Pattern::Meta(MetaPattern::not(pattern))
    }

    pub fn repeat(
        pattern: Pattern,
        interval: impl std::ops::RangeBounds<usize>,
        reluctance: Reluctance,
    ) -> Self {
        Pattern::Meta(MetaPattern::repeat(
            pattern,
            Quantifier::new(interval, reluctance),
        ))
    }

    pub fn repeat_quantifier(pattern: Pattern, quantifier: Quantifier) -> Self {
        Pattern::Meta(MetaPattern::repeat(pattern, quantifier))
    }

    pub fn capture(name: impl Into<String>, pattern: Pattern) -> Self {
        Pattern::Meta(MetaPattern::capture(name, pattern))
    }

    pub fn search(pattern: Pattern) -> Self {
        Pattern::Meta(MetaPattern::search(pattern))
    }

    pub fn sequence(patterns: Vec<Pattern>) -> Self {
        Pattern::Meta(MetaPattern::sequence(patterns))
    }
}

// endregion

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_pattern_matches() {
        assert!(Pattern::bool(true).matches(&true.to_cbor()));
        assert!(!Pattern::bool(true).matches(&false.to_cbor()));
        assert!(Pattern::null().matches(&CBOR::null()));
        assert!(Pattern::number(42.0).matches(&42.to_cbor()));
        assert!(Pattern::text("hi").matches(&"hi".to_cbor()));
    }

    #[test]
    fn test_array_and_capture() {
        let pattern = Pattern::array_with_elements(Pattern::sequence(vec![
            Pattern::capture("first", Pattern::any_number()),
            Pattern::repeat(Pattern::any(), .., Reluctance::Greedy),
        ]));
        let array = vec![1.to_cbor(), "a".to_cbor(), true.to_cbor()].to_cbor();
        let (paths, captures) = pattern.paths_with_captures(&array);
        assert_eq!(paths.len(), 1);
        assert!(captures.contains_key("first"));
    }

    #[test]
    fn test_vm_equivalence_for_and() {
        let pattern = Pattern::and(vec![
            Pattern::number_greater_than(0.0),
            Pattern::number_less_than(10.0),
        ]);
        let value = 5.to_cbor();
        let direct = pattern.matches(&value);
        let (vm_paths, _) = pattern.run(&value);
        assert_eq!(direct, !vm_paths.is_empty());
    }

    #[test]
    fn test_search_via_vm() {
        let mut map = Map::new();
        map.insert("inner".to_cbor(), 42.to_cbor());
        let root = vec![map.to_cbor()].to_cbor();

        let pattern = Pattern::search(Pattern::number(42.0));
        let (paths, _) = pattern.run(&root);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].len(), 3);
    }
}
