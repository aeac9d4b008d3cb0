//! Structural patterns: arrays, maps, and tagged values.

mod array_pattern;
mod map_pattern;
mod tagged_pattern;

use std::collections::HashMap;

pub use array_pattern::ArrayPattern;
use dcbor::prelude::*;
pub use map_pattern::MapPattern;
pub use tagged_pattern::TaggedPattern;

use super::{Matcher, Path, Pattern, vm::Instr};

/// A pattern that matches a CBOR array, map, or tagged value.
#[derive(Debug, Clone, PartialEq)]
pub enum StructurePattern {
    /// Matches CBOR arrays.
    Array(ArrayPattern),
    /// Matches CBOR maps.
    Map(MapPattern),
    /// Matches CBOR tagged values.
    Tagged(TaggedPattern),
}

impl Matcher for StructurePattern {
    fn paths_with_captures(
        &self,
        cbor: &CBOR,
    ) -> (Vec<Path>, HashMap<String, Vec<Path>>) {
        match self {
            StructurePattern::Array(p) => p.paths_with_captures(cbor),
            StructurePattern::Map(p) => p.paths_with_captures(cbor),
            StructurePattern::Tagged(p) => p.paths_with_captures(cbor),
        }
    }

    fn compile(
        &self,
        code: &mut Vec<Instr>,
        literals: &mut Vec<Pattern>,
        captures: &mut Vec<String>,
    ) {
        match self {
            StructurePattern::Array(p) => p.compile(code, literals, captures),
            StructurePattern::Map(p) => p.compile(code, literals, captures),
            StructurePattern::Tagged(p) => p.compile(code, literals, captures),
        }
    }

    fn is_complex(&self) -> bool {
        match self {
            StructurePattern::Array(ArrayPattern::Elements(_)) => true,
            StructurePattern::Map(MapPattern::Constraints(_)) => true,
            StructurePattern::Tagged(_) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for StructurePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StructurePattern::Array(p) => write!(f, "{}", p),
            StructurePattern::Map(p) => write!(f, "{}", p),
            StructurePattern::Tagged(p) => write!(f, "{}", p),
        }
    }
}
