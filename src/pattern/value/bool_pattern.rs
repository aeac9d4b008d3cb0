use dcbor::Simple;
use dcbor::prelude::*;

use crate::pattern::{Matcher, Path, Pattern, compile_as_atomic, vm::Instr};

/// Pattern for matching boolean values.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum BoolPattern {
    /// Matches any boolean value.
    Any,
    /// Matches the specific boolean value.
    Exact(bool),
}

impl BoolPattern {
    /// Creates a new `BoolPattern` that matches any boolean value.
    pub fn any() -> Self { BoolPattern::Any }

    /// Creates a new `BoolPattern` that matches the specific boolean value.
    pub fn exact(value: bool) -> Self { BoolPattern::Exact(value) }
}

fn as_bool(cbor: &CBOR) -> Option<bool> {
    match cbor.as_case() {
        CBORCase::Simple(Simple::True) => Some(true),
        CBORCase::Simple(Simple::False) => Some(false),
        _ => None,
    }
}

impl Matcher for BoolPattern {
    fn paths_with_captures(
        &self,
        cbor: &CBOR,
    ) -> (Vec<Path>, std::collections::HashMap<String, Vec<Path>>) {
        let is_hit = as_bool(cbor).is_some_and(|value| match self {
            BoolPattern::Any => true,
            BoolPattern::Exact(want) => value == *want,
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
            &Pattern::Value(crate::pattern::value::ValuePattern::Bool(
                self.clone(),
            )),
            code,
            literals,
            captures,
        );
    }
}

impl std::fmt::Display for BoolPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoolPattern::Any => write!(f, "bool"),
            BoolPattern::Exact(value) => write!(f, "{}", value),
        }
    }
}
