use dcbor::Simple;
use dcbor::prelude::*;

use crate::pattern::{Matcher, Path, Pattern, compile_as_atomic, vm::Instr};

/// Pattern for matching the CBOR null (simple value) leaf.
#[derive(Debug, Clone, Copy, Default, Hash, Eq, PartialEq)]
pub struct NullPattern;

impl NullPattern {
    /// Creates a new `NullPattern`.
    pub fn new() -> Self { NullPattern }
}

impl Matcher for NullPattern {
    fn paths_with_captures(
        &self,
        cbor: &CBOR,
    ) -> (Vec<Path>, std::collections::HashMap<String, Vec<Path>>) {
        let is_hit = matches!(cbor.as_case(), CBORCase::Simple(Simple::Null));
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
            &Pattern::Value(crate::pattern::value::ValuePattern::Null(
                *self,
            )),
            code,
            literals,
            captures,
        );
    }
}

impl std::fmt::Display for NullPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "null")
    }
}
