use dcbor::CBOR;

use crate::pattern::{Pattern, vm::Instr};

/// An ordered sequence of CBOR values from a matched root down to a matched
/// descendant (both inclusive).
pub type Path = Vec<CBOR>;

/// Common behavior shared by every pattern node: path/capture computation,
/// bytecode emission, and a `Display` hint used when deciding whether a
/// sub-pattern needs grouping parentheses in its parent's rendering.
pub trait Matcher: std::fmt::Debug + std::fmt::Display + Clone {
    /// All paths at which this pattern matches `cbor`.
    fn paths(&self, cbor: &CBOR) -> Vec<Path> { self.paths_with_captures(cbor).0 }

    /// Paths together with any named captures collected while matching.
    fn paths_with_captures(
        &self,
        cbor: &CBOR,
    ) -> (Vec<Path>, std::collections::HashMap<String, Vec<Path>>) {
        (self.paths(cbor), std::collections::HashMap::new())
    }

    /// Shorthand for `!paths(cbor).is_empty()`.
    fn matches(&self, cbor: &CBOR) -> bool { !self.paths(cbor).is_empty() }

    /// Emit bytecode for this pattern into `code`, pushing any referenced
    /// sub-patterns into `literals` and any capture names into `captures`.
    fn compile(
        &self,
        _code: &mut Vec<Instr>,
        _literals: &mut Vec<Pattern>,
        _captures: &mut Vec<String>,
    ) {
        unimplemented!("Matcher::compile not implemented for {:?}", self);
    }

    /// True if this pattern's `Display` output contains top-level `|`/`&`
    /// and therefore needs grouping parentheses when nested inside another
    /// pattern's rendering.
    fn is_complex(&self) -> bool { false }
}

/// Push `pat` into `literals` and emit a single `MatchPredicate` referring to
/// it. Used by leaf (Value/Structure) patterns, which are always matched
/// atomically by the VM rather than compiled to nested bytecode.
pub fn compile_as_atomic(
    pat: &Pattern,
    code: &mut Vec<Instr>,
    literals: &mut Vec<Pattern>,
    _captures: &mut [String],
) {
    let idx = literals.len();
    literals.push(pat.clone());
    code.push(Instr::MatchPredicate(idx));
}
