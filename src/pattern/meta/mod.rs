//! Combinators over other patterns: conjunction, disjunction, negation,
//! repetition, capture, search, and sequence.

use std::collections::HashMap;

use dcbor::prelude::*;

use super::{
    Matcher, Path, Pattern,
    structure::{ArrayPattern, MapPattern, StructurePattern, TaggedPattern},
    vm::Instr,
};
use crate::Quantifier;

/// A combinator pattern built out of other patterns.
#[derive(Debug, Clone)]
pub enum MetaPattern {
    /// Matches any CBOR value.
    Any,
    /// Matches when every contained pattern matches.
    And(Vec<Pattern>),
    /// Matches when at least one contained pattern matches.
    Or(Vec<Pattern>),
    /// Matches when the inner pattern does not match.
    Not(Box<Pattern>),
    /// Matches a repeated run of the inner pattern (array-sequence context)
    /// or, against a scalar, the inner pattern matching once when `1` is in
    /// the quantifier's interval.
    Repeat(Box<Pattern>, Quantifier),
    /// Delegates to the inner pattern, recording the matched path under
    /// `name`.
    Capture(String, Box<Pattern>),
    /// Searches the entire CBOR subtree (this value and every descendant)
    /// for nodes matching the inner pattern.
    Search(Box<Pattern>),
    /// Matches every element in order (array-sequence context) or acts as a
    /// conjunction (scalar context).
    Sequence(Vec<Pattern>),
}

impl PartialEq for MetaPattern {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl MetaPattern {
    /// Creates a new `MetaPattern` that matches any CBOR value.
    pub fn any() -> Self { MetaPattern::Any }

    /// Creates a new `MetaPattern` that requires every pattern to match.
    pub fn and(patterns: Vec<Pattern>) -> Self { MetaPattern::And(patterns) }

    /// Creates a new `MetaPattern` that requires at least one pattern to
    /// match.
    pub fn or(patterns: Vec<Pattern>) -> Self { MetaPattern::Or(patterns) }

    /// Creates a new `MetaPattern` that matches when `pattern` does not.
    pub fn not(pattern: Pattern) -> Self { MetaPattern::Not(Box::new(pattern)) }

    /// Creates a new `MetaPattern` that repeats `pattern` per `quantifier`.
    pub fn repeat(pattern: Pattern, quantifier: Quantifier) -> Self {
        MetaPattern::Repeat(Box::new(pattern), quantifier)
    }

    /// Creates a new `MetaPattern` that captures matches of `pattern` under
    /// `name`.
    pub fn capture(name: impl Into<String>, pattern: Pattern) -> Self {
        MetaPattern::Capture(name.into(), Box::new(pattern))
    }

    /// Creates a new `MetaPattern` that searches the whole subtree for
    /// `pattern`.
    pub fn search(pattern: Pattern) -> Self {
        MetaPattern::Search(Box::new(pattern))
    }

    /// Creates a new `MetaPattern` that matches a sequence of patterns.
    pub fn sequence(patterns: Vec<Pattern>) -> Self {
        MetaPattern::Sequence(patterns)
    }
}

fn children_of(cbor: &CBOR) -> Vec<CBOR> {
    match cbor.as_case() {
        CBORCase::Array(arr) => arr.clone(),
        CBORCase::Map(map) => {
            map.iter().flat_map(|(k, v)| [k.clone(), v.clone()]).collect()
        }
        CBORCase::Tagged(_, content) => vec![content.clone()],
        _ => Vec::new(),
    }
}

fn walk_search(
    node: &CBOR,
    path_to_node: &Path,
    pattern: &Pattern,
    out_paths: &mut Vec<Path>,
    out_captures: &mut HashMap<String, Vec<Path>>,
) {
    let (hit_paths, hit_captures) = pattern.paths_with_captures(node);
    if !hit_paths.is_empty() {
        out_paths.push(path_to_node.clone());
        for (name, paths) in hit_captures {
            out_captures.entry(name).or_default().extend(paths);
        }
    }

    match node.as_case() {
        CBORCase::Array(arr) => {
            for child in arr {
                let mut next = path_to_node.clone();
                next.push(child.clone());
                walk_search(child, &next, pattern, out_paths, out_captures);
            }
        }
        CBORCase::Map(map) => {
            for (k, v) in map.iter() {
                let mut key_path = path_to_node.clone();
                key_path.push(k.clone());
                walk_search(k, &key_path, pattern, out_paths, out_captures);

                let mut value_path = path_to_node.clone();
                value_path.push(v.clone());
                walk_search(v, &value_path, pattern, out_paths, out_captures);
            }
        }
        CBORCase::Tagged(_, content) => {
            let mut next = path_to_node.clone();
            next.push(content.clone());
            walk_search(content, &next, pattern, out_paths, out_captures);
        }
        _ => {}
    }
}

/// Collects every capture name transitively referenced by `pattern`, in the
/// order first encountered.
pub(crate) fn collect_capture_names(pattern: &Pattern, names: &mut Vec<String>) {
    match pattern {
        Pattern::Value(_) => {}
        Pattern::Structure(s) => match s {
            StructurePattern::Array(ArrayPattern::Elements(inner)) => {
                collect_capture_names(inner, names)
            }
            StructurePattern::Array(_) => {}
            StructurePattern::Map(MapPattern::Constraints(pairs)) => {
                for (k, v) in pairs {
                    collect_capture_names(k, names);
                    collect_capture_names(v, names);
                }
            }
            StructurePattern::Map(_) => {}
            StructurePattern::Tagged(t) => match t {
                TaggedPattern::Tag(_, inner)
                | TaggedPattern::Name(_, inner)
                | TaggedPattern::Regex(_, inner) => {
                    collect_capture_names(inner, names)
                }
                TaggedPattern::Any => {}
            },
        },
        Pattern::Meta(m) => match m {
            MetaPattern::Any => {}
            MetaPattern::And(ps)
            | MetaPattern::Or(ps)
            | MetaPattern::Sequence(ps) => {
                for p in ps {
                    collect_capture_names(p, names);
                }
            }
            MetaPattern::Not(inner) => collect_capture_names(inner, names),
            MetaPattern::Repeat(inner, _) => collect_capture_names(inner, names),
            MetaPattern::Capture(name, inner) => {
                if !names.contains(name) {
                    names.push(name.clone());
                }
                collect_capture_names(inner, names);
            }
            MetaPattern::Search(inner) => collect_capture_names(inner, names),
        },
    }
}

fn capture_index(captures: &mut Vec<String>, name: &str) -> usize {
    match captures.iter().position(|n| n == name) {
        Some(i) => i,
        None => {
            captures.push(name.to_string());
            captures.len() - 1
        }
    }
}

impl Matcher for MetaPattern {
    fn paths_with_captures(
        &self,
        cbor: &CBOR,
    ) -> (Vec<Path>, HashMap<String, Vec<Path>>) {
        match self {
            MetaPattern::Any => (vec![vec![cbor.clone()]], HashMap::new()),

            MetaPattern::And(patterns) | MetaPattern::Sequence(patterns) => {
                let mut merged = HashMap::new();
                for pattern in patterns {
                    let (paths, captures) = pattern.paths_with_captures(cbor);
                    if paths.is_empty() {
                        return (vec![], HashMap::new());
                    }
                    for (name, ps) in captures {
                        merged.entry(name).or_insert_with(Vec::new).extend(ps);
                    }
                }
                (vec![vec![cbor.clone()]], merged)
            }

            MetaPattern::Or(patterns) => {
                for pattern in patterns {
                    let (paths, captures) = pattern.paths_with_captures(cbor);
                    if !paths.is_empty() {
                        return (vec![vec![cbor.clone()]], captures);
                    }
                }
                (vec![], HashMap::new())
            }

            MetaPattern::Not(inner) => {
                if inner.matches(cbor) {
                    (vec![], HashMap::new())
                } else {
                    (vec![vec![cbor.clone()]], HashMap::new())
                }
            }

            MetaPattern::Repeat(inner, quantifier) => {
                if quantifier.contains(1) && inner.matches(cbor) {
                    (vec![vec![cbor.clone()]], HashMap::new())
                } else {
                    (vec![], HashMap::new())
                }
            }

            MetaPattern::Capture(name, inner) => {
                let (paths, mut captures) = inner.paths_with_captures(cbor);
                if !paths.is_empty() {
                    for path in &paths {
                        captures
                            .entry(name.clone())
                            .or_insert_with(Vec::new)
                            .push(path.clone());
                    }
                }
                (paths, captures)
            }

            MetaPattern::Search(inner) => {
                let mut out_paths = Vec::new();
                let mut out_captures = HashMap::new();
                walk_search(
                    cbor,
                    &vec![cbor.clone()],
                    inner,
                    &mut out_paths,
                    &mut out_captures,
                );
                (out_paths, out_captures)
            }
        }
    }

    fn compile(
        &self,
        code: &mut Vec<Instr>,
        literals: &mut Vec<Pattern>,
        captures: &mut Vec<String>,
    ) {
        match self {
            MetaPattern::Any => {
                super::compile_as_atomic(
                    &Pattern::Meta(MetaPattern::Any),
                    code,
                    literals,
                    captures,
                );
            }

            MetaPattern::And(patterns) => {
                for pattern in patterns {
                    pattern.compile(code, literals, captures);
                }
            }

            MetaPattern::Or(patterns) => {
                if patterns.is_empty() {
                    return;
                }
                let mut splits = Vec::new();
                for _ in 0..patterns.len() - 1 {
                    splits.push(code.len());
                    code.push(Instr::Split { a: 0, b: 0 });
                }

                let mut jumps = Vec::new();
                for (i, pattern) in patterns.iter().enumerate() {
                    let start = code.len();
                    pattern.compile(code, literals, captures);
                    jumps.push(code.len());
                    code.push(Instr::Jump(0));

                    if i < patterns.len() - 1 {
                        let next = code.len();
                        code[splits[i]] = Instr::Split { a: start, b: next };
                    }
                }

                let end = code.len();
                for jump in jumps {
                    code[jump] = Instr::Jump(end);
                }
            }

            MetaPattern::Not(inner) => {
                let idx = literals.len();
                literals.push((**inner).clone());
                code.push(Instr::NotMatch { pat_idx: idx });
            }

            MetaPattern::Repeat(inner, quantifier) => {
                let idx = literals.len();
                literals.push((**inner).clone());
                code.push(Instr::Repeat { pat_idx: idx, quantifier: *quantifier });
            }

            MetaPattern::Capture(name, inner) => {
                let idx = capture_index(captures, name);
                code.push(Instr::CaptureStart(idx));
                inner.compile(code, literals, captures);
                code.push(Instr::CaptureEnd(idx));
            }

            MetaPattern::Search(inner) => {
                let mut inner_names = Vec::new();
                collect_capture_names(inner, &mut inner_names);
                let capture_map = inner_names
                    .into_iter()
                    .map(|name| {
                        let idx = capture_index(captures, &name);
                        (name, idx)
                    })
                    .collect();

                let idx = literals.len();
                literals.push((**inner).clone());
                code.push(Instr::Search { pat_idx: idx, capture_map });
            }

            MetaPattern::Sequence(patterns) => {
                if let Some((first, rest)) = patterns.split_first() {
                    first.compile(code, literals, captures);
                    for pattern in rest {
                        code.push(Instr::ExtendSequence);
                        pattern.compile(code, literals, captures);
                        code.push(Instr::CombineSequence);
                    }
                }
            }
        }
    }

    fn is_complex(&self) -> bool {
        match self {
            MetaPattern::Any => false,
            MetaPattern::And(ps) => ps.len() > 1,
            MetaPattern::Or(ps) => ps.len() > 1,
            MetaPattern::Not(_) => false,
            MetaPattern::Repeat(inner, _) => inner.is_complex(),
            MetaPattern::Capture(_, _) => false,
            MetaPattern::Search(_) => false,
            MetaPattern::Sequence(ps) => ps.len() > 1,
        }
    }
}

impl std::fmt::Display for MetaPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetaPattern::Any => write!(f, "*"),
            MetaPattern::And(patterns) => write!(
                f,
                "{}",
                patterns
                    .iter()
                    .map(|p| p.to_string())
                    .collect::<Vec<_>>()
                    .join(" & ")
            ),
            MetaPattern::Or(patterns) => write!(
                f,
                "{}",
                patterns
                    .iter()
                    .map(|p| p.to_string())
                    .collect::<Vec<_>>()
                    .join(" | ")
            ),
            MetaPattern::Not(inner) => write!(f, "!{}", inner),
            MetaPattern::Repeat(inner, quantifier) => {
                if inner.is_complex() {
                    write!(f, "({}){}", inner, quantifier)
                } else {
                    write!(f, "{}{}", inner, quantifier)
                }
            }
            MetaPattern::Capture(name, inner) => {
                write!(f, "@{}({})", name, inner)
            }
            MetaPattern::Search(inner) => write!(f, "...({})", inner),
            MetaPattern::Sequence(patterns) => write!(
                f,
                "{}",
                patterns
                    .iter()
                    .map(|p| p.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Reluctance,
        pattern::value::{NumberPattern, ValuePattern},
    };

    fn num(n: i32) -> Pattern {
        Pattern::Value(ValuePattern::Number(NumberPattern::value(n)))
    }

    #[test]
    fn test_any_matches_everything() {
        let any = MetaPattern::any();
        assert!(any.matches(&1.to_cbor()));
        assert!(any.matches(&"text".to_cbor()));
    }

    #[test]
    fn test_and_requires_all() {
        let gt = Pattern::Value(ValuePattern::Number(
            NumberPattern::greater_than(5.0),
        ));
        let lt =
            Pattern::Value(ValuePattern::Number(NumberPattern::less_than(10.0)));
        let and = MetaPattern::and(vec![gt, lt]);
        assert!(and.matches(&7.to_cbor()));
        assert!(!and.matches(&20.to_cbor()));
    }

    #[test]
    fn test_or_requires_any() {
        let or = MetaPattern::or(vec![num(1), num(2)]);
        assert!(or.matches(&1.to_cbor()));
        assert!(or.matches(&2.to_cbor()));
        assert!(!or.matches(&3.to_cbor()));
    }

    #[test]
    fn test_not_inverts() {
        let not = MetaPattern::not(num(1));
        assert!(not.matches(&2.to_cbor()));
        assert!(!not.matches(&1.to_cbor()));
    }

    #[test]
    fn test_capture_records_path() {
        let capture = MetaPattern::capture("x", num(1));
        let (paths, captures) = capture.paths_with_captures(&1.to_cbor());
        assert_eq!(paths.len(), 1);
        assert_eq!(captures.get("x").unwrap().len(), 1);
    }

    #[test]
    fn test_search_finds_nested_value() {
        let mut map = Map::new();
        map.insert("inner".to_cbor(), 42.to_cbor());
        let root = vec![map.to_cbor()].to_cbor();

        let search = MetaPattern::search(num(42));
        let paths = search.paths(&root);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].len(), 3);
    }

    #[test]
    fn test_repeat_scalar_context() {
        let repeat = MetaPattern::repeat(
            num(1),
            Quantifier::new(0..=2, Reluctance::Greedy),
        );
        assert!(repeat.matches(&1.to_cbor()));
        assert!(!repeat.matches(&2.to_cbor()));
    }
}
