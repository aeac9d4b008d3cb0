use dcbor::prelude::*;

use crate::{
    Interval,
    pattern::{
        Matcher, Path, Pattern, array_backtracker, meta::MetaPattern,
        vm::Instr,
    },
};

/// Pattern for matching CBOR arrays.
#[derive(Debug, Clone)]
pub enum ArrayPattern {
    /// Matches any array.
    Any,
    /// Matches arrays whose length falls in the interval.
    Length(Interval),
    /// Matches arrays whose elements satisfy an element-sequence pattern
    /// (a `Sequence`/`Repeat`), or, for a bare leaf pattern, an array of
    /// exactly one matching element.
    Elements(Box<Pattern>),
}

impl PartialEq for ArrayPattern {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ArrayPattern::Any, ArrayPattern::Any) => true,
            (ArrayPattern::Length(a), ArrayPattern::Length(b)) => a == b,
            (ArrayPattern::Elements(a), ArrayPattern::Elements(b)) => {
                a.to_string() == b.to_string()
            }
            _ => false,
        }
    }
}

impl ArrayPattern {
    /// Creates a new `ArrayPattern` that matches any array.
    pub fn any() -> Self { ArrayPattern::Any }

    /// Creates a new `ArrayPattern` that matches arrays with a length in
    /// `range`.
    pub fn length(interval: Interval) -> Self { ArrayPattern::Length(interval) }

    /// Creates a new `ArrayPattern` constraining the array's elements.
    pub fn elements(pattern: Pattern) -> Self {
        ArrayPattern::Elements(Box::new(pattern))
    }
}

fn as_array(cbor: &CBOR) -> Option<Vec<CBOR>> {
    match cbor.as_case() {
        CBORCase::Array(arr) => Some(arr.clone()),
        _ => None,
    }
}

impl Matcher for ArrayPattern {
    fn paths_with_captures(
        &self,
        cbor: &CBOR,
    ) -> (Vec<Path>, std::collections::HashMap<String, Vec<Path>>) {
        let Some(array) = as_array(cbor) else {
            return (vec![], std::collections::HashMap::new());
        };

        match self {
            ArrayPattern::Any => {
                (vec![vec![cbor.clone()]], std::collections::HashMap::new())
            }
            ArrayPattern::Length(interval) => {
                if interval.contains(array.len()) {
                    (
                        vec![vec![cbor.clone()]],
                        std::collections::HashMap::new(),
                    )
                } else {
                    (vec![], std::collections::HashMap::new())
                }
            }
            ArrayPattern::Elements(pattern) => match pattern.as_ref() {
                Pattern::Meta(MetaPattern::Sequence(members)) => {
                    match array_backtracker::match_sequence(
                        members, &array, cbor,
                    ) {
                        Some(captures) => {
                            (vec![vec![cbor.clone()]], captures)
                        }
                        None => (vec![], std::collections::HashMap::new()),
                    }
                }
                Pattern::Meta(MetaPattern::Repeat(_, _)) => {
                    let members = [pattern.as_ref().clone()];
                    match array_backtracker::match_sequence(
                        &members, &array, cbor,
                    ) {
                        Some(captures) => {
                            (vec![vec![cbor.clone()]], captures)
                        }
                        None => (vec![], std::collections::HashMap::new()),
                    }
                }
                Pattern::Meta(MetaPattern::Capture(name, inner))
                    if matches!(inner.as_ref(), Pattern::Meta(MetaPattern::Repeat(_, _))) =>
                {
                    let members = [pattern.as_ref().clone()];
                    let _ = name;
                    match array_backtracker::match_sequence(
                        &members, &array, cbor,
                    ) {
                        Some(captures) => {
                            (vec![vec![cbor.clone()]], captures)
                        }
                        None => (vec![], std::collections::HashMap::new()),
                    }
                }
                Pattern::Meta(_) => {
                    // Any-element semantics: some element of the array must
                    // satisfy the (possibly capturing) inner pattern.
                    let mut captures = std::collections::HashMap::new();
                    let mut any_hit = false;
                    for element in &array {
                        let (hit_paths, hit_captures) =
                            pattern.paths_with_captures(element);
                        if !hit_paths.is_empty() {
                            any_hit = true;
                            for (k, v) in hit_captures {
                                captures.entry(k).or_insert_with(Vec::new).extend(
                                    v.into_iter().map(|p| {
                                        let mut full = vec![cbor.clone()];
                                        full.extend(p);
                                        full
                                    }),
                                );
                            }
                        }
                    }
                    if any_hit {
                        (vec![vec![cbor.clone()]], captures)
                    } else {
                        (vec![], std::collections::HashMap::new())
                    }
                }
                _ => {
                    if array.len() == 1 && pattern.matches(&array[0]) {
                        (
                            vec![vec![cbor.clone()]],
                            std::collections::HashMap::new(),
                        )
                    } else {
                        (vec![], std::collections::HashMap::new())
                    }
                }
            },
        }
    }

    fn compile(
        &self,
        code: &mut Vec<Instr>,
        literals: &mut Vec<Pattern>,
        captures: &mut Vec<String>,
    ) {
        let idx = literals.len();
        literals.push(Pattern::Structure(
            crate::pattern::structure::StructurePattern::Array(self.clone()),
        ));
        let _ = captures;
        code.push(Instr::MatchStructure(idx));
    }
}

impl std::fmt::Display for ArrayPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArrayPattern::Any => write!(f, "array"),
            ArrayPattern::Length(interval) => {
                write!(f, "[{}]", interval.range_notation())
            }
            ArrayPattern::Elements(pattern) => write!(f, "[{}]", pattern),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_pattern_any() {
        let arr = vec![1, 2, 3].to_cbor();
        assert!(ArrayPattern::any().matches(&arr));
        assert!(!ArrayPattern::any().matches(&"test".to_cbor()));
    }

    #[test]
    fn test_array_pattern_length() {
        let arr = vec![1, 2, 3].to_cbor();
        assert!(ArrayPattern::length(Interval::new(3..=3)).matches(&arr));
        assert!(!ArrayPattern::length(Interval::new(4..=4)).matches(&arr));
    }
}
