use dcbor::prelude::*;

use crate::{
    Interval,
    pattern::{Matcher, Path, Pattern, vm::Instr},
};

/// Pattern for matching CBOR maps.
#[derive(Debug, Clone)]
pub enum MapPattern {
    /// Matches any map.
    Any,
    /// Matches maps whose entry count falls in the interval.
    Length(Interval),
    /// Matches maps containing, for each `(key_pattern, value_pattern)`
    /// constraint, at least one entry whose key and value both match.
    Constraints(Vec<(Pattern, Pattern)>),
}

impl PartialEq for MapPattern {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (MapPattern::Any, MapPattern::Any) => true,
            (MapPattern::Length(a), MapPattern::Length(b)) => a == b,
            (MapPattern::Constraints(a), MapPattern::Constraints(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b.iter()).all(|((ak, av), (bk, bv))| {
                        ak.to_string() == bk.to_string()
                            && av.to_string() == bv.to_string()
                    })
            }
            _ => false,
        }
    }
}

impl MapPattern {
    /// Creates a new `MapPattern` that matches any map.
    pub fn any() -> Self { MapPattern::Any }

    /// Creates a new `MapPattern` that matches maps with an entry count in
    /// `interval`.
    pub fn length(interval: Interval) -> Self { MapPattern::Length(interval) }

    /// Creates a new `MapPattern` constraining key/value pairs.
    pub fn constraints(pairs: Vec<(Pattern, Pattern)>) -> Self {
        MapPattern::Constraints(pairs)
    }
}

fn as_map(cbor: &CBOR) -> Option<Map> {
    match cbor.as_case() {
        CBORCase::Map(map) => Some(map.clone()),
        _ => None,
    }
}

impl Matcher for MapPattern {
    fn paths_with_captures(
        &self,
        cbor: &CBOR,
    ) -> (Vec<Path>, std::collections::HashMap<String, Vec<Path>>) {
        let Some(map) = as_map(cbor) else {
            return (vec![], std::collections::HashMap::new());
        };

        match self {
            MapPattern::Any => {
                (vec![vec![cbor.clone()]], std::collections::HashMap::new())
            }
            MapPattern::Length(interval) => {
                if interval.contains(map.len()) {
                    (
                        vec![vec![cbor.clone()]],
                        std::collections::HashMap::new(),
                    )
                } else {
                    (vec![], std::collections::HashMap::new())
                }
            }
            MapPattern::Constraints(pairs) => {
                let entries: Vec<(CBOR, CBOR)> =
                    map.iter().map(|(k, v)| (k.clone(), v.clone())).collect();

                let mut captures: std::collections::HashMap<String, Vec<Path>> =
                    std::collections::HashMap::new();

                for (key_pattern, value_pattern) in pairs {
                    let mut satisfied = false;
                    for (key, value) in &entries {
                        let (key_hits, key_caps) =
                            key_pattern.paths_with_captures(key);
                        let (value_hits, value_caps) =
                            value_pattern.paths_with_captures(value);
                        if !key_hits.is_empty() && !value_hits.is_empty() {
                            satisfied = true;
                            for (name, paths) in
                                key_caps.into_iter().chain(value_caps)
                            {
                                captures
                                    .entry(name)
                                    .or_default()
                                    .extend(paths.into_iter().map(|p| {
                                        let mut full = vec![cbor.clone()];
                                        full.extend(p);
                                        full
                                    }));
                            }
                            break;
                        }
                    }
                    if !satisfied {
                        return (vec![], std::collections::HashMap::new());
                    }
                }

                (vec![vec![cbor.clone()]], captures)
            }
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
            crate::pattern::structure::StructurePattern::Map(self.clone()),
        ));
        let _ = captures;
        code.push(Instr::MatchStructure(idx));
    }
}

impl std::fmt::Display for MapPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapPattern::Any => write!(f, "map"),
            MapPattern::Length(interval) => {
                write!(f, "{}", interval.range_notation())
            }
            MapPattern::Constraints(pairs) => {
                let rendered: Vec<String> = pairs
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, v))
                    .collect();
                write!(f, "{{{}}}", rendered.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_map() -> CBOR {
        let mut map = Map::new();
        map.insert("name".to_cbor(), "Alice".to_cbor());
        map.insert("age".to_cbor(), 30.to_cbor());
        map.to_cbor()
    }

    #[test]
    fn test_map_pattern_any() {
        assert!(MapPattern::any().matches(&sample_map()));
        assert!(!MapPattern::any().matches(&"not a map".to_cbor()));
    }

    #[test]
    fn test_map_pattern_length() {
        assert!(MapPattern::length(Interval::new(2..=2)).matches(&sample_map()));
        assert!(!MapPattern::length(Interval::new(3..=3)).matches(&sample_map()));
    }

    #[test]
    fn test_map_pattern_constraints() {
        use crate::pattern::value::{TextPattern, ValuePattern};

        let key_pattern =
            Pattern::Value(ValuePattern::Text(TextPattern::Value(
                "name".to_string(),
            )));
        let value_pattern =
            Pattern::Value(ValuePattern::Text(TextPattern::Any));
        let pattern =
            MapPattern::constraints(vec![(key_pattern, value_pattern)]);
        assert!(pattern.matches(&sample_map()));
    }
}
