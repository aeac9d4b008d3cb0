use dcbor::prelude::*;

use crate::pattern::{Matcher, Path, Pattern, vm::Instr};

/// Pattern for matching CBOR tagged values: a tag selector plus a pattern
/// for the tagged content.
#[derive(Debug, Clone)]
pub enum TaggedPattern {
    /// Matches any tagged value.
    Any,
    /// Matches a specific tag number, with content matching `pattern`.
    Tag(u64, Box<Pattern>),
    /// Matches a tag by its registered name, with content matching
    /// `pattern`.
    Name(String, Box<Pattern>),
    /// Matches tags whose registered name matches a regex, with content
    /// matching `pattern`.
    Regex(regex::Regex, Box<Pattern>),
}

impl PartialEq for TaggedPattern {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TaggedPattern::Any, TaggedPattern::Any) => true,
            (TaggedPattern::Tag(a, ap), TaggedPattern::Tag(b, bp)) => {
                a == b && ap.to_string() == bp.to_string()
            }
            (TaggedPattern::Name(a, ap), TaggedPattern::Name(b, bp)) => {
                a == b && ap.to_string() == bp.to_string()
            }
            (TaggedPattern::Regex(a, ap), TaggedPattern::Regex(b, bp)) => {
                a.as_str() == b.as_str() && ap.to_string() == bp.to_string()
            }
            _ => false,
        }
    }
}

impl TaggedPattern {
    /// Creates a new `TaggedPattern` that matches any tagged value.
    pub fn any() -> Self { TaggedPattern::Any }

    /// Creates a new `TaggedPattern` that matches a specific tag number.
    pub fn tag(value: u64, pattern: Pattern) -> Self {
        TaggedPattern::Tag(value, Box::new(pattern))
    }

    /// Creates a new `TaggedPattern` that matches a tag by registered name.
    pub fn name(name: impl Into<String>, pattern: Pattern) -> Self {
        TaggedPattern::Name(name.into(), Box::new(pattern))
    }

    /// Creates a new `TaggedPattern` that matches tags whose registered
    /// name matches `regex`.
    pub fn regex(regex: regex::Regex, pattern: Pattern) -> Self {
        TaggedPattern::Regex(regex, Box::new(pattern))
    }
}

fn as_tagged(cbor: &CBOR) -> Option<(Tag, CBOR)> {
    match cbor.as_case() {
        CBORCase::Tagged(tag, content) => Some((tag.clone(), content.clone())),
        _ => None,
    }
}

impl Matcher for TaggedPattern {
    fn paths_with_captures(
        &self,
        cbor: &CBOR,
    ) -> (Vec<Path>, std::collections::HashMap<String, Vec<Path>>) {
        let Some((tag, content)) = as_tagged(cbor) else {
            return (vec![], std::collections::HashMap::new());
        };

        let matched_selector = match self {
            TaggedPattern::Any => true,
            TaggedPattern::Tag(value, _) => tag.value() == *value,
            TaggedPattern::Name(name, _) => with_tags!(|tags: &TagsStore| {
                match tags.tag_for_name(name) {
                    Some(want) => want.value() == tag.value(),
                    None => tag.value().to_string() == *name,
                }
            }),
            TaggedPattern::Regex(regex, _) => with_tags!(|tags: &TagsStore| {
                tags.assigned_name_for_tag(&tag)
                    .is_some_and(|name| regex.is_match(&name))
            }),
        };

        if !matched_selector {
            return (vec![], std::collections::HashMap::new());
        }

        let inner = match self {
            TaggedPattern::Any => None,
            TaggedPattern::Tag(_, p) => Some(p),
            TaggedPattern::Name(_, p) => Some(p),
            TaggedPattern::Regex(_, p) => Some(p),
        };

        let Some(inner) = inner else {
            return (
                vec![vec![cbor.clone()]],
                std::collections::HashMap::new(),
            );
        };

        let (content_paths, content_captures) =
            inner.paths_with_captures(&content);
        if content_paths.is_empty() {
            return (vec![], std::collections::HashMap::new());
        }

        let mut captures = std::collections::HashMap::new();
        for (name, paths) in content_captures {
            captures.insert(
                name,
                paths
                    .into_iter()
                    .map(|p| {
                        let mut full = vec![cbor.clone()];
                        full.extend(p);
                        full
                    })
                    .collect(),
            );
        }

        let mut path = vec![cbor.clone()];
        path.extend(content_paths[0].iter().cloned());
        (vec![path], captures)
    }

    fn compile(
        &self,
        code: &mut Vec<Instr>,
        literals: &mut Vec<Pattern>,
        captures: &mut Vec<String>,
    ) {
        let idx = literals.len();
        literals.push(Pattern::Structure(
            crate::pattern::structure::StructurePattern::Tagged(
                self.clone(),
            ),
        ));
        let _ = captures;
        code.push(Instr::MatchStructure(idx));
    }
}

impl std::fmt::Display for TaggedPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaggedPattern::Any => write!(f, "tagged"),
            TaggedPattern::Tag(value, pattern) => {
                write!(f, "tagged({}, {})", value, pattern)
            }
            TaggedPattern::Name(name, pattern) => {
                write!(f, "tagged({}, {})", name, pattern)
            }
            TaggedPattern::Regex(regex, pattern) => {
                write!(f, "tagged(/{}/, {})", regex, pattern)
            }
        }
    }
}
