use bc_components::{Digest, tags};
use dcbor::prelude::*;

use crate::pattern::{Matcher, Path, Pattern, vm::Instr};

/// Pattern for matching dCBOR digest values (CBOR tag 40001).
#[derive(Debug, Clone)]
pub enum DigestPattern {
    /// Matches any tagged digest.
    Any,
    /// Matches the exact digest.
    Digest(Digest),
    /// Matches the prefix of a digest.
    Prefix(Vec<u8>),
    /// Matches the binary regular expression for a digest.
    BinaryRegex(regex::bytes::Regex),
}

impl PartialEq for DigestPattern {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (DigestPattern::Any, DigestPattern::Any) => true,
            (DigestPattern::Digest(a), DigestPattern::Digest(b)) => a == b,
            (DigestPattern::Prefix(a), DigestPattern::Prefix(b)) => a == b,
            (DigestPattern::BinaryRegex(a), DigestPattern::BinaryRegex(b)) => {
                a.as_str() == b.as_str()
            }
            _ => false,
        }
    }
}

impl DigestPattern {
    /// Creates a new `DigestPattern` that matches any tagged digest.
    pub fn any() -> Self { DigestPattern::Any }

    /// Creates a new `DigestPattern` that matches the exact digest.
    pub fn digest(digest: Digest) -> Self { DigestPattern::Digest(digest) }

    /// Creates a new `DigestPattern` that matches the prefix of a digest.
    pub fn prefix(prefix: impl AsRef<[u8]>) -> Self {
        DigestPattern::Prefix(prefix.as_ref().to_vec())
    }

    /// Creates a new `DigestPattern` that matches the binary regex for a
    /// digest.
    pub fn binary_regex(regex: regex::bytes::Regex) -> Self {
        DigestPattern::BinaryRegex(regex)
    }
}

impl Matcher for DigestPattern {
    fn paths_with_captures(
        &self,
        cbor: &CBOR,
    ) -> (Vec<Path>, std::collections::HashMap<String, Vec<Path>>) {
        let mut hit = false;
        if let CBORCase::Tagged(tag, content) = cbor.as_case() {
            if tag.value() == tags::TAG_DIGEST {
                if let Ok(digest_bytes) =
                    CBOR::try_into_byte_string(content.clone())
                {
                    if digest_bytes.len() == Digest::DIGEST_SIZE {
                        hit = match self {
                            DigestPattern::Any => true,
                            DigestPattern::Digest(want) => {
                                digest_bytes == want.data()
                            }
                            DigestPattern::Prefix(prefix) => {
                                digest_bytes.starts_with(prefix)
                            }
                            DigestPattern::BinaryRegex(regex) => {
                                regex.is_match(&digest_bytes)
                            }
                        };
                    }
                }
            }
        }
        let paths = if hit { vec![vec![cbor.clone()]] } else { vec![] };
        (paths, std::collections::HashMap::new())
    }

    fn compile(
        &self,
        code: &mut Vec<Instr>,
        literals: &mut Vec<Pattern>,
        _captures: &mut Vec<String>,
    ) {
        let idx = literals.len();
        literals.push(Pattern::Value(crate::pattern::value::ValuePattern::Digest(
            self.clone(),
        )));
        code.push(Instr::MatchPredicate(idx));
    }
}

impl std::fmt::Display for DigestPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DigestPattern::Any => write!(f, "digest"),
            DigestPattern::Digest(digest) => {
                write!(f, "digest'{}'", hex::encode(digest.data()))
            }
            DigestPattern::Prefix(prefix) => {
                write!(f, "digest'{}'", hex::encode(prefix))
            }
            DigestPattern::BinaryRegex(regex) => {
                write!(f, "digest'/{}/'", regex)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use bc_components::DigestProvider;

    use super::*;

    fn test_digest() -> Digest {
        let data: &[u8] = b"test data";
        data.digest().into_owned()
    }

    #[test]
    fn test_digest_pattern_exact_match() {
        let digest = test_digest();
        let digest_cbor = digest.to_cbor();
        let pattern = DigestPattern::digest(digest.clone());

        assert!(pattern.matches(&digest_cbor));

        let other_digest = (b"other data" as &[u8]).digest().into_owned();
        let other_cbor = other_digest.to_cbor();
        assert!(!pattern.matches(&other_cbor));
    }

    #[test]
    fn test_digest_pattern_prefix_match() {
        let digest = test_digest();
        let digest_cbor = digest.to_cbor();
        let prefix = digest.data()[..4].to_vec();
        let pattern = DigestPattern::prefix(prefix);
        assert!(pattern.matches(&digest_cbor));
    }

    #[test]
    fn test_digest_pattern_non_digest_cbor() {
        let pattern = DigestPattern::digest(test_digest());
        assert!(!pattern.matches(&"hello".to_cbor()));
        assert!(!pattern.matches(&42.to_cbor()));
    }
}
