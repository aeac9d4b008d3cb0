//! Array-sequence assignment search (see `Structure::Array(Elements)`).
//!
//! Assigns each element of a CBOR array to one of a sequence of element
//! patterns, left to right, where an ordinary pattern consumes exactly one
//! element and a `Repeat` pattern consumes a contiguous run bounded by its
//! quantifier. Greedy repeats try the longest run first; lazy repeats try
//! the shortest; possessive repeats try only the longest and never give it
//! back.
//!
//! The search succeeds as soon as every slot has consumed elements
//! satisfying its pattern; trailing array elements past the last slot are
//! not required to be consumed. This is what lets a lazy repeat settle for
//! an empty run when a later slot can already be satisfied, rather than
//! being forced to expand until the whole array is spoken for.

use std::collections::HashMap;

use dcbor::prelude::*;

use crate::{
    Reluctance,
    pattern::{Matcher, Path, Pattern, meta::MetaPattern},
};

enum Slot<'a> {
    /// Consumes exactly one element matching `pattern`, optionally under a
    /// capture name attached directly to this slot.
    One { pattern: &'a Pattern, capture: Option<&'a str> },
    /// Consumes a run of `lo..=hi` elements each matching `pattern`.
    Run {
        pattern: &'a Pattern,
        lo: usize,
        hi: usize,
        reluctance: Reluctance,
        capture: Option<&'a str>,
    },
}

fn to_slot(pattern: &Pattern) -> Slot<'_> {
    match pattern {
        Pattern::Meta(MetaPattern::Repeat(inner, q)) => Slot::Run {
            pattern: inner,
            lo: q.min(),
            hi: q.max().unwrap_or(usize::MAX),
            reluctance: q.reluctance(),
            capture: None,
        },
        Pattern::Meta(MetaPattern::Capture(name, inner)) => {
            if let Pattern::Meta(MetaPattern::Repeat(repeated, q)) =
                inner.as_ref()
            {
                Slot::Run {
                    pattern: repeated,
                    lo: q.min(),
                    hi: q.max().unwrap_or(usize::MAX),
                    reluctance: q.reluctance(),
                    capture: Some(name),
                }
            } else {
                Slot::One { pattern, capture: None }
            }
        }
        other => Slot::One { pattern: other, capture: None },
    }
}

/// The outcome of a successful assignment: for each slot, the half-open
/// range `[start, end)` of element indices it consumed.
type Assignment = Vec<(usize, usize)>;

fn counts_in_order(lo: usize, hi: usize, reluctance: Reluctance) -> Vec<usize> {
    if lo > hi {
        return Vec::new();
    }
    match reluctance {
        Reluctance::Greedy => (lo..=hi).rev().collect(),
        Reluctance::Lazy => (lo..=hi).collect(),
        Reluctance::Possessive => vec![hi],
    }
}

fn solve(
    slots: &[Slot],
    elements: &[CBOR],
    slot_idx: usize,
    elem_idx: usize,
    acc: &mut Assignment,
) -> Option<Assignment> {
    if slot_idx == slots.len() {
        return Some(acc.clone());
    }

    match &slots[slot_idx] {
        Slot::One { pattern, .. } => {
            if elem_idx >= elements.len() {
                return None;
            }
            if pattern.matches(&elements[elem_idx]) {
                acc.push((elem_idx, elem_idx + 1));
                let result = solve(slots, elements, slot_idx + 1, elem_idx + 1, acc);
                if result.is_some() {
                    return result;
                }
                acc.pop();
            }
            None
        }
        Slot::Run { pattern, lo, hi, reluctance, .. } => {
            let remaining = elements.len().saturating_sub(elem_idx);
            let hi = (*hi).min(remaining);
            for count in counts_in_order(*lo, hi, *reluctance) {
                if elements[elem_idx..elem_idx + count]
                    .iter()
                    .all(|e| pattern.matches(e))
                {
                    acc.push((elem_idx, elem_idx + count));
                    let result =
                        solve(slots, elements, slot_idx + 1, elem_idx + count, acc);
                    if result.is_some() {
                        return result;
                    }
                    acc.pop();
                }
            }
            None
        }
    }
}

/// Attempts to assign `elements` to the sequence of patterns named by
/// `members` (each either a plain pattern, a `Repeat`, or a `Capture`
/// wrapping either). `root` is the whole array value, used to build
/// capture paths of the form `[root, matched_value]`.
pub fn match_sequence(
    members: &[Pattern],
    elements: &[CBOR],
    root: &CBOR,
) -> Option<HashMap<String, Vec<Path>>> {
    let slots: Vec<Slot> = members.iter().map(to_slot).collect();
    let mut acc = Vec::new();
    let assignment = solve(&slots, elements, 0, 0, &mut acc)?;

    let mut captures: HashMap<String, Vec<Path>> = HashMap::new();
    for (slot, (start, end)) in slots.iter().zip(assignment.iter()) {
        match slot {
            Slot::One { pattern, .. } => {
                let element = &elements[*start];
                if let Pattern::Meta(MetaPattern::Capture(name, inner)) = pattern
                {
                    if inner.matches(element) {
                        captures
                            .entry(name.clone())
                            .or_default()
                            .push(vec![root.clone(), element.clone()]);
                    }
                }
            }
            Slot::Run { capture: Some(name), .. } => {
                let run: Vec<CBOR> = elements[*start..*end].to_vec();
                let run_value = run.to_cbor();
                captures
                    .entry((*name).to_string())
                    .or_default()
                    .push(vec![root.clone(), run_value]);
            }
            Slot::Run { pattern, capture: None, .. } => {
                if let Pattern::Meta(MetaPattern::Capture(name, inner)) = pattern
                {
                    for element in &elements[*start..*end] {
                        if inner.matches(element) {
                            captures
                                .entry(name.clone())
                                .or_default()
                                .push(vec![root.clone(), element.clone()]);
                        }
                    }
                }
            }
        }
    }

    Some(captures)
}

#[cfg(test)]
mod tests {
    use dcbor::prelude::*;

    use super::*;
    use crate::{
        Quantifier,
        pattern::{meta::MetaPattern, value::NumberPattern},
    };

    fn num(n: i32) -> Pattern {
        Pattern::Value(crate::pattern::value::ValuePattern::Number(
            NumberPattern::value(n),
        ))
    }

    #[test]
    fn test_exact_sequence() {
        let members = vec![num(1), num(2), num(3)];
        let elements = vec![1.to_cbor(), 2.to_cbor(), 3.to_cbor()];
        let root = elements.clone().to_cbor();
        assert!(match_sequence(&members, &elements, &root).is_some());
    }

    #[test]
    fn test_repeat_consumes_run() {
        let any = Pattern::Meta(MetaPattern::Any);
        let repeat = Pattern::Meta(MetaPattern::Repeat(
            Box::new(any),
            Quantifier::new(0.., Reluctance::Greedy),
        ));
        let members = vec![repeat];
        let elements = vec![1.to_cbor(), "a".to_cbor(), true.to_cbor()];
        let root = elements.clone().to_cbor();
        assert!(match_sequence(&members, &elements, &root).is_some());

        let empty: Vec<CBOR> = vec![];
        let root_empty = empty.clone().to_cbor();
        let members2 = vec![Pattern::Meta(MetaPattern::Repeat(
            Box::new(Pattern::Meta(MetaPattern::Any)),
            Quantifier::new(0.., Reluctance::Greedy),
        ))];
        assert!(match_sequence(&members2, &empty, &root_empty).is_some());
    }

    #[test]
    fn test_lazy_run_yields_to_a_satisfiable_following_slot() {
        let number = Pattern::Value(crate::pattern::value::ValuePattern::Number(
            NumberPattern::any(),
        ));
        let lazy_run = Pattern::Meta(MetaPattern::Capture(
            "a".to_string(),
            Box::new(Pattern::Meta(MetaPattern::Repeat(
                Box::new(Pattern::Meta(MetaPattern::Any)),
                Quantifier::new(0.., Reluctance::Lazy),
            ))),
        ));
        let captured_number = Pattern::Meta(MetaPattern::Capture(
            "b".to_string(),
            Box::new(number),
        ));
        let elements = vec![1.to_cbor(), 2.to_cbor(), 3.to_cbor()];
        let root = elements.clone().to_cbor();

        let captures =
            match_sequence(&[lazy_run, captured_number], &elements, &root)
                .unwrap();
        let empty_run: Vec<CBOR> = vec![];
        assert_eq!(
            captures["a"],
            vec![vec![root.clone(), empty_run.to_cbor()]]
        );
        assert_eq!(captures["b"], vec![vec![root.clone(), 1.to_cbor()]]);
    }
}
