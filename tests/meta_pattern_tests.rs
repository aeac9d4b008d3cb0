use dcbor::prelude::*;
use dcbor_pattern::{Matcher, parse_pattern};

#[test]
fn or_matches_any_branch() {
    let pattern = parse_pattern("1 | 2 | 3").unwrap();
    assert!(pattern.matches(&1.to_cbor()));
    assert!(pattern.matches(&2.to_cbor()));
    assert!(pattern.matches(&3.to_cbor()));
    assert!(!pattern.matches(&4.to_cbor()));
}

#[test]
fn and_requires_every_branch() {
    let pattern = parse_pattern(">0 & <10").unwrap();
    assert!(pattern.matches(&5.to_cbor()));
    assert!(!pattern.matches(&20.to_cbor()));
    assert!(!pattern.matches(&(-5).to_cbor()));
}

#[test]
fn not_negates() {
    let pattern = parse_pattern("!1").unwrap();
    assert!(pattern.matches(&2.to_cbor()));
    assert!(!pattern.matches(&1.to_cbor()));
}

#[test]
fn double_not_cancels() {
    let pattern = parse_pattern("!!number").unwrap();
    assert!(pattern.matches(&1.to_cbor()));
    assert!(!pattern.matches(&"x".to_cbor()));
}

#[test]
fn precedence_or_and_not() {
    // `!` binds tighter than `&`, which binds tighter than `|`.
    let pattern = parse_pattern("!1 & <10 | 100").unwrap();
    assert!(pattern.matches(&5.to_cbor()));
    assert!(!pattern.matches(&1.to_cbor()));
    assert!(pattern.matches(&100.to_cbor()));
}

#[test]
fn quantifier_on_grouped_pattern() {
    let array = vec![1, 2, 3].to_cbor();
    let pattern = parse_pattern("[(number)+]").unwrap();
    assert!(pattern.matches(&array));
    assert!(!pattern.matches(&Vec::<i32>::new().to_cbor()));
}

#[test]
fn quantifier_shorthand_forms() {
    let any_count = parse_pattern("[(number)*]").unwrap();
    let at_least_one = parse_pattern("[(number)+]").unwrap();
    let optional = parse_pattern("[(number)?, text]").unwrap();

    assert!(any_count.matches(&Vec::<i32>::new().to_cbor()));
    assert!(!at_least_one.matches(&Vec::<i32>::new().to_cbor()));
    assert!(optional.matches(&vec!["x".to_cbor()].to_cbor()));
    assert!(optional.matches(&vec![1.to_cbor(), "x".to_cbor()].to_cbor()));
}

#[test]
fn explicit_range_quantifier() {
    let pattern = parse_pattern("[(number){2,3}]").unwrap();
    assert!(!pattern.matches(&vec![1].to_cbor()));
    assert!(pattern.matches(&vec![1, 2].to_cbor()));
    assert!(pattern.matches(&vec![1, 2, 3].to_cbor()));
    // A 3-number prefix still satisfies the {2,3} run even though a
    // fourth element trails it; the run doesn't have to span the array.
    assert!(pattern.matches(&vec![1, 2, 3, 4].to_cbor()));
    // But the run itself must still be made of matching elements.
    assert!(!pattern.matches(&vec![1.to_cbor(), "x".to_cbor()].to_cbor()));
}

#[test]
fn lazy_run_yields_to_a_satisfiable_following_pattern() {
    // With `*` lazy, the run settles for the empty match as soon as the
    // pattern after it can already be satisfied.
    let lazy = parse_pattern("[@a((*)*?), @b(number)]").unwrap();
    let (_, captures) = lazy.paths_with_captures(&vec![1, 2, 3].to_cbor());
    assert_eq!(captures["a"][0][1], Vec::<CBOR>::new().to_cbor());
    assert_eq!(captures["b"][0][1], 1.to_cbor());

    // With `*` greedy, the run consumes as much as it can.
    let greedy = parse_pattern("[@a((*)*), @b(number)]").unwrap();
    let (_, captures) = greedy.paths_with_captures(&vec![1, 2, 3].to_cbor());
    assert_eq!(
        captures["a"][0][1],
        vec![1.to_cbor(), 2.to_cbor()].to_cbor()
    );
    assert_eq!(captures["b"][0][1], 3.to_cbor());
}

#[test]
fn capture_collects_matched_paths() {
    let pattern = parse_pattern("@n(number)").unwrap();
    let (paths, captures) = pattern.paths_with_captures(&42.to_cbor());
    assert_eq!(paths.len(), 1);
    let captured = captures.get("n").expect("capture name should be present");
    assert_eq!(captured.len(), 1);
}

#[test]
fn capture_inside_array_sequence() {
    let pattern = parse_pattern("[@first(number), text]").unwrap();
    let array = vec![1.to_cbor(), "x".to_cbor()].to_cbor();
    let (paths, captures) = pattern.paths_with_captures(&array);
    assert_eq!(paths.len(), 1);
    assert_eq!(captures.get("first").unwrap()[0].last().unwrap(), &1.to_cbor());
}

#[test]
fn search_finds_nested_matches() {
    let mut inner = Map::new();
    inner.insert("value".to_cbor(), 42.to_cbor());
    let root = vec![inner.to_cbor(), "ignored".to_cbor()].to_cbor();

    let pattern = parse_pattern("...(number)").unwrap();
    let paths = pattern.paths(&root);
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].last().unwrap(), &42.to_cbor());
}

#[test]
fn sequence_requires_elements_in_order() {
    let pattern = parse_pattern("[number, text, bool]").unwrap();
    let ok = vec![1.to_cbor(), "x".to_cbor(), true.to_cbor()].to_cbor();
    let wrong_order = vec![true.to_cbor(), 1.to_cbor(), "x".to_cbor()].to_cbor();
    assert!(pattern.matches(&ok));
    assert!(!pattern.matches(&wrong_order));
}
