use dcbor::prelude::*;
use dcbor_pattern::{Matcher, parse_pattern};

#[test]
fn array_any_and_length() {
    assert!(parse_pattern("array").unwrap().matches(&vec![1, 2, 3].to_cbor()));
    assert!(!parse_pattern("array").unwrap().matches(&1.to_cbor()));

    let length = parse_pattern("[{2,3}]").unwrap();
    assert!(length.matches(&vec![1, 2].to_cbor()));
    assert!(length.matches(&vec![1, 2, 3].to_cbor()));
    assert!(!length.matches(&vec![1].to_cbor()));
    assert!(!length.matches(&vec![1, 2, 3, 4].to_cbor()));
}

#[test]
fn array_empty_body_matches_only_empty() {
    let pattern = parse_pattern("[]").unwrap();
    assert!(pattern.matches(&Vec::<i32>::new().to_cbor()));
    assert!(!pattern.matches(&vec![1].to_cbor()));
}

#[test]
fn array_single_element_pattern_requires_length_one() {
    let pattern = parse_pattern("[number]").unwrap();
    assert!(pattern.matches(&vec![1].to_cbor()));
    assert!(!pattern.matches(&vec![1, 2].to_cbor()));
    assert!(!pattern.matches(&Vec::<i32>::new().to_cbor()));
}

#[test]
fn array_repeated_element_matches_any_length() {
    let pattern = parse_pattern("[(number)*]").unwrap();
    assert!(pattern.matches(&Vec::<i32>::new().to_cbor()));
    assert!(pattern.matches(&vec![1, 2, 3].to_cbor()));

    // `+` still requires at least one element satisfying the run.
    let at_least_one = parse_pattern("[(number)+]").unwrap();
    assert!(!at_least_one.matches(&Vec::<i32>::new().to_cbor()));
    assert!(at_least_one.matches(&vec![1, 2, 3].to_cbor()));
}

#[test]
fn array_sequence_of_distinct_elements() {
    let pattern = parse_pattern("[number, text]").unwrap();
    let array = vec![1.to_cbor(), "x".to_cbor()].to_cbor();
    assert!(pattern.matches(&array));
    assert!(!pattern.matches(&vec![1.to_cbor()].to_cbor()));
}

#[test]
fn map_any_and_length() {
    let mut map = Map::new();
    map.insert("a".to_cbor(), 1.to_cbor());
    map.insert("b".to_cbor(), 2.to_cbor());
    let cbor = map.to_cbor();

    assert!(parse_pattern("map").unwrap().matches(&cbor));
    assert!(parse_pattern("{2}").unwrap().matches(&cbor));
    assert!(!parse_pattern("{1}").unwrap().matches(&cbor));
}

#[test]
fn map_empty_body_matches_any_map() {
    let mut map = Map::new();
    map.insert("a".to_cbor(), 1.to_cbor());
    assert!(parse_pattern("{}").unwrap().matches(&map.to_cbor()));

    let empty = Map::new();
    assert!(parse_pattern("{}").unwrap().matches(&empty.to_cbor()));
}

#[test]
fn map_constraints_require_matching_key_value_pair() {
    let mut map = Map::new();
    map.insert("name".to_cbor(), "Alice".to_cbor());
    map.insert("age".to_cbor(), 30.to_cbor());
    let cbor = map.to_cbor();

    assert!(parse_pattern(r#"{"name": text}"#).unwrap().matches(&cbor));
    assert!(parse_pattern(r#"{"age": >18}"#).unwrap().matches(&cbor));
    assert!(!parse_pattern(r#"{"age": <18}"#).unwrap().matches(&cbor));
}

#[test]
fn tagged_any_and_with_name() {
    let tagged = CBOR::to_tagged_value(1234, "hello");
    assert!(parse_pattern("tagged").unwrap().matches(&tagged));
    assert!(parse_pattern("tagged(1234, text)").unwrap().matches(&tagged));
    assert!(!parse_pattern("tagged(1234, number)").unwrap().matches(&tagged));
    assert!(!parse_pattern("tagged(9999, text)").unwrap().matches(&tagged));
}

#[test]
fn tagged_with_regex_selector() {
    let tagged = CBOR::to_tagged_value(1234, "hello");
    let pattern = parse_pattern(r"tagged(/^12/, text)").unwrap();
    assert!(pattern.matches(&tagged));
}

#[test]
fn tagged_nested_preserves_inner_parentheses() {
    let inner = CBOR::to_tagged_value(2, 5);
    let outer = CBOR::to_tagged_value(1, inner);
    let pattern = parse_pattern("tagged(1, tagged(2, number))").unwrap();
    assert!(pattern.matches(&outer));
    assert!(!parse_pattern("tagged(1, tagged(3, number))").unwrap().matches(&outer));
}
