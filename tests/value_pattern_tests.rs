use bc_components::DigestProvider;
use dcbor::Date;
use dcbor::prelude::*;
use dcbor_pattern::{Matcher, Pattern, parse_pattern};
use known_values::KnownValue;

#[test]
fn bool_forms() {
    assert!(parse_pattern("bool").unwrap().matches(&true.to_cbor()));
    assert!(parse_pattern("true").unwrap().matches(&true.to_cbor()));
    assert!(!parse_pattern("true").unwrap().matches(&false.to_cbor()));
    assert!(parse_pattern("false").unwrap().matches(&false.to_cbor()));
}

#[test]
fn null_and_wildcard() {
    assert!(parse_pattern("null").unwrap().matches(&CBOR::null()));
    assert!(!parse_pattern("null").unwrap().matches(&1.to_cbor()));
    assert!(parse_pattern("*").unwrap().matches(&1.to_cbor()));
    assert!(parse_pattern("*").unwrap().matches(&"x".to_cbor()));
}

#[test]
fn number_exact_and_range() {
    assert!(parse_pattern("42").unwrap().matches(&42.to_cbor()));
    assert!(!parse_pattern("42").unwrap().matches(&43.to_cbor()));

    let range = parse_pattern("10..20").unwrap();
    assert!(range.matches(&15.to_cbor()));
    assert!(!range.matches(&25.to_cbor()));
}

#[test]
fn number_comparators() {
    assert!(parse_pattern(">=10").unwrap().matches(&10.to_cbor()));
    assert!(!parse_pattern(">10").unwrap().matches(&10.to_cbor()));
    assert!(parse_pattern("<=10").unwrap().matches(&10.to_cbor()));
    assert!(!parse_pattern("<10").unwrap().matches(&10.to_cbor()));
}

#[test]
fn number_nan_and_infinities() {
    let nan_cbor = f64::NAN.to_cbor();
    assert!(parse_pattern("NaN").unwrap().matches(&nan_cbor));
    assert!(!parse_pattern("number").unwrap().matches(&nan_cbor));

    assert!(parse_pattern("Infinity").unwrap().matches(&f64::INFINITY.to_cbor()));
    assert!(
        parse_pattern("-Infinity")
            .unwrap()
            .matches(&f64::NEG_INFINITY.to_cbor())
    );
}

#[test]
fn text_literal_and_regex() {
    assert!(parse_pattern("text").unwrap().matches(&"anything".to_cbor()));
    assert!(parse_pattern(r#""hello""#).unwrap().matches(&"hello".to_cbor()));
    assert!(!parse_pattern(r#""hello""#).unwrap().matches(&"world".to_cbor()));

    let regex = parse_pattern(r"/^[a-z]+\d+$/").unwrap();
    assert!(regex.matches(&"abc123".to_cbor()));
    assert!(!regex.matches(&"ABC123".to_cbor()));
}

#[test]
fn byte_string_literal_and_regex() {
    let bytes = CBOR::to_byte_string(vec![0xde, 0xad, 0xbe, 0xef]);
    assert!(parse_pattern("bytes").unwrap().matches(&bytes));
    assert!(parse_pattern("h'deadbeef'").unwrap().matches(&bytes));
    assert!(!parse_pattern("h'cafe'").unwrap().matches(&bytes));

    let regex = parse_pattern("h'/^\\xde/'").unwrap();
    assert!(regex.matches(&bytes));
}

#[test]
fn date_exact_and_range() {
    let date = Date::from_ymd(2023, 12, 25);
    let cbor = date.to_cbor();

    assert!(parse_pattern("date").unwrap().matches(&cbor));
    assert!(parse_pattern("date'2023-12-25'").unwrap().matches(&cbor));
    assert!(!parse_pattern("date'2023-12-24'").unwrap().matches(&cbor));

    let range = parse_pattern("date'2023-12-20..2023-12-30'").unwrap();
    assert!(range.matches(&cbor));

    let earliest = parse_pattern("date'2023-12-25..'").unwrap();
    assert!(earliest.matches(&cbor));

    let latest = parse_pattern("date'..2023-12-25'").unwrap();
    assert!(latest.matches(&cbor));
}

#[test]
fn digest_prefix_match() {
    let data: &[u8] = b"test data";
    let digest = data.digest().into_owned();
    let cbor = digest.to_cbor();
    let full_hex = hex::encode(digest.data());

    assert!(parse_pattern("digest").unwrap().matches(&cbor));
    let exact = format!("digest'{}'", full_hex);
    assert!(parse_pattern(&exact).unwrap().matches(&cbor));

    let prefix_hex = hex::encode(&digest.data()[..4]);
    let prefix = format!("digest'{}'", prefix_hex);
    assert!(parse_pattern(&prefix).unwrap().matches(&cbor));

    assert!(!parse_pattern("digest'ffffffff'").unwrap().matches(&cbor));
}

#[test]
fn known_value_exact_and_regex() {
    let cbor = KnownValue::new(1).to_cbor();
    assert!(parse_pattern("known").unwrap().matches(&cbor));
    assert!(parse_pattern("'1'").unwrap().matches(&cbor));
    assert!(!parse_pattern("'2'").unwrap().matches(&cbor));
    assert!(!parse_pattern("known").unwrap().matches(&42.to_cbor()));
}

#[test]
fn display_round_trips_through_parser() {
    for src in [
        "bool", "true", "false", "null", "number", "42", "1..5", ">=3", "NaN",
        "Infinity", "-Infinity", "text", r#""hi""#, "bytes", "h'dead'", "date",
        "known", "'1'",
    ] {
        let pattern = parse_pattern(src).unwrap();
        assert_eq!(pattern.to_string(), src, "round-trip failed for {src:?}");
    }
}
