/// Property-Based Round-Trip Tests
///
/// Uses the `proptest` crate to generate random JSON values and verify the
/// tree pipeline end to end: build/parse a document, print it, parse the
/// output back, and require structural equality. This catches edge cases that
/// hand-written tests miss.
///
/// Strategies generate:
/// - Random strings (including edge cases: empty, unicode, escapes)
/// - Random numbers (full-range integers, finite floats)
/// - Random booleans and null
/// - Random nested arrays and objects (up to 4 levels deep)
///
/// Numbers rely on two exactness guarantees: the integer view prints all
/// `i64` digits verbatim, and `f64` Display is shortest-round-trip, so
/// `parse(print(x))` recovers `x` bit-for-bit for every finite value.
use proptest::prelude::*;
use serde_json::{Map, Number, Value};

use arbor_json::{decoder, encoder, from_json_value, minify_string, to_json_value, Document};

// ============================================================================
// Strategies for generating JSON values
// ============================================================================

/// Generate a valid JSON object key (non-empty string, limited length).
fn arb_key() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z_][a-zA-Z0-9_]{0,15}")
        .unwrap()
        .prop_filter("key must not be empty", |s| !s.is_empty())
}

/// Generate a random JSON string value with edge cases.
fn arb_json_string() -> impl Strategy<Value = String> {
    prop_oneof![
        // Simple ASCII strings
        "[a-zA-Z0-9 ]{0,30}",
        // Edge case: empty string
        Just("".to_string()),
        // Characters that must be escaped on output
        Just("say \"hi\"".to_string()),
        Just("path\\to\\file".to_string()),
        Just("line1\nline2".to_string()),
        Just("col1\tcol2".to_string()),
        Just("bell\u{0007}and\u{001f}controls".to_string()),
        // Unicode passthrough
        Just("caf\u{00e9}".to_string()),
        Just("\u{4f60}\u{597d}".to_string()),
        Just("\u{1F600}".to_string()),
        // Arbitrary unicode
        prop::collection::vec(any::<char>(), 0..12).prop_map(|cs| cs.into_iter().collect()),
    ]
}

/// Generate a random JSON integer across the full `i64` range.
fn arb_json_integer() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(|n| Value::Number(Number::from(n))),
        // small values hit the common paths more often
        (-1000i64..1000i64).prop_map(|n| Value::Number(Number::from(n))),
    ]
}

/// Generate a random finite JSON float.
fn arb_json_float() -> impl Strategy<Value = Value> {
    any::<f64>().prop_filter_map("must be finite", |f| {
        if !f.is_finite() {
            return None;
        }
        Number::from_f64(f).map(Value::Number)
    })
}

/// Generate a random primitive JSON value (string, number, bool, null).
fn arb_primitive() -> impl Strategy<Value = Value> {
    prop_oneof![
        2 => arb_json_string().prop_map(Value::String),
        2 => arb_json_integer(),
        1 => arb_json_float(),
        1 => any::<bool>().prop_map(Value::Bool),
        1 => Just(Value::Null),
    ]
}

/// Generate a JSON value with limited nesting (recursive).
fn arb_json_value_inner(depth: u32) -> impl Strategy<Value = Value> {
    if depth == 0 {
        arb_primitive().boxed()
    } else {
        prop_oneof![
            4 => arb_primitive(),
            2 => prop::collection::vec((arb_key(), arb_json_value_inner(depth - 1)), 0..5)
                .prop_map(|pairs| {
                    let mut map = Map::new();
                    for (k, v) in pairs {
                        map.insert(k, v);
                    }
                    Value::Object(map)
                }),
            2 => prop::collection::vec(arb_json_value_inner(depth - 1), 0..5)
                .prop_map(Value::Array),
        ]
        .boxed()
    }
}

/// Top-level strategy for generating random JSON values (up to 4 levels deep).
fn arb_json_value() -> impl Strategy<Value = Value> {
    arb_json_value_inner(4)
}

// ============================================================================
// Helper: normalize JSON for comparison
// ============================================================================

/// Normalize a JSON value for comparison against tree exports.
/// Handles: -0 -> 0 and float-as-integer (1.0 -> 1), since the tree's
/// exact-integer view prints integral doubles without a fraction.
fn normalize_json(v: &Value) -> Value {
    match v {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(Number::from(i))
            } else if let Some(u) = n.as_u64() {
                Value::Number(Number::from(u))
            } else if let Some(f) = n.as_f64() {
                let f = if f == 0.0 { 0.0f64 } else { f };
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 && f as i64 as f64 == f {
                    Value::Number(Number::from(f as i64))
                } else if let Some(n) = Number::from_f64(f) {
                    Value::Number(n)
                } else {
                    Value::Null
                }
            } else {
                Value::Null
            }
        }
        Value::Object(map) => {
            let mut new_map = Map::new();
            for (k, v) in map {
                new_map.insert(k.clone(), normalize_json(v));
            }
            Value::Object(new_map)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(normalize_json).collect()),
        other => other.clone(),
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Core round trip: printing a tree and parsing the output back yields a
    /// structurally equal tree.
    #[test]
    fn print_parse_preserves_structure(value in arb_json_value()) {
        let mut doc = Document::new();
        let root = from_json_value(&mut doc, &value).unwrap();
        let text = encoder::print(&doc, root, false).unwrap();
        let back = decoder::parse(&mut doc, &text).unwrap();
        prop_assert!(
            doc.compare(root, back, true),
            "round trip changed the tree\n  printed: {}",
            text
        );
    }

    /// Pretty output parses back to the same tree as compact output.
    #[test]
    fn pretty_parses_back_too(value in arb_json_value()) {
        let mut doc = Document::new();
        let root = from_json_value(&mut doc, &value).unwrap();
        let pretty = encoder::print(&doc, root, true).unwrap();
        let back = decoder::parse(&mut doc, &pretty).unwrap();
        prop_assert!(doc.compare(root, back, true), "pretty output: {}", pretty);
    }

    /// Minifying pretty output yields exactly the compact output.
    #[test]
    fn minified_pretty_equals_compact(value in arb_json_value()) {
        let mut doc = Document::new();
        let root = from_json_value(&mut doc, &value).unwrap();
        let compact = encoder::print(&doc, root, false).unwrap();
        let mut pretty = encoder::print(&doc, root, true).unwrap();
        minify_string(&mut pretty);
        prop_assert_eq!(pretty, compact);
    }

    /// Export agrees with `serde_json` on text our printer produced.
    #[test]
    fn export_matches_serde_oracle(value in arb_json_value()) {
        let mut doc = Document::new();
        let root = from_json_value(&mut doc, &value).unwrap();
        let text = encoder::print(&doc, root, false).unwrap();

        let ours = normalize_json(&to_json_value(&doc, root).unwrap());
        let theirs: Value = serde_json::from_str(&text).unwrap();
        prop_assert_eq!(ours, normalize_json(&theirs), "printed: {}", text);
    }

    /// Parsing text `serde_json` serialized always succeeds and matches.
    #[test]
    fn parse_accepts_serde_output(value in arb_json_value()) {
        let text = serde_json::to_string(&value).unwrap();
        let mut doc = Document::new();
        let root = decoder::parse(&mut doc, &text).unwrap();
        let exported = normalize_json(&to_json_value(&doc, root).unwrap());
        prop_assert_eq!(exported, normalize_json(&value), "input: {}", text);
    }

    /// A recursive duplicate is structurally equal to its source.
    #[test]
    fn duplicate_compares_equal(value in arb_json_value()) {
        let mut doc = Document::new();
        let root = from_json_value(&mut doc, &value).unwrap();
        let copy = doc.duplicate(root, true).unwrap();
        prop_assert!(doc.compare(root, copy, true));
        prop_assert!(doc.compare(copy, root, true));
    }

    /// All three buffer strategies produce identical bytes.
    #[test]
    fn buffer_strategies_agree(value in arb_json_value()) {
        let mut doc = Document::new();
        let root = from_json_value(&mut doc, &value).unwrap();
        let exact = encoder::print(&doc, root, true).unwrap();
        let buffered = encoder::print_buffered(&doc, root, 16, true).unwrap();
        prop_assert_eq!(&buffered, &exact);

        let mut fixed = vec![0u8; exact.len()];
        let len = encoder::print_to_fixed(&doc, root, &mut fixed, true).unwrap();
        prop_assert_eq!(len, Some(exact.len()));
        prop_assert_eq!(&fixed[..], exact.as_bytes());
    }
}

proptest! {
    /// The parser never panics, whatever the input.
    #[test]
    fn parse_never_panics(input in ".{0,64}") {
        let mut doc = Document::new();
        let _ = decoder::parse(&mut doc, &input);
    }

    /// The minifier never panics and never grows its input.
    #[test]
    fn minify_never_panics(input in ".{0,64}") {
        let mut buf = input.as_bytes().to_vec();
        let len = arbor_json::minify(&mut buf);
        prop_assert!(len <= buf.len());
    }
}
