// Integration coverage for the matching engine's strategy selection, built
// on top of the same public `match_test` entry point the runner calls, with
// combinations of options the per-strategy unit tests don't exercise
// together.

use groktest::matching::match_test;
use groktest::matching::registry::TypeRegistry;
use groktest::options::Options;
use serde_json::{Map, Value};

fn opts(pairs: &[(&str, Value)]) -> Options {
    let mut map = Map::new();
    for (k, v) in pairs {
        map.insert(k.to_string(), v.clone());
    }
    Options::new(map)
}

#[test]
fn parse_takes_precedence_over_wildcard_when_both_are_enabled() {
    let types = TypeRegistry::new();
    let options = opts(&[("parse", Value::Bool(true)), ("wildcard", Value::Bool(true))]);
    let result = match_test(
        "got {n:d} item(s)",
        "got 7 item(s)",
        &options,
        &types,
        "<BLANKLINE>",
    )
    .unwrap();
    assert!(result.matched);
    assert_eq!(result.vars["n"], Value::from(7));
}

#[test]
fn blankline_marker_and_wildcard_compose_in_the_same_match() {
    let types = TypeRegistry::new();
    let options = opts(&[("wildcard", Value::Bool(true))]);
    let result = match_test(
        "first\n<BLANKLINE>\n...",
        "first\n\nanything after",
        &options,
        &types,
        "<BLANKLINE>",
    )
    .unwrap();
    assert!(result.matched);
}

#[test]
fn case_and_space_insensitivity_compose() {
    let types = TypeRegistry::new();
    let options = opts(&[("case", Value::Bool(false)), ("space", Value::Bool(false))]);
    let result = match_test("Hello   World", "hello world", &options, &types, "<BLANKLINE>").unwrap();
    assert!(result.matched);
}

#[test]
fn custom_parse_type_must_be_registered_to_resolve() {
    let types = TypeRegistry::from_config_types(&std::collections::HashMap::from([(
        "hex".to_string(),
        "[0-9a-f]+".to_string(),
    )]));
    let options = opts(&[("parse", Value::Bool(true))]);
    let result = match_test("addr={x:hex}", "addr=1a2b", &options, &types, "<BLANKLINE>").unwrap();
    assert_eq!(result.vars["x"], Value::from("1a2b"));
}

#[test]
fn wildcard_token_can_be_customized() {
    let types = TypeRegistry::new();
    let options = opts(&[("wildcard", Value::String("***".to_string()))]);
    let result = match_test("before *** after", "before anything at all after", &options, &types, "<BLANKLINE>")
        .unwrap();
    assert!(result.matched);
}
