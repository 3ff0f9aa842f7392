// Integration coverage for config resolution across the full three-tier
// precedence chain (project file, CLI-synthesized, document front matter),
// including the alias lift that happens before the merge.

use groktest::config::{resolve, Config};
use serde_json::{json, Map};

#[test]
fn binary_level_config_round_trips_through_toml() {
    let config = Config::parse("[general]\ntest_type = \"shell\"\nconcurrency = 8\n").unwrap();
    let rendered = config.to_toml();
    let reparsed = Config::parse(&rendered).unwrap();
    assert_eq!(reparsed.general.test_type, "shell");
    assert_eq!(reparsed.general.concurrency, 8);
}

#[test]
fn three_tier_precedence_resolves_project_then_cli_then_front_matter() {
    let project = json!({"fail-fast": false, "test-type": "python"});
    let cli = json!({"fail-fast": true});
    let mut front_matter = Map::new();
    front_matter.insert("test-type".to_string(), json!("shell"));

    let resolved = resolve(&project, &cli, &front_matter);
    assert_eq!(resolved["fail-fast"], json!(true));
    assert_eq!(resolved["test-type"], json!("shell"));
}

#[test]
fn front_matter_test_options_alias_lifts_into_the_options_key() {
    let project = json!({});
    let cli = json!({});
    let mut front_matter = Map::new();
    front_matter.insert("test-options".to_string(), json!("+parse +case"));

    let resolved = resolve(&project, &cli, &front_matter);
    assert_eq!(resolved["options"], json!("+parse +case"));
}

#[test]
fn nested_parse_types_from_different_tiers_merge_key_wise() {
    let project = json!({"parse": {"types": {"hex": "[0-9a-f]+"}}});
    let cli = json!({});
    let mut front_matter = Map::new();
    front_matter.insert("parse-types".to_string(), json!({"ip": "\\d+\\.\\d+\\.\\d+\\.\\d+"}));

    let resolved = resolve(&project, &cli, &front_matter);
    assert_eq!(resolved["parse"]["types"]["hex"], json!("[0-9a-f]+"));
    assert_eq!(resolved["parse"]["types"]["ip"], json!("\\d+\\.\\d+\\.\\d+\\.\\d+"));
}
