// Configuration resolution: a binary-level `Config` (user defaults, loaded
// once at startup) plus the per-document deep-merge resolver described in
// the module-level docs below.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub progress: ProgressConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default test-type profile when a document's front matter doesn't say.
    #[serde(default = "default_test_type")]
    pub test_type: String,

    /// Default cross-document concurrency.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    #[serde(default)]
    pub log_format: Option<String>,

    #[serde(default)]
    pub log_output: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            test_type: default_test_type(),
            concurrency: default_concurrency(),
            log_format: None,
            log_output: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressConfig {
    #[serde(default = "default_progress")]
    pub mode: String,

    #[serde(default = "default_color")]
    pub color: bool,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self { mode: default_progress(), color: default_color() }
    }
}

fn default_test_type() -> String {
    String::from("python")
}

fn default_concurrency() -> usize {
    1
}

fn default_progress() -> String {
    String::from("auto")
}

fn default_color() -> bool {
    true
}

impl Config {
    /// Check `./.groktestrc[.toml]` then the user config directory, same
    /// order the teacher's loader used for its own rc file.
    pub fn load() -> Option<Self> {
        let cwd = std::env::current_dir().ok()?;
        let candidates = [cwd.join(".groktestrc"), cwd.join(".groktestrc.toml")];
        for path in &candidates {
            if path.exists() {
                return Self::load_from_file(path);
            }
        }

        let config_dir = dirs::config_dir()?.join("groktest");
        for name in [".groktestrc", ".groktestrc.toml"] {
            let path = config_dir.join(name);
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }
        None
    }

    pub fn load_from_file(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Option<Self> {
        toml::from_str(content).ok()
    }

    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }
}

/// Top-level front-matter keys that are shorthand for a canonical nested
/// config path. Lifted before the front-matter layer is merged in; keys
/// already written at their canonical path pass through untouched.
const ALIASES: &[(&str, &[&str])] = &[
    ("test-options", &["options"]),
    ("parse-types", &["parse", "types"]),
    ("python-init", &["python", "init"]),
    ("shell-init", &["shell", "init"]),
    ("option-functions", &["option", "functions"]),
];

/// Lift aliased front-matter keys to their canonical nested path, leaving
/// everything else as-is.
pub fn apply_aliases(front_matter: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();
    for (key, value) in front_matter {
        match ALIASES.iter().find(|(alias, _)| alias == key) {
            Some((_, path)) => set_nested(&mut out, path, value.clone()),
            None => {
                out.insert(key.clone(), value.clone());
            }
        }
    }
    out
}

fn set_nested(map: &mut Map<String, Value>, path: &[&str], value: Value) {
    let Some((head, rest)) = path.split_first() else { return };
    if rest.is_empty() {
        map.insert(head.to_string(), value);
        return;
    }
    let entry = map
        .entry(head.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if let Value::Object(nested) = entry {
        set_nested(nested, rest, value);
    }
}

/// Deep-merge `overlay` onto `base`: object values merge key-wise,
/// recursively; any other value type in `overlay` replaces the base value
/// outright. `overlay` wins on conflict.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            let mut merged = base_map.clone();
            for (key, overlay_value) in overlay_map {
                let merged_value = match merged.get(key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value.clone(),
                };
                merged.insert(key.clone(), merged_value);
            }
            Value::Object(merged)
        }
        _ => overlay.clone(),
    }
}

/// Resolve a document's effective config by merging, low to high precedence:
/// the project file, CLI-synthesized options, then document front matter
/// (with its aliases already lifted).
pub fn resolve(
    project: &Value,
    cli_synthesized: &Value,
    front_matter: &Map<String, Value>,
) -> Value {
    let front_matter = Value::Object(apply_aliases(front_matter));
    let merged = deep_merge(project, cli_synthesized);
    deep_merge(&merged, &front_matter)
}
