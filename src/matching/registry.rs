// Custom parse-type and option-function registration seam. Grounded in the
// teacher's `plugins::PluginManager`/`Plugin` trait shape (name() + execute(),
// an `RwLock<HashMap<String, Arc<dyn _>>>` registry populated with defaults
// on construction) narrowed to groktest's two callable kinds: a parse type
// contributes a regex fragment plus an optional typed coercion, an option
// function contributes a value transform applied to an inline option's raw
// string. The core only ever calls through these traits; concrete
// registrations (e.g. reading `parse.types` out of resolved config) happen
// at the seam, not in the matching engine itself.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;

/// A named regex fragment backing a `{name:type}` placeholder, with an
/// optional coercion from the matched substring to a typed JSON value.
pub trait ParseType: Send + Sync {
    fn name(&self) -> &str;
    fn pattern(&self) -> &str;
    fn coerce(&self, raw: &str) -> Value {
        Value::String(raw.to_string())
    }
}

struct DecimalType;
impl ParseType for DecimalType {
    fn name(&self) -> &str {
        "d"
    }
    fn pattern(&self) -> &str {
        r"-?\d+"
    }
    fn coerce(&self, raw: &str) -> Value {
        raw.parse::<i64>().map(Value::from).unwrap_or_else(|_| Value::String(raw.to_string()))
    }
}

struct WordType;
impl ParseType for WordType {
    fn name(&self) -> &str {
        "w"
    }
    fn pattern(&self) -> &str {
        r"\w+"
    }
}

struct WhitespaceType;
impl ParseType for WhitespaceType {
    fn name(&self) -> &str {
        "s"
    }
    fn pattern(&self) -> &str {
        r"\s+"
    }
}

/// A plain `name -> regex fragment` registration (from a document's
/// `parse.types` config entry) with no coercion beyond the raw string.
struct FragmentType {
    name: String,
    pattern: String,
}
impl ParseType for FragmentType {
    fn name(&self) -> &str {
        &self.name
    }
    fn pattern(&self) -> &str {
        &self.pattern
    }
}

/// Registry of parse types, built-in plus custom. Mirrors the teacher's
/// `PluginManager`: an `RwLock`-guarded map, populated with defaults at
/// construction, extended via `register`/`register_fragment`.
pub struct TypeRegistry {
    types: RwLock<HashMap<String, Arc<dyn ParseType>>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        let registry = Self {
            types: RwLock::new(HashMap::new()),
        };
        registry.register(Arc::new(DecimalType));
        registry.register(Arc::new(WordType));
        registry.register(Arc::new(WhitespaceType));
        registry
    }

    pub fn register(&self, parse_type: Arc<dyn ParseType>) {
        self.types
            .write()
            .unwrap()
            .insert(parse_type.name().to_string(), parse_type);
    }

    /// Register the `parse.types` config shape: a name mapped to a bare
    /// regex fragment (possibly carrying embedded inline flags like `(?i)`).
    pub fn register_fragment(&self, name: &str, pattern: &str) {
        self.register(Arc::new(FragmentType {
            name: name.to_string(),
            pattern: pattern.to_string(),
        }));
    }

    /// Build a registry from a document's resolved `parse.types` mapping.
    pub fn from_config_types(custom_types: &HashMap<String, String>) -> Self {
        let registry = Self::new();
        for (name, pattern) in custom_types {
            registry.register_fragment(name, pattern);
        }
        registry
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ParseType>> {
        self.types.read().unwrap().get(name).cloned()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A named transform applied to an inline option's raw string value before
/// it enters the effective-options mapping (the source's `option-functions`
/// registration seam).
pub trait OptionFunction: Send + Sync {
    fn name(&self) -> &str;
    fn apply(&self, raw: &str) -> Value;
}

pub struct OptionFunctionRegistry {
    functions: RwLock<HashMap<String, Arc<dyn OptionFunction>>>,
}

impl OptionFunctionRegistry {
    pub fn new() -> Self {
        Self {
            functions: RwLock::new(HashMap::new()),
        }
    }

    pub fn register(&self, function: Arc<dyn OptionFunction>) {
        self.functions
            .write()
            .unwrap()
            .insert(function.name().to_string(), function);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn OptionFunction>> {
        self.functions.read().unwrap().get(name).cloned()
    }
}

impl Default for OptionFunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_registered_by_default() {
        let registry = TypeRegistry::new();
        assert_eq!(registry.get("d").unwrap().pattern(), r"-?\d+");
        assert_eq!(registry.get("w").unwrap().pattern(), r"\w+");
        assert_eq!(registry.get("s").unwrap().pattern(), r"\s+");
    }

    #[test]
    fn decimal_coercion_returns_integer() {
        let registry = TypeRegistry::new();
        let d = registry.get("d").unwrap();
        assert_eq!(d.coerce("42"), Value::from(42));
    }

    #[test]
    fn word_coercion_returns_raw_string() {
        let registry = TypeRegistry::new();
        let w = registry.get("w").unwrap();
        assert_eq!(w.coerce("abc"), Value::String("abc".to_string()));
    }

    #[test]
    fn custom_fragment_has_no_coercion_by_default() {
        let mut custom = HashMap::new();
        custom.insert("hex".to_string(), r"[0-9a-f]+".to_string());
        let registry = TypeRegistry::from_config_types(&custom);
        let hex = registry.get("hex").unwrap();
        assert_eq!(hex.coerce("ff"), Value::String("ff".to_string()));
    }

    #[test]
    fn unknown_type_is_absent() {
        let registry = TypeRegistry::new();
        assert!(registry.get("nope").is_none());
    }
}
