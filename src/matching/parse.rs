// Parse matching strategy: expected text containing `{[name][:type]}`
// placeholders is compiled into an anchored regex with named captures, each
// backed by a built-in or custom-registered type fragment.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde_json::Value;

use super::registry::TypeRegistry;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{(?P<name>[A-Za-z_][A-Za-z0-9_]*)?(?::(?P<type>[A-Za-z_][A-Za-z0-9_]*))?\}").unwrap()
});

/// Fragment for a placeholder with no `:type` given at all (`{name}`,
/// `{}`). Distinct from the registered `s` type, which matches whitespace.
const UNTYPED_PATTERN: &str = r"\S+";

pub struct CompiledPattern {
    regex: Regex,
    /// `(capture group name, type name)` per placeholder that binds a
    /// variable; anonymous placeholders (`{}`, `{:d}`) are matched but
    /// excluded here, so they never appear in `vars`.
    bound: Vec<(String, String)>,
}

/// Compile `expected` into an anchored regex. Doubled braces (`{{`, `}}`)
/// are unescaped to a literal brace before placeholder scanning; everything
/// else outside a placeholder is regex-escaped. `ignore_case` mirrors the
/// `case` effective option into the compiled pattern itself, so parse
/// matching folds case the same way the literal strategy does.
pub fn compile(
    expected: &str,
    types: &TypeRegistry,
    ignore_case: bool,
) -> Result<CompiledPattern, String> {
    let mut pattern = String::from("^");
    let mut bound = Vec::new();
    let mut last_end = 0;
    let mut anon = 0usize;

    for caps in PLACEHOLDER.captures_iter(expected) {
        let whole = caps.get(0).unwrap();
        pattern.push_str(&regex::escape(&unescape_braces(&expected[last_end..whole.start()])));

        let (type_name, fragment) = match caps.name("type") {
            Some(t) => {
                let parse_type = types.get(t.as_str()).ok_or_else(|| t.as_str().to_string())?;
                (t.as_str().to_string(), parse_type.pattern().to_string())
            }
            None => (String::new(), UNTYPED_PATTERN.to_string()),
        };

        let group_name = match caps.name("name") {
            Some(n) => {
                bound.push((n.as_str().to_string(), type_name.clone()));
                n.as_str().to_string()
            }
            None => {
                anon += 1;
                format!("__anon{anon}")
            }
        };

        pattern.push_str(&format!("(?P<{group_name}>{fragment})"));
        last_end = whole.end();
    }
    pattern.push_str(&regex::escape(&unescape_braces(&expected[last_end..])));
    pattern.push('$');

    let regex = RegexBuilder::new(&pattern)
        .case_insensitive(ignore_case)
        .build()
        .map_err(|e| e.to_string())?;
    Ok(CompiledPattern { regex, bound })
}

fn unescape_braces(s: &str) -> String {
    s.replace("{{", "{").replace("}}", "}")
}

/// Match `actual` against a compiled pattern, returning the named bindings
/// (coerced through each placeholder's registered type) on success.
pub fn extract_bindings(
    compiled: &CompiledPattern,
    actual: &str,
    types: &TypeRegistry,
) -> Option<HashMap<String, Value>> {
    let caps = compiled.regex.captures(actual)?;
    let mut bindings = HashMap::new();
    for (name, type_name) in &compiled.bound {
        if let Some(m) = caps.name(name) {
            let value = types
                .get(type_name)
                .map(|t| t.coerce(m.as_str()))
                .unwrap_or_else(|| Value::String(m.as_str().to_string()));
            bindings.insert(name.clone(), value);
        }
    }
    Some(bindings)
}
