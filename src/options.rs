// Inline option decoder: `+NAME`, `-NAME`, `+NAME=VALUE` tokens pulled from a
// test's trailing comment, a `test-options` string, or a front-matter key.
//
// Grounded in the same quote-aware, whitespace-splitting, last-occurrence-wins
// tokenizer shape as the teacher's `tokenize_options`/`parse_key_value_options`,
// generalized from `key=value` pairs to the `+`/`-` sigil grammar.

use serde_json::{Map, Value};

use crate::diagnostics::{Diagnostic, GrokDiagnostics};

/// Decode an option string, returning the resolved mapping plus any
/// non-fatal diagnostics (currently just "unbalanced quote" warnings).
pub fn decode(filename: &str, line: usize, text: &str) -> (Map<String, Value>, Vec<Diagnostic>) {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    let mut map = Map::new();
    let mut diags = Vec::new();
    let mut i = 0;

    while i < len {
        if chars[i].is_whitespace() {
            i += 1;
            continue;
        }

        let sign = chars[i];
        if sign != '+' && sign != '-' {
            // Stray word: ignored silently, skip to the next whitespace run.
            while i < len && !chars[i].is_whitespace() {
                i += 1;
            }
            continue;
        }

        let after_sign = i + 1;
        let mut j = after_sign;
        while j < len && (chars[j].is_alphanumeric() || chars[j] == '_' || chars[j] == '-') {
            j += 1;
        }

        if j == after_sign {
            // Bare '+' / '-' with no following name: ignored.
            i += 1;
            continue;
        }

        let name: String = chars[after_sign..j].iter().collect();
        i = j;

        if sign == '-' {
            map.insert(name, Value::Bool(false));
            continue;
        }

        if i < len && chars[i] == '=' {
            i += 1;
            if i < len && (chars[i] == '"' || chars[i] == '\'') {
                let quote = chars[i];
                let value_start = i + 1;
                let mut k = value_start;
                let mut closed = false;
                while k < len {
                    if chars[k] == '\\' && k + 1 < len {
                        k += 2;
                        continue;
                    }
                    if chars[k] == quote {
                        closed = true;
                        break;
                    }
                    k += 1;
                }

                if closed {
                    let value: String = chars[value_start..k].iter().collect();
                    map.insert(name, Value::String(value));
                    i = k + 1;
                } else {
                    // Unbalanced quote: degrade to the raw whitespace-delimited
                    // token (including the stray quote) rather than erroring.
                    let raw_start = value_start - 1;
                    let mut end = raw_start;
                    while end < len && !chars[end].is_whitespace() {
                        end += 1;
                    }
                    let raw: String = chars[raw_start..end].iter().collect();
                    diags.push(GrokDiagnostics::unbalanced_option_quote(filename, line, &raw));
                    map.insert(name, coerce(&raw));
                    i = end;
                }
            } else {
                let value_start = i;
                while i < len && !chars[i].is_whitespace() {
                    i += 1;
                }
                let raw: String = chars[value_start..i].iter().collect();
                map.insert(name, coerce(&raw));
            }
        } else {
            map.insert(name, Value::Bool(true));
        }
    }

    (map, diags)
}

fn coerce(raw: &str) -> Value {
    if let Ok(n) = raw.parse::<i64>() {
        Value::Number(n.into())
    } else {
        Value::String(raw.to_string())
    }
}

/// Overlay option layers in increasing precedence (document defaults first,
/// inline-per-test options last); within a layer and across layers, the
/// last occurrence of a name wins.
pub fn merge(layers: &[&Map<String, Value>]) -> Map<String, Value> {
    let mut out = Map::new();
    for layer in layers {
        for (k, v) in layer.iter() {
            out.insert(k.clone(), v.clone());
        }
    }
    out
}

/// Typed view over a resolved option mapping, with test-type defaults
/// supplied at construction so callers never see a missing key.
#[derive(Debug, Clone)]
pub struct Options(pub Map<String, Value>);

impl Options {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn bool(&self, name: &str, default: bool) -> bool {
        match self.0.get(name) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Number(n)) => n.as_i64().unwrap_or(0) != 0,
            _ => default,
        }
    }

    /// A bool|string option: `Some(string)` when an explicit string value
    /// was given, `Some(default)` when merely enabled (`+name`), `None` when
    /// disabled or absent.
    pub fn bool_or_string(&self, name: &str, default_value: &str) -> Option<String> {
        match self.0.get(name) {
            Some(Value::Bool(true)) => Some(default_value.to_string()),
            Some(Value::Bool(false)) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            None => None,
        }
    }

    /// Like `bool_or_string`, but an absent key defaults to *enabled* with
    /// `default_value` rather than disabled. Used for options the spec
    /// documents as active by default (e.g. `blankline`'s per-test-type
    /// marker) rather than opt-in.
    pub fn bool_or_string_default_on(&self, name: &str, default_value: &str) -> Option<String> {
        if !self.0.contains_key(name) {
            return Some(default_value.to_string());
        }
        self.bool_or_string(name, default_value)
    }

    pub fn str(&self, name: &str) -> Option<String> {
        match self.0.get(name) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(Value::Bool(b)) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        match self.0.get(name) {
            Some(Value::Number(n)) => n.as_i64(),
            Some(Value::String(s)) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plus_name_sets_true() {
        let (map, diags) = decode("doc.md", 1, "+parse +wildcard");
        assert_eq!(map["parse"], Value::Bool(true));
        assert_eq!(map["wildcard"], Value::Bool(true));
        assert!(diags.is_empty());
    }

    #[test]
    fn minus_name_sets_false_and_never_carries_value() {
        let (map, _) = decode("doc.md", 1, "-case");
        assert_eq!(map["case"], Value::Bool(false));
    }

    #[test]
    fn integer_values_are_coerced() {
        let (map, _) = decode("doc.md", 1, "+retry-on-fail=2");
        assert_eq!(map["retry-on-fail"], Value::from(2));
    }

    #[test]
    fn quoted_values_may_contain_spaces() {
        let (map, _) = decode("doc.md", 1, r#"+wildcard="..." +skip='needs network'"#);
        assert_eq!(map["wildcard"], Value::String("...".into()));
        assert_eq!(map["skip"], Value::String("needs network".into()));
    }

    #[test]
    fn last_occurrence_wins() {
        let (map, _) = decode("doc.md", 1, "+case -case +case");
        assert_eq!(map["case"], Value::Bool(true));
    }

    #[test]
    fn unbalanced_quote_degrades_with_diagnostic() {
        let (map, diags) = decode("doc.md", 1, r#"+name="unterminated"#);
        assert_eq!(diags.len(), 1);
        assert_eq!(map["name"], Value::String("\"unterminated".into()));
    }

    #[test]
    fn stray_tokens_are_ignored() {
        let (map, diags) = decode("doc.md", 1, "foo=123 bare + -");
        assert!(map.is_empty());
        assert!(diags.is_empty());
    }

    #[test]
    fn merge_overlays_layers_last_wins() {
        let (defaults, _) = decode("doc.md", 1, "+case +space");
        let (inline, _) = decode("doc.md", 1, "-case");
        let merged = merge(&[&defaults, &inline]);
        assert_eq!(merged["case"], Value::Bool(false));
        assert_eq!(merged["space"], Value::Bool(true));
    }

    #[test]
    fn options_bool_or_string_distinguishes_flag_from_value() {
        let (map, _) = decode("doc.md", 1, "+wildcard");
        let opts = Options::new(map);
        assert_eq!(opts.bool_or_string("wildcard", "..."), Some("...".to_string()));

        let (map, _) = decode("doc.md", 1, "+wildcard=###");
        let opts = Options::new(map);
        assert_eq!(opts.bool_or_string("wildcard", "..."), Some("###".to_string()));

        let (map, _) = decode("doc.md", 1, "-wildcard");
        let opts = Options::new(map);
        assert_eq!(opts.bool_or_string("wildcard", "..."), None);
    }

    #[test]
    fn bool_or_string_default_on_is_active_with_no_option_given_at_all() {
        let opts = Options::new(Map::new());
        assert_eq!(opts.bool_or_string_default_on("blankline", "<BLANKLINE>"), Some("<BLANKLINE>".to_string()));
    }

    #[test]
    fn bool_or_string_default_on_still_honors_an_explicit_disable() {
        let (map, _) = decode("doc.md", 1, "-blankline");
        let opts = Options::new(map);
        assert_eq!(opts.bool_or_string_default_on("blankline", "<BLANKLINE>"), None);
    }
}
