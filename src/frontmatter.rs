// Front-matter extraction: a fenced `---` header tried as JSON, then TOML,
// then a simplified key/value dialect. Absence (or a non-mapping result from
// every dialect) yields an empty mapping carrying only `__src__`.

use serde_json::{Map, Value};

use crate::diagnostics::{Diagnostic, GrokDiagnostics};

pub const SRC_KEY: &str = "__src__";

/// Result of parsing front matter: the resolved mapping, the document body
/// with the front-matter block stripped, and an optional diagnostic when
/// none of the three dialects could make sense of it.
pub struct FrontMatter {
    pub fields: Map<String, Value>,
    pub body: String,
    pub diagnostic: Option<Diagnostic>,
}

/// Parse front matter out of `content`, attaching `__src__` = `filename`.
pub fn parse(filename: &str, content: &str) -> FrontMatter {
    match split_front_matter(content) {
        Some((header, body)) => {
            let (fields, diagnostic) = decode(filename, header);
            let mut fields = fields;
            fields.insert(SRC_KEY.to_string(), Value::String(filename.to_string()));
            FrontMatter {
                fields,
                body: body.to_string(),
                diagnostic,
            }
        }
        None => {
            let mut fields = Map::new();
            fields.insert(SRC_KEY.to_string(), Value::String(filename.to_string()));
            FrontMatter {
                fields,
                body: content.to_string(),
                diagnostic: None,
            }
        }
    }
}

/// Split off a leading `---`/content/`---` header, allowing a single blank
/// line before the opening fence. Returns `(header, rest_of_document)`.
fn split_front_matter(content: &str) -> Option<(&str, &str)> {
    let mut rest = content;
    if let Some(stripped) = rest.strip_prefix('\n') {
        rest = stripped;
    }

    let first_line_end = rest.find('\n').unwrap_or(rest.len());
    if rest[..first_line_end].trim_end() != "---" {
        return None;
    }

    let after_open = &rest[first_line_end..];
    let after_open = after_open.strip_prefix('\n').unwrap_or(after_open);

    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        let trimmed = line.trim_end_matches(['\n', '\r']);
        if trimmed.trim_end() == "---" {
            let header = &after_open[..offset];
            let body_start = offset + line.len();
            let body = after_open.get(body_start..).unwrap_or("");
            return Some((header, body));
        }
        offset += line.len();
    }

    None
}

fn decode(filename: &str, header: &str) -> (Map<String, Value>, Option<Diagnostic>) {
    let json_err = match serde_json::from_str::<Value>(header) {
        Ok(Value::Object(map)) => return (map, None),
        Ok(_) => "front matter is not a mapping".to_string(),
        Err(e) => e.to_string(),
    };

    let toml_err = match toml::from_str::<toml::Value>(header) {
        Ok(value) => match serde_json::to_value(value) {
            Ok(Value::Object(map)) => return (map, None),
            Ok(_) => "front matter is not a mapping".to_string(),
            Err(e) => e.to_string(),
        },
        Err(e) => e.to_string(),
    };

    match decode_simplified(header) {
        Ok(map) => (map, None),
        Err(dialect_err) => {
            let diag = GrokDiagnostics::front_matter_parse_error(
                filename,
                &json_err,
                &toml_err,
                &dialect_err,
            );
            (Map::new(), Some(diag))
        }
    }
}

/// `key: value` or `key = value` lines; `#`-prefixed lines are comments;
/// inline comments are not stripped (a `#` inside a value is part of it).
fn decode_simplified(header: &str) -> Result<Map<String, Value>, String> {
    let mut map = Map::new();
    for (lineno, raw_line) in header.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let sep = line
            .find(':')
            .map(|i| (i, 1))
            .or_else(|| line.find('=').map(|i| (i, 1)));

        let Some((idx, _)) = sep else {
            return Err(format!("line {}: no ':' or '=' found", lineno + 1));
        };

        let key = line[..idx].trim();
        let value = line[idx + 1..].trim();
        if key.is_empty() {
            return Err(format!("line {}: empty key", lineno + 1));
        }

        map.insert(key.to_string(), coerce_scalar(value));
    }
    Ok(map)
}

fn coerce_scalar(value: &str) -> Value {
    if value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("yes") {
        return Value::Bool(true);
    }
    if value.eq_ignore_ascii_case("false") || value.eq_ignore_ascii_case("no") {
        return Value::Bool(false);
    }
    if let Ok(i) = value.parse::<i64>() {
        return Value::Number(i.into());
    }
    if let Ok(f) = value.parse::<f64>()
        && let Some(n) = serde_json::Number::from_f64(f)
    {
        return Value::Number(n);
    }
    Value::String(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_front_matter_yields_empty_mapping_with_src() {
        let fm = parse("doc.md", "# Hello\n\n>>> 1 + 1\n2\n");
        assert_eq!(fm.fields.len(), 1);
        assert_eq!(fm.fields[SRC_KEY], Value::String("doc.md".into()));
        assert!(fm.body.starts_with("# Hello"));
    }

    #[test]
    fn json_front_matter_is_preferred() {
        let doc = "---\n{\"test-type\": \"shell\"}\n---\nbody\n";
        let fm = parse("doc.md", doc);
        assert_eq!(fm.fields["test-type"], Value::String("shell".into()));
        assert_eq!(fm.body, "body\n");
    }

    #[test]
    fn toml_front_matter_parses_when_not_json() {
        let doc = "---\ntest-type = \"python\"\nretry-on-fail = 2\n---\nbody\n";
        let fm = parse("doc.md", doc);
        assert_eq!(fm.fields["test-type"], Value::String("python".into()));
        assert_eq!(fm.fields["retry-on-fail"], Value::from(2));
    }

    #[test]
    fn simplified_dialect_handles_bool_and_int_and_comment() {
        let doc = "---\n# a comment\ncase: false\nretry: 3\nname: alice\n---\nbody\n";
        let fm = parse("doc.md", doc);
        assert_eq!(fm.fields["case"], Value::Bool(false));
        assert_eq!(fm.fields["retry"], Value::from(3));
        assert_eq!(fm.fields["name"], Value::String("alice".into()));
    }

    #[test]
    fn malformed_front_matter_degrades_to_empty_with_diagnostic() {
        let doc = "---\nthis is not valid in any dialect\n---\nbody\n";
        let fm = parse("doc.md", doc);
        assert_eq!(fm.fields.len(), 1);
        assert!(fm.diagnostic.is_some());
    }

    #[test]
    fn leading_blank_line_before_fence_is_tolerated() {
        let doc = "\n---\nk: v\n---\nbody\n";
        let fm = parse("doc.md", doc);
        assert_eq!(fm.fields["k"], Value::String("v".into()));
    }
}
