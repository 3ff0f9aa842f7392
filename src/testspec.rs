// TestSpec profiles: the prompt strings and compiled patterns that define a
// test-type ("python", "shell", ...). Selecting a TestSpec determines which
// runtime adapter backs the document and how `extract` recognizes examples.

use once_cell::sync::Lazy;
use regex::Regex;

/// A test-type profile: prompts, the example-block regex, the inline-option
/// regex, the blank-line marker, and which runtime adapter to instantiate.
#[derive(Debug, Clone)]
pub struct TestSpec {
    pub name: &'static str,
    pub ps1: &'static str,
    pub ps2: &'static str,
    pub blankline_marker: &'static str,
    pub runtime_key: &'static str,
    pub test_pattern: Regex,
    pub option_pattern: Regex,
}

/// Matches the first line of an example block: leading indent plus the PS1
/// token. `extract` walks subsequent lines itself (continuation/expected
/// blocks need per-line validation, not a single greedy regex).
fn build_test_pattern(ps1: &str) -> Regex {
    let pattern = format!(r"^(?P<indent>[ \t]*){ps1}(?: (?P<expr>.*)|())$", ps1 = regex::escape(ps1));
    Regex::new(&pattern).expect("built-in test pattern must compile")
}

/// `+name`, `-name`, `+name=value` tokens in a trailing `# ...` comment.
static OPTION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[+-][A-Za-z][\w-]*(?:=(?:"[^"]*"|'[^']*'|\S+))?"#).unwrap());

pub static PYTHON: Lazy<TestSpec> = Lazy::new(|| TestSpec {
    name: "python",
    ps1: ">>>",
    ps2: "...",
    blankline_marker: "<BLANKLINE>",
    runtime_key: "python",
    test_pattern: build_test_pattern(">>>"),
    option_pattern: OPTION_PATTERN.clone(),
});

pub static SHELL: Lazy<TestSpec> = Lazy::new(|| TestSpec {
    name: "shell",
    ps1: "$",
    ps2: ">",
    blankline_marker: "<BLANKLINE>",
    runtime_key: "shell",
    test_pattern: build_test_pattern("$"),
    option_pattern: OPTION_PATTERN.clone(),
});

/// Resolve a test-type name to its built-in `TestSpec`. Unknown names fall
/// back to `python`, matching the crate-wide default selected by `--test-type`.
pub fn lookup(name: &str) -> &'static TestSpec {
    match name {
        "shell" => &SHELL,
        _ => &PYTHON,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn python_pattern_matches_first_line_of_an_example() {
        let caps = PYTHON
            .test_pattern
            .captures(">>> 1 + 1")
            .expect("should match");
        assert_eq!(caps.name("expr").unwrap().as_str(), "1 + 1");
        assert_eq!(caps.name("indent").unwrap().as_str(), "");
    }

    #[test]
    fn python_pattern_does_not_match_prose() {
        assert!(PYTHON.test_pattern.captures("just some prose").is_none());
    }

    #[test]
    fn shell_pattern_uses_dollar_prompt() {
        let caps = SHELL.test_pattern.captures("$ echo hi").expect("should match");
        assert_eq!(caps.name("expr").unwrap().as_str(), "echo hi");
    }

    #[test]
    fn lookup_falls_back_to_python() {
        assert_eq!(lookup("nonexistent").name, "python");
        assert_eq!(lookup("shell").name, "shell");
    }
}
