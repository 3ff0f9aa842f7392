// Shared pre-processing applied to both the expected text and the actual
// runtime output before either matching strategy runs.

#[derive(Debug, Clone)]
pub struct PreprocessOptions {
    pub blankline_marker: String,
    /// `Some('/')` normalizes backslashes to forward slashes (the default
    /// `+paths` direction); `Some('\\')` normalizes the other way; `None`
    /// leaves path separators untouched.
    pub normalize_paths: Option<char>,
    pub collapse_whitespace: bool,
    pub ignore_case: bool,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            blankline_marker: "<BLANKLINE>".to_string(),
            normalize_paths: None,
            collapse_whitespace: false,
            ignore_case: false,
        }
    }
}

/// Replace lines that are exactly the blank-line marker with an empty line.
/// Applied to expected text only: actual runtime output never needs it,
/// since real blank lines already compare equal to an empty expected line.
pub fn substitute_blankline_marker(text: &str, marker: &str) -> String {
    text.lines()
        .map(|line| if line == marker { "" } else { line })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn preprocess(text: &str, opts: &PreprocessOptions) -> String {
    text.lines()
        .map(|line| preprocess_line(line, opts))
        .collect::<Vec<_>>()
        .join("\n")
}

fn preprocess_line(line: &str, opts: &PreprocessOptions) -> String {
    let mut line = line.to_string();
    match opts.normalize_paths {
        Some('\\') => line = line.replace('/', "\\"),
        Some(_) => line = line.replace('\\', "/"),
        None => {}
    }
    if opts.collapse_whitespace {
        line = collapse_whitespace(&line);
    }
    if opts.ignore_case {
        line = line.to_lowercase();
    }
    line
}

/// Collapse runs of whitespace to a single space and trim the ends. Applied
/// within a line only: blank lines still separate an expected block from
/// what follows it.
fn collapse_whitespace(line: &str) -> String {
    let mut out = String::new();
    let mut prev_was_space = false;
    for c in line.chars() {
        if c.is_whitespace() {
            if !prev_was_space {
                out.push(' ');
            }
            prev_was_space = true;
        } else {
            out.push(c);
            prev_was_space = false;
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blankline_marker_becomes_an_empty_line() {
        let text = "first\n<BLANKLINE>\nlast";
        assert_eq!(substitute_blankline_marker(text, "<BLANKLINE>"), "first\n\nlast");
    }

    #[test]
    fn collapse_whitespace_is_within_line_only() {
        let opts = PreprocessOptions {
            collapse_whitespace: true,
            ..Default::default()
        };
        let out = preprocess("a   b\n\nc    d", &opts);
        assert_eq!(out, "a b\n\nc d");
    }

    #[test]
    fn normalize_paths_converts_backslashes() {
        let opts = PreprocessOptions {
            normalize_paths: Some('/'),
            ..Default::default()
        };
        assert_eq!(preprocess(r"C:\foo\bar", &opts), "C:/foo/bar");
    }

    #[test]
    fn normalize_paths_reverse_direction() {
        let opts = PreprocessOptions {
            normalize_paths: Some('\\'),
            ..Default::default()
        };
        assert_eq!(preprocess("C:/foo/bar", &opts), r"C:\foo\bar");
    }

    #[test]
    fn ignore_case_lowercases() {
        let opts = PreprocessOptions {
            ignore_case: true,
            ..Default::default()
        };
        assert_eq!(preprocess("HeLLo", &opts), "hello");
    }
}
