// Literal matching strategy: exact comparison, with a wildcard token that
// stands in for "any text" at the position it appears (doctest's `...`
// ELLIPSIS idiom).

/// Compare `expected` against `actual`, treating `wildcard` as matching any
/// run of text (including none) wherever it appears in `expected`.
pub fn matches(expected: &str, actual: &str, wildcard: &str) -> bool {
    if !expected.contains(wildcard) {
        return expected == actual;
    }

    let parts: Vec<&str> = expected.split(wildcard).collect();
    let mut rest = actual;

    if let Some(first) = parts.first() {
        match rest.strip_prefix(first) {
            Some(r) => rest = r,
            None => return false,
        }
    }

    let last_index = parts.len() - 1;
    for (i, part) in parts.iter().enumerate().skip(1) {
        if i == last_index {
            return rest.ends_with(part);
        }
        match rest.find(part) {
            Some(pos) => rest = &rest[pos + part.len()..],
            None => return false,
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_without_wildcard() {
        assert!(matches("hello", "hello", "..."));
        assert!(!matches("hello", "goodbye", "..."));
    }

    #[test]
    fn wildcard_matches_any_middle_text() {
        assert!(matches("Traceback...line 3", "Traceback (most recent call last)\nline 3", "..."));
    }

    #[test]
    fn wildcard_at_start_or_end() {
        assert!(matches("...done", "step 1\nstep 2\ndone", "..."));
        assert!(matches("starting...", "starting up the server", "..."));
    }

    #[test]
    fn wildcard_matching_nothing() {
        assert!(matches("ab...cd", "abcd", "..."));
    }

    #[test]
    fn multiple_wildcards_must_appear_in_order() {
        assert!(matches("a...b...c", "a-xyz-b-xyz-c", "..."));
        assert!(!matches("a...b...c", "c-b-a", "..."));
    }
}
