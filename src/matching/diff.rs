// Plain-text diff rendering for a failed match, shown under `+diff`.

use console::Style;
use dissimilar::{diff, Chunk};
use std::fmt::Write;

/// Render a colored diff between the expected and actual text of a failed
/// match (expected shown as deletions, actual as insertions).
pub fn render(expected: &str, actual: &str) -> String {
    let diff_chunks = diff(expected, actual);

    let mut output = String::new();
    let _ = writeln!(output, "Diff (Expected - / Actual +):");

    for chunk in diff_chunks {
        match chunk {
            Chunk::Equal(text) => {
                let style = Style::new().dim();
                write!(output, "{}", style.apply_to(text)).unwrap();
            }
            Chunk::Delete(text) => {
                let style = Style::new().red();
                write!(output, "{}", style.apply_to(text)).unwrap();
            }
            Chunk::Insert(text) => {
                let style = Style::new().green();
                write!(output, "{}", style.apply_to(text)).unwrap();
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_both_sides_of_the_difference() {
        let text = render("expected line", "actual line");
        assert!(text.contains("expected"));
        assert!(text.contains("actual"));
    }
}
