// Diagnostic builder and common diagnostic helpers

use super::types::*;

/// Builder for creating diagnostics with fluent API
pub struct DiagnosticBuilder {
    code: DiagnosticCode,
    severity: DiagnosticSeverity,
    message: String,
    range: Range,
    file: Option<String>,
    source: Option<String>,
    related_information: Vec<DiagnosticRelatedInformation>,
    suggestions: Vec<String>,
    context: Option<String>,
}

impl DiagnosticBuilder {
    /// Create a new error diagnostic builder
    pub fn error(code: DiagnosticCode, message: impl Into<String>, range: Range) -> Self {
        Self {
            code,
            severity: DiagnosticSeverity::Error,
            message: message.into(),
            range,
            file: None,
            source: Some("groktest".to_string()),
            related_information: Vec::new(),
            suggestions: Vec::new(),
            context: None,
        }
    }

    /// Create a new warning diagnostic builder
    pub fn warning(code: DiagnosticCode, message: impl Into<String>, range: Range) -> Self {
        Self {
            code,
            severity: DiagnosticSeverity::Warning,
            message: message.into(),
            range,
            file: None,
            source: Some("groktest".to_string()),
            related_information: Vec::new(),
            suggestions: Vec::new(),
            context: None,
        }
    }

    /// Set the file path
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Set context
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add related information
    pub fn with_related_info(
        mut self,
        file: impl Into<String>,
        range: Range,
        message: impl Into<String>,
    ) -> Self {
        self.related_information.push(DiagnosticRelatedInformation {
            location: DiagnosticLocation {
                file: file.into(),
                range,
            },
            message: message.into(),
        });
        self
    }

    /// Build the diagnostic
    pub fn build(self) -> Diagnostic {
        Diagnostic {
            code: self.code,
            severity: self.severity,
            message: self.message,
            range: self.range,
            file: self.file,
            source: self.source,
            related_information: self.related_information,
            suggestions: self.suggestions,
            context: self.context,
        }
    }
}

/// Common diagnostic helpers for groktest documents
pub struct GrokDiagnostics;

impl GrokDiagnostics {
    pub fn front_matter_parse_error(
        file: &str,
        json_err: &str,
        toml_err: &str,
        dialect_err: &str,
    ) -> Diagnostic {
        DiagnosticBuilder::warning(
            DiagnosticCode::FrontMatterParseError,
            "front matter did not parse as JSON, TOML, or the simplified key/value dialect",
            Range::at_line(1),
        )
        .with_file(file)
        .with_related_info(file, Range::at_line(1), format!("json: {json_err}"))
        .with_related_info(file, Range::at_line(1), format!("toml: {toml_err}"))
        .with_related_info(file, Range::at_line(1), format!("dialect: {dialect_err}"))
        .with_suggestion("front matter is treated as empty for this document")
        .build()
    }

    pub fn space_missing_after_prompt(file: &str, line: usize) -> Diagnostic {
        DiagnosticBuilder::error(
            DiagnosticCode::SpaceMissingAfterPrompt,
            "space missing after prompt",
            Range::at_line(line),
        )
        .with_file(file)
        .with_suggestion("continuation lines must read \"<indent><ps2> <text>\"")
        .build()
    }

    pub fn inconsistent_leading_whitespace(file: &str, line: usize) -> Diagnostic {
        DiagnosticBuilder::error(
            DiagnosticCode::InconsistentLeadingWhitespace,
            "inconsistent leading whitespace",
            Range::at_line(line),
        )
        .with_file(file)
        .with_suggestion("expected-output lines must be indented at least as far as the prompt")
        .build()
    }

    pub fn unbalanced_option_quote(file: &str, line: usize, token: &str) -> Diagnostic {
        DiagnosticBuilder::warning(
            DiagnosticCode::UnbalancedOptionQuote,
            format!("unbalanced quote in option value: {token}"),
            Range::at_line(line),
        )
        .with_file(file)
        .with_suggestion("the raw token including the stray quote is used as-is")
        .build()
    }

    pub fn unknown_parse_type(file: &str, line: usize, name: &str) -> Diagnostic {
        DiagnosticBuilder::error(
            DiagnosticCode::UnknownParseType,
            format!("unknown parse type: {name}"),
            Range::at_line(line),
        )
        .with_file(file)
        .with_suggestion("register it under parse.types, or use a built-in (d, w, s)")
        .build()
    }

    pub fn runtime_start_failed(file: &str, reason: &str) -> Diagnostic {
        DiagnosticBuilder::error(
            DiagnosticCode::RuntimeStartFailed,
            format!("runtime failed to start: {reason}"),
            Range::default(),
        )
        .with_file(file)
        .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn front_matter_error_carries_all_three_reasons() {
        let diag = GrokDiagnostics::front_matter_parse_error("doc.md", "eof", "bad key", "no colon");
        assert_eq!(diag.related_information.len(), 3);
        assert_eq!(diag.severity, DiagnosticSeverity::Warning);
    }

    #[test]
    fn space_missing_is_an_error() {
        let diag = GrokDiagnostics::space_missing_after_prompt("doc.md", 4);
        assert_eq!(diag.severity, DiagnosticSeverity::Error);
        assert_eq!(diag.range.start.line, 4);
    }
}
