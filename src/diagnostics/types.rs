// Diagnostic types for front-matter, extraction, option and config problems

use serde::Serialize;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    /// Critical error that prevents execution
    Error,
    /// Warning that might cause issues
    Warning,
    /// Informational message
    Information,
    /// Hint for improvement
    Hint,
}

/// Diagnostic error codes for categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCode {
    // Front matter (1000-1999)
    FrontMatterParseError = 1001,
    FrontMatterNotAMapping = 1002,

    // Extraction (2000-2999)
    SpaceMissingAfterPrompt = 2001,
    InconsistentLeadingWhitespace = 2002,

    // Option decoding (3000-3999)
    UnbalancedOptionQuote = 3001,
    UnknownOptionToken = 3002,

    // Config (4000-4999)
    ConfigParseError = 4001,
    UnknownParseType = 4002,

    // Runtime (5000-5999)
    RuntimeStartFailed = 5001,
    RuntimeExecFailed = 5002,

    // Matching (6000-6999)
    MatchFailed = 6001,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::FrontMatterParseError => "front_matter_parse_error",
            DiagnosticCode::FrontMatterNotAMapping => "front_matter_not_a_mapping",
            DiagnosticCode::SpaceMissingAfterPrompt => "space_missing_after_prompt",
            DiagnosticCode::InconsistentLeadingWhitespace => "inconsistent_leading_whitespace",
            DiagnosticCode::UnbalancedOptionQuote => "unbalanced_option_quote",
            DiagnosticCode::UnknownOptionToken => "unknown_option_token",
            DiagnosticCode::ConfigParseError => "config_parse_error",
            DiagnosticCode::UnknownParseType => "unknown_parse_type",
            DiagnosticCode::RuntimeStartFailed => "runtime_start_failed",
            DiagnosticCode::RuntimeExecFailed => "runtime_exec_failed",
            DiagnosticCode::MatchFailed => "match_failed",
        }
    }
}

/// Source position in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Source range in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn at_line(line: usize) -> Self {
        Self {
            start: Position::new(line, 0),
            end: Position::new(line, usize::MAX),
        }
    }
}

/// Related diagnostic information
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticRelatedInformation {
    pub location: DiagnosticLocation,
    pub message: String,
}

/// Location of a diagnostic
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticLocation {
    pub file: String,
    pub range: Range,
}

/// Main diagnostic structure
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    /// Diagnostic code for categorization
    pub code: DiagnosticCode,
    /// Severity level
    pub severity: DiagnosticSeverity,
    /// Human-readable message
    pub message: String,
    /// Source location
    pub range: Range,
    /// Optional file path (defaults to current file)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Optional source of the diagnostic
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Optional related information
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related_information: Vec<DiagnosticRelatedInformation>,
    /// Optional suggestions for fixing
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
    /// Optional context showing the problematic code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic
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

    /// Create a new warning diagnostic
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

    /// Create a new information diagnostic
    pub fn info(code: DiagnosticCode, message: impl Into<String>, range: Range) -> Self {
        Self {
            code,
            severity: DiagnosticSeverity::Information,
            message: message.into(),
            range,
            file: None,
            source: Some("groktest".to_string()),
            related_information: Vec::new(),
            suggestions: Vec::new(),
            context: None,
        }
    }

    /// Create a new hint diagnostic
    pub fn hint(code: DiagnosticCode, message: impl Into<String>, range: Range) -> Self {
        Self {
            code,
            severity: DiagnosticSeverity::Hint,
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

    /// Add multiple suggestions
    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions.extend(suggestions);
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
        location: DiagnosticLocation,
        message: impl Into<String>,
    ) -> Self {
        self.related_information.push(DiagnosticRelatedInformation {
            location,
            message: message.into(),
        });
        self
    }
}

/// Collection of diagnostics
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiagnosticCollection {
    pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn warning(&mut self, code: DiagnosticCode, message: impl Into<String>, range: Range) {
        self.push(Diagnostic::warning(code, message, range));
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == DiagnosticSeverity::Error)
    }

    pub fn has_warnings(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == DiagnosticSeverity::Warning)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == DiagnosticSeverity::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_code_as_str_is_snake_case() {
        assert_eq!(
            DiagnosticCode::SpaceMissingAfterPrompt.as_str(),
            "space_missing_after_prompt"
        );
    }

    #[test]
    fn collection_tracks_error_presence() {
        let mut diags = DiagnosticCollection::new();
        assert!(!diags.has_errors());
        diags.warning(DiagnosticCode::UnbalancedOptionQuote, "unbalanced", Range::default());
        assert!(!diags.has_errors());
        assert!(diags.has_warnings());
        diags.push(Diagnostic::error(
            DiagnosticCode::FrontMatterParseError,
            "bad front matter",
            Range::at_line(1),
        ));
        assert!(diags.has_errors());
        assert_eq!(diags.errors().count(), 1);
    }
}
