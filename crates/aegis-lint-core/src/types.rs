//! Core types for conformance diagnostics and results.

use miette::{NamedSource, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity level for diagnostics.
///
/// Only errors influence the exit status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Advisory finding, never fails a run.
    Warning,
    /// Conformance violation that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path relative to the analyzed root.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte offset in file (for miette integration).
    pub offset: usize,
    /// Length of the span in bytes.
    pub length: usize,
}

impl Location {
    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self {
            file,
            line,
            column,
            offset: 0,
            length: 0,
        }
    }

    /// Sets the byte offset and length for this location.
    #[must_use]
    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }
}

/// A suggested fix for a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Human-readable description of the fix.
    pub message: String,
}

impl Suggestion {
    /// Creates a new suggestion.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A single finding produced by a rule.
///
/// Diagnostics are created once and never mutated afterwards, apart from the
/// severity override the analyzer applies from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Diagnostic code (e.g., `LAYER_VIOLATION`).
    pub code: String,
    /// Name of the rule that produced it (e.g., `layering`).
    pub rule: String,
    /// Severity of this diagnostic.
    pub severity: Severity,
    /// Primary location.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Optional suggestion for fixing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<Suggestion>,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            location,
            message: message.into(),
            suggestion: None,
        }
    }

    /// Adds a suggestion to this diagnostic.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    /// Returns true if this is an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.code,
            self.message
        )
    }
}

/// A diagnostic bound to its source text for rich terminal rendering.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
#[error("[{code}] {message}")]
pub struct DiagnosticReport {
    code: String,
    message: String,
    #[source_code]
    source_code: NamedSource<String>,
    #[help]
    help: Option<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl DiagnosticReport {
    /// Binds a diagnostic to the contents of the file it points into.
    #[must_use]
    pub fn new(diagnostic: &Diagnostic, source: String) -> Self {
        Self {
            code: diagnostic.code.clone(),
            message: diagnostic.message.clone(),
            source_code: NamedSource::new(diagnostic.location.file.display().to_string(), source),
            help: diagnostic.suggestion.as_ref().map(|s| s.message.clone()),
            span: SourceSpan::from((diagnostic.location.offset, diagnostic.location.length)),
            label_message: diagnostic.rule.clone(),
        }
    }
}

/// Result of a conformance run.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All diagnostics, ordered by (file, line).
    pub diagnostics: Vec<Diagnostic>,
    /// Number of classified files that were analyzed.
    pub files_checked: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Returns diagnostics filtered by severity, preserving order.
    #[must_use]
    pub fn by_severity(&self, severity: Severity) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .collect()
    }

    /// Counts diagnostics as `(errors, warnings)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize) {
        let errors = self.diagnostics.iter().filter(|d| d.is_error()).count();
        (errors, self.diagnostics.len() - errors)
    }

    /// Counts diagnostics carrying the given code.
    #[must_use]
    pub fn count_code(&self, code: &str) -> usize {
        self.diagnostics.iter().filter(|d| d.code == code).count()
    }

    /// Orders diagnostics by (file, line, column).
    ///
    /// The sort is stable, so diagnostics from different rules on the same
    /// line keep the order in which the rules ran.
    pub fn sort(&mut self) {
        self.diagnostics.sort_by(|a, b| {
            a.location
                .file
                .cmp(&b.location.file)
                .then(a.location.line.cmp(&b.location.line))
                .then(a.location.column.cmp(&b.location.column))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_diagnostic(file: &str, line: usize, severity: Severity) -> Diagnostic {
        Diagnostic::new(
            "NAMING_ERROR",
            "naming",
            severity,
            Location::new(PathBuf::from(file), line, 1),
            "function 'setValue' lacks a domain prefix",
        )
    }

    #[test]
    fn display_is_compact_single_line() {
        let d = make_diagnostic("src/domain/a.c", 7, Severity::Error);
        assert_eq!(
            d.to_string(),
            "src/domain/a.c:7:1: error [NAMING_ERROR] function 'setValue' lacks a domain prefix"
        );
    }

    #[test]
    fn warnings_do_not_count_as_errors() {
        let mut result = LintResult::new();
        result
            .diagnostics
            .push(make_diagnostic("a.c", 1, Severity::Warning));
        assert!(!result.has_errors());
        assert_eq!(result.count_by_severity(), (0, 1));

        result
            .diagnostics
            .push(make_diagnostic("a.c", 2, Severity::Error));
        assert!(result.has_errors());
        assert_eq!(result.count_by_severity(), (1, 1));
    }

    #[test]
    fn sort_orders_by_file_then_line() {
        let mut result = LintResult::new();
        result.diagnostics.push(make_diagnostic("b.c", 1, Severity::Error));
        result.diagnostics.push(make_diagnostic("a.c", 9, Severity::Error));
        result.diagnostics.push(make_diagnostic("a.c", 2, Severity::Warning));
        result.sort();

        let order: Vec<(String, usize)> = result
            .diagnostics
            .iter()
            .map(|d| (d.location.file.display().to_string(), d.location.line))
            .collect();
        assert_eq!(
            order,
            vec![
                ("a.c".to_string(), 2),
                ("a.c".to_string(), 9),
                ("b.c".to_string(), 1)
            ]
        );
    }

    #[test]
    fn sort_keeps_same_line_diagnostics_from_every_rule() {
        let mut result = LintResult::new();
        let mut layering = make_diagnostic("a.c", 3, Severity::Error);
        layering.code = "LAYER_VIOLATION".into();
        layering.rule = "layering".into();
        result.diagnostics.push(layering);
        result.diagnostics.push(make_diagnostic("a.c", 3, Severity::Error));
        result.sort();

        assert_eq!(result.diagnostics.len(), 2);
        assert_eq!(result.diagnostics[0].code, "LAYER_VIOLATION");
        assert_eq!(result.diagnostics[1].code, "NAMING_ERROR");
    }

    #[test]
    fn report_carries_code_and_help() {
        let d = make_diagnostic("a.c", 1, Severity::Error)
            .with_suggestion(Suggestion::new("Rename to aegis_domain_set_value"));
        let report = DiagnosticReport::new(&d, "void setValue(int v);\n".to_string());
        assert_eq!(
            report.to_string(),
            "[NAMING_ERROR] function 'setValue' lacks a domain prefix"
        );
        assert_eq!(
            miette::Diagnostic::help(&report).map(|h| h.to_string()),
            Some("Rename to aegis_domain_set_value".to_string())
        );
    }
}
