//! Rule requiring safety traceability tags (`@req`, `@design`, `@asil`).
//!
//! Every file must name all three tags in its header comment (the first
//! `header_lines` lines); a missing tag is a `FILE_TRACE_MISSING` warning.
//! Every function declared in a header is public interface and must carry
//! all three tags in the comment above it; a missing tag is a
//! `FUNC_TRACE_MISSING` error.
//!
//! Files under the hardware `port` directory are vendor glue and skipped.

use aegis_lint_core::{Diagnostic, FileContext, FileFacts, Rule, Severity, Suggestion, PORT_SEGMENT};

/// Code for a header function lacking tags.
pub const FUNC_TRACE_MISSING: &str = "FUNC_TRACE_MISSING";

/// Code for a file header lacking tags.
pub const FILE_TRACE_MISSING: &str = "FILE_TRACE_MISSING";

/// Rule name for traceability.
pub const NAME: &str = "traceability";

/// Checks file-level and function-level traceability tags.
#[derive(Debug, Clone, Default)]
pub struct Traceability;

impl Traceability {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for Traceability {
    fn name(&self) -> &'static str {
        NAME
    }

    fn codes(&self) -> &'static [&'static str] {
        &[FUNC_TRACE_MISSING, FILE_TRACE_MISSING]
    }

    fn description(&self) -> &'static str {
        "Files and public functions carry @req, @design and @asil tags"
    }

    fn applies_to(&self, ctx: &FileContext) -> bool {
        !ctx.has_segment(PORT_SEGMENT)
    }

    fn check(&self, ctx: &FileContext, facts: &FileFacts) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        if !facts.header_tags.is_complete() {
            diagnostics.push(
                Diagnostic::new(
                    FILE_TRACE_MISSING,
                    NAME,
                    Severity::Warning,
                    ctx.location(1),
                    format!(
                        "file header is missing traceability tags: {}",
                        facts.header_tags.missing().join(", ")
                    ),
                )
                .with_suggestion(Suggestion::new(
                    "Add @req, @design and @asil to the file comment block",
                )),
            );
        }

        if ctx.is_header {
            for function in facts.functions() {
                let tags = function.annotations.trace;
                if tags.is_complete() {
                    continue;
                }
                diagnostics.push(Diagnostic::new(
                    FUNC_TRACE_MISSING,
                    NAME,
                    Severity::Error,
                    ctx.location(function.line),
                    format!(
                        "function '{}' is missing traceability tags: {}",
                        function.name,
                        tags.missing().join(", ")
                    ),
                ));
            }
        }

        diagnostics
    }
}
