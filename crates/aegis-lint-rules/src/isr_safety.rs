//! Rule forbidding calls from interrupt context into ISR-unsafe functions.
//!
//! # Detection
//!
//! Pass 1 reads the `@isr_safe` / `@isr_unsafe` marks found above function
//! declarations. Functions that never carry a mark are reported as
//! `ISR_UNMARKED` warnings (names starting with `_` and test files are
//! skipped).
//!
//! Pass 2 looks at every call made inside an ISR body (a function whose name
//! mentions `isr`, `irq`, `handler` or `interrupt`) and reports
//! `ISR_UNSAFE_CALL` when the callee is marked unsafe.
//!
//! # Configuration
//!
//! - `whole_program` (default `false`): collect unsafe marks from every
//!   analyzed file before pass 2, so an ISR in one file calling an unsafe
//!   function declared in a header is caught. Pass 2 then runs in
//!   [`IsrSafetyWholeProgram`] instead of per file.

use aegis_lint_core::{
    Diagnostic, FileContext, FileFacts, IsrMark, Location, ProjectContext, ProjectRule, Rule,
    Severity, Suggestion,
};
use std::collections::{BTreeSet, HashSet};
use std::path::Path;

/// Code for an ISR calling an unsafe function.
pub const ISR_UNSAFE_CALL: &str = "ISR_UNSAFE_CALL";

/// Code for a function without any ISR mark.
pub const ISR_UNMARKED: &str = "ISR_UNMARKED";

/// Rule name for ISR safety.
pub const NAME: &str = "isr-safety";

/// Per-file ISR safety rule.
#[derive(Debug, Clone, Default)]
pub struct IsrSafety {
    /// Leave pass 2 to [`IsrSafetyWholeProgram`].
    pub whole_program: bool,
}

impl IsrSafety {
    /// Creates a new rule checking each file on its own.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether unsafe marks are collected across all files.
    #[must_use]
    pub fn whole_program(mut self, enabled: bool) -> Self {
        self.whole_program = enabled;
        self
    }

    fn unmarked(ctx: &FileContext, facts: &FileFacts) -> Vec<Diagnostic> {
        if ctx.is_test {
            return Vec::new();
        }

        let marked: HashSet<&str> = facts
            .functions()
            .filter(|f| f.annotations.isr.is_some())
            .map(|f| f.name.as_str())
            .collect();

        let mut reported: HashSet<&str> = HashSet::new();
        facts
            .functions()
            .filter(|f| !f.name.starts_with('_') && !marked.contains(f.name.as_str()))
            .filter(|f| reported.insert(f.name.as_str()))
            .map(|f| {
                Diagnostic::new(
                    ISR_UNMARKED,
                    NAME,
                    Severity::Warning,
                    ctx.location(f.line),
                    format!("function '{}' has no ISR_SAFE/ISR_UNSAFE mark", f.name),
                )
                .with_suggestion(Suggestion::new(
                    "Add @isr_safe or @isr_unsafe to the comment above the declaration",
                ))
            })
            .collect()
    }
}

impl Rule for IsrSafety {
    fn name(&self) -> &'static str {
        NAME
    }

    fn codes(&self) -> &'static [&'static str] {
        &[ISR_UNSAFE_CALL, ISR_UNMARKED]
    }

    fn description(&self) -> &'static str {
        "Interrupt handlers must not call functions marked ISR-unsafe"
    }

    fn check(&self, ctx: &FileContext, facts: &FileFacts) -> Vec<Diagnostic> {
        let mut diagnostics = Self::unmarked(ctx, facts);

        if !self.whole_program {
            let unsafe_names = unsafe_functions(facts);
            diagnostics.extend(unsafe_calls(
                &ctx.relative_path,
                facts,
                &unsafe_names,
                |line| ctx.location(line),
            ));
        }

        diagnostics
    }
}

/// Pass 2 over the union of unsafe marks from every analyzed file.
#[derive(Debug, Clone, Default)]
pub struct IsrSafetyWholeProgram;

impl IsrSafetyWholeProgram {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ProjectRule for IsrSafetyWholeProgram {
    fn name(&self) -> &'static str {
        NAME
    }

    fn codes(&self) -> &'static [&'static str] {
        &[ISR_UNSAFE_CALL]
    }

    fn description(&self) -> &'static str {
        "Interrupt handlers must not call functions marked ISR-unsafe anywhere in the tree"
    }

    fn check_project(&self, ctx: &ProjectContext) -> Vec<Diagnostic> {
        let unsafe_names: BTreeSet<&str> = ctx
            .files
            .iter()
            .flat_map(|file| unsafe_functions(&file.facts))
            .collect();

        ctx.files
            .iter()
            .flat_map(|file| {
                unsafe_calls(&file.relative_path, &file.facts, &unsafe_names, |line| {
                    Location::new(file.relative_path.clone(), line, 1)
                })
            })
            .collect()
    }
}

/// Names of functions marked ISR-unsafe in one file.
fn unsafe_functions(facts: &FileFacts) -> BTreeSet<&str> {
    facts
        .functions()
        .filter(|f| f.annotations.isr == Some(IsrMark::Unsafe))
        .map(|f| f.name.as_str())
        .collect()
}

fn unsafe_calls(
    file: &Path,
    facts: &FileFacts,
    unsafe_names: &BTreeSet<&str>,
    location: impl Fn(usize) -> Location,
) -> Vec<Diagnostic> {
    facts
        .isr_calls
        .iter()
        .filter(|call| unsafe_names.contains(call.callee.as_str()))
        .map(|call| {
            tracing::debug!(
                "{}:{}: {} -> {}",
                file.display(),
                call.line,
                call.isr,
                call.callee
            );
            Diagnostic::new(
                ISR_UNSAFE_CALL,
                NAME,
                Severity::Error,
                location(call.line),
                format!(
                    "ISR '{}' calls ISR_UNSAFE function '{}'",
                    call.isr, call.callee
                ),
            )
            .with_suggestion(Suggestion::new(
                "Defer the work to task context (e.g. post to a ring buffer and process it outside the ISR)",
            ))
        })
        .collect()
}
