//! Rule forbidding mutable file-scope state.
//!
//! Any non-`const` variable declared at file scope is reported, `static` or
//! not. The hardware port directory is the single escape hatch where
//! register shadows and driver state may live.
//!
//! # Configuration
//!
//! - `escape_hatch`: directory segment exempt from the rule (default `port`)

use aegis_lint_core::{
    Diagnostic, FileContext, FileFacts, Rule, Severity, Suggestion, SymbolKind, PORT_SEGMENT,
};

/// Code for a mutable global.
pub const GLOBAL_VAR: &str = "GLOBAL_VAR";

/// Rule name for the globals check.
pub const NAME: &str = "globals";

/// Forbids mutable global variables outside the escape hatch.
#[derive(Debug, Clone)]
pub struct NoGlobals {
    /// Directory segment where globals are tolerated.
    pub escape_hatch: String,
}

impl Default for NoGlobals {
    fn default() -> Self {
        Self::new()
    }
}

impl NoGlobals {
    /// Creates a new rule exempting the `port` directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            escape_hatch: PORT_SEGMENT.to_string(),
        }
    }

    /// Sets the exempt directory segment.
    #[must_use]
    pub fn escape_hatch(mut self, segment: impl Into<String>) -> Self {
        self.escape_hatch = segment.into();
        self
    }
}

impl Rule for NoGlobals {
    fn name(&self) -> &'static str {
        NAME
    }

    fn codes(&self) -> &'static [&'static str] {
        &[GLOBAL_VAR]
    }

    fn description(&self) -> &'static str {
        "No mutable file-scope variables outside the port directory"
    }

    fn applies_to(&self, ctx: &FileContext) -> bool {
        !ctx.has_segment(&self.escape_hatch)
    }

    fn check(&self, ctx: &FileContext, facts: &FileFacts) -> Vec<Diagnostic> {
        facts
            .symbols_where(|k| matches!(k, SymbolKind::GlobalVar { is_const: false }))
            .map(|symbol| {
                Diagnostic::new(
                    GLOBAL_VAR,
                    NAME,
                    Severity::Error,
                    ctx.location(symbol.line),
                    format!("mutable global variable '{}'", symbol.name),
                )
                .with_suggestion(Suggestion::new(format!(
                    "Make it const, move the state into an owning module, or place it under '{}/'",
                    self.escape_hatch
                )))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_lint_core::{Layer, SymbolExtractor};
    use std::path::Path;

    fn check(path: &str, code: &str, rule: &NoGlobals) -> Vec<Diagnostic> {
        let ctx = FileContext::new(Path::new(path), code, Path::new(""), Layer::Domain);
        if !rule.applies_to(&ctx) {
            return Vec::new();
        }
        let facts = SymbolExtractor::default().extract(code);
        rule.check(&ctx, &facts)
    }

    #[test]
    fn mutable_static_is_flagged_const_is_not() {
        let code = "static int counter = 0;\nstatic const int LIMIT = 10;\n";
        let diagnostics = check("src/domain/domain_counter.c", code, &NoGlobals::new());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, GLOBAL_VAR);
        assert_eq!(diagnostics[0].location.line, 1);
        assert!(diagnostics[0].message.contains("counter"));
    }

    #[test]
    fn arrays_pointers_and_headers() {
        let code = "\
uint8_t buffer[64];
AegisDomainSensor *current_sensor;
extern int shared;
struct AegisDomainEntity;
typedef int AegisDomainId;
";
        let diagnostics = check("include/domain/domain_state.h", code, &NoGlobals::new());
        let names: Vec<&str> = diagnostics
            .iter()
            .map(|d| d.message.trim_start_matches("mutable global variable "))
            .collect();
        assert_eq!(names, vec!["'buffer'", "'current_sensor'"]);
    }

    #[test]
    fn function_locals_are_ignored() {
        let code = "\
void aegis_domain_step(void)
{
    static int calls = 0;
    int local;
}
";
        assert!(check("src/domain/domain_step.c", code, &NoGlobals::new()).is_empty());
    }

    #[test]
    fn escape_hatch_is_configurable() {
        let code = "volatile uint32_t tick;\n";
        assert!(check("port/stm32/port_tick.c", code, &NoGlobals::new()).is_empty());
        assert_eq!(check("src/hal/hal_tick.c", code, &NoGlobals::new()).len(), 1);

        let rule = NoGlobals::new().escape_hatch("hal");
        assert!(check("src/hal/hal_tick.c", code, &rule).is_empty());
    }
}
