//! Rule enforcing the allowed include graph between layers.
//!
//! # Rationale
//!
//! Each layer may only depend on the layers below it. Includes are the only
//! dependency edges visible without compiling, so the rule infers the layer
//! of every quoted `#include` from the header's file name and checks the
//! edge against the allow-list:
//!
//! | from | may include |
//! |------|-------------|
//! | infrastructure | domain, common |
//! | domain | common |
//! | application | domain, common |
//! | entry | application, domain, common |
//! | common | - |
//!
//! Domain events may only be published from the domain layer; a call to
//! `aegis_domain_event_publish` anywhere else is reported as well.

use aegis_lint_core::{
    header_layer, Diagnostic, FileContext, FileFacts, Layer, Rule, Severity, Suggestion,
    SymbolKind,
};

/// Code for a forbidden include.
pub const LAYER_VIOLATION: &str = "LAYER_VIOLATION";

/// Code for publishing a domain event outside the domain layer.
pub const EVENT_PUBLISH_VIOLATION: &str = "EVENT_PUBLISH_VIOLATION";

/// Rule name for layering.
pub const NAME: &str = "layering";

/// Checks include edges and event publishing against the layer graph.
#[derive(Debug, Clone, Default)]
pub struct Layering;

impl Layering {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for Layering {
    fn name(&self) -> &'static str {
        NAME
    }

    fn codes(&self) -> &'static [&'static str] {
        &[LAYER_VIOLATION, EVENT_PUBLISH_VIOLATION]
    }

    fn description(&self) -> &'static str {
        "Includes must follow the layer dependency graph; only the domain publishes events"
    }

    fn check(&self, ctx: &FileContext, facts: &FileFacts) -> Vec<Diagnostic> {
        let from = ctx.layer;
        let mut diagnostics = Vec::new();

        for include in facts.symbols_where(|k| *k == SymbolKind::Include) {
            let Some(to) = header_layer(&include.name) else {
                continue;
            };
            if from.can_depend_on(to) {
                continue;
            }
            diagnostics.push(
                Diagnostic::new(
                    LAYER_VIOLATION,
                    NAME,
                    Severity::Error,
                    ctx.location(include.line),
                    format!(
                        "{from} layer must not depend on {to} layer (includes '{}')",
                        include.name
                    ),
                )
                .with_suggestion(Suggestion::new(allowed_help(from))),
            );
        }

        if from != Layer::Domain {
            for &line in &facts.publish_calls {
                diagnostics.push(
                    Diagnostic::new(
                        EVENT_PUBLISH_VIOLATION,
                        NAME,
                        Severity::Error,
                        ctx.location(line),
                        format!(
                            "aegis_domain_event_publish() may only be called from the domain layer, not {from}"
                        ),
                    )
                    .with_suggestion(Suggestion::new(
                        "Raise the event from a domain service and let the domain publish it",
                    )),
                );
            }
        }

        diagnostics
    }
}

fn allowed_help(layer: Layer) -> String {
    let allowed = layer.allowed_dependencies();
    if allowed.is_empty() {
        format!("The {layer} layer may not depend on any other layer")
    } else {
        let names: Vec<&str> = allowed.iter().map(|l| l.name()).collect();
        format!("The {layer} layer may depend on: {}", names.join(", "))
    }
}
