//! Rule enforcing per-layer identifier prefixes.
//!
//! Public functions must carry their layer's function prefix (error). Type
//! names should carry the layer's type prefix (warning). `DOMAIN_EVENT_*`
//! enumerators must live in the domain layer, and event handlers should be
//! named `on_<event>`.
//!
//! `static` functions have internal linkage and are exempt from the prefix
//! requirement.

use aegis_lint_core::{
    Diagnostic, FileContext, FileFacts, Layer, Rule, Severity, Suggestion, Symbol, SymbolKind,
};

/// Code for a public function without its layer prefix.
pub const NAMING_ERROR: &str = "NAMING_ERROR";

/// Code for a type without its layer prefix.
pub const NAMING_WARNING: &str = "NAMING_WARNING";

/// Code for an event enumerator defined outside the domain layer.
pub const EVENT_NAMING_ERROR: &str = "EVENT_NAMING_ERROR";

/// Code for an event handler not named `on_*`.
pub const EVENT_HANDLER_WARNING: &str = "EVENT_HANDLER_WARNING";

/// Rule name for naming.
pub const NAME: &str = "naming";

/// Recommended prefix of event handlers.
pub const HANDLER_PREFIX: &str = "on_";

/// Accepted function prefixes of a layer.
#[must_use]
pub const fn function_prefixes(layer: Layer) -> &'static [&'static str] {
    match layer {
        Layer::Infrastructure => &["aegis_infrastructure_", "aegis_hal_", "aegis_entry_platform_"],
        Layer::Domain => &["aegis_domain_"],
        Layer::Application => &[
            "aegis_app_cmd_",
            "aegis_app_query_",
            "aegis_app_init_",
            "aegis_app_asm_",
            "aegis_app_conv_",
            "aegis_app_dto_",
            "aegis_app_",
        ],
        Layer::Entry => &["aegis_entry_"],
        Layer::Common => &[
            "aegis_mem_pool_",
            "aegis_ring_buffer_",
            "aegis_trace_",
            "aegis_error_code_",
            "aegis_critical_",
        ],
        Layer::Unclassified => &[],
    }
}

/// Accepted type-name prefixes of a layer.
#[must_use]
pub const fn type_prefixes(layer: Layer) -> &'static [&'static str] {
    match layer {
        Layer::Infrastructure => &["AegisInfrastructure", "AegisHal", "HAL_"],
        Layer::Domain => &["AegisDomain", "AegisEntity", "AegisEvent"],
        Layer::Application => &[
            "AegisAppCmd",
            "AegisAppQuery",
            "AegisCommand",
            "AegisQuery",
            "AegisApp",
            "AegisDto",
        ],
        Layer::Entry => &["AegisEntry"],
        Layer::Common => &[
            "AegisMemPool",
            "AegisRingBuffer",
            "AegisTrace",
            "AegisErrorCode",
            "AegisError",
        ],
        Layer::Unclassified => &[],
    }
}

/// Checks identifier prefixes against the file's layer.
#[derive(Debug, Clone, Default)]
pub struct Naming;

impl Naming {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn check_function(ctx: &FileContext, symbol: &Symbol) -> Option<Diagnostic> {
        if symbol.is_static_function() {
            return None;
        }
        let prefixes = function_prefixes(ctx.layer);
        if has_prefix(&symbol.name, prefixes) {
            return None;
        }
        Some(
            Diagnostic::new(
                NAMING_ERROR,
                NAME,
                Severity::Error,
                ctx.location(symbol.line),
                format!(
                    "function '{}' lacks the {} layer prefix ({})",
                    symbol.name,
                    ctx.layer,
                    prefixes.join(", ")
                ),
            )
            .with_suggestion(Suggestion::new(format!(
                "Rename to {}{}, or make it static if it is file-local",
                prefixes.first().copied().unwrap_or_default(),
                symbol.name.to_ascii_lowercase()
            ))),
        )
    }

    fn check_type(ctx: &FileContext, symbol: &Symbol) -> Option<Diagnostic> {
        let prefixes = type_prefixes(ctx.layer);
        if has_prefix(&symbol.name, prefixes) {
            return None;
        }
        Some(Diagnostic::new(
            NAMING_WARNING,
            NAME,
            Severity::Warning,
            ctx.location(symbol.line),
            format!(
                "type '{}' should use the {} layer prefix ({})",
                symbol.name,
                ctx.layer,
                prefixes.join(", ")
            ),
        ))
    }

    fn check_event_type(ctx: &FileContext, symbol: &Symbol) -> Option<Diagnostic> {
        if ctx.layer == Layer::Domain {
            return None;
        }
        Some(Diagnostic::new(
            EVENT_NAMING_ERROR,
            NAME,
            Severity::Error,
            ctx.location(symbol.line),
            format!(
                "event type '{}' may only be defined in the domain layer",
                symbol.name
            ),
        ))
    }

    fn check_event_handler(ctx: &FileContext, symbol: &Symbol) -> Option<Diagnostic> {
        if symbol.name.starts_with(HANDLER_PREFIX) {
            return None;
        }
        Some(Diagnostic::new(
            EVENT_HANDLER_WARNING,
            NAME,
            Severity::Warning,
            ctx.location(symbol.line),
            format!(
                "event handler '{}' should start with '{HANDLER_PREFIX}' (e.g. on_sensor_created)",
                symbol.name
            ),
        ))
    }
}

impl Rule for Naming {
    fn name(&self) -> &'static str {
        NAME
    }

    fn codes(&self) -> &'static [&'static str] {
        &[
            NAMING_ERROR,
            NAMING_WARNING,
            EVENT_NAMING_ERROR,
            EVENT_HANDLER_WARNING,
        ]
    }

    fn description(&self) -> &'static str {
        "Functions, types and domain events carry their layer's naming prefix"
    }

    fn check(&self, ctx: &FileContext, facts: &FileFacts) -> Vec<Diagnostic> {
        facts
            .symbols
            .iter()
            .filter_map(|symbol| match symbol.kind {
                SymbolKind::Function { .. } => Self::check_function(ctx, symbol),
                SymbolKind::Type => Self::check_type(ctx, symbol),
                SymbolKind::EventType => Self::check_event_type(ctx, symbol),
                SymbolKind::EventHandler => Self::check_event_handler(ctx, symbol),
                SymbolKind::GlobalVar { .. } | SymbolKind::Include => None,
            })
            .collect()
    }
}

fn has_prefix(name: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|p| name.starts_with(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_lint_core::SymbolExtractor;
    use std::path::Path;

    fn check(layer: Layer, code: &str) -> Vec<Diagnostic> {
        let ctx = FileContext::new(Path::new("src/x/file.c"), code, Path::new(""), layer);
        let facts = SymbolExtractor::default().extract(code);
        Naming::new().check(&ctx, &facts)
    }

    fn codes(diagnostics: &[Diagnostic]) -> Vec<&str> {
        diagnostics.iter().map(|d| d.code.as_str()).collect()
    }

    #[test]
    fn unprefixed_public_function_is_an_error() {
        let diagnostics = check(Layer::Domain, "void setValue(int v) {\n}\n");
        assert_eq!(codes(&diagnostics), vec![NAMING_ERROR]);
        assert_eq!(diagnostics[0].location.line, 1);
        assert!(diagnostics[0].message.contains("setValue"));
    }

    #[test]
    fn functions_after_an_unbalanced_body_are_still_checked() {
        let code = "\
static void helper(int a)
{
#if FAST
    if (a) {
#else
    if (!a) {
#endif
        a++;
    }
}
void setValue(int v) {
}
";
        let diagnostics = check(Layer::Domain, code);
        assert_eq!(codes(&diagnostics), vec![NAMING_ERROR]);
        assert_eq!(diagnostics[0].location.line, 11);
        assert!(diagnostics[0].message.contains("setValue"));
    }

    #[test]
    fn static_function_is_exempt() {
        let diagnostics = check(Layer::Domain, "static void setValue(int v) {\n}\n");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn layer_prefixes_are_accepted() {
        let diagnostics = check(
            Layer::Application,
            "ErrorCode aegis_app_cmd_start(void);\nvoid aegis_app_tick(void);\n",
        );
        assert!(diagnostics.is_empty());

        let diagnostics = check(
            Layer::Infrastructure,
            "void aegis_hal_gpio_init(void);\nvoid aegis_entry_platform_boot(void);\n",
        );
        assert!(diagnostics.is_empty());

        // A domain prefix is not an application prefix.
        let diagnostics = check(Layer::Application, "void aegis_domain_leak(void);\n");
        assert_eq!(codes(&diagnostics), vec![NAMING_ERROR]);
    }

    #[test]
    fn unprefixed_type_is_a_warning() {
        let diagnostics = check(
            Layer::Domain,
            "typedef struct { int v; } AegisDomainSensor;\ntypedef uint8_t SensorId;\n",
        );
        assert_eq!(codes(&diagnostics), vec![NAMING_WARNING]);
        assert_eq!(diagnostics[0].severity, Severity::Warning);
        assert_eq!(diagnostics[0].location.line, 2);
    }

    #[test]
    fn event_types_belong_to_the_domain() {
        let code = "typedef enum {\n    DOMAIN_EVENT_SENSOR_READ = 1,\n    DOMAIN_EVENT_SENSOR_LOST = 2,\n} AegisEventType;\n";
        assert!(check(Layer::Domain, code).is_empty());

        let diagnostics = check(Layer::Application, code);
        let event_errors: Vec<&Diagnostic> = diagnostics
            .iter()
            .filter(|d| d.code == EVENT_NAMING_ERROR)
            .collect();
        assert_eq!(event_errors.len(), 2);
        assert_eq!(event_errors[0].location.line, 2);
        assert!(event_errors[0]
            .message
            .contains("may only be defined in the domain layer"));
    }

    #[test]
    fn other_event_like_enumerators_are_ordinary() {
        let trace_ids = "typedef enum {\n    TRACE_EVENT_SYSTEM_INIT = 0,\n    TRACE_EVENT_ISR_ENTER = 1,\n} AegisTraceEventId;\n";
        assert!(check(Layer::Common, trace_ids).is_empty());

        let results = "typedef enum {\n    EVENT_HANDLER_OK = 0,\n    EVENT_HANDLER_RETRY = 1,\n} AegisEventHandlerResult;\n";
        assert!(check(Layer::Domain, results).is_empty());
    }

    #[test]
    fn messages_name_the_layer() {
        let diagnostics = check(Layer::Infrastructure, "void uart_send(void);
typedef int UartPort;
");
        assert_eq!(codes(&diagnostics), vec![NAMING_ERROR, NAMING_WARNING]);
        assert!(diagnostics[0].message.contains("lacks the infrastructure layer prefix"));
        assert!(diagnostics[1].message.contains("should use the infrastructure layer prefix"));
    }

    #[test]
    fn event_handlers_should_start_with_on() {
        let code = "\
EventHandlerResult aegis_domain_handle_alarm(const AegisEvent *e);
EventHandlerResult aegis_domain_on_alarm(const AegisEvent *e);
static EventHandlerResult on_alarm(const AegisEvent *e);
";
        let diagnostics = check(Layer::Domain, code);
        let handler_warnings: Vec<usize> = diagnostics
            .iter()
            .filter(|d| d.code == EVENT_HANDLER_WARNING)
            .map(|d| d.location.line)
            .collect();
        assert_eq!(handler_warnings, vec![1, 2]);
        assert_eq!(diagnostics.iter().filter(|d| d.code == NAMING_ERROR).count(), 0);
    }
}
