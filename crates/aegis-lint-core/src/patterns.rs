//! Compiled line patterns for the heuristic C scanner.
//!
//! Every heuristic lives in its own regex so it can be replaced
//! independently. All patterns run against comment-stripped code except the
//! annotation patterns, which run against raw lines.

use regex::Regex;

/// Return types a function definition may start with.
const RETURN_TYPES: &str = r"void|char|short|int|long|float|double|bool|size_t|u?int(?:8|16|32|64)_t|bool_t|ErrorCode|EntityId|[A-Z][A-Za-z0-9_]*";

/// C keywords that look like calls (`if (`, `sizeof (`).
pub const CALL_KEYWORDS: &[&str] = &[
    "if", "while", "for", "switch", "return", "sizeof", "do", "else", "case", "defined",
];

/// The set of compiled patterns shared by the scanner and the extractor.
pub struct CPatterns {
    /// `#include "header.h"`; group 1 is the path.
    pub include: Regex,
    /// Single-line `typedef struct|enum|union [Tag] [{...}] Name;`.
    pub typedef_aggregate: Regex,
    /// `typedef lowercase_type Name;`.
    pub typedef_simple: Regex,
    /// `typedef R (*Name)(...);`.
    pub typedef_fn_pointer: Regex,
    /// Opening line of a multi-line `typedef struct {`.
    pub typedef_open: Regex,
    /// Closing line `} Name;` of a multi-line typedef.
    pub typedef_close: Regex,
    /// Function header: `static`, `ret`, `name` groups.
    pub function: Regex,
    /// `DOMAIN_EVENT_*` enumerator assignment; group 1 is the enumerator.
    pub event_type: Regex,
    /// File-scope variable statement: `head` and `name` groups.
    pub global_var: Regex,
    /// `extern "C" {` linkage block opener.
    pub extern_c_block: Regex,
    /// Call of the domain event publish function.
    pub publish_call: Regex,
    /// Call-like token; group 1 is the callee.
    pub call: Regex,
    /// ISR-safe marker.
    pub isr_safe: Regex,
    /// ISR-unsafe marker.
    pub isr_unsafe: Regex,
    /// Traceability tag; group 1 is `req`, `design` or `asil`.
    pub trace_tag: Regex,
}

impl Default for CPatterns {
    fn default() -> Self {
        Self::new()
    }
}

impl CPatterns {
    /// Compiles all patterns.
    #[must_use]
    #[allow(clippy::expect_used)] // patterns are constants
    pub fn new() -> Self {
        Self {
            include: Regex::new(r#"^\s*#\s*include\s+"([^"]+)""#).expect("Invalid regex"),
            typedef_aggregate: Regex::new(
                r"^\s*typedef\s+(?:struct|enum|union)\s+(?:[A-Za-z_][A-Za-z0-9_]*\s*)?(?:\{[^}]*\}\s*)?([A-Z][A-Za-z0-9_]*)\s*;",
            )
            .expect("Invalid regex"),
            typedef_simple: Regex::new(
                r"^\s*typedef\s+(?:(?:const|unsigned|signed|volatile)\s+)*[a-z_][a-z0-9_]*\s*\**\s*([A-Z][A-Za-z0-9_]*)\s*;",
            )
            .expect("Invalid regex"),
            typedef_fn_pointer: Regex::new(
                r"^\s*typedef\s+[^(;]*\(\s*\*\s*([A-Z][A-Za-z0-9_]*)\s*\)\s*\(",
            )
            .expect("Invalid regex"),
            typedef_open: Regex::new(
                r"^\s*typedef\s+(?:struct|enum|union)\b[^;{}]*\{[^}]*$",
            )
            .expect("Invalid regex"),
            typedef_close: Regex::new(r"^\s*\}\s*([A-Za-z_][A-Za-z0-9_]*)\s*;")
                .expect("Invalid regex"),
            function: Regex::new(&format!(
                r"^\s*(?P<static>static\s+)?(?:inline\s+)?(?:const\s+)?(?:unsigned\s+)?(?:signed\s+)?(?:(?:struct|enum|union)\s+)?(?P<ret>{RETURN_TYPES})(?:\s*\*+\s*|\s+)(?P<name>[A-Za-z_][A-Za-z0-9_]*)\s*\("
            ))
            .expect("Invalid regex"),
            event_type: Regex::new(r"^\s*(DOMAIN_EVENT_[A-Z0-9_]+)\s*=(?:[^=]|$)")
                .expect("Invalid regex"),
            global_var: Regex::new(
                r"^(?P<head>[A-Za-z_][\w\s\*]*?)[\s\*]+(?P<name>[A-Za-z_]\w*)\s*(?:\[[^\]]*\]\s*)*(?:=[^;]*)?;$",
            )
            .expect("Invalid regex"),
            extern_c_block: Regex::new(r#"\bextern\s*"C"\s*\{"#).expect("Invalid regex"),
            publish_call: Regex::new(r"\baegis_domain_event_publish\s*\(").expect("Invalid regex"),
            call: Regex::new(r"\b([A-Za-z_][A-Za-z0-9_]*)\s*\(").expect("Invalid regex"),
            isr_safe: Regex::new(r"@isr_safe\b|\bISR_SAFE\b").expect("Invalid regex"),
            isr_unsafe: Regex::new(r"@isr_unsafe\b|\bISR_UNSAFE\b").expect("Invalid regex"),
            trace_tag: Regex::new(r"@(req|design|asil)[:\s]").expect("Invalid regex"),
        }
    }
}

/// Heuristic: a function whose name mentions interrupt handling runs in
/// interrupt context.
#[must_use]
pub fn is_isr_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    ["isr", "irq", "handler", "interrupt"]
        .iter()
        .any(|needle| lower.contains(needle))
}
