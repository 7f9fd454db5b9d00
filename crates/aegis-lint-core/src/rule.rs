//! Rule traits for defining conformance rules.

use crate::context::{FileContext, ProjectContext};
use crate::extractor::FileFacts;
use crate::types::Diagnostic;

/// A per-file rule evaluated over extracted facts.
///
/// Rules are pure: they read the file context and facts and return their
/// diagnostics. The analyzer may run them for many files concurrently.
///
/// # Example
///
/// ```ignore
/// use aegis_lint_core::{Diagnostic, FileContext, FileFacts, Rule, Severity};
///
/// pub struct NoIncludes;
///
/// impl Rule for NoIncludes {
///     fn name(&self) -> &'static str { "no-includes" }
///     fn codes(&self) -> &'static [&'static str] { &["INCLUDE"] }
///
///     fn check(&self, ctx: &FileContext, facts: &FileFacts) -> Vec<Diagnostic> {
///         facts
///             .symbols_where(|k| *k == SymbolKind::Include)
///             .map(|s| Diagnostic::new("INCLUDE", self.name(), Severity::Warning,
///                 ctx.location(s.line), format!("includes {}", s.name)))
///             .collect()
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "layering").
    fn name(&self) -> &'static str;

    /// Returns the diagnostic codes this rule can emit.
    fn codes(&self) -> &'static [&'static str];

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Whether the rule looks at this file at all.
    fn applies_to(&self, _ctx: &FileContext) -> bool {
        true
    }

    /// Checks a single file and returns any diagnostics found.
    fn check(&self, ctx: &FileContext, facts: &FileFacts) -> Vec<Diagnostic>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

/// A rule evaluated once over the facts of every analyzed file.
pub trait ProjectRule: Send + Sync {
    /// Returns the kebab-case name of this rule.
    fn name(&self) -> &'static str;

    /// Returns the diagnostic codes this rule can emit.
    fn codes(&self) -> &'static [&'static str];

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Checks the whole project and returns any diagnostics found.
    fn check_project(&self, ctx: &ProjectContext) -> Vec<Diagnostic>;
}

/// Type alias for boxed `ProjectRule` trait objects.
pub type ProjectRuleBox = Box<dyn ProjectRule>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::Layer;
    use crate::types::Severity;
    use std::path::Path;

    struct TestRule;

    impl Rule for TestRule {
        fn name(&self) -> &'static str {
            "test-rule"
        }
        fn codes(&self) -> &'static [&'static str] {
            &["TEST_CODE"]
        }
        fn description(&self) -> &'static str {
            "A test rule"
        }
        fn applies_to(&self, ctx: &FileContext) -> bool {
            ctx.is_header
        }

        fn check(&self, ctx: &FileContext, facts: &FileFacts) -> Vec<Diagnostic> {
            vec![Diagnostic::new(
                "TEST_CODE",
                self.name(),
                Severity::Warning,
                ctx.location(1),
                format!("{} lines", facts.line_count),
            )]
        }
    }

    #[test]
    fn test_rule_trait() {
        let rule = TestRule;
        assert_eq!(rule.name(), "test-rule");
        assert_eq!(rule.codes(), &["TEST_CODE"]);

        let header = FileContext::new(
            Path::new("include/domain/x.h"),
            "int a;\n",
            Path::new(""),
            Layer::Domain,
        );
        let source = FileContext::new(
            Path::new("src/domain/x.c"),
            "",
            Path::new(""),
            Layer::Domain,
        );
        assert!(rule.applies_to(&header));
        assert!(!rule.applies_to(&source));

        let facts = FileFacts {
            line_count: 1,
            ..FileFacts::default()
        };
        let diagnostics = rule.check(&header, &facts);
        assert_eq!(diagnostics[0].message, "1 lines");
    }
}
