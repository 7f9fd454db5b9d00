//! Rule sets for each checker.

use crate::{IsrSafety, IsrSafetyWholeProgram, Layering, Naming, NoGlobals, Traceability};
use aegis_lint_core::{Config, ProjectRuleBox, RuleBox, PORT_SEGMENT};

/// A named checker selecting which rules run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checker {
    /// Include graph and event publishing.
    Layering,
    /// Layer prefixes for functions, types and events.
    Naming,
    /// ISR-unsafe calls and missing ISR marks.
    IsrSafety,
    /// `@req` / `@design` / `@asil` tags.
    Traceability,
    /// Mutable global variables.
    Globals,
    /// Every checker.
    All,
}

impl Checker {
    /// Every checker, in report order.
    pub const ALL: [Self; 6] = [
        Self::Layering,
        Self::Naming,
        Self::IsrSafety,
        Self::Traceability,
        Self::Globals,
        Self::All,
    ];

    /// Command-line name of the checker.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Layering => "layering",
            Self::Naming => "naming",
            Self::IsrSafety => "isr-safety",
            Self::Traceability => "traceability",
            Self::Globals => "globals",
            Self::All => "all",
        }
    }

    /// Heading printed above the report.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Layering => "Layer dependency check",
            Self::Naming => "Naming convention check",
            Self::IsrSafety => "ISR safety check",
            Self::Traceability => "Traceability check",
            Self::Globals => "Global variable check",
            Self::All => "Architecture conformance check",
        }
    }

    /// Builds the rules this checker runs, honoring per-rule options.
    #[must_use]
    pub fn rule_set(self, config: &Config) -> RuleSet {
        let mut set = RuleSet::default();
        let wants = |checker: Self| self == checker || self == Self::All;

        if wants(Self::Layering) {
            set.rules.push(Box::new(Layering::new()));
        }
        if wants(Self::Naming) {
            set.rules.push(Box::new(Naming::new()));
        }
        if wants(Self::IsrSafety) {
            let whole_program = config
                .rule(crate::isr_safety::NAME)
                .is_some_and(|rc| rc.get_bool("whole_program", false));
            set.rules
                .push(Box::new(IsrSafety::new().whole_program(whole_program)));
            if whole_program {
                set.project_rules.push(Box::new(IsrSafetyWholeProgram::new()));
            }
        }
        if wants(Self::Traceability) {
            set.rules.push(Box::new(Traceability::new()));
        }
        if wants(Self::Globals) {
            let escape_hatch = config
                .rule(crate::no_globals::NAME)
                .map_or(PORT_SEGMENT, |rc| rc.get_str("escape_hatch", PORT_SEGMENT));
            set.rules
                .push(Box::new(NoGlobals::new().escape_hatch(escape_hatch)));
        }

        set
    }
}

/// Per-file and project-wide rules for one run.
#[derive(Default)]
pub struct RuleSet {
    /// Rules evaluated file by file.
    pub rules: Vec<RuleBox>,
    /// Rules evaluated once over every file.
    pub project_rules: Vec<ProjectRuleBox>,
}

impl RuleSet {
    /// Names of the rules in the set, per-file rules first.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.rules
            .iter()
            .map(|r| r.name())
            .chain(self.project_rules.iter().map(|r| r.name()))
            .collect()
    }
}

/// Returns every available per-file rule with default options.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![
        Box::new(Layering::new()),
        Box::new(Naming::new()),
        Box::new(IsrSafety::new()),
        Box::new(Traceability::new()),
        Box::new(NoGlobals::new()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_checker_selects_its_rule() {
        let config = Config::default();
        assert_eq!(Checker::Layering.rule_set(&config).names(), vec!["layering"]);
        assert_eq!(Checker::Globals.rule_set(&config).names(), vec!["globals"]);
        assert_eq!(
            Checker::All.rule_set(&config).names(),
            vec!["layering", "naming", "isr-safety", "traceability", "globals"]
        );
    }

    #[test]
    fn whole_program_adds_project_rule() {
        let config = Config::parse("[rules.isr-safety]\nwhole_program = true\n").unwrap();
        let set = Checker::IsrSafety.rule_set(&config);
        assert_eq!(set.rules.len(), 1);
        assert_eq!(set.project_rules.len(), 1);
    }

    #[test]
    fn checker_names_are_unique() {
        let mut names: Vec<&str> = Checker::ALL.iter().map(|c| c.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Checker::ALL.len());
    }
}
