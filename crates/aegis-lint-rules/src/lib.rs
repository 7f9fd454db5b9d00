//! # aegis-lint-rules
//!
//! Built-in conformance rules for aegis-lint.
//!
//! Each rule is a pure function of one file's layer and extracted facts,
//! except [`IsrSafetyWholeProgram`], which looks at every analyzed file.
//!
//! ## Available Rules
//!
//! | Name | Codes | Description |
//! |------|-------|-------------|
//! | `layering` | `LAYER_VIOLATION`, `EVENT_PUBLISH_VIOLATION` | Includes follow the layer graph; only the domain publishes events |
//! | `naming` | `NAMING_ERROR`, `NAMING_WARNING`, `EVENT_NAMING_ERROR`, `EVENT_HANDLER_WARNING` | Layer prefixes for functions, types and events |
//! | `isr-safety` | `ISR_UNSAFE_CALL`, `ISR_UNMARKED` | ISRs never call functions marked unsafe |
//! | `traceability` | `FUNC_TRACE_MISSING`, `FILE_TRACE_MISSING` | `@req`, `@design` and `@asil` tags |
//! | `globals` | `GLOBAL_VAR` | No mutable file-scope variables outside `port/` |
//!
//! ## Usage
//!
//! ```ignore
//! use aegis_lint_core::Analyzer;
//! use aegis_lint_rules::{Layering, Naming};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./firmware")
//!     .rule(Layering::new())
//!     .rule(Naming::new())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod isr_safety;
pub mod layering;
pub mod naming;
pub mod no_globals;
mod presets;
pub mod traceability;

pub use isr_safety::{IsrSafety, IsrSafetyWholeProgram};
pub use layering::Layering;
pub use naming::Naming;
pub use no_globals::NoGlobals;
pub use presets::{all_rules, Checker, RuleSet};
pub use traceability::Traceability;

/// Re-export core types for convenience.
pub use aegis_lint_core::{Diagnostic, Rule, Severity};
