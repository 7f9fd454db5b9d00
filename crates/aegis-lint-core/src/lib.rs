//! # aegis-lint-core
//!
//! Core engine for checking the architectural conformance of a layered C
//! codebase without compiling it.
//!
//! This crate provides the building blocks the rules are written against:
//!
//! - [`LayerResolver`] classifies a source path into a [`Layer`]
//! - [`LineScanner`] strips comments and tracks brace depth and function bodies
//! - [`SymbolExtractor`] derives [`FileFacts`] (symbols, annotations, ISR calls)
//! - [`Rule`] and [`ProjectRule`] traits for per-file and whole-tree rules
//! - [`Analyzer`] for discovering files and running rules in parallel
//! - [`Diagnostic`] for representing findings
//!
//! ## Example
//!
//! ```ignore
//! use aegis_lint_core::Analyzer;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./firmware")
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! for diagnostic in &result.diagnostics {
//!     println!("{diagnostic}");
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod context;
mod extractor;
mod layer;
mod patterns;
mod rule;
mod scanner;
mod types;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{AnalyzerConfig, Config, ConfigError, MarkPrecedence, RuleConfig, ScanConfig};
pub use context::{AnalyzedFile, FileContext, ProjectContext};
pub use extractor::{
    matcher_order, Annotations, FileFacts, FunctionDecl, GlobalDecl, IsrCall, IsrMark, LineMatch,
    Symbol, SymbolExtractor, SymbolKind, TraceTags, Visibility,
};
pub use layer::{classify, header_layer, has_segment, Layer, LayerResolver, PORT_SEGMENT};
pub use patterns::{is_isr_name, CPatterns};
pub use rule::{ProjectRule, ProjectRuleBox, Rule, RuleBox};
pub use scanner::{
    strip_comments, FunctionKind, FunctionSpan, LineScanner, ScannedFile, ScannedLine,
    ScopeContext,
};
pub use types::{Diagnostic, DiagnosticReport, LintResult, Location, Severity, Suggestion};
