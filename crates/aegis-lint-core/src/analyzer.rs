//! Core analyzer for orchestrating conformance checks.

use crate::config::Config;
use crate::context::{AnalyzedFile, FileContext, ProjectContext};
use crate::extractor::SymbolExtractor;
use crate::layer::LayerResolver;
use crate::rule::{ProjectRule, ProjectRuleBox, Rule, RuleBox};
use crate::types::{Diagnostic, LintResult};

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Directory segment that is never analyzed.
const BUILD_SEGMENT: &str = "build";

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error resolving paths.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The root to analyze is missing or not a directory.
    #[error("Directory does not exist: {}", .0.display())]
    RootNotFound(PathBuf),

    /// Error walking the source tree.
    #[error("Failed to walk source tree: {0}")]
    Walk(#[from] ignore::Error),

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Worker pool could not be created.
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    project_rules: Vec<ProjectRuleBox>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a per-file rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed per-file rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds a project-wide rule to the analyzer.
    #[must_use]
    pub fn project_rule<R: ProjectRule + 'static>(mut self, rule: R) -> Self {
        self.project_rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed project-wide rule to the analyzer.
    #[must_use]
    pub fn project_rule_box(mut self, rule: ProjectRuleBox) -> Self {
        self.project_rules.push(rule);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory doesn't exist or an exclude
    /// pattern is not a valid glob.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let root = self.root.unwrap_or_else(|| PathBuf::from("."));
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        if !root.is_dir() {
            return Err(AnalyzerError::RootNotFound(root));
        }

        let config = self.config.unwrap_or_default();

        // Merge exclude patterns from config
        let mut exclude_patterns = self.exclude_patterns;
        exclude_patterns.extend(config.analyzer.exclude.iter().cloned());
        let exclude_globs = exclude_patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Analyzer {
            root,
            rules: self.rules,
            project_rules: self.project_rules,
            exclude_patterns,
            exclude_globs,
            extractor: SymbolExtractor::new(config.scan.clone()),
            resolver: LayerResolver::new(),
            config,
        })
    }
}

/// The main analyzer that orchestrates rule execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    rules: Vec<RuleBox>,
    project_rules: Vec<ProjectRuleBox>,
    exclude_patterns: Vec<String>,
    exclude_globs: Vec<glob::Pattern>,
    extractor: SymbolExtractor,
    resolver: LayerResolver,
    config: Config,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len() + self.project_rules.len()
    }

    /// Analyzes all files and returns the results.
    ///
    /// Files are processed in parallel; diagnostics are merged and sorted
    /// by (file, line, column) once every file is done.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery fails or the worker pool cannot
    /// be started. Unreadable files are skipped, not reported.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);

        let files = self.discover_files()?;
        info!("Found {} files to analyze", files.len());

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.analyzer.parallelism.unwrap_or(0))
            .build()?;
        let outcomes: Vec<Option<(Vec<Diagnostic>, AnalyzedFile)>> = pool.install(|| {
            files
                .par_iter()
                .map(|path| self.analyze_file(path))
                .collect()
        });

        let mut result = LintResult::new();
        let mut analyzed = Vec::with_capacity(outcomes.len());
        for (diagnostics, file) in outcomes.into_iter().flatten() {
            result.diagnostics.extend(diagnostics);
            result.files_checked += 1;
            analyzed.push(file);
        }

        // Run project-wide rules
        let project_ctx = ProjectContext::new(&self.root, &analyzed);
        for rule in &self.project_rules {
            if !self.config.is_rule_enabled(rule.name()) {
                debug!("Skipping disabled rule: {}", rule.name());
                continue;
            }

            let diagnostics = rule.check_project(&project_ctx);
            let diagnostics = self.apply_severity_override(rule.name(), diagnostics);
            result.diagnostics.extend(diagnostics);
        }

        result.sort();

        info!(
            "Analysis complete: {} diagnostics in {} files",
            result.diagnostics.len(),
            result.files_checked
        );

        Ok(result)
    }

    /// Analyzes a single file. Returns `None` for unreadable or
    /// unclassified files.
    fn analyze_file(&self, path: &Path) -> Option<(Vec<Diagnostic>, AnalyzedFile)> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                return None;
            }
        };
        let content = String::from_utf8_lossy(&bytes);

        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let layer = self.resolver.classify(relative);
        if !layer.is_classified() {
            debug!("Skipping unclassified file: {}", relative.display());
            return None;
        }
        debug!("Analyzing: {} ({})", relative.display(), layer);

        let ctx = FileContext::new(path, &content, &self.root, layer);
        let facts = self.extractor.extract(&content);
        let mut diagnostics = Vec::new();

        for rule in &self.rules {
            if !self.config.is_rule_enabled(rule.name()) || !rule.applies_to(&ctx) {
                continue;
            }

            let rule_diagnostics = rule.check(&ctx, &facts);
            let rule_diagnostics = self.apply_severity_override(rule.name(), rule_diagnostics);
            diagnostics.extend(rule_diagnostics);
        }

        let file = AnalyzedFile {
            relative_path: ctx.relative_path.clone(),
            facts,
        };
        Some((diagnostics, file))
    }

    /// Applies severity overrides from configuration.
    fn apply_severity_override(
        &self,
        rule_name: &str,
        mut diagnostics: Vec<Diagnostic>,
    ) -> Vec<Diagnostic> {
        if let Some(severity) = self.config.rule_severity(rule_name) {
            for d in &mut diagnostics {
                d.severity = severity;
            }
        }
        diagnostics
    }

    /// Discovers all `.c` and `.h` files to analyze, sorted by path.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let mut builder = ignore::WalkBuilder::new(&self.root);
        builder
            .hidden(false)
            .git_ignore(self.config.analyzer.respect_gitignore);

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }
            if !matches!(path.extension().and_then(|e| e.to_str()), Some("c" | "h")) {
                continue;
            }
            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        if crate::layer::has_segment(relative, BUILD_SEGMENT) {
            return true;
        }

        let rel_str = relative.to_string_lossy();
        if self.exclude_globs.iter().any(|g| g.matches(&rel_str)) {
            return true;
        }

        // Also check as substring for patterns like "**/third_party/**"
        self.exclude_patterns.iter().any(|pattern| {
            let clean = pattern.replace("**/", "").replace("/**", "");
            !clean.is_empty() && !clean.contains('*') && rel_str.contains(&clean)
        })
    }
}
