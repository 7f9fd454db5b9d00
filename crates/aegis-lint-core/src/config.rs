//! Configuration types for aegis-lint.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Top-level configuration for aegis-lint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Line scanner and extractor tuning.
    #[serde(default)]
    pub scan: ScanConfig,

    /// Per-rule configurations.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Checks if a rule is enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_name: &str) -> bool {
        self.rules
            .get(rule_name)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the severity override for a rule.
    #[must_use]
    pub fn rule_severity(&self, rule_name: &str) -> Option<crate::Severity> {
        self.rules.get(rule_name).and_then(|c| c.severity)
    }

    /// Gets the configuration of a rule, if any was given.
    #[must_use]
    pub fn rule(&self, rule_name: &str) -> Option<&RuleConfig> {
        self.rules.get(rule_name)
    }
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Glob patterns to exclude from analysis.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Whether to respect .gitignore files.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,

    /// Maximum number of parallel file analyses (default: CPU count).
    #[serde(default)]
    pub parallelism: Option<usize>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            respect_gitignore: true,
            parallelism: None,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Which ISR marker wins when both appear in one lookback window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkPrecedence {
    /// The marker farthest from the declaration (first when reading down).
    #[default]
    Farthest,
    /// The marker closest to the declaration.
    Nearest,
}

/// Lookback windows and marker policy for the symbol extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Lines searched above a function for ISR markers.
    pub isr_lookback: usize,
    /// Lines searched above a function for traceability tags.
    pub trace_lookback: usize,
    /// Lines at the top of a file that form its header comment.
    pub header_lines: usize,
    /// Tie-break between `@isr_safe` and `@isr_unsafe`.
    pub isr_mark_precedence: MarkPrecedence,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            isr_lookback: 10,
            trace_lookback: 15,
            header_lines: 20,
            isr_mark_precedence: MarkPrecedence::Farthest,
        }
    }
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this rule.
    #[serde(default)]
    pub severity: Option<crate::Severity>,

    /// Rule-specific options as key-value pairs.
    #[serde(flatten)]
    pub options: HashMap<String, toml::Value>,
}

impl RuleConfig {
    /// Gets a boolean option with a default value.
    #[must_use]
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.options
            .get(key)
            .and_then(toml::Value::as_bool)
            .unwrap_or(default)
    }

    /// Gets a string option with a default value.
    #[must_use]
    pub fn get_str<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.options
            .get(key)
            .and_then(|v| v.as_str())
            .unwrap_or(default)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.analyzer.respect_gitignore);
        assert!(config.rules.is_empty());
        assert_eq!(config.scan.isr_lookback, 10);
        assert_eq!(config.scan.trace_lookback, 15);
        assert_eq!(config.scan.header_lines, 20);
        assert_eq!(config.scan.isr_mark_precedence, MarkPrecedence::Farthest);
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[analyzer]
exclude = ["**/third_party/**"]
parallelism = 2

[scan]
isr_lookback = 4
isr_mark_precedence = "nearest"

[rules.isr-safety]
severity = "warning"
whole_program = true

[rules.globals]
enabled = false
"#;

        let config = Config::parse(toml).expect("Failed to parse");
        assert_eq!(config.analyzer.exclude, vec!["**/third_party/**"]);
        assert_eq!(config.analyzer.parallelism, Some(2));
        assert_eq!(config.scan.isr_lookback, 4);
        assert_eq!(config.scan.trace_lookback, 15);
        assert_eq!(config.scan.isr_mark_precedence, MarkPrecedence::Nearest);

        assert!(config.is_rule_enabled("isr-safety"));
        assert!(!config.is_rule_enabled("globals"));
        assert!(config.is_rule_enabled("naming"));
        assert_eq!(
            config.rule_severity("isr-safety"),
            Some(crate::Severity::Warning)
        );

        let rule_config = config.rule("isr-safety").unwrap();
        assert!(rule_config.get_bool("whole_program", false));
        assert_eq!(rule_config.get_str("escape_hatch", "port"), "port");
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = Config::parse("[scan]\nisr_lookback = \"ten\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
