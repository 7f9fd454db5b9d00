//! Configuration file lookup.
//!
//! The first existing candidate wins:
//!
//! 1. `--config` flag (trusted without checking existence)
//! 2. `{root}/aegis-lint.toml`, then `{root}/.aegis-lint.toml`
//! 3. `$AEGIS_LINT_CONFIG_DIR/config.toml`, or `~/.aegis-lint/config.toml`
//! 4. built-in defaults

use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Explicit(PathBuf),
    /// Next to the checked tree.
    Project(PathBuf),
    /// In the per-user config directory.
    Global(PathBuf),
    /// Nothing found; defaults apply.
    Default,
}

impl ConfigSource {
    /// Returns the resolved path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Returns `true` if the config comes from the per-user directory.
    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global(_))
    }
}

const PROJECT_CONFIG_NAMES: [&str; 2] = ["aegis-lint.toml", ".aegis-lint.toml"];

const GLOBAL_CONFIG_NAME: &str = "config.toml";

const CONFIG_DIR_ENV: &str = "AEGIS_LINT_CONFIG_DIR";

/// Resolves the configuration for a checked tree.
#[must_use]
pub fn resolve(root: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_in(root, explicit, global_config_dir().as_deref())
}

fn resolve_in(root: &Path, explicit: Option<&Path>, global_dir: Option<&Path>) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    let project = PROJECT_CONFIG_NAMES
        .iter()
        .map(|name| ConfigSource::Project(root.join(name)));
    let global = global_dir
        .map(|dir| ConfigSource::Global(dir.join(GLOBAL_CONFIG_NAME)))
        .into_iter();

    let found = project
        .chain(global)
        .find(|candidate| candidate.path().is_some_and(Path::is_file));
    match found {
        Some(source) => {
            if let Some(p) = source.path() {
                tracing::debug!("Found config: {}", p.display());
            }
            source
        }
        None => ConfigSource::Default,
    }
}

/// Per-user config directory: `$AEGIS_LINT_CONFIG_DIR`, else `~/.aegis-lint/`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".aegis-lint"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn explicit_wins_without_existence_check() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("aegis-lint.toml"), "").unwrap();

        let result = resolve_in(root.path(), Some(Path::new("/nonexistent.toml")), None);
        assert_eq!(
            result,
            ConfigSource::Explicit(PathBuf::from("/nonexistent.toml"))
        );
    }

    #[test]
    fn plain_name_preferred_over_dotfile() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join(".aegis-lint.toml"), "").unwrap();
        assert_eq!(
            resolve_in(root.path(), None, None),
            ConfigSource::Project(root.path().join(".aegis-lint.toml"))
        );

        fs::write(root.path().join("aegis-lint.toml"), "").unwrap();
        assert_eq!(
            resolve_in(root.path(), None, None),
            ConfigSource::Project(root.path().join("aegis-lint.toml"))
        );
    }

    #[test]
    fn global_is_the_fallback() {
        let root = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        assert_eq!(
            resolve_in(root.path(), None, Some(global.path())),
            ConfigSource::Default
        );

        fs::write(global.path().join("config.toml"), "").unwrap();
        let result = resolve_in(root.path(), None, Some(global.path()));
        assert!(result.is_global());
        assert_eq!(result.path(), Some(global.path().join("config.toml").as_path()));

        fs::write(root.path().join("aegis-lint.toml"), "").unwrap();
        assert!(matches!(
            resolve_in(root.path(), None, Some(global.path())),
            ConfigSource::Project(_)
        ));
    }

    #[test]
    fn missing_root_falls_back_to_defaults() {
        assert_eq!(
            resolve_in(Path::new("/no/such/tree"), None, None),
            ConfigSource::Default
        );
        assert!(ConfigSource::Default.path().is_none());
    }
}
