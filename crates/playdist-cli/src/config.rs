//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables prefixed `PLAYDIST_`, `__` between sections
//!    (e.g. `PLAYDIST_DIST__OUTPUT_DIR=out`)
//! 3. Config file (`--config`, or the platform config directory)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use playdist_core::application::services::{DEFAULT_APPLICATION_INCLUDES, DEFAULT_EXCLUDED_ARTIFACT};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where the application and its manifest live.
    pub project: ProjectConfig,
    /// Settings shared by `deps` and `dist`.
    pub dependencies: DependenciesConfig,
    /// Distribution defaults.
    pub dist: DistConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub base_dir: PathBuf,
    /// Resolved-dependency manifest, relative to the base directory.
    pub manifest: PathBuf,
    /// Default profile id for `dist` and `modules`.
    pub profile: Option<String>,
    /// Substituted for `${play.path}` in module paths.
    pub framework_home: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependenciesConfig {
    /// Comma-separated artifact keys removed with their subtree.
    pub excluded_artifacts: String,
    /// Module name conflicts fail the run.
    pub strict: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistConfig {
    /// Relative to the base directory.
    pub output_dir: PathBuf,
    /// Archive classifier; an empty string means none.
    pub classifier: Option<String>,
    pub app_includes: String,
    pub app_excludes: String,
    pub dep_includes: String,
    pub dep_excludes: String,
    /// Create the zip archive after the staging tree.
    pub archive: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            project: ProjectConfig {
                base_dir: PathBuf::from("."),
                manifest: PathBuf::from("target/playdist/dependencies.json"),
                profile: None,
                framework_home: None,
            },
            dependencies: DependenciesConfig {
                excluded_artifacts: DEFAULT_EXCLUDED_ARTIFACT.into(),
                strict: false,
            },
            dist: DistConfig {
                output_dir: PathBuf::from("target"),
                classifier: Some("dist".into()),
                app_includes: DEFAULT_APPLICATION_INCLUDES.into(),
                app_excludes: String::new(),
                dep_includes: String::new(),
                dep_excludes: String::new(),
                archive: true,
            },
            output: OutputConfig { no_color: false },
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then the config file, then the
    /// environment.
    ///
    /// A file given explicitly via `--config` must exist; the default
    /// location is optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };
        Self::load_from(&path, required)
    }

    fn load_from(path: &Path, required: bool) -> anyhow::Result<Self> {
        let defaults = Config::try_from(&Self::default()).context("Failed to encode defaults")?;

        Config::builder()
            .add_source(defaults)
            .add_source(File::from(path).format(FileFormat::Toml).required(required))
            .add_source(
                Environment::with_prefix("PLAYDIST")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.playdist.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "playdist", "playdist")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".playdist.toml"))
    }

    /// The file `load` reads for the given `--config` value.
    pub fn active_path(config_file: Option<&PathBuf>) -> PathBuf {
        config_file.cloned().unwrap_or_else(Self::config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_exclude_the_selenium_support_artifact() {
        let cfg = AppConfig::default();
        assert!(cfg.dependencies.excluded_artifacts.contains("play-selenium-junit4"));
        assert!(cfg.dist.archive);
        assert_eq!(cfg.dist.classifier.as_deref(), Some("dist"));
    }

    #[test]
    fn missing_optional_file_yields_defaults() {
        let tmp = TempDir::new().unwrap();
        let cfg = AppConfig::load_from(&tmp.path().join("none.toml"), false).unwrap();
        assert_eq!(cfg.dist.output_dir, PathBuf::from("target"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        assert!(AppConfig::load(Some(&tmp.path().join("none.toml"))).is_err());
    }

    #[test]
    fn file_values_override_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("playdist.toml");
        std::fs::write(
            &path,
            "[dist]\nclassifier = \"linux\"\narchive = false\n\n[project]\nprofile = \"prod\"\n",
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.dist.classifier.as_deref(), Some("linux"));
        assert!(!cfg.dist.archive);
        assert_eq!(cfg.project.profile.as_deref(), Some("prod"));
        assert_eq!(cfg.dist.app_includes, DEFAULT_APPLICATION_INCLUDES);
    }

    #[test]
    fn config_path_is_absolute_or_relative() {
        let p = AppConfig::config_path();
        assert!(!p.as_os_str().is_empty());
    }
}
