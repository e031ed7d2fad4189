//! Command handlers. Each translates arguments into a core call and
//! renders the result; no business logic lives here.

use std::path::PathBuf;

use tracing::debug;

use playdist_adapters::{ResolvedManifest, load_manifest};
use playdist_core::{domain::ArtifactKey, error::PlaydistError};

use crate::{
    cli::ProjectArgs,
    config::AppConfig,
    error::{CliError, CliResult},
};

pub mod completions;
pub mod config;
pub mod deps;
pub mod dist;
pub mod init;
pub mod modules;

/// Application root and manifest path after applying flags over config.
pub(crate) fn project_paths(args: &ProjectArgs, config: &AppConfig) -> (PathBuf, PathBuf) {
    let base_dir = args
        .base_dir
        .clone()
        .unwrap_or_else(|| config.project.base_dir.clone());
    let manifest = args
        .manifest
        .clone()
        .unwrap_or_else(|| base_dir.join(&config.project.manifest));
    (base_dir, manifest)
}

pub(crate) fn load_resolved(manifest: PathBuf) -> CliResult<ResolvedManifest> {
    if !manifest.is_file() {
        return Err(CliError::ManifestNotFound { path: manifest });
    }
    let loaded = load_manifest(&manifest)?;
    debug!(
        manifest = %manifest.display(),
        artifacts = loaded.artifacts.len(),
        "Resolved dependencies loaded"
    );
    Ok(loaded)
}

/// Parse the comma-separated `dependencies.excluded_artifacts` setting.
pub(crate) fn excluded_artifacts(config: &AppConfig) -> CliResult<Vec<ArtifactKey>> {
    config
        .dependencies
        .excluded_artifacts
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<ArtifactKey>()
                .map_err(|e| CliError::from(PlaydistError::from(e)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config_paths() {
        let config = AppConfig::default();
        let args = ProjectArgs {
            base_dir: Some(PathBuf::from("/app")),
            manifest: None,
        };
        let (base, manifest) = project_paths(&args, &config);
        assert_eq!(base, PathBuf::from("/app"));
        assert_eq!(manifest, PathBuf::from("/app/target/playdist/dependencies.json"));
    }

    #[test]
    fn excluded_artifacts_parse_from_config() {
        let mut config = AppConfig::default();
        config.dependencies.excluded_artifacts = "g:a:jar, g:b".into();
        let keys = excluded_artifacts(&config).unwrap();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[1].to_string(), "g:b:jar");
    }

    #[test]
    fn missing_manifest_is_not_found() {
        let err = load_resolved(PathBuf::from("/no/such/manifest.json")).unwrap_err();
        assert!(matches!(err, CliError::ManifestNotFound { .. }));
    }
}
