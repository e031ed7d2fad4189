//! Steps shared by the assembly services.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::{
    application::{
        ApplicationError,
        ports::Filesystem,
        services::partitioner::SubtreePartitioner,
    },
    domain::{
        Artifact, ArtifactId, ArtifactKey, DependencyFilter, ProfileConfig, ResolvedArtifacts,
        WorkingArtifactPool,
    },
    error::PlaydistResult,
};

/// Location of the profile configuration inside an application.
pub const CONFIGURATION_FILE: &str = "conf/application.conf";

/// Test-support artifact that never ships.
pub const DEFAULT_EXCLUDED_ARTIFACT: &str =
    "com.google.code.maven-play-plugin:play-selenium-junit4:jar";

/// Read and parse `conf/application.conf` below `base_dir`.
pub fn read_profile_config(
    filesystem: &dyn Filesystem,
    base_dir: &Path,
    profile: Option<&str>,
    framework_home: Option<&Path>,
) -> PlaydistResult<ProfileConfig> {
    let path = base_dir.join(CONFIGURATION_FILE);
    let text = filesystem
        .read_to_string(&path)
        .map_err(|e| ApplicationError::ConfigurationUnreadable {
            path: path.clone(),
            reason: e.to_string(),
        })?;
    let mut config = ProfileConfig::parse(&text, profile)?;
    if let Some(home) = framework_home {
        config = config.with_framework_home(home);
    }
    info!(
        path = %path.display(),
        profile = config.profile().unwrap_or("(none)"),
        modules = config.modules().len(),
        "Configuration parsed"
    );
    Ok(config)
}

/// What goes into the working pool.
#[derive(Debug, Clone, Default)]
pub struct PoolOptions {
    /// Leave `provided` artifacts out entirely.
    pub exclude_provided: bool,
    /// Artifacts removed together with their whole subtree.
    pub excluded_artifacts: Vec<ArtifactKey>,
    pub filter: DependencyFilter,
}

/// Build the pool of classpath artifacts still to be placed.
///
/// Exclusions and filters follow the resolved tree: an artifact goes with
/// an excluded parent only when that parent is where it was resolved.
pub fn build_pool(
    artifacts: &ResolvedArtifacts,
    partitioner: &SubtreePartitioner<'_>,
    options: &PoolOptions,
) -> WorkingArtifactPool {
    let mut excluded: BTreeSet<ArtifactId> = BTreeSet::new();
    for key in &options.excluded_artifacts {
        if let Some(id) = artifacts.find(key) {
            excluded.insert(id);
            excluded.extend(partitioner.closure(&[id]));
            debug!(artifact = %key, "Excluded with its subtree");
        }
    }

    let mut pooled = Vec::new();
    for (id, artifact) in artifacts.iter() {
        if !artifact.is_classpath_eligible()
            || (options.exclude_provided && artifact.scope().is_provided())
            || excluded.contains(&id)
        {
            continue;
        }
        if !options.filter.is_empty() {
            let trail: Vec<&Artifact> = partitioner
                .trail(id)
                .into_iter()
                .map(|step| artifacts.get(step))
                .collect();
            if !options.filter.allows(&trail) {
                debug!(artifact = %artifact.coordinates(), "Filtered out");
                continue;
            }
        }
        pooled.push(id);
    }

    debug!(pooled = pooled.len(), excluded = excluded.len(), "Working pool built");
    WorkingArtifactPool::new(pooled)
}

/// `/`-separated form of a relative path, as used for archive entry names.
pub fn entry_name(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Files of `base_dir` that are not below `skip` (when it lies inside).
pub fn application_files(
    filesystem: &dyn Filesystem,
    base_dir: &Path,
    skip: &Path,
) -> PlaydistResult<Vec<PathBuf>> {
    let skip = skip.strip_prefix(base_dir).ok().map(Path::to_path_buf);
    Ok(filesystem
        .list_files(base_dir)?
        .into_iter()
        .filter(|rel| match &skip {
            Some(prefix) if !prefix.as_os_str().is_empty() => !rel.starts_with(prefix),
            _ => true,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::application::ports::{MockDependencyTree, MockFilesystem};
    use crate::domain::Scope;

    fn artifact(k: &str, scope: Scope) -> Artifact {
        let key: ArtifactKey = k.parse().unwrap();
        let file = format!("/repo/{}.{}", key.name, key.kind);
        Artifact::new(key, "1.0", scope, file)
    }

    fn tree(edges: Vec<(&'static str, Vec<&'static str>)>) -> MockDependencyTree {
        rooted(vec![], edges)
    }

    fn rooted(
        roots: Vec<&'static str>,
        edges: Vec<(&'static str, Vec<&'static str>)>,
    ) -> MockDependencyTree {
        let map: HashMap<ArtifactKey, Vec<ArtifactKey>> = edges
            .into_iter()
            .map(|(from, to)| {
                (
                    from.parse().unwrap(),
                    to.into_iter().map(|t| t.parse().unwrap()).collect(),
                )
            })
            .collect();
        let roots: Vec<ArtifactKey> = roots.into_iter().map(|r| r.parse().unwrap()).collect();
        let mut tree = MockDependencyTree::new();
        tree.expect_dependencies()
            .returning(move |k| Ok(map.get(k).cloned().unwrap_or_default()));
        tree.expect_roots().returning(move || Ok(roots.clone()));
        tree
    }

    fn pool(
        set: &ResolvedArtifacts,
        t: &MockDependencyTree,
        options: &PoolOptions,
    ) -> WorkingArtifactPool {
        let partitioner = SubtreePartitioner::build(t, set).unwrap();
        build_pool(set, &partitioner, options)
    }

    fn names(set: &ResolvedArtifacts, pool: &WorkingArtifactPool) -> Vec<String> {
        pool.iter().map(|id| set.get(id).name().to_string()).collect()
    }

    #[test]
    fn pool_keeps_classpath_artifacts_only() {
        let set = ResolvedArtifacts::new(vec![
            artifact("g:core:jar", Scope::Compile),
            artifact("g:ext:zip:module", Scope::Compile),
            artifact("g:api:jar", Scope::Provided),
        ])
        .unwrap();
        let t = tree(vec![]);

        let all = pool(&set, &t, &PoolOptions::default());
        assert_eq!(names(&set, &all), vec!["core", "api"]);

        let options = PoolOptions {
            exclude_provided: true,
            ..PoolOptions::default()
        };
        let non_provided = pool(&set, &t, &options);
        assert_eq!(names(&set, &non_provided), vec!["core"]);
    }

    #[test]
    fn excluded_artifact_takes_its_subtree() {
        let set = ResolvedArtifacts::new(vec![
            artifact("g:core:jar", Scope::Compile),
            artifact(
                "com.google.code.maven-play-plugin:play-selenium-junit4:jar",
                Scope::Test,
            ),
            artifact("org.openqa:selenium:jar", Scope::Test),
        ])
        .unwrap();
        let t = tree(vec![(
            "com.google.code.maven-play-plugin:play-selenium-junit4:jar",
            vec!["org.openqa:selenium:jar"],
        )]);
        let options = PoolOptions {
            excluded_artifacts: vec![DEFAULT_EXCLUDED_ARTIFACT.parse().unwrap()],
            ..PoolOptions::default()
        };

        let pool = pool(&set, &t, &options);
        assert_eq!(names(&set, &pool), vec!["core"]);
    }

    #[test]
    fn exclude_filter_acts_through_parents() {
        let set = ResolvedArtifacts::new(vec![
            artifact("g:core:jar", Scope::Compile),
            artifact("com.acme:reporting:jar", Scope::Compile),
            artifact("org.lib:itext:jar", Scope::Compile),
        ])
        .unwrap();
        let t = tree(vec![("com.acme:reporting:jar", vec!["org.lib:itext:jar"])]);
        let options = PoolOptions {
            filter: DependencyFilter::new("", "com.acme").unwrap(),
            ..PoolOptions::default()
        };

        let pool = pool(&set, &t, &options);
        assert_eq!(names(&set, &pool), vec!["core"]);
    }

    #[test]
    fn exclude_filter_keeps_a_child_resolved_through_a_kept_parent() {
        let set = ResolvedArtifacts::new(vec![
            artifact("com.acme:reporting:jar", Scope::Compile),
            artifact("com.acme:helper:jar", Scope::Compile),
            artifact("org.lib:pdf:jar", Scope::Compile),
            artifact("org.lib:itext:jar", Scope::Compile),
        ])
        .unwrap();
        let t = rooted(
            vec!["com.acme:reporting:jar", "org.lib:pdf:jar"],
            vec![
                ("com.acme:reporting:jar", vec!["com.acme:helper:jar"]),
                ("com.acme:helper:jar", vec!["org.lib:itext:jar"]),
                ("org.lib:pdf:jar", vec!["org.lib:itext:jar"]),
            ],
        );
        let options = PoolOptions {
            filter: DependencyFilter::new("", "com.acme").unwrap(),
            ..PoolOptions::default()
        };

        let pool = pool(&set, &t, &options);
        assert_eq!(names(&set, &pool), vec!["pdf", "itext"]);
    }

    #[test]
    fn excluded_artifact_leaves_a_shared_child_with_its_nearer_owner() {
        let set = ResolvedArtifacts::new(vec![
            artifact("g:app-lib:jar", Scope::Compile),
            artifact("g:tooling:jar", Scope::Compile),
            artifact("g:shared:jar", Scope::Compile),
        ])
        .unwrap();
        let t = rooted(
            vec!["g:tooling:jar", "g:shared:jar", "g:app-lib:jar"],
            vec![("g:tooling:jar", vec!["g:shared:jar"])],
        );
        let options = PoolOptions {
            excluded_artifacts: vec!["g:tooling:jar".parse().unwrap()],
            ..PoolOptions::default()
        };

        let pool = pool(&set, &t, &options);
        assert_eq!(names(&set, &pool), vec!["app-lib", "shared"]);
    }

    #[test]
    fn missing_configuration_is_reported_with_path() {
        let mut fs = MockFilesystem::new();
        fs.expect_read_to_string().returning(|p| {
            Err(ApplicationError::FilesystemError {
                path: p.to_path_buf(),
                reason: "not found".into(),
            }
            .into())
        });

        let err = read_profile_config(&fs, Path::new("/app"), None, None).unwrap_err();
        assert!(err.to_string().contains("/app/conf/application.conf"));
    }

    #[test]
    fn application_files_skip_the_output_dir() {
        let mut fs = MockFilesystem::new();
        fs.expect_list_files().returning(|_| {
            Ok(vec![
                PathBuf::from("app/A.java"),
                PathBuf::from("target/dist/x.zip"),
            ])
        });

        let files = application_files(&fs, Path::new("/app"), Path::new("/app/target")).unwrap();
        assert_eq!(files, vec![PathBuf::from("app/A.java")]);
    }

    #[test]
    fn entry_names_use_forward_slashes() {
        assert_eq!(entry_name(&Path::new("a").join("b").join("c.jar")), "a/b/c.jar");
    }
}
