//! Destination layout.
//!
//! Pure path computation. Every path returned here is relative to the
//! assembly root; callers join it onto whatever directory they write to.
//!
//! ```text
//! dist                                  dependencies
//! ────                                  ────────────
//! framework/<play jar>                  modules/<name>-<version>/
//! framework/lib/                        modules/<name>-<version>/lib/
//! modules/<name>/          (provided)   lib/
//! modules/<name>/lib/
//! application/modules/<name>-<version>/
//! application/modules/<name>-<version>/lib/
//! application/lib/
//! ```

use std::cmp::Ordering;
use std::path::PathBuf;

use crate::domain::{
    activation::{Mode, Placement},
    entities::artifact::Artifact,
    value_objects::ArtifactType,
};

const FRAMEWORK_DIR: &str = "framework";
const MODULES_DIR: &str = "modules";
const APPLICATION_DIR: &str = "application";
const LIB_DIR: &str = "lib";

/// Framework versions below this use the fixed `play.jar` name.
const LEGACY_FRAMEWORK_BEFORE: [u64; 2] = [1, 2];
const LEGACY_FRAMEWORK_JAR: &str = "play.jar";

const SCALA_MODULE: &str = "scala";
const SCALA_GROUP: &str = "org.scala-lang";
const SCALA_RENAMED: [&str; 2] = ["scala-compiler", "scala-library"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestinationLayout {
    mode: Mode,
}

impl DestinationLayout {
    pub fn new(mode: Mode) -> Self {
        Self { mode }
    }

    pub fn dist() -> Self {
        Self::new(Mode::Dist)
    }

    pub fn dependencies() -> Self {
        Self::new(Mode::Dependencies)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn framework_dir(&self) -> PathBuf {
        PathBuf::from(FRAMEWORK_DIR)
    }

    pub fn framework_lib_dir(&self) -> PathBuf {
        self.framework_dir().join(LIB_DIR)
    }

    pub fn framework_jar(&self, jar: &Artifact) -> PathBuf {
        self.framework_dir().join(framework_jar_name(jar))
    }

    /// Every module directory, in either mode, lives below this one.
    pub fn modules_root(&self, placement: Placement) -> PathBuf {
        match (self.mode, placement) {
            (Mode::Dist, Placement::Application) => PathBuf::from(APPLICATION_DIR).join(MODULES_DIR),
            _ => PathBuf::from(MODULES_DIR),
        }
    }

    pub fn module_dir(&self, name: &str, version: &str, placement: Placement) -> PathBuf {
        let root = self.modules_root(placement);
        match (self.mode, placement) {
            (Mode::Dist, Placement::Provided) => root.join(name),
            _ => root.join(format!("{name}-{version}")),
        }
    }

    pub fn module_lib_dir(&self, name: &str, version: &str, placement: Placement) -> PathBuf {
        self.module_dir(name, version, placement).join(LIB_DIR)
    }

    pub fn shared_lib_dir(&self) -> PathBuf {
        match self.mode {
            Mode::Dist => PathBuf::from(APPLICATION_DIR).join(LIB_DIR),
            Mode::Dependencies => PathBuf::from(LIB_DIR),
        }
    }

    pub fn application_dir(&self) -> PathBuf {
        PathBuf::from(APPLICATION_DIR)
    }
}

/// File name of a library placed under a module's `lib/`.
///
/// The scala module expects its compiler and library jars without a
/// version suffix.
pub fn library_file_name(module: Option<&str>, artifact: &Artifact) -> String {
    let scala_jar = module == Some(SCALA_MODULE)
        && artifact.group() == SCALA_GROUP
        && SCALA_RENAMED.contains(&artifact.name())
        && *artifact.kind() == ArtifactType::Jar;

    if scala_jar {
        format!("{}.jar", artifact.name())
    } else {
        artifact.file_name()
    }
}

pub fn framework_jar_name(jar: &Artifact) -> String {
    if is_legacy_framework(jar.version()) {
        LEGACY_FRAMEWORK_JAR.to_string()
    } else {
        jar.file_name()
    }
}

/// Whether a framework version predates 1.2, comparing dotted numeric
/// segments. Versions without a leading number are never legacy.
pub fn is_legacy_framework(version: &str) -> bool {
    let numbers = numeric_segments(version);
    !numbers.is_empty() && compare_segments(&numbers, &LEGACY_FRAMEWORK_BEFORE) == Ordering::Less
}

fn numeric_segments(version: &str) -> Vec<u64> {
    let mut out = Vec::new();
    for segment in version.split('.') {
        let digits: String = segment.chars().take_while(char::is_ascii_digit).collect();
        match digits.parse() {
            Ok(n) => out.push(n),
            Err(_) => break,
        }
        if digits.len() != segment.len() {
            break;
        }
    }
    out
}

fn compare_segments(a: &[u64], b: &[u64]) -> Ordering {
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| {
            let x = a.get(i).copied().unwrap_or(0);
            let y = b.get(i).copied().unwrap_or(0);
            x.cmp(&y)
        })
        .find(|o| *o != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

/// `<name>[-<classifier>].zip`.
pub fn dist_file_name(name: &str, classifier: Option<&str>) -> String {
    match classifier.filter(|c| !c.is_empty()) {
        Some(c) if c.starts_with('-') => format!("{name}{c}.zip"),
        Some(c) => format!("{name}-{c}.zip"),
        None => format!("{name}.zip"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{entities::artifact::ArtifactKey, value_objects::Scope};

    fn jar(group: &str, name: &str, version: &str) -> Artifact {
        Artifact::new(
            ArtifactKey::new(group, name, ArtifactType::Jar),
            version,
            Scope::Compile,
            format!("/repo/{name}-{version}.jar"),
        )
    }

    #[test]
    fn dist_paths() {
        let l = DestinationLayout::dist();
        assert_eq!(l.module_dir("crud", "1.0", Placement::Provided), PathBuf::from("modules/crud"));
        assert_eq!(
            l.module_lib_dir("pdf", "0.9", Placement::Application),
            PathBuf::from("application/modules/pdf-0.9/lib")
        );
        assert_eq!(l.shared_lib_dir(), PathBuf::from("application/lib"));
        assert_eq!(l.framework_lib_dir(), PathBuf::from("framework/lib"));
    }

    #[test]
    fn dependencies_paths() {
        let l = DestinationLayout::dependencies();
        assert_eq!(
            l.module_dir("pdf", "0.9", Placement::Application),
            PathBuf::from("modules/pdf-0.9")
        );
        assert_eq!(l.shared_lib_dir(), PathBuf::from("lib"));
    }

    #[test]
    fn scala_jars_lose_their_version_only_in_the_scala_module() {
        let compiler = jar("org.scala-lang", "scala-compiler", "2.9.1");
        assert_eq!(library_file_name(Some("scala"), &compiler), "scala-compiler.jar");
        assert_eq!(library_file_name(Some("other"), &compiler), "scala-compiler-2.9.1.jar");
        assert_eq!(library_file_name(None, &compiler), "scala-compiler-2.9.1.jar");

        let unrelated = jar("org.scala-lang", "scala-swing", "2.9.1");
        assert_eq!(library_file_name(Some("scala"), &unrelated), "scala-swing-2.9.1.jar");
    }

    #[test]
    fn legacy_framework_versions() {
        assert!(is_legacy_framework("1.1"));
        assert!(is_legacy_framework("1.1.1"));
        assert!(is_legacy_framework("1.1-SNAPSHOT"));
        assert!(!is_legacy_framework("1.2"));
        assert!(!is_legacy_framework("1.2.4"));
        assert!(!is_legacy_framework("1.10"));
        assert!(!is_legacy_framework("master"));
    }

    #[test]
    fn framework_jar_destination() {
        let l = DestinationLayout::dist();
        assert_eq!(l.framework_jar(&jar("p", "play", "1.1.1")), PathBuf::from("framework/play.jar"));
        assert_eq!(
            l.framework_jar(&jar("p", "play", "1.2.4")),
            PathBuf::from("framework/play-1.2.4.jar")
        );
    }

    #[test]
    fn dist_file_names() {
        assert_eq!(dist_file_name("shop", None), "shop.zip");
        assert_eq!(dist_file_name("shop", Some("")), "shop.zip");
        assert_eq!(dist_file_name("shop", Some("dist")), "shop-dist.zip");
        assert_eq!(dist_file_name("shop", Some("-dist")), "shop-dist.zip");
    }
}
