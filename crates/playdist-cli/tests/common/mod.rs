//! Shared fixture: a small application plus a local artifact repository.

#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

pub struct Fixture {
    pub root: TempDir,
}

impl Fixture {
    /// Application `demo` with one compile module (`pdf`) and one provided
    /// module (`crud`) enabled through `conf/application.conf`.
    pub fn new() -> Self {
        let fixture = Self {
            root: TempDir::new().unwrap(),
        };
        fs::create_dir_all(fixture.repo()).unwrap();

        fixture.write_app_file(
            "conf/application.conf",
            "application.name=demo\nmodule.crud=${play.path}/modules/crud\n",
        );
        fixture.write_app_file("app/controllers/Application.java", "class Application {}\n");

        fixture.zip("play-1.2.5-framework.zip", &[("framework/build.xml", "<project/>")]);
        fixture.zip("play-crud-1.2.5-module.zip", &[("app/controllers/CRUD.java", "crud")]);
        fixture.zip("play-pdf-0.9-module.zip", &[("app/controllers/PDF.java", "pdf")]);
        for jar in [
            "play-1.2.5.jar",
            "netty-3.2.jar",
            "play-pdf-0.9.jar",
            "itext-2.1.jar",
            "commons-lang-2.6.jar",
        ] {
            fs::write(fixture.repo().join(jar), jar).unwrap();
        }

        fixture.write_manifest(&fixture.default_artifacts());
        fixture
    }

    pub fn app(&self) -> PathBuf {
        self.root.path().join("demo")
    }

    pub fn repo(&self) -> PathBuf {
        self.root.path().join("repo")
    }

    pub fn manifest(&self) -> PathBuf {
        self.app().join("target/playdist/dependencies.json")
    }

    pub fn write_app_file(&self, rel: &str, content: &str) {
        let path = self.app().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// Write a zip of `(name, content)` entries into the repository.
    pub fn zip(&self, file: &str, entries: &[(&str, &str)]) -> PathBuf {
        let path = self.repo().join(file);
        let mut writer = zip::ZipWriter::new(fs::File::create(&path).unwrap());
        for (name, content) in entries {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
        path
    }

    pub fn artifact(
        &self,
        group: &str,
        name: &str,
        version: &str,
        kind: &str,
        classifier: Option<&str>,
        scope: &str,
        file: &str,
        dependencies: &[&str],
    ) -> Value {
        let mut entry = json!({
            "group": group,
            "name": name,
            "version": version,
            "type": kind,
            "scope": scope,
            "file": self.repo().join(file),
            "dependencies": dependencies,
        });
        if let Some(c) = classifier {
            entry["classifier"] = json!(c);
        }
        entry
    }

    pub fn default_artifacts(&self) -> Vec<Value> {
        let play = "org.playframework";
        vec![
            self.artifact(play, "play", "1.2.5", "zip", Some("framework"), "provided", "play-1.2.5-framework.zip", &[]),
            self.artifact(play, "play", "1.2.5", "jar", None, "provided", "play-1.2.5.jar", &["org.jboss:netty"]),
            self.artifact("org.jboss", "netty", "3.2", "jar", None, "provided", "netty-3.2.jar", &[]),
            self.artifact(play, "play-crud", "1.2.5", "zip", Some("module"), "provided", "play-crud-1.2.5-module.zip", &[]),
            self.artifact("com.example", "play-pdf", "0.9", "zip", Some("module"), "compile", "play-pdf-0.9-module.zip", &[]),
            self.artifact("com.example", "play-pdf", "0.9", "jar", None, "compile", "play-pdf-0.9.jar", &["com.lowagie:itext"]),
            self.artifact("com.lowagie", "itext", "2.1", "jar", None, "compile", "itext-2.1.jar", &[]),
            self.artifact("commons-lang", "commons-lang", "2.6", "jar", None, "compile", "commons-lang-2.6.jar", &[]),
        ]
    }

    pub fn write_manifest(&self, artifacts: &[Value]) {
        let path = self.manifest();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let body = serde_json::to_string_pretty(&json!({ "artifacts": artifacts })).unwrap();
        fs::write(path, body).unwrap();
    }
}

/// Names of the entries inside a zip file.
pub fn zip_entries(path: &Path) -> Vec<String> {
    let archive = zip::ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    names
}
