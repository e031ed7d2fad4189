use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::domain::error::DomainError;

/// Every file of one distribution, keyed by relative destination.
///
/// This is where at-most-once placement is checked: a second entry for the
/// same destination is rejected before anything touches the disk. Files
/// coming out of an archive are registered one by one, so a module zip that
/// overlaps the framework zip is caught here too.
#[derive(Debug, Clone, Default)]
pub struct AssemblyPlan {
    files: BTreeMap<PathBuf, PlannedEntry>,
    extractions: Vec<PlannedExtraction>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// Produced by extracting an archive.
    Extracted,
    /// Copied from a single source file.
    Copied,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedEntry {
    pub destination: PathBuf,
    pub source: PathBuf,
    /// Coordinates of the artifact (or resource group) owning the entry.
    pub owner: String,
    pub kind: EntryKind,
}

/// One archive unpacked below one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedExtraction {
    pub destination: PathBuf,
    pub archive: PathBuf,
    pub owner: String,
}

impl AssemblyPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_copy(
        &mut self,
        destination: impl Into<PathBuf>,
        source: impl Into<PathBuf>,
        owner: impl Into<String>,
    ) -> Result<(), DomainError> {
        self.insert(destination.into(), source.into(), owner.into(), EntryKind::Copied)
    }

    /// Register an archive extraction and every file it will produce.
    ///
    /// `entries` are the archive's file names relative to its root.
    pub fn add_extraction<I, P>(
        &mut self,
        destination: impl Into<PathBuf>,
        archive: impl Into<PathBuf>,
        owner: impl Into<String>,
        entries: I,
    ) -> Result<(), DomainError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let destination = destination.into();
        let archive = archive.into();
        let owner = owner.into();

        for entry in entries {
            self.insert(
                destination.join(entry),
                archive.clone(),
                owner.clone(),
                EntryKind::Extracted,
            )?;
        }
        self.extractions.push(PlannedExtraction {
            destination,
            archive,
            owner,
        });
        Ok(())
    }

    fn insert(
        &mut self,
        destination: PathBuf,
        source: PathBuf,
        owner: String,
        kind: EntryKind,
    ) -> Result<(), DomainError> {
        if let Some(existing) = self.files.get(&destination) {
            return Err(DomainError::DuplicateEntry {
                path: destination.display().to_string(),
                first: existing.owner.clone(),
                second: owner,
            });
        }
        self.files.insert(
            destination.clone(),
            PlannedEntry {
                destination,
                source,
                owner,
                kind,
            },
        );
        Ok(())
    }

    pub fn get(&self, destination: &Path) -> Option<&PlannedEntry> {
        self.files.get(destination)
    }

    /// Every planned file, in destination order.
    pub fn files(&self) -> impl Iterator<Item = &PlannedEntry> {
        self.files.values()
    }

    pub fn copies(&self) -> impl Iterator<Item = &PlannedEntry> {
        self.files().filter(|e| e.kind == EntryKind::Copied)
    }

    /// Extractions in registration order.
    pub fn extractions(&self) -> &[PlannedExtraction] {
        &self.extractions
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_entry_at_same_destination_is_rejected() {
        let mut plan = AssemblyPlan::new();
        plan.add_copy("lib/a.jar", "/r1/a.jar", "g1:a:jar:1").unwrap();
        let err = plan.add_copy("lib/a.jar", "/r2/a.jar", "g2:a:jar:1").unwrap_err();
        assert_eq!(
            err,
            DomainError::DuplicateEntry {
                path: "lib/a.jar".into(),
                first: "g1:a:jar:1".into(),
                second: "g2:a:jar:1".into(),
            }
        );
        assert_eq!(plan.len(), 1);
    }

    #[test]
    fn extracted_files_collide_with_copies() {
        let mut plan = AssemblyPlan::new();
        plan.add_extraction("modules/crud", "/r/crud.zip", "g:crud:zip:1", ["conf/routes", "lib/x.jar"])
            .unwrap();
        let err = plan
            .add_copy("modules/crud/lib/x.jar", "/r/x.jar", "g:x:jar:1")
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateEntry { first, .. } if first == "g:crud:zip:1"));
    }

    #[test]
    fn extractions_keep_registration_order() {
        let mut plan = AssemblyPlan::new();
        plan.add_extraction("", "/r/play.zip", "fw", ["framework/play.jar"]).unwrap();
        plan.add_extraction("modules/crud", "/r/crud.zip", "crud", ["README"]).unwrap();
        let owners: Vec<&str> = plan.extractions().iter().map(|e| e.owner.as_str()).collect();
        assert_eq!(owners, vec!["fw", "crud"]);
        assert_eq!(plan.get(Path::new("framework/play.jar")).unwrap().kind, EntryKind::Extracted);
        assert_eq!(plan.copies().count(), 0);
    }
}
