//! The working artifact pool.
//!
//! During one assembly pass the pool holds every library artifact that has
//! not been placed yet. Claiming moves handles out of the pool into a
//! [`Claim`]; a handle can leave the pool only once, so no artifact can be
//! placed in two destinations.

use std::collections::BTreeSet;

use crate::domain::entities::artifact::ArtifactId;

#[derive(Debug, Default)]
pub struct WorkingArtifactPool {
    remaining: BTreeSet<ArtifactId>,
}

impl WorkingArtifactPool {
    pub fn new(ids: impl IntoIterator<Item = ArtifactId>) -> Self {
        Self {
            remaining: ids.into_iter().collect(),
        }
    }

    pub fn contains(&self, id: ArtifactId) -> bool {
        self.remaining.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ArtifactId> + '_ {
        self.remaining.iter().copied()
    }

    /// Move every listed handle that is still in the pool into a claim.
    ///
    /// Handles already claimed elsewhere, or never pooled, are skipped:
    /// first claim wins.
    pub fn claim(
        &mut self,
        owner: impl Into<String>,
        ids: impl IntoIterator<Item = ArtifactId>,
    ) -> Claim {
        let mut members: Vec<ArtifactId> = ids
            .into_iter()
            .filter(|id| self.remaining.remove(id))
            .collect();
        members.sort();
        Claim {
            owner: owner.into(),
            members,
        }
    }

    /// Claim everything left; ends the pass.
    pub fn release(self, owner: impl Into<String>) -> Claim {
        Claim {
            owner: owner.into(),
            members: self.remaining.into_iter().collect(),
        }
    }
}

/// Artifacts owned by exactly one destination.
///
/// Deliberately neither `Clone` nor constructible outside this module.
#[derive(Debug, PartialEq, Eq)]
pub struct Claim {
    owner: String,
    members: Vec<ArtifactId>,
}

impl Claim {
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn members(&self) -> &[ArtifactId] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn into_members(self) -> Vec<ArtifactId> {
        self.members
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::artifact::{Artifact, ArtifactKey, ResolvedArtifacts},
        value_objects::{ArtifactType, Scope},
    };

    fn arena(n: usize) -> ResolvedArtifacts {
        ResolvedArtifacts::new((0..n).map(|i| {
            Artifact::new(
                ArtifactKey::new("g", format!("a{i}"), ArtifactType::Jar),
                "1",
                Scope::Compile,
                format!("/a{i}.jar"),
            )
        }))
        .unwrap()
    }

    #[test]
    fn claimed_handles_leave_the_pool() {
        let set = arena(3);
        let ids: Vec<_> = set.ids().collect();
        let mut pool = WorkingArtifactPool::new(ids.clone());

        let claim = pool.claim("m", [ids[0], ids[2]]);
        assert_eq!(claim.members(), &[ids[0], ids[2]]);
        assert_eq!(pool.iter().collect::<Vec<_>>(), vec![ids[1]]);
    }

    #[test]
    fn first_claim_wins() {
        let set = arena(2);
        let ids: Vec<_> = set.ids().collect();
        let mut pool = WorkingArtifactPool::new(ids.clone());

        let first = pool.claim("a", [ids[0]]);
        let second = pool.claim("b", [ids[0], ids[1]]);
        assert_eq!(first.members(), &[ids[0]]);
        assert_eq!(second.members(), &[ids[1]]);
        assert!(pool.is_empty());
    }

    #[test]
    fn release_returns_the_rest() {
        let set = arena(3);
        let ids: Vec<_> = set.ids().collect();
        let mut pool = WorkingArtifactPool::new(ids.clone());
        let _ = pool.claim("m", [ids[1]]);

        let rest = pool.release("shared");
        assert_eq!(rest.owner(), "shared");
        assert_eq!(rest.into_members(), vec![ids[0], ids[2]]);
    }
}
