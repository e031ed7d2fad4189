//! Dependency subtree partitioning.
//!
//! The dependency graph port only answers "direct dependencies of X" and
//! "direct dependencies of the project". From those the partitioner builds
//! the resolved tree the way the resolver does: breadth-first from the
//! project, each artifact hanging below the first parent that reaches it.
//! An artifact belongs to a subtree only when its single resolved path runs
//! through the subtree's root, so a library the project (or a shallower
//! branch) already depends on is never pulled below a module.
//!
//! Roots are the project's declared direct dependencies, then every
//! artifact nothing else depends on, then whatever a cycle left behind.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use tracing::{debug, trace};

use crate::{
    application::ports::DependencyTree,
    domain::{ArtifactId, Claim, ResolvedArtifacts, WorkingArtifactPool},
    error::PlaydistResult,
};

pub struct SubtreePartitioner<'a> {
    artifacts: &'a ResolvedArtifacts,
    /// Resolved parent; top-level artifacts have none.
    parents: HashMap<ArtifactId, ArtifactId>,
    children: HashMap<ArtifactId, Vec<ArtifactId>>,
}

impl<'a> SubtreePartitioner<'a> {
    /// Resolve the tree of `artifacts` over the edges reported by `tree`.
    pub fn build(
        tree: &dyn DependencyTree,
        artifacts: &'a ResolvedArtifacts,
    ) -> PlaydistResult<Self> {
        let mut edges: HashMap<ArtifactId, Vec<ArtifactId>> = HashMap::new();
        let mut depended_on: HashSet<ArtifactId> = HashSet::new();
        for (id, artifact) in artifacts.iter() {
            for dep in tree.dependencies(artifact.key())? {
                match artifacts.find(&dep) {
                    Some(child) if child != id => {
                        let targets = edges.entry(id).or_default();
                        if !targets.contains(&child) {
                            targets.push(child);
                        }
                        depended_on.insert(child);
                    }
                    Some(_) => {}
                    None => trace!(dependency = %dep, "Not in the resolved set"),
                }
            }
        }

        let declared: Vec<ArtifactId> = tree
            .roots()?
            .iter()
            .filter_map(|key| artifacts.find(key))
            .collect();
        let undeclared: Vec<ArtifactId> = artifacts
            .iter()
            .map(|(id, _)| id)
            .filter(|id| !depended_on.contains(id))
            .collect();
        let rest: Vec<ArtifactId> = artifacts.iter().map(|(id, _)| id).collect();

        let mut partitioner = Self {
            artifacts,
            parents: HashMap::new(),
            children: HashMap::new(),
        };
        let mut placed: HashSet<ArtifactId> = HashSet::new();
        partitioner.walk(&edges, &mut placed, declared);
        partitioner.walk(&edges, &mut placed, undeclared);
        // Only cycles are left; each one gets a single entry point.
        for id in rest {
            partitioner.walk(&edges, &mut placed, vec![id]);
        }
        debug!(
            artifacts = artifacts.len(),
            top_level = artifacts.len() - partitioner.parents.len(),
            "Dependency tree resolved"
        );
        Ok(partitioner)
    }

    /// Breadth-first from `seeds`, which share the top level; the first
    /// visit of an artifact fixes its parent.
    fn walk(
        &mut self,
        edges: &HashMap<ArtifactId, Vec<ArtifactId>>,
        placed: &mut HashSet<ArtifactId>,
        seeds: Vec<ArtifactId>,
    ) {
        let mut queue: VecDeque<ArtifactId> =
            seeds.into_iter().filter(|seed| placed.insert(*seed)).collect();
        while let Some(current) = queue.pop_front() {
            for &child in edges.get(&current).into_iter().flatten() {
                if placed.insert(child) {
                    self.parents.insert(child, current);
                    self.children.entry(current).or_default().push(child);
                    queue.push_back(child);
                }
            }
        }
    }

    /// Resolved parent of `id`, `None` for top-level artifacts.
    pub fn parent(&self, id: ArtifactId) -> Option<ArtifactId> {
        self.parents.get(&id).copied()
    }

    /// `id` followed by its resolved ancestors, nearest first.
    pub fn trail(&self, id: ArtifactId) -> Vec<ArtifactId> {
        let mut trail = vec![id];
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            trail.push(parent);
            current = parent;
        }
        trail
    }

    /// Everything resolved below the given roots, roots excluded.
    pub fn closure(&self, roots: &[ArtifactId]) -> BTreeSet<ArtifactId> {
        let mut found = BTreeSet::new();
        let mut queue: VecDeque<ArtifactId> = roots.iter().copied().collect();
        while let Some(current) = queue.pop_front() {
            for &child in self.children.get(&current).into_iter().flatten() {
                if found.insert(child) {
                    queue.push_back(child);
                }
            }
        }
        for root in roots {
            found.remove(root);
        }
        found
    }

    /// Claim everything below `root` that is still pooled.
    pub fn claim_subtree(
        &self,
        pool: &mut WorkingArtifactPool,
        owner: &str,
        root: ArtifactId,
    ) -> Claim {
        let claim = pool.claim(owner, self.closure(&[root]));
        debug!(owner, claimed = claim.len(), "Subtree claimed");
        claim
    }

    /// Claim a module's private libraries: its sibling jar (same group and
    /// name) plus everything resolved below the module archive and that jar.
    pub fn claim_module(
        &self,
        pool: &mut WorkingArtifactPool,
        owner: &str,
        module: ArtifactId,
    ) -> Claim {
        let mut roots = vec![module];
        let sibling = self
            .artifacts
            .find(&self.artifacts.get(module).key().sibling_jar());
        if let Some(jar) = sibling {
            roots.push(jar);
        }

        let mut members = self.closure(&roots);
        members.extend(sibling);

        let claim = pool.claim(owner, members);
        debug!(owner, claimed = claim.len(), "Module libraries claimed");
        claim
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockDependencyTree;
    use crate::domain::{Artifact, ArtifactKey, Scope};

    fn key(s: &str) -> ArtifactKey {
        s.parse().unwrap()
    }

    fn set(keys: &[&str]) -> ResolvedArtifacts {
        ResolvedArtifacts::new(keys.iter().map(|k| {
            let key = key(k);
            let file = format!("/repo/{}.{}", key.name, key.kind);
            Artifact::new(key, "1.0", Scope::Compile, file)
        }))
        .unwrap()
    }

    fn rooted(roots: &[&str], edges: &[(&str, &[&str])]) -> MockDependencyTree {
        let map: HashMap<ArtifactKey, Vec<ArtifactKey>> = edges
            .iter()
            .map(|(from, to)| (key(from), to.iter().map(|t| key(t)).collect()))
            .collect();
        let roots: Vec<ArtifactKey> = roots.iter().map(|r| key(r)).collect();
        let mut tree = MockDependencyTree::new();
        tree.expect_dependencies()
            .returning(move |k| Ok(map.get(k).cloned().unwrap_or_default()));
        tree.expect_roots().returning(move || Ok(roots.clone()));
        tree
    }

    fn graph(edges: &[(&str, &[&str])]) -> MockDependencyTree {
        rooted(&[], edges)
    }

    fn id(set: &ResolvedArtifacts, k: &str) -> ArtifactId {
        set.find(&key(k)).unwrap()
    }

    fn pool_of(set: &ResolvedArtifacts, keys: &[&str]) -> WorkingArtifactPool {
        WorkingArtifactPool::new(keys.iter().map(|k| id(set, k)))
    }

    #[test]
    fn closure_is_transitive_and_cycle_safe() {
        let s = set(&["g:a", "g:b", "g:c"]);
        let tree = graph(&[("g:a", &["g:b"]), ("g:b", &["g:c"]), ("g:c", &["g:a"])]);
        let p = SubtreePartitioner::build(&tree, &s).unwrap();

        let closure = p.closure(&[id(&s, "g:a")]);
        assert_eq!(closure, BTreeSet::from([id(&s, "g:b"), id(&s, "g:c")]));
    }

    #[test]
    fn walk_passes_through_unpooled_nodes() {
        let s = set(&["g:m:zip:module", "g:x", "g:y"]);
        let tree = graph(&[("g:m:zip:module", &["g:x"]), ("g:x", &["g:y"])]);
        let p = SubtreePartitioner::build(&tree, &s).unwrap();

        let mut pool = pool_of(&s, &["g:y"]);
        let claim = p.claim_subtree(&mut pool, "m", id(&s, "g:m:zip:module"));
        assert_eq!(claim.members(), &[id(&s, "g:y")]);
        assert!(pool.is_empty());
    }

    #[test]
    fn module_claim_takes_the_sibling_jar() {
        let s = set(&["g:ext:zip:module", "g:ext", "g:dep", "g:core"]);
        let tree = graph(&[("g:ext", &["g:dep"])]);
        let p = SubtreePartitioner::build(&tree, &s).unwrap();

        let mut pool = pool_of(&s, &["g:ext", "g:dep", "g:core"]);
        let claim = p.claim_module(&mut pool, "ext", id(&s, "g:ext:zip:module"));

        assert_eq!(claim.len(), 2);
        assert!(!pool.contains(id(&s, "g:ext")));
        assert!(pool.contains(id(&s, "g:core")));
    }

    #[test]
    fn shared_dependency_hangs_below_the_first_parent() {
        let s = set(&["g:a:zip:module", "g:b:zip:module", "g:shared"]);
        let tree = graph(&[
            ("g:a:zip:module", &["g:shared"]),
            ("g:b:zip:module", &["g:shared"]),
        ]);
        let p = SubtreePartitioner::build(&tree, &s).unwrap();
        let mut pool = pool_of(&s, &["g:shared"]);

        assert_eq!(p.parent(id(&s, "g:shared")), Some(id(&s, "g:a:zip:module")));
        let b = p.claim_module(&mut pool, "b", id(&s, "g:b:zip:module"));
        let a = p.claim_module(&mut pool, "a", id(&s, "g:a:zip:module"));
        assert!(b.is_empty());
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn direct_project_dependency_stays_out_of_a_module_subtree() {
        // The project uses commons-lang itself; the scala jar needs it too.
        let s = set(&[
            "g:play-scala:zip:module",
            "g:play-scala",
            "org.scala-lang:scala-library",
            "commons-lang:commons-lang",
        ]);
        let tree = rooted(
            &["g:play-scala:zip:module", "g:play-scala", "commons-lang:commons-lang"],
            &[(
                "g:play-scala",
                &["org.scala-lang:scala-library", "commons-lang:commons-lang"],
            )],
        );
        let p = SubtreePartitioner::build(&tree, &s).unwrap();
        let commons = id(&s, "commons-lang:commons-lang");
        assert_eq!(p.parent(commons), None);

        let mut pool = pool_of(
            &s,
            &["g:play-scala", "org.scala-lang:scala-library", "commons-lang:commons-lang"],
        );
        let scala = p.claim_module(&mut pool, "scala", id(&s, "g:play-scala:zip:module"));

        assert_eq!(scala.len(), 2);
        assert!(!scala.members().contains(&commons));
        assert_eq!(pool.release("application").into_members(), vec![commons]);
    }

    #[test]
    fn nearer_path_wins_over_declaration_order() {
        let s = set(&["g:reporting", "g:helper", "g:pdf", "g:itext"]);
        let tree = rooted(
            &["g:reporting", "g:pdf"],
            &[
                ("g:reporting", &["g:helper"]),
                ("g:helper", &["g:itext"]),
                ("g:pdf", &["g:itext"]),
            ],
        );
        let p = SubtreePartitioner::build(&tree, &s).unwrap();

        assert_eq!(
            p.trail(id(&s, "g:itext")),
            vec![id(&s, "g:itext"), id(&s, "g:pdf")]
        );
        assert_eq!(
            p.closure(&[id(&s, "g:reporting")]),
            BTreeSet::from([id(&s, "g:helper")])
        );
    }

    #[test]
    fn transitive_dependencies_are_not_roots_without_declaration() {
        // Listed first, but something depends on it.
        let s = set(&["g:lib", "g:m:zip:module"]);
        let tree = graph(&[("g:m:zip:module", &["g:lib"])]);
        let p = SubtreePartitioner::build(&tree, &s).unwrap();
        assert_eq!(p.parent(id(&s, "g:lib")), Some(id(&s, "g:m:zip:module")));
    }

    #[test]
    fn unknown_dependencies_are_ignored() {
        let s = set(&["g:a"]);
        let tree = graph(&[("g:a", &["other:missing"])]);
        let p = SubtreePartitioner::build(&tree, &s).unwrap();
        assert!(p.closure(&[id(&s, "g:a")]).is_empty());
    }

    #[test]
    fn graph_errors_propagate() {
        let s = set(&["g:a"]);
        let mut tree = MockDependencyTree::new();
        tree.expect_dependencies().returning(|_| {
            Err(crate::application::ApplicationError::DependencyTree {
                reason: "boom".into(),
            }
            .into())
        });
        assert!(SubtreePartitioner::build(&tree, &s).is_err());
    }
}
