//! # Lineage Resolver
//!
//! Locates the record a proof is requested for and reconstructs the
//! ancestry around it.
//!
//! ## Ancestor walk
//!
//! The walk starts at the target's immediate parent and follows parent
//! back-references through a local arena keyed by [`NodeId`]. The arena is
//! seeded with one eager batch (`eager_depth` ancestors); whenever the next
//! parent is missing from it, one more batch is fetched from the store. The
//! walk ends at a root, at a node already visited, at a parent that does not
//! exist, or after `max_depth` steps. The returned chain is root first.

use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;

use kinship_core::{LeafRecord, NodeId};
use serde::Serialize;

use crate::entity::{AncestorSummary, EntityFamily, GroupEntity, MemberEntity, MemberSummary};
use crate::error::LineageError;
use crate::store::LineageStore;

/// Default number of ancestors loaded per store round trip.
pub const DEFAULT_EAGER_DEPTH: usize = 3;

/// Default hard bound on walk length.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Resolver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineageConfig {
    /// Ancestors fetched per store call.
    pub eager_depth: usize,
    /// Maximum chain length before the walk stops.
    pub max_depth: usize,
}

impl Default for LineageConfig {
    fn default() -> Self {
        Self {
            eager_depth: DEFAULT_EAGER_DEPTH,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl LineageConfig {
    /// Load configuration from the environment.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `KINSHIP_LINEAGE_EAGER_DEPTH` | `3` |
    /// | `KINSHIP_LINEAGE_MAX_DEPTH` | `64` |
    pub fn from_env() -> Self {
        Self {
            eager_depth: env_usize("KINSHIP_LINEAGE_EAGER_DEPTH", DEFAULT_EAGER_DEPTH),
            max_depth: env_usize("KINSHIP_LINEAGE_MAX_DEPTH", DEFAULT_MAX_DEPTH),
        }
    }
}

fn env_usize(key: &str, default: usize) -> usize {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "ignoring unparseable setting");
            default
        }),
        Err(_) => default,
    }
}

/// Result of [`LineageResolver::resolve_target`].
#[derive(Debug, Clone, Serialize)]
#[serde(bound(serialize = ""))]
pub struct ResolvedLineage<F: EntityFamily> {
    pub target: F::Member,
    /// Root ancestor first, immediate parent last.
    pub ancestor_chain: Vec<AncestorSummary>,
    /// Other members of the immediate parent.
    pub siblings: Vec<MemberSummary>,
}

/// Drop records with an empty (or blank) field, logging each one.
pub fn filter_leaf_records(records: Vec<LeafRecord>) -> Vec<LeafRecord> {
    records
        .into_iter()
        .filter(|r| {
            let keep = r.is_well_formed();
            if !keep {
                tracing::warn!(record = %r, "skipping malformed leaf record");
            }
            keep
        })
        .collect()
}

/// Generic resolver over one record family and its store.
#[derive(Debug, Clone)]
pub struct LineageResolver<F, S> {
    store: S,
    config: LineageConfig,
    _family: PhantomData<F>,
}

impl<F: EntityFamily, S: LineageStore<F>> LineageResolver<F, S> {
    pub fn new(store: S, config: LineageConfig) -> Self {
        Self {
            store,
            config,
            _family: PhantomData,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> LineageConfig {
        self.config
    }

    // -- Target resolution ----------------------------------------------------

    /// Resolve a member by public identifier and reconstruct its lineage.
    pub fn resolve_target(&self, identifier: &str) -> Result<ResolvedLineage<F>, LineageError> {
        let target = self
            .store
            .find_member_by_public_id(identifier)?
            .ok_or_else(|| LineageError::NotFound(format!("{} member {identifier}", F::NAME)))?;
        self.lineage_of(target)
    }

    /// Like [`resolve_target`](Self::resolve_target) but also accepts a
    /// group identifier; see [`resolve_member`](Self::resolve_member).
    pub fn resolve_lineage(&self, identifier: &str) -> Result<ResolvedLineage<F>, LineageError> {
        let target = self.resolve_member(identifier)?;
        self.lineage_of(target)
    }

    /// Find the member an identifier refers to.
    ///
    /// A member public id wins. Otherwise the identifier is taken as a group
    /// public id and the group is represented by its head member, else its
    /// first member, else the first member found searching its descendant
    /// groups depth first in child order.
    pub fn resolve_member(&self, identifier: &str) -> Result<F::Member, LineageError> {
        if let Some(member) = self.store.find_member_by_public_id(identifier)? {
            return Ok(member);
        }
        let group = self
            .store
            .find_group_by_public_id(identifier)?
            .ok_or_else(|| LineageError::NotFound(format!("{} record {identifier}", F::NAME)))?;

        let mut stack = vec![(group.id(), 0usize)];
        let mut visited = HashSet::new();
        while let Some((id, depth)) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            if let Some(loaded) = self.store.find_group_with_children(id)? {
                let chosen = loaded
                    .members
                    .iter()
                    .find(|m| m.is_head())
                    .or_else(|| loaded.members.first());
                if let Some(member) = chosen {
                    tracing::debug!(
                        family = F::NAME,
                        group = %id,
                        member = member.public_id(),
                        "resolved group identifier to member"
                    );
                    return Ok(member.clone());
                }
            }
            if depth < self.config.max_depth {
                let children = self.store.find_child_groups(id)?;
                for child in children.iter().rev() {
                    stack.push((child.id(), depth + 1));
                }
            }
        }
        Err(LineageError::NotFound(format!(
            "{} group {identifier} has no members",
            F::NAME
        )))
    }

    fn lineage_of(&self, target: F::Member) -> Result<ResolvedLineage<F>, LineageError> {
        let Some(parent_id) = target.group_id() else {
            return Ok(ResolvedLineage {
                target,
                ancestor_chain: Vec::new(),
                siblings: Vec::new(),
            });
        };

        let ancestor_chain = self
            .ancestor_walk(parent_id)?
            .iter()
            .map(GroupEntity::summary)
            .collect();

        let siblings = match self.store.find_group_with_children(parent_id)? {
            Some(loaded) => loaded
                .members
                .iter()
                .filter(|m| m.id() != target.id())
                .map(MemberEntity::summary)
                .collect(),
            None => Vec::new(),
        };

        Ok(ResolvedLineage {
            target,
            ancestor_chain,
            siblings,
        })
    }

    /// Walk from `start` to the root. Returns groups root first.
    fn ancestor_walk(&self, start: NodeId) -> Result<Vec<F::Group>, LineageError> {
        let mut arena: HashMap<NodeId, F::Group> = HashMap::new();
        let mut visited = HashSet::new();
        let mut chain = Vec::new();
        let mut cursor = Some(start);

        while let Some(id) = cursor {
            if chain.len() >= self.config.max_depth {
                tracing::warn!(
                    family = F::NAME,
                    max_depth = self.config.max_depth,
                    "ancestor walk hit depth bound"
                );
                break;
            }
            if !visited.insert(id) {
                tracing::warn!(family = F::NAME, node = %id, "cycle in parent chain, stopping walk");
                break;
            }
            if !arena.contains_key(&id) {
                for group in self
                    .store
                    .find_group_with_ancestors(id, self.config.eager_depth)?
                {
                    arena.entry(group.id()).or_insert(group);
                }
            }
            let Some(group) = arena.get(&id) else {
                tracing::warn!(family = F::NAME, node = %id, "dangling parent reference");
                break;
            };
            cursor = group.parent_id();
            chain.push(group.clone());
        }

        chain.reverse();
        Ok(chain)
    }

    // -- Proof triples --------------------------------------------------------

    /// The leaf triple for the member `(descendant_id, relationship)`.
    pub fn select_proof_triple(
        &self,
        descendant_id: &str,
        relationship: &str,
    ) -> Result<LeafRecord, LineageError> {
        let member = self
            .store
            .find_member_by_public_id_and_relationship(descendant_id, relationship)?
            .ok_or_else(|| {
                LineageError::NotFound(format!(
                    "{} member {descendant_id} with relationship {relationship}",
                    F::NAME
                ))
            })?;
        self.triple_for_member(&member)
    }

    /// Map a stored member to its leaf triple.
    pub fn triple_for_member(&self, member: &F::Member) -> Result<LeafRecord, LineageError> {
        let group_id = member.group_id().ok_or_else(|| {
            LineageError::InvalidState(format!("member {} has no parent", member.public_id()))
        })?;
        let group = self
            .store
            .find_group_with_ancestors(group_id, 0)?
            .into_iter()
            .next()
            .ok_or_else(|| {
                LineageError::InvalidState(format!(
                    "member {} references missing parent {group_id}",
                    member.public_id()
                ))
            })?;
        let triple = F::to_leaf_triple(member, &group).ok_or_else(|| {
            LineageError::InvalidState(format!(
                "parent {group_id} of member {} has no public identifier",
                member.public_id()
            ))
        })?;
        if !triple.is_well_formed() {
            return Err(LineageError::InvalidState(format!(
                "member {} maps to malformed leaf {triple}",
                member.public_id()
            )));
        }
        Ok(triple)
    }

    /// Every provable leaf in the store, in store order.
    pub fn candidate_leaves(&self) -> Result<Vec<LeafRecord>, LineageError> {
        let mut out = Vec::new();
        for (member, group) in self.store.all_members_with_groups()? {
            let Some(group) = group else {
                tracing::warn!(
                    family = F::NAME,
                    member = member.public_id(),
                    "skipping member without parent"
                );
                continue;
            };
            match F::to_leaf_triple(&member, &group) {
                Some(triple) => out.push(triple),
                None => tracing::warn!(
                    family = F::NAME,
                    member = member.public_id(),
                    group = %group.id(),
                    "skipping member whose parent has no public identifier"
                ),
            }
        }
        Ok(filter_leaf_records(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::families::{Family, Genealogy, Hospital, Patient, Relation};
    use crate::store::{ArenaStore, GroupWithChildren};
    use crate::Clinical;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn family(id: u64, public: Option<&str>, parent: Option<u64>) -> Family {
        Family {
            id: NodeId(id),
            family_id: public.map(str::to_string),
            name: format!("family-{id}"),
            location: Some("Accra".into()),
            relationship: None,
            parent_id: parent.map(NodeId),
        }
    }

    fn relation(id: u64, public: &str, rel: &str, family: Option<u64>) -> Relation {
        Relation {
            id: NodeId(id),
            relation_id: public.to_string(),
            first_name: format!("member-{id}"),
            last_name: String::new(),
            relationship: rel.to_string(),
            family_id: family.map(NodeId),
            is_family_head: false,
        }
    }

    /// F1 <- F2 <- F3, with members under F3 and F1.
    fn store() -> ArenaStore<Genealogy> {
        let s = ArenaStore::new();
        s.insert_group(family(1, Some("F1"), None)).unwrap();
        s.insert_group(family(2, Some("F2"), Some(1))).unwrap();
        s.insert_group(family(3, Some("F3"), Some(2))).unwrap();
        s.insert_member(relation(10, "R10", "son", Some(3))).unwrap();
        s.insert_member(relation(11, "R11", "daughter", Some(3))).unwrap();
        s.insert_member(relation(12, "R12", "father", Some(2))).unwrap();
        s.insert_member(relation(13, "R13", "grandfather", Some(1))).unwrap();
        s
    }

    fn resolver(
        s: ArenaStore<Genealogy>,
    ) -> LineageResolver<Genealogy, ArenaStore<Genealogy>> {
        LineageResolver::new(s, LineageConfig::default())
    }

    #[test]
    fn unknown_identifier_is_not_found() {
        let err = resolver(store()).resolve_target("nobody").unwrap_err();
        assert!(matches!(err, LineageError::NotFound(_)));
    }

    #[test]
    fn two_ancestors_deep_root_first() {
        let r = resolver(store());
        let resolved = r.resolve_target("R12").unwrap();
        let chain: Vec<_> = resolved.ancestor_chain.iter().map(|a| a.id.0).collect();
        assert_eq!(chain, [1, 2]);
        assert!(resolved.siblings.is_empty());
    }

    #[test]
    fn three_level_chain_and_siblings() {
        let resolved = resolver(store()).resolve_target("R10").unwrap();
        let chain: Vec<_> = resolved
            .ancestor_chain
            .iter()
            .map(|a| a.public_id.clone().unwrap())
            .collect();
        assert_eq!(chain, ["F1", "F2", "F3"]);
        assert_eq!(resolved.siblings.len(), 1);
        assert_eq!(resolved.siblings[0].public_id, "R11");
        assert_eq!(resolved.siblings[0].role, "daughter");
        assert_eq!(resolved.target.relation_id, "R10");
    }

    #[test]
    fn unparented_member_has_empty_lineage() {
        let s = store();
        s.insert_member(relation(20, "R20", "son", None)).unwrap();
        let resolved = resolver(s).resolve_target("R20").unwrap();
        assert!(resolved.ancestor_chain.is_empty());
        assert!(resolved.siblings.is_empty());
    }

    #[test]
    fn cyclic_parents_terminate() {
        let s = ArenaStore::<Genealogy>::new();
        s.insert_group(family(1, Some("A"), Some(3))).unwrap();
        s.insert_group(family(2, Some("B"), Some(1))).unwrap();
        s.insert_group(family(3, Some("C"), Some(2))).unwrap();
        s.insert_member(relation(10, "R10", "son", Some(3))).unwrap();
        let resolved = resolver(s).resolve_target("R10").unwrap();
        let mut ids: Vec<_> = resolved.ancestor_chain.iter().map(|a| a.id.0).collect();
        ids.sort_unstable();
        assert_eq!(ids, [1, 2, 3]);
    }

    #[test]
    fn self_parented_group_terminates() {
        let s = ArenaStore::<Genealogy>::new();
        s.insert_group(family(1, Some("A"), Some(1))).unwrap();
        s.insert_member(relation(10, "R10", "son", Some(1))).unwrap();
        let resolved = resolver(s).resolve_target("R10").unwrap();
        assert_eq!(resolved.ancestor_chain.len(), 1);
    }

    #[test]
    fn dangling_parent_ends_walk() {
        let s = ArenaStore::<Genealogy>::new();
        s.insert_group(family(2, Some("B"), Some(99))).unwrap();
        s.insert_member(relation(10, "R10", "son", Some(2))).unwrap();
        let resolved = resolver(s).resolve_target("R10").unwrap();
        assert_eq!(resolved.ancestor_chain.len(), 1);
        assert_eq!(resolved.ancestor_chain[0].id, NodeId(2));
    }

    #[test]
    fn max_depth_bounds_the_walk() {
        let s = ArenaStore::<Genealogy>::new();
        s.insert_group(family(1, Some("G1"), None)).unwrap();
        for id in 2..=10 {
            s.insert_group(family(id, Some(&format!("G{id}")), Some(id - 1)))
                .unwrap();
        }
        s.insert_member(relation(100, "R", "son", Some(10))).unwrap();
        let r: LineageResolver<Genealogy, _> = LineageResolver::new(
            s,
            LineageConfig {
                eager_depth: 2,
                max_depth: 4,
            },
        );
        let chain: Vec<_> = r
            .resolve_target("R")
            .unwrap()
            .ancestor_chain
            .iter()
            .map(|a| a.id.0)
            .collect();
        assert_eq!(chain, [7, 8, 9, 10]);
    }

    /// Counts ancestor batch fetches.
    struct CountingStore {
        inner: ArenaStore<Genealogy>,
        batches: AtomicUsize,
    }

    impl LineageStore<Genealogy> for CountingStore {
        fn find_member_by_public_id(&self, id: &str) -> Result<Option<Relation>, StoreError> {
            self.inner.find_member_by_public_id(id)
        }

        fn find_member_by_public_id_and_relationship(
            &self,
            id: &str,
            rel: &str,
        ) -> Result<Option<Relation>, StoreError> {
            self.inner.find_member_by_public_id_and_relationship(id, rel)
        }

        fn find_member(&self, id: NodeId) -> Result<Option<Relation>, StoreError> {
            self.inner.find_member(id)
        }

        fn all_members_with_groups(&self) -> Result<Vec<(Relation, Option<Family>)>, StoreError> {
            self.inner.all_members_with_groups()
        }

        fn find_group_with_children(
            &self,
            id: NodeId,
        ) -> Result<Option<GroupWithChildren<Genealogy>>, StoreError> {
            self.inner.find_group_with_children(id)
        }

        fn find_group_with_ancestors(
            &self,
            id: NodeId,
            depth: usize,
        ) -> Result<Vec<Family>, StoreError> {
            self.batches.fetch_add(1, Ordering::SeqCst);
            self.inner.find_group_with_ancestors(id, depth)
        }

        fn find_group_by_public_id(&self, id: &str) -> Result<Option<Family>, StoreError> {
            self.inner.find_group_by_public_id(id)
        }

        fn find_child_groups(&self, id: NodeId) -> Result<Vec<Family>, StoreError> {
            self.inner.find_child_groups(id)
        }
    }

    #[test]
    fn deep_chains_fetch_one_batch_at_a_time() {
        let s = ArenaStore::<Genealogy>::new();
        s.insert_group(family(1, Some("G1"), None)).unwrap();
        for id in 2..=8 {
            s.insert_group(family(id, Some(&format!("G{id}")), Some(id - 1)))
                .unwrap();
        }
        s.insert_member(relation(100, "R", "son", Some(8))).unwrap();
        let counting = CountingStore {
            inner: s,
            batches: AtomicUsize::new(0),
        };
        let r: LineageResolver<Genealogy, _> = LineageResolver::new(
            &counting,
            LineageConfig {
                eager_depth: 2,
                max_depth: 64,
            },
        );
        let resolved = r.resolve_target("R").unwrap();
        assert_eq!(resolved.ancestor_chain.len(), 8);
        assert_eq!(resolved.ancestor_chain[0].id, NodeId(1));
        // Each batch covers a node plus two ancestors: 8,7,6 / 5,4,3 / 2,1.
        assert_eq!(counting.batches.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn store_failures_propagate() {
        struct Down;
        impl LineageStore<Genealogy> for Down {
            fn find_member_by_public_id(&self, _: &str) -> Result<Option<Relation>, StoreError> {
                Err(StoreError::Unavailable("offline".into()))
            }
            fn find_member_by_public_id_and_relationship(
                &self,
                _: &str,
                _: &str,
            ) -> Result<Option<Relation>, StoreError> {
                Err(StoreError::Unavailable("offline".into()))
            }
            fn find_member(&self, _: NodeId) -> Result<Option<Relation>, StoreError> {
                Err(StoreError::Unavailable("offline".into()))
            }
            fn all_members_with_groups(
                &self,
            ) -> Result<Vec<(Relation, Option<Family>)>, StoreError> {
                Err(StoreError::Unavailable("offline".into()))
            }
            fn find_group_with_children(
                &self,
                _: NodeId,
            ) -> Result<Option<GroupWithChildren<Genealogy>>, StoreError> {
                Err(StoreError::Unavailable("offline".into()))
            }
            fn find_group_with_ancestors(
                &self,
                _: NodeId,
                _: usize,
            ) -> Result<Vec<Family>, StoreError> {
                Err(StoreError::Unavailable("offline".into()))
            }
            fn find_group_by_public_id(&self, _: &str) -> Result<Option<Family>, StoreError> {
                Err(StoreError::Unavailable("offline".into()))
            }
            fn find_child_groups(&self, _: NodeId) -> Result<Vec<Family>, StoreError> {
                Err(StoreError::Unavailable("offline".into()))
            }
        }
        let r: LineageResolver<Genealogy, _> = LineageResolver::new(Down, LineageConfig::default());
        assert!(matches!(
            r.resolve_target("x"),
            Err(LineageError::Store(StoreError::Unavailable(_)))
        ));
        assert!(matches!(r.candidate_leaves(), Err(LineageError::Store(_))));
    }

    #[test]
    fn proof_triple_uses_parent_public_id() {
        let r = resolver(store());
        assert_eq!(
            r.select_proof_triple("R10", "son").unwrap(),
            LeafRecord::new("F3", "son", "R10")
        );
        assert!(matches!(
            r.select_proof_triple("R10", "father"),
            Err(LineageError::NotFound(_))
        ));
    }

    #[test]
    fn unprovable_members_are_invalid_state() {
        let s = store();
        s.insert_group(family(5, None, None)).unwrap();
        s.insert_member(relation(30, "R30", "son", Some(5))).unwrap();
        s.insert_member(relation(31, "R31", "son", None)).unwrap();
        s.insert_member(relation(32, "R32", "son", Some(77))).unwrap();
        s.insert_member(relation(33, "R33", " ", Some(1))).unwrap();
        let r = resolver(s);
        for (id, rel) in [("R30", "son"), ("R31", "son"), ("R32", "son"), ("R33", " ")] {
            assert!(
                matches!(
                    r.select_proof_triple(id, rel),
                    Err(LineageError::InvalidState(_))
                ),
                "{id} should be unprovable"
            );
        }
    }

    #[test]
    fn candidate_leaves_skip_unprovable_members() {
        let s = store();
        s.insert_group(family(5, None, None)).unwrap();
        s.insert_member(relation(30, "R30", "son", Some(5))).unwrap();
        s.insert_member(relation(31, "R31", "son", None)).unwrap();
        s.insert_member(relation(32, "", "son", Some(1))).unwrap();
        let leaves = resolver(s).candidate_leaves().unwrap();
        assert_eq!(
            leaves,
            vec![
                LeafRecord::new("F3", "son", "R10"),
                LeafRecord::new("F3", "daughter", "R11"),
                LeafRecord::new("F2", "father", "R12"),
                LeafRecord::new("F1", "grandfather", "R13"),
            ]
        );
    }

    #[test]
    fn group_identifier_resolves_to_head_then_first_member() {
        let s = store();
        let mut head = relation(14, "R14", "mother", Some(3));
        head.is_family_head = true;
        s.insert_member(head).unwrap();
        let r = resolver(s);
        assert_eq!(r.resolve_member("F3").unwrap().relation_id, "R14");
        assert_eq!(r.resolve_member("F2").unwrap().relation_id, "R12");
        assert_eq!(r.resolve_member("R11").unwrap().relation_id, "R11");
    }

    #[test]
    fn empty_group_falls_back_to_descendants() {
        let s = ArenaStore::<Genealogy>::new();
        s.insert_group(family(1, Some("ROOT"), None)).unwrap();
        s.insert_group(family(2, Some("MID"), Some(1))).unwrap();
        s.insert_group(family(3, Some("LEAF"), Some(2))).unwrap();
        s.insert_member(relation(10, "R10", "son", Some(3))).unwrap();
        let r = resolver(s);
        assert_eq!(r.resolve_member("ROOT").unwrap().relation_id, "R10");
        let resolved = r.resolve_lineage("ROOT").unwrap();
        assert_eq!(resolved.ancestor_chain.len(), 3);
    }

    #[test]
    fn descendant_search_finishes_one_branch_first() {
        let s = ArenaStore::<Genealogy>::new();
        s.insert_group(family(1, Some("ROOT"), None)).unwrap();
        s.insert_group(family(2, Some("LEFT"), Some(1))).unwrap();
        s.insert_group(family(3, Some("RIGHT"), Some(1))).unwrap();
        s.insert_group(family(4, Some("LEFT-KID"), Some(2))).unwrap();
        s.insert_member(relation(30, "R30", "son", Some(3))).unwrap();
        s.insert_member(relation(40, "R40", "son", Some(4))).unwrap();
        assert_eq!(resolver(s).resolve_member("ROOT").unwrap().relation_id, "R40");
    }

    #[test]
    fn memberless_subtree_is_not_found() {
        let s = ArenaStore::<Genealogy>::new();
        s.insert_group(family(1, Some("ROOT"), None)).unwrap();
        s.insert_group(family(2, Some("KID"), Some(1))).unwrap();
        assert!(matches!(
            resolver(s).resolve_member("ROOT"),
            Err(LineageError::NotFound(_))
        ));
    }

    #[test]
    fn clinical_family_shares_the_resolver() {
        let s = ArenaStore::<Clinical>::new();
        s.insert_group(Hospital {
            id: NodeId(1),
            hospital_id: Some("H1".into()),
            name: "General".into(),
            location: None,
        })
        .unwrap();
        s.insert_member(Patient {
            id: NodeId(2),
            patient_id: "P1".into(),
            first_name: "Kofi".into(),
            last_name: "Mensah".into(),
            treatment: "Burn".into(),
            hospital_id: Some(NodeId(1)),
        })
        .unwrap();
        let r: LineageResolver<Clinical, _> = LineageResolver::new(s, LineageConfig::default());
        assert_eq!(
            r.select_proof_triple("P1", "Burn").unwrap(),
            LeafRecord::new("H1", "Burn", "P1")
        );
        let resolved = r.resolve_target("P1").unwrap();
        assert_eq!(resolved.ancestor_chain.len(), 1);
        assert_eq!(resolved.ancestor_chain[0].name, "General");
    }

    #[test]
    fn filter_drops_blank_fields() {
        let kept = filter_leaf_records(vec![
            LeafRecord::new("A", "son", "B"),
            LeafRecord::new("A", "son", ""),
            LeafRecord::new("", "son", "B"),
        ]);
        assert_eq!(kept, vec![LeafRecord::new("A", "son", "B")]);
    }

    /// Parent links `parents[i]` for group `i + 1`; indices past the end are
    /// dangling references.
    fn arbitrary_hierarchy() -> impl Strategy<Value = (Vec<Option<usize>>, usize)> {
        proptest::collection::vec(proptest::option::of(0usize..14), 1..12)
            .prop_flat_map(|parents| {
                let n = parents.len();
                (Just(parents), 0..n)
            })
    }

    proptest! {
        /// The walk terminates on any parent graph, cycles included, and
        /// returns each group at most once following real parent links.
        #[test]
        fn ancestor_walk_is_cycle_safe((parents, target) in arbitrary_hierarchy(), eager in 0usize..4) {
            let s = ArenaStore::<Genealogy>::new();
            for (i, parent) in parents.iter().enumerate() {
                let id = i as u64 + 1;
                let public = format!("F{id}");
                s.insert_group(family(id, Some(&public), parent.map(|p| p as u64 + 1)))
                    .unwrap();
            }
            s.insert_member(relation(100, "R", "son", Some(target as u64 + 1))).unwrap();

            let config = LineageConfig { eager_depth: eager, max_depth: DEFAULT_MAX_DEPTH };
            let r: LineageResolver<Genealogy, _> = LineageResolver::new(s, config);
            let chain: Vec<u64> = r
                .resolve_target("R")
                .unwrap()
                .ancestor_chain
                .iter()
                .map(|a| a.id.0)
                .collect();

            prop_assert!(!chain.is_empty());
            prop_assert!(chain.len() <= parents.len());
            let unique: HashSet<_> = chain.iter().collect();
            prop_assert_eq!(unique.len(), chain.len());
            prop_assert_eq!(*chain.last().unwrap(), target as u64 + 1);
            for pair in chain.windows(2) {
                let child = (pair[1] - 1) as usize;
                prop_assert_eq!(parents[child].map(|p| p as u64 + 1), Some(pair[0]));
            }

            // In a forest the walk always reaches a root.
            if parents.iter().enumerate().all(|(i, p)| p.map_or(true, |p| p < i)) {
                prop_assert_eq!(parents[(chain[0] - 1) as usize], None);
            }
        }
    }
}
