//! # Lineage Store
//!
//! The persistence collaborator the resolver reads from, and an in-memory
//! arena implementation backed by a snapshot file.
//!
//! Every lookup returns fully materialized values. The resolver performs no
//! paging and holds no references into the store between calls.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use kinship_core::NodeId;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::entity::{EntityFamily, GroupEntity, MemberEntity};
use crate::error::StoreError;

/// A group with all of its direct members loaded.
#[derive(Debug, Clone)]
pub struct GroupWithChildren<F: EntityFamily> {
    pub group: F::Group,
    pub members: Vec<F::Member>,
}

/// Read-only lookups over one record family.
pub trait LineageStore<F: EntityFamily>: Send + Sync {
    /// Member whose public identifier equals `public_id`.
    fn find_member_by_public_id(&self, public_id: &str) -> Result<Option<F::Member>, StoreError>;

    /// Member matching both public identifier and relationship label.
    fn find_member_by_public_id_and_relationship(
        &self,
        public_id: &str,
        relationship: &str,
    ) -> Result<Option<F::Member>, StoreError>;

    /// Member by internal id.
    fn find_member(&self, id: NodeId) -> Result<Option<F::Member>, StoreError>;

    /// Every member paired with its group, in store order.
    fn all_members_with_groups(&self) -> Result<Vec<(F::Member, Option<F::Group>)>, StoreError>;

    /// A group with its direct members eagerly loaded.
    fn find_group_with_children(
        &self,
        id: NodeId,
    ) -> Result<Option<GroupWithChildren<F>>, StoreError>;

    /// The group `id` followed by up to `depth` of its ancestors,
    /// nearest first. Empty if `id` does not exist.
    fn find_group_with_ancestors(
        &self,
        id: NodeId,
        depth: usize,
    ) -> Result<Vec<F::Group>, StoreError>;

    /// Group whose public identifier equals `public_id`.
    fn find_group_by_public_id(&self, public_id: &str) -> Result<Option<F::Group>, StoreError>;

    /// Direct child groups of `id`.
    fn find_child_groups(&self, id: NodeId) -> Result<Vec<F::Group>, StoreError>;
}

macro_rules! forward_store {
    ($ty:ty) => {
        impl<F: EntityFamily, S: LineageStore<F> + ?Sized> LineageStore<F> for $ty {
            fn find_member_by_public_id(
                &self,
                public_id: &str,
            ) -> Result<Option<F::Member>, StoreError> {
                (**self).find_member_by_public_id(public_id)
            }

            fn find_member_by_public_id_and_relationship(
                &self,
                public_id: &str,
                relationship: &str,
            ) -> Result<Option<F::Member>, StoreError> {
                (**self).find_member_by_public_id_and_relationship(public_id, relationship)
            }

            fn find_member(&self, id: NodeId) -> Result<Option<F::Member>, StoreError> {
                (**self).find_member(id)
            }

            fn all_members_with_groups(
                &self,
            ) -> Result<Vec<(F::Member, Option<F::Group>)>, StoreError> {
                (**self).all_members_with_groups()
            }

            fn find_group_with_children(
                &self,
                id: NodeId,
            ) -> Result<Option<GroupWithChildren<F>>, StoreError> {
                (**self).find_group_with_children(id)
            }

            fn find_group_with_ancestors(
                &self,
                id: NodeId,
                depth: usize,
            ) -> Result<Vec<F::Group>, StoreError> {
                (**self).find_group_with_ancestors(id, depth)
            }

            fn find_group_by_public_id(
                &self,
                public_id: &str,
            ) -> Result<Option<F::Group>, StoreError> {
                (**self).find_group_by_public_id(public_id)
            }

            fn find_child_groups(&self, id: NodeId) -> Result<Vec<F::Group>, StoreError> {
                (**self).find_child_groups(id)
            }
        }
    };
}

forward_store!(&S);
forward_store!(Arc<S>);

// -- Snapshot -----------------------------------------------------------------

/// Serializable dump of one family's records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(serialize = "", deserialize = ""))]
pub struct LineageSnapshot<F: EntityFamily> {
    #[serde(default)]
    pub groups: Vec<F::Group>,
    #[serde(default)]
    pub members: Vec<F::Member>,
}

impl<F: EntityFamily> LineageSnapshot<F> {
    pub fn from_json_str(s: &str) -> Result<Self, StoreError> {
        serde_json::from_str(s).map_err(|e| StoreError::Decode(e.to_string()))
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, StoreError> {
        serde_yaml::from_str(s).map_err(|e| StoreError::Decode(e.to_string()))
    }
}

// -- Arena Store --------------------------------------------------------------

struct Arena<F: EntityFamily> {
    groups: HashMap<NodeId, F::Group>,
    members: BTreeMap<NodeId, F::Member>,
}

/// Thread-safe, cloneable in-memory store indexed by [`NodeId`].
///
/// Members are returned in ascending id order. The lock is `parking_lot`
/// and is never held across calls.
pub struct ArenaStore<F: EntityFamily> {
    inner: Arc<RwLock<Arena<F>>>,
}

impl<F: EntityFamily> Clone for ArenaStore<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<F: EntityFamily> std::fmt::Debug for ArenaStore<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let arena = self.inner.read();
        f.debug_struct("ArenaStore")
            .field("family", &F::NAME)
            .field("groups", &arena.groups.len())
            .field("members", &arena.members.len())
            .finish()
    }
}

impl<F: EntityFamily> Default for ArenaStore<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: EntityFamily> ArenaStore<F> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arena {
                groups: HashMap::new(),
                members: BTreeMap::new(),
            })),
        }
    }

    /// Build a store from a snapshot. Duplicate ids are rejected.
    pub fn from_snapshot(snapshot: LineageSnapshot<F>) -> Result<Self, StoreError> {
        let store = Self::new();
        for group in snapshot.groups {
            store.insert_group(group)?;
        }
        for member in snapshot.members {
            store.insert_member(member)?;
        }
        tracing::debug!(family = F::NAME, ?store, "loaded lineage snapshot");
        Ok(store)
    }

    pub fn insert_group(&self, group: F::Group) -> Result<(), StoreError> {
        let mut arena = self.inner.write();
        if arena.groups.contains_key(&group.id()) {
            return Err(StoreError::Conflict(format!("group {}", group.id())));
        }
        arena.groups.insert(group.id(), group);
        Ok(())
    }

    pub fn insert_member(&self, member: F::Member) -> Result<(), StoreError> {
        let mut arena = self.inner.write();
        if arena.members.contains_key(&member.id()) {
            return Err(StoreError::Conflict(format!("member {}", member.id())));
        }
        arena.members.insert(member.id(), member);
        Ok(())
    }

    pub fn snapshot(&self) -> LineageSnapshot<F> {
        let arena = self.inner.read();
        let mut groups: Vec<_> = arena.groups.values().cloned().collect();
        groups.sort_by_key(|g| g.id());
        LineageSnapshot {
            groups,
            members: arena.members.values().cloned().collect(),
        }
    }

    pub fn group_count(&self) -> usize {
        self.inner.read().groups.len()
    }

    pub fn member_count(&self) -> usize {
        self.inner.read().members.len()
    }
}

impl<F: EntityFamily> LineageStore<F> for ArenaStore<F> {
    fn find_member_by_public_id(&self, public_id: &str) -> Result<Option<F::Member>, StoreError> {
        let arena = self.inner.read();
        Ok(arena
            .members
            .values()
            .find(|m| m.public_id() == public_id)
            .cloned())
    }

    fn find_member_by_public_id_and_relationship(
        &self,
        public_id: &str,
        relationship: &str,
    ) -> Result<Option<F::Member>, StoreError> {
        let arena = self.inner.read();
        Ok(arena
            .members
            .values()
            .find(|m| m.public_id() == public_id && m.relationship() == relationship)
            .cloned())
    }

    fn find_member(&self, id: NodeId) -> Result<Option<F::Member>, StoreError> {
        Ok(self.inner.read().members.get(&id).cloned())
    }

    fn all_members_with_groups(&self) -> Result<Vec<(F::Member, Option<F::Group>)>, StoreError> {
        let arena = self.inner.read();
        Ok(arena
            .members
            .values()
            .map(|m| {
                let group = m.group_id().and_then(|g| arena.groups.get(&g)).cloned();
                (m.clone(), group)
            })
            .collect())
    }

    fn find_group_with_children(
        &self,
        id: NodeId,
    ) -> Result<Option<GroupWithChildren<F>>, StoreError> {
        let arena = self.inner.read();
        Ok(arena.groups.get(&id).map(|group| GroupWithChildren {
            group: group.clone(),
            members: arena
                .members
                .values()
                .filter(|m| m.group_id() == Some(id))
                .cloned()
                .collect(),
        }))
    }

    fn find_group_with_ancestors(
        &self,
        id: NodeId,
        depth: usize,
    ) -> Result<Vec<F::Group>, StoreError> {
        let arena = self.inner.read();
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if out.len() > depth || !seen.insert(current) {
                break;
            }
            match arena.groups.get(&current) {
                Some(group) => {
                    cursor = group.parent_id();
                    out.push(group.clone());
                }
                None => break,
            }
        }
        Ok(out)
    }

    fn find_group_by_public_id(&self, public_id: &str) -> Result<Option<F::Group>, StoreError> {
        let arena = self.inner.read();
        let mut matches: Vec<_> = arena
            .groups
            .values()
            .filter(|g| g.public_id() == Some(public_id))
            .collect();
        matches.sort_by_key(|g| g.id());
        Ok(matches.first().map(|g| (*g).clone()))
    }

    fn find_child_groups(&self, id: NodeId) -> Result<Vec<F::Group>, StoreError> {
        let arena = self.inner.read();
        let mut children: Vec<_> = arena
            .groups
            .values()
            .filter(|g| g.parent_id() == Some(id))
            .cloned()
            .collect();
        children.sort_by_key(|g| g.id());
        Ok(children)
    }
}
