//! # Entity Abstraction
//!
//! The traits every record family implements, and the summaries the
//! resolver returns for ancestors and siblings.

use std::fmt::Debug;

use kinship_core::{LeafRecord, NodeId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A node in the self-referential group hierarchy.
pub trait GroupEntity: Debug + Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    fn id(&self) -> NodeId;

    /// The identifier committed as `ancestor_id`. Stored records may lack one.
    fn public_id(&self) -> Option<&str>;

    /// Weak back-reference to the parent group.
    fn parent_id(&self) -> Option<NodeId>;

    fn summary(&self) -> AncestorSummary;
}

/// A leaf-level record attached to at most one group.
pub trait MemberEntity: Debug + Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    fn id(&self) -> NodeId;

    /// The identifier committed as `descendant_id`.
    fn public_id(&self) -> &str;

    /// The label committed as `relation`.
    fn relationship(&self) -> &str;

    fn group_id(&self) -> Option<NodeId>;

    /// Whether this member represents its group when the group itself is
    /// the lookup target.
    fn is_head(&self) -> bool {
        false
    }

    fn summary(&self) -> MemberSummary;
}

/// Binds a group type to a member type and maps members to leaf triples.
pub trait EntityFamily: Debug + Clone + Send + Sync + 'static {
    type Group: GroupEntity;
    type Member: MemberEntity;

    /// Short family name used in logs.
    const NAME: &'static str;

    /// The leaf committed for `member` under `group`.
    ///
    /// `None` when the group has no public identifier. Fields are trimmed;
    /// emptiness is checked by the caller.
    fn to_leaf_triple(member: &Self::Member, group: &Self::Group) -> Option<LeafRecord> {
        let ancestor = group.public_id()?;
        Some(LeafRecord::new(ancestor, member.relationship(), member.public_id()).normalized())
    }
}

/// One entry of an ancestor chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AncestorSummary {
    pub id: NodeId,
    pub public_id: Option<String>,
    pub name: String,
    pub location: Option<String>,
    pub role: Option<String>,
}

/// One sibling of a resolved target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSummary {
    pub id: NodeId,
    pub public_id: String,
    pub name: String,
    pub role: String,
}
