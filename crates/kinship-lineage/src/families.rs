//! # Record Families
//!
//! Concrete group/member pairs. Each family is a zero-sized marker binding
//! the two record types; the resolver and engine code is shared.

use kinship_core::NodeId;
use serde::{Deserialize, Serialize};

use crate::entity::{AncestorSummary, EntityFamily, GroupEntity, MemberEntity, MemberSummary};

fn full_name(first: &str, last: &str) -> String {
    format!("{first} {last}").trim().to_string()
}

// ---------------------------------------------------------------------------
// Genealogy: families and their relations
// ---------------------------------------------------------------------------

/// A family node. Families nest through `parent_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Family {
    pub id: NodeId,
    #[serde(default)]
    pub family_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    /// Role of this family within its parent, e.g. `"paternal"`.
    #[serde(default)]
    pub relationship: Option<String>,
    #[serde(default)]
    pub parent_id: Option<NodeId>,
}

/// A person recorded under a family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub id: NodeId,
    pub relation_id: String,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub relationship: String,
    #[serde(default)]
    pub family_id: Option<NodeId>,
    #[serde(default)]
    pub is_family_head: bool,
}

impl GroupEntity for Family {
    fn id(&self) -> NodeId {
        self.id
    }

    fn public_id(&self) -> Option<&str> {
        self.family_id.as_deref()
    }

    fn parent_id(&self) -> Option<NodeId> {
        self.parent_id
    }

    fn summary(&self) -> AncestorSummary {
        AncestorSummary {
            id: self.id,
            public_id: self.family_id.clone(),
            name: self.name.clone(),
            location: self.location.clone(),
            role: self.relationship.clone(),
        }
    }
}

impl MemberEntity for Relation {
    fn id(&self) -> NodeId {
        self.id
    }

    fn public_id(&self) -> &str {
        &self.relation_id
    }

    fn relationship(&self) -> &str {
        &self.relationship
    }

    fn group_id(&self) -> Option<NodeId> {
        self.family_id
    }

    fn is_head(&self) -> bool {
        self.is_family_head
    }

    fn summary(&self) -> MemberSummary {
        MemberSummary {
            id: self.id,
            public_id: self.relation_id.clone(),
            name: full_name(&self.first_name, &self.last_name),
            role: self.relationship.clone(),
        }
    }
}

/// Family lineages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Genealogy;

impl EntityFamily for Genealogy {
    type Group = Family;
    type Member = Relation;
    const NAME: &'static str = "genealogy";
}

// ---------------------------------------------------------------------------
// Civil: countries and citizens
// ---------------------------------------------------------------------------

/// A country or region. Regions nest under countries through `parent_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: NodeId,
    #[serde(default)]
    pub country_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub relationship: Option<String>,
    #[serde(default)]
    pub parent_id: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citizen {
    pub id: NodeId,
    pub citizen_id: String,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub relationship: String,
    #[serde(default)]
    pub country_id: Option<NodeId>,
}

impl GroupEntity for Country {
    fn id(&self) -> NodeId {
        self.id
    }

    fn public_id(&self) -> Option<&str> {
        self.country_id.as_deref()
    }

    fn parent_id(&self) -> Option<NodeId> {
        self.parent_id
    }

    fn summary(&self) -> AncestorSummary {
        AncestorSummary {
            id: self.id,
            public_id: self.country_id.clone(),
            name: self.name.clone(),
            location: self.location.clone(),
            role: self.relationship.clone(),
        }
    }
}

impl MemberEntity for Citizen {
    fn id(&self) -> NodeId {
        self.id
    }

    fn public_id(&self) -> &str {
        &self.citizen_id
    }

    fn relationship(&self) -> &str {
        &self.relationship
    }

    fn group_id(&self) -> Option<NodeId> {
        self.country_id
    }

    fn summary(&self) -> MemberSummary {
        MemberSummary {
            id: self.id,
            public_id: self.citizen_id.clone(),
            name: full_name(&self.first_name, &self.last_name),
            role: self.relationship.clone(),
        }
    }
}

/// Citizenship lineages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Civil;

impl EntityFamily for Civil {
    type Group = Country;
    type Member = Citizen;
    const NAME: &'static str = "civil";
}

// ---------------------------------------------------------------------------
// Clinical: hospitals and patients
// ---------------------------------------------------------------------------

/// A hospital. Hospitals do not nest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hospital {
    pub id: NodeId,
    #[serde(default)]
    pub hospital_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: NodeId,
    pub patient_id: String,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// Committed as the leaf relation.
    pub treatment: String,
    #[serde(default)]
    pub hospital_id: Option<NodeId>,
}

impl GroupEntity for Hospital {
    fn id(&self) -> NodeId {
        self.id
    }

    fn public_id(&self) -> Option<&str> {
        self.hospital_id.as_deref()
    }

    fn parent_id(&self) -> Option<NodeId> {
        None
    }

    fn summary(&self) -> AncestorSummary {
        AncestorSummary {
            id: self.id,
            public_id: self.hospital_id.clone(),
            name: self.name.clone(),
            location: self.location.clone(),
            role: None,
        }
    }
}

impl MemberEntity for Patient {
    fn id(&self) -> NodeId {
        self.id
    }

    fn public_id(&self) -> &str {
        &self.patient_id
    }

    fn relationship(&self) -> &str {
        &self.treatment
    }

    fn group_id(&self) -> Option<NodeId> {
        self.hospital_id
    }

    fn summary(&self) -> MemberSummary {
        MemberSummary {
            id: self.id,
            public_id: self.patient_id.clone(),
            name: full_name(&self.first_name, &self.last_name),
            role: self.treatment.clone(),
        }
    }
}

/// Treatment records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Clinical;

impl EntityFamily for Clinical {
    type Group = Hospital;
    type Member = Patient;
    const NAME: &'static str = "clinical";
}
