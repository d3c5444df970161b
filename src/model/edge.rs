//! Relationship edge between two residents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RelationKind;

/// Opaque resident identifier.
///
/// Residents are owned by an external directory; the engine never reads or
/// mutates resident attributes, it only threads identifiers through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResidentId(pub u64);

impl std::fmt::Display for ResidentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque edge identifier, assigned by the store at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub u64);

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A directed, typed relationship between two residents.
///
/// `(source, target, kind)` reads "source plays the role `kind` toward
/// target": `(A, B, Father)` means A is B's father. Edges are immutable
/// once created — changing a relationship is delete-then-recreate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipEdge {
    pub id: EdgeId,
    pub source: ResidentId,
    pub target: ResidentId,
    pub kind: RelationKind,
    pub created_at: DateTime<Utc>,
}

impl RelationshipEdge {
    pub fn new(id: EdgeId, source: ResidentId, target: ResidentId, kind: RelationKind) -> Self {
        Self {
            id,
            source,
            target,
            kind,
            created_at: Utc::now(),
        }
    }
}
