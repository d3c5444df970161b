//! # Relationship Store Trait
//!
//! The persistence contract the inference engine consumes. The engine issues
//! each call as an independent, sequential round-trip — there is no batch or
//! transaction operation, so a multi-step mutation is not atomic (see the
//! engine docs for what that implies).
//!
//! ## Implementations
//!
//! | Store | Module | Description |
//! |-------|--------|-------------|
//! | `MemoryStore` | `memory` | In-memory reference implementation |
//!
//! Production deployments back this with a hosted relational table keyed by
//! `(id, resident_id, related_resident_id, relationship_type, created_at)`;
//! any store satisfying the trait works.

pub mod memory;

use async_trait::async_trait;

use crate::Result;
use crate::model::{EdgeId, RelationKind, RelationshipEdge, ResidentId};

pub use memory::MemoryStore;

/// Edge persistence, as seen by the engine.
#[async_trait]
pub trait RelationshipStore: Send + Sync + 'static {
    /// Exact-match lookup on `(source, target, kind)`.
    /// Used for idempotency checks before every insert.
    async fn find_edge(
        &self,
        source: ResidentId,
        target: ResidentId,
        kind: RelationKind,
    ) -> Result<Option<RelationshipEdge>>;

    /// All outgoing edges of a resident.
    /// Used to enumerate existing parents, children, and siblings.
    async fn edges_from(&self, source: ResidentId) -> Result<Vec<RelationshipEdge>>;

    /// Insert a new edge and return it with its assigned id.
    ///
    /// The engine has already run its idempotency check, but a store with a
    /// `(source, target, kind)` uniqueness constraint may still reject a
    /// duplicate — that is the store-side half of the double-add race
    /// mitigation — with [`crate::Error::DuplicateRelationship`].
    async fn create_edge(
        &self,
        source: ResidentId,
        target: ResidentId,
        kind: RelationKind,
    ) -> Result<RelationshipEdge>;

    /// Get an edge by id. Returns `None` if not found.
    async fn get_edge(&self, id: EdgeId) -> Result<Option<RelationshipEdge>>;

    /// Delete an edge by id. Returns `true` if it existed.
    async fn delete_edge(&self, id: EdgeId) -> Result<bool>;
}
