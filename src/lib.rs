//! # kingraph — Relationship Graph Consistency & Inference Engine
//!
//! Maintains a directed, typed graph of family relationships between
//! opaque resident identifiers and derives the edges that must logically
//! follow from ones a caller enters: reciprocals (`father` ↔ `child`),
//! sibling closure, and parent propagation.
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `RelationshipStore` is the contract between the
//!    engine and persistence; residents stay opaque identifiers
//! 2. **Data-driven reciprocity**: the kind → reciprocal mapping is an
//!    immutable table, not control flow
//! 3. **Auditable failure policy**: the direct insert is the one fatal
//!    step; everything after it logs-and-continues through a single
//!    best-effort executor
//!
//! ## Quick Start
//!
//! ```rust
//! use kingraph::{InferenceEngine, RelationKind, RelationshipStore, ResidentId};
//!
//! # async fn example() -> kingraph::Result<()> {
//! let engine = InferenceEngine::in_memory();
//!
//! let (ana, ben) = (ResidentId(1), ResidentId(2));
//! engine.add_relationship(ana, ben, "father").await?;
//!
//! // The reciprocal edge was derived automatically.
//! let back = engine
//!     .store()
//!     .find_edge(ben, ana, RelationKind::Child)
//!     .await?;
//! assert!(back.is_some());
//! # Ok(())
//! # }
//! ```
//!
//! ## What the engine does not do
//!
//! No resident CRUD or search, no person-level semantic validation
//! (biological plausibility, age ordering), no query/traversal API beyond
//! what inference needs, and no transaction around a multi-step mutation —
//! see the `engine` module docs for the partial-failure contract.

// ============================================================================
// Modules
// ============================================================================

pub mod engine;
pub mod model;
pub mod reciprocity;
pub mod storage;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{EdgeId, RelationFamily, RelationKind, RelationshipEdge, ResidentId};

// ============================================================================
// Re-exports: Storage
// ============================================================================

pub use storage::{MemoryStore, RelationshipStore};

// ============================================================================
// Re-exports: Engine
// ============================================================================

pub use engine::InferenceEngine;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The exact `(source, target, kind)` edge already exists.
    ///
    /// The endpoint fields avoid the name `source`, which thiserror would
    /// otherwise wire up as the error's `source()` cause.
    #[error("relationship {kind} from {edge_source} to {edge_target} already exists")]
    DuplicateRelationship {
        edge_source: ResidentId,
        edge_target: ResidentId,
        kind: RelationKind,
    },

    #[error("not found: {0}")]
    NotFound(String),

    /// Transient store/I/O failure on any round-trip.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Malformed input: unknown/empty relationship type, self-edge.
    #[error("validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, Error>;
