//! # Relationship Graph Model
//!
//! Clean DTOs for the resident relationship graph.
//! These types cross every boundary: storage ↔ engine ↔ caller.
//!
//! Design rule: this module is pure data — no I/O, no state, no async.

pub mod edge;
pub mod kind;

pub use edge::{EdgeId, RelationshipEdge, ResidentId};
pub use kind::{RelationFamily, RelationKind};
