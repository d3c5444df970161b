//! # Relationship Inference Engine
//!
//! Orchestrates `add_relationship` / `delete_relationship` against a
//! [`RelationshipStore`], maintaining reciprocal edges and running the
//! transitive inference that keeps the family graph consistent:
//!
//! - **Reciprocity**: `(A, B, father)` gets a `(B, A, child)` companion.
//! - **Parent propagation**: a new parent-child edge makes the child a
//!   sibling of the parent's other children, and gives the child's existing
//!   siblings the same parent.
//! - **Sibling closure**: a new sibling edge equalizes the two residents'
//!   parent sets.
//!
//! ## Failure policy
//!
//! There is no transaction around a mutation; every store call is an
//! independent round-trip. The direct-edge insert is the **only fatal step**
//! in `add_relationship` — everything after it (reciprocal create, every
//! inference branch, and their recursive sub-steps) routes through
//! [`best_effort`], which logs the failure and continues. A "successful"
//! call can therefore leave the graph partially consistent; callers must
//! tolerate that.
//!
//! ## Concurrency
//!
//! The engine performs no locking. Two concurrent `add_relationship` calls
//! for the same `(source, target, kind)` can both pass the idempotency check
//! before either writes; whether that produces a duplicate row or a
//! constraint violation depends on the store. Correctness under concurrency
//! requires a store-side uniqueness constraint on `(source, target, kind)`
//! (as `MemoryStore` enforces) or external mutual exclusion keyed by the
//! resident pair.

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;

use tracing::{debug, warn};

use crate::model::{EdgeId, RelationFamily, RelationKind, RelationshipEdge, ResidentId};
use crate::storage::{MemoryStore, RelationshipStore};
use crate::{Error, Result};

/// Hard ceiling on recursive inference depth. The visited set already
/// guarantees termination; the cap bounds pathological chains on top.
pub const MAX_INFERENCE_DEPTH: usize = 16;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Log-and-continue executor for the non-fatal steps.
///
/// Keeping every swallowed failure on this one path makes the asymmetric
/// fatal/best-effort policy auditable: if a step's failure doesn't go
/// through here, it aborts the operation.
fn best_effort(step: &'static str, result: Result<()>) {
    if let Err(error) = result {
        warn!(step, %error, "best-effort step failed; continuing");
    }
}

/// Per-invocation recursion state.
///
/// `visited` is keyed by `(source, target, kind)` so the same edge is never
/// attempted twice within one call tree, which is what makes the mutually
/// recursive closure/propagation steps terminate.
struct InferenceContext {
    visited: HashSet<(ResidentId, ResidentId, RelationKind)>,
    depth: usize,
}

impl InferenceContext {
    fn new() -> Self {
        Self {
            visited: HashSet::new(),
            depth: 0,
        }
    }
}

/// The engine. Wraps a store; holds no other state.
pub struct InferenceEngine<S: RelationshipStore> {
    store: S,
}

impl<S: RelationshipStore> InferenceEngine<S> {
    /// Create an engine over the given store.
    pub fn with_store(store: S) -> Self {
        Self { store }
    }

    /// Access the underlying store (for callers that need raw reads).
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Add a relationship edge and derive everything that follows from it.
    ///
    /// `kind` is parsed case-insensitively against the fixed vocabulary;
    /// unknown or empty strings and self-edges are a [`Error::Validation`].
    /// An exact `(source, target, kind)` duplicate returns
    /// [`Error::DuplicateRelationship`] without mutating anything. Returns
    /// the directly created edge; inferred edges are ordinary edges,
    /// indistinguishable from directly requested ones.
    pub async fn add_relationship(
        &self,
        source: ResidentId,
        target: ResidentId,
        kind: &str,
    ) -> Result<RelationshipEdge> {
        let kind: RelationKind = kind.parse()?;
        if source == target {
            return Err(Error::Validation(format!(
                "resident {source} cannot be in a relationship with themselves"
            )));
        }

        let mut ctx = InferenceContext::new();
        ctx.visited.insert((source, target, kind));
        self.add_internal(&mut ctx, source, target, kind).await
    }

    /// Delete an edge and, best-effort, its reciprocal.
    ///
    /// Edges created by inference when the named edge was added are **not**
    /// retracted; stale inferred edges are expected behavior, not a bug.
    pub async fn delete_relationship(&self, id: EdgeId) -> Result<()> {
        let edge = self
            .store
            .get_edge(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("relationship edge {id}")))?;

        self.store.delete_edge(id).await?;
        debug!(edge = %id, source = %edge.source, target = %edge.target,
               kind = %edge.kind, "deleted relationship edge");

        if let Some(rkind) = edge.kind.reciprocal() {
            best_effort("reciprocal_delete", self.delete_reciprocal(&edge, rkind).await);
        }
        Ok(())
    }

    /// Find and delete the reverse edge of a just-deleted edge, if present.
    async fn delete_reciprocal(&self, edge: &RelationshipEdge, rkind: RelationKind) -> Result<()> {
        if let Some(reciprocal) = self
            .store
            .find_edge(edge.target, edge.source, rkind)
            .await?
        {
            self.store.delete_edge(reciprocal.id).await?;
            debug!(edge = %reciprocal.id, kind = %rkind, "deleted reciprocal edge");
        }
        Ok(())
    }

    // ========================================================================
    // Add pipeline
    // ========================================================================

    /// The shared add pipeline: idempotency check, fatal direct insert,
    /// best-effort reciprocal, best-effort categorized inference.
    ///
    /// Boxed because the inference steps recurse back into it.
    fn add_internal<'a>(
        &'a self,
        ctx: &'a mut InferenceContext,
        source: ResidentId,
        target: ResidentId,
        kind: RelationKind,
    ) -> BoxFuture<'a, Result<RelationshipEdge>> {
        Box::pin(async move {
            // 1. Idempotency check.
            if self.store.find_edge(source, target, kind).await?.is_some() {
                return Err(Error::DuplicateRelationship {
                    edge_source: source,
                    edge_target: target,
                    kind,
                });
            }

            // 2. The direct edge. This is the one fatal step: a failure here
            //    aborts the whole operation untouched.
            let edge = self.store.create_edge(source, target, kind).await?;
            debug!(edge = %edge.id, %source, %target, %kind, "created relationship edge");

            // 3. Reciprocal maintenance. The direct edge stays even if this
            //    fails.
            if let Some(rkind) = kind.reciprocal() {
                best_effort(
                    "reciprocal_create",
                    self.ensure_reciprocal(target, source, rkind).await,
                );
            }

            // 4. Categorized inference, each branch independently best-effort.
            match kind.family() {
                RelationFamily::Sibling => best_effort(
                    "sibling_closure",
                    self.infer_sibling_closure(ctx, source, target).await,
                ),
                RelationFamily::Parent => best_effort(
                    "parent_propagation",
                    self.infer_parent_propagation(ctx, source, target, kind).await,
                ),
                RelationFamily::Child => {
                    // Same propagation with the roles swapped. The caller
                    // named no gendered parent kind, so the parent side is
                    // stamped with the trigger's reciprocal (always Parent).
                    let ptype = kind.reciprocal().unwrap_or(RelationKind::Parent);
                    best_effort(
                        "parent_propagation",
                        self.infer_parent_propagation(ctx, target, source, ptype).await,
                    );
                }
                _ => {}
            }

            // 5. The direct edge is the result, whether or not every
            //    inference sub-step landed.
            Ok(edge)
        })
    }

    /// Create the reverse edge if it is not already present.
    /// A plain store write — reciprocals trigger no further inference.
    async fn ensure_reciprocal(
        &self,
        source: ResidentId,
        target: ResidentId,
        kind: RelationKind,
    ) -> Result<()> {
        if self.store.find_edge(source, target, kind).await?.is_none() {
            self.store.create_edge(source, target, kind).await?;
        }
        Ok(())
    }

    /// Recursively add an inferred edge, with full reciprocity and further
    /// propagation, tolerating the idempotent outcomes.
    async fn ensure_relationship(
        &self,
        ctx: &mut InferenceContext,
        source: ResidentId,
        target: ResidentId,
        kind: RelationKind,
    ) -> Result<()> {
        if source == target {
            return Ok(());
        }
        if !ctx.visited.insert((source, target, kind)) {
            return Ok(());
        }
        if ctx.depth >= MAX_INFERENCE_DEPTH {
            warn!(%source, %target, %kind, "inference depth limit reached; skipping");
            return Ok(());
        }

        ctx.depth += 1;
        let result = self.add_internal(ctx, source, target, kind).await;
        ctx.depth -= 1;

        match result {
            Ok(_) => Ok(()),
            // Already present: the edge we wanted exists, nothing to repair.
            Err(Error::DuplicateRelationship { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }

    // ========================================================================
    // Inference steps
    // ========================================================================

    /// On a new parent-child edge: make the child a sibling of the parent's
    /// other children, and give the child's existing siblings the same
    /// parent (reusing the exact parent kind, e.g. `father` stays `father`).
    async fn infer_parent_propagation(
        &self,
        ctx: &mut InferenceContext,
        parent: ResidentId,
        child: ResidentId,
        parent_kind: RelationKind,
    ) -> Result<()> {
        // a. The parent's other children become the new child's siblings.
        let parent_edges = self.store.edges_from(parent).await?;
        for edge in &parent_edges {
            if edge.kind.family() == RelationFamily::Parent && edge.target != child {
                best_effort(
                    "sibling_pair",
                    self.ensure_relationship(ctx, child, edge.target, RelationKind::Sibling)
                        .await,
                );
            }
        }

        // b. The child's existing siblings get the same parent.
        let child_edges = self.store.edges_from(child).await?;
        for edge in &child_edges {
            if edge.kind.family() == RelationFamily::Sibling && edge.target != parent {
                best_effort(
                    "sibling_parent",
                    self.ensure_relationship(ctx, parent, edge.target, parent_kind)
                        .await,
                );
            }
        }

        Ok(())
    }

    /// On a new sibling edge: equalize the two residents' parent sets. Any
    /// parent present on one side and missing on the other is added to the
    /// missing side through the full recursive add pipeline.
    async fn infer_sibling_closure(
        &self,
        ctx: &mut InferenceContext,
        a: ResidentId,
        b: ResidentId,
    ) -> Result<()> {
        let parents_a = self.parents_of(a).await?;
        let parents_b = self.parents_of(b).await?;

        let ids_a: HashSet<ResidentId> = parents_a.iter().map(|(p, _)| *p).collect();
        let ids_b: HashSet<ResidentId> = parents_b.iter().map(|(p, _)| *p).collect();

        for (parent, kind) in &parents_a {
            if !ids_b.contains(parent) && *parent != b {
                best_effort(
                    "closure_parent",
                    self.ensure_relationship(ctx, *parent, b, *kind).await,
                );
            }
        }
        for (parent, kind) in &parents_b {
            if !ids_a.contains(parent) && *parent != a {
                best_effort(
                    "closure_parent",
                    self.ensure_relationship(ctx, *parent, a, *kind).await,
                );
            }
        }

        Ok(())
    }

    /// A resident's parents, discovered through their outgoing child-family
    /// edges, each paired with the kind to use for the parent-side edge.
    ///
    /// The parent's own forward edge (e.g. `father`) is preferred so the
    /// specific kind survives propagation; when only the child-side edge
    /// exists, the generic reciprocal (`parent`) is used.
    async fn parents_of(&self, resident: ResidentId) -> Result<Vec<(ResidentId, RelationKind)>> {
        let edges = self.store.edges_from(resident).await?;
        let mut parents: Vec<(ResidentId, RelationKind)> = Vec::new();

        for edge in &edges {
            if edge.kind.family() != RelationFamily::Child {
                continue;
            }
            let parent = edge.target;
            if parents.iter().any(|(p, _)| *p == parent) {
                continue;
            }
            let kind = match self.parent_edge_kind(parent, resident).await {
                Ok(Some(kind)) => kind,
                Ok(None) => edge.kind.reciprocal().unwrap_or(RelationKind::Parent),
                Err(error) => {
                    warn!(%parent, child = %resident, %error,
                          "could not resolve parent edge kind; using generic parent");
                    edge.kind.reciprocal().unwrap_or(RelationKind::Parent)
                }
            };
            parents.push((parent, kind));
        }

        Ok(parents)
    }

    /// The kind of the parent's own edge toward the child, if present.
    async fn parent_edge_kind(
        &self,
        parent: ResidentId,
        child: ResidentId,
    ) -> Result<Option<RelationKind>> {
        let edges = self.store.edges_from(parent).await?;
        Ok(edges
            .iter()
            .find(|e| e.target == child && e.kind.family() == RelationFamily::Parent)
            .map(|e| e.kind))
    }
}

impl InferenceEngine<MemoryStore> {
    /// Engine over a fresh in-memory store, for testing and embedding.
    pub fn in_memory() -> Self {
        Self::with_store(MemoryStore::new())
    }
}
