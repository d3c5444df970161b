//! In-memory relationship store.
//!
//! This is the reference implementation of `RelationshipStore`.
//! It uses simple HashMaps protected by RwLock.
//!
//! ## Limitations
//!
//! - **No persistence**: everything lives in process memory.
//! - **Per-collection locks**: individual operations are serialized, but a
//!   multi-step engine mutation is NOT atomic — which is exactly the
//!   environment the engine is specified against.
//!
//! It does enforce the `(source, target, kind)` uniqueness constraint, so a
//! double-add race surfaces as `DuplicateRelationship` rather than a
//! duplicate row.
//!
//! Use this store for:
//! - Testing the inference engine
//! - Embedding kingraph in applications that don't need persistence

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::RelationshipStore;
use crate::model::{EdgeId, RelationKind, RelationshipEdge, ResidentId};
use crate::{Error, Result};

/// In-memory edge storage.
pub struct MemoryStore {
    inner: Arc<MemoryInner>,
}

struct MemoryInner {
    edges: RwLock<HashMap<EdgeId, RelationshipEdge>>,
    /// resident id → outgoing edge ids
    by_source: RwLock<HashMap<ResidentId, Vec<EdgeId>>>,
    next_edge_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MemoryInner {
                edges: RwLock::new(HashMap::new()),
                by_source: RwLock::new(HashMap::new()),
                next_edge_id: AtomicU64::new(1),
            }),
        }
    }

    /// Total number of stored edges.
    pub fn edge_count(&self) -> usize {
        self.inner.edges.read().len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RelationshipStore for MemoryStore {
    async fn find_edge(
        &self,
        source: ResidentId,
        target: ResidentId,
        kind: RelationKind,
    ) -> Result<Option<RelationshipEdge>> {
        let by_source = self.inner.by_source.read();
        let edges = self.inner.edges.read();

        let ids = by_source.get(&source).map(Vec::as_slice).unwrap_or(&[]);
        Ok(ids
            .iter()
            .filter_map(|id| edges.get(id))
            .find(|e| e.target == target && e.kind == kind)
            .cloned())
    }

    async fn edges_from(&self, source: ResidentId) -> Result<Vec<RelationshipEdge>> {
        let by_source = self.inner.by_source.read();
        let edges = self.inner.edges.read();

        let ids = by_source.get(&source).cloned().unwrap_or_default();
        Ok(ids.iter().filter_map(|id| edges.get(id).cloned()).collect())
    }

    async fn create_edge(
        &self,
        source: ResidentId,
        target: ResidentId,
        kind: RelationKind,
    ) -> Result<RelationshipEdge> {
        // Uniqueness constraint on (source, target, kind). Taking the write
        // locks up front makes check-then-insert a single critical section.
        // Lock order is by_source then edges, everywhere.
        let mut by_source = self.inner.by_source.write();
        let mut edges = self.inner.edges.write();

        let existing = by_source.get(&source).map(Vec::as_slice).unwrap_or(&[]);
        if existing
            .iter()
            .filter_map(|id| edges.get(id))
            .any(|e| e.target == target && e.kind == kind)
        {
            return Err(Error::DuplicateRelationship {
                edge_source: source,
                edge_target: target,
                kind,
            });
        }

        let id = EdgeId(self.inner.next_edge_id.fetch_add(1, Ordering::Relaxed));
        let edge = RelationshipEdge::new(id, source, target, kind);

        edges.insert(id, edge.clone());
        by_source.entry(source).or_default().push(id);

        Ok(edge)
    }

    async fn get_edge(&self, id: EdgeId) -> Result<Option<RelationshipEdge>> {
        Ok(self.inner.edges.read().get(&id).cloned())
    }

    async fn delete_edge(&self, id: EdgeId) -> Result<bool> {
        let mut by_source = self.inner.by_source.write();
        let mut edges = self.inner.edges.write();

        let removed = edges.remove(&id);
        if let Some(edge) = &removed {
            if let Some(ids) = by_source.get_mut(&edge.source) {
                ids.retain(|eid| *eid != id);
            }
        }
        Ok(removed.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_find_edge() {
        let store = MemoryStore::new();
        let (a, b) = (ResidentId(1), ResidentId(2));

        let created = store.create_edge(a, b, RelationKind::Father).await.unwrap();
        let found = store
            .find_edge(a, b, RelationKind::Father)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(found.id, created.id);
        assert_eq!(found.source, a);
        assert_eq!(found.target, b);
        assert_eq!(found.kind, RelationKind::Father);
    }

    #[tokio::test]
    async fn test_find_edge_is_exact_match() {
        let store = MemoryStore::new();
        let (a, b) = (ResidentId(1), ResidentId(2));
        store.create_edge(a, b, RelationKind::Father).await.unwrap();

        // Different kind, reversed direction: no match.
        assert!(
            store
                .find_edge(a, b, RelationKind::Mother)
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            store
                .find_edge(b, a, RelationKind::Father)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_uniqueness_constraint() {
        let store = MemoryStore::new();
        let (a, b) = (ResidentId(1), ResidentId(2));

        store.create_edge(a, b, RelationKind::Spouse).await.unwrap();
        let err = store
            .create_edge(a, b, RelationKind::Spouse)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::DuplicateRelationship { .. }));
        assert_eq!(store.edge_count(), 1);
    }

    #[tokio::test]
    async fn test_edges_from_only_returns_outgoing() {
        let store = MemoryStore::new();
        let (a, b, c) = (ResidentId(1), ResidentId(2), ResidentId(3));

        store.create_edge(a, b, RelationKind::Father).await.unwrap();
        store.create_edge(a, c, RelationKind::Father).await.unwrap();
        store.create_edge(b, a, RelationKind::Child).await.unwrap();

        let from_a = store.edges_from(a).await.unwrap();
        assert_eq!(from_a.len(), 2);
        assert!(from_a.iter().all(|e| e.source == a));

        let from_c = store.edges_from(c).await.unwrap();
        assert!(from_c.is_empty());
    }

    #[tokio::test]
    async fn test_delete_edge() {
        let store = MemoryStore::new();
        let (a, b) = (ResidentId(1), ResidentId(2));

        let edge = store.create_edge(a, b, RelationKind::Cousin).await.unwrap();
        assert!(store.delete_edge(edge.id).await.unwrap());
        assert!(store.get_edge(edge.id).await.unwrap().is_none());
        assert!(store.edges_from(a).await.unwrap().is_empty());

        // Second delete: already gone.
        assert!(!store.delete_edge(edge.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_ids_are_monotonic() {
        let store = MemoryStore::new();
        let e1 = store
            .create_edge(ResidentId(1), ResidentId(2), RelationKind::Sibling)
            .await
            .unwrap();
        let e2 = store
            .create_edge(ResidentId(2), ResidentId(3), RelationKind::Sibling)
            .await
            .unwrap();
        assert!(e2.id.0 > e1.id.0);
    }
}
