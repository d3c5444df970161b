//! End-to-end tests for the add pipeline: reciprocity, idempotence,
//! parent propagation, and sibling closure against the in-memory store.

use kingraph::{
    Error, InferenceEngine, MemoryStore, RelationKind, RelationshipStore, ResidentId,
};
use pretty_assertions::assert_eq;

async fn edge_exists(
    store: &MemoryStore,
    source: ResidentId,
    target: ResidentId,
    kind: RelationKind,
) -> bool {
    store.find_edge(source, target, kind).await.unwrap().is_some()
}

// ============================================================================
// 1. Reciprocity: every kind gets its table-defined reverse edge
// ============================================================================

#[tokio::test]
async fn test_reciprocity_across_the_whole_vocabulary() {
    for kind in RelationKind::ALL {
        let engine = InferenceEngine::in_memory();
        let (a, b) = (ResidentId(1), ResidentId(2));

        engine.add_relationship(a, b, kind.as_str()).await.unwrap();

        let reciprocal = kind.reciprocal().unwrap();
        assert!(
            edge_exists(engine.store(), b, a, reciprocal).await,
            "missing reciprocal {reciprocal} for {kind}"
        );
    }
}

#[tokio::test]
async fn test_father_child_pair() {
    // Scenario 1: Add(A, B, father) leaves exactly the pair.
    let engine = InferenceEngine::in_memory();
    let (a, b) = (ResidentId(1), ResidentId(2));

    let edge = engine.add_relationship(a, b, "father").await.unwrap();

    assert_eq!(edge.source, a);
    assert_eq!(edge.target, b);
    assert_eq!(edge.kind, RelationKind::Father);
    assert!(edge_exists(engine.store(), b, a, RelationKind::Child).await);
    assert_eq!(engine.store().edge_count(), 2);
}

// ============================================================================
// 2. Idempotence: a repeated add mutates nothing
// ============================================================================

#[tokio::test]
async fn test_duplicate_add_is_rejected_without_mutation() {
    let engine = InferenceEngine::in_memory();
    let (a, b) = (ResidentId(1), ResidentId(2));

    engine.add_relationship(a, b, "sister").await.unwrap();
    let count_before = engine.store().edge_count();

    let err = engine.add_relationship(a, b, "sister").await.unwrap_err();

    assert!(matches!(err, Error::DuplicateRelationship { .. }));
    assert_eq!(engine.store().edge_count(), count_before);
}

#[tokio::test]
async fn test_same_pair_different_kind_is_not_a_duplicate() {
    let engine = InferenceEngine::in_memory();
    let (a, b) = (ResidentId(1), ResidentId(2));

    engine.add_relationship(a, b, "cousin").await.unwrap();
    engine.add_relationship(a, b, "spouse").await.unwrap();

    assert!(edge_exists(engine.store(), a, b, RelationKind::Cousin).await);
    assert!(edge_exists(engine.store(), a, b, RelationKind::Spouse).await);
}

// ============================================================================
// 3. Parent propagation: a parent's children become siblings
// ============================================================================

#[tokio::test]
async fn test_parent_propagation_links_children_as_siblings() {
    let engine = InferenceEngine::in_memory();
    let (f, c1, c2) = (ResidentId(10), ResidentId(11), ResidentId(12));

    engine.add_relationship(f, c1, "father").await.unwrap();
    engine.add_relationship(f, c2, "father").await.unwrap();

    // F's two direct child pairs...
    assert!(edge_exists(engine.store(), f, c1, RelationKind::Father).await);
    assert!(edge_exists(engine.store(), c1, f, RelationKind::Child).await);
    assert!(edge_exists(engine.store(), f, c2, RelationKind::Father).await);
    assert!(edge_exists(engine.store(), c2, f, RelationKind::Child).await);

    // ...plus the inferred mutual sibling pair.
    assert!(edge_exists(engine.store(), c1, c2, RelationKind::Sibling).await);
    assert!(edge_exists(engine.store(), c2, c1, RelationKind::Sibling).await);
    assert_eq!(engine.store().edge_count(), 6);
}

#[tokio::test]
async fn test_child_side_add_delegates_to_parent_propagation() {
    // Adding (C2, F, "son") must link C2 with F's existing child C1 too.
    let engine = InferenceEngine::in_memory();
    let (f, c1, c2) = (ResidentId(10), ResidentId(11), ResidentId(12));

    engine.add_relationship(f, c1, "father").await.unwrap();
    engine.add_relationship(c2, f, "son").await.unwrap();

    assert!(edge_exists(engine.store(), c2, f, RelationKind::Son).await);
    assert!(edge_exists(engine.store(), f, c2, RelationKind::Parent).await);
    assert!(edge_exists(engine.store(), c1, c2, RelationKind::Sibling).await);
    assert!(edge_exists(engine.store(), c2, c1, RelationKind::Sibling).await);
}

#[tokio::test]
async fn test_existing_siblings_inherit_the_new_parent() {
    // Sibling transitivity: Add(A, B, sibling), then Add(C, A, father)
    // must end with (C, B, father) and (B, C, child).
    let engine = InferenceEngine::in_memory();
    let (a, b, c) = (ResidentId(1), ResidentId(2), ResidentId(3));

    engine.add_relationship(a, b, "sibling").await.unwrap();
    engine.add_relationship(c, a, "father").await.unwrap();

    assert!(edge_exists(engine.store(), c, b, RelationKind::Father).await);
    assert!(edge_exists(engine.store(), b, c, RelationKind::Child).await);
}

#[tokio::test]
async fn test_parent_kind_is_reused_exactly() {
    // A "mother" edge propagates as "mother", not a generalized "parent".
    let engine = InferenceEngine::in_memory();
    let (m, a, b) = (ResidentId(5), ResidentId(6), ResidentId(7));

    engine.add_relationship(a, b, "brother").await.unwrap();
    engine.add_relationship(m, a, "mother").await.unwrap();

    assert!(edge_exists(engine.store(), m, b, RelationKind::Mother).await);
    assert!(!edge_exists(engine.store(), m, b, RelationKind::Parent).await);
}

// ============================================================================
// 4. Sibling closure: new siblings equalize their parent sets
// ============================================================================

#[tokio::test]
async fn test_sibling_closure_propagates_known_parents() {
    let engine = InferenceEngine::in_memory();
    let (a, b, d) = (ResidentId(1), ResidentId(2), ResidentId(4));

    // A is B's father; D arrives later as B's sibling.
    engine.add_relationship(a, b, "father").await.unwrap();
    engine.add_relationship(b, d, "sibling").await.unwrap();

    assert!(edge_exists(engine.store(), b, d, RelationKind::Sibling).await);
    assert!(edge_exists(engine.store(), d, b, RelationKind::Sibling).await);
    assert!(edge_exists(engine.store(), a, d, RelationKind::Father).await);
    assert!(edge_exists(engine.store(), d, a, RelationKind::Child).await);
}

#[tokio::test]
async fn test_sibling_closure_works_in_both_directions() {
    // The side with the known parent can be either endpoint.
    let engine = InferenceEngine::in_memory();
    let (a, b, d) = (ResidentId(1), ResidentId(2), ResidentId(4));

    engine.add_relationship(a, b, "father").await.unwrap();
    engine.add_relationship(d, b, "sibling").await.unwrap();

    assert!(edge_exists(engine.store(), a, d, RelationKind::Father).await);
    assert!(edge_exists(engine.store(), d, a, RelationKind::Child).await);
}

// ============================================================================
// 5. The cumulative example scenario
// ============================================================================

#[tokio::test]
async fn test_cumulative_family_scenario() {
    let engine = InferenceEngine::in_memory();
    let (a, b, c, d) = (ResidentId(1), ResidentId(2), ResidentId(3), ResidentId(4));

    // 1. A fathers B.
    engine.add_relationship(a, b, "father").await.unwrap();
    assert!(edge_exists(engine.store(), a, b, RelationKind::Father).await);
    assert!(edge_exists(engine.store(), b, a, RelationKind::Child).await);

    // 2. A fathers C; B and C become siblings.
    engine.add_relationship(a, c, "father").await.unwrap();
    assert!(edge_exists(engine.store(), a, c, RelationKind::Father).await);
    assert!(edge_exists(engine.store(), c, a, RelationKind::Child).await);
    assert!(edge_exists(engine.store(), b, c, RelationKind::Sibling).await);
    assert!(edge_exists(engine.store(), c, b, RelationKind::Sibling).await);

    // 3. D becomes B's sibling; the closure hands D the father A,
    //    and propagation folds D into the existing sibling set.
    engine.add_relationship(b, d, "sibling").await.unwrap();
    assert!(edge_exists(engine.store(), b, d, RelationKind::Sibling).await);
    assert!(edge_exists(engine.store(), d, b, RelationKind::Sibling).await);
    assert!(edge_exists(engine.store(), a, d, RelationKind::Father).await);
    assert!(edge_exists(engine.store(), d, a, RelationKind::Child).await);
}

// ============================================================================
// 6. Inferred edges are ordinary edges
// ============================================================================

#[tokio::test]
async fn test_inferred_edges_are_indistinguishable() {
    let engine = InferenceEngine::in_memory();
    let (f, c1, c2) = (ResidentId(1), ResidentId(2), ResidentId(3));

    engine.add_relationship(f, c1, "father").await.unwrap();
    engine.add_relationship(f, c2, "father").await.unwrap();

    // The inferred sibling edge carries an id and a timestamp like any
    // directly requested edge, and re-adding it reports a duplicate.
    let sibling = engine
        .store()
        .find_edge(c1, c2, RelationKind::Sibling)
        .await
        .unwrap()
        .unwrap();
    assert!(sibling.id.0 > 0);

    let err = engine.add_relationship(c1, c2, "sibling").await.unwrap_err();
    assert!(matches!(err, Error::DuplicateRelationship { .. }));
}

#[tokio::test]
async fn test_edges_serialize_for_callers() {
    let engine = InferenceEngine::in_memory();
    let edge = engine
        .add_relationship(ResidentId(1), ResidentId(2), "grandmother")
        .await
        .unwrap();

    let json = serde_json::to_value(&edge).unwrap();
    assert_eq!(json["kind"], "grandmother");
    assert_eq!(json["source"], 1);
    assert_eq!(json["target"], 2);
}
