//! # Reciprocity Table
//!
//! The immutable mapping from a relationship kind to the kind that must hold
//! in the opposite direction, plus the family grouping the inference steps
//! key on. Both are plain data tables: adding a kind means adding a row,
//! never touching control flow.
//!
//! The vocabulary has no neutral "grandparent" or "pibling" terms, so the
//! reverse direction of those families collapses to the nearest gendered
//! counterpart (grandson → grandfather, uncle → nephew). Inherited from the
//! source system's lookup tables; imperfect but defined.

use crate::model::{RelationFamily, RelationFamily as F, RelationKind, RelationKind as K};

/// kind → reciprocal kind. Symmetric kinds (sibling, spouse, cousin) map to
/// themselves; gendered kinds map to the neutral member of the opposite
/// family where one exists (father → child), gendered counterpart otherwise.
const RECIPROCALS: &[(RelationKind, RelationKind)] = &[
    (K::Father, K::Child),
    (K::Mother, K::Child),
    (K::Parent, K::Child),
    (K::Child, K::Parent),
    (K::Son, K::Parent),
    (K::Daughter, K::Parent),
    (K::Brother, K::Sibling),
    (K::Sister, K::Sibling),
    (K::Sibling, K::Sibling),
    (K::Husband, K::Wife),
    (K::Wife, K::Husband),
    (K::Spouse, K::Spouse),
    (K::Grandfather, K::Grandchild),
    (K::Grandmother, K::Grandchild),
    (K::Grandchild, K::Grandfather),
    (K::Grandson, K::Grandfather),
    (K::Granddaughter, K::Grandmother),
    (K::Uncle, K::Nephew),
    (K::Aunt, K::Niece),
    (K::Nephew, K::Uncle),
    (K::Niece, K::Aunt),
    (K::Cousin, K::Cousin),
];

/// kind → family membership.
const FAMILIES: &[(RelationKind, RelationFamily)] = &[
    (K::Father, F::Parent),
    (K::Mother, F::Parent),
    (K::Parent, F::Parent),
    (K::Child, F::Child),
    (K::Son, F::Child),
    (K::Daughter, F::Child),
    (K::Brother, F::Sibling),
    (K::Sister, F::Sibling),
    (K::Sibling, F::Sibling),
    (K::Husband, F::Spouse),
    (K::Wife, F::Spouse),
    (K::Spouse, F::Spouse),
    (K::Grandfather, F::Grandparent),
    (K::Grandmother, F::Grandparent),
    (K::Grandchild, F::Grandchild),
    (K::Grandson, F::Grandchild),
    (K::Granddaughter, F::Grandchild),
    (K::Uncle, F::UncleAunt),
    (K::Aunt, F::UncleAunt),
    (K::Nephew, F::NephewNiece),
    (K::Niece, F::NephewNiece),
    (K::Cousin, F::Cousin),
];

/// The reciprocal of `kind`, or `None` if the table defines no reciprocal.
///
/// Pure lookup, no side effects. Callers treat `None` as "no reciprocity
/// maintenance for this kind", never as an error. Every kind currently in
/// the vocabulary has a defined reciprocal; the `Option` keeps the
/// null-reciprocal case in the contract.
pub fn reciprocal_of(kind: RelationKind) -> Option<RelationKind> {
    RECIPROCALS
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, r)| *r)
}

/// The family `kind` belongs to.
pub fn family_of(kind: RelationKind) -> RelationFamily {
    FAMILIES
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, f)| *f)
        // The tables are exhaustive over the enum; tests enforce it.
        .unwrap_or(F::Cousin)
}

/// The family a reciprocal edge of this family must belong to.
pub(crate) fn reciprocal_family(family: RelationFamily) -> RelationFamily {
    match family {
        F::Parent => F::Child,
        F::Child => F::Parent,
        F::Sibling => F::Sibling,
        F::Spouse => F::Spouse,
        F::Grandparent => F::Grandchild,
        F::Grandchild => F::Grandparent,
        F::UncleAunt => F::NephewNiece,
        F::NephewNiece => F::UncleAunt,
        F::Cousin => F::Cousin,
    }
}
