//! The fixed relationship vocabulary.

use serde::{Deserialize, Serialize};

/// A relationship type from the fixed kinship vocabulary.
///
/// Callers hand the engine plain strings; `RelationKind::parse` accepts
/// them case-insensitively and rejects anything outside the vocabulary.
/// Reciprocal and family lookups live in [`crate::reciprocity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    Father,
    Mother,
    Parent,
    Child,
    Son,
    Daughter,
    Brother,
    Sister,
    Sibling,
    Husband,
    Wife,
    Spouse,
    Grandfather,
    Grandmother,
    Grandchild,
    Grandson,
    Granddaughter,
    Uncle,
    Aunt,
    Nephew,
    Niece,
    Cousin,
}

/// Coarse grouping used by the inference steps.
///
/// Only the parent/child/sibling families trigger propagation; the rest
/// get reciprocal maintenance and nothing more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationFamily {
    Parent,
    Child,
    Sibling,
    Spouse,
    Grandparent,
    Grandchild,
    UncleAunt,
    NephewNiece,
    Cousin,
}

impl RelationKind {
    /// Every kind in the vocabulary, in declaration order.
    pub const ALL: [RelationKind; 22] = [
        RelationKind::Father,
        RelationKind::Mother,
        RelationKind::Parent,
        RelationKind::Child,
        RelationKind::Son,
        RelationKind::Daughter,
        RelationKind::Brother,
        RelationKind::Sister,
        RelationKind::Sibling,
        RelationKind::Husband,
        RelationKind::Wife,
        RelationKind::Spouse,
        RelationKind::Grandfather,
        RelationKind::Grandmother,
        RelationKind::Grandchild,
        RelationKind::Grandson,
        RelationKind::Granddaughter,
        RelationKind::Uncle,
        RelationKind::Aunt,
        RelationKind::Nephew,
        RelationKind::Niece,
        RelationKind::Cousin,
    ];

    /// Canonical lowercase spelling, as stored and displayed.
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::Father => "father",
            RelationKind::Mother => "mother",
            RelationKind::Parent => "parent",
            RelationKind::Child => "child",
            RelationKind::Son => "son",
            RelationKind::Daughter => "daughter",
            RelationKind::Brother => "brother",
            RelationKind::Sister => "sister",
            RelationKind::Sibling => "sibling",
            RelationKind::Husband => "husband",
            RelationKind::Wife => "wife",
            RelationKind::Spouse => "spouse",
            RelationKind::Grandfather => "grandfather",
            RelationKind::Grandmother => "grandmother",
            RelationKind::Grandchild => "grandchild",
            RelationKind::Grandson => "grandson",
            RelationKind::Granddaughter => "granddaughter",
            RelationKind::Uncle => "uncle",
            RelationKind::Aunt => "aunt",
            RelationKind::Nephew => "nephew",
            RelationKind::Niece => "niece",
            RelationKind::Cousin => "cousin",
        }
    }

    /// Case-insensitive lookup. Returns `None` for anything outside the
    /// vocabulary, including the empty string.
    pub fn parse(s: &str) -> Option<RelationKind> {
        let s = s.trim();
        RelationKind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
    }

    /// The reciprocal kind that must hold in the opposite direction,
    /// if one is defined. See [`crate::reciprocity::reciprocal_of`].
    pub fn reciprocal(&self) -> Option<RelationKind> {
        crate::reciprocity::reciprocal_of(*self)
    }

    /// The family this kind belongs to. See [`crate::reciprocity::family_of`].
    pub fn family(&self) -> RelationFamily {
        crate::reciprocity::family_of(*self)
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RelationKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RelationKind::parse(s)
            .ok_or_else(|| crate::Error::Validation(format!("unknown relationship type: {s:?}")))
    }
}
