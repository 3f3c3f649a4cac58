//! Entity trait: identity + continuity across state changes.
//!
//! Catalog records and variants are entities: a variant keeps its id while an
//! operator edits its price or stock, and an option keeps its id when relabeled.

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
