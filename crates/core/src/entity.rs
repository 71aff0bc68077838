//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Every Northwind read model is an entity keyed by its table's integer key.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + Ord + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}
