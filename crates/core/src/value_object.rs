//! Value object trait: equality by value, not identity.
//!
//! Signatures, selections and the option snapshots embedded in a variant are
//! value objects: two of them holding the same pairs are interchangeable.

/// Marker trait for value objects.
///
/// Value objects are immutable once built and compared by their values only.
/// "Changing" one means building a new one (e.g. `AttributeSelection::with`
/// returns a new selection rather than editing the old one).
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
