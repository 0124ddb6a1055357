//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values; two
/// instances with the same values are the same value. Entities, in contrast,
/// are identified by id regardless of attribute drift.
///
/// To "modify" a value object, construct a new one. The trait bounds keep
/// value objects cheap to copy, comparable, and debuggable.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
