//! Value object trait: equality by value, not identity.
//!
//! Value objects are domain objects that have **no identity** - they are defined entirely
//! by their attribute values. Two value objects with the same values are considered equal.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. Item codes,
/// parcel weights and tariff records are value objects: two weights of
/// `1.5 kg` are the same weight, and a tariff is replaced rather than edited.
///
/// The trait requires:
/// - **Clone**: value objects are cheap to copy
/// - **PartialEq**: compared by their attribute values
/// - **Debug**: helpful for logging and tests
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct Weight(f64);
///
/// impl ValueObject for Weight {}
///
/// assert_eq!(Weight(1.5), Weight(1.5));
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
