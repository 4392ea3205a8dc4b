//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. A stock snapshot
/// is the canonical example here: a fresh query produces a new snapshot, it
/// never edits an old one.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Figures {
///     on_hand: i64,
///     pending: i64,
/// }
///
/// impl ValueObject for Figures {}
///
/// assert_eq!(Figures { on_hand: 1, pending: 0 }, Figures { on_hand: 1, pending: 0 });
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
