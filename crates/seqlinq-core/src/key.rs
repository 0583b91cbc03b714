//! The hashing capability required by `distinct`, `group_by`, `join`, and the
//! keyed terminals.
//!
//! Statically hashable types (`Hash + Eq + Clone`) are their own key and can
//! never fail. Dynamic element types such as [`Value`](crate::value::Value)
//! decide per element, which is how `Unhashable` surfaces exactly when the
//! offending element flows through an operator instead of when the chain is
//! built.

use std::hash::Hash;

use crate::error::Result;

pub trait Hashable {
    /// Owned, hashable stand-in for the element.
    type Key: Hash + Eq;

    /// Produce the key, or `Error::Unhashable` when this element has none.
    fn hash_key(&self) -> Result<Self::Key>;
}

impl<T> Hashable for T
where
    T: Hash + Eq + Clone,
{
    type Key = T;

    fn hash_key(&self) -> Result<T> {
        Ok(self.clone())
    }
}
