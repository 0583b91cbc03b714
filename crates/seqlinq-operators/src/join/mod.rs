//! Equi-join operators.

pub mod hash;

pub use hash::HashJoin;
