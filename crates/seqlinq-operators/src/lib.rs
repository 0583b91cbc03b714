#![forbid(unsafe_code)]
//! seqlinq-operators: pull-based operator nodes (where/select/take/distinct/
//! group/sort/join) that compose into a lazy pipeline.
//!
//! Design intent:
//! - Every node is an `Iterator<Item = Result<T>>` that owns its upstream and
//!   pulls from it only when it is itself pulled.
//! - Constructing a node never iterates. Argument validation (negative counts)
//!   is the only failure at construction time.
//! - Buffering nodes (`OrderBy`, `GroupBy`, `Join`, `Reverse`) declare it via
//!   `Operator::evaluation` and bound their buffers with a `BufferBudget`.

pub mod budget;
pub mod plan;
pub mod traits;

pub mod concat;
pub mod distinct;
pub mod filter;
pub mod group;
pub mod limit;
pub mod map;
pub mod source;

pub mod join;
pub mod sort;

pub use budget::BufferBudget;
pub use plan::{Evaluation, OpPlan};
pub use traits::Operator;

pub use concat::Concat;
pub use distinct::Distinct;
pub use filter::Where;
pub use group::{GroupBy, Grouping};
pub use join::HashJoin;
pub use limit::{Skip, SkipWhile, Take, TakeWhile};
pub use map::{Select, SelectMany, SelectWithIndex};
pub use sort::{OrderBy, Reverse, SortKeyChain};
pub use source::{Fallible, Source};
