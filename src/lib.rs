#![forbid(unsafe_code)]
//! seqlinq: deferred, composable LINQ-style queries over any iterable.
//!
//! ```
//! use seqlinq::prelude::*;
//!
//! let words = "the quick brown fox jumps over the lazy dog";
//! let top = words
//!     .split_whitespace()
//!     .query()
//!     .group_by(|w: &&str| w.len())
//!     .order_by_descending(|g: &Grouping<usize, &str>| g.count())
//!     .then_by(|g: &Grouping<usize, &str>| *g.key())
//!     .select(|g| (*g.key(), g.count()))
//!     .first()
//!     .unwrap();
//! assert_eq!(top, (3, 4));
//! ```
//!
//! Re-exports from the three workspace crates:
//! - `seqlinq_core`: `Error`, `Value`, `Hashable`, `QueryConfig`
//! - `seqlinq_operators`: the pipeline nodes and `OpPlan`
//! - `seqlinq_exec`: the `Query` facade and its terminals

pub use seqlinq_core::{DuplicateKeyPolicy, Error, Hashable, QueryConfig, Result, Value, ValueKey};
pub use seqlinq_exec::{query, query_with, Query, QueryExt};
pub use seqlinq_operators::{Evaluation, Grouping, OpPlan, Operator};

pub mod prelude {
    pub use seqlinq_core::prelude::*;
    pub use seqlinq_exec::{query, query_with, Query, QueryExt};
    pub use seqlinq_operators::{Evaluation, Grouping, OpPlan, Operator};
}
