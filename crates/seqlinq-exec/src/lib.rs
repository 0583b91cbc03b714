#![forbid(unsafe_code)]
//! seqlinq-exec: the `Query` facade and its terminal operations.
//!
//! A `Query` wraps the head node of an operator pipeline (see
//! `seqlinq-operators`) together with the `QueryConfig` every node built from
//! it inherits. Chaining only constructs nodes; terminals and `for` loops pull.

pub mod ext;
pub mod metrics;
pub mod query;
pub mod terminal;

pub use ext::{query, query_with, QueryExt};
pub use query::Query;
