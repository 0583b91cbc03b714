//! Operator trait + common interfaces.
//!
//! A pipeline is a chain of nodes, each wrapping the one before it. The exec
//! crate drives the last node by calling `next()` until exhaustion (or until a
//! short-circuiting terminal has its answer); `plan()` describes the chain
//! without evaluating it.

use crate::plan::{Evaluation, OpPlan};

pub use seqlinq_core::error::{Error, Result};

/// Trait that all pipeline nodes implement.
///
/// Invariants:
/// - Constructing a node MUST NOT pull from its upstream.
/// - Each upstream element is pulled at most once per evaluation pass.
/// - Streaming nodes pull only as many upstream elements as they need to
///   produce the element they were asked for.
pub trait Operator: Iterator {
    /// Human-readable operator name (stable).
    fn name(&self) -> &'static str;

    /// Whether the node must see its entire upstream before producing output.
    fn evaluation(&self) -> Evaluation {
        Evaluation::Streaming
    }

    /// Describe this node and everything upstream of it.
    fn plan(&self) -> OpPlan;
}
