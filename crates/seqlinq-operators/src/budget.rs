//! Element budget for buffering operators.
//!
//! `order_by`, `group_by`, `join`, and `reverse` have to hold their input
//! before emitting anything. A `BufferBudget` turns an optional cap from
//! `QueryConfig::max_buffered` into a hard failure instead of unbounded
//! growth.

use seqlinq_core::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferBudget {
    op: &'static str,
    limit: Option<usize>,
}

impl BufferBudget {
    pub fn new(op: &'static str, limit: Option<usize>) -> Self {
        Self { op, limit }
    }

    pub fn unbounded(op: &'static str) -> Self {
        Self { op, limit: None }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Fail with `Error::BufferLimit` once more than `limit` elements are held.
    pub fn check(&self, held: usize) -> Result<()> {
        match self.limit {
            Some(limit) if held > limit => Err(Error::BufferLimit {
                op: self.op,
                limit,
            }),
            _ => Ok(()),
        }
    }

    /// Drain `iter` into a vector, stopping at the first error or overflow.
    pub fn collect<T, I>(&self, iter: I) -> Result<Vec<T>>
    where
        I: Iterator<Item = Result<T>>,
    {
        let mut out = Vec::with_capacity(iter.size_hint().0);
        for item in iter {
            out.push(item?);
            self.check(out.len())?;
        }
        Ok(out)
    }
}
