//! `reverse` operator.

use crate::budget::BufferBudget;
use crate::plan::{Evaluation, OpPlan};
use crate::traits::{Operator, Result};

/// Buffering operator yielding upstream back to front.
pub struct Reverse<I, T> {
    upstream: I,
    budget: BufferBudget,
    buffered: Option<std::iter::Rev<std::vec::IntoIter<T>>>,
    exhausted: bool,
}

impl<I, T> Reverse<I, T>
where
    I: Iterator<Item = Result<T>>,
{
    pub fn new(upstream: I, budget: BufferBudget) -> Self {
        Self {
            upstream,
            budget,
            buffered: None,
            exhausted: false,
        }
    }
}

impl<I, T> Iterator for Reverse<I, T>
where
    I: Iterator<Item = Result<T>>,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buffered.is_none() {
            if self.exhausted {
                return None;
            }
            self.exhausted = true;
            match self.budget.collect(self.upstream.by_ref()) {
                Ok(items) => self.buffered = Some(items.into_iter().rev()),
                Err(e) => return Some(Err(e)),
            }
        }
        self.buffered.as_mut()?.next().map(Ok)
    }
}

impl<I, T> Operator for Reverse<I, T>
where
    I: Operator<Item = Result<T>>,
{
    fn name(&self) -> &'static str {
        "reverse"
    }

    fn evaluation(&self) -> Evaluation {
        Evaluation::Buffering
    }

    fn plan(&self) -> OpPlan {
        OpPlan::new(self.name(), self.evaluation()).with_input(self.upstream.plan())
    }
}
