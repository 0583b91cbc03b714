//! `order_by` / `then_by` operator.

use crate::budget::BufferBudget;
use crate::plan::{Evaluation, OpPlan};
use crate::traits::{Operator, Result};

use super::key::{SortKeyChain, SortLevel};

/// Buffering operator: on the first pull, drains upstream and sorts it once
/// by the whole key chain; then yields the sorted elements.
///
/// Levels can be appended with `then` until the node is first pulled. A
/// failure while buffering or sorting is yielded once, after which the node
/// is exhausted.
pub struct OrderBy<'a, I, T> {
    upstream: I,
    chain: SortKeyChain<'a, T>,
    budget: BufferBudget,
    sorted: Option<std::vec::IntoIter<T>>,
    exhausted: bool,
}

impl<'a, I, T> OrderBy<'a, I, T>
where
    I: Iterator<Item = Result<T>>,
{
    pub fn new(upstream: I, first: Box<dyn SortLevel<T> + 'a>, budget: BufferBudget) -> Self {
        let mut chain = SortKeyChain::new();
        chain.push(first);
        Self {
            upstream,
            chain,
            budget,
            sorted: None,
            exhausted: false,
        }
    }

    /// Append a tie-breaking level.
    pub fn then(mut self, level: Box<dyn SortLevel<T> + 'a>) -> Self {
        self.chain.push(level);
        self
    }

    /// Number of levels in the key chain.
    pub fn levels(&self) -> usize {
        self.chain.len()
    }

    fn buffer(&mut self) -> Result<Vec<T>> {
        let items = self.budget.collect(self.upstream.by_ref())?;

        #[cfg(feature = "tracing")]
        tracing::trace!(
            elements = items.len(),
            levels = self.chain.len(),
            "order_by buffered"
        );

        self.chain.sort(items)
    }
}

impl<'a, I, T> Iterator for OrderBy<'a, I, T>
where
    I: Iterator<Item = Result<T>>,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.sorted.is_none() {
            if self.exhausted {
                return None;
            }
            self.exhausted = true;
            match self.buffer() {
                Ok(items) => self.sorted = Some(items.into_iter()),
                Err(e) => return Some(Err(e)),
            }
        }
        self.sorted.as_mut()?.next().map(Ok)
    }
}

impl<'a, I, T> Operator for OrderBy<'a, I, T>
where
    I: Operator<Item = Result<T>>,
{
    fn name(&self) -> &'static str {
        "order_by"
    }

    fn evaluation(&self) -> Evaluation {
        Evaluation::Buffering
    }

    fn plan(&self) -> OpPlan {
        OpPlan::new(self.name(), self.evaluation())
            .with_detail(format!("keys=[{}]", self.chain.directions().join(", ")))
            .with_input(self.upstream.plan())
    }
}
