//! Filter operator (`where`).

use crate::plan::OpPlan;
use crate::traits::{Operator, Result};

/// Keeps the elements for which the predicate holds.
///
/// The predicate runs exactly once per upstream element, in source order, and
/// only when the node is pulled.
pub struct Where<I, F> {
    upstream: I,
    predicate: F,
}

impl<I, T, F> Where<I, F>
where
    I: Iterator<Item = Result<T>>,
    F: FnMut(&T) -> Result<bool>,
{
    pub fn new(upstream: I, predicate: F) -> Self {
        Self {
            upstream,
            predicate,
        }
    }
}

impl<I, T, F> Iterator for Where<I, F>
where
    I: Iterator<Item = Result<T>>,
    F: FnMut(&T) -> Result<bool>,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let item = match self.upstream.next()? {
                Ok(item) => item,
                Err(e) => return Some(Err(e)),
            };
            match (self.predicate)(&item) {
                Ok(true) => return Some(Ok(item)),
                Ok(false) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.upstream.size_hint().1)
    }
}

impl<I, T, F> Operator for Where<I, F>
where
    I: Operator<Item = Result<T>>,
    F: FnMut(&T) -> Result<bool>,
{
    fn name(&self) -> &'static str {
        "where"
    }

    fn plan(&self) -> OpPlan {
        OpPlan::new(self.name(), self.evaluation()).with_input(self.upstream.plan())
    }
}
