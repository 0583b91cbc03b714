//! Concatenation of a pipeline with a second iterable.

use crate::plan::OpPlan;
use crate::traits::{Operator, Result};

/// Yields all of upstream, then the items of `second`. `second` is not
/// touched until upstream is exhausted.
pub struct Concat<I, J> {
    upstream: I,
    second: J,
    upstream_done: bool,
}

impl<I, J> Concat<I, J> {
    pub fn new(upstream: I, second: J) -> Self {
        Self {
            upstream,
            second,
            upstream_done: false,
        }
    }
}

impl<I, J, T> Iterator for Concat<I, J>
where
    I: Iterator<Item = Result<T>>,
    J: Iterator<Item = T>,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.upstream_done {
            match self.upstream.next() {
                Some(item) => return Some(item),
                None => self.upstream_done = true,
            }
        }
        self.second.next().map(Ok)
    }
}

impl<I, J, T> Operator for Concat<I, J>
where
    I: Operator<Item = Result<T>>,
    J: Iterator<Item = T>,
{
    fn name(&self) -> &'static str {
        "concat"
    }

    fn plan(&self) -> OpPlan {
        OpPlan::new(self.name(), self.evaluation()).with_input(self.upstream.plan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Source;

    #[test]
    fn test_concat_is_ordered() {
        let node = Concat::new(Source::new(vec![1, 2]), vec![3, 4].into_iter());
        let out: Vec<i32> = node.collect::<Result<_>>().unwrap();
        assert_eq!(out, vec![1, 2, 3, 4]);
    }
}
