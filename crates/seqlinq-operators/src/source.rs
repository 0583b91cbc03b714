//! Iteration source adapters: the leaves of every pipeline.

use crate::plan::{Evaluation, OpPlan};
use crate::traits::{Operator, Result};

/// Wraps any iterable, yielding its items as `Ok` in the host's own
/// iteration order. Nothing is copied or buffered.
///
/// Maps yield whatever their `IntoIterator` yields (key/value pairs for owned
/// or borrowed `HashMap`s); pass `.keys()` or `.values()` to iterate one side.
pub struct Source<I> {
    iter: I,
}

impl<I: Iterator> Source<I> {
    pub fn new<S>(source: S) -> Self
    where
        S: IntoIterator<IntoIter = I>,
    {
        Self {
            iter: source.into_iter(),
        }
    }
}

impl<I: Iterator> Iterator for Source<I> {
    type Item = Result<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(Ok)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<I: Iterator> Operator for Source<I> {
    fn name(&self) -> &'static str {
        "source"
    }

    fn plan(&self) -> OpPlan {
        OpPlan::new(self.name(), self.evaluation())
    }
}

/// Source whose items can already fail; errors flow downstream unchanged.
pub struct Fallible<I> {
    iter: I,
}

impl<I, T> Fallible<I>
where
    I: Iterator<Item = Result<T>>,
{
    pub fn new<S>(source: S) -> Self
    where
        S: IntoIterator<IntoIter = I>,
    {
        Self {
            iter: source.into_iter(),
        }
    }
}

impl<I, T> Iterator for Fallible<I>
where
    I: Iterator<Item = Result<T>>,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<I, T> Operator for Fallible<I>
where
    I: Iterator<Item = Result<T>>,
{
    fn name(&self) -> &'static str {
        "fallible_source"
    }

    fn plan(&self) -> OpPlan {
        OpPlan::new(self.name(), Evaluation::Streaming)
    }
}
