//! Bounding operators: `take`, `skip`, `take_while`, `skip_while`.

use std::fmt;

use crate::plan::OpPlan;
use crate::traits::{Error, Operator, Result};

/// Validate a caller-supplied count. Negative or oversized values are the one
/// failure a node reports at construction time.
pub fn checked_count<N>(op: &'static str, count: N) -> Result<usize>
where
    N: TryInto<usize> + Copy + fmt::Display,
{
    count.try_into().map_err(|_| {
        Error::InvalidArgument(format!(
            "{op}: count must be a non-negative integer, got {count}"
        ))
    })
}

/// Yields at most `count` items and never pulls upstream past them.
///
/// Errors take a slot like any other item, so upstream is pulled at most
/// `count` times.
pub struct Take<I> {
    upstream: I,
    count: usize,
    remaining: usize,
}

impl<I> Take<I> {
    pub fn new<N>(upstream: I, count: N) -> Result<Self>
    where
        N: TryInto<usize> + Copy + fmt::Display,
    {
        let count = checked_count("take", count)?;
        Ok(Self {
            upstream,
            count,
            remaining: count,
        })
    }
}

impl<I, T> Iterator for Take<I>
where
    I: Iterator<Item = Result<T>>,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let item = self.upstream.next()?;
        self.remaining -= 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lo, hi) = self.upstream.size_hint();
        let hi = hi.map_or(self.remaining, |hi| hi.min(self.remaining));
        (lo.min(self.remaining), Some(hi))
    }
}

impl<I, T> Operator for Take<I>
where
    I: Operator<Item = Result<T>>,
{
    fn name(&self) -> &'static str {
        "take"
    }

    fn plan(&self) -> OpPlan {
        OpPlan::new(self.name(), self.evaluation())
            .with_detail(format!("count={}", self.count))
            .with_input(self.upstream.plan())
    }
}

/// Discards the first `count` elements, lazily, on the first pull.
pub struct Skip<I> {
    upstream: I,
    count: usize,
    remaining: usize,
}

impl<I> Skip<I> {
    pub fn new<N>(upstream: I, count: N) -> Result<Self>
    where
        N: TryInto<usize> + Copy + fmt::Display,
    {
        let count = checked_count("skip", count)?;
        Ok(Self {
            upstream,
            count,
            remaining: count,
        })
    }
}

impl<I, T> Iterator for Skip<I>
where
    I: Iterator<Item = Result<T>>,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.remaining > 0 {
            match self.upstream.next()? {
                Ok(_) => self.remaining -= 1,
                Err(e) => return Some(Err(e)),
            }
        }
        self.upstream.next()
    }
}

impl<I, T> Operator for Skip<I>
where
    I: Operator<Item = Result<T>>,
{
    fn name(&self) -> &'static str {
        "skip"
    }

    fn plan(&self) -> OpPlan {
        OpPlan::new(self.name(), self.evaluation())
            .with_detail(format!("count={}", self.count))
            .with_input(self.upstream.plan())
    }
}

/// Yields elements while the predicate holds; stops pulling after the first
/// element that fails it.
pub struct TakeWhile<I, F> {
    upstream: I,
    predicate: F,
    done: bool,
}

impl<I, T, F> TakeWhile<I, F>
where
    I: Iterator<Item = Result<T>>,
    F: FnMut(&T) -> Result<bool>,
{
    pub fn new(upstream: I, predicate: F) -> Self {
        Self {
            upstream,
            predicate,
            done: false,
        }
    }
}

impl<I, T, F> Iterator for TakeWhile<I, F>
where
    I: Iterator<Item = Result<T>>,
    F: FnMut(&T) -> Result<bool>,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = match self.upstream.next()? {
            Ok(item) => item,
            Err(e) => return Some(Err(e)),
        };
        match (self.predicate)(&item) {
            Ok(true) => Some(Ok(item)),
            Ok(false) => {
                self.done = true;
                None
            }
            Err(e) => Some(Err(e)),
        }
    }
}

impl<I, T, F> Operator for TakeWhile<I, F>
where
    I: Operator<Item = Result<T>>,
    F: FnMut(&T) -> Result<bool>,
{
    fn name(&self) -> &'static str {
        "take_while"
    }

    fn plan(&self) -> OpPlan {
        OpPlan::new(self.name(), self.evaluation()).with_input(self.upstream.plan())
    }
}

/// Drops the leading run of elements satisfying the predicate, then yields
/// everything else without consulting it again.
pub struct SkipWhile<I, F> {
    upstream: I,
    predicate: F,
    skipping: bool,
}

impl<I, T, F> SkipWhile<I, F>
where
    I: Iterator<Item = Result<T>>,
    F: FnMut(&T) -> Result<bool>,
{
    pub fn new(upstream: I, predicate: F) -> Self {
        Self {
            upstream,
            predicate,
            skipping: true,
        }
    }
}

impl<I, T, F> Iterator for SkipWhile<I, F>
where
    I: Iterator<Item = Result<T>>,
    F: FnMut(&T) -> Result<bool>,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.skipping {
            let item = match self.upstream.next()? {
                Ok(item) => item,
                Err(e) => return Some(Err(e)),
            };
            match (self.predicate)(&item) {
                Ok(true) => continue,
                Ok(false) => {
                    self.skipping = false;
                    return Some(Ok(item));
                }
                Err(e) => return Some(Err(e)),
            }
        }
        self.upstream.next()
    }
}

impl<I, T, F> Operator for SkipWhile<I, F>
where
    I: Operator<Item = Result<T>>,
    F: FnMut(&T) -> Result<bool>,
{
    fn name(&self) -> &'static str {
        "skip_while"
    }

    fn plan(&self) -> OpPlan {
        OpPlan::new(self.name(), self.evaluation()).with_input(self.upstream.plan())
    }
}
