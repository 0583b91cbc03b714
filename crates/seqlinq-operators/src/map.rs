//! Projection operators: `select`, `select_with_index`, `select_many`.

use crate::plan::OpPlan;
use crate::traits::{Operator, Result};

/// Maps each element 1:1, preserving order.
pub struct Select<I, F> {
    upstream: I,
    selector: F,
}

impl<I, T, U, F> Select<I, F>
where
    I: Iterator<Item = Result<T>>,
    F: FnMut(T) -> Result<U>,
{
    pub fn new(upstream: I, selector: F) -> Self {
        Self { upstream, selector }
    }
}

impl<I, T, U, F> Iterator for Select<I, F>
where
    I: Iterator<Item = Result<T>>,
    F: FnMut(T) -> Result<U>,
{
    type Item = Result<U>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.upstream.next()?.and_then(&mut self.selector))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.upstream.size_hint()
    }
}

impl<I, T, U, F> Operator for Select<I, F>
where
    I: Operator<Item = Result<T>>,
    F: FnMut(T) -> Result<U>,
{
    fn name(&self) -> &'static str {
        "select"
    }

    fn plan(&self) -> OpPlan {
        OpPlan::new(self.name(), self.evaluation()).with_input(self.upstream.plan())
    }
}

/// Like `Select`, but the selector also receives the zero-based position.
pub struct SelectWithIndex<I, F> {
    upstream: I,
    selector: F,
    index: usize,
}

impl<I, T, U, F> SelectWithIndex<I, F>
where
    I: Iterator<Item = Result<T>>,
    F: FnMut(T, usize) -> Result<U>,
{
    pub fn new(upstream: I, selector: F) -> Self {
        Self {
            upstream,
            selector,
            index: 0,
        }
    }
}

impl<I, T, U, F> Iterator for SelectWithIndex<I, F>
where
    I: Iterator<Item = Result<T>>,
    F: FnMut(T, usize) -> Result<U>,
{
    type Item = Result<U>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = match self.upstream.next()? {
            Ok(item) => item,
            Err(e) => return Some(Err(e)),
        };
        let index = self.index;
        self.index += 1;
        Some((self.selector)(item, index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.upstream.size_hint()
    }
}

impl<I, T, U, F> Operator for SelectWithIndex<I, F>
where
    I: Operator<Item = Result<T>>,
    F: FnMut(T, usize) -> Result<U>,
{
    fn name(&self) -> &'static str {
        "select_with_index"
    }

    fn plan(&self) -> OpPlan {
        OpPlan::new(self.name(), self.evaluation()).with_input(self.upstream.plan())
    }
}

/// Flattens one level: every inner sequence is drained before the next outer
/// element is pulled.
pub struct SelectMany<I, F, J: IntoIterator> {
    upstream: I,
    selector: F,
    front: Option<J::IntoIter>,
}

impl<I, T, F, J> SelectMany<I, F, J>
where
    I: Iterator<Item = Result<T>>,
    F: FnMut(T) -> Result<J>,
    J: IntoIterator,
{
    pub fn new(upstream: I, selector: F) -> Self {
        Self {
            upstream,
            selector,
            front: None,
        }
    }
}

impl<I, T, F, J> Iterator for SelectMany<I, F, J>
where
    I: Iterator<Item = Result<T>>,
    F: FnMut(T) -> Result<J>,
    J: IntoIterator,
{
    type Item = Result<J::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(inner) = self.front.as_mut() {
                if let Some(item) = inner.next() {
                    return Some(Ok(item));
                }
                self.front = None;
            }
            let outer = match self.upstream.next()? {
                Ok(outer) => outer,
                Err(e) => return Some(Err(e)),
            };
            match (self.selector)(outer) {
                Ok(inner) => self.front = Some(inner.into_iter()),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

impl<I, T, F, J> Operator for SelectMany<I, F, J>
where
    I: Operator<Item = Result<T>>,
    F: FnMut(T) -> Result<J>,
    J: IntoIterator,
{
    fn name(&self) -> &'static str {
        "select_many"
    }

    fn plan(&self) -> OpPlan {
        OpPlan::new(self.name(), self.evaluation()).with_input(self.upstream.plan())
    }
}
