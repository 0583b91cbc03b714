//! Hash inner join.
//!
//! The inner source is indexed on the first pull (key -> elements in inner
//! order); outer elements then stream through in source order. Outer elements
//! without a match are dropped.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::budget::BufferBudget;
use crate::plan::{Evaluation, OpPlan};
use crate::traits::{Operator, Result};

pub struct HashJoin<I, T, J, K, FO, FI, FR>
where
    J: IntoIterator,
{
    outer: I,
    inner: Option<J>,
    outer_key: FO,
    inner_key: FI,
    result: FR,
    budget: BufferBudget,
    index: Option<FxHashMap<K, Vec<J::Item>>>,
    /// Outer element currently being matched, its key, and the next match.
    current: Option<(T, K, usize)>,
    exhausted: bool,
}

impl<I, T, J, K, FO, FI, FR, R> HashJoin<I, T, J, K, FO, FI, FR>
where
    I: Iterator<Item = Result<T>>,
    J: IntoIterator,
    K: Hash + Eq,
    FO: FnMut(&T) -> Result<K>,
    FI: FnMut(&J::Item) -> Result<K>,
    FR: FnMut(&T, &J::Item) -> Result<R>,
{
    pub fn new(
        outer: I,
        inner: J,
        outer_key: FO,
        inner_key: FI,
        result: FR,
        budget: BufferBudget,
    ) -> Self {
        Self {
            outer,
            inner: Some(inner),
            outer_key,
            inner_key,
            result,
            budget,
            index: None,
            current: None,
            exhausted: false,
        }
    }

    fn build_index(&mut self) -> Result<FxHashMap<K, Vec<J::Item>>> {
        let mut index: FxHashMap<K, Vec<J::Item>> = FxHashMap::default();
        let Some(inner) = self.inner.take() else {
            return Ok(index);
        };
        let mut held = 0usize;
        for item in inner {
            let key = (self.inner_key)(&item)?;
            held += 1;
            self.budget.check(held)?;
            index.entry(key).or_default().push(item);
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(elements = held, keys = index.len(), "join indexed inner");

        Ok(index)
    }
}

impl<I, T, J, K, FO, FI, FR, R> Iterator for HashJoin<I, T, J, K, FO, FI, FR>
where
    I: Iterator<Item = Result<T>>,
    J: IntoIterator,
    K: Hash + Eq,
    FO: FnMut(&T) -> Result<K>,
    FI: FnMut(&J::Item) -> Result<K>,
    FR: FnMut(&T, &J::Item) -> Result<R>,
{
    type Item = Result<R>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index.is_none() {
            if self.exhausted {
                return None;
            }
            self.exhausted = true;
            match self.build_index() {
                Ok(index) => self.index = Some(index),
                Err(e) => return Some(Err(e)),
            }
        }

        loop {
            if let Some((outer, key, pos)) = self.current.as_mut() {
                let matched = self
                    .index
                    .as_ref()
                    .and_then(|index| index.get(&*key))
                    .and_then(|matches| matches.get(*pos));
                if let Some(inner) = matched {
                    *pos += 1;
                    return Some((self.result)(&*outer, inner));
                }
                self.current = None;
            }

            let outer = match self.outer.next()? {
                Ok(outer) => outer,
                Err(e) => return Some(Err(e)),
            };
            let key = match (self.outer_key)(&outer) {
                Ok(key) => key,
                Err(e) => return Some(Err(e)),
            };
            let has_match = self
                .index
                .as_ref()
                .is_some_and(|index| index.contains_key(&key));
            if has_match {
                self.current = Some((outer, key, 0));
            }
        }
    }
}

impl<I, T, J, K, FO, FI, FR, R> Operator for HashJoin<I, T, J, K, FO, FI, FR>
where
    I: Operator<Item = Result<T>>,
    J: IntoIterator,
    K: Hash + Eq,
    FO: FnMut(&T) -> Result<K>,
    FI: FnMut(&J::Item) -> Result<K>,
    FR: FnMut(&T, &J::Item) -> Result<R>,
{
    fn name(&self) -> &'static str {
        "join"
    }

    fn evaluation(&self) -> Evaluation {
        Evaluation::Buffering
    }

    fn plan(&self) -> OpPlan {
        OpPlan::new(self.name(), self.evaluation())
            .with_detail("inner=hashed")
            .with_input(self.outer.plan())
    }
}
