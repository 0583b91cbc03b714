//! Distinctness by hashable key, first occurrence wins.

use std::hash::Hash;

use rustc_hash::FxHashSet;

use crate::plan::OpPlan;
use crate::traits::{Operator, Result};

/// Yields each element whose key has not been seen before.
///
/// Streaming: only the set of seen keys is retained. A key that cannot be
/// produced (e.g. `Error::Unhashable`) is reported when its element is pulled.
pub struct Distinct<I, F, K> {
    upstream: I,
    key: F,
    seen: FxHashSet<K>,
}

impl<I, T, F, K> Distinct<I, F, K>
where
    I: Iterator<Item = Result<T>>,
    F: FnMut(&T) -> Result<K>,
    K: Hash + Eq,
{
    pub fn new(upstream: I, key: F) -> Self {
        Self {
            upstream,
            key,
            seen: FxHashSet::default(),
        }
    }
}

impl<I, T, F, K> Iterator for Distinct<I, F, K>
where
    I: Iterator<Item = Result<T>>,
    F: FnMut(&T) -> Result<K>,
    K: Hash + Eq,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let item = match self.upstream.next()? {
                Ok(item) => item,
                Err(e) => return Some(Err(e)),
            };
            match (self.key)(&item) {
                Ok(key) => {
                    if self.seen.insert(key) {
                        return Some(Ok(item));
                    }
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.upstream.size_hint().1)
    }
}

impl<I, T, F, K> Operator for Distinct<I, F, K>
where
    I: Operator<Item = Result<T>>,
    F: FnMut(&T) -> Result<K>,
    K: Hash + Eq,
{
    fn name(&self) -> &'static str {
        "distinct"
    }

    fn plan(&self) -> OpPlan {
        OpPlan::new(self.name(), self.evaluation()).with_input(self.upstream.plan())
    }
}
