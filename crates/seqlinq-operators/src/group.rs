//! Grouping structure and the `group_by` operator.

use indexmap::map::{Entry, IntoValues};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use serde::{Deserialize, Serialize};

use seqlinq_core::key::Hashable;

use crate::budget::BufferBudget;
use crate::plan::{Evaluation, OpPlan};
use crate::traits::{Operator, Result};

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// A key paired with the elements that produced it, in source order.
///
/// A grouping is itself iterable, so it can seed a nested query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grouping<K, T> {
    key: K,
    elements: Vec<T>,
}

impl<K, T> Grouping<K, T> {
    pub fn new(key: K, elements: Vec<T>) -> Self {
        Self { key, elements }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn elements(&self) -> &[T] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of members; same as `len`, named for query-style call sites.
    pub fn count(&self) -> usize {
        self.elements.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.elements.iter()
    }

    pub fn into_parts(self) -> (K, Vec<T>) {
        (self.key, self.elements)
    }

    fn push(&mut self, item: T) {
        self.elements.push(item);
    }
}

impl<K, T> IntoIterator for Grouping<K, T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl<'g, K, T> IntoIterator for &'g Grouping<K, T> {
    type Item = &'g T;
    type IntoIter = std::slice::Iter<'g, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

/// Buffering operator: drains upstream on the first pull, then yields one
/// `Grouping` per distinct key in first-occurrence order.
///
/// Any failure while buffering (upstream, key selector, unhashable key,
/// buffer limit) is yielded once and the node is exhausted afterwards; no
/// partial groups are produced.
pub struct GroupBy<I, F, K: Hashable, T> {
    upstream: I,
    selector: F,
    budget: BufferBudget,
    groups: Option<IntoValues<K::Key, Grouping<K, T>>>,
    exhausted: bool,
}

impl<I, T, F, K> GroupBy<I, F, K, T>
where
    I: Iterator<Item = Result<T>>,
    F: FnMut(&T) -> Result<K>,
    K: Hashable,
{
    pub fn new(upstream: I, selector: F, budget: BufferBudget) -> Self {
        Self {
            upstream,
            selector,
            budget,
            groups: None,
            exhausted: false,
        }
    }

    fn buffer(&mut self) -> Result<FxIndexMap<K::Key, Grouping<K, T>>> {
        let mut groups: FxIndexMap<K::Key, Grouping<K, T>> = FxIndexMap::default();
        let mut held = 0usize;
        for item in self.upstream.by_ref() {
            let item = item?;
            let key = (self.selector)(&item)?;
            let hashed = key.hash_key()?;
            held += 1;
            self.budget.check(held)?;
            match groups.entry(hashed) {
                Entry::Occupied(mut entry) => entry.get_mut().push(item),
                Entry::Vacant(entry) => {
                    entry.insert(Grouping::new(key, vec![item]));
                }
            }
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(elements = held, groups = groups.len(), "group_by buffered");

        Ok(groups)
    }
}

impl<I, T, F, K> Iterator for GroupBy<I, F, K, T>
where
    I: Iterator<Item = Result<T>>,
    F: FnMut(&T) -> Result<K>,
    K: Hashable,
{
    type Item = Result<Grouping<K, T>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.groups.is_none() {
            if self.exhausted {
                return None;
            }
            self.exhausted = true;
            match self.buffer() {
                Ok(groups) => self.groups = Some(groups.into_values()),
                Err(e) => return Some(Err(e)),
            }
        }
        self.groups.as_mut()?.next().map(Ok)
    }
}

impl<I, T, F, K> Operator for GroupBy<I, F, K, T>
where
    I: Operator<Item = Result<T>>,
    F: FnMut(&T) -> Result<K>,
    K: Hashable,
{
    fn name(&self) -> &'static str {
        "group_by"
    }

    fn evaluation(&self) -> Evaluation {
        Evaluation::Buffering
    }

    fn plan(&self) -> OpPlan {
        OpPlan::new(self.name(), self.evaluation()).with_input(self.upstream.plan())
    }
}
