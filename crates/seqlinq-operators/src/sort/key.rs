//! Sort key chain: ordered (key selector, direction) levels applied by a
//! single stable sort.
//!
//! Each level computes its keys once per element before sorting starts, so
//! selectors never run inside the comparison loop. Comparisons that have no
//! answer (`partial_cmp` returning `None`) abort the sort with
//! `Error::Incomparable` rather than producing an arbitrary order.

use std::cmp::Ordering;
use std::marker::PhantomData;

use crate::traits::{Error, Result};

/// One level of a multi-key ordering.
pub trait SortLevel<T> {
    /// Compute whatever per-element state `compare` needs.
    fn prepare(&mut self, items: &[T]) -> Result<()>;

    /// Compare the elements at positions `a` and `b`, direction applied.
    fn compare(&self, items: &[T], a: usize, b: usize) -> Result<Ordering>;

    fn descending(&self) -> bool;
}

/// Level ordered by a projected key.
pub struct KeyLevel<T, K, F> {
    selector: F,
    descending: bool,
    keys: Vec<K>,
    _marker: PhantomData<fn(&T)>,
}

impl<T, K, F> KeyLevel<T, K, F>
where
    F: FnMut(&T) -> Result<K>,
    K: PartialOrd,
{
    pub fn new(selector: F, descending: bool) -> Self {
        Self {
            selector,
            descending,
            keys: Vec::new(),
            _marker: PhantomData,
        }
    }
}

impl<T, K, F> SortLevel<T> for KeyLevel<T, K, F>
where
    F: FnMut(&T) -> Result<K>,
    K: PartialOrd,
{
    fn prepare(&mut self, items: &[T]) -> Result<()> {
        let mut keys = Vec::with_capacity(items.len());
        for item in items {
            keys.push((self.selector)(item)?);
        }
        self.keys = keys;
        Ok(())
    }

    fn compare(&self, _items: &[T], a: usize, b: usize) -> Result<Ordering> {
        let ord = self.keys[a]
            .partial_cmp(&self.keys[b])
            .ok_or_else(|| incomparable(a, b))?;
        Ok(apply_direction(ord, self.descending))
    }

    fn descending(&self) -> bool {
        self.descending
    }
}

/// Level ordered by the elements themselves.
pub struct NaturalLevel {
    descending: bool,
}

impl NaturalLevel {
    pub fn new(descending: bool) -> Self {
        Self { descending }
    }
}

impl<T: PartialOrd> SortLevel<T> for NaturalLevel {
    fn prepare(&mut self, _items: &[T]) -> Result<()> {
        Ok(())
    }

    fn compare(&self, items: &[T], a: usize, b: usize) -> Result<Ordering> {
        let ord = items[a]
            .partial_cmp(&items[b])
            .ok_or_else(|| incomparable(a, b))?;
        Ok(apply_direction(ord, self.descending))
    }

    fn descending(&self) -> bool {
        self.descending
    }
}

fn apply_direction(ord: Ordering, descending: bool) -> Ordering {
    if descending {
        ord.reverse()
    } else {
        ord
    }
}

fn incomparable(a: usize, b: usize) -> Error {
    Error::Incomparable(format!(
        "sort keys of elements #{a} and #{b} have no defined order"
    ))
}

/// Ordered list of sort levels. Earlier levels take priority; later levels
/// only break the ties left by earlier ones.
pub struct SortKeyChain<'a, T> {
    levels: Vec<Box<dyn SortLevel<T> + 'a>>,
}

impl<'a, T> Default for SortKeyChain<'a, T> {
    fn default() -> Self {
        Self { levels: Vec::new() }
    }
}

impl<'a, T> SortKeyChain<'a, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, level: Box<dyn SortLevel<T> + 'a>) {
        self.levels.push(level);
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// `asc`/`desc` per level, in priority order.
    pub fn directions(&self) -> Vec<&'static str> {
        self.levels
            .iter()
            .map(|l| if l.descending() { "desc" } else { "asc" })
            .collect()
    }

    /// Sort `items` by the whole chain in one stable pass.
    pub fn sort(&mut self, items: Vec<T>) -> Result<Vec<T>> {
        // Keys are computed even for trivially sorted input so selector
        // failures do not depend on the input size.
        for level in self.levels.iter_mut() {
            level.prepare(&items)?;
        }
        if self.levels.is_empty() || items.len() < 2 {
            return Ok(items);
        }

        let levels = &self.levels;
        let order = stable_sort_indices(items.len(), |a, b| {
            for level in levels {
                match level.compare(&items, a, b)? {
                    Ordering::Equal => continue,
                    other => return Ok(other),
                }
            }
            Ok(Ordering::Equal)
        })?;

        let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
        Ok(order.into_iter().filter_map(|i| slots[i].take()).collect())
    }
}

/// Bottom-up merge sort over positions `0..len` with a fallible comparator.
///
/// Stable: on ties the element from the left run is emitted first. The first
/// comparator error aborts the sort.
pub fn stable_sort_indices<F>(len: usize, mut cmp: F) -> Result<Vec<usize>>
where
    F: FnMut(usize, usize) -> Result<Ordering>,
{
    let mut src: Vec<usize> = (0..len).collect();
    let mut dst: Vec<usize> = Vec::with_capacity(len);
    let mut width = 1;

    while width < len {
        dst.clear();
        let mut start = 0;
        while start < len {
            let mid = (start + width).min(len);
            let end = (start + 2 * width).min(len);
            let (mut i, mut j) = (start, mid);
            while i < mid && j < end {
                if cmp(src[j], src[i])? == Ordering::Less {
                    dst.push(src[j]);
                    j += 1;
                } else {
                    dst.push(src[i]);
                    i += 1;
                }
            }
            dst.extend_from_slice(&src[i..mid]);
            dst.extend_from_slice(&src[j..end]);
            start = end;
        }
        std::mem::swap(&mut src, &mut dst);
        width *= 2;
    }

    Ok(src)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn by<T, K: PartialOrd + 'static>(
        f: fn(&T) -> K,
        descending: bool,
    ) -> Box<dyn SortLevel<T>>
    where
        T: 'static,
    {
        Box::new(KeyLevel::new(move |t: &T| Ok(f(t)), descending))
    }

    #[test]
    fn test_merge_sort_is_stable() {
        let keys = [3, 1, 3, 2, 1, 3];
        let order = stable_sort_indices(keys.len(), |a, b| Ok(keys[a].cmp(&keys[b]))).unwrap();
        assert_eq!(order, vec![1, 4, 3, 0, 2, 5]);
    }

    #[test]
    fn test_merge_sort_propagates_errors() {
        let err = stable_sort_indices(4, |_, _| Err(Error::Incomparable("x".into())));
        assert!(matches!(err, Err(Error::Incomparable(_))));
        // Nothing to compare, nothing to fail.
        assert_eq!(
            stable_sort_indices(1, |_, _| Err(Error::Incomparable("x".into()))).unwrap(),
            vec![0]
        );
    }

    #[test]
    fn test_later_level_only_breaks_ties() {
        let mut chain: SortKeyChain<'_, (i32, char)> = SortKeyChain::new();
        chain.push(by(|p: &(i32, char)| p.0, false));
        chain.push(by(|p: &(i32, char)| p.1, false));
        let sorted = chain.sort(vec![(1, 'b'), (1, 'a'), (2, 'a')]).unwrap();
        assert_eq!(sorted, vec![(1, 'a'), (1, 'b'), (2, 'a')]);
        assert_eq!(chain.directions(), vec!["asc", "asc"]);
    }

    #[test]
    fn test_directions_are_independent() {
        let mut chain: SortKeyChain<'_, (i32, char)> = SortKeyChain::new();
        chain.push(by(|p: &(i32, char)| p.0, true));
        chain.push(by(|p: &(i32, char)| p.1, false));
        let sorted = chain
            .sort(vec![(1, 'b'), (2, 'z'), (1, 'a'), (2, 'c')])
            .unwrap();
        assert_eq!(sorted, vec![(2, 'c'), (2, 'z'), (1, 'a'), (1, 'b')]);
    }

    #[test]
    fn test_nan_key_is_incomparable() {
        let mut chain: SortKeyChain<'_, f64> = SortKeyChain::new();
        chain.push(Box::new(NaturalLevel::new(false)));
        let err = chain.sort(vec![1.0, f64::NAN, 0.5]).unwrap_err();
        assert!(matches!(err, Error::Incomparable(_)));
    }

    #[test]
    fn test_selector_runs_once_per_element() {
        let calls = std::cell::Cell::new(0);
        let mut chain: SortKeyChain<'_, i32> = SortKeyChain::new();
        chain.push(Box::new(KeyLevel::new(
            |x: &i32| {
                calls.set(calls.get() + 1);
                Ok(-*x)
            },
            false,
        )));
        let sorted = chain.sort(vec![5, 3, 9, 1, 7]).unwrap();
        assert_eq!(sorted, vec![9, 7, 5, 3, 1]);
        assert_eq!(calls.get(), 5);
    }
}
