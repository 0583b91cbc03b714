//! Terminal operations: pull the whole (or a prefix of the) chain and produce
//! a concrete result. Each terminal consumes the query.
//!
//! The first error raised anywhere in the chain aborts the terminal and is
//! returned as-is. Early-exit terminals (`any`, `first`, `element_at`, ...)
//! stop pulling as soon as their answer is known.

use std::cmp::Ordering;
use std::iter::Sum;

use indexmap::map::Entry;
use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use seqlinq_core::config::DuplicateKeyPolicy;
use seqlinq_core::error::{Error, Result};
use seqlinq_core::key::Hashable;
use seqlinq_operators::Operator;

use crate::metrics;
use crate::query::Query;

impl<I, T> Query<I>
where
    I: Operator<Item = Result<T>>,
{
    // ---- collections ------------------------------------------------------

    pub fn to_list(self) -> Result<Vec<T>> {
        let (node, _) = self.parts();
        let items = node.collect::<Result<Vec<T>>>()?;
        metrics::emit_span("to_list", &[("elements", items.len().to_string())]);
        Ok(items)
    }

    /// Fixed-size, immutable materialization.
    pub fn to_tuple(self) -> Result<Box<[T]>> {
        self.to_list().map(Vec::into_boxed_slice)
    }

    /// Set of element keys; fails with `Unhashable` on the first element that
    /// has no key.
    pub fn to_set(self) -> Result<FxHashSet<T::Key>>
    where
        T: Hashable,
    {
        let (node, _) = self.parts();
        let mut set = FxHashSet::default();
        for item in node {
            set.insert(item?.hash_key()?);
        }
        metrics::emit_span("to_set", &[("keys", set.len().to_string())]);
        Ok(set)
    }

    /// Map each element's key to the element itself, in first-insertion order.
    pub fn to_dictionary<K, S>(self, key_selector: S) -> Result<IndexMap<K::Key, T>>
    where
        K: Hashable,
        S: FnMut(&T) -> K,
    {
        self.to_dictionary_with(key_selector, |item: T| item)
    }

    /// Map each element's key to a projected value.
    ///
    /// Key collisions follow `QueryConfig::duplicate_keys`: `Reject` fails with
    /// `DuplicateKey`, `LastWins` overwrites the value while the key keeps the
    /// position of its first occurrence.
    pub fn to_dictionary_with<K, V, S, P>(
        self,
        mut key_selector: S,
        mut value_selector: P,
    ) -> Result<IndexMap<K::Key, V>>
    where
        K: Hashable,
        S: FnMut(&T) -> K,
        P: FnMut(T) -> V,
    {
        let (node, config) = self.parts();
        let mut map = IndexMap::new();
        for (position, item) in node.enumerate() {
            let item = item?;
            let key = key_selector(&item).hash_key()?;
            match map.entry(key) {
                Entry::Occupied(mut entry) => match config.duplicate_keys {
                    DuplicateKeyPolicy::Reject => {
                        return Err(Error::DuplicateKey(format!(
                            "element #{position} repeats the key of entry #{}",
                            entry.index()
                        )));
                    }
                    DuplicateKeyPolicy::LastWins => {
                        entry.insert(value_selector(item));
                    }
                },
                Entry::Vacant(entry) => {
                    entry.insert(value_selector(item));
                }
            }
        }
        metrics::emit_span(
            "to_dictionary",
            &[
                ("entries", map.len().to_string()),
                ("policy", config.duplicate_keys.to_string()),
            ],
        );
        Ok(map)
    }

    // ---- counting & arithmetic --------------------------------------------

    pub fn count(self) -> Result<usize> {
        let (node, _) = self.parts();
        let mut n = 0usize;
        for item in node {
            item?;
            n += 1;
        }
        drained("count", n);
        Ok(n)
    }

    pub fn count_where<P>(self, mut predicate: P) -> Result<usize>
    where
        P: FnMut(&T) -> bool,
    {
        let (node, _) = self.parts();
        let mut n = 0usize;
        for item in node {
            if predicate(&item?) {
                n += 1;
            }
        }
        drained("count_where", n);
        Ok(n)
    }

    /// Sum of the elements; the additive identity for an empty sequence.
    ///
    /// Uses the element type's own `Sum`, so integer overflow panics in debug
    /// builds and wraps in release. Use `try_aggregate` with `checked_add`
    /// when the total may not fit.
    pub fn sum(self) -> Result<T>
    where
        T: Sum<T>,
    {
        self.sum_by(|item: T| item)
    }

    /// Sum of projected values; overflow behaves as in `sum`.
    pub fn sum_by<U, S>(self, mut selector: S) -> Result<U>
    where
        U: Sum<U>,
        S: FnMut(T) -> U,
    {
        let (node, _) = self.parts();
        let mut n = 0usize;
        let total = node
            .map(|item| {
                n += 1;
                item.map(&mut selector)
            })
            .sum::<Result<U>>()?;
        drained("sum", n);
        Ok(total)
    }

    /// Arithmetic mean. Fails with `EmptySequence` when there is nothing to
    /// average.
    pub fn average(self) -> Result<f64>
    where
        T: Into<f64>,
    {
        self.average_by(|item: T| item.into())
    }

    /// Arithmetic mean of a projection, for element types (`i64`, `u64`,
    /// `usize`, ...) that do not convert to `f64` losslessly.
    pub fn average_by<S>(self, mut selector: S) -> Result<f64>
    where
        S: FnMut(T) -> f64,
    {
        let (node, _) = self.parts();
        let mut total = 0.0_f64;
        let mut n = 0usize;
        for item in node {
            total += selector(item?);
            n += 1;
        }
        drained("average", n);
        if n == 0 {
            return Err(Error::EmptySequence("average"));
        }
        Ok(total / n as f64)
    }

    pub fn aggregate<A, F>(self, seed: A, mut accumulator: F) -> Result<A>
    where
        F: FnMut(A, T) -> A,
    {
        self.try_aggregate(seed, move |acc, item| Ok(accumulator(acc, item)))
    }

    pub fn try_aggregate<A, F>(self, seed: A, mut accumulator: F) -> Result<A>
    where
        F: FnMut(A, T) -> Result<A>,
    {
        let (mut node, _) = self.parts();
        let mut n = 0usize;
        let result = node.try_fold(seed, |acc, item| {
            n += 1;
            accumulator(acc, item?)
        })?;
        drained("aggregate", n);
        Ok(result)
    }

    // ---- quantifiers ------------------------------------------------------

    /// `true` when every element satisfies `predicate` (vacuously for empty
    /// input). Stops at the first failure.
    pub fn all<P>(self, mut predicate: P) -> Result<bool>
    where
        P: FnMut(&T) -> bool,
    {
        let (node, _) = self.parts();
        for item in node {
            if !predicate(&item?) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// `true` when the sequence has at least one element. Pulls at most one.
    pub fn any(self) -> Result<bool> {
        let (mut node, _) = self.parts();
        node.next().transpose().map(|first| first.is_some())
    }

    pub fn any_where<P>(self, mut predicate: P) -> Result<bool>
    where
        P: FnMut(&T) -> bool,
    {
        let (node, _) = self.parts();
        for item in node {
            if predicate(&item?) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn contains(self, value: &T) -> Result<bool>
    where
        T: PartialEq,
    {
        self.any_where(|item| item == value)
    }

    // ---- element access ---------------------------------------------------

    pub fn first(self) -> Result<T> {
        self.first_or_none()?.ok_or(Error::EmptySequence("first"))
    }

    pub fn first_where<P>(self, mut predicate: P) -> Result<T>
    where
        P: FnMut(&T) -> bool,
    {
        let (node, _) = self.parts();
        for item in node {
            let item = item?;
            if predicate(&item) {
                return Ok(item);
            }
        }
        Err(Error::EmptySequence("first_where"))
    }

    pub fn first_or_none(self) -> Result<Option<T>> {
        let (mut node, _) = self.parts();
        node.next().transpose()
    }

    pub fn last(self) -> Result<T> {
        let (node, _) = self.parts();
        let mut last = None;
        let mut n = 0usize;
        for item in node {
            last = Some(item?);
            n += 1;
        }
        drained("last", n);
        last.ok_or(Error::EmptySequence("last"))
    }

    /// The only element. Pulls at most two.
    pub fn single(self) -> Result<T> {
        let (mut node, _) = self.parts();
        let only = node
            .next()
            .transpose()?
            .ok_or(Error::EmptySequence("single"))?;
        match node.next().transpose()? {
            None => Ok(only),
            Some(_) => Err(Error::InvalidArgument(
                "single: sequence contains more than one element".into(),
            )),
        }
    }

    /// Element at zero-based `index`. Pulls `index + 1` elements at most.
    pub fn element_at(self, index: usize) -> Result<T> {
        let (node, _) = self.parts();
        let mut seen = 0usize;
        for item in node {
            let item = item?;
            if seen == index {
                return Ok(item);
            }
            seen += 1;
        }
        Err(Error::InvalidArgument(format!(
            "element_at: index {index} out of range for a sequence of {seen} elements"
        )))
    }

    // ---- extremes ---------------------------------------------------------

    /// Smallest element; the first one wins ties.
    pub fn min(self) -> Result<T>
    where
        T: PartialOrd,
    {
        self.extreme("min", Ordering::Less)
    }

    /// Largest element; the first one wins ties.
    pub fn max(self) -> Result<T>
    where
        T: PartialOrd,
    {
        self.extreme("max", Ordering::Greater)
    }

    fn extreme(self, op: &'static str, wanted: Ordering) -> Result<T>
    where
        T: PartialOrd,
    {
        let (node, _) = self.parts();
        let mut best: Option<T> = None;
        let mut seen = 0usize;
        for (position, item) in node.enumerate() {
            let item = item?;
            seen = position + 1;
            best = Some(match best {
                None => item,
                Some(current) => match item.partial_cmp(&current) {
                    Some(ord) if ord == wanted => item,
                    Some(_) => current,
                    None => {
                        return Err(Error::Incomparable(format!(
                            "{op}: element #{position} has no defined order against the current {op}"
                        )))
                    }
                },
            });
        }
        drained(op, seen);
        best.ok_or(Error::EmptySequence(op))
    }
}

fn drained(op: &'static str, elements: usize) {
    metrics::emit_span(op, &[("elements", elements.to_string())]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use seqlinq_core::config::QueryConfig;
    use seqlinq_core::value::Value;

    fn q<T>(items: Vec<T>) -> Query<seqlinq_operators::Source<std::vec::IntoIter<T>>> {
        Query::from_iterable(items)
    }

    #[test]
    fn test_to_list_and_tuple() {
        assert_eq!(q(vec![1, 2, 3]).to_list().unwrap(), vec![1, 2, 3]);
        let tuple = q(vec!['a', 'b']).to_tuple().unwrap();
        assert_eq!(&*tuple, &['a', 'b']);
    }

    #[test]
    fn test_to_set_rejects_unhashable() {
        let set = q(vec![1, 2, 2, 3]).to_set().unwrap();
        assert_eq!(set.len(), 3);

        let err = q(vec![Value::Int(1), Value::list([2])]).to_set().unwrap_err();
        assert!(matches!(err, Error::Unhashable(_)));
    }

    #[test]
    fn test_to_dictionary_rejects_duplicates_by_default() {
        let err = q(vec!["apple", "avocado"])
            .to_dictionary(|w: &&str| w.chars().next())
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateKey(_)));
    }

    #[test]
    fn test_to_dictionary_last_wins_keeps_first_position() {
        let config = QueryConfig::default().with_duplicate_keys(DuplicateKeyPolicy::LastWins);
        let map = q(vec![("a", 1), ("b", 2), ("a", 3)])
            .with_config(config)
            .to_dictionary_with(|p: &(&'static str, i32)| p.0, |p: (&'static str, i32)| p.1)
            .unwrap();
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(map["a"], 3);
    }

    #[test]
    fn test_counting_and_sums() {
        assert_eq!(q(vec![4, 5, 6]).count().unwrap(), 3);
        assert_eq!(q(vec![4, 5, 6]).count_where(|x| x % 2 == 0).unwrap(), 2);
        assert_eq!(q(vec![4, 5, 6]).sum().unwrap(), 15);
        assert_eq!(q(Vec::<i64>::new()).sum().unwrap(), 0);
        assert_eq!(q(vec!["ab", "cde"]).sum_by(|s| s.len()).unwrap(), 5);
    }

    #[test]
    fn test_average() {
        assert_eq!(q(vec![1, 2, 3, 4]).average().unwrap(), 2.5);
        assert_eq!(
            q(Vec::<i32>::new()).average(),
            Err(Error::EmptySequence("average"))
        );
    }

    #[test]
    fn test_average_by_wide_integers() {
        let big = q(vec![i64::MAX, i64::MAX]).average_by(|x| x as f64).unwrap();
        assert_eq!(big, i64::MAX as f64);
        assert_eq!(q(vec![1usize, 2]).average_by(|x| x as f64).unwrap(), 1.5);
        assert_eq!(
            q(Vec::<u64>::new()).average_by(|x| x as f64),
            Err(Error::EmptySequence("average"))
        );
    }

    #[test]
    fn test_checked_sum_through_try_aggregate() {
        let checked = |items: Vec<i32>| {
            q(items).try_aggregate(0i32, |acc, x| {
                acc.checked_add(x)
                    .ok_or_else(|| Error::InvalidArgument("sum overflowed i32".into()))
            })
        };
        assert_eq!(checked(vec![1, 2, 3]), Ok(6));
        assert!(matches!(
            checked(vec![i32::MAX, 1]),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_draining_terminals_report_events() {
        crate::metrics::recorded::take();
        q(vec![3, 1, 2]).count().unwrap();
        q(vec![3, 1, 2]).count_where(|x| *x > 1).unwrap();
        q(vec![3, 1, 2]).sum().unwrap();
        q(vec![3, 1, 2]).average().unwrap();
        q(vec![3, 1, 2]).aggregate(0, |a, x| a + x).unwrap();
        q(vec![3, 1, 2]).last().unwrap();
        q(vec![3, 1, 2]).min().unwrap();
        q(vec![3, 1, 2]).max().unwrap();
        q(vec![3, 1, 2]).to_list().unwrap();
        assert_eq!(
            crate::metrics::recorded::take(),
            vec![
                "count",
                "count_where",
                "sum",
                "average",
                "aggregate",
                "last",
                "min",
                "max",
                "to_list"
            ]
        );

        // Early-exit terminals stay silent.
        q(vec![3, 1, 2]).first().unwrap();
        q(vec![3, 1, 2]).any().unwrap();
        assert!(crate::metrics::recorded::take().is_empty());
    }

    #[test]
    fn test_quantifiers() {
        assert!(q(Vec::<i32>::new()).all(|_| false).unwrap());
        assert!(!q(vec![2, 3]).all(|x| x % 2 == 0).unwrap());
        assert!(q(vec![0]).any().unwrap());
        assert!(!q(Vec::<i32>::new()).any().unwrap());
        assert!(q(vec![1, 2]).any_where(|x| *x > 1).unwrap());
        assert!(q(vec![1, 2]).contains(&2).unwrap());
    }

    #[test]
    fn test_any_pulls_one_element() {
        let mut pulled = 0;
        let source = (0..10).inspect(|_| pulled += 1);
        assert!(Query::from_iterable(source).any().unwrap());
        assert_eq!(pulled, 1);
    }

    #[test]
    fn test_element_access() {
        assert_eq!(q(vec![7, 8, 9]).first().unwrap(), 7);
        assert_eq!(q(vec![7, 8, 9]).last().unwrap(), 9);
        assert_eq!(q(vec![7, 8, 9]).first_where(|x| *x > 7).unwrap(), 8);
        assert_eq!(q(vec![7, 8, 9]).element_at(2).unwrap(), 9);
        assert!(matches!(
            q(vec![7, 8, 9]).element_at(3),
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(q(Vec::<i32>::new()).first_or_none().unwrap(), None);
        assert_eq!(
            q(Vec::<i32>::new()).first(),
            Err(Error::EmptySequence("first"))
        );
    }

    #[test]
    fn test_single() {
        assert_eq!(q(vec![42]).single().unwrap(), 42);
        assert!(matches!(
            q(vec![1, 2]).single(),
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(
            q(Vec::<i32>::new()).single(),
            Err(Error::EmptySequence("single"))
        );
    }

    #[test]
    fn test_min_max() {
        assert_eq!(q(vec![3, 1, 2]).min().unwrap(), 1);
        assert_eq!(q(vec![3, 1, 2]).max().unwrap(), 3);
        assert_eq!(
            q(Vec::<i32>::new()).max(),
            Err(Error::EmptySequence("max"))
        );
        let err = q(vec![1.0, f64::NAN]).min().unwrap_err();
        assert!(matches!(err, Error::Incomparable(_)));
    }

    #[test]
    fn test_aggregate() {
        let joined = q(vec!["a", "b", "c"])
            .aggregate(String::new(), |mut acc, s| {
                acc.push_str(s);
                acc
            })
            .unwrap();
        assert_eq!(joined, "abc");

        let err = q(vec![1, 2, 3])
            .try_aggregate(0, |acc, x| {
                if x == 2 {
                    Err(Error::callback("two"))
                } else {
                    Ok(acc + x)
                }
            })
            .unwrap_err();
        assert_eq!(err, Error::Callback("two".into()));
    }

    #[test]
    fn test_upstream_error_aborts_terminal() {
        let items = vec![Ok(1), Err(Error::callback("boom")), Ok(3)];
        let err = Query::from_results(items).to_list().unwrap_err();
        assert_eq!(err, Error::Callback("boom".into()));
    }
}
