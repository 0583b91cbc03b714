//! Query facade: the chainable handle over a pipeline node.
//!
//! Every operator method consumes the facade and returns a new one wrapping a
//! new node; nothing is evaluated until a terminal (see `terminal.rs`) or a
//! `for` loop pulls from it. `order_by`, `group_by`, `join`, and `reverse`
//! buffer their input when first pulled; `explain()` lists them.

use std::fmt;

use seqlinq_core::config::QueryConfig;
use seqlinq_core::error::Result;
use seqlinq_core::key::Hashable;

use seqlinq_operators::sort::{KeyLevel, NaturalLevel, SortLevel};
use seqlinq_operators::{
    BufferBudget, Concat, Distinct, Fallible, GroupBy, HashJoin, OpPlan, Operator, OrderBy,
    Reverse, Select, SelectMany, SelectWithIndex, Skip, SkipWhile, Source, Take, TakeWhile, Where,
};

pub struct Query<I> {
    node: I,
    config: QueryConfig,
}

impl<S: Iterator> Query<Source<S>> {
    /// Start a query over any iterable, in its natural iteration order.
    pub fn from_iterable<C>(source: C) -> Self
    where
        C: IntoIterator<IntoIter = S>,
    {
        Query {
            node: Source::new(source),
            config: QueryConfig::default(),
        }
    }
}

impl<S, T> Query<Fallible<S>>
where
    S: Iterator<Item = Result<T>>,
{
    /// Start a query over a source whose items can already fail.
    pub fn from_results<C>(source: C) -> Self
    where
        C: IntoIterator<IntoIter = S>,
    {
        Query {
            node: Fallible::new(source),
            config: QueryConfig::default(),
        }
    }
}

impl<I> Query<I> {
    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Unwrap the pipeline node, e.g. to drive it by hand.
    pub fn into_node(self) -> I {
        self.node
    }

    pub(crate) fn parts(self) -> (I, QueryConfig) {
        (self.node, self.config)
    }

    fn wrap<N>(node: N, config: QueryConfig) -> Query<N> {
        Query { node, config }
    }
}

impl<I, T> Query<I>
where
    I: Operator<Item = Result<T>>,
{
    /// Replace the configuration for this query and every node chained after.
    pub fn with_config(mut self, config: QueryConfig) -> Self {
        self.config = config;
        self
    }

    /// Describe the chain without evaluating it.
    pub fn explain(&self) -> OpPlan {
        self.node.plan()
    }

    fn budget(&self, op: &'static str) -> BufferBudget {
        BufferBudget::new(op, self.config.max_buffered)
    }

    // ---- filtering & projection -------------------------------------------

    /// Keep the elements for which `predicate` holds (`where` is a keyword).
    pub fn where_by<P>(self, mut predicate: P) -> Query<Where<I, impl FnMut(&T) -> Result<bool>>>
    where
        P: FnMut(&T) -> bool,
    {
        self.try_where_by(move |item: &T| Ok(predicate(item)))
    }

    pub fn try_where_by<P>(self, predicate: P) -> Query<Where<I, P>>
    where
        P: FnMut(&T) -> Result<bool>,
    {
        let (node, config) = self.parts();
        Self::wrap(Where::new(node, predicate), config)
    }

    pub fn select<U, S>(self, mut selector: S) -> Query<Select<I, impl FnMut(T) -> Result<U>>>
    where
        S: FnMut(T) -> U,
    {
        self.try_select(move |item: T| Ok(selector(item)))
    }

    pub fn try_select<U, S>(self, selector: S) -> Query<Select<I, S>>
    where
        S: FnMut(T) -> Result<U>,
    {
        let (node, config) = self.parts();
        Self::wrap(Select::new(node, selector), config)
    }

    /// Project with access to each element's zero-based position.
    pub fn select_with_index<U, S>(
        self,
        mut selector: S,
    ) -> Query<SelectWithIndex<I, impl FnMut(T, usize) -> Result<U>>>
    where
        S: FnMut(T, usize) -> U,
    {
        let (node, config) = self.parts();
        Self::wrap(
            SelectWithIndex::new(node, move |item: T, index: usize| Ok(selector(item, index))),
            config,
        )
    }

    /// Flatten one level of nested sequences.
    pub fn select_many<J, S>(
        self,
        mut selector: S,
    ) -> Query<SelectMany<I, impl FnMut(T) -> Result<J>, J>>
    where
        J: IntoIterator,
        S: FnMut(T) -> J,
    {
        self.try_select_many(move |item: T| Ok(selector(item)))
    }

    pub fn try_select_many<J, S>(self, selector: S) -> Query<SelectMany<I, S, J>>
    where
        J: IntoIterator,
        S: FnMut(T) -> Result<J>,
    {
        let (node, config) = self.parts();
        Self::wrap(SelectMany::new(node, selector), config)
    }

    // ---- bounding ---------------------------------------------------------

    /// First `count` elements. Fails with `InvalidArgument` for negative counts.
    pub fn take<N>(self, count: N) -> Result<Query<Take<I>>>
    where
        N: TryInto<usize> + Copy + fmt::Display,
    {
        let (node, config) = self.parts();
        Ok(Self::wrap(Take::new(node, count)?, config))
    }

    /// All but the first `count` elements. Fails with `InvalidArgument` for
    /// negative counts.
    pub fn skip<N>(self, count: N) -> Result<Query<Skip<I>>>
    where
        N: TryInto<usize> + Copy + fmt::Display,
    {
        let (node, config) = self.parts();
        Ok(Self::wrap(Skip::new(node, count)?, config))
    }

    pub fn take_while<P>(
        self,
        mut predicate: P,
    ) -> Query<TakeWhile<I, impl FnMut(&T) -> Result<bool>>>
    where
        P: FnMut(&T) -> bool,
    {
        let (node, config) = self.parts();
        Self::wrap(
            TakeWhile::new(node, move |item: &T| Ok(predicate(item))),
            config,
        )
    }

    pub fn skip_while<P>(
        self,
        mut predicate: P,
    ) -> Query<SkipWhile<I, impl FnMut(&T) -> Result<bool>>>
    where
        P: FnMut(&T) -> bool,
    {
        let (node, config) = self.parts();
        Self::wrap(
            SkipWhile::new(node, move |item: &T| Ok(predicate(item))),
            config,
        )
    }

    /// Append the items of `other` after this query's elements.
    pub fn concat<C>(self, other: C) -> Query<Concat<I, C::IntoIter>>
    where
        C: IntoIterator<Item = T>,
    {
        let (node, config) = self.parts();
        Self::wrap(Concat::new(node, other.into_iter()), config)
    }

    // ---- distinctness & grouping ------------------------------------------

    /// First occurrence of each element; `Unhashable` surfaces per element.
    pub fn distinct(self) -> Query<Distinct<I, impl FnMut(&T) -> Result<T::Key>, T::Key>>
    where
        T: Hashable,
    {
        let (node, config) = self.parts();
        Self::wrap(Distinct::new(node, |item: &T| item.hash_key()), config)
    }

    /// First element for each distinct projected key.
    pub fn distinct_by<K, S>(
        self,
        mut selector: S,
    ) -> Query<Distinct<I, impl FnMut(&T) -> Result<K::Key>, K::Key>>
    where
        K: Hashable,
        S: FnMut(&T) -> K,
    {
        let (node, config) = self.parts();
        Self::wrap(
            Distinct::new(node, move |item: &T| selector(item).hash_key()),
            config,
        )
    }

    /// Buffering: groups in first-seen key order, members in source order.
    pub fn group_by<K, S>(
        self,
        mut selector: S,
    ) -> Query<GroupBy<I, impl FnMut(&T) -> Result<K>, K, T>>
    where
        K: Hashable,
        S: FnMut(&T) -> K,
    {
        self.try_group_by(move |item: &T| Ok(selector(item)))
    }

    pub fn try_group_by<K, S>(self, selector: S) -> Query<GroupBy<I, S, K, T>>
    where
        K: Hashable,
        S: FnMut(&T) -> Result<K>,
    {
        let budget = self.budget("group_by");
        let (node, config) = self.parts();
        Self::wrap(GroupBy::new(node, selector, budget), config)
    }

    // ---- ordering ---------------------------------------------------------

    /// Buffering: ascending by `selector`. Chain `then_by*` to break ties.
    pub fn order_by<'a, K, S>(self, mut selector: S) -> Query<OrderBy<'a, I, T>>
    where
        S: FnMut(&T) -> K + 'a,
        K: PartialOrd + 'a,
        T: 'a,
    {
        let level = KeyLevel::new(move |item: &T| Ok(selector(item)), false);
        self.order_with(Box::new(level))
    }

    pub fn order_by_descending<'a, K, S>(self, mut selector: S) -> Query<OrderBy<'a, I, T>>
    where
        S: FnMut(&T) -> K + 'a,
        K: PartialOrd + 'a,
        T: 'a,
    {
        let level = KeyLevel::new(move |item: &T| Ok(selector(item)), true);
        self.order_with(Box::new(level))
    }

    /// Buffering: ascending by the elements' natural ordering.
    pub fn order<'a>(self) -> Query<OrderBy<'a, I, T>>
    where
        T: PartialOrd + 'a,
    {
        self.order_with(Box::new(NaturalLevel::new(false)))
    }

    pub fn order_descending<'a>(self) -> Query<OrderBy<'a, I, T>>
    where
        T: PartialOrd + 'a,
    {
        self.order_with(Box::new(NaturalLevel::new(true)))
    }

    fn order_with<'a>(self, level: Box<dyn SortLevel<T> + 'a>) -> Query<OrderBy<'a, I, T>> {
        let budget = self.budget("order_by");
        let (node, config) = self.parts();
        Self::wrap(OrderBy::new(node, level, budget), config)
    }

    /// Buffering: elements back to front.
    pub fn reverse(self) -> Query<Reverse<I, T>> {
        let budget = self.budget("reverse");
        let (node, config) = self.parts();
        Self::wrap(Reverse::new(node, budget), config)
    }

    // ---- joining ----------------------------------------------------------

    /// Inner equi-join yielding `(outer, inner)` pairs; see `join_with`.
    #[allow(clippy::type_complexity)]
    pub fn join<U, K, J, FO, FI>(
        self,
        inner: J,
        outer_key: FO,
        inner_key: FI,
    ) -> Query<
        HashJoin<
            I,
            T,
            J,
            K::Key,
            impl FnMut(&T) -> Result<K::Key>,
            impl FnMut(&U) -> Result<K::Key>,
            impl FnMut(&T, &U) -> Result<(T, U)>,
        >,
    >
    where
        J: IntoIterator<Item = U>,
        K: Hashable,
        T: Clone,
        U: Clone,
        FO: FnMut(&T) -> K,
        FI: FnMut(&U) -> K,
    {
        self.join_inner(inner, outer_key, inner_key, |outer: &T, inner: &U| {
            Ok((outer.clone(), inner.clone()))
        })
    }

    /// Inner equi-join. The inner source is indexed on the first pull; each
    /// outer element (in source order) is paired with every inner element
    /// sharing its key (in inner order). Unmatched elements are dropped.
    #[allow(clippy::type_complexity)]
    pub fn join_with<U, K, R, J, FO, FI, FR>(
        self,
        inner: J,
        outer_key: FO,
        inner_key: FI,
        mut result_selector: FR,
    ) -> Query<
        HashJoin<
            I,
            T,
            J,
            K::Key,
            impl FnMut(&T) -> Result<K::Key>,
            impl FnMut(&U) -> Result<K::Key>,
            impl FnMut(&T, &U) -> Result<R>,
        >,
    >
    where
        J: IntoIterator<Item = U>,
        K: Hashable,
        FO: FnMut(&T) -> K,
        FI: FnMut(&U) -> K,
        FR: FnMut(&T, &U) -> R,
    {
        self.join_inner(inner, outer_key, inner_key, move |outer: &T, inner: &U| {
            Ok(result_selector(outer, inner))
        })
    }

    #[allow(clippy::type_complexity)]
    fn join_inner<U, K, R, J, FO, FI, FR>(
        self,
        inner: J,
        mut outer_key: FO,
        mut inner_key: FI,
        result: FR,
    ) -> Query<
        HashJoin<
            I,
            T,
            J,
            K::Key,
            impl FnMut(&T) -> Result<K::Key>,
            impl FnMut(&U) -> Result<K::Key>,
            FR,
        >,
    >
    where
        J: IntoIterator<Item = U>,
        K: Hashable,
        FO: FnMut(&T) -> K,
        FI: FnMut(&U) -> K,
        FR: FnMut(&T, &U) -> Result<R>,
    {
        let budget = self.budget("join");
        let (node, config) = self.parts();
        Self::wrap(
            HashJoin::new(
                node,
                inner,
                move |item: &T| outer_key(item).hash_key(),
                move |item: &U| inner_key(item).hash_key(),
                result,
                budget,
            ),
            config,
        )
    }
}

impl<'a, I, T> Query<OrderBy<'a, I, T>>
where
    I: Operator<Item = Result<T>>,
{
    /// Break remaining ties ascending by `selector`.
    pub fn then_by<K, S>(self, mut selector: S) -> Self
    where
        S: FnMut(&T) -> K + 'a,
        K: PartialOrd + 'a,
        T: 'a,
    {
        let level = KeyLevel::new(move |item: &T| Ok(selector(item)), false);
        self.then_with(Box::new(level))
    }

    /// Break remaining ties descending by `selector`.
    pub fn then_by_descending<K, S>(self, mut selector: S) -> Self
    where
        S: FnMut(&T) -> K + 'a,
        K: PartialOrd + 'a,
        T: 'a,
    {
        let level = KeyLevel::new(move |item: &T| Ok(selector(item)), true);
        self.then_with(Box::new(level))
    }

    fn then_with(self, level: Box<dyn SortLevel<T> + 'a>) -> Self {
        let (node, config) = self.parts();
        Query {
            node: node.then(level),
            config,
        }
    }
}

impl<I: Iterator> IntoIterator for Query<I> {
    type Item = I::Item;
    type IntoIter = I;

    fn into_iter(self) -> I {
        self.node
    }
}

impl<I, T> fmt::Debug for Query<I>
where
    I: Operator<Item = Result<T>>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("plan", &self.node.plan().to_string())
            .field("config", &self.config)
            .finish()
    }
}
