//! Entry points: `query(iterable)` and the `.query()` extension method.

use seqlinq_core::config::QueryConfig;
use seqlinq_operators::Source;

use crate::query::Query;

/// Start a query over any iterable.
///
/// ```
/// use seqlinq_exec::query;
///
/// let evens = query(vec![1, 2, 3, 4]).where_by(|x| x % 2 == 0).to_list().unwrap();
/// assert_eq!(evens, vec![2, 4]);
/// ```
pub fn query<C>(source: C) -> Query<Source<C::IntoIter>>
where
    C: IntoIterator,
{
    Query::from_iterable(source)
}

/// Start a query with an explicit configuration instead of the defaults.
pub fn query_with<C>(source: C, config: QueryConfig) -> Query<Source<C::IntoIter>>
where
    C: IntoIterator,
{
    Query::from_iterable(source).with_config(config)
}

/// Adds `.query()` to every iterable.
pub trait QueryExt: IntoIterator + Sized {
    fn query(self) -> Query<Source<Self::IntoIter>> {
        Query::from_iterable(self)
    }
}

impl<C: IntoIterator> QueryExt for C {}
