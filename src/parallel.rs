//! Order-preserving parallel map over independent tasks.
//!
//! Fitness evaluation and mutation are pure per-candidate operations.
//! Both are dispatched through these helpers, which run on the current
//! rayon pool (the global pool, or a dedicated one installed by the
//! caller) and always return results in input order so that downstream
//! selection stays deterministic.

use rayon::prelude::*;

/// Maps `f` over `items`, in parallel when `parallel` is set.
pub fn map_ordered<T, U, F>(items: &[T], parallel: bool, f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    if parallel {
        items.par_iter().map(f).collect()
    } else {
        items.iter().map(f).collect()
    }
}

/// Fallible variant of [`map_ordered`].
///
/// The first failure (in input order when sequential, any failing task
/// when parallel) aborts the whole map.
pub fn try_map_ordered<T, U, E, F>(items: &[T], parallel: bool, f: F) -> Result<Vec<U>, E>
where
    T: Sync,
    U: Send,
    E: Send,
    F: Fn(&T) -> Result<U, E> + Sync + Send,
{
    if parallel {
        items.par_iter().map(f).collect()
    } else {
        items.iter().map(f).collect()
    }
}
