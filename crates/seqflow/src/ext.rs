//! Extension trait assembling the operator set.

use crate::chain_error::ChainError;
use crate::concat_map::ConcatMap;
use crate::default_if_empty::DefaultIfEmpty;
use crate::err_into::ErrInto;
use crate::filter::FilterOk;
use crate::flat_map::FlatMap;
use crate::map::MapOk;
use futures_core::Stream;

/// Composable operators over fallible sequences.
///
/// Implemented for every `Stream` whose items are `Result<T, E>`. All
/// operators are lazy: nothing happens until the resulting sequence is
/// polled, and every operator fuses after its terminal signal.
pub trait SequenceExt<T, E>: Stream<Item = Result<T, E>> + Sized {
    /// Transforms every `Ok` element, preserving order and count.
    ///
    /// Upstream errors pass through untouched.
    fn map_ok<U, F>(self, f: F) -> MapOk<Self, F>
    where
        F: FnMut(T) -> U,
    {
        MapOk::new(self, f)
    }

    /// Keeps the `Ok` elements matching `predicate`, preserving order.
    fn filter_ok<F>(self, predicate: F) -> FilterOk<Self, F>
    where
        F: FnMut(&T) -> bool,
    {
        FilterOk::new(self, predicate)
    }

    /// Maps every `Ok` element to an inner sequence and merges the inner
    /// sequences, permitting interleaving across them.
    ///
    /// At most [`FLAT_MAP_CONCURRENCY`](crate::FLAT_MAP_CONCURRENCY) inner
    /// sequences are in flight at once. Use [`concat_map`] where upstream
    /// order must be preserved.
    ///
    /// [`concat_map`]: SequenceExt::concat_map
    fn flat_map<U, St, F>(self, f: F) -> FlatMap<Self, St, F>
    where
        St: Stream<Item = Result<U, E>>,
        F: FnMut(T) -> St,
    {
        FlatMap::new(self, f)
    }

    /// Maps every `Ok` element to an inner sequence and concatenates the
    /// inner sequences in upstream order, one at a time.
    fn concat_map<U, St, F>(self, f: F) -> ConcatMap<Self, St, F>
    where
        St: Stream<Item = Result<U, E>>,
        F: FnMut(T) -> St,
    {
        ConcatMap::new(self, f)
    }

    /// Delivers all upstream elements, then exactly one injected `error`,
    /// then end-of-sequence.
    fn chain_error(self, error: E) -> ChainError<Self, E> {
        ChainError::new(self, error)
    }

    /// Emits `fallback` once iff the upstream completes with zero elements
    /// and no error; otherwise passes through unchanged.
    fn default_if_empty(self, fallback: T) -> DefaultIfEmpty<Self, T> {
        DefaultIfEmpty::new(self, fallback)
    }

    /// Widens the error type via [`From`], leaving elements untouched.
    fn err_into<E2>(self) -> ErrInto<Self, E2>
    where
        E2: From<E>,
    {
        ErrInto::new(self)
    }
}

impl<T, E, S> SequenceExt<T, E> for S where S: Stream<Item = Result<T, E>> + Sized {}
