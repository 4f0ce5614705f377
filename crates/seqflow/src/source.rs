//! Sequence sources.

use futures_core::Stream;
use pin_project_lite::pin_project;
use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Creates a sequence yielding every element of `items` as `Ok`, then
/// completing.
pub fn iter_ok<I, E>(items: I) -> IterOk<I::IntoIter, E>
where
    I: IntoIterator,
{
    IterOk {
        iter: items.into_iter(),
        _marker: PhantomData,
    }
}

/// Creates a sequence that completes immediately with zero elements.
pub fn empty<T, E>() -> Empty<T, E> {
    Empty {
        _marker: PhantomData,
    }
}

pin_project! {
    /// Sequence over an iterator, produced by [`iter_ok`].
    #[must_use = "sequences do nothing unless polled"]
    pub struct IterOk<I, E> {
        iter: I,
        _marker: PhantomData<fn() -> E>,
    }
}

impl<I, E> Stream for IterOk<I, E>
where
    I: Iterator,
{
    type Item = Result<I::Item, E>;

    fn poll_next(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        Poll::Ready(this.iter.next().map(Ok))
    }
}

/// Empty sequence produced by [`empty`].
#[must_use = "sequences do nothing unless polled"]
#[derive(Debug)]
pub struct Empty<T, E> {
    _marker: PhantomData<fn() -> (T, E)>,
}

impl<T, E> Stream for Empty<T, E> {
    type Item = Result<T, E>;

    fn poll_next(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Poll::Ready(None)
    }
}
