//! Error-type widening.

use futures_core::Stream;
use pin_project_lite::pin_project;
use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{Context, Poll};

pin_project! {
    /// Sequence adapter converting the error type via [`From`].
    ///
    /// Elements, order, and terminal behavior are untouched; only the error
    /// channel changes type.
    #[must_use = "sequences do nothing unless polled"]
    pub struct ErrInto<S, E2> {
        #[pin]
        upstream: S,
        done: bool,
        _marker: PhantomData<fn() -> E2>,
    }
}

impl<S, E2> ErrInto<S, E2> {
    pub(crate) fn new(upstream: S) -> Self {
        Self {
            upstream,
            done: false,
            _marker: PhantomData,
        }
    }
}

impl<S, T, E, E2> Stream for ErrInto<S, E2>
where
    S: Stream<Item = Result<T, E>>,
    E2: From<E>,
{
    type Item = Result<T, E2>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();

        if *this.done {
            return Poll::Ready(None);
        }

        match this.upstream.poll_next(cx) {
            Poll::Ready(Some(Ok(element))) => Poll::Ready(Some(Ok(element))),
            Poll::Ready(Some(Err(err))) => {
                *this.done = true;
                Poll::Ready(Some(Err(E2::from(err))))
            }
            Poll::Ready(None) => {
                *this.done = true;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
