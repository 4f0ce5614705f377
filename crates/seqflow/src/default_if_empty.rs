//! Fallback element for empty completions.

use futures_core::Stream;
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};

pin_project! {
    /// Sequence adapter emitting a fallback element once iff the upstream
    /// completed without elements and without error.
    ///
    /// A non-empty upstream passes through unchanged; an upstream error is
    /// still the terminal signal and suppresses the fallback.
    #[must_use = "sequences do nothing unless polled"]
    pub struct DefaultIfEmpty<S, T> {
        #[pin]
        upstream: S,
        fallback: Option<T>,
        saw_element: bool,
        done: bool,
    }
}

impl<S, T> DefaultIfEmpty<S, T> {
    pub(crate) fn new(upstream: S, fallback: T) -> Self {
        Self {
            upstream,
            fallback: Some(fallback),
            saw_element: false,
            done: false,
        }
    }
}

impl<S, T, E> Stream for DefaultIfEmpty<S, T>
where
    S: Stream<Item = Result<T, E>>,
{
    type Item = Result<T, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();

        if *this.done {
            return Poll::Ready(None);
        }

        match this.upstream.poll_next(cx) {
            Poll::Ready(Some(Ok(element))) => {
                *this.saw_element = true;
                Poll::Ready(Some(Ok(element)))
            }
            Poll::Ready(Some(Err(err))) => {
                *this.done = true;
                Poll::Ready(Some(Err(err)))
            }
            Poll::Ready(None) => {
                *this.done = true;
                if *this.saw_element {
                    Poll::Ready(None)
                } else {
                    Poll::Ready(this.fallback.take().map(Ok))
                }
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
