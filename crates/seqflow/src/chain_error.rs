//! Error injection after sequence completion.

use crate::invariants::{debug_assert_fused, debug_assert_single_terminal};
use futures_core::Stream;
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};

pin_project! {
    /// Sequence adapter delivering all upstream elements, then exactly one
    /// injected error, then end-of-sequence.
    ///
    /// If the upstream itself fails, the upstream error wins and the injected
    /// error is discarded - a sequence carries at most one terminal signal.
    #[must_use = "sequences do nothing unless polled"]
    pub struct ChainError<S, E> {
        #[pin]
        upstream: S,
        error: Option<E>,
        done: bool,
    }
}

impl<S, E> ChainError<S, E> {
    pub(crate) fn new(upstream: S, error: E) -> Self {
        Self {
            upstream,
            error: Some(error),
            done: false,
        }
    }
}

impl<S, T, E> Stream for ChainError<S, E>
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
            Poll::Ready(Some(Ok(element))) => Poll::Ready(Some(Ok(element))),
            Poll::Ready(Some(Err(err))) => {
                *this.done = true;
                Poll::Ready(Some(Err(err)))
            }
            Poll::Ready(None) => {
                debug_assert_single_terminal!(*this.done);
                *this.done = true;
                debug_assert_fused!(*this.done);
                match this.error.take() {
                    Some(err) => Poll::Ready(Some(Err(err))),
                    None => Poll::Ready(None),
                }
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
