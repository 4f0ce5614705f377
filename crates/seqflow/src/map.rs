//! Element transformation preserving order, count, and terminal signals.

use crate::invariants::{debug_assert_fused, debug_assert_single_terminal};
use futures_core::Stream;
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};

pin_project! {
    /// Sequence adapter yielding `f(element)` for every `Ok` element.
    ///
    /// Order and count are preserved. Upstream errors pass through untouched;
    /// after the terminal signal no further elements are produced.
    #[must_use = "sequences do nothing unless polled"]
    pub struct MapOk<S, F> {
        #[pin]
        upstream: S,
        f: F,
        done: bool,
    }
}

impl<S, F> MapOk<S, F> {
    pub(crate) fn new(upstream: S, f: F) -> Self {
        Self {
            upstream,
            f,
            done: false,
        }
    }
}

impl<S, T, E, U, F> Stream for MapOk<S, F>
where
    S: Stream<Item = Result<T, E>>,
    F: FnMut(T) -> U,
{
    type Item = Result<U, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();

        if *this.done {
            return Poll::Ready(None);
        }

        match this.upstream.poll_next(cx) {
            Poll::Ready(Some(Ok(element))) => Poll::Ready(Some(Ok((this.f)(element)))),
            Poll::Ready(Some(Err(err))) => {
                debug_assert_single_terminal!(*this.done);
                *this.done = true;
                debug_assert_fused!(*this.done);
                Poll::Ready(Some(Err(err)))
            }
            Poll::Ready(None) => {
                *this.done = true;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
