//! Lazy subsequence selection.

use futures_core::Stream;
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};

pin_project! {
    /// Sequence adapter yielding the `Ok` elements matching a predicate.
    ///
    /// Relative order of surviving elements is preserved. Upstream errors
    /// pass through untouched.
    #[must_use = "sequences do nothing unless polled"]
    pub struct FilterOk<S, F> {
        #[pin]
        upstream: S,
        predicate: F,
        done: bool,
    }
}

impl<S, F> FilterOk<S, F> {
    pub(crate) fn new(upstream: S, predicate: F) -> Self {
        Self {
            upstream,
            predicate,
            done: false,
        }
    }
}

impl<S, T, E, F> Stream for FilterOk<S, F>
where
    S: Stream<Item = Result<T, E>>,
    F: FnMut(&T) -> bool,
{
    type Item = Result<T, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        if *this.done {
            return Poll::Ready(None);
        }

        loop {
            match this.upstream.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(element))) => {
                    if (this.predicate)(&element) {
                        return Poll::Ready(Some(Ok(element)));
                    }
                    // Rejected element - keep draining upstream.
                }
                Poll::Ready(Some(Err(err))) => {
                    *this.done = true;
                    return Poll::Ready(Some(Err(err)));
                }
                Poll::Ready(None) => {
                    *this.done = true;
                    return Poll::Ready(None);
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
