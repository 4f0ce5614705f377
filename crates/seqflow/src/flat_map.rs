//! Merging transformation over inner sequences.

use futures_core::Stream;
use futures_util::stream::SelectAll;
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Maximum number of inner sequences driven concurrently by [`FlatMap`].
///
/// Bounding the merge keeps buffering finite: upstream is only polled for new
/// elements while fewer than this many inner sequences are in flight.
pub const FLAT_MAP_CONCURRENCY: usize = 32;

pin_project! {
    /// Sequence adapter mapping each `Ok` element to an inner sequence and
    /// merging the inner sequences into one.
    ///
    /// Interleaving across inner sequences is permitted - elements are
    /// yielded in the order the inner sequences produce them, not in
    /// upstream order. Use [`ConcatMap`](crate::ConcatMap) where upstream
    /// order must be preserved.
    ///
    /// An error from upstream or from any inner sequence is the merged
    /// sequence's terminal signal.
    #[must_use = "sequences do nothing unless polled"]
    pub struct FlatMap<S, St, F> {
        #[pin]
        upstream: S,
        f: F,
        inner: SelectAll<Pin<Box<St>>>,
        upstream_done: bool,
        done: bool,
    }
}

impl<S, St, F> FlatMap<S, St, F>
where
    St: Stream,
{
    pub(crate) fn new(upstream: S, f: F) -> Self {
        Self {
            upstream,
            f,
            inner: SelectAll::new(),
            upstream_done: false,
            done: false,
        }
    }
}

impl<S, T, E, U, St, F> Stream for FlatMap<S, St, F>
where
    S: Stream<Item = Result<T, E>>,
    St: Stream<Item = Result<U, E>>,
    F: FnMut(T) -> St,
{
    type Item = Result<U, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        if *this.done {
            return Poll::Ready(None);
        }

        loop {
            // Admit new inner sequences while below the concurrency bound.
            let mut upstream_pending = false;
            while !*this.upstream_done && this.inner.len() < FLAT_MAP_CONCURRENCY {
                match this.upstream.as_mut().poll_next(cx) {
                    Poll::Ready(Some(Ok(element))) => {
                        this.inner.push(Box::pin((this.f)(element)));
                    }
                    Poll::Ready(Some(Err(err))) => {
                        *this.done = true;
                        return Poll::Ready(Some(Err(err)));
                    }
                    Poll::Ready(None) => *this.upstream_done = true,
                    Poll::Pending => {
                        upstream_pending = true;
                        break;
                    }
                }
            }

            match Pin::new(&mut *this.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(element))) => return Poll::Ready(Some(Ok(element))),
                Poll::Ready(Some(Err(err))) => {
                    *this.done = true;
                    return Poll::Ready(Some(Err(err)));
                }
                Poll::Ready(None) => {
                    if *this.upstream_done {
                        *this.done = true;
                        return Poll::Ready(None);
                    }
                    if upstream_pending {
                        // No inner sequences in flight; the upstream poll
                        // above registered our waker.
                        return Poll::Pending;
                    }
                    // Every admitted inner sequence completed without the
                    // admission loop reaching upstream (the buffer was full);
                    // go back and admit more.
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
