//! Order-preserving transformation over inner sequences.

use futures_core::Stream;
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};

pin_project! {
    /// Sequence adapter mapping each `Ok` element to an inner sequence and
    /// concatenating the inner sequences in upstream order.
    ///
    /// Exactly one inner sequence is driven at a time, so elements appear in
    /// deterministic upstream order - the variant to use where sequencing
    /// matters, such as a fetch-then-save composition per key.
    #[must_use = "sequences do nothing unless polled"]
    pub struct ConcatMap<S, St, F> {
        #[pin]
        upstream: S,
        f: F,
        current: Option<Pin<Box<St>>>,
        done: bool,
    }
}

impl<S, St, F> ConcatMap<S, St, F> {
    pub(crate) fn new(upstream: S, f: F) -> Self {
        Self {
            upstream,
            f,
            current: None,
            done: false,
        }
    }
}

impl<S, T, E, U, St, F> Stream for ConcatMap<S, St, F>
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
            if let Some(current) = this.current.as_mut() {
                match current.as_mut().poll_next(cx) {
                    Poll::Ready(Some(Ok(element))) => return Poll::Ready(Some(Ok(element))),
                    Poll::Ready(Some(Err(err))) => {
                        *this.done = true;
                        return Poll::Ready(Some(Err(err)));
                    }
                    Poll::Ready(None) => *this.current = None,
                    Poll::Pending => return Poll::Pending,
                }
            }

            match this.upstream.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(element))) => {
                    *this.current = Some(Box::pin((this.f)(element)));
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
