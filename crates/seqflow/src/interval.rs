//! Interval-driven tick sequence.

use futures_core::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Creates an infinite sequence of monotonically increasing tick numbers,
/// one per elapsed `period`, counting from 0.
///
/// The first tick is delivered after one full period, not immediately. The
/// sequence is non-restartable: dropping it releases the timer, and a new
/// call starts a new count.
///
/// # Example
///
/// ```ignore
/// use seqflow::StreamExt;
///
/// let mut ticks = seqflow::interval(Duration::from_secs(1));
/// while let Some(i) = ticks.next().await {
///     println!("tick {i}");
/// }
/// ```
pub fn interval(period: Duration) -> Ticks {
    let mut timer = interval_at(Instant::now() + period, period);
    // A slow consumer delays subsequent ticks rather than receiving a burst.
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    Ticks { timer, next_seq: 0 }
}

/// Infinite tick sequence produced by [`interval`].
#[must_use = "sequences do nothing unless polled"]
#[derive(Debug)]
pub struct Ticks {
    timer: Interval,
    next_seq: u64,
}

impl Stream for Ticks {
    type Item = u64;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        match this.timer.poll_tick(cx) {
            Poll::Ready(_) => {
                let seq = this.next_seq;
                this.next_seq += 1;
                Poll::Ready(Some(seq))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
