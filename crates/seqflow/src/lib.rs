//! Lazy Fallible Sequence Operators
//!
//! This crate provides a small set of composable, lazy sequence operators over
//! asynchronous data sources. A sequence is a [`futures_core::Stream`] whose
//! items are `Result<T, E>`: `Ok` elements carry data, and an `Err` element is
//! the sequence's single terminal failure signal.
//!
//! # Features
//!
//! - **Demand-driven**: no operator does work until polled, and no operator
//!   buffers an unbounded number of elements, so backpressure is inherent.
//! - **Terminal discipline**: every operator fuses after the terminal signal
//!   (completion or error); a consumer observes at most one terminal signal
//!   and no elements afterwards.
//! - **Ordering**: all operators preserve upstream order except [`flat_map`],
//!   which merges inner sequences and explicitly permits interleaving.
//!   [`concat_map`] is the order-preserving variant.
//!
//! # Example
//!
//! ```ignore
//! use seqflow::{iter_ok, SequenceExt, StreamExt};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut seq = iter_ok::<_, String>(["adam", "anna", "jack", "jenny"])
//!         .filter_ok(|name| name.len() > 4)
//!         .map_ok(str::to_uppercase);
//!
//!     while let Some(name) = seq.next().await {
//!         println!("{:?}", name);
//!     }
//! }
//! ```
//!
//! [`flat_map`]: SequenceExt::flat_map
//! [`concat_map`]: SequenceExt::concat_map

mod chain_error;
mod concat_map;
mod default_if_empty;
mod err_into;
mod ext;
mod filter;
mod flat_map;
mod interval;
mod invariants;
mod map;
mod source;

pub use chain_error::ChainError;
pub use concat_map::ConcatMap;
pub use default_if_empty::DefaultIfEmpty;
pub use err_into::ErrInto;
pub use ext::SequenceExt;
pub use filter::FilterOk;
pub use flat_map::{FlatMap, FLAT_MAP_CONCURRENCY};
pub use interval::{interval, Ticks};
pub use map::MapOk;
pub use source::{empty, iter_ok, Empty, IterOk};

// Re-export useful stream combinators
pub use tokio_stream::StreamExt;
