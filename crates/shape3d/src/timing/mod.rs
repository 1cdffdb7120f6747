//! Periodic tick scheduling
//!
//! A [`Ticker`] owns a list of [`Tickable`]s and runs each of them once per
//! tick. A [`TickService`] drives a shared ticker from a worker thread at a
//! fixed rate.

pub mod ticker;
pub mod service;

pub use ticker::{Tickable, TickableId, TickOutcome, Ticker, TickerHandle};
pub use service::{TickService, TimingError};
