//! Tick fan-out to registered tickables

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam::channel::{unbounded, Receiver, Sender};

use crate::foundation::time::TickClock;

/// What a tickable wants after running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Keep running on later ticks
    Continue,
    /// Remove from the ticker
    Finished,
}

/// Work executed once per tick
pub trait Tickable: Send {
    /// Run one tick
    ///
    /// # Arguments
    /// * `tick` - Tick number, starting at 1
    /// * `delta_time` - Seconds since the previous tick
    fn tick(&mut self, tick: u64, delta_time: f32) -> TickOutcome;
}

impl<F> Tickable for F
where
    F: FnMut(u64, f32) -> TickOutcome + Send,
{
    fn tick(&mut self, tick: u64, delta_time: f32) -> TickOutcome {
        self(tick, delta_time)
    }
}

/// Handle returned by [`Ticker::register`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickableId(u64);

type Registration = (TickableId, Box<dyn Tickable>);

/// Registers tickables without borrowing the [`Ticker`]
///
/// Registrations are queued on a channel and join the ticker at the start
/// of its next tick. This is the way to schedule work from inside a running
/// tickable or event handler, where the ticker is already locked.
#[derive(Clone)]
pub struct TickerHandle {
    next_id: Arc<AtomicU64>,
    pending: Sender<Registration>,
}

impl TickerHandle {
    /// Queue a tickable; it runs from the ticker's next tick on
    pub fn register(&self, tickable: Box<dyn Tickable>) -> TickableId {
        let id = TickableId(self.next_id.fetch_add(1, Ordering::Relaxed));
        // The ticker owns the receiver, so a failed send means it was dropped
        if self.pending.send((id, tickable)).is_err() {
            log::warn!("Ticker dropped, tickable {:?} will never run", id);
        }
        id
    }
}

impl std::fmt::Debug for TickerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickerHandle")
            .field("queued", &self.pending.len())
            .finish()
    }
}

/// Runs registered tickables in registration order
pub struct Ticker {
    tickables: Vec<Registration>,
    next_id: Arc<AtomicU64>,
    pending_tx: Sender<Registration>,
    pending_rx: Receiver<Registration>,
    clock: TickClock,
}

impl Ticker {
    /// Create an empty ticker
    pub fn new() -> Self {
        let (pending_tx, pending_rx) = unbounded();
        Self {
            tickables: Vec::new(),
            next_id: Arc::new(AtomicU64::new(0)),
            pending_tx,
            pending_rx,
            clock: TickClock::new(),
        }
    }

    /// A handle for registering tickables while the ticker is borrowed
    pub fn handle(&self) -> TickerHandle {
        TickerHandle {
            next_id: Arc::clone(&self.next_id),
            pending: self.pending_tx.clone(),
        }
    }

    fn allocate_id(&self) -> TickableId {
        TickableId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Register a tickable; it runs from the next tick on
    pub fn register(&mut self, tickable: Box<dyn Tickable>) -> TickableId {
        let id = self.allocate_id();
        self.tickables.push((id, tickable));
        log::debug!("Registered tickable {:?} ({} active)", id, self.tickables.len());
        id
    }

    /// Register a tickable ahead of every tickable registered so far
    pub fn register_first(&mut self, tickable: Box<dyn Tickable>) -> TickableId {
        let id = self.allocate_id();
        self.tickables.insert(0, (id, tickable));
        log::debug!("Registered tickable {:?} first ({} active)", id, self.tickables.len());
        id
    }

    fn apply_pending(&mut self) {
        for (id, tickable) in self.pending_rx.try_iter() {
            self.tickables.push((id, tickable));
            log::debug!("Registered queued tickable {:?} ({} active)", id, self.tickables.len());
        }
    }

    /// Remove a tickable before it finishes; returns whether it was present
    pub fn unregister(&mut self, id: TickableId) -> bool {
        self.apply_pending();
        let before = self.tickables.len();
        self.tickables.retain(|(existing, _)| *existing != id);
        before != self.tickables.len()
    }

    /// Advance one tick, running every tickable once
    ///
    /// Registrations queued through a [`TickerHandle`] join first.
    /// Tickables returning [`TickOutcome::Finished`] are dropped afterwards.
    pub fn tick(&mut self) -> u64 {
        self.apply_pending();
        let tick = self.clock.advance();
        let delta_time = self.clock.delta_time();
        self.tickables.retain_mut(|(id, tickable)| {
            let outcome = tickable.tick(tick, delta_time);
            if outcome == TickOutcome::Finished {
                log::debug!("Tickable {:?} finished on tick {}", id, tick);
            }
            outcome == TickOutcome::Continue
        });
        tick
    }

    /// Number of ticks run so far
    pub fn tick_count(&self) -> u64 {
        self.clock.tick_count()
    }

    /// Average ticks per second so far
    pub fn average_rate(&self) -> f32 {
        self.clock.average_rate()
    }

    /// Number of active tickables, not counting queued registrations
    pub fn len(&self) -> usize {
        self.tickables.len()
    }

    /// Whether no tickables are active
    pub fn is_empty(&self) -> bool {
        self.tickables.is_empty()
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ticker")
            .field("tickables", &self.tickables.len())
            .field("queued", &self.pending_rx.len())
            .field("tick_count", &self.clock.tick_count())
            .finish()
    }
}
