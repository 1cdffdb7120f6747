//! Tick timing utilities

use std::time::Instant;

/// Clock advanced once per tick
///
/// Tracks the wall-clock time between ticks so tickables can scale their
/// work by the real elapsed time rather than the nominal period.
#[derive(Debug)]
pub struct TickClock {
    last_tick: Instant,
    delta_time: f32,
    total_time: f32,
    tick_count: u64,
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TickClock {
    /// Create a new clock at tick zero
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            tick_count: 0,
        }
    }

    /// Advance the clock by one tick and return the new tick number
    pub fn advance(&mut self) -> u64 {
        let now = Instant::now();
        self.delta_time = now.duration_since(self.last_tick).as_secs_f32();
        self.total_time += self.delta_time;
        self.last_tick = now;
        self.tick_count += 1;
        self.tick_count
    }

    /// Seconds between the last two ticks
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Seconds accumulated across all ticks
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Number of ticks so far
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Average ticks per second since the clock was created
    pub fn average_rate(&self) -> f32 {
        if self.total_time > 0.0 {
            self.tick_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}
