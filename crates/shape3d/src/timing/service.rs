//! Fixed-rate tick service on a worker thread

use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam::channel::{bounded, RecvTimeoutError, Sender};
use thiserror::Error;

use crate::config::TickerSettings;
use super::ticker::Ticker;

/// Tick service errors
#[derive(Error, Debug)]
pub enum TimingError {
    /// The configured period was zero
    #[error("Tick period must be greater than zero")]
    ZeroPeriod,

    /// `start` was called on a running service
    #[error("Tick service is already running")]
    AlreadyRunning,

    /// The worker thread could not be spawned
    #[error("Failed to spawn tick thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Runs a shared [`Ticker`] at a fixed rate
///
/// Ticks are scheduled against the start time, not the end of the previous
/// tick, so a slow tick is followed immediately by the next one rather than
/// shifting the whole schedule.
#[derive(Debug)]
pub struct TickService {
    period: Duration,
    initial_delay: Duration,
    stop_tx: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl TickService {
    /// Create a stopped service from ticker settings
    pub fn new(settings: &TickerSettings) -> Result<Self, TimingError> {
        if settings.period_ms == 0 {
            return Err(TimingError::ZeroPeriod);
        }
        Ok(Self {
            period: Duration::from_millis(settings.period_ms),
            initial_delay: Duration::from_millis(settings.initial_delay_ms),
            stop_tx: None,
            worker: None,
        })
    }

    /// Tick period
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Whether the worker thread is running
    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Start ticking `ticker` on a new worker thread
    pub fn start(&mut self, ticker: Arc<Mutex<Ticker>>) -> Result<(), TimingError> {
        if self.is_running() {
            return Err(TimingError::AlreadyRunning);
        }

        let (stop_tx, stop_rx) = bounded::<()>(1);
        let period = self.period;
        let initial_delay = self.initial_delay;

        let worker = std::thread::Builder::new()
            .name("shape3d-ticker".to_string())
            .spawn(move || {
                let mut next_tick = Instant::now() + initial_delay;
                loop {
                    let wait = next_tick.saturating_duration_since(Instant::now());
                    match stop_rx.recv_timeout(wait) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }

                    match ticker.lock() {
                        Ok(mut ticker) => {
                            ticker.tick();
                        }
                        Err(_) => {
                            log::error!("Ticker mutex poisoned, stopping tick service");
                            break;
                        }
                    }
                    next_tick += period;
                }
                log::debug!("Tick thread exiting");
            })?;

        self.stop_tx = Some(stop_tx);
        self.worker = Some(worker);
        log::info!("Tick service started with a {:?} period", self.period);
        Ok(())
    }

    /// Stop the worker thread and wait for it to exit
    ///
    /// Does nothing if the service is not running.
    pub fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            // The worker may already have exited and dropped the receiver
            let _ = stop_tx.send(());
        }
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("Tick thread panicked");
            }
            log::info!("Tick service stopped");
        }
    }
}

impl Drop for TickService {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::TickOutcome;

    fn settings(period_ms: u64) -> TickerSettings {
        TickerSettings { period_ms, initial_delay_ms: 0 }
    }

    #[test]
    fn test_zero_period_rejected() {
        assert!(matches!(TickService::new(&settings(0)), Err(TimingError::ZeroPeriod)));
    }

    #[test]
    fn test_service_drives_ticker_until_stopped() {
        let ticker = Arc::new(Mutex::new(Ticker::new()));
        let (done_tx, done_rx) = bounded::<u64>(1);
        ticker.lock().unwrap().register(Box::new(move |tick: u64, _dt: f32| {
            if tick == 3 {
                let _ = done_tx.send(tick);
                TickOutcome::Finished
            } else {
                TickOutcome::Continue
            }
        }));

        let mut service = TickService::new(&settings(1)).unwrap();
        service.start(Arc::clone(&ticker)).unwrap();
        assert!(service.is_running());
        assert!(matches!(
            service.start(Arc::clone(&ticker)),
            Err(TimingError::AlreadyRunning)
        ));

        assert_eq!(done_rx.recv_timeout(Duration::from_secs(5)), Ok(3));
        service.stop();
        assert!(!service.is_running());

        let ticks = ticker.lock().unwrap().tick_count();
        assert!(ticks >= 3);
        std::thread::sleep(Duration::from_millis(10));
        assert_eq!(ticker.lock().unwrap().tick_count(), ticks);
    }

    #[test]
    fn test_stop_without_start_is_noop() {
        let mut service = TickService::new(&settings(5)).unwrap();
        service.stop();
        assert!(!service.is_running());
        assert_eq!(service.period(), Duration::from_millis(5));
    }
}
