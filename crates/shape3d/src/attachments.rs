//! Process-wide services, attached once and passed explicitly
//!
//! An [`AttachmentsBuilder`] collects exactly one [`Ticker`] and one
//! [`EventManager`]. Attaching a second instance of either logs a warning
//! and keeps the first. [`AttachmentsBuilder::build`] refuses to produce an
//! [`Attachments`] with a service missing, so the built context never has
//! to check for absent services at access time.
//!
//! Building starts the tick service. Queued events are dispatched at the
//! start of every tick, ahead of all other tickables, so an event published
//! during tick N reaches its handlers on tick N + 1. Handlers run after the
//! event manager is released and may publish or subscribe through the
//! context. Tickables and handlers schedule further tickables through
//! [`Attachments::register_tickable`], which queues them without locking the
//! ticker.

use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::config::TickerSettings;
use crate::events::{Event, EventHandler, EventManager, EventType, SubscriptionId};
use crate::timing::{
    TickOutcome, TickService, Tickable, TickableId, Ticker, TickerHandle, TimingError,
};

/// Attachment errors
#[derive(Error, Debug)]
pub enum AttachError {
    /// A required service was never attached
    #[error("No {0} has been attached")]
    Missing(&'static str),

    /// The tick service could not be started
    #[error("Tick service error: {0}")]
    Timing(#[from] TimingError),

    /// A service mutex was poisoned by a panicking holder
    #[error("The {0} lock was poisoned")]
    Poisoned(&'static str),
}

/// Collects services before the context is built
#[derive(Debug, Default)]
pub struct AttachmentsBuilder {
    settings: TickerSettings,
    debug_mode: bool,
    ticker: Option<Ticker>,
    event_manager: Option<EventManager>,
}

impl AttachmentsBuilder {
    /// Create an empty builder ticking with `settings`
    pub fn new(settings: TickerSettings) -> Self {
        Self {
            settings,
            debug_mode: false,
            ticker: None,
            event_manager: None,
        }
    }

    /// Log per-tick dispatch diagnostics at debug level
    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug_mode = enabled;
        self
    }

    /// Attach the ticker; a second attach is ignored with a warning
    pub fn attach_ticker(mut self, ticker: Ticker) -> Self {
        if self.ticker.is_some() {
            log::warn!("A Ticker has already been attached");
            return self;
        }
        self.ticker = Some(ticker);
        log::info!("A Ticker has successfully been attached");
        self
    }

    /// Attach the event manager; a second attach is ignored with a warning
    pub fn attach_event_manager(mut self, event_manager: EventManager) -> Self {
        if self.event_manager.is_some() {
            log::warn!("An EventManager has already been attached");
            return self;
        }
        self.event_manager = Some(event_manager);
        log::info!("An EventManager has successfully been attached");
        self
    }

    /// Validate the attached services and start ticking
    pub fn build(self) -> Result<Attachments, AttachError> {
        let mut ticker = self.ticker.ok_or(AttachError::Missing("Ticker"))?;
        let event_manager = self
            .event_manager
            .ok_or(AttachError::Missing("EventManager"))?;

        let mut tick_service = TickService::new(&self.settings)?;
        let event_manager = Arc::new(Mutex::new(event_manager));
        ticker.register_first(Box::new(EventPump {
            event_manager: Arc::clone(&event_manager),
            debug_mode: self.debug_mode,
        }));
        let ticker_handle = ticker.handle();
        let ticker = Arc::new(Mutex::new(ticker));
        tick_service.start(Arc::clone(&ticker))?;

        Ok(Attachments {
            ticker,
            ticker_handle,
            event_manager,
            tick_service,
            debug_mode: self.debug_mode,
        })
    }
}

/// Dispatches queued events once per tick
struct EventPump {
    event_manager: Arc<Mutex<EventManager>>,
    debug_mode: bool,
}

impl Tickable for EventPump {
    fn tick(&mut self, tick: u64, _delta_time: f32) -> TickOutcome {
        let batch = {
            let Ok(mut event_manager) = self.event_manager.lock() else {
                log::error!("EventManager lock poisoned, event dispatch stopped");
                return TickOutcome::Finished;
            };
            event_manager.update_tick(tick);
            event_manager.take_due()
        };
        let dispatched = batch.deliver();
        if self.debug_mode && dispatched > 0 {
            log::debug!("Dispatched {} events on tick {}", dispatched, tick);
        }
        TickOutcome::Continue
    }
}

/// Running process-wide services
///
/// Pass by reference (or clone the inner `Arc`s) to every component that
/// needs them. Dropping the context stops the tick service.
#[derive(Debug)]
pub struct Attachments {
    ticker: Arc<Mutex<Ticker>>,
    ticker_handle: TickerHandle,
    event_manager: Arc<Mutex<EventManager>>,
    tick_service: TickService,
    debug_mode: bool,
}

impl Attachments {
    /// Start collecting services
    pub fn builder(settings: TickerSettings) -> AttachmentsBuilder {
        AttachmentsBuilder::new(settings)
    }

    /// The attached ticker
    ///
    /// The tick thread holds this lock while tickables and handlers run, so
    /// they must use [`Self::ticker_handle`] instead of locking it.
    pub fn ticker(&self) -> &Arc<Mutex<Ticker>> {
        &self.ticker
    }

    /// The attached event manager
    pub fn event_manager(&self) -> &Arc<Mutex<EventManager>> {
        &self.event_manager
    }

    /// A lock-free registration handle for the attached ticker
    pub fn ticker_handle(&self) -> &TickerHandle {
        &self.ticker_handle
    }

    /// Whether per-tick diagnostics are logged
    pub fn debug_mode(&self) -> bool {
        self.debug_mode
    }

    /// Schedule a recurring callback on the ticker
    ///
    /// The callback joins at the start of the next tick. Safe to call from
    /// inside a running tickable or event handler.
    pub fn register_tickable(&self, tickable: Box<dyn Tickable>) -> TickableId {
        self.ticker_handle.register(tickable)
    }

    /// Subscribe a handler on the event manager
    pub fn subscribe(
        &self,
        event_type: EventType,
        handler: Box<dyn EventHandler>,
    ) -> Result<SubscriptionId, AttachError> {
        let mut event_manager = self
            .event_manager
            .lock()
            .map_err(|_| AttachError::Poisoned("EventManager"))?;
        Ok(event_manager.subscribe(event_type, handler))
    }

    /// Queue an event for the next dispatch
    pub fn publish(&self, event: Event) -> Result<(), AttachError> {
        let mut event_manager = self
            .event_manager
            .lock()
            .map_err(|_| AttachError::Poisoned("EventManager"))?;
        event_manager.publish(event);
        Ok(())
    }

    /// Whether the tick service is running
    pub fn is_running(&self) -> bool {
        self.tick_service.is_running()
    }

    /// Stop the tick service
    pub fn shutdown(mut self) {
        self.tick_service.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam::channel::unbounded;
    use std::time::Duration;

    fn idle_settings() -> TickerSettings {
        TickerSettings::new().with_period_ms(1000).with_initial_delay_ms(60_000)
    }

    #[test]
    fn test_build_requires_every_service() {
        let result = Attachments::builder(idle_settings())
            .attach_ticker(Ticker::new())
            .build();
        assert!(matches!(result, Err(AttachError::Missing("EventManager"))));

        let result = Attachments::builder(idle_settings())
            .attach_event_manager(EventManager::new())
            .build();
        assert!(matches!(result, Err(AttachError::Missing("Ticker"))));
    }

    #[test]
    fn test_double_attach_keeps_first() {
        let mut first = Ticker::new();
        first.register(Box::new(|_: u64, _: f32| TickOutcome::Continue));

        let attachments = Attachments::builder(idle_settings())
            .attach_ticker(first)
            .attach_ticker(Ticker::new())
            .attach_event_manager(EventManager::new())
            .build()
            .unwrap();

        // The first ticker's tickable plus the event pump
        assert_eq!(attachments.ticker().lock().unwrap().len(), 2);
        attachments.shutdown();
    }

    #[test]
    fn test_double_attach_keeps_first_event_manager() {
        let mut first = EventManager::new();
        first.subscribe(EventType::ZoneEntered, Box::new(|_: &Event| true));

        let attachments = Attachments::builder(idle_settings())
            .attach_ticker(Ticker::new())
            .attach_event_manager(first)
            .attach_event_manager(EventManager::new())
            .build()
            .unwrap();

        let event_manager = attachments.event_manager().lock().unwrap();
        assert_eq!(event_manager.subscriber_count(EventType::ZoneEntered), 1);
        drop(event_manager);
        attachments.shutdown();
    }

    #[test]
    fn test_debug_mode_is_carried() {
        let attachments = Attachments::builder(idle_settings())
            .with_debug(true)
            .attach_ticker(Ticker::new())
            .attach_event_manager(EventManager::new())
            .build()
            .unwrap();
        assert!(attachments.debug_mode());
        attachments.shutdown();
    }

    #[test]
    fn test_events_dispatch_before_attached_tickables() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut ticker = Ticker::new();
        let tickable_log = Arc::clone(&log);
        ticker.register(Box::new(move |_: u64, _: f32| {
            tickable_log.lock().unwrap().push("tickable");
            TickOutcome::Continue
        }));

        let attachments = Attachments::builder(TickerSettings::new().with_initial_delay_ms(200))
            .attach_ticker(ticker)
            .attach_event_manager(EventManager::new())
            .build()
            .unwrap();

        let (tx, rx) = unbounded();
        let handler_log = Arc::clone(&log);
        attachments
            .subscribe(
                EventType::ZoneEntered,
                Box::new(move |_: &Event| {
                    handler_log.lock().unwrap().push("handler");
                    let _ = tx.send(());
                    true
                }),
            )
            .unwrap();
        attachments.publish(Event::new(EventType::ZoneEntered, 0)).unwrap();

        assert!(rx.recv_timeout(Duration::from_secs(5)).is_ok());
        attachments.shutdown();
        assert_eq!(log.lock().unwrap()[..2], ["handler", "tickable"]);
    }

    #[test]
    fn test_tickable_registers_tickable_while_ticking() {
        let attachments = Attachments::builder(TickerSettings::new().with_initial_delay_ms(0))
            .attach_ticker(Ticker::new())
            .attach_event_manager(EventManager::new())
            .build()
            .unwrap();

        let (tx, rx) = unbounded();
        let handle = attachments.ticker_handle().clone();
        attachments.register_tickable(Box::new(move |_: u64, _: f32| {
            let tx = tx.clone();
            handle.register(Box::new(move |tick: u64, _: f32| {
                let _ = tx.send(tick);
                TickOutcome::Finished
            }));
            TickOutcome::Finished
        }));

        assert!(rx.recv_timeout(Duration::from_secs(5)).is_ok());
        attachments.shutdown();
    }

    #[test]
    fn test_handler_publishes_while_dispatching() {
        let attachments = Attachments::builder(TickerSettings::new().with_initial_delay_ms(0))
            .attach_ticker(Ticker::new())
            .attach_event_manager(EventManager::new())
            .build()
            .unwrap();

        let (tx, rx) = unbounded();
        let event_manager = Arc::clone(attachments.event_manager());
        attachments
            .subscribe(
                EventType::ZoneEntered,
                Box::new(move |event: &Event| {
                    if let Ok(mut event_manager) = event_manager.lock() {
                        event_manager.publish(Event::new(EventType::ZoneExited, event.tick));
                    }
                    true
                }),
            )
            .unwrap();
        attachments
            .subscribe(
                EventType::ZoneExited,
                Box::new(move |_: &Event| {
                    let _ = tx.send(());
                    true
                }),
            )
            .unwrap();
        attachments.publish(Event::new(EventType::ZoneEntered, 0)).unwrap();

        assert!(rx.recv_timeout(Duration::from_secs(5)).is_ok());
        attachments.shutdown();
    }

    #[test]
    fn test_zero_period_fails_build() {
        let result = Attachments::builder(TickerSettings::new().with_period_ms(0))
            .attach_ticker(Ticker::new())
            .attach_event_manager(EventManager::new())
            .build();
        assert!(matches!(result, Err(AttachError::Timing(TimingError::ZeroPeriod))));
    }

    #[test]
    fn test_published_events_reach_subscribers() {
        let attachments = Attachments::builder(TickerSettings::new().with_initial_delay_ms(0))
            .attach_ticker(Ticker::new())
            .attach_event_manager(EventManager::new())
            .build()
            .unwrap();
        assert!(attachments.is_running());

        let (tx, rx) = unbounded();
        attachments
            .subscribe(
                EventType::ZoneEntered,
                Box::new(move |event: &Event| {
                    let _ = tx.send(event.get_zone_id());
                    true
                }),
            )
            .unwrap();
        attachments
            .publish(
                Event::new(EventType::ZoneEntered, 0)
                    .with_arg("zone", crate::events::EventArg::ZoneId(5)),
            )
            .unwrap();

        assert_eq!(rx.recv_timeout(Duration::from_secs(5)), Ok(Some(5)));
        attachments.shutdown();
    }
}
