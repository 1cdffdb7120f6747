//! Publish/subscribe event registry
//!
//! Key principles:
//! - Key-value arguments (no order dependency)
//! - Handler returns bool (true = consumed, stops forwarding)
//! - Subscription per event type (only interested handlers are notified)
//! - Queuing support (immediate + deferred-until-tick delivery)
//!
//! [`EventManager::take_due`] drains the due events into a [`DispatchBatch`]
//! that is delivered after the manager is released. A handler holding the
//! manager behind a shared `Arc<Mutex<_>>` may therefore lock it to publish
//! or subscribe; anything it publishes goes out on the next dispatch.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use slotmap::{new_key_type, SlotMap};

use crate::geometry::Point3D;

/// Event type identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// An actor moved into a zone
    ZoneEntered,
    /// An actor moved out of a zone
    ZoneExited,
    /// Two zones were found to overlap when registered
    ZonesOverlap,
}

/// Variant for type-safe event arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventArg {
    /// Zone identifier
    ZoneId(u32),
    /// Actor identifier
    ActorId(u32),
    /// Lattice position
    Position(Point3D),
}

/// Event with type ID and key-value arguments
#[derive(Debug, Clone)]
pub struct Event {
    /// Type of event
    pub event_type: EventType,
    /// Tick on which the event was raised
    pub tick: u64,
    args: HashMap<&'static str, EventArg>,
}

impl Event {
    /// Create a new event with the given type and tick
    pub fn new(event_type: EventType, tick: u64) -> Self {
        Self {
            event_type,
            tick,
            args: HashMap::new(),
        }
    }

    /// Add an argument to the event (builder pattern)
    pub fn with_arg(mut self, key: &'static str, value: EventArg) -> Self {
        self.args.insert(key, value);
        self
    }

    /// Get an argument by key
    pub fn get_arg(&self, key: &str) -> Option<&EventArg> {
        self.args.get(key)
    }

    /// Get zone argument if present
    pub fn get_zone_id(&self) -> Option<u32> {
        if let Some(EventArg::ZoneId(id)) = self.get_arg("zone") {
            Some(*id)
        } else {
            None
        }
    }

    /// Get actor argument if present
    pub fn get_actor_id(&self) -> Option<u32> {
        if let Some(EventArg::ActorId(id)) = self.get_arg("actor") {
            Some(*id)
        } else {
            None
        }
    }

    /// Get position argument if present
    pub fn get_position(&self) -> Option<Point3D> {
        if let Some(EventArg::Position(point)) = self.get_arg("position") {
            Some(*point)
        } else {
            None
        }
    }
}

/// Event handler trait
/// Returns true if event was consumed (stops forwarding)
/// Returns false to allow forwarding to other handlers
pub trait EventHandler: Send {
    /// Handle an event, return true if consumed
    fn on_event(&mut self, event: &Event) -> bool;
}

impl<F> EventHandler for F
where
    F: FnMut(&Event) -> bool + Send,
{
    fn on_event(&mut self, event: &Event) -> bool {
        self(event)
    }
}

new_key_type! {
    /// Handle returned by [`EventManager::subscribe`]
    pub struct SubscriptionId;
}

type SharedHandler = Arc<Mutex<Box<dyn EventHandler>>>;

struct Subscription {
    event_type: EventType,
    handler: SharedHandler,
}

/// Events drained from an [`EventManager`], paired with their handlers
///
/// Handlers are captured when the batch is taken, so a handler removed
/// before delivery still sees the events of a batch already taken.
#[derive(Default)]
pub struct DispatchBatch {
    deliveries: Vec<(Event, Vec<SharedHandler>)>,
}

impl DispatchBatch {
    /// Number of events in the batch
    pub fn len(&self) -> usize {
        self.deliveries.len()
    }

    /// Whether the batch holds no events
    pub fn is_empty(&self) -> bool {
        self.deliveries.is_empty()
    }

    /// Deliver every event in order, returning how many were delivered
    ///
    /// Stops forwarding an event at the first handler that consumes it.
    pub fn deliver(self) -> usize {
        let delivered = self.deliveries.len();
        for (event, handlers) in &self.deliveries {
            for handler in handlers {
                let consumed = match handler.lock() {
                    Ok(mut handler) => handler.on_event(event),
                    Err(_) => {
                        log::error!("Handler for {:?} poisoned, skipping", event.event_type);
                        false
                    }
                };
                if consumed {
                    break;
                }
            }
        }
        delivered
    }
}

impl std::fmt::Debug for DispatchBatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchBatch")
            .field("events", &self.deliveries.len())
            .finish()
    }
}

/// Event registry with subscription and queuing
/// Follows chain of responsibility pattern
pub struct EventManager {
    immediate_queue: Vec<Event>,
    deferred_queue: Vec<(u64, Event)>,
    subscriptions: SlotMap<SubscriptionId, Subscription>,
    order: HashMap<EventType, Vec<SubscriptionId>>,
    current_tick: u64,
}

impl EventManager {
    /// Create a new empty event manager
    pub fn new() -> Self {
        Self {
            immediate_queue: Vec::new(),
            deferred_queue: Vec::new(),
            subscriptions: SlotMap::with_key(),
            order: HashMap::new(),
            current_tick: 0,
        }
    }

    /// Update the current tick used to decide which deferred events are due
    pub fn update_tick(&mut self, tick: u64) {
        self.current_tick = tick;
    }

    /// Current tick
    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    /// Subscribe a handler to a specific event type
    /// Handlers are notified in subscription order
    pub fn subscribe(&mut self, event_type: EventType, handler: Box<dyn EventHandler>) -> SubscriptionId {
        let id = self.subscriptions.insert(Subscription {
            event_type,
            handler: Arc::new(Mutex::new(handler)),
        });
        self.order.entry(event_type).or_default().push(id);
        log::debug!("Subscribed {:?} to {:?}", id, event_type);
        id
    }

    /// Remove a subscription; returns whether it existed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        match self.subscriptions.remove(id) {
            Some(subscription) => {
                if let Some(ids) = self.order.get_mut(&subscription.event_type) {
                    ids.retain(|existing| *existing != id);
                }
                true
            }
            None => false,
        }
    }

    /// Number of handlers subscribed to `event_type`
    pub fn subscriber_count(&self, event_type: EventType) -> usize {
        self.order.get(&event_type).map_or(0, Vec::len)
    }

    /// Publish event for handling on the next dispatch
    pub fn publish(&mut self, event: Event) {
        self.immediate_queue.push(event);
    }

    /// Post event for deferred delivery once the current tick reaches `delivery_tick`
    pub fn post(&mut self, delivery_tick: u64, event: Event) {
        self.deferred_queue.push((delivery_tick, event));
    }

    /// Number of queued events not yet dispatched
    pub fn pending(&self) -> usize {
        self.immediate_queue.len() + self.deferred_queue.len()
    }

    /// Dispatch all pending events
    /// Processes immediate queue first, then due deferred events
    /// Returns the number of events dispatched
    pub fn dispatch(&mut self) -> usize {
        self.take_due().deliver()
    }

    /// Drain the immediate queue and the due deferred events
    ///
    /// The returned batch is delivered with [`DispatchBatch::deliver`],
    /// typically after releasing any lock around the manager.
    pub fn take_due(&mut self) -> DispatchBatch {
        let current_tick = self.current_tick;
        let (due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.deferred_queue)
            .into_iter()
            .partition(|(delivery_tick, _)| *delivery_tick <= current_tick);
        self.deferred_queue = waiting;

        let deliveries = std::mem::take(&mut self.immediate_queue)
            .into_iter()
            .chain(due.into_iter().map(|(_, event)| event))
            .map(|event| {
                let handlers = self.handlers_for(event.event_type);
                (event, handlers)
            })
            .collect();
        DispatchBatch { deliveries }
    }

    /// Handlers subscribed to `event_type`, in subscription order
    fn handlers_for(&self, event_type: EventType) -> Vec<SharedHandler> {
        self.order.get(&event_type).map_or_else(Vec::new, |ids| {
            ids.iter()
                .filter_map(|id| self.subscriptions.get(*id))
                .map(|subscription| Arc::clone(&subscription.handler))
                .collect()
        })
    }

    /// Clear all queued events (useful for state transitions)
    pub fn clear(&mut self) {
        self.immediate_queue.clear();
        self.deferred_queue.clear();
    }
}

impl Default for EventManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventManager")
            .field("pending", &self.pending())
            .field("subscriptions", &self.subscriptions.len())
            .field("current_tick", &self.current_tick)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording_handler(
        log: &Arc<Mutex<Vec<&'static str>>>,
        name: &'static str,
        consume: bool,
    ) -> Box<dyn EventHandler> {
        let log = Arc::clone(log);
        Box::new(move |_event: &Event| {
            log.lock().unwrap().push(name);
            consume
        })
    }

    #[test]
    fn test_immediate_dispatch() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut manager = EventManager::new();
        manager.subscribe(EventType::ZoneEntered, recording_handler(&log, "entered", false));
        manager.subscribe(EventType::ZoneExited, recording_handler(&log, "exited", false));

        let event = Event::new(EventType::ZoneEntered, 0)
            .with_arg("zone", EventArg::ZoneId(42));
        manager.publish(event);
        assert_eq!(manager.dispatch(), 1);

        assert_eq!(*log.lock().unwrap(), vec!["entered"]);
        assert_eq!(manager.pending(), 0);
    }

    #[test]
    fn test_deferred_dispatch() {
        let mut manager = EventManager::new();
        manager.update_tick(0);
        manager.post(10, Event::new(EventType::ZoneExited, 0));

        manager.update_tick(5);
        assert_eq!(manager.dispatch(), 0);
        assert_eq!(manager.pending(), 1);

        manager.update_tick(10);
        assert_eq!(manager.dispatch(), 1);
        assert_eq!(manager.pending(), 0);
    }

    #[test]
    fn test_event_consumption() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut manager = EventManager::new();
        manager.subscribe(EventType::ZoneEntered, recording_handler(&log, "first", true));
        manager.subscribe(EventType::ZoneEntered, recording_handler(&log, "second", false));

        manager.publish(Event::new(EventType::ZoneEntered, 0));
        manager.dispatch();

        assert_eq!(*log.lock().unwrap(), vec!["first"]);
        assert_eq!(manager.subscriber_count(EventType::ZoneEntered), 2);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut manager = EventManager::new();
        let first = manager.subscribe(EventType::ZoneEntered, recording_handler(&log, "first", true));
        manager.subscribe(EventType::ZoneEntered, recording_handler(&log, "second", false));

        assert!(manager.unsubscribe(first));
        assert!(!manager.unsubscribe(first));

        manager.publish(Event::new(EventType::ZoneEntered, 0));
        manager.dispatch();
        assert_eq!(*log.lock().unwrap(), vec!["second"]);
        assert_eq!(manager.subscriber_count(EventType::ZoneEntered), 1);
    }

    #[test]
    fn test_typed_argument_getters() {
        let event = Event::new(EventType::ZoneEntered, 7)
            .with_arg("zone", EventArg::ZoneId(3))
            .with_arg("actor", EventArg::ActorId(9))
            .with_arg("position", EventArg::Position(Point3D::new(1, 2, 3)));

        assert_eq!(event.get_zone_id(), Some(3));
        assert_eq!(event.get_actor_id(), Some(9));
        assert_eq!(event.get_position(), Some(Point3D::new(1, 2, 3)));
        assert_eq!(Event::new(EventType::ZoneExited, 0).get_zone_id(), None);
    }

    #[test]
    fn test_clear_drops_queued_events() {
        let mut manager = EventManager::new();
        manager.publish(Event::new(EventType::ZoneEntered, 0));
        manager.post(3, Event::new(EventType::ZoneExited, 0));
        manager.clear();
        assert_eq!(manager.pending(), 0);
        assert_eq!(manager.dispatch(), 0);
    }

    #[test]
    fn test_handler_may_publish_into_shared_manager() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let manager = Arc::new(Mutex::new(EventManager::new()));

        let shared = Arc::clone(&manager);
        manager.lock().unwrap().subscribe(
            EventType::ZoneEntered,
            Box::new(move |event: &Event| {
                let exit = Event::new(EventType::ZoneExited, event.tick);
                shared.lock().unwrap().publish(exit);
                true
            }),
        );
        manager
            .lock()
            .unwrap()
            .subscribe(EventType::ZoneExited, recording_handler(&log, "exited", true));

        manager.lock().unwrap().publish(Event::new(EventType::ZoneEntered, 1));
        let batch = manager.lock().unwrap().take_due();
        assert_eq!(batch.deliver(), 1);
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(manager.lock().unwrap().pending(), 1);

        let batch = manager.lock().unwrap().take_due();
        assert_eq!(batch.len(), 1);
        batch.deliver();
        assert_eq!(*log.lock().unwrap(), vec!["exited"]);
    }
}
