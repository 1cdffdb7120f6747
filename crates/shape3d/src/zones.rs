//! Zone occupancy tracking
//!
//! A [`ZoneMonitor`] holds named zones and, given actor positions each tick,
//! reports which actors entered or left which zones as [`Event`]s ready to
//! publish. Zones are plain [`Shape3D`]s, so containment and overlap use the
//! exact geometry predicates.

use std::collections::HashSet;

use thiserror::Error;

use crate::events::{Event, EventArg, EventType};
use crate::geometry::{Point3D, Shape3D};

/// Zone identifier
pub type ZoneId = u32;

/// Actor identifier
pub type ActorId = u32;

/// Zone registration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ZoneError {
    /// The zone id is already registered
    #[error("Zone {0} is already registered")]
    DuplicateZone(ZoneId),
}

/// A named region of space
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    /// Unique zone id
    pub id: ZoneId,
    /// Name used in logs
    pub name: String,
    /// Region covered by the zone
    pub shape: Shape3D,
}

impl Zone {
    /// Create a zone
    pub fn new(id: ZoneId, name: impl Into<String>, shape: impl Into<Shape3D>) -> Self {
        Self {
            id,
            name: name.into(),
            shape: shape.into(),
        }
    }
}

/// Tracks which actors are inside which zones
#[derive(Debug, Default)]
pub struct ZoneMonitor {
    zones: Vec<Zone>,
    occupancy: HashSet<(ZoneId, ActorId)>,
}

impl ZoneMonitor {
    /// Create a monitor without zones
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a zone
    ///
    /// Returns the ids of already-registered zones the new one overlaps.
    pub fn add_zone(&mut self, zone: Zone) -> Result<Vec<ZoneId>, ZoneError> {
        if self.zones.iter().any(|existing| existing.id == zone.id) {
            return Err(ZoneError::DuplicateZone(zone.id));
        }
        let overlaps: Vec<ZoneId> = self
            .zones
            .iter()
            .filter(|existing| existing.shape.intersects_shape(&zone.shape))
            .map(|existing| existing.id)
            .collect();
        if !overlaps.is_empty() {
            log::debug!("Zone '{}' overlaps zones {:?}", zone.name, overlaps);
        }
        self.zones.push(zone);
        Ok(overlaps)
    }

    /// Registered zones in registration order
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Look up a zone by id
    pub fn zone(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.iter().find(|zone| zone.id == id)
    }

    /// Ids of every zone containing `point`
    pub fn zones_containing(&self, point: Point3D) -> impl Iterator<Item = ZoneId> + '_ {
        self.zones
            .iter()
            .filter(move |zone| zone.shape.contains(point))
            .map(|zone| zone.id)
    }

    /// Every unordered pair of registered zones that intersect
    pub fn overlapping_pairs(&self) -> Vec<(ZoneId, ZoneId)> {
        let mut pairs = Vec::new();
        for (i, a) in self.zones.iter().enumerate() {
            for b in &self.zones[i + 1..] {
                if a.shape.intersects_shape(&b.shape) {
                    pairs.push((a.id, b.id));
                }
            }
        }
        pairs
    }

    /// Whether `actor` is currently recorded inside `zone`
    pub fn is_inside(&self, actor: ActorId, zone: ZoneId) -> bool {
        self.occupancy.contains(&(zone, actor))
    }

    /// Record an actor's position and return the resulting transitions
    ///
    /// Emits one [`EventType::ZoneEntered`] per zone newly containing the
    /// actor and one [`EventType::ZoneExited`] per zone it left, in zone
    /// registration order.
    pub fn update(&mut self, actor: ActorId, position: Point3D, tick: u64) -> Vec<Event> {
        let mut events = Vec::new();
        for zone in &self.zones {
            let key = (zone.id, actor);
            let inside = zone.shape.contains(position);
            let was_inside = self.occupancy.contains(&key);
            if inside && !was_inside {
                self.occupancy.insert(key);
                events.push(zone_event(EventType::ZoneEntered, zone.id, actor, position, tick));
            } else if !inside && was_inside {
                self.occupancy.remove(&key);
                events.push(zone_event(EventType::ZoneExited, zone.id, actor, position, tick));
            }
        }
        events
    }

    /// Forget an actor, emitting exits for every zone it occupied
    pub fn remove_actor(&mut self, actor: ActorId, position: Point3D, tick: u64) -> Vec<Event> {
        let mut events = Vec::new();
        for zone in &self.zones {
            if self.occupancy.remove(&(zone.id, actor)) {
                events.push(zone_event(EventType::ZoneExited, zone.id, actor, position, tick));
            }
        }
        events
    }
}

fn zone_event(event_type: EventType, zone: ZoneId, actor: ActorId, position: Point3D, tick: u64) -> Event {
    Event::new(event_type, tick)
        .with_arg("zone", EventArg::ZoneId(zone))
        .with_arg("actor", EventArg::ActorId(actor))
        .with_arg("position", EventArg::Position(position))
}
