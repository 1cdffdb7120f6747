//! Zone monitoring demo
//!
//! Wanders a handful of actors around a small lattice world and logs every
//! time one of them enters or leaves a zone. Pass a `.toml` or `.ron`
//! config path as the first argument to override the defaults.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossbeam::channel::{bounded, Sender};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use shape3d::config::SimulationSettings;
use shape3d::foundation::logging;
use shape3d::prelude::*;
use shape3d::zones::ActorId;

/// Moves actors one lattice step at a time and feeds the zone monitor
struct Wanderer {
    monitor: ZoneMonitor,
    actors: Vec<Point3D>,
    settings: SimulationSettings,
    event_manager: Arc<Mutex<EventManager>>,
    rng: StdRng,
    done: Sender<u64>,
}

impl Wanderer {
    fn step(&mut self, position: Point3D) -> Point3D {
        let extent = self.settings.world_extent;
        let dx = self.rng.gen_range(-1..=1);
        let dy = self.rng.gen_range(-1..=1);
        let dz = self.rng.gen_range(-1..=1);
        position
            .checked_offset(dx, dy, dz)
            .map_or(position, |moved| {
                Point3D::new(
                    moved.x().clamp(-extent, extent),
                    moved.y().clamp(-extent, extent),
                    moved.z().clamp(-extent, extent),
                )
            })
    }
}

impl Tickable for Wanderer {
    fn tick(&mut self, tick: u64, _delta_time: f32) -> TickOutcome {
        if tick > self.settings.tick_limit {
            let _ = self.done.send(tick);
            return TickOutcome::Finished;
        }

        let mut events = Vec::new();
        for index in 0..self.actors.len() {
            let position = self.step(self.actors[index]);
            self.actors[index] = position;
            events.extend(self.monitor.update(index as ActorId, position, tick));
        }

        match self.event_manager.lock() {
            Ok(mut event_manager) => {
                for event in events {
                    event_manager.publish(event);
                }
                TickOutcome::Continue
            }
            Err(_) => {
                log::error!("EventManager lock poisoned, stopping wanderers");
                let _ = self.done.send(tick);
                TickOutcome::Finished
            }
        }
    }
}

fn build_zones() -> Result<Vec<Zone>, GeometryError> {
    Ok(vec![
        Zone::new(1, "vault", AxisAlignedBox::new(Point3D::new(-4, -4, -4), Point3D::new(4, 4, 4))?),
        Zone::new(2, "beacon", Sphere::new(Point3D::new(10, 0, 10), 5)?),
        Zone::new(3, "silo", Cylinder::new(Point3D::new(-10, -8, 10), 4, 16)?),
        Zone::new(4, "basement", Plane::new([0, 1, 0], -4)?),
        Zone::new(5, "marker", Point3D::new(0, 12, 0)),
    ])
}

fn load_config() -> Result<ShapeConfig, Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => ShapeConfig::load_from_file(&path)?,
        None => ShapeConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    logging::init_with_level(&config.engine.log_level);
    log::info!("Starting zone demo with {} actors", config.simulation.actor_count);

    let attachments = Attachments::builder(config.ticker)
        .with_debug(config.engine.debug_mode)
        .attach_ticker(Ticker::new())
        .attach_event_manager(EventManager::new())
        .build()?;

    let transitions = Arc::new(AtomicUsize::new(0));
    for event_type in [EventType::ZoneEntered, EventType::ZoneExited] {
        let transitions = Arc::clone(&transitions);
        attachments.subscribe(
            event_type,
            Box::new(move |event: &Event| {
                transitions.fetch_add(1, Ordering::Relaxed);
                log::info!(
                    "tick {}: actor {:?} {:?} zone {:?} at {:?}",
                    event.tick,
                    event.get_actor_id(),
                    event.event_type,
                    event.get_zone_id(),
                    event.get_position(),
                );
                true
            }),
        )?;
    }
    attachments.subscribe(
        EventType::ZonesOverlap,
        Box::new(|event: &Event| {
            log::info!("Zone {:?} overlaps an earlier zone", event.get_zone_id());
            true
        }),
    )?;

    let mut monitor = ZoneMonitor::new();
    for zone in build_zones()? {
        let id = zone.id;
        for other in monitor.add_zone(zone)? {
            log::debug!("Zones {} and {} overlap", other, id);
            attachments.publish(
                Event::new(EventType::ZonesOverlap, 0).with_arg("zone", EventArg::ZoneId(id)),
            )?;
        }
    }

    let (done_tx, done_rx) = bounded(1);
    let settings = config.simulation;
    attachments.register_tickable(Box::new(Wanderer {
        monitor,
        actors: vec![Point3D::ORIGIN; settings.actor_count as usize],
        settings,
        event_manager: Arc::clone(attachments.event_manager()),
        rng: StdRng::from_entropy(),
        done: done_tx,
    }));

    let expected = Duration::from_millis(
        config
            .ticker
            .period_ms
            .saturating_mul(settings.tick_limit.saturating_add(1))
            .saturating_add(config.ticker.initial_delay_ms),
    );
    match done_rx.recv_timeout(expected + Duration::from_secs(5)) {
        Ok(tick) => log::info!("Simulation finished on tick {}", tick),
        Err(_) => log::warn!("Simulation did not finish in time"),
    }

    attachments.shutdown();
    log::info!(
        "Zone demo complete: {} transitions observed",
        transitions.load(Ordering::Relaxed)
    );
    Ok(())
}
