//! # Shape3D
//!
//! Exact containment and intersection tests for solids on the 3D integer
//! lattice, plus the small amount of glue needed to drive them from a
//! ticking simulation.
//!
//! ## Features
//!
//! - **Exact Geometry**: spheres, axis-aligned boxes, points, half-space
//!   planes and Y-aligned cylinders, tested with widened integer math
//! - **Closed Dispatch**: every pair of primitives has an intersection test
//! - **Open Extension**: custom shapes implement [`Shape`] and opt into
//!   pairwise tests by lowering to a primitive
//! - **Tick Service**: fixed-rate callbacks on a worker thread
//! - **Events**: publish/subscribe with per-tick dispatch
//!
//! ## Quick Start
//!
//! ```rust
//! use shape3d::prelude::*;
//!
//! fn main() -> Result<(), GeometryError> {
//!     let ball: Shape3D = Sphere::new(Point3D::new(0, 0, 0), 5)?.into();
//!     let crate_box: Shape3D = AxisAlignedBox::new(
//!         Point3D::new(2, 2, 2),
//!         Point3D::new(10, 10, 10),
//!     )?
//!     .into();
//!
//!     assert!(ball.contains(Point3D::new(0, 5, 0)));
//!     assert!(ball.intersects(&crate_box)?);
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::must_use_candidate)]

pub mod foundation;
pub mod geometry;
pub mod timing;
pub mod events;
pub mod config;
pub mod zones;

mod attachments;

pub use attachments::{AttachError, Attachments, AttachmentsBuilder};

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        Attachments, AttachmentsBuilder, AttachError,
        geometry::{
            Axis, Point3D, Shape, Shape3D, ShapeExt, ShapeKind, GeometryError,
            Sphere, AxisAlignedBox, PointShape, Plane, Cylinder,
            intersection_test,
        },
        timing::{Tickable, TickOutcome, Ticker, TickerHandle, TickService},
        events::{Event, EventArg, EventType, EventHandler, EventManager},
        config::{Config, ShapeConfig, TickerSettings},
        zones::{Zone, ZoneId, ZoneMonitor},
    };
}
