//! Exact containment and intersection predicates
//!
//! All shapes live on the integer lattice and every predicate is computed
//! with widened integer arithmetic, so results never depend on rounding.
//!
//! # Module Organization
//!
//! - [`point`] - Lattice points and axes
//! - [`primitives`] - Concrete solids and their containment tests
//! - [`shape`] - The closed [`Shape3D`] union and the open [`Shape`] trait
//! - [`dispatch`] - Pairwise intersection table
//! - [`error`] - Construction and dispatch errors
//!
//! # Conventions
//!
//! - **Closed sets**: boundary points are contained by every shape
//! - **Symmetric intersection**: `a` intersects `b` iff `b` intersects `a`
//! - **Pure**: no predicate locks, allocates, logs or touches global state

pub mod point;
pub mod primitives;
pub mod shape;
pub mod dispatch;
pub mod error;


pub use point::{Axis, Point3D};
pub use primitives::{AxisAlignedBox, Cylinder, Plane, PointShape, Sphere};
pub use shape::{Shape, Shape3D, ShapeExt, ShapeKind};
pub use dispatch::intersection_test;
pub use error::GeometryError;
