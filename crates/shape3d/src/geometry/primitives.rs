//! Primitive solid shapes and their containment predicates
//!
//! Every shape is a closed set: points on the boundary are contained.
//! Constructors validate their invariants and return [`GeometryError`]
//! instead of repairing bad input.

use crate::foundation::math::{interval_gap, IVec3};
use super::error::GeometryError;
use super::point::{Axis, Point3D};

/// A solid sphere with an integer radius
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sphere {
    center: Point3D,
    radius: i32,
}

impl Sphere {
    /// Creates a sphere; fails if `radius` is negative
    pub fn new(center: Point3D, radius: i32) -> Result<Self, GeometryError> {
        if radius < 0 {
            return Err(GeometryError::NegativeRadius { radius });
        }
        Ok(Self { center, radius })
    }

    /// Center of the sphere
    pub const fn center(&self) -> Point3D {
        self.center
    }

    /// Radius of the sphere
    pub const fn radius(&self) -> i32 {
        self.radius
    }

    /// Radius squared, widened
    pub fn radius_squared(&self) -> i128 {
        let r = i128::from(self.radius);
        r * r
    }

    /// Check if the point lies inside or on the surface
    pub fn contains(&self, point: Point3D) -> bool {
        self.center.squared_distance(point) <= self.radius_squared()
    }
}

/// A solid box aligned with the coordinate axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AxisAlignedBox {
    min: Point3D,
    max: Point3D,
}

impl AxisAlignedBox {
    /// Creates a box from its min and max corners
    ///
    /// Fails on the first axis where `min > max`. The corners are never
    /// swapped or clamped.
    pub fn new(min: Point3D, max: Point3D) -> Result<Self, GeometryError> {
        for axis in Axis::ALL {
            let (lo, hi) = (min.coord(axis), max.coord(axis));
            if lo > hi {
                return Err(GeometryError::InvertedBox { axis, min: lo, max: hi });
            }
        }
        Ok(Self { min, max })
    }

    /// Min corner
    pub const fn min(&self) -> Point3D {
        self.min
    }

    /// Max corner
    pub const fn max(&self) -> Point3D {
        self.max
    }

    /// Closed interval covered on `axis`, widened
    pub fn interval(&self, axis: Axis) -> (i128, i128) {
        (i128::from(self.min.coord(axis)), i128::from(self.max.coord(axis)))
    }

    /// Check if the point lies inside or on a face, edge or corner
    pub fn contains(&self, point: Point3D) -> bool {
        Axis::ALL.iter().all(|&axis| {
            let value = point.coord(axis);
            self.min.coord(axis) <= value && value <= self.max.coord(axis)
        })
    }

    /// Squared distance from a point to the nearest point of the box
    ///
    /// Zero when the point is contained.
    pub fn squared_distance_to(&self, point: Point3D) -> i128 {
        Axis::ALL
            .iter()
            .map(|&axis| {
                let (lo, hi) = self.interval(axis);
                let gap = interval_gap(i128::from(point.coord(axis)), lo, hi);
                gap * gap
            })
            .sum()
    }
}

/// A degenerate shape made of a single lattice point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointShape {
    point: Point3D,
}

impl PointShape {
    /// Wraps a point
    pub const fn new(point: Point3D) -> Self {
        Self { point }
    }

    /// The wrapped point
    pub const fn point(&self) -> Point3D {
        self.point
    }

    /// Check if `point` is the wrapped point
    pub fn contains(&self, point: Point3D) -> bool {
        self.point == point
    }
}

impl From<Point3D> for PointShape {
    fn from(point: Point3D) -> Self {
        Self::new(point)
    }
}

/// The closed half-space `normal · p <= offset`
///
/// The bounding plane itself (`normal · p == offset`) belongs to the shape.
/// The normal points out of the solid and need not be unit length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Plane {
    normal: [i32; 3],
    offset: i64,
}

impl Plane {
    /// Creates a half-space; fails if `normal` is the zero vector
    pub fn new(normal: [i32; 3], offset: i64) -> Result<Self, GeometryError> {
        if normal == [0, 0, 0] {
            return Err(GeometryError::ZeroNormal);
        }
        Ok(Self { normal, offset })
    }

    /// Outward normal
    pub const fn normal(&self) -> [i32; 3] {
        self.normal
    }

    /// Plane offset along the normal
    pub const fn offset(&self) -> i64 {
        self.offset
    }

    /// Widened normal for exact products
    pub fn normal_vector(&self) -> IVec3 {
        let [a, b, c] = self.normal;
        IVec3::new(i128::from(a), i128::from(b), i128::from(c))
    }

    /// Signed plane value `normal · p - offset`; non-positive inside
    pub fn signed_value(&self, point: Point3D) -> i128 {
        self.normal_vector().dot(&point.to_vector()) - i128::from(self.offset)
    }

    /// Check if the point lies in the half-space or on its boundary
    pub fn contains(&self, point: Point3D) -> bool {
        self.signed_value(point) <= 0
    }
}

/// A solid cylinder whose axis is parallel to Y
///
/// Spans `base.y ..= base.y + height` vertically; every horizontal slice
/// is a disk of `radius` around the axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cylinder {
    base: Point3D,
    radius: i32,
    height: i32,
}

impl Cylinder {
    /// Creates a cylinder; fails on a negative radius or height
    pub fn new(base: Point3D, radius: i32, height: i32) -> Result<Self, GeometryError> {
        if radius < 0 {
            return Err(GeometryError::NegativeRadius { radius });
        }
        if height < 0 {
            return Err(GeometryError::NegativeHeight { height });
        }
        Ok(Self { base, radius, height })
    }

    /// Center of the bottom cap
    pub const fn base(&self) -> Point3D {
        self.base
    }

    /// Radius of the cylinder
    pub const fn radius(&self) -> i32 {
        self.radius
    }

    /// Height of the cylinder
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Radius squared, widened
    pub fn radius_squared(&self) -> i128 {
        let r = i128::from(self.radius);
        r * r
    }

    /// Closed vertical interval, widened (the top may exceed `i32`)
    pub fn y_interval(&self) -> (i128, i128) {
        let bottom = i128::from(self.base.y());
        (bottom, bottom + i128::from(self.height))
    }

    /// Squared horizontal distance from a point to the axis
    pub fn axis_squared_distance(&self, point: Point3D) -> i128 {
        let dx = i128::from(point.x()) - i128::from(self.base.x());
        let dz = i128::from(point.z()) - i128::from(self.base.z());
        dx * dx + dz * dz
    }

    /// Check if the point lies inside, on the side wall, or on a cap
    pub fn contains(&self, point: Point3D) -> bool {
        let (bottom, top) = self.y_interval();
        let y = i128::from(point.y());
        bottom <= y && y <= top && self.axis_squared_distance(point) <= self.radius_squared()
    }
}
