//! Integer lattice points

use std::fmt;

use crate::foundation::math::IVec3;

/// Coordinate axis, used to name the offending axis in construction errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The X axis
    X,
    /// The Y axis
    Y,
    /// The Z axis
    Z,
}

impl Axis {
    /// All three axes in X, Y, Z order
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

/// An immutable position on the integer 3D lattice
///
/// Any `i32` triple is a valid point; there are no bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point3D {
    x: i32,
    y: i32,
    z: i32,
}

impl Point3D {
    /// The point `(0, 0, 0)`
    pub const ORIGIN: Point3D = Point3D::new(0, 0, 0);

    /// Creates a point from its three coordinates
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// X coordinate
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Y coordinate
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Z coordinate
    pub const fn z(&self) -> i32 {
        self.z
    }

    /// Coordinate along `axis`
    pub const fn coord(&self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Returns the point moved by `(dx, dy, dz)`, or `None` if a coordinate
    /// would leave the `i32` range
    pub fn checked_offset(&self, dx: i32, dy: i32, dz: i32) -> Option<Self> {
        Some(Self::new(
            self.x.checked_add(dx)?,
            self.y.checked_add(dy)?,
            self.z.checked_add(dz)?,
        ))
    }

    /// Squared Euclidean distance to another point
    ///
    /// Exact for every pair of `i32` points.
    pub fn squared_distance(&self, other: Point3D) -> i128 {
        let d = self.to_vector() - other.to_vector();
        d.dot(&d)
    }

    /// Widened position vector for exact products
    pub fn to_vector(&self) -> IVec3 {
        IVec3::new(i128::from(self.x), i128::from(self.y), i128::from(self.z))
    }
}

impl From<(i32, i32, i32)> for Point3D {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self::new(x, y, z)
    }
}

impl From<[i32; 3]> for Point3D {
    fn from([x, y, z]: [i32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl fmt::Display for Point3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
