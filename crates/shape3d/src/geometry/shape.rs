//! Shape capability set
//!
//! Two layers:
//! - [`Shape3D`]: the closed union of supported primitives. Intersection
//!   between two `Shape3D` values is total and resolved by the exhaustive
//!   table in [`dispatch`](super::dispatch).
//! - [`Shape`]: the open capability trait. Any type can answer containment;
//!   intersection goes through [`ShapeExt::intersects`], which lowers both
//!   operands into `Shape3D` and reports [`GeometryError::UnsupportedShape`]
//!   when that is impossible.

use std::fmt;

use super::dispatch::intersection_test;
use super::error::GeometryError;
use super::point::Point3D;
use super::primitives::{AxisAlignedBox, Cylinder, Plane, PointShape, Sphere};

/// Discriminant of [`Shape3D`], for logging and diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// [`Sphere`]
    Sphere,
    /// [`AxisAlignedBox`]
    Box,
    /// [`PointShape`]
    Point,
    /// [`Plane`]
    Plane,
    /// [`Cylinder`]
    Cylinder,
}

impl ShapeKind {
    /// Human-readable name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sphere => "sphere",
            Self::Box => "box",
            Self::Point => "point",
            Self::Plane => "plane",
            Self::Cylinder => "cylinder",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Closed set of supported primitive shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape3D {
    /// A solid sphere
    Sphere(Sphere),
    /// A solid axis-aligned box
    Box(AxisAlignedBox),
    /// A single point
    Point(PointShape),
    /// A closed half-space
    Plane(Plane),
    /// A solid Y-aligned cylinder
    Cylinder(Cylinder),
}

impl Shape3D {
    /// Which primitive this is
    pub const fn kind(&self) -> ShapeKind {
        match self {
            Self::Sphere(_) => ShapeKind::Sphere,
            Self::Box(_) => ShapeKind::Box,
            Self::Point(_) => ShapeKind::Point,
            Self::Plane(_) => ShapeKind::Plane,
            Self::Cylinder(_) => ShapeKind::Cylinder,
        }
    }

    /// Check if the point lies inside or on the boundary
    pub fn contains(&self, point: Point3D) -> bool {
        match self {
            Self::Sphere(sphere) => sphere.contains(point),
            Self::Box(aabb) => aabb.contains(point),
            Self::Point(shape) => shape.contains(point),
            Self::Plane(plane) => plane.contains(point),
            Self::Cylinder(cylinder) => cylinder.contains(point),
        }
    }

    /// Test if this shape shares at least one point with `other`
    ///
    /// Total over the closed set; symmetric in its operands.
    pub fn intersects_shape(&self, other: &Shape3D) -> bool {
        intersection_test(self, other)
    }

    /// A lattice point the shape always contains
    ///
    /// `None` for [`Plane`], whose boundary need not pass through the lattice.
    pub const fn representative_point(&self) -> Option<Point3D> {
        match self {
            Self::Sphere(sphere) => Some(sphere.center()),
            Self::Box(aabb) => Some(aabb.min()),
            Self::Point(shape) => Some(shape.point()),
            Self::Plane(_) => None,
            Self::Cylinder(cylinder) => Some(cylinder.base()),
        }
    }
}

impl From<Sphere> for Shape3D {
    fn from(sphere: Sphere) -> Self {
        Self::Sphere(sphere)
    }
}

impl From<AxisAlignedBox> for Shape3D {
    fn from(aabb: AxisAlignedBox) -> Self {
        Self::Box(aabb)
    }
}

impl From<PointShape> for Shape3D {
    fn from(shape: PointShape) -> Self {
        Self::Point(shape)
    }
}

impl From<Point3D> for Shape3D {
    fn from(point: Point3D) -> Self {
        Self::Point(PointShape::new(point))
    }
}

impl From<Plane> for Shape3D {
    fn from(plane: Plane) -> Self {
        Self::Plane(plane)
    }
}

impl From<Cylinder> for Shape3D {
    fn from(cylinder: Cylinder) -> Self {
        Self::Cylinder(cylinder)
    }
}

/// Capability every solid shape provides
///
/// Only [`contains`](Shape::contains) is required. Shapes that can take part
/// in intersection tests return their primitive form from
/// [`as_primitive`](Shape::as_primitive).
pub trait Shape: fmt::Debug + Send + Sync {
    /// Check if the point lies inside or on the boundary
    fn contains(&self, point: Point3D) -> bool;

    /// This shape as a member of the closed primitive set, if it is one
    fn as_primitive(&self) -> Option<Shape3D> {
        None
    }

    /// Name used in diagnostics
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Queries derived from [`Shape`], implemented once for every shape
pub trait ShapeExt: Shape {
    /// Check if the point `(x, y, z)` lies inside or on the boundary
    fn contains_xyz(&self, x: i32, y: i32, z: i32) -> bool {
        self.contains(Point3D::new(x, y, z))
    }

    /// Test if this shape shares at least one point with `other`
    ///
    /// Returns [`GeometryError::UnsupportedShape`] naming the first operand
    /// that is not a supported primitive. `Ok(false)` always means the
    /// shapes are disjoint.
    fn intersects(&self, other: &dyn Shape) -> Result<bool, GeometryError> {
        let lhs = self
            .as_primitive()
            .ok_or(GeometryError::UnsupportedShape { name: self.name() })?;
        let rhs = other
            .as_primitive()
            .ok_or(GeometryError::UnsupportedShape { name: other.name() })?;
        Ok(intersection_test(&lhs, &rhs))
    }
}

impl<S: Shape + ?Sized> ShapeExt for S {}

impl Shape for Shape3D {
    fn contains(&self, point: Point3D) -> bool {
        Shape3D::contains(self, point)
    }

    fn as_primitive(&self) -> Option<Shape3D> {
        Some(*self)
    }

    fn name(&self) -> &'static str {
        self.kind().name()
    }
}

macro_rules! impl_primitive_shape {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Shape for $ty {
                fn contains(&self, point: Point3D) -> bool {
                    <$ty>::contains(self, point)
                }

                fn as_primitive(&self) -> Option<Shape3D> {
                    Some(Shape3D::from(*self))
                }

                fn name(&self) -> &'static str {
                    ShapeKind::$kind.name()
                }
            }
        )*
    };
}

impl_primitive_shape! {
    Sphere => Sphere,
    AxisAlignedBox => Box,
    PointShape => Point,
    Plane => Plane,
    Cylinder => Cylinder,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Torus {
        center: Point3D,
        major: i32,
        minor: i32,
    }

    impl Shape for Torus {
        fn contains(&self, point: Point3D) -> bool {
            let dx = f64::from(point.x() - self.center.x());
            let dy = f64::from(point.y() - self.center.y());
            let dz = f64::from(point.z() - self.center.z());
            let ring = (dx * dx + dz * dz).sqrt() - f64::from(self.major);
            ring * ring + dy * dy <= f64::from(self.minor * self.minor)
        }

        fn name(&self) -> &'static str {
            "torus"
        }
    }

    fn sphere(x: i32, y: i32, z: i32, r: i32) -> Sphere {
        Sphere::new(Point3D::new(x, y, z), r).unwrap()
    }

    #[test]
    fn test_contains_xyz_matches_contains() {
        let shape = Shape3D::from(sphere(0, 0, 0, 5));
        for (x, y, z) in [(5, 0, 0), (0, 0, 6), (-3, 4, 0), (1, 1, 1)] {
            assert_eq!(shape.contains_xyz(x, y, z), shape.contains(Point3D::new(x, y, z)));
        }
    }

    #[test]
    fn test_custom_shape_gets_contains_xyz() {
        let torus = Torus { center: Point3D::ORIGIN, major: 4, minor: 1 };
        assert!(torus.contains_xyz(4, 0, 0));
        assert!(!torus.contains_xyz(0, 0, 0));
    }

    #[test]
    fn test_unsupported_shape_is_an_error_not_false() {
        let torus = Torus { center: Point3D::ORIGIN, major: 4, minor: 1 };
        let far_sphere = sphere(100, 100, 100, 1);

        assert_eq!(
            far_sphere.intersects(&torus),
            Err(GeometryError::UnsupportedShape { name: "torus" })
        );
        assert_eq!(
            torus.intersects(&far_sphere),
            Err(GeometryError::UnsupportedShape { name: "torus" })
        );
    }

    #[test]
    fn test_default_name_is_type_name() {
        #[derive(Debug)]
        struct Nothing;
        impl Shape for Nothing {
            fn contains(&self, _point: Point3D) -> bool {
                false
            }
        }

        let err = Nothing.intersects(&Nothing).unwrap_err();
        match err {
            GeometryError::UnsupportedShape { name } => assert!(name.ends_with("Nothing")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_trait_objects_dispatch_across_variants() {
        let shapes: Vec<Box<dyn Shape>> = vec![
            Box::new(sphere(0, 0, 0, 2)),
            Box::new(AxisAlignedBox::new(Point3D::new(1, 1, 1), Point3D::new(4, 4, 4)).unwrap()),
            Box::new(PointShape::new(Point3D::new(1, 1, 1))),
        ];
        for a in &shapes {
            for b in &shapes {
                assert_eq!(a.intersects(b.as_ref()), Ok(true), "{} vs {}", a.name(), b.name());
            }
        }
    }

    #[test]
    fn test_kind_and_representative_point() {
        let plane = Shape3D::from(Plane::new([0, 0, 1], 0).unwrap());
        assert_eq!(plane.kind(), ShapeKind::Plane);
        assert_eq!(plane.representative_point(), None);

        let point = Shape3D::from(Point3D::new(3, 3, 3));
        assert_eq!(point.kind().to_string(), "point");
        assert_eq!(point.representative_point(), Some(Point3D::new(3, 3, 3)));
    }
}
