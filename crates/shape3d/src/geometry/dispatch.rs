//! Pairwise intersection table for the closed shape set
//!
//! Each unordered pair of variants is written exactly once. The or-pattern
//! on each arm accepts both operand orders and binds them to the same names,
//! so `intersection_test(a, b) == intersection_test(b, a)` holds by
//! construction. Adding a variant to [`Shape3D`] makes this match
//! non-exhaustive until its row is filled in.
//!
//! All tests are exact: coordinates are widened to `i128` and squared
//! comparisons go through [`square_le`].

use crate::foundation::math::{interval_gap, intervals_overlap, length_squared, square_le, IVec3};
use super::point::Axis;
use super::primitives::{AxisAlignedBox, Cylinder, Plane, Sphere};
use super::shape::Shape3D;

/// Test if two primitives share at least one point
pub fn intersection_test(a: &Shape3D, b: &Shape3D) -> bool {
    use Shape3D::{Box, Cylinder as Cyl, Plane as Pln, Point, Sphere as Sph};

    match (a, b) {
        // A point intersects exactly the shapes that contain it
        (Point(point), other) | (other, Point(point)) => other.contains(point.point()),

        (Sph(s1), Sph(s2)) => sphere_sphere(s1, s2),
        (Box(b1), Box(b2)) => box_box(b1, b2),
        (Pln(p1), Pln(p2)) => plane_plane(p1, p2),
        (Cyl(c1), Cyl(c2)) => cylinder_cylinder(c1, c2),

        (Sph(sphere), Box(aabb)) | (Box(aabb), Sph(sphere)) => sphere_box(sphere, aabb),
        (Sph(sphere), Pln(plane)) | (Pln(plane), Sph(sphere)) => sphere_plane(sphere, plane),
        (Sph(sphere), Cyl(cylinder)) | (Cyl(cylinder), Sph(sphere)) => {
            cylinder_sphere(cylinder, sphere)
        }
        (Box(aabb), Pln(plane)) | (Pln(plane), Box(aabb)) => box_plane(aabb, plane),
        (Box(aabb), Cyl(cylinder)) | (Cyl(cylinder), Box(aabb)) => cylinder_box(cylinder, aabb),
        (Pln(plane), Cyl(cylinder)) | (Cyl(cylinder), Pln(plane)) => {
            cylinder_plane(cylinder, plane)
        }
    }
}

/// Centers no farther apart than the sum of the radii
fn sphere_sphere(a: &Sphere, b: &Sphere) -> bool {
    let radius_sum = i128::from(a.radius()) + i128::from(b.radius());
    a.center().squared_distance(b.center()) <= radius_sum * radius_sum
}

/// Slab test: the intervals overlap on every axis
fn box_box(a: &AxisAlignedBox, b: &AxisAlignedBox) -> bool {
    Axis::ALL.iter().all(|&axis| {
        let (a_min, a_max) = a.interval(axis);
        let (b_min, b_max) = b.interval(axis);
        intervals_overlap(a_min, a_max, b_min, b_max)
    })
}

/// Closest box point to the center lies within the radius
fn sphere_box(sphere: &Sphere, aabb: &AxisAlignedBox) -> bool {
    aabb.squared_distance_to(sphere.center()) <= sphere.radius_squared()
}

/// Signed distance of the center, scaled by `|n|`, is at most the radius
fn sphere_plane(sphere: &Sphere, plane: &Plane) -> bool {
    let value = plane.signed_value(sphere.center());
    if value <= 0 {
        return true;
    }
    square_le(value, sphere.radius_squared() * length_squared(&plane.normal_vector()))
}

/// The box corner deepest along the normal is inside the half-space
fn box_plane(aabb: &AxisAlignedBox, plane: &Plane) -> bool {
    let normal = plane.normal();
    let lowest: i128 = Axis::ALL
        .iter()
        .zip(normal)
        .map(|(&axis, n)| {
            let (lo, hi) = aabb.interval(axis);
            let n = i128::from(n);
            if n >= 0 { n * lo } else { n * hi }
        })
        .sum();
    lowest <= i128::from(plane.offset())
}

/// Two half-spaces are disjoint only when they face away from each other
/// along parallel normals with a gap between their boundaries
fn plane_plane(a: &Plane, b: &Plane) -> bool {
    let n1 = a.normal_vector();
    let n2 = b.normal_vector();
    let dot = n1.dot(&n2);
    let parallel = n1.cross(&n2) == IVec3::zeros();
    if !parallel || dot > 0 {
        return true;
    }
    // n2 = -k * n1 with k = -dot / |n1|^2; b is `n1 · p >= -offset_b / k`
    i128::from(b.offset()) * length_squared(&n1) >= dot * i128::from(a.offset())
}

/// Vertical extents overlap and the disks overlap horizontally
fn cylinder_cylinder(a: &Cylinder, b: &Cylinder) -> bool {
    let (a_bottom, a_top) = a.y_interval();
    let (b_bottom, b_top) = b.y_interval();
    if !intervals_overlap(a_bottom, a_top, b_bottom, b_top) {
        return false;
    }
    let radius_sum = i128::from(a.radius()) + i128::from(b.radius());
    a.axis_squared_distance(b.base()) <= radius_sum * radius_sum
}

/// Vertical extents overlap and the disk reaches the box's XZ rectangle
fn cylinder_box(cylinder: &Cylinder, aabb: &AxisAlignedBox) -> bool {
    let (bottom, top) = cylinder.y_interval();
    let (box_bottom, box_top) = aabb.interval(Axis::Y);
    if !intervals_overlap(bottom, top, box_bottom, box_top) {
        return false;
    }
    let horizontal: i128 = [Axis::X, Axis::Z]
        .iter()
        .map(|&axis| {
            let (lo, hi) = aabb.interval(axis);
            let gap = interval_gap(i128::from(cylinder.base().coord(axis)), lo, hi);
            gap * gap
        })
        .sum();
    horizontal <= cylinder.radius_squared()
}

/// Closest cylinder point to the sphere center lies within the radius
///
/// With `gy` the vertical gap and `d` the horizontal distance to the axis,
/// the squared distance is `gy² + max(0, d - r_c)²`. Comparing against
/// `r_s²` without square roots: let `h = r_s² - gy²`; intersect iff
/// `d <= r_c + √h`, i.e. `t = d² - r_c² - h <= 2·r_c·√h`.
fn cylinder_sphere(cylinder: &Cylinder, sphere: &Sphere) -> bool {
    let (bottom, top) = cylinder.y_interval();
    let gap_y = interval_gap(i128::from(sphere.center().y()), bottom, top);
    let headroom = sphere.radius_squared() - gap_y * gap_y;
    if headroom < 0 {
        return false;
    }
    let radius_c2 = cylinder.radius_squared();
    let t = cylinder.axis_squared_distance(sphere.center()) - radius_c2 - headroom;
    if t <= 0 {
        return true;
    }
    square_le(t, 4 * radius_c2 * headroom)
}

/// The cylinder point deepest along the normal is inside the half-space
///
/// Over the solid, `n · p` is minimised at the cap chosen by the sign of
/// the Y component, offset by `r_c·√(a² + c²)` across the disk.
fn cylinder_plane(cylinder: &Cylinder, plane: &Plane) -> bool {
    let [a, b, c] = plane.normal();
    let (a, b, c) = (i128::from(a), i128::from(b), i128::from(c));
    let (bottom, top) = cylinder.y_interval();
    let base = cylinder.base();
    let lowest_axis = a * i128::from(base.x()) + c * i128::from(base.z()) + (b * bottom).min(b * top);
    let value = lowest_axis - i128::from(plane.offset());
    if value <= 0 {
        return true;
    }
    square_le(value, cylinder.radius_squared() * (a * a + c * c))
}
