//! Integer math used by the geometric predicates
//!
//! Every predicate widens its `i32` inputs to `i128` before multiplying, so
//! sums of squared coordinate differences never overflow. The only products
//! that can exceed `i128` are squares of already-widened values, which go
//! through [`square_le`].

pub use nalgebra::Vector3;

/// Integer 3D vector wide enough for dot and cross products of `i32` data
pub type IVec3 = Vector3<i128>;

/// Returns `true` if `value * value <= bound`
///
/// A square that overflows `i128` is larger than any representable bound,
/// so the comparison is still exact.
pub fn square_le(value: i128, bound: i128) -> bool {
    value
        .checked_mul(value)
        .map_or(false, |square| square <= bound)
}

/// Distance from `value` to the closed interval `[min, max]` (zero inside)
pub fn interval_gap(value: i128, min: i128, max: i128) -> i128 {
    if value < min {
        min - value
    } else if value > max {
        value - max
    } else {
        0
    }
}

/// Check if two closed intervals share at least one value
pub fn intervals_overlap(a_min: i128, a_max: i128, b_min: i128, b_max: i128) -> bool {
    a_min <= b_max && b_min <= a_max
}

/// Squared length of an integer vector
pub fn length_squared(v: &IVec3) -> i128 {
    v.dot(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_le_boundary() {
        assert!(square_le(5, 25));
        assert!(!square_le(5, 24));
        assert!(square_le(-5, 25));
    }

    #[test]
    fn test_square_le_overflow_is_false() {
        assert!(!square_le(i128::MAX, i128::MAX));
        assert!(!square_le(i128::MIN, i128::MAX));
    }

    #[test]
    fn test_interval_gap() {
        assert_eq!(interval_gap(5, 0, 10), 0);
        assert_eq!(interval_gap(0, 0, 10), 0);
        assert_eq!(interval_gap(10, 0, 10), 0);
        assert_eq!(interval_gap(-3, 0, 10), 3);
        assert_eq!(interval_gap(14, 0, 10), 4);
    }

    #[test]
    fn test_intervals_touching_overlap() {
        assert!(intervals_overlap(0, 2, 2, 4));
        assert!(intervals_overlap(2, 4, 0, 2));
        assert!(!intervals_overlap(0, 1, 2, 4));
    }

    #[test]
    fn test_integer_vector_products() {
        let a = IVec3::new(1, 0, 0);
        let b = IVec3::new(0, 1, 0);
        assert_eq!(a.dot(&b), 0);
        assert_eq!(a.cross(&b), IVec3::new(0, 0, 1));
        assert_eq!(length_squared(&IVec3::new(2, 3, 6)), 49);
    }
}
