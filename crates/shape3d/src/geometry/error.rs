//! Geometry errors

use thiserror::Error;

use super::point::Axis;

/// Errors raised by shape construction and intersection dispatch
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// A sphere or cylinder was given a negative radius
    #[error("Radius must be non-negative, got {radius}")]
    NegativeRadius {
        /// The rejected radius
        radius: i32,
    },

    /// A cylinder was given a negative height
    #[error("Height must be non-negative, got {height}")]
    NegativeHeight {
        /// The rejected height
        height: i32,
    },

    /// A box's min corner lies above its max corner on some axis
    #[error("Box min corner exceeds max corner on the {axis} axis ({min} > {max})")]
    InvertedBox {
        /// First axis found out of order
        axis: Axis,
        /// Min-corner coordinate on that axis
        min: i32,
        /// Max-corner coordinate on that axis
        max: i32,
    },

    /// A plane was given the zero vector as its normal
    #[error("Plane normal must be non-zero")]
    ZeroNormal,

    /// An intersection operand is not one of the supported primitives
    #[error("Unsupported shape in intersection test: {name}")]
    UnsupportedShape {
        /// Name of the shape that could not be dispatched
        name: &'static str,
    },
}
