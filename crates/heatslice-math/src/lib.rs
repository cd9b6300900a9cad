#![warn(missing_docs)]

//! Math types for heatslice.
//!
//! Thin wrappers around nalgebra providing the point, vector and direction
//! types used by plane sections, plus tolerance constants.

use nalgebra::{Unit, Vector2, Vector3};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// A point in 2D plane-local coordinates.
pub type Point2 = nalgebra::Point2<f64>;

/// A vector in 2D space.
pub type Vec2 = Vector2<f64>;

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Linear distance tolerance.
    pub linear: f64,
    /// Tolerance on the cosine between two unit directions (`|a · b|`).
    pub orthogonality: f64,
}

impl Tolerance {
    /// Default tolerances (1e-6 linear, 1e-6 on dot products of unit axes).
    pub const DEFAULT: Self = Self {
        linear: 1e-6,
        orthogonality: 1e-6,
    };

    /// Check if two points are coincident within tolerance.
    pub fn points_equal(&self, a: &Point3, b: &Point3) -> bool {
        (a - b).norm() < self.linear
    }

    /// Check if a scalar distance is effectively zero.
    pub fn is_zero(&self, d: f64) -> bool {
        d.abs() < self.linear
    }

    /// Check if two unit directions are orthogonal.
    pub fn orthogonal(&self, a: &Dir3, b: &Dir3) -> bool {
        a.as_ref().dot(b.as_ref()).abs() <= self.orthogonality
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Normalize `v`, returning `None` for zero-length or non-finite input.
pub fn try_direction(v: &Vec3) -> Option<Dir3> {
    if !v.iter().all(|c| c.is_finite()) {
        return None;
    }
    Dir3::try_new(*v, 0.0)
}
