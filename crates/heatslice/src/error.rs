//! Error types for plane construction, slicing, settings and scenes.

use heatslice_mesh::MeshError;
use thiserror::Error;

/// Errors raised by plane construction or by slicing a mesh.
///
/// These are input errors: they are reported immediately and never retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A plane vector has zero length or a non-finite component.
    #[error("plane vector `{0}` is zero or not finite")]
    ZeroVector(&'static str),

    /// The plane axes are not orthogonal after normalization.
    #[error("plane axes are not orthogonal (u · v = {dot})")]
    NonOrthogonal {
        /// Dot product of the normalized axes.
        dot: f64,
    },

    /// The orthogonality tolerance is negative, not finite, or too loose to
    /// tell parallel axes apart.
    #[error("orthogonality tolerance {0} is outside [0, 1)")]
    InvalidTolerance(f64),

    /// A plane needs a non-zero orientation.
    #[error("plane normal is zero or not finite")]
    ZeroNormal,

    /// The mesh provider could not cut its geometry.
    #[error("mesh cannot be sliced: {0}")]
    Mesh(#[from] MeshError),

    /// The mesh exceeds the configured triangle cap.
    #[error("mesh has {triangles} triangles, limit is {limit}")]
    MeshTooLarge {
        /// Triangles in the mesh.
        triangles: usize,
        /// Configured cap.
        limit: usize,
    },
}

/// Errors loading or validating [`SliceSettings`](crate::SliceSettings).
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The TOML document could not be parsed.
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// A setting is out of range.
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Errors from scene bookkeeping.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// An actor with this name is already in the scene.
    #[error("an actor named `{0}` is already in the scene")]
    DuplicateName(String),

    /// No actor with this name.
    #[error("no actor named `{0}`")]
    NotFound(String),
}

/// Result type for geometry operations.
pub type Result<T> = std::result::Result<T, GeometryError>;
