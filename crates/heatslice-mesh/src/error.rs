//! Error types for mesh providers.

use thiserror::Error;

/// Errors a mesh provider reports when it cannot slice its geometry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    /// Mesh has no triangles.
    #[error("mesh is empty")]
    Empty,

    /// A triangle references a vertex past the end of the vertex buffer.
    #[error("triangle index {index} out of bounds for {vertices} vertices")]
    IndexOutOfBounds {
        /// Offending vertex index.
        index: u32,
        /// Number of vertices in the mesh.
        vertices: usize,
    },

    /// A vertex has a NaN or infinite coordinate.
    #[error("vertex {vertex} has a non-finite coordinate")]
    NonFinite {
        /// Offending vertex index.
        vertex: usize,
    },

    /// The cutting plane normal has zero length.
    #[error("cutting plane normal is zero")]
    ZeroNormal,
}

/// Result type for mesh operations.
pub type Result<T> = std::result::Result<T, MeshError>;
