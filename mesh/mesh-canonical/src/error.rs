//! Error types for canonicalization operations.

use thiserror::Error;

/// Errors that can occur before a relaxation starts.
///
/// Once the input has been validated the engines never fail: non-convergence
/// and divergence are reported through [`crate::RelaxStatus`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CanonicalError {
    /// Mesh has no vertices.
    #[error("mesh has no vertices")]
    EmptyMesh,

    /// Mesh has no faces.
    #[error("mesh has no faces")]
    NoFaces,

    /// A face has fewer than three vertices.
    #[error("face {face} has {len} vertices (need at least 3)")]
    DegenerateFace {
        /// The offending face.
        face: usize,
        /// Its vertex count.
        len: usize,
    },

    /// A face references a vertex that does not exist.
    #[error("face {face} references invalid vertex index {index} (mesh has {vertex_count} vertices)")]
    InvalidVertexIndex {
        /// The offending face.
        face: usize,
        /// The invalid index.
        index: u32,
        /// The number of vertices in the mesh.
        vertex_count: usize,
    },

    /// A vertex belongs to no face, so it has no dual face.
    #[error("vertex {vertex} is not used by any face")]
    UnusedVertex {
        /// The unused vertex.
        vertex: usize,
    },

    /// A vertex sits on an open boundary, or on fewer than three faces, so
    /// its dual face has no plane.
    #[error("vertex {vertex} lies on an open boundary")]
    OpenBoundary {
        /// The boundary vertex.
        vertex: usize,
    },

    /// A correction factor is outside its valid range.
    #[error("invalid {name}: {value} (must be finite and > 0)")]
    InvalidFactor {
        /// Parameter name.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Convergence epsilon is negative or not finite.
    #[error("invalid convergence epsilon: {0} (must be finite and >= 0)")]
    InvalidEpsilon(f64),

    /// Divergence threshold is not positive.
    #[error("invalid divergence threshold: {0} (must be > 0)")]
    InvalidThreshold(f64),
}

/// Result type for canonicalization operations.
pub type CanonicalResult<T> = Result<T, CanonicalError>;
