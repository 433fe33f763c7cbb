//! Error types for the discrete exterior calculus library.

use thiserror::Error;

/// Result type used throughout this crate.
pub type Result<T> = std::result::Result<T, DecError>;

/// Errors produced while building complexes or assembling operators.
///
/// Errors are always returned to the caller; this library never logs or
/// retries on its own.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecError {
    /// `glue_triangle`/`add_triangle` would violate a simplicial identity,
    /// or an edge lookup needed by gluing found an inconsistent endpoint.
    #[error("invalid topology: {reason}")]
    InvalidTopology { reason: String },

    /// A simplex has a zero or near-zero Cayley-Menger determinant, making
    /// the requested Hodge star (or an operator built from it) singular.
    #[error("degenerate geometry at {dim:?}-simplex {id}: {reason}")]
    DegenerateGeometry {
        dim: crate::Dim,
        id: usize,
        reason: String,
    },

    /// `orient!` could not assign a consistent orientation to a connected
    /// component; orientation is left untouched.
    #[error("complex is not orientable: {reason}")]
    NonOrientable { reason: String },

    /// An operator was applied to a chain/form whose length does not match
    /// the number of simplices of the expected dimension.
    #[error("dimension mismatch: expected length {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}
