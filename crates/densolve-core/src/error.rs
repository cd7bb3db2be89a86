use thiserror::Error;

/// All errors returned by `densolve-core`.
///
/// Shapes are reported as `(rows, cols)` pairs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Operand shapes do not match the required layout.
    #[error("dimension mismatch: expected {expected:?}, got {got:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },

    /// A row, column or element index is out of bounds.
    #[error("index {index:?} out of bounds for shape {shape:?}")]
    IndexOutOfBounds {
        index: (usize, usize),
        shape: (usize, usize),
    },

    /// The algorithm does not support matrices of this shape.
    #[error("unsupported shape {shape:?}: {reason}")]
    UnsupportedShape {
        shape: (usize, usize),
        reason: &'static str,
    },

    /// A buffer cannot back a matrix with the requested extents and stride.
    #[error("invalid shape {shape:?}: {reason}")]
    InvalidShape {
        shape: (usize, usize),
        reason: &'static str,
    },

    /// The factorized matrix is not symmetric positive definite.
    #[error("matrix is not positive definite (non-positive pivot at column {pivot})")]
    NotPositiveDefinite { pivot: usize },

    /// Matrix is singular and cannot be inverted / decomposed.
    #[error("singular matrix")]
    SingularMatrix,
}

/// Convenience alias used throughout `densolve-core`.
pub type Result<T> = std::result::Result<T, CoreError>;
