//! Row-major dense matrix storage with an explicit row stride.
//!
//! [`Dense`] owns its buffer. [`DenseRef`] and [`DenseMut`] are borrowed
//! views (slice + extents + stride) that can address a sub-matrix of a
//! larger buffer without copying; writes through a [`DenseMut`] land in the
//! parent's storage.
//!
//! Element `(r, c)` lives at buffer offset `r * stride + c`, and
//! `stride >= cols` always holds. Padding between the end of one logical
//! row and the start of the next is never read by any operation.

mod create;
mod indexing;
mod ops;
pub mod triangular;
mod view;

pub use ops::Norm;
pub use view::{DenseMut, DenseRef};

use crate::Scalar;
use crate::error::{CoreError, Result};

/// A dense, row-major matrix that owns its storage.
///
/// Cloning performs a deep copy of the backing buffer, padding included.
#[derive(Debug, Clone)]
pub struct Dense<T: Scalar> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
    stride: usize,
}

impl<T: Scalar> Dense<T> {
    // ------------------------------------------------------------------
    // Construction from raw parts
    // ------------------------------------------------------------------

    /// Wrap a row-major buffer of exactly `rows * cols` elements.
    ///
    /// ```
    /// # use densolve_core::dense::Dense;
    /// let m = Dense::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3).unwrap();
    /// assert_eq!(m.shape(), (2, 3));
    /// assert_eq!(m.stride(), 3);
    /// ```
    pub fn from_vec(data: Vec<T>, rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(CoreError::InvalidShape {
                shape: (rows, cols),
                reason: "buffer length does not match rows * cols",
            });
        }
        Ok(Self {
            data,
            rows,
            cols,
            stride: cols,
        })
    }

    /// Wrap a row-major buffer whose rows start `stride` elements apart.
    ///
    /// The buffer must hold at least `(rows - 1) * stride + cols` elements.
    ///
    /// ```
    /// # use densolve_core::dense::Dense;
    /// // Two rows of two columns, each row padded to four elements.
    /// let m = Dense::from_vec_with_stride(vec![1, 2, 0, 0, 3, 4], 2, 2, 4).unwrap();
    /// assert_eq!(m.get(1, 1).unwrap(), 4);
    /// ```
    pub fn from_vec_with_stride(
        data: Vec<T>,
        rows: usize,
        cols: usize,
        stride: usize,
    ) -> Result<Self> {
        check_layout(data.len(), rows, cols, stride)?;
        Ok(Self {
            data,
            rows,
            cols,
            stride,
        })
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Number of rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Distance in elements between the starts of consecutive rows.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Whether the matrix has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// The backing buffer in storage order, padding included.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Consume the matrix and return the backing buffer.
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Borrow the whole matrix as a read-only view.
    #[inline]
    pub fn as_ref(&self) -> DenseRef<'_, T> {
        DenseRef::from_parts(&self.data, self.rows, self.cols, self.stride)
    }

    /// Borrow the whole matrix as a mutable view.
    #[inline]
    pub fn as_mut(&mut self) -> DenseMut<'_, T> {
        DenseMut::from_parts(&mut self.data, self.rows, self.cols, self.stride)
    }
}

impl<T: Scalar> PartialEq for Dense<T> {
    /// Compares shape and logical entries; padding is ignored.
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape()
            && self
                .as_ref()
                .row_iter()
                .zip(other.as_ref().row_iter())
                .all(|(a, b)| a == b)
    }
}

impl<'a, T: Scalar> From<&'a Dense<T>> for DenseRef<'a, T> {
    fn from(m: &'a Dense<T>) -> Self {
        m.as_ref()
    }
}

impl<'a, T: Scalar> From<&'a mut Dense<T>> for DenseMut<'a, T> {
    fn from(m: &'a mut Dense<T>) -> Self {
        m.as_mut()
    }
}

// ======================================================================
// Utility functions
// ======================================================================

/// Minimum buffer length backing a `rows x cols` matrix with `stride`.
#[inline]
pub(crate) fn required_len(rows: usize, cols: usize, stride: usize) -> usize {
    if rows == 0 || cols == 0 {
        0
    } else {
        (rows - 1) * stride + cols
    }
}

pub(crate) fn check_layout(len: usize, rows: usize, cols: usize, stride: usize) -> Result<()> {
    if stride < cols {
        return Err(CoreError::InvalidShape {
            shape: (rows, cols),
            reason: "row stride is smaller than the column count",
        });
    }
    if len < required_len(rows, cols, stride) {
        return Err(CoreError::InvalidShape {
            shape: (rows, cols),
            reason: "buffer too short for rows, cols and stride",
        });
    }
    Ok(())
}
