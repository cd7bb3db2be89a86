//! Band-restricted copy and fill between matrices of equal shape.
//!
//! | Function | Band touched |
//! |----------|--------------|
//! | [`copy_upper`] / [`fill_upper`] | `c > r` |
//! | [`copy_lower`] / [`fill_lower`] | `r > c` |
//! | [`copy_diag`]                   | `r == c` |
//!
//! Entries outside the named band are never read or written. Rectangular
//! matrices are fine: the bands are defined by the index relation alone.

use crate::Scalar;
use crate::error::{CoreError, Result};

use super::{Dense, DenseMut, DenseRef};

fn check_same_shape<T: Scalar>(dst: &DenseMut<'_, T>, src: &DenseRef<'_, T>) -> Result<()> {
    if dst.shape() != src.shape() {
        return Err(CoreError::DimensionMismatch {
            expected: dst.shape(),
            got: src.shape(),
        });
    }
    Ok(())
}

/// `dst[r, c] = src[r, c]` for every `c > r`.
pub fn copy_upper<T: Scalar>(dst: DenseMut<'_, T>, src: DenseRef<'_, T>) -> Result<()> {
    check_same_shape(&dst, &src)?;
    copy_upper_unchecked(dst, src);
    Ok(())
}

/// `dst[r, c] = src[r, c]` for every `r > c`.
pub fn copy_lower<T: Scalar>(dst: DenseMut<'_, T>, src: DenseRef<'_, T>) -> Result<()> {
    check_same_shape(&dst, &src)?;
    copy_lower_unchecked(dst, src);
    Ok(())
}

/// `dst[i, i] = src[i, i]` along the main diagonal.
pub fn copy_diag<T: Scalar>(dst: DenseMut<'_, T>, src: DenseRef<'_, T>) -> Result<()> {
    check_same_shape(&dst, &src)?;
    copy_diag_unchecked(dst, src);
    Ok(())
}

// Band copies for callers whose extents already agree.

pub(crate) fn copy_upper_unchecked<T: Scalar>(mut dst: DenseMut<'_, T>, src: DenseRef<'_, T>) {
    debug_assert_eq!(dst.shape(), src.shape());
    let cols = src.ncols();
    for r in 0..src.nrows().min(cols) {
        dst.row_mut_unchecked(r)[r + 1..].copy_from_slice(&src.row_unchecked(r)[r + 1..]);
    }
}

pub(crate) fn copy_lower_unchecked<T: Scalar>(mut dst: DenseMut<'_, T>, src: DenseRef<'_, T>) {
    debug_assert_eq!(dst.shape(), src.shape());
    let cols = src.ncols();
    for r in 1..src.nrows() {
        let end = r.min(cols);
        dst.row_mut_unchecked(r)[..end].copy_from_slice(&src.row_unchecked(r)[..end]);
    }
}

pub(crate) fn copy_diag_unchecked<T: Scalar>(mut dst: DenseMut<'_, T>, src: DenseRef<'_, T>) {
    debug_assert_eq!(dst.shape(), src.shape());
    for i in 0..src.nrows().min(src.ncols()) {
        *dst.at_mut(i, i) = src.at(i, i);
    }
}

/// Set every entry strictly above the diagonal to `value`.
pub fn fill_upper<T: Scalar>(mut dst: DenseMut<'_, T>, value: T) {
    let cols = dst.ncols();
    for r in 0..dst.nrows().min(cols) {
        dst.row_mut_unchecked(r)[r + 1..].fill(value);
    }
}

/// Set every entry strictly below the diagonal to `value`.
pub fn fill_lower<T: Scalar>(mut dst: DenseMut<'_, T>, value: T) {
    let cols = dst.ncols();
    for r in 1..dst.nrows() {
        let end = r.min(cols);
        dst.row_mut_unchecked(r)[..end].fill(value);
    }
}

// ======================================================================
// Method forms on Dense
// ======================================================================

impl<T: Scalar> Dense<T> {
    /// Copy the strict upper triangle of `src` into `self`.
    ///
    /// ```
    /// # use densolve_core::dense::Dense;
    /// let src = Dense::from_rows(&[&[1, 2], &[3, 4]]).unwrap();
    /// let mut u = Dense::zeros(2, 2);
    /// u.copy_upper(&src).unwrap();
    /// u.copy_diag(&src).unwrap();
    /// assert_eq!(u.as_slice(), &[1, 2, 0, 4]);
    /// ```
    pub fn copy_upper(&mut self, src: &Dense<T>) -> Result<()> {
        copy_upper(self.as_mut(), src.as_ref())
    }

    /// Copy the strict lower triangle of `src` into `self`.
    pub fn copy_lower(&mut self, src: &Dense<T>) -> Result<()> {
        copy_lower(self.as_mut(), src.as_ref())
    }

    /// Copy the main diagonal of `src` into `self`.
    pub fn copy_diag(&mut self, src: &Dense<T>) -> Result<()> {
        copy_diag(self.as_mut(), src.as_ref())
    }

    /// Overwrite the strict upper triangle with `value`.
    pub fn fill_upper(&mut self, value: T) {
        fill_upper(self.as_mut(), value);
    }

    /// Overwrite the strict lower triangle with `value`.
    pub fn fill_lower(&mut self, value: T) {
        fill_lower(self.as_mut(), value);
    }
}
