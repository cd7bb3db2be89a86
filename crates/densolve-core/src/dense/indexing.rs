//! Element, row, column and sub-matrix access for [`Dense`].

use core::ops::Range;

use crate::Scalar;
use crate::error::{CoreError, Result};

use super::{Dense, DenseMut, DenseRef};

impl<T: Scalar> Dense<T> {
    /// Element at `(r, c)`.
    ///
    /// Returns [`CoreError::IndexOutOfBounds`] when either index is out of
    /// range.
    pub fn get(&self, r: usize, c: usize) -> Result<T> {
        self.as_ref().get(r, c)
    }

    /// Overwrite the element at `(r, c)`.
    pub fn set(&mut self, r: usize, c: usize, value: T) -> Result<()> {
        self.as_mut().set(r, c, value)
    }

    /// Row `r` as a live slice of the backing buffer.
    pub fn row(&self, r: usize) -> Result<&[T]> {
        self.as_ref().row(r)
    }

    /// Row `r` as a live mutable slice of the backing buffer.
    pub fn row_mut(&mut self, r: usize) -> Result<&mut [T]> {
        if r >= self.rows {
            return Err(CoreError::IndexOutOfBounds {
                index: (r, 0),
                shape: self.shape(),
            });
        }
        if self.cols == 0 {
            return Ok(&mut []);
        }
        let start = r * self.stride;
        Ok(&mut self.data[start..start + self.cols])
    }

    /// Column `c` as a freshly allocated vector.
    ///
    /// ```
    /// # use densolve_core::dense::Dense;
    /// let m = Dense::from_rows(&[&[1, 2], &[3, 4]]).unwrap();
    /// assert_eq!(m.col(1).unwrap(), vec![2, 4]);
    /// ```
    pub fn col(&self, c: usize) -> Result<Vec<T>> {
        self.as_ref().col(c)
    }

    /// Overwrite row `r` with `values`.
    pub fn set_row(&mut self, r: usize, values: &[T]) -> Result<()> {
        if values.len() != self.cols {
            return Err(CoreError::DimensionMismatch {
                expected: (1, self.cols),
                got: (1, values.len()),
            });
        }
        self.row_mut(r)?.copy_from_slice(values);
        Ok(())
    }

    /// Overwrite column `c` with `values`.
    pub fn set_col(&mut self, c: usize, values: &[T]) -> Result<()> {
        if c >= self.cols {
            return Err(CoreError::IndexOutOfBounds {
                index: (0, c),
                shape: self.shape(),
            });
        }
        if values.len() != self.rows {
            return Err(CoreError::DimensionMismatch {
                expected: (self.rows, 1),
                got: (values.len(), 1),
            });
        }
        for (r, &v) in values.iter().enumerate() {
            self.data[r * self.stride + c] = v;
        }
        Ok(())
    }

    /// A read-only view of `rows x cols` sharing this matrix's storage.
    ///
    /// ```
    /// # use densolve_core::dense::Dense;
    /// let m = Dense::from_rows(&[&[1, 2, 3], &[4, 5, 6], &[7, 8, 9]]).unwrap();
    /// let s = m.submatrix(1..3, 0..2).unwrap();
    /// assert_eq!(s.row(1).unwrap(), &[7, 8]);
    /// ```
    pub fn submatrix(&self, rows: Range<usize>, cols: Range<usize>) -> Result<DenseRef<'_, T>> {
        self.as_ref().submatrix(rows, cols)
    }

    /// A mutable view of `rows x cols`; writes land in this matrix.
    ///
    /// ```
    /// # use densolve_core::dense::Dense;
    /// let mut m = Dense::<f64>::zeros(3, 3);
    /// m.submatrix_mut(0..2, 1..3).unwrap().fill(1.0);
    /// assert_eq!(m.row(0).unwrap(), &[0.0, 1.0, 1.0]);
    /// assert_eq!(m.row(2).unwrap(), &[0.0, 0.0, 0.0]);
    /// ```
    pub fn submatrix_mut(
        &mut self,
        rows: Range<usize>,
        cols: Range<usize>,
    ) -> Result<DenseMut<'_, T>> {
        self.as_mut().into_submatrix(rows, cols)
    }
}
