//! Matrix creation functions.

use crate::Scalar;
use crate::error::{CoreError, Result};

use super::Dense;

impl<T: Scalar> Dense<T> {
    /// Create a `rows x cols` matrix filled with zeros.
    ///
    /// ```
    /// # use densolve_core::dense::Dense;
    /// let m = Dense::<f64>::zeros(2, 3);
    /// assert_eq!(m.shape(), (2, 3));
    /// assert!(m.as_slice().iter().all(|&x| x == 0.0));
    /// ```
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::full(rows, cols, T::zero())
    }

    /// Create a `rows x cols` matrix filled with a constant value.
    pub fn full(rows: usize, cols: usize, value: T) -> Self {
        Self {
            data: vec![value; rows * cols],
            rows,
            cols,
            stride: cols,
        }
    }

    /// Create an identity matrix of size `n x n`.
    ///
    /// ```
    /// # use densolve_core::dense::Dense;
    /// let eye = Dense::<f64>::eye(3);
    /// assert_eq!(eye.get(0, 0).unwrap(), 1.0);
    /// assert_eq!(eye.get(0, 1).unwrap(), 0.0);
    /// ```
    pub fn eye(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.data[i * n + i] = T::one();
        }
        m
    }

    /// Build a matrix from `f(row, col)`.
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                data.push(f(r, c));
            }
        }
        Self {
            data,
            rows,
            cols,
            stride: cols,
        }
    }

    /// Build a matrix from a slice of equally long rows.
    ///
    /// ```
    /// # use densolve_core::dense::Dense;
    /// let m = Dense::from_rows(&[&[1.0, 2.0], &[3.0, 4.0], &[5.0, 6.0]]).unwrap();
    /// assert_eq!(m.shape(), (3, 2));
    /// assert_eq!(m.get(2, 0).unwrap(), 5.0);
    /// ```
    pub fn from_rows(rows: &[&[T]]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return Err(CoreError::InvalidShape {
                    shape: (rows.len(), cols),
                    reason: "rows have different lengths",
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            data,
            rows: rows.len(),
            cols,
            stride: cols,
        })
    }
}
