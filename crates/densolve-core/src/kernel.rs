//! Elementary dense kernels (BLAS levels 1–3) over slices and matrix views.
//!
//! Every routine validates its operand shapes before touching any output,
//! so a [`CoreError::DimensionMismatch`] never leaves a partially written
//! result behind.
//!
//! | Level | Operations | Complexity |
//! |-------|-----------|------------|
//! | L1 | [`dot`], [`axpy`], [`scal`], [`nrm2`] | O(n) |
//! | L3 | [`gemm`], [`trsm`] | O(n^3) |

use crate::dense::{DenseMut, DenseRef};
use crate::error::{CoreError, Result};
use crate::{Float, Scalar};

/// Which triangle of a square matrix holds the operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Triangle {
    Lower,
    Upper,
}

/// Whether to use the triangular operand as stored or transposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transpose {
    No,
    Yes,
}

/// Whether the diagonal is read from storage or assumed to be all ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagonal {
    NonUnit,
    Unit,
}

// ======================================================================
// Level 1: vector operations, O(n)
// ======================================================================

/// Inner (dot) product `sum(x_i * y_i)` of two equally long slices.
///
/// ```
/// # use densolve_core::kernel::dot;
/// let d = dot(&[1.0_f64, 2.0, 3.0], &[4.0, 5.0, 6.0]).unwrap();
/// assert!((d - 32.0).abs() < 1e-12);
/// ```
pub fn dot<T: Scalar>(x: &[T], y: &[T]) -> Result<T> {
    check_lengths(x.len(), y.len())?;
    Ok(dot_unchecked(x, y))
}

/// `y += alpha * x` in place.
///
/// ```
/// # use densolve_core::kernel::axpy;
/// let mut y = [10.0, 20.0, 30.0];
/// axpy(2.0, &[1.0, 2.0, 3.0], &mut y).unwrap();
/// assert_eq!(y, [12.0, 24.0, 36.0]);
/// ```
pub fn axpy<T: Scalar>(alpha: T, x: &[T], y: &mut [T]) -> Result<()> {
    check_lengths(x.len(), y.len())?;
    axpy_unchecked(alpha, x, y);
    Ok(())
}

/// Scale a slice in place: `x *= alpha`.
pub fn scal<T: Scalar>(alpha: T, x: &mut [T]) {
    for v in x {
        *v *= alpha;
    }
}

/// Euclidean norm `sqrt(sum(x_i^2))`.
///
/// ```
/// # use densolve_core::kernel::nrm2;
/// assert!((nrm2(&[3.0_f64, 4.0]) - 5.0).abs() < 1e-12);
/// ```
pub fn nrm2<T: Float>(x: &[T]) -> T {
    x.iter().fold(T::zero(), |acc, &v| acc + v * v).sqrt()
}

#[inline]
pub(crate) fn dot_unchecked<T: Scalar>(x: &[T], y: &[T]) -> T {
    x.iter()
        .zip(y.iter())
        .fold(T::zero(), |acc, (&a, &b)| acc + a * b)
}

#[inline]
pub(crate) fn axpy_unchecked<T: Scalar>(alpha: T, x: &[T], y: &mut [T]) {
    for (yi, &xi) in y.iter_mut().zip(x.iter()) {
        *yi += alpha * xi;
    }
}

// ======================================================================
// Level 3: matrix-matrix operations, O(n^3)
// ======================================================================

/// General matrix-matrix multiply: `C = alpha * A * B + beta * C`.
///
/// - `a` must be `[m, k]`, `b` must be `[k, n]`, `c` must be `[m, n]`.
///
/// If `beta` is zero, `c` is overwritten (not read), so uninitialised or
/// NaN-filled outputs are fine.
///
/// ```
/// # use densolve_core::dense::Dense;
/// # use densolve_core::kernel::gemm;
/// let a = Dense::from_rows(&[&[1.0, 2.0], &[3.0, 4.0]]).unwrap();
/// let b = Dense::from_rows(&[&[5.0, 6.0], &[7.0, 8.0]]).unwrap();
/// let mut c = Dense::<f64>::zeros(2, 2);
/// gemm(1.0, a.as_ref(), b.as_ref(), 0.0, c.as_mut()).unwrap();
/// assert_eq!(c.as_slice(), &[19.0, 22.0, 43.0, 50.0]);
/// ```
#[allow(clippy::many_single_char_names)]
pub fn gemm<T: Scalar>(
    alpha: T,
    a: DenseRef<'_, T>,
    b: DenseRef<'_, T>,
    beta: T,
    mut c: DenseMut<'_, T>,
) -> Result<()> {
    let (m, k) = a.shape();
    let n = b.ncols();

    if b.nrows() != k {
        return Err(CoreError::DimensionMismatch {
            expected: (k, n),
            got: b.shape(),
        });
    }
    if c.shape() != (m, n) {
        return Err(CoreError::DimensionMismatch {
            expected: (m, n),
            got: c.shape(),
        });
    }

    // ikj loop order: rows of B and C are contiguous, so each update is an axpy.
    for i in 0..m {
        let a_row = a.row_unchecked(i);
        let c_row = c.row_mut_unchecked(i);
        if beta == T::zero() {
            c_row.fill(T::zero());
        } else if beta != T::one() {
            scal(beta, c_row);
        }
        for (p, &a_ip) in a_row.iter().enumerate() {
            axpy_unchecked(alpha * a_ip, b.row_unchecked(p), c_row);
        }
    }

    Ok(())
}

/// Triangular solve with multiple right-hand sides: `op(T) * X = B`.
///
/// `t` must be square `[n, n]`; only the `triangle` half (and the diagonal,
/// unless `diagonal` is [`Diagonal::Unit`]) is read. `b` is `[n, k]` and is
/// overwritten with `X`. A single vector right-hand side is an `[n, 1]`
/// matrix.
///
/// No check is made for zero pivots; a singular `t` yields infinities or
/// NaNs in the result.
///
/// ```
/// # use densolve_core::dense::Dense;
/// # use densolve_core::kernel::{trsm, Diagonal, Transpose, Triangle};
/// let l = Dense::from_rows(&[&[2.0, 0.0], &[1.0, 1.0]]).unwrap();
/// let mut b = Dense::from_rows(&[&[4.0], &[5.0]]).unwrap();
/// trsm(l.as_ref(), Triangle::Lower, Transpose::No, Diagonal::NonUnit, b.as_mut()).unwrap();
/// assert_eq!(b.col(0).unwrap(), vec![2.0, 3.0]);
/// ```
pub fn trsm<T: Float>(
    t: DenseRef<'_, T>,
    triangle: Triangle,
    transpose: Transpose,
    diagonal: Diagonal,
    mut b: DenseMut<'_, T>,
) -> Result<()> {
    let n = t.nrows();
    if t.ncols() != n {
        return Err(CoreError::DimensionMismatch {
            expected: (n, n),
            got: t.shape(),
        });
    }
    if b.nrows() != n {
        return Err(CoreError::DimensionMismatch {
            expected: (n, b.ncols()),
            got: b.shape(),
        });
    }

    // Effective shape of op(T): lower-triangular ops run forward, upper ones
    // backward. The transposed variants scatter each finished row of X into
    // the rows still pending, which keeps every access to T on a row of T.
    match (triangle, transpose) {
        (Triangle::Lower, Transpose::No) => {
            for i in 0..n {
                let t_row = t.row_unchecked(i);
                for (k, &t_ik) in t_row.iter().enumerate().take(i) {
                    let (x_k, x_i) = b.row_pair_mut(k, i);
                    axpy_unchecked(-t_ik, x_k, x_i);
                }
                finish_row(&mut b, i, t_row[i], diagonal);
            }
        }
        (Triangle::Upper, Transpose::No) => {
            for i in (0..n).rev() {
                let t_row = t.row_unchecked(i);
                for (k, &t_ik) in t_row.iter().enumerate().skip(i + 1) {
                    let (x_k, x_i) = b.row_pair_mut(k, i);
                    axpy_unchecked(-t_ik, x_k, x_i);
                }
                finish_row(&mut b, i, t_row[i], diagonal);
            }
        }
        (Triangle::Lower, Transpose::Yes) => {
            for i in (0..n).rev() {
                let t_row = t.row_unchecked(i);
                finish_row(&mut b, i, t_row[i], diagonal);
                for (k, &t_ik) in t_row.iter().enumerate().take(i) {
                    let (x_i, x_k) = b.row_pair_mut(i, k);
                    axpy_unchecked(-t_ik, x_i, x_k);
                }
            }
        }
        (Triangle::Upper, Transpose::Yes) => {
            for i in 0..n {
                let t_row = t.row_unchecked(i);
                finish_row(&mut b, i, t_row[i], diagonal);
                for (k, &t_ik) in t_row.iter().enumerate().skip(i + 1) {
                    let (x_i, x_k) = b.row_pair_mut(i, k);
                    axpy_unchecked(-t_ik, x_i, x_k);
                }
            }
        }
    }

    Ok(())
}

#[inline]
fn finish_row<T: Float>(b: &mut DenseMut<'_, T>, i: usize, pivot: T, diagonal: Diagonal) {
    if diagonal == Diagonal::NonUnit {
        for v in b.row_mut_unchecked(i) {
            *v /= pivot;
        }
    }
}

// ======================================================================
// Internal helpers
// ======================================================================

fn check_lengths(x: usize, y: usize) -> Result<()> {
    if x != y {
        return Err(CoreError::DimensionMismatch {
            expected: (x, 1),
            got: (y, 1),
        });
    }
    Ok(())
}
