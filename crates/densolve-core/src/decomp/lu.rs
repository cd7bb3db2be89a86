//! LU decomposition with partial pivoting.
//!
//! Decomposes a square matrix `A` into `PA = LU` where:
//! - `P` is a permutation matrix (stored as a pivot vector)
//! - `L` is lower triangular with unit diagonal
//! - `U` is upper triangular

use crate::dense::{Dense, DenseMut, triangular};
use crate::error::{CoreError, Result};
use crate::kernel::{self, Diagonal, Transpose, Triangle};
use crate::Float;

/// Result of an LU decomposition with partial pivoting.
///
/// `L` and `U` are packed into a single matrix (the unit diagonal of `L`
/// is implicit), and the permutation is stored as a pivot index vector.
#[derive(Debug, Clone)]
pub struct Lu<T: Float> {
    /// Strict lower triangle holds L, upper triangle and diagonal hold U.
    lu: Dense<T>,
    /// Row `i` of `PA` is row `pivots[i]` of `A`.
    pivots: Vec<usize>,
    /// Sign of the permutation (+1 or -1), for determinant computation.
    sign: T,
}

impl<T: Float> Lu<T> {
    /// Perform LU decomposition with partial pivoting on a square matrix.
    ///
    /// Returns [`CoreError::SingularMatrix`] when a pivot is exactly zero.
    /// Tiny but nonzero pivots are kept, so well-conditioned matrices of
    /// any scale factorize.
    ///
    /// ```
    /// # use densolve_core::dense::Dense;
    /// # use densolve_core::decomp::Lu;
    /// let a = Dense::from_rows(&[&[2.0_f64, 1.0], &[1.0, 4.0]]).unwrap();
    /// let lu = Lu::new(&a).unwrap();
    /// assert!((lu.det() - 7.0).abs() < 1e-10);
    /// ```
    pub fn new(a: &Dense<T>) -> Result<Self> {
        let n = a.nrows();
        if a.ncols() != n {
            return Err(CoreError::DimensionMismatch {
                expected: (n, n),
                got: a.shape(),
            });
        }

        let mut lu = a.as_ref().to_owned();
        let mut pivots: Vec<usize> = (0..n).collect();
        let mut sign = T::one();
        let mut view = lu.as_mut();

        for k in 0..n {
            // Pivot: row with largest |lu[i, k]| for i >= k.
            let mut max_val = view.rb().at(k, k).abs();
            let mut max_row = k;
            for i in (k + 1)..n {
                let val = view.rb().at(i, k).abs();
                if val > max_val {
                    max_val = val;
                    max_row = i;
                }
            }

            if max_row != k {
                view.swap_rows(k, max_row);
                pivots.swap(k, max_row);
                sign = -sign;
            }

            let pivot = view.rb().at(k, k);
            if pivot == T::zero() {
                log::debug!("lu: zero pivot at column {k}");
                return Err(CoreError::SingularMatrix);
            }

            // Eliminate below the pivot, storing the multipliers in L.
            for i in (k + 1)..n {
                let (row_k, row_i) = view.row_pair_mut(k, i);
                let factor = row_i[k] / pivot;
                row_i[k] = factor;
                kernel::axpy_unchecked(-factor, &row_k[k + 1..], &mut row_i[k + 1..]);
            }
        }

        Ok(Self { lu, pivots, sign })
    }

    /// Order `N` of the factorized `N x N` matrix.
    pub fn order(&self) -> usize {
        self.lu.nrows()
    }

    /// The lower triangular factor `L` (unit diagonal).
    pub fn l(&self) -> Dense<T> {
        let n = self.order();
        let mut l = Dense::eye(n);
        triangular::copy_lower_unchecked(l.as_mut(), self.lu.as_ref());
        l
    }

    /// The upper triangular factor `U`.
    pub fn u(&self) -> Dense<T> {
        let n = self.order();
        let mut u = Dense::zeros(n, n);
        triangular::copy_upper_unchecked(u.as_mut(), self.lu.as_ref());
        triangular::copy_diag_unchecked(u.as_mut(), self.lu.as_ref());
        u
    }

    /// The permutation matrix `P`.
    pub fn p(&self) -> Dense<T> {
        let n = self.order();
        let mut p = Dense::zeros(n, n);
        let mut view = p.as_mut();
        for (i, &pi) in self.pivots.iter().enumerate() {
            *view.at_mut(i, pi) = T::one();
        }
        p
    }

    /// The permutation pivot vector.
    pub fn pivots(&self) -> &[usize] {
        &self.pivots
    }

    /// `det(A) = sign * product(diag(U))`.
    pub fn det(&self) -> T {
        let lu = self.lu.as_ref();
        (0..self.order()).fold(self.sign, |acc, i| acc * lu.at(i, i))
    }

    /// Solve `A X = B` for an `N x M` right-hand side.
    pub fn solve(&self, b: &Dense<T>) -> Result<Dense<T>> {
        let n = self.order();
        if b.nrows() != n {
            return Err(CoreError::DimensionMismatch {
                expected: (n, b.ncols()),
                got: b.shape(),
            });
        }
        // Rows of PB.
        let src = b.as_ref();
        let mut x = Dense::from_fn(n, b.ncols(), |r, c| src.at(self.pivots[r], c));
        self.solve_permuted(x.as_mut())?;
        Ok(x)
    }

    /// `A^{-1}`, by solving against the identity.
    pub fn inverse(&self) -> Result<Dense<T>> {
        self.solve(&Dense::eye(self.order()))
    }

    fn solve_permuted(&self, mut x: DenseMut<'_, T>) -> Result<()> {
        let lu = self.lu.as_ref();
        // L Y = PB, then U X = Y.
        kernel::trsm(lu, Triangle::Lower, Transpose::No, Diagonal::Unit, x.rb_mut())?;
        kernel::trsm(lu, Triangle::Upper, Transpose::No, Diagonal::NonUnit, x)
    }
}

// ======================================================================
// Determinant and inverse on Dense
// ======================================================================

impl<T: Float> Dense<T> {
    /// Determinant via LU; `0` for a singular matrix.
    ///
    /// ```
    /// # use densolve_core::dense::Dense;
    /// let a = Dense::from_rows(&[&[6.0_f64, 1.0, 1.0], &[4.0, -2.0, 5.0], &[2.0, 8.0, 7.0]]).unwrap();
    /// assert!((a.det().unwrap() + 306.0).abs() < 1e-10);
    /// ```
    pub fn det(&self) -> Result<T> {
        match Lu::new(self) {
            Ok(lu) => Ok(lu.det()),
            Err(CoreError::SingularMatrix) => Ok(T::zero()),
            Err(e) => Err(e),
        }
    }

    /// Inverse via LU; [`CoreError::SingularMatrix`] if there is none.
    pub fn inverse(&self) -> Result<Dense<T>> {
        Lu::new(self)?.inverse()
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn mat(rows: &[&[f64]]) -> Dense<f64> {
        Dense::from_rows(rows).unwrap()
    }

    fn four() -> Dense<f64> {
        mat(&[
            &[1.0, 2.0, 3.0, 4.0],
            &[5.0, 6.0, 7.0, 8.0],
            &[2.0, 6.0, 4.0, 8.0],
            &[3.0, 1.0, 1.0, 2.0],
        ])
    }

    fn check_factorization(a: &Dense<f64>, tol: f64) {
        let lu = Lu::new(a).unwrap();
        let pa = lu.p().matmul(a).unwrap();
        let prod = lu.l().matmul(&lu.u()).unwrap();
        assert!(pa.approx_eq(&prod, tol), "{pa:?} != {prod:?}");
    }

    #[test]
    fn test_lu_2x2() {
        check_factorization(&mat(&[&[2.0, 1.0], &[1.0, 4.0]]), 1e-12);
    }

    #[test]
    fn test_lu_3x3() {
        check_factorization(
            &mat(&[&[2.0, 1.0, 1.0], &[4.0, 3.0, 3.0], &[8.0, 7.0, 9.0]]),
            1e-12,
        );
    }

    #[test]
    fn test_lu_4x4() {
        check_factorization(&four(), 1e-10);
    }

    #[test]
    fn test_l_and_u_are_triangular() {
        let lu = Lu::new(&four()).unwrap();
        let (l, u) = (lu.l(), lu.u());
        for r in 0..4 {
            assert_eq!(l.get(r, r).unwrap(), 1.0);
            for c in (r + 1)..4 {
                assert_eq!(l.get(r, c).unwrap(), 0.0);
                assert_eq!(u.get(c, r).unwrap(), 0.0);
            }
        }
    }

    #[test]
    fn test_det() {
        // >>> np.linalg.det([[6,1,1],[4,-2,5],[2,8,7]])
        // -306.0
        let a = mat(&[&[6.0, 1.0, 1.0], &[4.0, -2.0, 5.0], &[2.0, 8.0, 7.0]]);
        assert!((Lu::new(&a).unwrap().det() - (-306.0)).abs() < 1e-10);
        // >>> np.linalg.det([[1,2,3,4],[5,6,7,8],[2,6,4,8],[3,1,1,2]])
        // 72.0
        assert!((Lu::new(&four()).unwrap().det() - 72.0).abs() < 1e-10);
        assert!((Lu::new(&Dense::<f64>::eye(5)).unwrap().det() - 1.0).abs() < 1e-14);
    }

    #[test]
    fn test_singular_matrix() {
        let a = mat(&[&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0], &[7.0, 8.0, 9.0]]);
        assert_eq!(Lu::new(&a).unwrap_err(), CoreError::SingularMatrix);
        assert_eq!(a.det().unwrap(), 0.0);
        assert_eq!(a.inverse().unwrap_err(), CoreError::SingularMatrix);
    }

    #[test]
    fn test_small_scale_matrix_is_not_singular() {
        let a = &Dense::<f64>::eye(3) * 1e-14;
        let inv = a.inverse().unwrap();
        assert!((&inv * 1e-14).approx_eq(&Dense::eye(3), 1e-12));
        assert!((a.det().unwrap() / 1e-42 - 1.0).abs() < 1e-12);

        let b = &Dense::<f64>::eye(2) * 1e-13;
        let chol = crate::decomp::Cholesky::new(&b).unwrap();
        let lu_det = b.det().unwrap();
        assert!(lu_det > 0.0);
        assert!((lu_det - chol.det()).abs() <= 1e-12 * chol.det());
        // Entries are 1e13.
        assert!(chol.inverse().unwrap().approx_eq(&b.inverse().unwrap(), 1e-1));
    }

    #[test]
    fn test_not_square() {
        let a = Dense::<f64>::zeros(2, 3);
        assert!(matches!(
            Lu::new(&a),
            Err(CoreError::DimensionMismatch { .. })
        ));
        assert!(a.det().is_err());
    }

    #[test]
    fn test_solve() {
        // 2x + y = 5, x + 4y = 6 => x = 2, y = 1
        let a = mat(&[&[2.0, 1.0], &[1.0, 4.0]]);
        let x = Lu::new(&a).unwrap().solve(&mat(&[&[5.0], &[6.0]])).unwrap();
        assert!(x.approx_eq(&mat(&[&[2.0], &[1.0]]), 1e-12));
    }

    #[test]
    fn test_solve_multiple_rhs() {
        // >>> np.linalg.solve(A, [[10, 1], [26, 5], [20, 2], [7, 3]])
        let a = four();
        let b = mat(&[&[10.0, 1.0], &[26.0, 5.0], &[20.0, 2.0], &[7.0, 3.0]]);
        let x = Lu::new(&a).unwrap().solve(&b).unwrap();
        assert!(x.col(0).unwrap().iter().all(|v| (v - 1.0).abs() < 1e-10));
        assert!(a.matmul(&x).unwrap().approx_eq(&b, 1e-10));
    }

    #[test]
    fn test_solve_dimension_mismatch() {
        let lu = Lu::new(&Dense::<f64>::eye(2)).unwrap();
        assert!(lu.solve(&Dense::zeros(3, 1)).is_err());
    }

    #[test]
    fn test_inverse() {
        let a = mat(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 10.0]]);
        let inv = a.inverse().unwrap();
        assert!(a.matmul(&inv).unwrap().approx_eq(&Dense::eye(3), 1e-10));

        let eye = Dense::<f64>::eye(4);
        assert!(eye.inverse().unwrap().approx_eq(&eye, 1e-14));
    }

    #[test]
    fn test_pivots_track_row_swaps() {
        let a = mat(&[&[0.0, 1.0], &[1.0, 0.0]]);
        let lu = Lu::new(&a).unwrap();
        assert_eq!(lu.pivots(), &[1, 0]);
        assert_eq!(lu.det(), -1.0);
    }
}
