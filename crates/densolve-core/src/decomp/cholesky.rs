//! Cholesky decomposition for symmetric positive-definite matrices.
//!
//! Decomposes a symmetric positive-definite matrix `A` into `A = L L^T`
//! where `L` is lower triangular with positive diagonal entries.
//!
//! Factorizing never fails on a square input: a matrix that turns out not
//! to be positive definite yields [`Cholesky::NotPositiveDefinite`], and
//! queries on that variant return [`CoreError::NotPositiveDefinite`].

use crate::dense::{Dense, DenseMut, DenseRef, triangular};
use crate::error::{CoreError, Result};
use crate::kernel::{self, Diagonal, Transpose, Triangle};
use crate::Float;

/// The lower-triangular factor of a successful decomposition.
///
/// Entries above the diagonal are exactly zero and the diagonal is
/// strictly positive.
#[derive(Debug, Clone)]
pub struct Llt<T: Float> {
    l: Dense<T>,
}

/// Outcome of factorizing a square matrix.
#[derive(Debug, Clone)]
pub enum Cholesky<T: Float> {
    /// The source was symmetric positive definite.
    Spd(Llt<T>),
    /// Elimination stopped at column `pivot` with a non-positive radicand.
    NotPositiveDefinite { order: usize, pivot: usize },
}

impl<T: Float> Llt<T> {
    /// Order `N` of the factorized `N x N` matrix.
    pub fn order(&self) -> usize {
        self.l.nrows()
    }

    /// The lower-triangular factor `L`.
    pub fn l(&self) -> &Dense<T> {
        &self.l
    }

    /// Solve `A X = B` in place, overwriting `b` with `X`.
    pub fn solve_in_place(&self, mut b: DenseMut<'_, T>) -> Result<()> {
        let n = self.order();
        if b.nrows() != n {
            return Err(CoreError::DimensionMismatch {
                expected: (n, b.ncols()),
                got: b.shape(),
            });
        }
        // L Y = B, then L^T X = Y.
        let l = self.l.as_ref();
        kernel::trsm(l, Triangle::Lower, Transpose::No, Diagonal::NonUnit, b.rb_mut())?;
        kernel::trsm(l, Triangle::Lower, Transpose::Yes, Diagonal::NonUnit, b)
    }

    /// Solve `A X = B` for an `N x M` right-hand side.
    pub fn solve(&self, b: &Dense<T>) -> Result<Dense<T>> {
        let mut x = b.as_ref().to_owned();
        self.solve_in_place(x.as_mut())?;
        Ok(x)
    }

    /// Solve `X A = B` for an `M x N` right-hand side.
    ///
    /// `A` is symmetric, so this is the transpose of `A X^T = B^T`.
    pub fn solve_right(&self, b: &Dense<T>) -> Result<Dense<T>> {
        let n = self.order();
        if b.ncols() != n {
            return Err(CoreError::DimensionMismatch {
                expected: (b.nrows(), n),
                got: b.shape(),
            });
        }
        let mut xt = b.transpose();
        self.solve_in_place(xt.as_mut())?;
        Ok(xt.transpose())
    }

    /// `A^{-1}`, by solving against the identity.
    pub fn inverse(&self) -> Result<Dense<T>> {
        let mut x = Dense::eye(self.order());
        self.solve_in_place(x.as_mut())?;
        Ok(x)
    }

    /// `det(A) = prod(diag(L))^2`.
    pub fn det(&self) -> T {
        let l = self.l.as_ref();
        (0..self.order()).fold(T::one(), |acc, i| {
            let d = l.at(i, i);
            acc * d * d
        })
    }

    /// `log(det(A)) = 2 * sum(log(diag(L)))`, which avoids overflow.
    pub fn log_det(&self) -> T {
        let l = self.l.as_ref();
        let sum = (0..self.order()).fold(T::zero(), |acc, i| acc + l.at(i, i).ln());
        sum + sum
    }

    /// Rebuild the source matrix as `L L^T`.
    pub fn reconstruct(&self) -> Dense<T> {
        let l = self.l.as_ref();
        Dense::from_fn(self.order(), self.order(), |i, j| {
            // Row i and row j of L share non-zeros only up to min(i, j).
            let k = i.min(j) + 1;
            kernel::dot_unchecked(&l.row_unchecked(i)[..k], &l.row_unchecked(j)[..k])
        })
    }
}

impl<T: Float> Cholesky<T> {
    /// Factorize the square matrix `a`.
    ///
    /// Only the lower triangle (diagonal included) of `a` is read; symmetry
    /// is assumed, not checked.
    ///
    /// ```
    /// # use densolve_core::dense::Dense;
    /// # use densolve_core::decomp::Cholesky;
    /// let a = Dense::from_rows(&[&[4.0, 2.0], &[2.0, 3.0]]).unwrap();
    /// let chol = Cholesky::new(&a).unwrap();
    /// assert!(chol.is_spd());
    /// assert!(chol.reconstruct().unwrap().approx_eq(&a, 1e-12));
    ///
    /// let not_pd = Dense::from_rows(&[&[1.0, 2.0], &[2.0, 1.0]]).unwrap();
    /// assert!(!Cholesky::new(&not_pd).unwrap().is_spd());
    /// ```
    pub fn new(a: &Dense<T>) -> Result<Self> {
        check_square(a)?;
        let n = a.nrows();
        Ok(Self::factor(Dense::zeros(n, n), a.as_ref()))
    }

    /// Re-factorize from a new source of the same order, reusing the
    /// existing factor's storage when there is one. Returns the new SPD
    /// status.
    pub fn refactorize(&mut self, a: &Dense<T>) -> Result<bool> {
        let n = self.order();
        if a.shape() != (n, n) {
            return Err(CoreError::DimensionMismatch {
                expected: (n, n),
                got: a.shape(),
            });
        }
        let l = match self {
            Self::Spd(llt) => {
                log::trace!("cholesky: reusing {n}x{n} factor storage");
                std::mem::replace(&mut llt.l, Dense::zeros(0, 0))
            }
            Self::NotPositiveDefinite { .. } => Dense::zeros(n, n),
        };
        *self = Self::factor(l, a.as_ref());
        Ok(self.is_spd())
    }

    fn factor(mut l: Dense<T>, a: DenseRef<'_, T>) -> Self {
        let order = a.nrows();
        let outcome = factor_lower(l.as_mut(), a);
        match outcome {
            Ok(()) => {
                triangular::fill_upper(l.as_mut(), T::zero());
                Self::Spd(Llt { l })
            }
            Err(pivot) => Self::NotPositiveDefinite { order, pivot },
        }
    }

    /// Whether the source was symmetric positive definite.
    pub fn is_spd(&self) -> bool {
        matches!(self, Self::Spd(_))
    }

    /// Order `N` of the factorized `N x N` source.
    pub fn order(&self) -> usize {
        match self {
            Self::Spd(llt) => llt.order(),
            Self::NotPositiveDefinite { order, .. } => *order,
        }
    }

    /// The factor, if the source was positive definite.
    pub fn llt(&self) -> Option<&Llt<T>> {
        match self {
            Self::Spd(llt) => Some(llt),
            Self::NotPositiveDefinite { .. } => None,
        }
    }

    /// Consume the decomposition and return the factor.
    pub fn into_llt(self) -> Result<Llt<T>> {
        match self {
            Self::Spd(llt) => Ok(llt),
            Self::NotPositiveDefinite { pivot, .. } => {
                Err(CoreError::NotPositiveDefinite { pivot })
            }
        }
    }

    fn spd(&self) -> Result<&Llt<T>> {
        match self {
            Self::Spd(llt) => Ok(llt),
            Self::NotPositiveDefinite { pivot, .. } => Err(CoreError::NotPositiveDefinite {
                pivot: *pivot,
            }),
        }
    }

    /// See [`Llt::l`].
    pub fn l(&self) -> Result<&Dense<T>> {
        Ok(self.spd()?.l())
    }

    /// See [`Llt::solve`].
    pub fn solve(&self, b: &Dense<T>) -> Result<Dense<T>> {
        self.spd()?.solve(b)
    }

    /// See [`Llt::solve_right`].
    pub fn solve_right(&self, b: &Dense<T>) -> Result<Dense<T>> {
        self.spd()?.solve_right(b)
    }

    /// See [`Llt::inverse`].
    pub fn inverse(&self) -> Result<Dense<T>> {
        self.spd()?.inverse()
    }

    /// Determinant of the source; `0` when it was not positive definite.
    pub fn det(&self) -> T {
        self.llt().map_or(T::zero(), Llt::det)
    }

    /// See [`Llt::log_det`].
    pub fn log_det(&self) -> Result<T> {
        Ok(self.spd()?.log_det())
    }

    /// See [`Llt::reconstruct`].
    pub fn reconstruct(&self) -> Result<Dense<T>> {
        Ok(self.spd()?.reconstruct())
    }
}

fn check_square<T: Float>(a: &Dense<T>) -> Result<()> {
    if !a.is_square() {
        return Err(CoreError::DimensionMismatch {
            expected: (a.nrows(), a.nrows()),
            got: a.shape(),
        });
    }
    Ok(())
}

/// Column-by-column elimination into the lower triangle of `l`.
///
/// Returns the failing column on a non-positive (or NaN) radicand; `l` is
/// left partially written in that case.
fn factor_lower<T: Float>(
    mut l: DenseMut<'_, T>,
    a: DenseRef<'_, T>,
) -> std::result::Result<(), usize> {
    let n = a.nrows();
    for j in 0..n {
        let row_j = &l.row_mut_unchecked(j)[..j];
        let d = a.at(j, j) - kernel::dot_unchecked(row_j, row_j);
        if d.is_nan() || d <= T::zero() {
            log::debug!("cholesky: non-positive pivot at column {j} (radicand {d})");
            return Err(j);
        }
        let ljj = d.sqrt();
        *l.at_mut(j, j) = ljj;

        for i in (j + 1)..n {
            let (row_j, row_i) = l.row_pair_mut(j, i);
            let s = kernel::dot_unchecked(&row_i[..j], &row_j[..j]);
            row_i[j] = (a.at(i, j) - s) / ljj;
        }
    }
    Ok(())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::decomp::Lu;
    use proptest::prelude::*;

    fn spd_matrix(n: usize) -> impl Strategy<Value = Dense<f64>> {
        // M^T M + n I is symmetric positive definite for any M.
        proptest::collection::vec(-5.0_f64..5.0, n * n).prop_map(move |data| {
            let m = Dense::from_vec(data, n, n).expect("valid dimensions");
            let mut a = m.transpose().matmul(&m).expect("compatible");
            #[allow(clippy::cast_precision_loss)]
            a.add_assign(&(&Dense::eye(n) * n as f64)).expect("compatible");
            a
        })
    }

    fn rhs(n: usize, k: usize) -> impl Strategy<Value = Dense<f64>> {
        proptest::collection::vec(-10.0_f64..10.0, n * k)
            .prop_map(move |data| Dense::from_vec(data, n, k).expect("valid dimensions"))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn reconstruct_matches_source(a in (1_usize..7).prop_flat_map(spd_matrix)) {
            let chol = Cholesky::new(&a).unwrap();
            prop_assert!(chol.is_spd());
            let tol = 1e-12 * a.norm(crate::dense::Norm::Frobenius);
            prop_assert!(chol.reconstruct().unwrap().approx_eq(&a, tol));
        }

        #[test]
        fn solve_roundtrip(a in spd_matrix(4), b in rhs(4, 3)) {
            let x = Cholesky::new(&a).unwrap().solve(&b).unwrap();
            prop_assert!(a.matmul(&x).unwrap().approx_eq(&b, 1e-8));
        }

        #[test]
        fn solve_right_roundtrip(a in spd_matrix(3), b in rhs(2, 3)) {
            let x = Cholesky::new(&a).unwrap().solve_right(&b).unwrap();
            prop_assert!(x.matmul(&a).unwrap().approx_eq(&b, 1e-8));
        }

        #[test]
        fn inverse_roundtrip(a in spd_matrix(5)) {
            let inv = Cholesky::new(&a).unwrap().inverse().unwrap();
            prop_assert!(a.matmul(&inv).unwrap().approx_eq(&Dense::eye(5), 1e-8));
        }

        #[test]
        fn det_agrees_with_lu(a in spd_matrix(4)) {
            let chol_det = Cholesky::new(&a).unwrap().det();
            let lu_det = Lu::new(&a).unwrap().det();
            let tol = 1e-8 * lu_det.abs().max(1.0);
            prop_assert!((chol_det - lu_det).abs() < tol, "cholesky {chol_det}, lu {lu_det}");
        }
    }
}
