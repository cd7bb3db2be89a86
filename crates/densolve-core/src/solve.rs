//! General dense solver: `A X = B` via Householder reflections.
//!
//! Square systems get the exact solution; tall systems (more rows than
//! columns) get the per-column Euclidean least-squares solution
//! `min ||A x - b||_2`. Wide systems are rejected.
//!
//! A rank-deficient or singular `A` is not reported: its zero diagonal in
//! `R` shows up as infinities or NaNs in the result.

use crate::dense::{Dense, DenseMut};
use crate::error::{CoreError, Result};
use crate::kernel::{self, Diagonal, Transpose, Triangle};
use crate::Float;

/// Solve `A X = B` (square `A`) or `min ||A X - B||_F` (tall `A`).
///
/// - `a` must be `[m, n]` with `m >= n`, else [`CoreError::UnsupportedShape`].
/// - `b` must be `[m, k]`, else [`CoreError::DimensionMismatch`].
///
/// The result is a new `[n, k]` matrix; neither input is modified.
///
/// ```
/// # use densolve_core::dense::Dense;
/// # use densolve_core::solve;
/// // Overdetermined system: 3 equations, 2 unknowns.
/// let a = Dense::from_rows(&[&[1.0_f64, 1.0], &[1.0, 2.0], &[1.0, 3.0]]).unwrap();
/// let b = Dense::from_rows(&[&[6.0], &[5.0], &[7.0]]).unwrap();
/// let x = solve(&a, &b).unwrap();
/// assert_eq!(x.shape(), (2, 1));
/// assert!((x.get(0, 0).unwrap() - 5.0).abs() < 1e-12);
/// assert!((x.get(1, 0).unwrap() - 0.5).abs() < 1e-12);
/// ```
#[allow(clippy::many_single_char_names)]
pub fn solve<T: Float>(a: &Dense<T>, b: &Dense<T>) -> Result<Dense<T>> {
    let (m, n) = a.shape();
    let k = b.ncols();
    if b.nrows() != m {
        return Err(CoreError::DimensionMismatch {
            expected: (m, k),
            got: b.shape(),
        });
    }
    if m < n {
        return Err(CoreError::UnsupportedShape {
            shape: a.shape(),
            reason: "wide matrix",
        });
    }
    log::debug!(
        "solve: {} {m}x{n} system with {k} right-hand side(s)",
        if m == n { "square" } else { "tall" }
    );

    let mut qr = a.as_ref().to_owned();
    let mut x = b.as_ref().to_owned();
    let mut r_diag = vec![T::zero(); n];

    for j in 0..n {
        let col = qr.as_ref();
        let mut norm = (j..m)
            .fold(T::zero(), |acc, i| acc + col.at(i, j) * col.at(i, j))
            .sqrt();

        if norm == T::zero() {
            log::debug!("solve: column {j} is rank deficient");
            continue;
        }

        // Choose sign to avoid cancellation.
        if col.at(j, j) > T::zero() {
            norm = -norm;
        }

        // Householder vector v, scaled so that v[0] = 1 + |a_jj| / ||a_j||.
        let mut v: Vec<T> = (j..m).map(|i| col.at(i, j) / -norm).collect();
        v[0] += T::one();

        reflect(&v, qr.submatrix_mut(j..m, j + 1..n)?);
        reflect(&v, x.submatrix_mut(j..m, 0..k)?);
        r_diag[j] = norm;
    }

    // R: strict upper triangle already in place, diagonal from r_diag.
    let mut view = qr.as_mut();
    for (i, &d) in r_diag.iter().enumerate() {
        *view.at_mut(i, i) = d;
    }

    kernel::trsm(
        qr.submatrix(0..n, 0..n)?,
        Triangle::Upper,
        Transpose::No,
        Diagonal::NonUnit,
        x.submatrix_mut(0..n, 0..k)?,
    )?;

    Ok(x.submatrix(0..n, 0..k)?.to_owned())
}

/// Apply `H = I - v v^T / v[0]` from the left to every column of `target`.
///
/// `target` spans the same rows as `v`. Works row-wise: `w = v^T X`, then
/// `X -= v w / v[0]`.
fn reflect<T: Float>(v: &[T], mut target: DenseMut<'_, T>) {
    let mut w = vec![T::zero(); target.ncols()];
    if w.is_empty() {
        return;
    }
    for (i, &vi) in v.iter().enumerate() {
        kernel::axpy_unchecked(vi, target.rb().row_unchecked(i), &mut w);
    }
    let scale = -T::one() / v[0];
    for (i, &vi) in v.iter().enumerate() {
        kernel::axpy_unchecked(vi * scale, &w, target.row_mut_unchecked(i));
    }
}

impl<T: Float> Dense<T> {
    /// Method form of [`solve`](crate::solve::solve) with `self` as `A`.
    pub fn solve(&self, b: &Dense<T>) -> Result<Dense<T>> {
        solve(self, b)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn mat(rows: &[&[f64]]) -> Dense<f64> {
        Dense::from_rows(rows).unwrap()
    }

    /// Entry-wise: within `epsilon` absolutely or `1e-13` relatively.
    fn assert_close(x: &Dense<f64>, want: &Dense<f64>, epsilon: f64) {
        assert_eq!(x.shape(), want.shape());
        for r in 0..x.nrows() {
            for c in 0..x.ncols() {
                assert_relative_eq!(
                    x.get(r, c).unwrap(),
                    want.get(r, c).unwrap(),
                    epsilon = epsilon,
                    max_relative = 1e-13
                );
            }
        }
    }

    #[test]
    fn test_one_element() {
        let x = solve(&mat(&[&[6.0]]), &mat(&[&[3.0]])).unwrap();
        assert!(x.approx_eq(&mat(&[&[0.5]]), 1e-15));
    }

    #[test]
    fn test_square_identity() {
        let b = mat(&[&[3.0], &[2.0], &[1.0]]);
        let x = solve(&Dense::eye(3), &b).unwrap();
        assert_eq!(x, b);
    }

    #[test]
    fn test_square() {
        let a = mat(&[
            &[0.8147, 0.9134, 0.5528],
            &[0.9058, 0.6324, 0.8723],
            &[0.1270, 0.0975, 0.7612],
        ]);
        let b = mat(&[&[0.278], &[0.547], &[0.958]]);
        let want = mat(&[
            &[-0.932_687_281_002_860],
            &[0.303_963_920_182_067],
            &[1.375_216_503_507_109],
        ]);
        assert_close(&solve(&a, &b).unwrap(), &want, 1e-13);
    }

    #[test]
    fn test_row_mismatch() {
        let a = mat(&[
            &[0.604_660_287_979_619_6, 0.940_509_088_045_012_4, 0.664_560_053_218_490_4],
            &[0.437_714_187_186_980_2, 0.424_637_497_071_265_7, 0.686_823_072_867_109_4],
        ]);
        let b = mat(&[
            &[0.300_911_860_585_287_07],
            &[0.515_212_628_502_065_4],
            &[0.813_639_960_990_096_8],
            &[0.12345],
        ]);
        assert_eq!(
            solve(&a, &b).unwrap_err(),
            CoreError::DimensionMismatch {
                expected: (2, 1),
                got: (4, 1)
            }
        );
    }

    #[test]
    fn test_wide_matrix() {
        let a = mat(&[&[0.8147, 0.9134, 0.5528], &[0.9058, 0.6324, 0.8723]]);
        let b = mat(&[&[0.278], &[0.547]]);
        assert_eq!(
            solve(&a, &b).unwrap_err(),
            CoreError::UnsupportedShape {
                shape: (2, 3),
                reason: "wide matrix"
            }
        );
    }

    #[test]
    fn test_skinny_single_rhs() {
        let a = mat(&[
            &[0.8147, 0.9134, 0.9],
            &[0.9058, 0.6324, 0.9],
            &[0.1270, 0.0975, 0.1],
            &[1.6, 2.8, -3.5],
        ]);
        let b = mat(&[&[0.278], &[0.547], &[-0.958], &[1.452]]);
        let want = mat(&[
            &[0.820_970_340_787_782],
            &[-0.218_604_626_527_306],
            &[-0.212_938_815_234_215],
        ]);
        assert_close(&solve(&a, &b).unwrap(), &want, 1e-13);
    }

    #[test]
    fn test_skinny_multiple_rhs() {
        let a = mat(&[
            &[0.8147, 0.9134, 0.231, -1.65],
            &[0.9058, 0.6324, 0.9, 0.72],
            &[0.1270, 0.0975, 0.1, 1.723],
            &[1.6, 2.8, -3.5, 0.987],
            &[7.231, 9.154, 1.823, 0.9],
        ]);
        let b = mat(&[
            &[0.278, 8.635],
            &[0.547, 9.125],
            &[-0.958, -0.762],
            &[1.452, 1.444],
            &[1.999, -7.234],
        ]);
        let want = mat(&[
            &[1.863_006_789_511_373, 44.467_887_791_812_75],
            &[-1.127_270_935_407_224, -34.073_794_226_035_126],
            &[-0.527_926_457_947_33, -8.032_133_759_788_573],
            &[-0.248_621_916_204_897, -2.366_366_415_805_275],
        ]);
        let x = solve(&a, &b).unwrap();
        assert_eq!(x.shape(), (4, 2));
        assert_close(&x, &want, 1e-12);
    }

    #[test]
    fn test_tall_normal_equations() {
        let a = mat(&[
            &[0.8147, 0.9134, 0.9],
            &[0.9058, 0.6324, 0.9],
            &[0.1270, 0.0975, 0.1],
            &[1.6, 2.8, -3.5],
        ]);
        let b = mat(&[&[0.278], &[0.547], &[-0.958], &[1.452]]);
        let x = solve(&a, &b).unwrap();
        let residual = a.matmul(&x).unwrap().sub(&b).unwrap();
        let gradient = a.transpose().matmul(&residual).unwrap();
        assert!(gradient.approx_eq(&Dense::zeros(3, 1), 1e-12));
    }

    #[test]
    fn test_inputs_untouched() {
        let a = mat(&[&[2.0, 1.0], &[1.0, 3.0], &[0.0, 1.0]]);
        let b = mat(&[&[1.0], &[2.0], &[3.0]]);
        let (a0, b0) = (a.clone(), b.clone());
        let _ = a.solve(&b).unwrap();
        assert_eq!(a, a0);
        assert_eq!(b, b0);
    }

    #[test]
    fn test_padded_inputs() {
        // [[2, 1], [1, 3]] with one padding element per row.
        let a = Dense::from_vec_with_stride(vec![2.0, 1.0, 99.0, 1.0, 3.0], 2, 2, 3).unwrap();
        let b = Dense::from_vec_with_stride(vec![3.0, -7.0, 4.0], 2, 1, 2).unwrap();
        let x = solve(&a, &b).unwrap();
        assert!(x.approx_eq(&mat(&[&[1.0], &[1.0]]), 1e-12));
        assert_eq!(x.stride(), 1);
    }

    #[test]
    fn test_agrees_with_lu_on_square() {
        let a = mat(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 10.0]]);
        let b = mat(&[&[1.0, 0.0], &[2.0, 1.0], &[3.0, 0.0]]);
        let via_lu = crate::decomp::Lu::new(&a).unwrap().solve(&b).unwrap();
        assert!(solve(&a, &b).unwrap().approx_eq(&via_lu, 1e-12));
    }

    #[test]
    fn test_empty_system() {
        let x = solve(&Dense::<f64>::zeros(3, 0), &Dense::zeros(3, 2)).unwrap();
        assert_eq!(x.shape(), (0, 2));
    }
}
