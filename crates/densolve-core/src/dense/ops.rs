//! Element-wise arithmetic, products, reductions and norms for [`Dense`].
//!
//! The named methods (`add`, `sub`, `elemul`, `matmul`, ...) return
//! [`CoreError::DimensionMismatch`] on incompatible shapes. The operator
//! impls on `&Dense<T>` call the same code and panic instead:
//! - `&a + &b`, `&a - &b` element-wise
//! - `&a * &b` matrix product
//! - `&a * s`, `&a / s` scalar broadcast
//! - `-&a` for `Float` matrices

use core::ops::{Add, Div, Mul, Neg, Sub};

use crate::error::{CoreError, Result};
use crate::kernel;
use crate::{Float, Scalar};

use super::Dense;

/// Matrix norm selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Norm {
    /// Square root of the sum of squared entries.
    Frobenius,
    /// Largest absolute column sum.
    One,
    /// Smallest absolute column sum.
    NegOne,
    /// Largest absolute row sum.
    Inf,
    /// Smallest absolute row sum.
    NegInf,
}

// ======================================================================
// Fallible element-wise arithmetic
// ======================================================================

impl<T: Scalar> Dense<T> {
    fn check_same_shape(&self, other: &Dense<T>) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(CoreError::DimensionMismatch {
                expected: self.shape(),
                got: other.shape(),
            });
        }
        Ok(())
    }

    fn zip_map(&self, other: &Dense<T>, f: impl Fn(T, T) -> T) -> Result<Dense<T>> {
        self.check_same_shape(other)?;
        let a = self.as_ref();
        let b = other.as_ref();
        Ok(Dense::from_fn(self.rows, self.cols, |r, c| {
            f(a.at(r, c), b.at(r, c))
        }))
    }

    fn zip_assign(&mut self, other: &Dense<T>, f: impl Fn(&mut T, T)) -> Result<()> {
        self.check_same_shape(other)?;
        let mut dst = self.as_mut();
        for (r, src) in other.as_ref().row_iter().enumerate() {
            for (d, &s) in dst.row_mut_unchecked(r).iter_mut().zip(src) {
                f(d, s);
            }
        }
        Ok(())
    }

    /// Element-wise sum `self + other`.
    ///
    /// ```
    /// # use densolve_core::dense::Dense;
    /// let a = Dense::from_rows(&[&[1, 2], &[3, 4]]).unwrap();
    /// assert_eq!(a.add(&a).unwrap().as_slice(), &[2, 4, 6, 8]);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn add(&self, other: &Dense<T>) -> Result<Dense<T>> {
        self.zip_map(other, |a, b| a + b)
    }

    /// Element-wise difference `self - other`.
    #[allow(clippy::should_implement_trait)]
    pub fn sub(&self, other: &Dense<T>) -> Result<Dense<T>> {
        self.zip_map(other, |a, b| a - b)
    }

    /// Element-wise (Hadamard) product.
    pub fn elemul(&self, other: &Dense<T>) -> Result<Dense<T>> {
        self.zip_map(other, |a, b| a * b)
    }

    /// `self += other`, element-wise.
    pub fn add_assign(&mut self, other: &Dense<T>) -> Result<()> {
        self.zip_assign(other, |a, b| *a += b)
    }

    /// `self -= other`, element-wise.
    pub fn sub_assign(&mut self, other: &Dense<T>) -> Result<()> {
        self.zip_assign(other, |a, b| *a -= b)
    }

    /// `self *= other`, element-wise.
    pub fn elemul_assign(&mut self, other: &Dense<T>) -> Result<()> {
        self.zip_assign(other, |a, b| *a *= b)
    }

    /// Matrix product `self * other`.
    ///
    /// ```
    /// # use densolve_core::dense::Dense;
    /// let a = Dense::from_rows(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]).unwrap();
    /// let b = Dense::from_rows(&[&[1.0, 2.0], &[3.0, 4.0], &[5.0, 6.0]]).unwrap();
    /// let c = a.matmul(&b).unwrap();
    /// assert_eq!(c.as_slice(), &[22.0, 28.0, 49.0, 64.0]);
    /// ```
    pub fn matmul(&self, other: &Dense<T>) -> Result<Dense<T>> {
        let mut out = Dense::zeros(self.rows, other.cols);
        kernel::gemm(T::one(), self.as_ref(), other.as_ref(), T::zero(), out.as_mut())?;
        Ok(out)
    }

    /// A new, compact matrix with rows and columns swapped.
    pub fn transpose(&self) -> Dense<T> {
        let src = self.as_ref();
        Dense::from_fn(self.cols, self.rows, |r, c| src.at(c, r))
    }

    /// A new matrix whose `(r, c)` entry is `f(r, c, self[r, c])`.
    ///
    /// ```
    /// # use densolve_core::dense::Dense;
    /// let a = Dense::from_rows(&[&[1, 2, 3], &[4, 5, 6]]).unwrap();
    /// let b = a.apply(|_, c, v| if c == 1 { v } else { 0 });
    /// assert_eq!(b.as_slice(), &[0, 2, 0, 0, 5, 0]);
    /// ```
    pub fn apply<F>(&self, mut f: F) -> Dense<T>
    where
        F: FnMut(usize, usize, T) -> T,
    {
        let src = self.as_ref();
        Dense::from_fn(self.rows, self.cols, |r, c| f(r, c, src.at(r, c)))
    }

    /// Replace every entry `v` at `(r, c)` with `f(r, c, v)`.
    pub fn apply_in_place<F>(&mut self, mut f: F)
    where
        F: FnMut(usize, usize, T) -> T,
    {
        let mut view = self.as_mut();
        for r in 0..view.nrows() {
            for (c, v) in view.row_mut_unchecked(r).iter_mut().enumerate() {
                *v = f(r, c, *v);
            }
        }
    }

    /// Smallest entry, or `None` for an empty matrix.
    pub fn min(&self) -> Option<T> {
        self.as_ref()
            .row_iter()
            .flatten()
            .copied()
            .reduce(|a, b| if b < a { b } else { a })
    }

    /// Largest entry, or `None` for an empty matrix.
    pub fn max(&self) -> Option<T> {
        self.as_ref()
            .row_iter()
            .flatten()
            .copied()
            .reduce(|a, b| if b > a { b } else { a })
    }
}

// ======================================================================
// Float-only queries
// ======================================================================

impl<T: Float> Dense<T> {
    /// The requested matrix norm. Empty matrices have norm zero.
    ///
    /// ```
    /// # use densolve_core::dense::{Dense, Norm};
    /// let a = Dense::from_rows(&[&[1.0, -2.0], &[3.0, 4.0]]).unwrap();
    /// assert_eq!(a.norm(Norm::One), 6.0);
    /// assert_eq!(a.norm(Norm::Inf), 7.0);
    /// ```
    pub fn norm(&self, kind: Norm) -> T {
        let view = self.as_ref();
        match kind {
            Norm::Frobenius => view
                .row_iter()
                .flatten()
                .fold(T::zero(), |acc, &v| acc + v * v)
                .sqrt(),
            Norm::One | Norm::NegOne => {
                let mut sums = vec![T::zero(); self.cols];
                for row in view.row_iter() {
                    for (s, &v) in sums.iter_mut().zip(row) {
                        *s += v.abs();
                    }
                }
                pick(sums.into_iter(), kind == Norm::One)
            }
            Norm::Inf | Norm::NegInf => pick(
                view.row_iter()
                    .map(|row| row.iter().fold(T::zero(), |acc, &v| acc + v.abs())),
                kind == Norm::Inf,
            ),
        }
    }

    /// Whether `other` has the same shape and every entry lies within
    /// `tol` of the matching entry of `self`. NaN entries never match.
    pub fn approx_eq(&self, other: &Dense<T>, tol: T) -> bool {
        self.shape() == other.shape()
            && self
                .as_ref()
                .row_iter()
                .zip(other.as_ref().row_iter())
                .all(|(a, b)| a.iter().zip(b).all(|(&x, &y)| (x - y).abs() <= tol))
    }
}

fn pick<T: Float>(sums: impl Iterator<Item = T>, largest: bool) -> T {
    sums.reduce(|a, b| if largest { a.max(b) } else { a.min(b) })
        .unwrap_or_else(T::zero)
}

// ======================================================================
// Operator overloads (panic on shape mismatch)
// ======================================================================

macro_rules! impl_dense_binop {
    ($trait:ident, $method:ident, $checked:ident) => {
        impl<T: Scalar> $trait for &Dense<T> {
            type Output = Dense<T>;

            fn $method(self, rhs: Self) -> Dense<T> {
                match Dense::$checked(self, rhs) {
                    Ok(out) => out,
                    Err(e) => panic!("{} failed: {e}", stringify!($method)),
                }
            }
        }
    };
}

impl_dense_binop!(Add, add, add);
impl_dense_binop!(Sub, sub, sub);
impl_dense_binop!(Mul, mul, matmul);

macro_rules! impl_scalar_binop {
    ($trait:ident, $method:ident, $op:tt) => {
        impl<T: Scalar> $trait<T> for &Dense<T> {
            type Output = Dense<T>;

            fn $method(self, rhs: T) -> Dense<T> {
                self.apply(|_, _, v| v $op rhs)
            }
        }
    };
}

impl_scalar_binop!(Mul, mul, *);
impl_scalar_binop!(Div, div, /);

impl<T: Float> Neg for &Dense<T> {
    type Output = Dense<T>;

    fn neg(self) -> Dense<T> {
        self.apply(|_, _, v| -v)
    }
}
