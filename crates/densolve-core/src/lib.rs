//! `densolve-core`: dense matrices, factorizations and linear solves.
//!
//! Provides row-major matrix storage with explicit row stride, borrowed
//! sub-matrix views, elementary kernels, Cholesky and LU factorizations,
//! and a Householder least-squares solver.
//!
//! # Design
//!
//! - [`Dense`] owns its buffer; [`DenseRef`] / [`DenseMut`] borrow a
//!   window of one, so sub-matrix operations never copy.
//! - Generic over element types via the [`Scalar`] / [`Float`] trait
//!   hierarchy; anything that divides or takes square roots needs `Float`.
//! - Every fallible operation returns [`Result`] and checks shapes before
//!   writing anything.
//! - Diagnostics go through the [`log`] facade; no logger is installed.
//!
//! ```
//! use densolve_core::prelude::*;
//!
//! let a = Dense::from_rows(&[&[4.0, 1.0], &[1.0, 3.0]]).unwrap();
//! let b = Dense::from_rows(&[&[1.0], &[2.0]]).unwrap();
//!
//! let chol = Cholesky::new(&a).unwrap();
//! let x = chol.solve(&b).unwrap();
//! assert!(a.matmul(&x).unwrap().approx_eq(&b, 1e-12));
//!
//! let y = solve(&a, &b).unwrap();
//! assert!(x.approx_eq(&y, 1e-12));
//! ```

pub mod decomp;
pub mod dense;
pub mod dtype;
pub mod error;
pub mod kernel;
pub mod solve;

// Re-export key types at crate root for convenience.
pub use decomp::{Cholesky, Llt, Lu};
pub use dense::{Dense, DenseMut, DenseRef, Norm};
pub use dtype::{Float, Scalar};
pub use error::{CoreError, Result};
pub use solve::solve;

/// Items intended for glob-import: `use densolve_core::prelude::*;`
pub mod prelude {
    pub use crate::decomp::{Cholesky, Llt, Lu};
    pub use crate::dense::{Dense, DenseMut, DenseRef, Norm};
    pub use crate::dtype::{Float, Scalar};
    pub use crate::error::{CoreError, Result};
    pub use crate::solve::solve;
}
