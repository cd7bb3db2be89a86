//! # Densolve
//!
//! Dense real matrices with Cholesky and LU factorizations and a
//! Householder least-squares solver.
//!
//! One `use densolve::prelude::*;` gives you the matrix type, its views,
//! the factorizations and the general solver.
//!
//! ```
//! use densolve::prelude::*;
//!
//! let a = Dense::from_rows(&[&[2.0, 0.0], &[0.0, 4.0], &[0.0, 0.0]]).unwrap();
//! let b = Dense::from_rows(&[&[2.0], &[8.0], &[5.0]]).unwrap();
//! let x = solve(&a, &b).unwrap();
//! assert!(x.approx_eq(&Dense::from_rows(&[&[1.0], &[2.0]]).unwrap(), 1e-12));
//! ```

pub use densolve_core as core;

/// Glob-import convenience: `use densolve::prelude::*;`
pub mod prelude {
    pub use densolve_core::prelude::*;
}
