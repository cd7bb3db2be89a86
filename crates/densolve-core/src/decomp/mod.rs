//! Matrix decompositions.
//!
//! | Decomposition | Module        | Factorization |
//! |---------------|---------------|---------------|
//! | Cholesky      | [`cholesky`]  | `A = L L^T`   |
//! | LU            | [`lu`]        | `PA = LU`     |

pub mod cholesky;
pub mod lu;

pub use cholesky::{Cholesky, Llt};
pub use lu::Lu;
