//! Dense linear algebra used by the marshalling layer and the native routine.
//!
//! Matrices are stored in column major format, matching the layout
//! expected by the FORTRAN calling convention.  Matrix-vector products go
//! through the [`MultiplyGEMV`](MultiplyGEMV) capability so that a BLAS
//! backed engine can be substituted when the "blas" feature is enabled.

mod dense;
mod floats;
mod math_traits;
mod vecmath;

pub use dense::*;
pub use floats::*;
pub use math_traits::*;
