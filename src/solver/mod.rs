//! Dense quadratic programming through the QPSOL calling convention.
//!
//! The main entry points are the [`QpsolAdapter`](QpsolAdapter) and the
//! one-shot free function [`minimize`](minimize).  Both marshal a
//! [`QuadraticProgram`](QuadraticProgram) with its
//! [`LinearConstraints`](LinearConstraints) and optional
//! [`Bounds`](Bounds) into the flat buffers expected by a
//! [`DenseQpRoutine`](DenseQpRoutine), call the routine exactly once and
//! collect a [`QpsolResult`](QpsolResult).
//!
//! Two routines are provided :
//!
//! - [`NativeQpsol`](NativeQpsol), a pure Rust dual active-set method for
//!   strictly convex problems.
//! - `FortranQpsol`, a binding to the legacy FORTRAN library.  Requires the
//!   "fortran" feature.

mod adapter;
mod error_types;
mod hessian;
pub mod marshal;
mod native;
mod problem;
mod result;
mod routine;
mod settings;

pub use adapter::*;
pub use error_types::*;
pub use hessian::*;
pub use marshal::{workspace_lengths, QpsolWorkspace};
pub use native::*;
pub use problem::*;
pub use result::*;
pub use routine::*;
pub use settings::*;

cfg_if::cfg_if! {
    if #[cfg(feature = "serde")] {
        mod json;
        pub use json::*;
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "fortran")] {
        mod ffi;
        pub use ffi::*;
    }
}
