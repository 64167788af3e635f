//! __qpbridge__ solves dense, linearly constrained quadratic programs of the form
//!
//! $$
//! \begin{array}{rl}
//! \text{minimize} & c^T x + \frac{1}{2}x^T H x\\\\\[2ex\]
//!  \text{subject to} & l \le A x \le u \\\\\[1ex\]
//!         & l_x \le x \le u_x
//!  \end{array}
//! $$
//!
//! by marshalling them into the calling convention of the QPSOL dense
//! quadratic programming routine, calling that routine once, and collecting
//! the optimal point, objective value, Lagrange multipliers and termination
//! code.
//!
//! The routine itself is abstracted by the
//! [`DenseQpRoutine`](crate::solver::DenseQpRoutine) trait.  A pure Rust
//! implementation ([`NativeQpsol`](crate::solver::NativeQpsol)) is always
//! available.  With the "fortran" feature the crate also binds to the legacy
//! FORTRAN `qpsol_` symbol.
//!
//! ```
//! use qpbridge::algebra::*;
//! use qpbridge::solver::*;
//!
//! let H = Matrix::from(&[[2., 0.], [0., 2.]]);
//! let qp = QuadraticProgram::<f64>::new(H, vec![-2., -5.]).unwrap();
//! let lc = LinearConstraints::none(2);
//! let bounds = Bounds::new(vec![0., 0.], vec![1., 1.]).unwrap();
//!
//! let mut x = vec![0.; 2];
//! let result = minimize(
//!     &mut NativeQpsol::new(),
//!     &qp,
//!     &lc,
//!     Some(&bounds),
//!     &QpsolSettings::default(),
//!     &mut x,
//! )
//! .unwrap();
//!
//! assert_eq!(result.status(), QpsolInform::Optimal);
//! assert!((x[1] - 1.).abs() < 1e-10);
//! ```
//!
//! ## Features
//!
//! * __serde__ (default): save and load problems as JSON.
//! * __blas__: compute Hessian-vector products with BLAS `?gemv`.
//! * __fortran__: link against the FORTRAN QPSOL library.
//!
//! # License
//!
//! Licensed under Apache License, Version 2.0.

//Rust hates greek characters
#![allow(confusable_idents)]

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod algebra;
pub mod io;
pub mod solver;

