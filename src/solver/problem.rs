#![allow(non_snake_case)]
use super::ConfigurationError;
use crate::algebra::*;

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Quadratic objective `cᵀx + ½xᵀHx` over `n` variables.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
pub struct QuadraticProgram<T: FloatT = f64> {
    /// objective Hessian (n x n)
    pub H: Matrix<T>,
    /// objective linear term (length n)
    pub c: Vec<T>,
}

impl<T> QuadraticProgram<T>
where
    T: FloatT,
{
    pub fn new(H: Matrix<T>, c: Vec<T>) -> Result<Self, ConfigurationError> {
        let qp = Self { H, c };
        qp.check_dimensions()?;
        Ok(qp)
    }

    /// number of variables
    pub fn n(&self) -> usize {
        self.c.len()
    }

    pub(crate) fn check_dimensions(&self) -> Result<(), ConfigurationError> {
        let (rows, cols) = self.H.size();
        if rows != cols {
            return Err(ConfigurationError::HessianNotSquare { rows, cols });
        }
        if self.c.len() != rows {
            return Err(ConfigurationError::LinearTermLength {
                expected: rows,
                found: self.c.len(),
            });
        }
        Ok(())
    }

    /// Objective value `cᵀx + ½xᵀHx`
    pub fn objective(&self, x: &[T]) -> T {
        let mut hx = vec![T::zero(); self.n()];
        self.H.gemv(&NativeGemv, x, &mut hx, T::one(), T::zero());
        self.c.dot(x) + AsFloatT::<T>::as_T(&0.5) * hx.dot(x)
    }
}

/// Linear constraints `lower[i] <= A[i,:] x <= upper[i]`.
///
/// Equality constraints take `lower[i] == upper[i]`.  One-sided
/// constraints use an infinite (or at least
/// [infinite bound](crate::solver::QpsolSettings::infinite_bound)) value
/// for the missing side.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
pub struct LinearConstraints<T: FloatT = f64> {
    /// constraint matrix (nclin x n)
    pub A: Matrix<T>,
    pub lower: Vec<T>,
    pub upper: Vec<T>,
}

impl<T> LinearConstraints<T>
where
    T: FloatT,
{
    pub fn new(A: Matrix<T>, lower: Vec<T>, upper: Vec<T>) -> Result<Self, ConfigurationError> {
        let lc = Self { A, lower, upper };
        lc.check_bounds()?;
        Ok(lc)
    }

    /// An empty constraint set for a problem in `n` variables
    pub fn none(n: usize) -> Self {
        Self {
            A: Matrix::zeros((0, n)),
            lower: vec![],
            upper: vec![],
        }
    }

    /// number of linear constraints (nclin)
    pub fn size(&self) -> usize {
        self.A.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    fn check_bounds(&self) -> Result<(), ConfigurationError> {
        let nclin = self.size();
        for len in [self.lower.len(), self.upper.len()] {
            if len != nclin {
                return Err(ConfigurationError::ConstraintBoundsLength {
                    expected: nclin,
                    found: len,
                });
            }
        }
        Ok(())
    }

    pub(crate) fn check_dimensions(&self, n: usize) -> Result<(), ConfigurationError> {
        // an empty constraint set of any width is accepted
        if !self.is_empty() && self.A.ncols() != n {
            return Err(ConfigurationError::ConstraintColumns {
                expected: n,
                found: self.A.ncols(),
            });
        }
        self.check_bounds()
    }
}

/// Simple bounds `lower[j] <= x[j] <= upper[j]` on every variable.
///
/// An empty bound set is equivalent to passing no bounds at all.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
pub struct Bounds<T: FloatT = f64> {
    pub lower: Vec<T>,
    pub upper: Vec<T>,
}

impl<T> Bounds<T>
where
    T: FloatT,
{
    pub fn new(lower: Vec<T>, upper: Vec<T>) -> Result<Self, ConfigurationError> {
        if lower.len() != upper.len() {
            return Err(ConfigurationError::BoundsLength {
                expected: lower.len(),
                found: upper.len(),
            });
        }
        Ok(Self { lower, upper })
    }

    /// number of bounded variables.  Zero means "no bounds supplied".
    pub fn size(&self) -> usize {
        self.lower.len()
    }

    pub(crate) fn check_dimensions(&self, n: usize) -> Result<(), ConfigurationError> {
        if self.size() == 0 && self.upper.is_empty() {
            return Ok(());
        }
        for len in [self.lower.len(), self.upper.len()] {
            if len != n {
                return Err(ConfigurationError::BoundsLength {
                    expected: n,
                    found: len,
                });
            }
        }
        Ok(())
    }
}

/// Checks every dimension of the problem data against the number of
/// variables implied by the linear term.
pub(crate) fn check_problem_dimensions<T: FloatT>(
    problem: &QuadraticProgram<T>,
    constraints: &LinearConstraints<T>,
    bounds: Option<&Bounds<T>>,
    x: &[T],
) -> Result<(), ConfigurationError> {
    problem.check_dimensions()?;
    let n = problem.n();
    if x.len() != n {
        return Err(ConfigurationError::InitialPointLength {
            expected: n,
            found: x.len(),
        });
    }
    constraints.check_dimensions(n)?;
    if let Some(bounds) = bounds {
        bounds.check_dimensions(n)?;
    }
    Ok(())
}
