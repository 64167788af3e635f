use super::QpsolInform;
use crate::algebra::*;

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Outcome of a single [`minimize`](crate::solver::minimize) call.
///
/// All fields are reported exactly as the routine returned them.  In
/// particular a nonzero `inform` is not an error, and `x` and `objf` hold
/// whatever point the routine stopped at.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
pub struct QpsolResult<T: FloatT = f64> {
    /// final point (also written back to the caller's initial point)
    pub x: Vec<T>,
    /// objective value at `x`
    pub objf: T,
    /// Lagrange multipliers, variable bounds first then linear constraints
    pub multipliers: Vec<T>,
    /// raw termination code of the routine
    pub inform: i32,
    /// iterations performed by the routine
    pub iter: i32,
    /// final working set state of each bound and constraint
    pub istate: Vec<i32>,
    /// wall-clock time spent in the routine, in seconds
    pub solve_time: f64,
}

impl<T> QpsolResult<T>
where
    T: FloatT,
{
    /// typed view of [`inform`](QpsolResult::inform)
    pub fn status(&self) -> QpsolInform {
        QpsolInform::from(self.inform)
    }

    /// multipliers of the simple bounds
    pub fn bound_multipliers(&self) -> &[T] {
        &self.multipliers[..self.x.len()]
    }

    /// multipliers of the general linear constraints
    pub fn constraint_multipliers(&self) -> &[T] {
        &self.multipliers[self.x.len()..]
    }
}

#[test]
fn test_multiplier_views() {
    let result = QpsolResult {
        x: vec![0.5, 0.5],
        objf: -0.75,
        multipliers: vec![0., 0., -0.5],
        inform: 0,
        iter: 1,
        istate: vec![0, 0, 2],
        solve_time: 0.,
    };
    assert_eq!(result.status(), QpsolInform::Optimal);
    assert_eq!(result.bound_multipliers(), [0., 0.]);
    assert_eq!(result.constraint_multipliers(), [-0.5]);
}
