use super::HessianProduct;
use crate::algebra::FloatT;

/// Arguments of a single call to a QPSOL routine.
///
/// Field names and order follow the FORTRAN interface
///
/// ```text
/// QPSOL( ITMAX, MSGLVL, N, NCLIN, NCTOTL, NROWA, NROWH, NCOLH,
///        BIGBND, A, BL, BU, CVEC, FEATOL, HESS, QPHESS,
///        COLD, LP, ORTHOG, ISTATE, X,
///        INFORM, ITER, OBJ, CLAMDA, IW, LENIW, W, LENW )
/// ```
///
/// with the three scalar outputs `INFORM`, `ITER` and `OBJ` returned
/// separately as a [`QpsolOutput`](QpsolOutput).  All arrays are column
/// major.  Every slice is sized by the caller according to the routine's
/// documented requirements.
pub struct QpsolCall<'a, T> {
    pub itmax: i32,
    pub msglvl: i32,
    pub n: i32,
    pub nclin: i32,
    pub nctotl: i32,
    pub nrowa: i32,
    pub nrowh: i32,
    pub ncolh: i32,
    pub bigbnd: T,
    /// constraint matrix, `nrowa x n`.  Empty when `nclin == 0`.
    pub a: &'a [T],
    pub bl: &'a [T],
    pub bu: &'a [T],
    pub cvec: &'a [T],
    pub featol: &'a [T],
    pub hess: &'a [T],
    pub qphess: &'a dyn HessianProduct<T>,
    pub cold: bool,
    pub lp: bool,
    pub orthog: bool,
    pub istate: &'a mut [i32],
    /// initial point on entry, final point on exit
    pub x: &'a mut [T],
    pub clamda: &'a mut [T],
    pub iw: &'a mut [i32],
    pub leniw: i32,
    pub w: &'a mut [T],
    pub lenw: i32,
}

/// Scalar outputs of a QPSOL call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QpsolOutput<T> {
    pub inform: i32,
    pub iter: i32,
    pub objf: T,
}

/// An implementation of the QPSOL dense quadratic programming routine.
///
/// The adapter calls [`qpsol`](DenseQpRoutine::qpsol) exactly once per
/// solve and never interprets the returned status.
///
/// Implementations are free to keep state between calls.  When an
/// implementation wraps a library that is not reentrant (e.g. FORTRAN
/// code using `SAVE` or `COMMON` storage), it is the caller's
/// responsibility to serialise calls across threads.
pub trait DenseQpRoutine<T: FloatT> {
    fn qpsol(&mut self, call: QpsolCall<'_, T>) -> QpsolOutput<T>;
}

impl<T, R> DenseQpRoutine<T> for &mut R
where
    T: FloatT,
    R: DenseQpRoutine<T> + ?Sized,
{
    fn qpsol(&mut self, call: QpsolCall<'_, T>) -> QpsolOutput<T> {
        (**self).qpsol(call)
    }
}

impl<T, R> DenseQpRoutine<T> for Box<R>
where
    T: FloatT,
    R: DenseQpRoutine<T> + ?Sized,
{
    fn qpsol(&mut self, call: QpsolCall<'_, T>) -> QpsolOutput<T> {
        (**self).qpsol(call)
    }
}

// ---------------------------------
// termination codes
// ---------------------------------

/// Typed view of the QPSOL `inform` termination code.
///
/// The adapter returns the raw code.  This enum is provided for callers
/// that want to branch on it.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum QpsolInform {
    /// `0` : strong local minimum found
    Optimal,
    /// `1` : weak minimum found (solution not unique)
    WeakMinimum,
    /// `2` : solution is unbounded
    Unbounded,
    /// `3` : constraints cannot be satisfied
    Infeasible,
    /// `4` : iteration limit reached
    IterationLimit,
    /// `5` : no change in `x` over many iterations (possible cycling)
    NoProgress,
    /// `6` : an input parameter or workspace length is invalid
    InvalidInput,
    /// any other value
    Unknown(i32),
}

impl From<i32> for QpsolInform {
    fn from(inform: i32) -> Self {
        match inform {
            0 => QpsolInform::Optimal,
            1 => QpsolInform::WeakMinimum,
            2 => QpsolInform::Unbounded,
            3 => QpsolInform::Infeasible,
            4 => QpsolInform::IterationLimit,
            5 => QpsolInform::NoProgress,
            6 => QpsolInform::InvalidInput,
            code => QpsolInform::Unknown(code),
        }
    }
}

impl From<QpsolInform> for i32 {
    fn from(inform: QpsolInform) -> Self {
        match inform {
            QpsolInform::Optimal => 0,
            QpsolInform::WeakMinimum => 1,
            QpsolInform::Unbounded => 2,
            QpsolInform::Infeasible => 3,
            QpsolInform::IterationLimit => 4,
            QpsolInform::NoProgress => 5,
            QpsolInform::InvalidInput => 6,
            QpsolInform::Unknown(code) => code,
        }
    }
}

impl QpsolInform {
    /// true for the two codes that carry a usable minimizer
    pub fn is_solved(&self) -> bool {
        matches!(self, QpsolInform::Optimal | QpsolInform::WeakMinimum)
    }
}

impl std::fmt::Display for QpsolInform {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            QpsolInform::Unknown(code) => write!(f, "Unknown({})", code),
            _ => write!(f, "{:?}", self),
        }
    }
}

/// Working set state reported in `istate` for each bound and constraint
pub mod istate {
    /// not in the working set
    pub const FREE: i32 = 0;
    /// active at its lower bound
    pub const AT_LOWER: i32 = 1;
    /// active at its upper bound
    pub const AT_UPPER: i32 = 2;
    /// equality (`bl == bu`)
    pub const EQUALITY: i32 = 3;
}

#[test]
fn test_inform_codes() {
    for code in -1..9 {
        let inform = QpsolInform::from(code);
        assert_eq!(i32::from(inform), code);
    }
    assert!(QpsolInform::from(0).is_solved());
    assert!(QpsolInform::from(1).is_solved());
    assert!(!QpsolInform::from(3).is_solved());
    assert_eq!(QpsolInform::from(42), QpsolInform::Unknown(42));
    assert_eq!(QpsolInform::from(4).to_string(), "IterationLimit");
}
