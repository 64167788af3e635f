use super::SettingsError;
use thiserror::Error;

/// Error type returned when problem data have inconsistent dimensions.
/// These are always detected before any buffer is handed to the
/// external routine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Hessian must be square, found {rows}x{cols}")]
    HessianNotSquare { rows: usize, cols: usize },
    #[error("linear term has length {found}, expected {expected}")]
    LinearTermLength { expected: usize, found: usize },
    #[error("initial point has length {found}, expected {expected}")]
    InitialPointLength { expected: usize, found: usize },
    #[error("constraint rows have length {found}, expected {expected}")]
    ConstraintColumns { expected: usize, found: usize },
    #[error("constraint bounds have length {found}, expected {expected}")]
    ConstraintBoundsLength { expected: usize, found: usize },
    #[error("variable bounds have length {found}, expected {expected}")]
    BoundsLength { expected: usize, found: usize },
    #[error("problem dimension {0} exceeds the routine's integer range")]
    DimensionOverflow(usize),
}

/// Error type returned when a scratch buffer cannot be reserved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unable to allocate {len} elements for the \"{buffer}\" buffer")]
pub struct AllocationError {
    pub buffer: &'static str,
    pub len: usize,
}

/// Error type returned by [`minimize`](crate::solver::minimize).
///
/// Termination of the routine itself (infeasible, unbounded, iteration
/// limit...) is never an error.  It is reported through
/// [`QpsolResult::inform`](crate::solver::QpsolResult).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QpsolError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Allocation(#[from] AllocationError),
}
