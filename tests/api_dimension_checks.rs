#![allow(non_snake_case)]
use qpbridge::{algebra::*, solver::*};

// a collection of tests to ensure that data of
// incompatible dimension won't be accepted

// counts invocations; any call here is a failure of the checks
#[derive(Default)]
struct CountingRoutine {
    calls: usize,
}

impl DenseQpRoutine<f64> for CountingRoutine {
    fn qpsol(&mut self, _call: QpsolCall<'_, f64>) -> QpsolOutput<f64> {
        self.calls += 1;
        QpsolOutput {
            inform: 0,
            iter: 0,
            objf: 0.,
        }
    }
}

fn api_dim_check_data() -> (QuadraticProgram<f64>, LinearConstraints<f64>, Bounds<f64>) {
    let qp = QuadraticProgram::new(Matrix::identity(4), vec![0.; 4]).unwrap();
    let lc = LinearConstraints::new(Matrix::zeros((3, 4)), vec![0.; 3], vec![1.; 3]).unwrap();
    let bnds = Bounds::new(vec![-1.; 4], vec![1.; 4]).unwrap();
    (qp, lc, bnds)
}

fn try_minimize(
    qp: &QuadraticProgram<f64>,
    lc: &LinearConstraints<f64>,
    bnds: Option<&Bounds<f64>>,
    x: &mut [f64],
) -> (Result<QpsolResult<f64>, QpsolError>, usize) {
    let mut routine = CountingRoutine::default();
    let result = minimize(&mut routine, qp, lc, bnds, &QpsolSettings::default(), x);
    (result, routine.calls)
}

#[test]
fn api_dim_check_working() {
    // This example should work because dimensions are
    // all compatible.  All following checks vary one
    // of these sizes to test dimension checks
    let (qp, lc, bnds) = api_dim_check_data();
    let mut x = vec![0.; 4];
    let (result, calls) = try_minimize(&qp, &lc, Some(&bnds), &mut x);

    assert!(result.is_ok());
    assert_eq!(calls, 1);
    assert_eq!(result.unwrap().multipliers.len(), 7);
}

#[test]
fn api_dim_check_bad_H() {
    let (mut qp, lc, bnds) = api_dim_check_data();
    qp.H = Matrix::identity(3);
    let mut x = vec![0.; 4];
    let (result, calls) = try_minimize(&qp, &lc, Some(&bnds), &mut x);

    assert_eq!(calls, 0);
    assert!(matches!(
        result,
        Err(QpsolError::Configuration(
            ConfigurationError::LinearTermLength { .. }
        ))
    ));
}

#[test]
fn api_dim_check_nonsquare_H() {
    let (mut qp, lc, bnds) = api_dim_check_data();
    qp.H = Matrix::zeros((4, 3));
    let mut x = vec![0.; 4];
    let (result, calls) = try_minimize(&qp, &lc, Some(&bnds), &mut x);

    assert_eq!(calls, 0);
    assert_eq!(
        result.unwrap_err(),
        QpsolError::Configuration(ConfigurationError::HessianNotSquare { rows: 4, cols: 3 })
    );
}

#[test]
fn api_dim_check_bad_A_cols() {
    let (qp, mut lc, bnds) = api_dim_check_data();
    lc.A = Matrix::zeros((3, 5));
    let mut x = vec![0.; 4];
    let (result, calls) = try_minimize(&qp, &lc, Some(&bnds), &mut x);

    assert_eq!(calls, 0);
    assert!(matches!(
        result,
        Err(QpsolError::Configuration(
            ConfigurationError::ConstraintColumns { .. }
        ))
    ));
}

#[test]
fn api_dim_check_bad_constraint_bounds() {
    let (qp, mut lc, bnds) = api_dim_check_data();
    lc.upper.pop();
    let mut x = vec![0.; 4];
    let (result, calls) = try_minimize(&qp, &lc, Some(&bnds), &mut x);

    assert_eq!(calls, 0);
    assert!(matches!(
        result,
        Err(QpsolError::Configuration(
            ConfigurationError::ConstraintBoundsLength { .. }
        ))
    ));
}

#[test]
fn api_dim_check_bad_bounds() {
    let (qp, lc, _) = api_dim_check_data();
    let bnds = Bounds::new(vec![-1.; 3], vec![1.; 3]).unwrap();
    let mut x = vec![0.; 4];
    let (result, calls) = try_minimize(&qp, &lc, Some(&bnds), &mut x);

    assert_eq!(calls, 0);
    assert!(matches!(
        result,
        Err(QpsolError::Configuration(ConfigurationError::BoundsLength { .. }))
    ));
}

#[test]
fn api_dim_check_bad_x() {
    let (qp, lc, bnds) = api_dim_check_data();
    let mut x = vec![0.; 5];
    let (result, calls) = try_minimize(&qp, &lc, Some(&bnds), &mut x);

    assert_eq!(calls, 0);
    assert!(matches!(
        result,
        Err(QpsolError::Configuration(
            ConfigurationError::InitialPointLength { .. }
        ))
    ));
}

#[test]
fn api_dim_check_empty_bounds() {
    // an empty bound set means "no bounds"
    let (qp, lc, _) = api_dim_check_data();
    let bnds = Bounds::new(vec![], vec![]).unwrap();
    let mut x = vec![0.; 4];
    let (result, calls) = try_minimize(&qp, &lc, Some(&bnds), &mut x);

    assert!(result.is_ok());
    assert_eq!(calls, 1);
}

#[test]
fn api_dim_check_no_constraints() {
    let (qp, _, bnds) = api_dim_check_data();
    let lc = LinearConstraints::none(4);
    let mut x = vec![0.; 4];
    let (result, calls) = try_minimize(&qp, &lc, Some(&bnds), &mut x);

    assert_eq!(calls, 1);
    assert_eq!(result.unwrap().multipliers.len(), 4);
}
