#![allow(non_snake_case)]

use qpbridge::{algebra::*, solver::*};

fn eq_constrained_A1() -> LinearConstraints<f64> {
    // A = [1. 1. 1.], b = 3
    LinearConstraints::new(Matrix::from(&[[1., 1., 1.]]), vec![3.], vec![3.]).unwrap()
}

fn eq_constrained_A2() -> LinearConstraints<f64> {
    // A =
    //[ 1. 1.  0.;
    //  0. 1. -1.]
    // b = [1., 0.]
    let A = Matrix::from(&[[1., 1., 0.], [0., 1., -1.]]);
    LinearConstraints::new(A, vec![1., 0.], vec![1., 0.]).unwrap()
}

fn eq_constrained_qp() -> QuadraticProgram<f64> {
    QuadraticProgram::new(Matrix::identity(3), vec![0.; 3]).unwrap()
}

fn solve(lc: &LinearConstraints<f64>, x: &mut [f64]) -> QpsolResult<f64> {
    let qp = eq_constrained_qp();
    minimize(
        &mut NativeQpsol::new(),
        &qp,
        lc,
        None,
        &QpsolSettings::default(),
        x,
    )
    .unwrap()
}

#[test]
fn test_eq_constrained_feasible() {
    let lc = eq_constrained_A1();
    let mut x = vec![0.; 3];
    let result = solve(&lc, &mut x);

    assert_eq!(result.status(), QpsolInform::Optimal);
    assert!(x.dist(&[1., 1., 1.]) <= 1e-8);
    assert!((result.objf - 1.5).abs() <= 1e-8);
    assert_eq!(result.istate, [0, 0, 0, istate::EQUALITY]);
    assert!((result.constraint_multipliers()[0] - 1.).abs() <= 1e-8);
    assert!(result.bound_multipliers().norm_inf() == 0.);
}

#[test]
fn test_eq_constrained_two_rows() {
    let lc = eq_constrained_A2();
    let mut x = vec![0.; 3];
    let result = solve(&lc, &mut x);

    let refsol = [2. / 3., 1. / 3., 1. / 3.];
    assert_eq!(result.status(), QpsolInform::Optimal);
    assert!(x.dist(&refsol) <= 1e-8);
    assert_eq!(result.istate[3..], [istate::EQUALITY; 2]);

    // both rows stay in the working set, whatever their sign
    let λ = result.constraint_multipliers();
    assert!((λ[0] - 2. / 3.).abs() <= 1e-8);
    assert!((λ[1] + 1. / 3.).abs() <= 1e-8);
}

#[test]
fn test_eq_constrained_infeasible() {
    // x0 + x1 = 1 and x0 + x1 = 2
    let A = Matrix::from(&[[1., 1., 0.], [1., 1., 0.]]);
    let lc = LinearConstraints::new(A, vec![1., 2.], vec![1., 2.]).unwrap();
    let mut x = vec![0.; 3];
    let result = solve(&lc, &mut x);

    assert_eq!(result.status(), QpsolInform::Infeasible);
    assert_eq!(result.multipliers.len(), 5);
}

#[test]
fn test_eq_constrained_fixed_variable() {
    // a simple bound with lower == upper fixes the variable
    let qp = QuadraticProgram::<f64>::new(Matrix::identity(2), vec![-1., -1.]).unwrap();
    let lc = LinearConstraints::none(2);
    let bnds = Bounds::new(vec![-1e30, 3.], vec![1e30, 3.]).unwrap();
    let mut x = vec![0.; 2];
    let result = minimize(
        &mut NativeQpsol::new(),
        &qp,
        &lc,
        Some(&bnds),
        &QpsolSettings::default(),
        &mut x,
    )
    .unwrap();

    assert_eq!(result.status(), QpsolInform::Optimal);
    assert!(x.dist(&[1., 3.]) <= 1e-10);
    assert_eq!(result.istate, [0, istate::EQUALITY]);
    assert!((result.multipliers[1] - 2.).abs() <= 1e-10);
}
