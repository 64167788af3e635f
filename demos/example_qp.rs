#![allow(non_snake_case)]
use qpbridge::algebra::*;
use qpbridge::solver::*;

fn main() {
    // QP Example

    // let H = Matrix::identity(2);    // For H = I

    let H = Matrix::from(&[
        [6., 0.], //
        [0., 4.], //
    ]);

    let c = vec![-1., -4.];

    // x0 - 2 x1 = 0
    let A = Matrix::from(&[[1., -2.]]);
    let lc = LinearConstraints::new(A, vec![0.], vec![0.]).unwrap();

    let bounds = Bounds::new(vec![-1.; 2], vec![1.; 2]).unwrap();

    let qp = QuadraticProgram::new(H, c).unwrap();

    let settings = QpsolSettingsBuilder::default()
        .print_level(1)
        .build()
        .unwrap();

    let mut adapter = QpsolAdapter::new(NativeQpsol::new(), settings);

    let mut x = vec![0.; 2];
    let result = adapter.minimize(&qp, &lc, Some(&bounds), &mut x).unwrap();

    println!("Solution = {:?}", result.x);
    println!("Multipliers = {:?}", result.multipliers);
}
