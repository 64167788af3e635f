#![allow(non_snake_case)]
use crate::algebra::*;

/// Hessian-vector product callback handed to the QPSOL routine.
///
/// Mirrors the `qphess` subroutine of the FORTRAN interface:
/// - `jthcol > 0` : `hx` is set to column `jthcol` (1-based) of the
///    Hessian and `x` is not referenced.
/// - `jthcol <= 0` : `hx` is set to the product `Hx`.
pub trait HessianProduct<T> {
    /// order of the Hessian
    fn n(&self) -> usize;

    fn qphess(&self, jthcol: i32, x: &[T], hx: &mut [T]);
}

/// Callback context for a dense Hessian.  Carries only the Hessian
/// itself and the multiply engine used for full products.
#[derive(Debug)]
pub struct DenseHessian<'a, T, G = NativeGemv> {
    H: &'a Matrix<T>,
    gemv: G,
}

impl<'a, T> DenseHessian<'a, T, NativeGemv>
where
    T: FloatT,
{
    pub fn new(H: &'a Matrix<T>) -> Self {
        Self::with_engine(H, NativeGemv)
    }
}

impl<'a, T, G> DenseHessian<'a, T, G>
where
    T: FloatT,
    G: MultiplyGEMV<T>,
{
    pub fn with_engine(H: &'a Matrix<T>, gemv: G) -> Self {
        assert!(H.is_square());
        Self { H, gemv }
    }
}

impl<T, G> HessianProduct<T> for DenseHessian<'_, T, G>
where
    T: FloatT,
    G: MultiplyGEMV<T>,
{
    fn n(&self) -> usize {
        self.H.ncols()
    }

    fn qphess(&self, jthcol: i32, x: &[T], hx: &mut [T]) {
        if jthcol > 0 {
            let col = (jthcol - 1) as usize;
            hx.copy_from(self.H.col_slice(col));
        } else {
            self.H.gemv(&self.gemv, x, hx, T::one(), T::zero());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_hessian() -> Matrix<f64> {
        Matrix::from(&[[4., 1., 0.], [1., 2., -1.], [0., -1., 3.]])
    }

    #[test]
    fn test_qphess_column() {
        let H = test_hessian();
        let hess = DenseHessian::new(&H);
        let mut hx = vec![0.; 3];

        // x is never read when a column is requested
        let x = vec![f64::NAN; 3];
        for j in 1..=3 {
            hess.qphess(j, &x, &mut hx);
            assert_eq!(hx, H.col_slice((j - 1) as usize));
        }
    }

    #[test]
    fn test_qphess_product() {
        let H = test_hessian();
        let hess = DenseHessian::new(&H);
        let x = vec![1., 2., 3.];

        // stale contents of hx must not be accumulated
        let mut hx = vec![100.; 3];
        hess.qphess(0, &x, &mut hx);
        assert_eq!(hx, [6., 2., 7.]);

        let mut hx2 = vec![-5.; 3];
        hess.qphess(-3, &x, &mut hx2);
        assert_eq!(hx, hx2);

        let mut y = vec![0.; 3];
        H.gemv(&NativeGemv, &x, &mut y, 1.0, 0.0);
        assert_eq!(hx, y);
    }
}
