#![allow(non_snake_case)]

use crate::algebra::{FloatT, Matrix, MatrixShape, ShapedMatrix, VectorMath};

/// General dense matrix-vector multiply capability, with the
/// semantics of the BLAS `?gemv` routine :
///
/// `y = α op(A) x + β y`
///
/// where `A` is an `m x n` column major matrix with leading dimension
/// `lda`.  When `β == 0`, `y` is not read on input.
pub trait MultiplyGEMV<T> {
    #[allow(clippy::too_many_arguments)]
    fn xgemv(
        &self,
        trans: MatrixShape,
        m: usize,
        n: usize,
        α: T,
        a: &[T],
        lda: usize,
        x: &[T],
        β: T,
        y: &mut [T],
    );
}

/// Pure Rust implementation of [`MultiplyGEMV`](MultiplyGEMV)
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeGemv;

impl<T> MultiplyGEMV<T> for NativeGemv
where
    T: FloatT,
{
    fn xgemv(
        &self,
        trans: MatrixShape,
        m: usize,
        n: usize,
        α: T,
        a: &[T],
        lda: usize,
        x: &[T],
        β: T,
        y: &mut [T],
    ) {
        check_gemv_dims(trans, m, n, a, lda, x, y);

        if β == T::zero() {
            y.set(T::zero());
        } else if β != T::one() {
            y.scale(β);
        }
        if α == T::zero() {
            return;
        }

        match trans {
            MatrixShape::N => {
                for (j, &xj) in x.iter().enumerate() {
                    let col = &a[(j * lda)..(j * lda + m)];
                    y.axpby(α * xj, col, T::one());
                }
            }
            MatrixShape::T => {
                for (j, yj) in y.iter_mut().enumerate() {
                    let col = &a[(j * lda)..(j * lda + m)];
                    *yj += α * col.dot(x);
                }
            }
        }
    }
}

pub(crate) fn check_gemv_dims<T>(
    trans: MatrixShape,
    m: usize,
    n: usize,
    a: &[T],
    lda: usize,
    x: &[T],
    y: &[T],
) {
    match trans {
        MatrixShape::N => {
            assert!(n == x.len() && m == y.len());
        }
        MatrixShape::T => {
            assert!(m == x.len() && n == y.len());
        }
    }
    assert!(lda >= usize::max(m, 1));
    assert!(n == 0 || a.len() >= lda * (n - 1) + m);
}

impl<T> Matrix<T>
where
    T: FloatT,
{
    /// `y = αAx + βy` using the multiply engine `engine`
    pub fn gemv<G>(&self, engine: &G, x: &[T], y: &mut [T], α: T, β: T)
    where
        G: MultiplyGEMV<T> + ?Sized,
    {
        let (m, n) = self.size();
        engine.xgemv(MatrixShape::N, m, n, α, &self.data, usize::max(m, 1), x, β, y);
    }

    /// `y = αA'x + βy` using the multiply engine `engine`
    pub fn gemv_t<G>(&self, engine: &G, x: &[T], y: &mut [T], α: T, β: T)
    where
        G: MultiplyGEMV<T> + ?Sized,
    {
        let (m, n) = self.size();
        engine.xgemv(MatrixShape::T, m, n, α, &self.data, usize::max(m, 1), x, β, y);
    }
}

#[test]
fn test_gemv() {
    #[rustfmt::skip]
    let A = Matrix::from(
        &[[ 1.,  2., 3.],
          [ 4.,  5., 6.]]);

    let x = vec![1., 2., 3.];
    let mut y = vec![-1., -2.];
    A.gemv(&NativeGemv, &x, &mut y, 2.0, 3.0);
    assert!(y == [25.0, 58.0]);

    let x = vec![1., 2.];
    let mut y = vec![-1., -2., -3.];
    A.gemv_t(&NativeGemv, &x, &mut y, 2.0, 3.0);
    assert!(y == [15.0, 18.0, 21.0]);
}

#[test]
fn test_gemv_beta_zero_ignores_y() {
    let A = Matrix::from(&[[1., 0.], [0., 2.]]);
    let x = vec![3., 4.];
    let mut y = vec![f64::NAN, f64::NAN];
    A.gemv(&NativeGemv, &x, &mut y, 1.0, 0.0);
    assert_eq!(y, [3., 8.]);
}

#[test]
fn test_gemv_leading_dimension() {
    // 2x2 matrix embedded in a 3 row buffer
    let a = [1., 2., 99., 3., 4., 99.];
    let x = [1., 1.];
    let mut y = [0., 0.];
    NativeGemv.xgemv(MatrixShape::N, 2, 2, 1.0, &a, 3, &x, 0.0, &mut y);
    assert_eq!(y, [4., 6.]);
}
