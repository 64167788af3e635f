#![cfg_attr(rustfmt, rustfmt_skip)]
#![allow(clippy::too_many_arguments)]
#![allow(non_snake_case)]

// standard imports via blas-rs crates
extern crate blas_src;
use blas::*;

use crate::algebra::{MatrixShape, MultiplyGEMV};
use super::gemv::check_gemv_dims;

// --------------------------------------
// ?gemv : matrix vector multiply (general shape)
// --------------------------------------

pub trait XgemvScalar: Sized {
    fn xgemv(
        trans: u8, m: i32, n: i32, alpha: Self, a: &[Self], lda: i32,
        x: &[Self], incx: i32, beta: Self, y: &mut [Self], incy: i32
    );
}

macro_rules! impl_blas_gemv {
    ($T:ty, $XGEMV:path) => {
        impl XgemvScalar for $T {
            fn xgemv(
                trans: u8, m: i32, n: i32, alpha: Self, a: &[Self], lda: i32,
                x: &[Self], incx: i32, beta: Self, y: &mut [Self], incy: i32
            ) {
                unsafe{
                    $XGEMV(
                        trans, m, n, alpha, a, lda, x, incx, beta, y, incy
                    );
                }
            }
        }
    };
}
impl_blas_gemv!(f32, sgemv);
impl_blas_gemv!(f64, dgemv);

/// BLAS backed implementation of [`MultiplyGEMV`](crate::algebra::MultiplyGEMV).
/// Requires the "blas" feature.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlasGemv;

impl<T> MultiplyGEMV<T> for BlasGemv
where
    T: XgemvScalar,
{
    fn xgemv(
        &self, trans: MatrixShape, m: usize, n: usize, α: T, a: &[T], lda: usize,
        x: &[T], β: T, y: &mut [T],
    ) {
        check_gemv_dims(trans, m, n, a, lda, x, y);

        // standard BLAS ?gemv arguments for computing matrix-vector product
        let trans = trans.as_blas_char();
        let m = m.try_into().unwrap();
        let n = n.try_into().unwrap();
        let lda = lda.try_into().unwrap();
        let incx = 1;
        let incy = 1;

        T::xgemv(trans, m, n, α, a, lda, x, incx, β, y, incy);
    }
}

#[test]
fn test_blas_gemv() {
    use crate::algebra::Matrix;

    #[rustfmt::skip]
    let A = Matrix::from(
        &[[ 1.,  2., 3.],
          [ 4.,  5., 6.]]);

    let x = vec![1., 2., 3.];
    let mut y = vec![-1., -2.];
    A.gemv(&BlasGemv, &x, &mut y, 2.0, 3.0);
    assert!(y == [25.0, 58.0]);
}
