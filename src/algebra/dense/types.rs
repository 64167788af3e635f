#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Matrix orientation marker.  `T` = transpose, `N` = non-transposed.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum MatrixShape {
    N,
    T,
}

impl MatrixShape {
    /// The `trans` character expected by BLAS style routines
    pub fn as_blas_char(&self) -> u8 {
        match self {
            MatrixShape::N => b'N',
            MatrixShape::T => b'T',
        }
    }
}

pub trait ShapedMatrix {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
    fn size(&self) -> (usize, usize) {
        (self.nrows(), self.ncols())
    }
    fn is_square(&self) -> bool {
        self.nrows() == self.ncols()
    }
}

/// Dense matrix in column major format
///
/// __Example usage__ : To construct the 3 x 3 matrix
/// ```text
/// A = [1.  3.  5.]
///     [2.  0.  6.]
///     [0.  4.  7.]
/// ```
///
/// ```
/// use qpbridge::algebra::Matrix;
///
/// let A : Matrix<f64> = Matrix::new_from_slice(
///        (3, 3),
///        &[1., 2., 0., 3., 0., 4., 5., 6., 7.],
///     );
///
/// let B = Matrix::from(
///     &[[1., 3., 5.],
///       [2., 0., 6.],
///       [0., 4., 7.]]);
///
/// assert_eq!(A, B);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Matrix<T = f64> {
    /// number of rows
    pub m: usize,
    ///number of columns
    pub n: usize,
    /// vector of data in column major format
    pub data: Vec<T>,
}
