//! Dense triangular and orthogonal kernels for the dual active-set method.
//!
//! All square matrices are n x n, column major, with element `(i,j)` at
//! `mat[i + j*n]`.  The upper triangular factor `R` of the active set is
//! stored as packed columns, with column `j` occupying `j+1` entries
//! starting at `j*(j+1)/2`.

#![allow(non_snake_case)]
use crate::algebra::*;

/// y = a * x + y
#[inline]
fn axpy<T: FloatT>(a: T, x: &[T], y: &mut [T]) {
    y.axpby(a, x, T::one());
}

/// Overwrites the upper triangle of `mat` with `R` such that `mat = RᵀR`.
/// Fails when `mat` is not positive definite.
pub(crate) fn cholesky<T: FloatT>(mat: &mut [T], n: usize) -> Result<(), ()> {
    debug_assert_eq!(mat.len(), n * n);
    for j in 0..n {
        for k in 0..j {
            let s = mat[k * n..k * n + k].dot(&mat[j * n..j * n + k]);
            mat[k + j * n] = (mat[k + j * n] - s) / mat[k + k * n];
        }
        let colj = &mat[j * n..j * n + j];
        let s = mat[j + j * n] - colj.dot(colj);
        if s <= T::zero() || !s.is_finite() {
            return Err(());
        }
        mat[j + j * n] = s.sqrt();
    }
    Ok(())
}

/// Solves `R x = b` in place for upper triangular `R`.
pub(crate) fn triangular_solve<T: FloatT>(mat: &[T], vec: &mut [T]) {
    let n = vec.len();
    for k in (0..n).rev() {
        vec[k] /= mat[k + k * n];
        let (head, tail) = vec.split_at_mut(k);
        axpy(-tail[0], &mat[k * n..k * n + k], head);
    }
}

/// Solves `Rᵀ x = b` in place for upper triangular `R`.
pub(crate) fn triangular_solve_transpose<T: FloatT>(mat: &[T], vec: &mut [T]) {
    let n = vec.len();
    for k in 0..n {
        let s = mat[k * n..k * n + k].dot(&vec[..k]);
        vec[k] = (vec[k] - s) / mat[k + k * n];
    }
}

/// Inverts upper triangular `R` in place.  The strict lower triangle
/// is not referenced.
pub(crate) fn triangular_invert<T: FloatT>(mat: &mut [T], n: usize) {
    debug_assert_eq!(mat.len(), n * n);
    for k in 0..n {
        let rkk = T::recip(mat[k + k * n]);
        mat[k + k * n] = rkk;
        mat[k * n..k * n + k].scale(-rkk);

        let (left, right) = mat.split_at_mut(n + k * n);
        for j in 0..n - k - 1 {
            let rkj = right[k + j * n];
            axpy(rkj, &left[k * n..k * n + k], &mut right[j * n..j * n + k]);
            right[k + j * n] = rkj * left[k + k * n];
        }
    }
}

/// Zeros the strict lower triangle
pub(crate) fn clear_lower_triangle<T: FloatT>(mat: &mut [T], n: usize) {
    for j in 0..n {
        mat[j * n + j + 1..(j + 1) * n].set(T::zero());
    }
}

// sign(a) * sqrt(a^2 + b^2)
fn signed_hypot<T: FloatT>(a: T, b: T) -> T {
    let h = T::hypot(a, b);
    if a < T::zero() {
        -h
    } else {
        h
    }
}

// neighbouring columns (i-1, i) of an n x n matrix
fn column_pair<T>(mat: &mut [T], i: usize, n: usize) -> (&mut [T], &mut [T]) {
    let (left, right) = mat.split_at_mut(i * n);
    (&mut left[(i - 1) * n..], &mut right[..n])
}

// applies the rotation defined by (gc, gs, nu) to the pair (li, ri)
#[inline]
fn rotate<T: FloatT>(gc: T, gs: T, nu: T, li: &mut T, ri: &mut T) {
    let temp = gc * *li + gs * *ri;
    *ri = nu * (*li + temp) - *ri;
    *li = temp;
}

/// Applies Givens rotations to `d` so that entries beyond the first `r`
/// vanish, applying the same rotations to the columns of `J`.
///
/// The trailing entries of `d` are left in place and must be ignored.
pub(crate) fn qr_insert<T: FloatT>(r: usize, d: &mut [T], J: &mut [T]) {
    let n = d.len();
    debug_assert_eq!(J.len(), n * n);
    debug_assert!(r >= 1 && r <= n);

    for i in (r..n).rev() {
        if d[i] == T::zero() {
            continue;
        }
        let (left, right) = column_pair(J, i, n);
        if d[i - 1] == T::zero() {
            d[i - 1] = d[i];
            left.swap_with_slice(right);
        } else {
            let h = signed_hypot(d[i - 1], d[i]);
            let gc = d[i - 1] / h;
            let gs = d[i] / h;
            let nu = d[i] / (d[i - 1] + h);
            d[i - 1] = h;
            for (li, ri) in left.iter_mut().zip(right.iter_mut()) {
                rotate(gc, gs, nu, li, ri);
            }
        }
    }
}

/// Removes the column at (1-based) position `col` from the packed
/// `r x r` factor `R`, restoring triangular form with Givens rotations
/// and applying the same rotations to the columns of `J`.
///
/// On exit the leading `(r-1)r/2` entries of `R` hold the reduced factor.
pub(crate) fn qr_delete<T: FloatT>(col: usize, r: usize, J: &mut [T], R: &mut [T], n: usize) {
    debug_assert_eq!(J.len(), n * n);
    debug_assert!(R.len() >= r * (r + 1) / 2);

    for i in col..r {
        // R[l] is the diagonal entry of column i
        let di = i * (i + 1) / 2;
        let l = di + i;

        if R[l] != T::zero() {
            let (left, right) = column_pair(J, i, n);
            if R[l - 1] == T::zero() {
                let mut ind = l;
                for j in i + 1..=r {
                    R.swap(ind - 1, ind);
                    ind += j;
                }
                left.swap_with_slice(right);
            } else {
                let h = signed_hypot(R[l - 1], R[l]);
                let gc = R[l - 1] / h;
                let gs = R[l] / h;
                let nu = R[l] / (R[l - 1] + h);

                let mut ind = l;
                for j in i + 1..=r {
                    let (a, b) = R.split_at_mut(ind);
                    rotate(gc, gs, nu, &mut a[ind - 1], &mut b[0]);
                    ind += j;
                }
                for (li, ri) in left.iter_mut().zip(right.iter_mut()) {
                    rotate(gc, gs, nu, li, ri);
                }
            }
        }

        // shift column i into position i-1
        let (left, right) = R.split_at_mut(di);
        left[di - i..].swap_with_slice(&mut right[..i]);
    }
}
