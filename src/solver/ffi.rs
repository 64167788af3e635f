//! Binding to the legacy FORTRAN `qpsol_` routine.
//!
//! Only compiled with the "fortran" feature.  The library providing
//! `qpsol_` is not built by this crate; see `build.rs` for how it is
//! located at link time.

use super::*;
use libc::{c_double, c_int};
use std::cell::Cell;
use std::slice;

type QphessFn = unsafe extern "C" fn(
    n: *const c_int,
    nrowh: *const c_int,
    ncolh: *const c_int,
    jthcol: *const c_int,
    hess: *mut c_double,
    x: *mut c_double,
    hx: *mut c_double,
) -> c_int;

extern "C" {
    fn qpsol_(
        itmax: *const c_int,
        msglvl: *const c_int,
        n: *const c_int,
        nclin: *const c_int,
        nctotl: *const c_int,
        nrowa: *const c_int,
        nrowh: *const c_int,
        ncolh: *const c_int,
        bigbnd: *const c_double,
        a: *const c_double,
        bl: *const c_double,
        bu: *const c_double,
        cvec: *const c_double,
        featol: *const c_double,
        hess: *const c_double,
        qphess: QphessFn,
        cold: *const c_int,
        lp: *const c_int,
        orthog: *const c_int,
        istate: *mut c_int,
        x: *mut c_double,
        inform: *mut c_int,
        iter: *mut c_int,
        objf: *mut c_double,
        clamda: *mut c_double,
        iw: *mut c_int,
        leniw: *const c_int,
        w: *mut c_double,
        lenw: *const c_int,
    ) -> c_int;
}

type HessianPtr = *const (dyn HessianProduct<f64> + 'static);

thread_local! {
    // Hessian product of the call currently executing on this thread
    static ACTIVE_HESSIAN: Cell<Option<HessianPtr>> = Cell::new(None);
}

// Installs a Hessian product for the duration of one call and restores
// the previous one on drop, so nested calls on one thread are safe.
struct HessianGuard {
    previous: Option<HessianPtr>,
}

impl HessianGuard {
    fn install(hessian: &dyn HessianProduct<f64>) -> Self {
        let ptr: *const (dyn HessianProduct<f64> + '_) = hessian;
        // SAFETY: the pointer is only dereferenced by the trampoline while
        // the guard, and therefore the borrow of `hessian`, is alive.
        let ptr: HessianPtr = unsafe { std::mem::transmute(ptr) };
        let previous = ACTIVE_HESSIAN.with(|slot| slot.replace(Some(ptr)));
        Self { previous }
    }
}

impl Drop for HessianGuard {
    fn drop(&mut self) {
        ACTIVE_HESSIAN.with(|slot| slot.set(self.previous));
    }
}

// QPSOL never references A when nclin == 0, so no matrix is passed
fn constraint_matrix_ptr(a: &[c_double]) -> *const c_double {
    if a.is_empty() {
        std::ptr::null()
    } else {
        a.as_ptr()
    }
}

unsafe extern "C" fn qphess_trampoline(
    n: *const c_int,
    _nrowh: *const c_int,
    _ncolh: *const c_int,
    jthcol: *const c_int,
    _hess: *mut c_double,
    x: *mut c_double,
    hx: *mut c_double,
) -> c_int {
    let n = *n as usize;
    let x = slice::from_raw_parts(x as *const c_double, n);
    let hx = slice::from_raw_parts_mut(hx, n);

    match ACTIVE_HESSIAN.with(|slot| slot.get()) {
        Some(hessian) => (*hessian).qphess(*jthcol, x, hx),
        None => hx.fill(f64::NAN),
    }
    0
}

/// The FORTRAN QPSOL routine.
///
/// QPSOL keeps internal state in `COMMON` blocks and is not reentrant.
/// Calls from different threads must be serialised by the caller.
/// Message output (`msglvl > 0`) is written by the FORTRAN runtime
/// and does not pass through any print target.
#[derive(Debug, Default, Clone, Copy)]
pub struct FortranQpsol;

impl FortranQpsol {
    pub fn new() -> Self {
        Self
    }
}

impl DenseQpRoutine<f64> for FortranQpsol {
    fn qpsol(&mut self, call: QpsolCall<'_, f64>) -> QpsolOutput<f64> {
        let QpsolCall {
            itmax,
            msglvl,
            n,
            nclin,
            nctotl,
            nrowa,
            nrowh,
            ncolh,
            bigbnd,
            a,
            bl,
            bu,
            cvec,
            featol,
            hess,
            qphess,
            cold,
            lp,
            orthog,
            istate,
            x,
            clamda,
            iw,
            leniw,
            w,
            lenw,
        } = call;

        let (cold, lp, orthog) = (cold as c_int, lp as c_int, orthog as c_int);
        let mut inform: c_int = 0;
        let mut iter: c_int = 0;
        let mut objf: c_double = 0.0;

        let _guard = HessianGuard::install(qphess);

        // SAFETY: every array is sized by the caller per the routine's
        // documented requirements, and all scalars outlive the call.
        unsafe {
            qpsol_(
                &itmax,
                &msglvl,
                &n,
                &nclin,
                &nctotl,
                &nrowa,
                &nrowh,
                &ncolh,
                &bigbnd,
                constraint_matrix_ptr(a),
                bl.as_ptr(),
                bu.as_ptr(),
                cvec.as_ptr(),
                featol.as_ptr(),
                hess.as_ptr(),
                qphess_trampoline,
                &cold,
                &lp,
                &orthog,
                istate.as_mut_ptr(),
                x.as_mut_ptr(),
                &mut inform,
                &mut iter,
                &mut objf,
                clamda.as_mut_ptr(),
                iw.as_mut_ptr(),
                &leniw,
                w.as_mut_ptr(),
                &lenw,
            );
        }

        QpsolOutput {
            inform,
            iter,
            objf,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::*;

    #[test]
    fn test_trampoline_dispatch() {
        let H = crate::algebra::Matrix::from(&[[2., 1.], [1., 3.]]);
        let hess = DenseHessian::new(&H);
        let n: c_int = 2;
        let mut x = [1., 1.];
        let mut hx = [0.; 2];

        {
            let _guard = HessianGuard::install(&hess);
            let jthcol: c_int = 0;
            unsafe {
                qphess_trampoline(
                    &n,
                    &n,
                    &n,
                    &jthcol,
                    std::ptr::null_mut(),
                    x.as_mut_ptr(),
                    hx.as_mut_ptr(),
                );
            }
            assert_eq!(hx, [3., 4.]);

            let jthcol: c_int = 2;
            unsafe {
                qphess_trampoline(
                    &n,
                    &n,
                    &n,
                    &jthcol,
                    std::ptr::null_mut(),
                    x.as_mut_ptr(),
                    hx.as_mut_ptr(),
                );
            }
            assert_eq!(hx, [1., 3.]);
        }

        // no Hessian installed once the guard is dropped
        assert!(ACTIVE_HESSIAN.with(|slot| slot.get()).is_none());
    }

    #[test]
    fn test_constraint_matrix_ptr() {
        assert!(constraint_matrix_ptr(&[]).is_null());

        let a = [1., 2.];
        assert_eq!(constraint_matrix_ptr(&a), a.as_ptr());
    }
}
