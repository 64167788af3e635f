//! Pure Rust stand-in for the QPSOL routine.
//!
//! [`NativeQpsol`](NativeQpsol) accepts exactly the argument list of the
//! FORTRAN routine and honours its buffer contract, but solves the problem
//! with the dual active-set method of Goldfarb and Idnani.  It is therefore
//! restricted to strictly convex programs, i.e. the Hessian must be positive
//! definite.
//!
//! Every two-sided bound or constraint `bl <= aᵀx <= bu` is handled as a
//! pair of one-sided constraints, of which at most one is in the working
//! set at any time.  Equalities (`bl == bu`) enter the working set with
//! whichever orientation is violated and are never dropped.
//!
//! The caller's `w` array holds the factorization:
//!
//! ```text
//!  J      : n*n     inverse Cholesky factor, rotated by the active set
//!  R      : n*n     packed upper triangular factor of the active normals
//!  d,z,r,u: 4*n     step and multiplier vectors
//!  norms  : nclin   2-norms of the general constraint rows
//! ```
//!
//! which is exactly the first `lenw` formula of the routine's workspace
//! requirements.  The first `2n` entries of `iw` record the working set.

#![allow(non_snake_case)]
mod factor;

use self::factor::*;
use super::*;
use crate::algebra::*;
use crate::io::*;
use itertools::izip;
use std::io::Write;

/// Dual active-set implementation of [`DenseQpRoutine`](DenseQpRoutine).
///
/// The initial point on entry is ignored since the method starts from the
/// unconstrained minimizer.  The `cold` and `orthog` flags are accepted
/// but have no effect, and `lp = true` is rejected with `inform = 6`.
///
/// When `msglvl > 0` an iteration log is written to the configured print
/// target (stdout by default).
#[derive(Debug, Default)]
pub struct NativeQpsol {
    output: PrintTarget,
}

impl NativeQpsol {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigurablePrintTarget for NativeQpsol {
    fn print_to_stdout(&mut self) {
        self.output.print_to_stdout()
    }
    fn print_to_file(&mut self, file: std::fs::File) {
        self.output.print_to_file(file)
    }
    fn print_to_stream(&mut self, stream: Box<dyn Write + Send + Sync>) {
        self.output.print_to_stream(stream)
    }
    fn print_to_buffer(&mut self) {
        self.output.print_to_buffer()
    }
    fn print_to_sink(&mut self) {
        self.output.print_to_sink()
    }
    fn get_print_buffer(&mut self) -> std::io::Result<String> {
        self.output.get_print_buffer()
    }
}

// ---------------------------------
// bound and constraint rows
// ---------------------------------

// Rows of the combined constraint matrix [I; A], with their bounds.
struct ConstraintRows<'a, T> {
    n: usize,
    nrowa: usize,
    a: &'a [T],
    bl: &'a [T],
    bu: &'a [T],
    bigbnd: T,
}

impl<T> ConstraintRows<'_, T>
where
    T: FloatT,
{
    // row j dotted with v
    fn dot(&self, j: usize, v: &[T]) -> T {
        if j < self.n {
            return v[j];
        }
        let i = j - self.n;
        v.iter()
            .enumerate()
            .fold(T::zero(), |acc, (k, &vk)| acc + self.a[i + k * self.nrowa] * vk)
    }

    fn has_lower(&self, j: usize) -> bool {
        self.bl[j] > -self.bigbnd
    }

    fn has_upper(&self, j: usize) -> bool {
        self.bu[j] < self.bigbnd
    }

    fn is_equality(&self, j: usize) -> bool {
        self.has_lower(j) && self.has_upper(j) && self.bl[j] == self.bu[j]
    }

    // slack of the oriented constraint σ aⱼᵀx >= σ b.  Negative when violated.
    fn slack(&self, j: usize, sense: T, x: &[T]) -> T {
        let v = self.dot(j, x);
        if sense > T::zero() {
            v - self.bl[j]
        } else {
            self.bu[j] - v
        }
    }
}

// ---------------------------------
// argument checks
// ---------------------------------

struct Dims {
    n: usize,
    nclin: usize,
    nctotl: usize,
    nrowa: usize,
    itmax: usize,
}

fn check_call<T: FloatT>(call: &QpsolCall<'_, T>) -> Result<Dims, &'static str> {
    if call.lp {
        return Err("linear programming mode is not supported");
    }
    if call.n <= 0 {
        return Err("n must be positive");
    }
    if call.nclin < 0 {
        return Err("nclin must be nonnegative");
    }
    if call.itmax < 0 {
        return Err("itmax must be nonnegative");
    }
    let n = call.n as usize;
    let nclin = call.nclin as usize;
    let nctotl = n + nclin;

    if call.nctotl < 0 || call.nctotl as usize != nctotl {
        return Err("nctotl must equal n + nclin");
    }
    if call.nrowa < 1 || (call.nrowa as usize) < nclin {
        return Err("nrowa must be at least max(1,nclin)");
    }
    if call.nrowh < call.n || call.ncolh != call.n {
        return Err("the Hessian must be n x n");
    }
    if call.qphess.n() != n {
        return Err("Hessian product has the wrong order");
    }
    let nrowa = call.nrowa as usize;

    if call.x.len() < n || call.cvec.len() < n {
        return Err("x and cvec must have length n");
    }
    let lengths = [
        call.bl.len(),
        call.bu.len(),
        call.featol.len(),
        call.istate.len(),
        call.clamda.len(),
    ];
    if lengths.into_iter().any(|len| len < nctotl) {
        return Err("bound, tolerance and multiplier arrays must have length n + nclin");
    }
    if nclin > 0 && call.a.len() < nrowa * n {
        return Err("constraint matrix is too short");
    }

    let (leniw, lenw) = workspace_lengths(n, nclin, call.lp);
    if call.leniw < 0 || (call.leniw as usize) < leniw || call.iw.len() < leniw {
        return Err("leniw is too small");
    }
    if call.lenw < 0 || (call.lenw as usize) < lenw || call.w.len() < lenw {
        return Err("lenw is too small");
    }

    Ok(Dims {
        n,
        nclin,
        nctotl,
        nrowa,
        itmax: call.itmax as usize,
    })
}

const INFORM_OPTIMAL: i32 = 0;
const INFORM_INFEASIBLE: i32 = 3;
const INFORM_ITERATION_LIMIT: i32 = 4;
const INFORM_INVALID: i32 = 6;

impl<T> DenseQpRoutine<T> for NativeQpsol
where
    T: FloatT,
{
    fn qpsol(&mut self, call: QpsolCall<'_, T>) -> QpsolOutput<T> {
        let verbose = call.msglvl > 0;
        let out = &mut self.output;

        let dims = match check_call(&call) {
            Ok(dims) => dims,
            Err(reason) => {
                if verbose {
                    let _ = writeln!(out, "NativeQpsol: invalid input, {}", reason);
                }
                return QpsolOutput {
                    inform: INFORM_INVALID,
                    iter: 0,
                    objf: T::zero(),
                };
            }
        };
        let Dims {
            n,
            nclin,
            nctotl,
            nrowa,
            itmax,
        } = dims;

        let QpsolCall {
            bigbnd,
            a,
            bl,
            bu,
            cvec,
            featol,
            qphess,
            istate,
            x,
            clamda,
            iw,
            w,
            ..
        } = call;

        let x = &mut x[..n];
        let cvec = &cvec[..n];
        let istate = &mut istate[..nctotl];
        let clamda = &mut clamda[..nctotl];
        istate.iter_mut().for_each(|s| *s = istate::FREE);
        clamda.set(T::zero());

        let rows = ConstraintRows {
            n,
            nrowa,
            a,
            bl,
            bu,
            bigbnd,
        };

        // partition the workspace
        let (J, rest) = w.split_at_mut(n * n);
        let (R, rest) = rest.split_at_mut(n * n);
        let (dv, rest) = rest.split_at_mut(n);
        let (zv, rest) = rest.split_at_mut(n);
        let (rv, rest) = rest.split_at_mut(n);
        let (uv, rest) = rest.split_at_mut(n);
        let norms = &mut rest[..nclin];
        let (iact, sense) = iw[..2 * n].split_at_mut(n);

        if verbose {
            let _ = writeln!(
                out,
                "NativeQpsol: n = {}, nclin = {}, itmax = {}, bigbnd = {:.2e}",
                n, nclin, itmax, bigbnd
            );
        }

        let finish = |inform: i32, iter: usize, x: &[T], hx: &mut [T], out: &mut PrintTarget| {
            qphess.qphess(0, x, hx);
            let objf = cvec.dot(x) + AsFloatT::<T>::as_T(&0.5) * hx.dot(x);
            if verbose {
                let _ = writeln!(
                    out,
                    "NativeQpsol: exit inform = {} ({}), iterations = {}, objf = {:.8e}",
                    inform,
                    QpsolInform::from(inform),
                    iter,
                    objf
                );
            }
            QpsolOutput {
                inform,
                iter: iter as i32,
                objf,
            }
        };

        // crossed bounds can never be satisfied
        if (0..nctotl).any(|j| bl[j] > bu[j]) {
            return finish(INFORM_INFEASIBLE, 0, x, dv, out);
        }

        // Cholesky factor of the Hessian, assembled column by column
        for k in 0..n {
            qphess.qphess((k + 1) as i32, x, &mut J[k * n..(k + 1) * n]);
        }
        if cholesky(J, n).is_err() {
            if verbose {
                let _ = writeln!(out, "NativeQpsol: Hessian is not positive definite");
            }
            return QpsolOutput {
                inform: INFORM_INVALID,
                iter: 0,
                objf: T::zero(),
            };
        }

        // unconstrained minimizer x = -H⁻¹c
        x.copy_from(cvec).negate();
        triangular_solve_transpose(J, x);
        triangular_solve(J, x);

        // J = L⁻ᵀ
        triangular_invert(J, n);
        clear_lower_triangle(J, n);

        for (i, norm) in norms.iter_mut().enumerate() {
            let sumsq = (0..n).fold(T::zero(), |acc, k| acc + T::powi(a[i + k * nrowa], 2));
            *norm = if sumsq > T::zero() {
                sumsq.sqrt()
            } else {
                T::one()
            };
        }
        let row_norm = |j: usize| if j < n { T::one() } else { norms[j - n] };

        if verbose {
            let _ = writeln!(out, "{:>6} {:>6} {:>6} {:>6} {:>12}", "iter", "add", "drop", "nact", "step");
        }

        let mut nact = 0usize;
        let mut iter = 0usize;

        let inform = 'outer: loop {
            // choose the most violated constraint outside the working set
            let mut jadd = None;
            let mut worst = T::zero();
            for j in 0..nctotl {
                if istate[j] != istate::FREE {
                    continue;
                }
                let v = rows.dot(j, x);
                let (dir, slack) = if rows.has_lower(j) && v < bl[j] - featol[j] {
                    (T::one(), v - bl[j])
                } else if rows.has_upper(j) && v > bu[j] + featol[j] {
                    (-T::one(), bu[j] - v)
                } else {
                    continue;
                };
                let violation = -slack / row_norm(j);
                if violation > worst {
                    worst = violation;
                    jadd = Some((j, dir, slack));
                }
            }

            let Some((jadd, dir, mut slack)) = jadd else {
                break INFORM_OPTIMAL;
            };
            if iter >= itmax {
                break INFORM_ITERATION_LIMIT;
            }
            iter += 1;

            let mut u = T::zero();
            let mut step;
            loop {
                // d = Jᵀn for the oriented normal n = dir * aⱼ
                for (i, di) in dv.iter_mut().enumerate() {
                    *di = dir * rows.dot(jadd, &J[i * n..(i + 1) * n]);
                }

                // primal step direction z = J₂d₂
                zv.set(T::zero());
                for i in nact..n {
                    zv.axpby(dv[i], &J[i * n..(i + 1) * n], T::one());
                }

                // dual step direction r = R⁻¹d₁
                let r = &mut rv[..nact];
                r.copy_from(&dv[..nact]);
                for i in (0..nact).rev() {
                    let start = i * (i + 1) / 2;
                    r[i] /= R[start + i];
                    let (head, tail) = r.split_at_mut(i);
                    head.axpby(-tail[0], &R[start..start + i], T::one());
                }

                // largest dual step keeping the droppable multipliers nonnegative
                let mut idel = None;
                let mut t1 = T::infinity();
                for k in 0..nact {
                    if rows.is_equality(iact[k] as usize) || r[k] <= T::zero() {
                        continue;
                    }
                    let t = uv[k] / r[k];
                    if t < t1 {
                        t1 = t;
                        idel = Some(k);
                    }
                }

                // full step onto the constraint being added.  nᵀz = |d₂|², so
                // z vanishes when d lies in the span of the active normals
                let t2 = if dv[nact..].sumsq() <= T::epsilon() * dv.sumsq() {
                    T::infinity()
                } else {
                    -slack / (dir * rows.dot(jadd, zv))
                };

                if t1.is_infinite() && t2.is_infinite() {
                    break 'outer INFORM_INFEASIBLE;
                }

                let partial = t2 > t1;
                step = if partial { t1 } else { t2 };

                if t2.is_finite() {
                    x.axpby(step, zv, T::one());
                }
                uv[..nact].axpby(-step, r, T::one());
                u += step;

                let Some(k) = idel.filter(|_| partial) else {
                    break;
                };

                // drop working set entry k and try again
                if iter >= itmax {
                    break 'outer INFORM_ITERATION_LIMIT;
                }
                iter += 1;

                let jdel = iact[k] as usize;
                istate[jdel] = istate::FREE;
                qr_delete(k + 1, nact, J, R, n);
                for m in k..nact - 1 {
                    iact[m] = iact[m + 1];
                    sense[m] = sense[m + 1];
                    uv[m] = uv[m + 1];
                }
                nact -= 1;

                if verbose {
                    let _ = writeln!(out, "{:>6} {:>6} {:>6} {:>6} {:>12.4e}", iter, "", jdel + 1, nact, step);
                }

                slack = rows.slack(jadd, dir, x);
            }

            // add jadd to the working set
            iact[nact] = jadd as i32;
            sense[nact] = if dir > T::zero() { 1 } else { -1 };
            uv[nact] = u;
            nact += 1;
            istate[jadd] = if rows.is_equality(jadd) {
                istate::EQUALITY
            } else if dir > T::zero() {
                istate::AT_LOWER
            } else {
                istate::AT_UPPER
            };

            qr_insert(nact, dv, J);
            let start = nact * (nact - 1) / 2;
            R[start..start + nact].copy_from(&dv[..nact]);

            if verbose {
                let _ = writeln!(out, "{:>6} {:>6} {:>6} {:>6} {:>12.4e}", iter, jadd + 1, "", nact, step);
            }
        };

        // multipliers in the sign convention aᵀλ = ∇f
        for (&j, &s, &u) in izip!(&iact[..nact], &sense[..nact], &uv[..nact]) {
            clamda[j as usize] = if s > 0 { u } else { -u };
        }

        finish(inform, iter, x, dv, out)
    }
}
