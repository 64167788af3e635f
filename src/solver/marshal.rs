//! Construction of the flat buffers passed to the QPSOL routine.
//!
//! [`QpsolWorkspace`](QpsolWorkspace) owns every temporary array needed by
//! a single call.  Caller data that is already in the routine's layout
//! (the column major Hessian, the linear term and the constraint matrix)
//! is borrowed rather than copied.  All owned buffers are released when
//! the workspace is dropped, whatever the outcome of the call.

use super::*;
use crate::algebra::*;

// fixed solve mode flags.  Warm starts are not supported.
pub(crate) const COLD_START: bool = true;
pub(crate) const LP_MODE: bool = false;
pub(crate) const ORTHOGONAL_FACTORIZATION: bool = true;

/// Minimum lengths `(leniw, lenw)` of the integer and floating point
/// work arrays for a problem with `n` variables and `nclin` general
/// linear constraints.
///
/// ```
/// use qpbridge::solver::workspace_lengths;
///
/// assert_eq!(workspace_lengths(3, 0, false), (6, 32));
/// ```
pub fn workspace_lengths(n: usize, nclin: usize, lp: bool) -> (usize, usize) {
    let leniw = 2 * n;
    let ncon = usize::max(nclin, 1);
    let lenw = if !lp || nclin >= n {
        2 * n * (n + 2) + nclin + 2 * ncon
    } else {
        2 * ncon * (1 + ncon) + 4 * n + nclin
    };
    (leniw, lenw)
}

fn alloc_buffer<V: Clone>(
    buffer: &'static str,
    len: usize,
    value: V,
) -> Result<Vec<V>, AllocationError> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| AllocationError { buffer, len })?;
    v.resize(len, value);
    Ok(v)
}

fn as_fortran_int(dim: usize) -> Result<i32, ConfigurationError> {
    i32::try_from(dim).map_err(|_| ConfigurationError::DimensionOverflow(dim))
}

/// Per-call buffers for the QPSOL routine
#[derive(Debug)]
pub struct QpsolWorkspace<'a, T> {
    n: usize,
    nclin: usize,
    itmax: i32,
    msglvl: i32,
    bigbnd: T,

    // borrowed caller data
    a: &'a [T],
    hess: &'a [T],
    cvec: &'a [T],

    // owned scratch data
    bl: Vec<T>,
    bu: Vec<T>,
    featol: Vec<T>,
    istate: Vec<i32>,
    clamda: Vec<T>,
    iw: Vec<i32>,
    w: Vec<T>,
}

impl<'a, T> QpsolWorkspace<'a, T>
where
    T: FloatT,
{
    /// Marshal the problem into QPSOL buffers.  Dimensions are checked
    /// here, so this fails before any routine sees inconsistent data.
    pub fn new(
        problem: &'a QuadraticProgram<T>,
        constraints: &'a LinearConstraints<T>,
        bounds: Option<&Bounds<T>>,
        settings: &QpsolSettings<T>,
    ) -> Result<Self, QpsolError> {
        settings.validate()?;
        problem.check_dimensions()?;
        let n = problem.n();
        constraints.check_dimensions(n)?;
        if let Some(bounds) = bounds {
            bounds.check_dimensions(n)?;
        }

        let nclin = constraints.size();
        let nctotl = n + nclin;
        let bigbnd = settings.infinite_bound;

        let (leniw, lenw) = workspace_lengths(n, nclin, LP_MODE);

        // every integer handed to the routine must fit its integer type
        for dim in [nctotl, leniw, lenw, settings.itmax(n)] {
            as_fortran_int(dim)?;
        }

        // combined bounds : variables first, then general constraints
        let mut bl = alloc_buffer("bl", nctotl, T::zero())?;
        let mut bu = alloc_buffer("bu", nctotl, T::zero())?;

        match bounds {
            Some(bounds) if bounds.size() > 0 => {
                bl[..n].copy_from(&bounds.lower);
                bu[..n].copy_from(&bounds.upper);
            }
            _ => {
                bl[..n].set(-bigbnd);
                bu[..n].set(bigbnd);
            }
        }
        bl[n..].copy_from(&constraints.lower);
        bu[n..].copy_from(&constraints.upper);

        let featol = alloc_buffer("featol", nctotl, settings.feasibility_tolerance)?;
        let istate = alloc_buffer("istate", nctotl, 0i32)?;
        let clamda = alloc_buffer("clamda", nctotl, T::zero())?;
        let iw = alloc_buffer("iw", leniw, 0i32)?;
        let w = alloc_buffer("w", lenw, T::zero())?;

        // NB: A is stored column major with nrowa == nclin,
        // which is the layout QPSOL expects whenever nclin > 0
        let a = if nclin > 0 {
            constraints.A.data()
        } else {
            &[]
        };

        Ok(Self {
            n,
            nclin,
            itmax: settings.itmax(n) as i32,
            msglvl: settings.print_level,
            bigbnd,
            a,
            hess: problem.H.data(),
            cvec: &problem.c,
            bl,
            bu,
            featol,
            istate,
            clamda,
            iw,
            w,
        })
    }

    /// number of variables
    pub fn n(&self) -> usize {
        self.n
    }
    /// number of general linear constraints
    pub fn nclin(&self) -> usize {
        self.nclin
    }
    /// total number of bounds and constraints
    pub fn nctotl(&self) -> usize {
        self.n + self.nclin
    }
    /// leading dimension of the constraint matrix
    pub fn nrowa(&self) -> usize {
        usize::max(self.nclin, 1)
    }
    pub fn itmax(&self) -> i32 {
        self.itmax
    }
    pub fn bigbnd(&self) -> T {
        self.bigbnd
    }
    pub fn bl(&self) -> &[T] {
        &self.bl
    }
    pub fn bu(&self) -> &[T] {
        &self.bu
    }
    pub fn featol(&self) -> &[T] {
        &self.featol
    }
    pub fn a(&self) -> &[T] {
        self.a
    }
    pub fn hess(&self) -> &[T] {
        self.hess
    }
    pub fn cvec(&self) -> &[T] {
        self.cvec
    }
    pub fn istate(&self) -> &[i32] {
        &self.istate
    }
    pub fn multipliers(&self) -> &[T] {
        &self.clamda
    }
    pub fn leniw(&self) -> usize {
        self.iw.len()
    }
    pub fn lenw(&self) -> usize {
        self.w.len()
    }

    /// Arguments for one routine invocation.  The point `x` is both the
    /// initial guess and the output.
    pub fn call_args<'b>(
        &'b mut self,
        x: &'b mut [T],
        qphess: &'b dyn HessianProduct<T>,
    ) -> QpsolCall<'b, T> {
        assert_eq!(x.len(), self.n);
        assert_eq!(qphess.n(), self.n);

        // all of these were range checked at construction
        let n = self.n as i32;
        let leniw = self.iw.len() as i32;
        let lenw = self.w.len() as i32;

        QpsolCall {
            itmax: self.itmax,
            msglvl: self.msglvl,
            n,
            nclin: self.nclin as i32,
            nctotl: self.nctotl() as i32,
            nrowa: self.nrowa() as i32,
            nrowh: n,
            ncolh: n,
            bigbnd: self.bigbnd,
            a: self.a,
            bl: &self.bl,
            bu: &self.bu,
            cvec: self.cvec,
            featol: &self.featol,
            hess: self.hess,
            qphess,
            cold: COLD_START,
            lp: LP_MODE,
            orthog: ORTHOGONAL_FACTORIZATION,
            istate: &mut self.istate,
            x,
            clamda: &mut self.clamda,
            iw: &mut self.iw,
            leniw,
            w: &mut self.w,
            lenw,
        }
    }

    /// Consume the workspace, keeping only the outputs that are
    /// returned to the caller.  Everything else is released here.
    pub(crate) fn into_outputs(self) -> (Vec<T>, Vec<i32>) {
        (self.clamda, self.istate)
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::*;

    fn qp3() -> QuadraticProgram<f64> {
        QuadraticProgram::new(Matrix::identity(3), vec![1., 2., 3.]).unwrap()
    }

    #[test]
    fn test_workspace_lengths() {
        assert_eq!(workspace_lengths(3, 0, false), (6, 32));
        // 2*2*4 + 3 + 2*3
        assert_eq!(workspace_lengths(2, 3, false), (4, 25));
        // lp with few constraints uses the constraint dominated formula
        // 2*1*2 + 4*5 + 1
        assert_eq!(workspace_lengths(5, 1, true), (10, 25));
        // lp with many constraints reverts to the first formula
        assert_eq!(workspace_lengths(2, 2, true), workspace_lengths(2, 2, false));
        // ncon is floored at one
        assert_eq!(workspace_lengths(0, 0, false), (0, 2));
    }

    #[test]
    fn test_default_bounds() {
        let qp = qp3();
        let lc = LinearConstraints::none(3);
        let settings = QpsolSettings::default();

        for bounds in [None, Some(Bounds::new(vec![], vec![]).unwrap())] {
            let ws = QpsolWorkspace::new(&qp, &lc, bounds.as_ref(), &settings).unwrap();
            assert_eq!(ws.bl().len(), 3);
            assert_eq!(ws.bu().len(), 3);
            assert!(ws.bl().iter().all(|&v| v == -settings.infinite_bound));
            assert!(ws.bu().iter().all(|&v| v == settings.infinite_bound));
            assert!(ws.a().is_empty());
            assert_eq!(ws.multipliers().len(), 3);
            assert_eq!((ws.leniw(), ws.lenw()), (6, 32));
        }
    }

    #[test]
    fn test_combined_bounds() {
        let qp = qp3();
        let A = Matrix::from(&[[1., 1., 0.], [0., 1., 1.]]);
        let lc = LinearConstraints::new(A, vec![-1., 0.], vec![1., 2.]).unwrap();
        let bnds = Bounds::new(vec![0., -2., -3.], vec![1., 2., 3.]).unwrap();
        let settings = QpsolSettingsBuilder::default()
            .feasibility_tolerance(1e-6)
            .build()
            .unwrap();

        let ws = QpsolWorkspace::new(&qp, &lc, Some(&bnds), &settings).unwrap();

        assert_eq!(ws.nctotl(), 5);
        assert_eq!(ws.nrowa(), 2);
        assert_eq!(ws.bl(), [0., -2., -3., -1., 0.]);
        assert_eq!(ws.bu(), [1., 2., 3., 1., 2.]);
        assert_eq!(ws.featol(), [1e-6; 5]);
        assert_eq!(ws.a(), [1., 0., 1., 1., 0., 1.]);
        assert_eq!(ws.hess(), qp.H.data());
        assert_eq!(ws.cvec(), [1., 2., 3.]);
        assert_eq!(ws.multipliers().len(), 5);
        assert_eq!(ws.istate(), [0; 5]);
    }

    #[test]
    fn test_uniform_tolerance() {
        let settings = QpsolSettingsBuilder::default()
            .feasibility_tolerance(0.125)
            .build()
            .unwrap();

        for nclin in 0..4 {
            let qp = QuadraticProgram::new(Matrix::identity(2), vec![0.; 2]).unwrap();
            let A = Matrix::zeros((nclin, 2));
            let lc = LinearConstraints::new(A, vec![0.; nclin], vec![1.; nclin]).unwrap();
            let ws = QpsolWorkspace::new(&qp, &lc, None, &settings).unwrap();
            assert_eq!(ws.featol().len(), 2 + nclin);
            assert!(ws.featol().iter().all(|&v| v == 0.125));
        }
    }

    #[test]
    fn test_call_args() {
        let qp = qp3();
        let A = Matrix::from(&[[1., 1., 1.]]);
        let lc = LinearConstraints::new(A, vec![-1.], vec![1.]).unwrap();
        let settings = QpsolSettingsBuilder::default()
            .print_level(2)
            .build()
            .unwrap();
        let mut ws = QpsolWorkspace::new(&qp, &lc, None, &settings).unwrap();

        let hess = DenseHessian::new(&qp.H);
        let mut x = vec![0.; 3];
        let call = ws.call_args(&mut x, &hess);

        assert_eq!(call.itmax, 150);
        assert_eq!(call.msglvl, 2);
        assert_eq!((call.n, call.nclin, call.nctotl), (3, 1, 4));
        assert_eq!((call.nrowa, call.nrowh, call.ncolh), (1, 3, 3));
        assert_eq!(call.bigbnd, 1e30);
        assert!(call.cold && !call.lp && call.orthog);
        assert_eq!(call.leniw, 6);
        assert_eq!(call.lenw as usize, call.w.len());
        // 2*3*5 + 1 + 2
        assert_eq!(call.lenw, 33);
        assert_eq!(call.clamda.len(), 4);
        assert_eq!(call.istate.len(), 4);
    }

    #[test]
    fn test_dimension_errors() {
        let qp = qp3();
        let settings = QpsolSettings::default();

        let lc = LinearConstraints::new(Matrix::from(&[[1., 1.]]), vec![0.], vec![1.]).unwrap();
        let err = QpsolWorkspace::new(&qp, &lc, None, &settings).unwrap_err();
        assert_eq!(
            err,
            QpsolError::Configuration(ConfigurationError::ConstraintColumns {
                expected: 3,
                found: 2
            })
        );

        let lc = LinearConstraints::none(3);
        let bnds = Bounds::new(vec![0.; 2], vec![1.; 2]).unwrap();
        let err = QpsolWorkspace::new(&qp, &lc, Some(&bnds), &settings).unwrap_err();
        assert!(matches!(
            err,
            QpsolError::Configuration(ConfigurationError::BoundsLength { .. })
        ));

        let mut settings = QpsolSettings::default();
        settings.infinite_bound = 0.;
        let err = QpsolWorkspace::new(&qp, &lc, None, &settings).unwrap_err();
        assert!(matches!(err, QpsolError::Settings(_)));
    }
}
