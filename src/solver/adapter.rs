use super::*;
use crate::algebra::*;
use crate::io::*;
use std::io::Write;
use std::time::Duration;

cfg_if::cfg_if! {
    if #[cfg(target_family = "wasm")] {
        use web_time::Instant;
    } else {
        use std::time::Instant;
    }
}

/// Solves dense quadratic programs by a single call to a QPSOL routine.
///
/// The adapter owns the settings, the routine and the multiply engine
/// used for Hessian-vector products.  Each call to
/// [`minimize`](QpsolAdapter::minimize) marshals the problem into
/// freshly allocated buffers, invokes the routine exactly once and
/// releases the buffers before returning.  The routine's termination
/// code is returned as-is and never triggers a retry.
///
/// ```
/// use qpbridge::algebra::*;
/// use qpbridge::solver::*;
///
/// // min ½|x|² - x0 - x1  s.t.  x0 + x1 <= 1
/// let qp = QuadraticProgram::new(Matrix::identity(2), vec![-1., -1.]).unwrap();
/// let lc = LinearConstraints::new(
///     Matrix::from(&[[1., 1.]]),
///     vec![f64::NEG_INFINITY],
///     vec![1.],
/// )
/// .unwrap();
///
/// let mut adapter = QpsolAdapter::new(NativeQpsol::new(), QpsolSettings::default());
/// let mut x = vec![0.; 2];
/// let result = adapter.minimize(&qp, &lc, None, &mut x).unwrap();
///
/// assert_eq!(result.inform, 0);
/// assert_eq!(result.multipliers.len(), 3);
/// assert!((x[0] - 0.5).abs() < 1e-8);
/// ```
pub struct QpsolAdapter<T: FloatT, R, G = NativeGemv> {
    pub settings: QpsolSettings<T>,
    routine: R,
    gemv: G,
    output: PrintTarget,
}

impl<T, R> QpsolAdapter<T, R, NativeGemv>
where
    T: FloatT,
    R: DenseQpRoutine<T>,
{
    pub fn new(routine: R, settings: QpsolSettings<T>) -> Self {
        Self::with_engine(routine, settings, NativeGemv)
    }
}

impl<T, R, G> QpsolAdapter<T, R, G>
where
    T: FloatT,
    R: DenseQpRoutine<T>,
    G: MultiplyGEMV<T> + Clone,
{
    /// Create an adapter computing Hessian-vector products with `gemv`
    pub fn with_engine(routine: R, settings: QpsolSettings<T>, gemv: G) -> Self {
        Self {
            settings,
            routine,
            gemv,
            output: PrintTarget::default(),
        }
    }

    pub fn routine(&self) -> &R {
        &self.routine
    }

    pub fn routine_mut(&mut self) -> &mut R {
        &mut self.routine
    }

    pub fn into_routine(self) -> R {
        self.routine
    }

    /// Minimize `cᵀx + ½xᵀHx` subject to the linear constraints and the
    /// optional simple bounds, starting from `x`.
    ///
    /// `x` is overwritten with the final point.  Dimension errors and
    /// invalid settings are reported before the routine is invoked.
    pub fn minimize(
        &mut self,
        problem: &QuadraticProgram<T>,
        constraints: &LinearConstraints<T>,
        bounds: Option<&Bounds<T>>,
        x: &mut [T],
    ) -> Result<QpsolResult<T>, QpsolError> {
        check_problem_dimensions(problem, constraints, bounds, x)?;
        let mut workspace = QpsolWorkspace::new(problem, constraints, bounds, &self.settings)?;
        let hessian = DenseHessian::with_engine(&problem.H, self.gemv.clone());

        let _ = self.print_configuration(&workspace);

        let start = Instant::now();
        let output = self.routine.qpsol(workspace.call_args(x, &hessian));
        let solve_time = start.elapsed().as_secs_f64();

        // every other scratch buffer is released here
        let (multipliers, istate) = workspace.into_outputs();

        let result = QpsolResult {
            x: x.to_vec(),
            objf: output.objf,
            multipliers,
            inform: output.inform,
            iter: output.iter,
            istate,
            solve_time,
        };

        let _ = self.print_footer(&result);

        Ok(result)
    }

    fn print_configuration(&mut self, workspace: &QpsolWorkspace<'_, T>) -> std::io::Result<()> {
        if self.settings.print_level <= 0 {
            return Ok(());
        }
        let out = &mut self.output;
        let settings = &self.settings;

        writeln!(out, "-------------------------------------------------------------")?;
        writeln!(out, "       qpbridge v{}  -  dense QP through QPSOL", crate::VERSION)?;
        writeln!(out, "-------------------------------------------------------------")?;
        writeln!(out, "problem:")?;
        writeln!(out, "  variables     = {}", workspace.n())?;
        writeln!(out, "  constraints   = {}", workspace.nclin())?;
        writeln!(
            out,
            "  workspace     = {} ints, {} floats",
            workspace.leniw(),
            workspace.lenw()
        )?;
        writeln!(out, "settings:")?;
        writeln!(out, "  iteration limit = {}", workspace.itmax())?;
        writeln!(out, "  print level     = {}", settings.print_level)?;
        writeln!(out, "  feasibility tol = {:.1e}", settings.feasibility_tolerance)?;
        writeln!(out, "  infinite bound  = {:.1e}", settings.infinite_bound)?;
        writeln!(out)?;
        out.flush()
    }

    fn print_footer(&mut self, result: &QpsolResult<T>) -> std::io::Result<()> {
        if self.settings.print_level <= 0 {
            return Ok(());
        }
        let out = &mut self.output;

        writeln!(out, "-------------------------------------------------------------")?;
        writeln!(
            out,
            "Terminated with inform = {} ({})",
            result.inform,
            result.status()
        )?;
        writeln!(out, "iterations = {}", result.iter)?;
        writeln!(out, "objective  = {:+.8e}", result.objf)?;
        writeln!(
            out,
            "solve time = {:?}",
            Duration::from_secs_f64(result.solve_time)
        )?;
        out.flush()
    }
}

impl<T, R, G> ConfigurablePrintTarget for QpsolAdapter<T, R, G>
where
    T: FloatT,
{
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

/// Solve a quadratic program with a single call to `routine`.
///
/// Equivalent to a one-shot [`QpsolAdapter`](QpsolAdapter) using the
/// native multiply engine.  Configuration and termination output
/// (`print_level > 0`) goes to stdout.
pub fn minimize<T, R>(
    routine: &mut R,
    problem: &QuadraticProgram<T>,
    constraints: &LinearConstraints<T>,
    bounds: Option<&Bounds<T>>,
    settings: &QpsolSettings<T>,
    x: &mut [T],
) -> Result<QpsolResult<T>, QpsolError>
where
    T: FloatT,
    R: DenseQpRoutine<T> + ?Sized,
{
    QpsolAdapter::new(routine, settings.clone()).minimize(problem, constraints, bounds, x)
}

#[cfg(test)]
mod tests {
    use super::*;

    // records the call and reports a fixed status
    struct MockRoutine {
        calls: usize,
        inform: i32,
    }

    impl DenseQpRoutine<f64> for MockRoutine {
        fn qpsol(&mut self, call: QpsolCall<'_, f64>) -> QpsolOutput<f64> {
            self.calls += 1;
            call.x.set(7.);
            call.clamda.set(-1.);
            QpsolOutput {
                inform: self.inform,
                iter: 3,
                objf: 42.,
            }
        }
    }

    #[test]
    fn test_failure_status_is_not_an_error() {
        let qp = QuadraticProgram::new(Matrix::identity(2), vec![0., 0.]).unwrap();
        let lc = LinearConstraints::new(Matrix::from(&[[1., 1.]]), vec![0.], vec![1.]).unwrap();
        let mut routine = MockRoutine {
            calls: 0,
            inform: 3,
        };
        let mut x = vec![0.; 2];

        let result = minimize(
            &mut routine,
            &qp,
            &lc,
            None,
            &QpsolSettings::default(),
            &mut x,
        )
        .unwrap();

        assert_eq!(routine.calls, 1);
        assert_eq!(result.inform, 3);
        assert_eq!(result.status(), QpsolInform::Infeasible);
        assert_eq!(result.iter, 3);
        assert_eq!(result.objf, 42.);
        assert_eq!(result.x, [7., 7.]);
        assert_eq!(x, [7., 7.]);
        assert_eq!(result.multipliers, [-1.; 3]);
    }

    #[test]
    fn test_dimension_error_before_call() {
        let qp = QuadraticProgram::new(Matrix::identity(2), vec![0., 0.]).unwrap();
        let lc = LinearConstraints::none(2);
        let mut adapter = QpsolAdapter::new(
            MockRoutine {
                calls: 0,
                inform: 0,
            },
            QpsolSettings::default(),
        );

        let mut x = vec![0.; 3];
        let err = adapter.minimize(&qp, &lc, None, &mut x).unwrap_err();
        assert_eq!(
            err,
            QpsolError::Configuration(ConfigurationError::InitialPointLength {
                expected: 2,
                found: 3
            })
        );

        let bnds = Bounds::new(vec![0.], vec![1.]).unwrap();
        let mut x = vec![0.; 2];
        assert!(adapter.minimize(&qp, &lc, Some(&bnds), &mut x).is_err());

        adapter.settings.feasibility_tolerance = -1.;
        assert!(matches!(
            adapter.minimize(&qp, &lc, None, &mut x),
            Err(QpsolError::Settings(_))
        ));

        assert_eq!(adapter.routine().calls, 0);
    }

    #[test]
    fn test_verbose_output() {
        let qp = QuadraticProgram::new(Matrix::identity(2), vec![-1., 0.]).unwrap();
        let lc = LinearConstraints::none(2);
        let settings = QpsolSettingsBuilder::default()
            .print_level(1)
            .build()
            .unwrap();

        let mut adapter = QpsolAdapter::new(NativeQpsol::new(), settings);
        adapter.print_to_buffer();
        adapter.routine_mut().print_to_sink();

        let mut x = vec![0.; 2];
        let result = adapter.minimize(&qp, &lc, None, &mut x).unwrap();
        assert_eq!(result.inform, 0);

        let text = adapter.get_print_buffer().unwrap();
        assert!(text.contains("variables     = 2"));
        assert!(text.contains("iteration limit = 100"));
        assert!(text.contains("Terminated with inform = 0 (Optimal)"));

        // nothing is printed at level zero
        adapter.settings.print_level = 0;
        adapter.print_to_buffer();
        adapter.minimize(&qp, &lc, None, &mut x).unwrap();
        assert!(adapter.get_print_buffer().unwrap().is_empty());
    }
}
