use super::*;
use crate::algebra::*;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::io::Write;
use std::{fs::File, io, io::Read};

/// A complete problem instance, as read from or written to a JSON file.
///
/// JSON cannot represent infinite values, so infinite bounds are written
/// as the largest finite value of `T` and restored on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "T: Serialize + DeserializeOwned")]
pub struct QpsolProblem<T: FloatT = f64> {
    pub problem: QuadraticProgram<T>,
    pub constraints: LinearConstraints<T>,
    pub bounds: Option<Bounds<T>>,
    pub settings: QpsolSettings<T>,
    /// initial point
    pub x0: Vec<T>,
}

impl<T> QpsolProblem<T>
where
    T: FloatT + Serialize + DeserializeOwned,
{
    pub fn new(
        problem: QuadraticProgram<T>,
        constraints: LinearConstraints<T>,
        bounds: Option<Bounds<T>>,
        settings: QpsolSettings<T>,
        x0: Vec<T>,
    ) -> Result<Self, ConfigurationError> {
        check_problem_dimensions(&problem, &constraints, bounds.as_ref(), &x0)?;
        Ok(Self {
            problem,
            constraints,
            bounds,
            settings,
            x0,
        })
    }

    /// Solve the stored problem with `routine`, starting from a copy of `x0`
    pub fn minimize<R>(&self, routine: &mut R) -> Result<QpsolResult<T>, QpsolError>
    where
        R: DenseQpRoutine<T> + ?Sized,
    {
        let mut x = self.x0.clone();
        minimize(
            routine,
            &self.problem,
            &self.constraints,
            self.bounds.as_ref(),
            &self.settings,
            &mut x,
        )
    }

    pub fn write_to_file(&self, file: &mut File) -> Result<(), io::Error> {
        let mut json_data = self.clone();

        // sanitize values that can't be serialized, i.e. infs
        json_data.for_each_bound(sanitize);

        let json = serde_json::to_string(&json_data)?;
        file.write_all(json.as_bytes())?;

        Ok(())
    }

    pub fn read_from_file(file: &mut File) -> Result<Self, io::Error> {
        let mut buffer = String::new();
        file.read_to_string(&mut buffer)?;
        let mut json_data: Self = serde_json::from_str(&buffer)?;

        // restore sanitized values to their (likely) original values
        json_data.for_each_bound(desanitize);

        check_problem_dimensions(
            &json_data.problem,
            &json_data.constraints,
            json_data.bounds.as_ref(),
            &json_data.x0,
        )
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        Ok(json_data)
    }

    fn for_each_bound(&mut self, f: fn(&mut T)) {
        let lc = &mut self.constraints;
        lc.lower.iter_mut().chain(lc.upper.iter_mut()).for_each(f);
        if let Some(bounds) = self.bounds.as_mut() {
            bounds.lower.iter_mut().chain(bounds.upper.iter_mut()).for_each(f);
        }
        f(&mut self.settings.infinite_bound);
    }
}

fn sanitize<T: FloatT>(v: &mut T) {
    if *v == T::infinity() {
        *v = T::max_value();
    } else if *v == T::neg_infinity() {
        *v = T::min_value();
    }
}

fn desanitize<T: FloatT>(v: &mut T) {
    if *v == T::max_value() {
        *v = T::infinity();
    } else if *v == T::min_value() {
        *v = T::neg_infinity();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Seek, SeekFrom};

    fn test_problem() -> QpsolProblem<f64> {
        let qp = QuadraticProgram::new(Matrix::identity(2), vec![-1., -1.]).unwrap();
        let lc = LinearConstraints::new(
            Matrix::from(&[[1., 1.]]),
            vec![f64::NEG_INFINITY],
            vec![1.],
        )
        .unwrap();
        let bnds = Bounds::new(vec![0., 0.], vec![f64::INFINITY; 2]).unwrap();
        let settings = QpsolSettingsBuilder::default()
            .iteration_limit(20)
            .build()
            .unwrap();
        QpsolProblem::new(qp, lc, Some(bnds), settings, vec![0.; 2]).unwrap()
    }

    #[test]
    fn test_json_io() {
        let data = test_problem();
        let result = data.minimize(&mut NativeQpsol::new()).unwrap();

        // write the problem to a file
        let mut file = tempfile::tempfile().unwrap();
        data.write_to_file(&mut file).unwrap();

        // read the problem from the file
        file.seek(SeekFrom::Start(0)).unwrap();
        let data2 = QpsolProblem::<f64>::read_from_file(&mut file).unwrap();
        assert_eq!(data, data2);

        let result2 = data2.minimize(&mut NativeQpsol::new()).unwrap();
        assert_eq!(result.x, result2.x);
        assert_eq!(result.multipliers, result2.multipliers);
    }

    #[test]
    fn test_sanitize() {
        let mut v = [f64::INFINITY, f64::NEG_INFINITY, 1.5];
        v.iter_mut().for_each(sanitize);
        assert!(v.iter().all(|x| x.is_finite()));
        v.iter_mut().for_each(desanitize);
        assert_eq!(v, [f64::INFINITY, f64::NEG_INFINITY, 1.5]);
    }

    #[test]
    fn test_bad_dimensions_rejected() {
        let mut data = test_problem();
        data.x0 = vec![0.; 3];

        let mut file = tempfile::tempfile().unwrap();
        data.write_to_file(&mut file).unwrap();
        file.seek(SeekFrom::Start(0)).unwrap();
        let err = QpsolProblem::<f64>::read_from_file(&mut file).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
