use crate::algebra::*;
use derive_builder::Builder;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Error type returned by settings validation
pub enum SettingsError {
    /// A field holds a value outside of its legal range
    #[error("Bad value for field \"{0}\"")]
    BadFieldValue(&'static str),
}

/// Options passed to the QPSOL routine on every call.
///
/// Construct with [`QpsolSettingsBuilder`](QpsolSettingsBuilder) or
/// take the [`Default`](Default) values.
///
/// ```
/// use qpbridge::solver::QpsolSettingsBuilder;
///
/// let settings = QpsolSettingsBuilder::<f64>::default()
///     .iteration_limit(100)
///     .feasibility_tolerance(1e-10)
///     .build()
///     .unwrap();
///
/// assert_eq!(settings.itmax(3), 100);
/// ```
#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(build_fn(validate = "Self::validate"))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct QpsolSettings<T: FloatT> {
    ///maximum number of iterations.  Unset means 50 times the
    ///number of variables
    #[builder(default = "None", setter(strip_option))]
    pub iteration_limit: Option<u32>,

    ///QPSOL message level (`msglvl`).  Values > 0 also enable
    ///the adapter's banner and summary output
    #[builder(default = "0")]
    pub print_level: i32,

    ///feasibility tolerance, applied to every bound and constraint
    #[builder(default = "T::epsilon().sqrt()")]
    pub feasibility_tolerance: T,

    ///bounds with magnitude at least this large are treated as infinite
    #[builder(default = "(1e30).as_T()")]
    pub infinite_bound: T,
}

impl<T> Default for QpsolSettings<T>
where
    T: FloatT,
{
    fn default() -> QpsolSettings<T> {
        QpsolSettingsBuilder::<T>::default().build().unwrap()
    }
}

impl<T> QpsolSettings<T>
where
    T: FloatT,
{
    /// Iteration limit to pass to the routine for a problem with `n` variables
    pub fn itmax(&self, n: usize) -> usize {
        match self.iteration_limit {
            Some(itmax) => itmax as usize,
            None => 50 * n,
        }
    }

    /// Checks that the settings are valid.  Called by the builder and again
    /// by the adapter, since all fields are public.
    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_feasibility_tolerance(self.feasibility_tolerance)?;
        validate_infinite_bound(self.infinite_bound)?;
        validate_print_level(self.print_level)?;
        Ok(())
    }
}

// pre build checker (for auto-validation when using the builder)

impl From<SettingsError> for QpsolSettingsBuilderError {
    fn from(e: SettingsError) -> Self {
        QpsolSettingsBuilderError::ValidationError(e.to_string())
    }
}

/// Automatic pre-build settings validation
impl<T> QpsolSettingsBuilder<T>
where
    T: FloatT,
{
    pub fn validate(&self) -> Result<(), SettingsError> {
        if let Some(tol) = self.feasibility_tolerance {
            validate_feasibility_tolerance(tol)?;
        }
        if let Some(bigbnd) = self.infinite_bound {
            validate_infinite_bound(bigbnd)?;
        }
        if let Some(msglvl) = self.print_level {
            validate_print_level(msglvl)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------
// individual validation functions go here
// ---------------------------------------------------------

fn validate_feasibility_tolerance<T: FloatT>(tol: T) -> Result<(), SettingsError> {
    if tol > T::zero() && tol.is_finite() {
        Ok(())
    } else {
        Err(SettingsError::BadFieldValue("feasibility_tolerance"))
    }
}

fn validate_infinite_bound<T: FloatT>(bigbnd: T) -> Result<(), SettingsError> {
    // NB: may be +inf, but must be positive
    if bigbnd > T::zero() {
        Ok(())
    } else {
        Err(SettingsError::BadFieldValue("infinite_bound"))
    }
}

fn validate_print_level(msglvl: i32) -> Result<(), SettingsError> {
    if msglvl >= 0 {
        Ok(())
    } else {
        Err(SettingsError::BadFieldValue("print_level"))
    }
}

#[test]
fn test_settings_defaults() {
    let settings = QpsolSettings::<f64>::default();
    assert_eq!(settings.iteration_limit, None);
    assert_eq!(settings.itmax(3), 150);
    assert_eq!(settings.print_level, 0);
    assert_eq!(settings.feasibility_tolerance, f64::EPSILON.sqrt());
    assert_eq!(settings.infinite_bound, 1e30);
}

#[test]
fn test_settings_validate() {
    let settings = QpsolSettingsBuilder::<f64>::default()
        .feasibility_tolerance(0.0)
        .build();
    assert!(settings.is_err());

    let settings = QpsolSettingsBuilder::<f64>::default()
        .infinite_bound(-1.0)
        .build();
    assert!(settings.is_err());

    let settings = QpsolSettingsBuilder::<f64>::default().print_level(-1).build();
    assert!(settings.is_err());

    // public fields can still be broken after construction
    let mut settings = QpsolSettings::<f64>::default();
    assert!(settings.validate().is_ok());
    settings.feasibility_tolerance = f64::NAN;
    assert_eq!(
        settings.validate(),
        Err(SettingsError::BadFieldValue("feasibility_tolerance"))
    );
}
