//! Computed values derived from a record's fields.
//!
//! A computed method never fails its caller. Any error inside it turns into
//! an absent value, while the cause stays available for diagnostics.

use thiserror::Error;
use tracing::debug;

use crate::error::TabbedError;

/// Why a computed value is absent.
#[derive(Debug, Error)]
pub enum ComputeError {
    /// A field the computation needs is missing or has the wrong type.
    #[error("field access failed: {0}")]
    Field(#[from] TabbedError),

    /// The operation has no real result for these inputs.
    #[error("undefined result: {0}")]
    Undefined(String),
}

/// The outcome of a computed method: a value, or the reason there is none.
#[derive(Debug)]
pub struct Computed<T> {
    inner: Result<T, ComputeError>,
}

impl<T> Computed<T> {
    pub fn present(value: T) -> Self {
        Self { inner: Ok(value) }
    }

    pub fn absent(cause: ComputeError) -> Self {
        Self { inner: Err(cause) }
    }

    pub fn value(&self) -> Option<&T> {
        self.inner.as_ref().ok()
    }

    pub fn into_option(self) -> Option<T> {
        self.inner.ok()
    }

    pub fn is_absent(&self) -> bool {
        self.inner.is_err()
    }

    /// The discarded failure, if the value is absent.
    pub fn cause(&self) -> Option<&ComputeError> {
        self.inner.as_ref().err()
    }
}

impl<T: Copy> Computed<T> {
    pub fn get(&self) -> Option<T> {
        self.value().copied()
    }
}

impl<T> From<Computed<T>> for Option<T> {
    fn from(computed: Computed<T>) -> Self {
        computed.into_option()
    }
}

/// Run a fallible computation, turning failure into an absent value.
pub fn compute<T>(f: impl FnOnce() -> Result<T, ComputeError>) -> Computed<T> {
    match f() {
        Ok(value) => Computed::present(value),
        Err(cause) => {
            debug!(%cause, "computed value absent");
            Computed::absent(cause)
        }
    }
}

/// `base.powf(exponent)`, failing when the result is not a finite real number.
pub fn checked_powf(base: f64, exponent: f64) -> Result<f64, ComputeError> {
    finite(base.powf(exponent), || format!("{} ^ {}", base, exponent))
}

/// `numerator / denominator`, failing on division by zero or a non-finite result.
pub fn checked_div(numerator: f64, denominator: f64) -> Result<f64, ComputeError> {
    if denominator == 0.0 {
        return Err(ComputeError::Undefined(format!("{} / 0", numerator)));
    }
    finite(numerator / denominator, || format!("{} / {}", numerator, denominator))
}

fn finite(result: f64, describe: impl FnOnce() -> String) -> Result<f64, ComputeError> {
    if result.is_finite() {
        Ok(result)
    } else {
        Err(ComputeError::Undefined(describe()))
    }
}
