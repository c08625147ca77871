/* ************************************************************************ **
** This file is part of linfit, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
**                                                                          **
** Be aware that not all of linfit is provided under this permissive        **
** license, and that the project as a whole is licensed under the GPL 3.0.  **
** ************************************************************************ */

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum RegressionError {
    #[error("{what} must be strictly positive (got {value} at index {index})")]
    NonPositiveScale { what: &'static str, index: usize, value: f64 },

    #[error("{what} contains a non-finite value ({value} at index {index})")]
    NonFinite { what: &'static str, index: usize, value: f64 },

    #[error("at least 2 replicates per point are required (got {0})")]
    TooFewReplicates(usize),

    /// Two parameters are fitted, so at least one degree of freedom needs three points.
    #[error("at least 3 points are required for a line fit (got {0})")]
    TooFewPoints(usize),

    #[error("length mismatch: {left} has {left_len} values, but {right} has {right_len}")]
    LengthMismatch {
        left: &'static str,
        left_len: usize,
        right: &'static str,
        right_len: usize,
    },

    #[error("degenerate fit: weighted determinant {determinant:e} is zero to within tolerance of {scale:e}")]
    DegenerateFit { determinant: f64, scale: f64 },

    #[error("at least 2 trials are required to estimate a spread (got {0})")]
    TooFewTrials(usize),

    /// Every replicate at a point came out identical, leaving no uncertainty to weight by.
    /// Happens when the noise scale is below the resolution of the values.
    #[error("all replicates at point {index} are identical, so there is no observed spread to weight the fit by")]
    ZeroObservedSpread { index: usize },
}

pub(crate) fn check_same_len(
    left: &'static str, left_len: usize,
    right: &'static str, right_len: usize,
) -> Result<(), RegressionError> {
    match left_len == right_len {
        true => Ok(()),
        false => Err(RegressionError::LengthMismatch { left, left_len, right, right_len }),
    }
}

pub(crate) fn check_finite(what: &'static str, values: &[f64]) -> Result<(), RegressionError> {
    match values.iter().position(|x| !x.is_finite()) {
        None => Ok(()),
        Some(index) => Err(RegressionError::NonFinite { what, index, value: values[index] }),
    }
}

/// Also rejects NaN and infinity.
pub(crate) fn check_positive(what: &'static str, values: &[f64]) -> Result<(), RegressionError> {
    check_finite(what, values)?;
    match values.iter().position(|&x| !(x > 0.0)) {
        None => Ok(()),
        Some(index) => Err(RegressionError::NonPositiveScale { what, index, value: values[index] }),
    }
}
