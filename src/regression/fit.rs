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

//! Closed-form weighted least squares for a straight line.

use crate::Result;
use crate::error::{RegressionError, check_same_len, check_finite, check_positive};

use itertools::izip;
use serde::{Serialize, Deserialize};

/// `D` is rejected when it is no larger than this fraction of `S * Sxx`.
///
/// By Cauchy-Schwarz, `0 <= D <= S * Sxx`, with `D == 0` exactly when all
/// points share a single x value.
pub const DEGENERATE_REL_TOL: f64 = 1e-12;

/// The line `y = intercept + slope * x`.
#[derive(Serialize, Deserialize)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Line {
    pub intercept: f64,
    pub slope: f64,
}

impl Line {
    pub fn eval(&self, x: f64) -> f64 { self.intercept + self.slope * x }
}

/// Output of [`fit_line`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LineFit {
    pub line: Line,
    /// Standard error of the intercept, `sqrt(Sxx / D)`.
    pub intercept_error: f64,
    /// Standard error of the slope, `sqrt(S / D)`.
    pub slope_error: f64,
    /// Covariance of intercept and slope, `-Sx / D`.
    pub covariance: f64,
}

/// Weighted sums over all points, with `w = 1 / sigma^2`.
#[derive(Debug, Default, Copy, Clone)]
struct WeightedSums {
    s: f64,
    sx: f64,
    sy: f64,
    sxx: f64,
    sxy: f64,
}

impl WeightedSums {
    fn accumulate(x: &[f64], y: &[f64], sigma: &[f64]) -> Self {
        let mut sums = WeightedSums::default();
        for (&x, &y, &sigma) in izip!(x, y, sigma) {
            let w = 1.0 / (sigma * sigma);
            sums.s += w;
            sums.sx += w * x;
            sums.sy += w * y;
            sums.sxx += w * x * x;
            sums.sxy += w * x * y;
        }
        sums
    }

    fn determinant(&self) -> f64 { self.s * self.sxx - self.sx * self.sx }
}

fn check_points(x: &[f64], y: &[f64], sigma: &[f64]) -> Result<()> {
    check_same_len("x", x.len(), "y", y.len())?;
    check_same_len("x", x.len(), "sigma", sigma.len())?;
    if x.len() < 3 {
        return Err(RegressionError::TooFewPoints(x.len()));
    }
    check_finite("x", x)?;
    check_finite("y", y)?;
    check_positive("sigma", sigma)?;
    Ok(())
}

/// Fit `y = intercept + slope * x`, weighting each point by `1 / sigma^2`.
///
/// `sigma` is the uncertainty on each `y`, and must be strictly positive.
/// At least three points are required so that the fit retains a degree of
/// freedom for [`chi_square`].
pub fn fit_line(x: &[f64], y: &[f64], sigma: &[f64]) -> Result<LineFit> {
    check_points(x, y, sigma)?;

    let sums = WeightedSums::accumulate(x, y, sigma);
    trace!("weighted sums: {:?}", sums);

    let WeightedSums { s, sx, sy, sxx, sxy } = sums;
    let d = sums.determinant();
    let scale = s * sxx;
    // (negated so that NaN from overflowing weights is caught too)
    if !(d > DEGENERATE_REL_TOL * scale) {
        return Err(RegressionError::DegenerateFit { determinant: d, scale });
    }

    let line = Line {
        intercept: (sxx * sy - sx * sxy) / d,
        slope: (s * sxy - sx * sy) / d,
    };
    Ok(LineFit {
        line,
        intercept_error: f64::sqrt(sxx / d),
        slope_error: f64::sqrt(s / d),
        covariance: -sx / d,
    })
}

/// Which quantity is summed over the normalized residuals
/// `d_i = (y_i - line(x_i)) / sigma_i`.
#[derive(Serialize, Deserialize)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ChiSquareKind {
    /// `sum d_i^2`, the usual chi-square.
    Squared,
    /// `sum d_i`.
    ///
    /// Only useful for comparing against results that summed unsquared
    /// residuals.  For an unweighted fit it is identically zero, since it
    /// is one of the normal equations.
    SignedResiduals,
}

impl Default for ChiSquareKind {
    fn default() -> Self { ChiSquareKind::Squared }
}

#[derive(Serialize)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ChiSquare {
    pub kind: ChiSquareKind,
    pub value: f64,
    /// Degrees of freedom: the number of points minus the two fit parameters.
    pub ndf: usize,
}

impl ChiSquare {
    pub fn reduced(&self) -> f64 { self.value / self.ndf as f64 }
}

/// Goodness of fit of `line` against the points.  Purely diagnostic.
pub fn chi_square(
    x: &[f64],
    y: &[f64],
    sigma: &[f64],
    line: &Line,
    kind: ChiSquareKind,
) -> Result<ChiSquare> {
    check_points(x, y, sigma)?;

    let residuals = izip!(x, y, sigma).map(|(&x, &y, &sigma)| (y - line.eval(x)) / sigma);
    let value = match kind {
        ChiSquareKind::Squared => residuals.map(|d| d * d).sum(),
        ChiSquareKind::SignedResiduals => residuals.sum(),
    };
    Ok(ChiSquare { kind, value, ndf: x.len() - 2 })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hand_computed_unweighted() {
        let x = [0.0, 1.0, 2.0];
        let y = [1.0, 2.0, 4.0];
        let sigma = [1.0; 3];

        // S = 3, Sx = 3, Sy = 7, Sxx = 5, Sxy = 10, D = 6
        let fit = fit_line(&x, &y, &sigma).unwrap();
        assert_close!(abs=1e-12, fit.line.slope, 1.5);
        assert_close!(abs=1e-12, fit.line.intercept, 5.0 / 6.0);
        assert_close!(abs=1e-12, fit.slope_error, f64::sqrt(0.5));
        assert_close!(abs=1e-12, fit.intercept_error, f64::sqrt(5.0 / 6.0));
        assert_close!(abs=1e-12, fit.covariance, -0.5);

        // residuals are (1/6, -1/3, 1/6)
        let chi2 = chi_square(&x, &y, &sigma, &fit.line, ChiSquareKind::Squared).unwrap();
        assert_eq!(chi2.ndf, 1);
        assert_close!(abs=1e-12, chi2.value, 1.0 / 6.0);
        assert_close!(abs=1e-12, chi2.reduced(), 1.0 / 6.0);

        let signed = chi_square(&x, &y, &sigma, &fit.line, ChiSquareKind::SignedResiduals).unwrap();
        assert_close!(abs=1e-12, signed.value, 0.0);
    }

    #[test]
    fn points_on_a_line_are_fit_exactly() {
        let line = Line { intercept: -3.0, slope: 0.25 };
        let x = [1.0, 2.0, 4.0, 8.0, 16.0];
        let y: Vec<_> = x.iter().map(|&x| line.eval(x)).collect();
        let sigma = [0.5, 3.0, 1.0, 0.1, 7.0];

        let fit = fit_line(&x, &y, &sigma).unwrap();
        assert_close!(abs=1e-12, fit.line.intercept, line.intercept);
        assert_close!(abs=1e-12, fit.line.slope, line.slope);

        let chi2 = chi_square(&x, &y, &sigma, &fit.line, ChiSquareKind::Squared).unwrap();
        assert_close!(abs=1e-20, chi2.value, 0.0);
    }

    #[test]
    fn weights_suppress_uncertain_points() {
        // the last point is an outlier, but its uncertainty is enormous
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [0.0, 1.0, 2.0, 100.0];

        let trusting = fit_line(&x, &y, &[1.0, 1.0, 1.0, 1.0]).unwrap();
        let weighted = fit_line(&x, &y, &[1.0, 1.0, 1.0, 1e6]).unwrap();

        assert!(trusting.line.slope > 10.0);
        assert_close!(abs=1e-6, weighted.line.slope, 1.0);
        assert_close!(abs=1e-6, weighted.line.intercept, 0.0);
    }

    #[test]
    fn uniform_sigma_scales_errors_but_not_coefficients() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.9, 5.1, 7.2, 8.8];

        let a = fit_line(&x, &y, &[1.0; 4]).unwrap();
        let b = fit_line(&x, &y, &[2.0; 4]).unwrap();
        assert_close!(rel=1e-12, a.line.slope, b.line.slope);
        assert_close!(rel=1e-12, a.line.intercept, b.line.intercept);
        assert_close!(rel=1e-12, 2.0 * a.slope_error, b.slope_error);
        assert_close!(rel=1e-12, 2.0 * a.intercept_error, b.intercept_error);
    }

    #[test]
    fn two_points_are_rejected() {
        let err = fit_line(&[1.0, 2.0], &[3.0, 5.0], &[1.0, 1.0]).unwrap_err();
        assert_eq!(err, RegressionError::TooFewPoints(2));

        let line = Line { intercept: 1.0, slope: 2.0 };
        let err = chi_square(&[1.0, 2.0], &[3.0, 5.0], &[1.0, 1.0], &line, ChiSquareKind::Squared).unwrap_err();
        assert_eq!(err, RegressionError::TooFewPoints(2));
    }

    #[test]
    fn shared_x_is_degenerate() {
        let x = [3.0; 4];
        let y = [1.0, 2.0, 3.0, 4.0];
        match fit_line(&x, &y, &[1.0, 2.0, 1.0, 0.5]) {
            Err(RegressionError::DegenerateFit { .. }) => {},
            r => panic!("expected degenerate fit, got {:?}", r),
        }
    }

    #[test]
    fn bad_sigma_is_rejected() {
        let x = [1.0, 2.0, 3.0];
        let y = [1.0, 2.0, 3.0];
        match fit_line(&x, &y, &[1.0, 0.0, 1.0]) {
            Err(RegressionError::NonPositiveScale { index: 1, .. }) => {},
            r => panic!("expected rejection of zero sigma, got {:?}", r),
        }
        match fit_line(&x, &y, &[1.0, 1.0, -2.0]) {
            Err(RegressionError::NonPositiveScale { index: 2, .. }) => {},
            r => panic!("expected rejection of negative sigma, got {:?}", r),
        }
        match fit_line(&x, &y, &[std::f64::NAN, 1.0, 1.0]) {
            Err(RegressionError::NonFinite { index: 0, .. }) => {},
            r => panic!("expected rejection of NaN sigma, got {:?}", r),
        }
    }

    #[test]
    fn length_mismatch() {
        match fit_line(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0], &[1.0, 1.0]) {
            Err(RegressionError::LengthMismatch { left_len: 3, right_len: 2, .. }) => {},
            r => panic!("expected length mismatch, got {:?}", r),
        }
    }
}
