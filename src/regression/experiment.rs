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

use crate::Result;
use crate::dataset::{self, Replicates, Summary};
use crate::error::{RegressionError, check_same_len, check_finite, check_positive};
use crate::fit::{self, ChiSquare, ChiSquareKind, Line, LineFit};

use rand::Rng;
use serde::Serialize;

/// Everything needed to simulate and fit one dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Experiment {
    /// The line that the replicates are drawn around.
    pub true_line: Line,
    pub grid: Vec<f64>,
    /// Standard deviation of the noise at each grid point.
    pub noise_scales: Vec<f64>,
    pub replicate_count: usize,
    pub chi_square: ChiSquareKind,
}

/// Every intermediate product of [`Experiment::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub x: Vec<f64>,
    pub replicates: Replicates,
    pub summary: Summary,
    pub fit: LineFit,
    pub chi_square: ChiSquare,
}

/// The parallel sequences consumed by an error-bar plot.
#[derive(Serialize)]
#[derive(Debug, Clone, PartialEq)]
pub struct PlotData {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub error: Vec<f64>,
    /// The fitted line evaluated at each `x`.
    pub fitted: Vec<f64>,
}

impl Experiment {
    /// Eight points on `y = 1 + 2x` with uneven noise, measured ten times each.
    pub fn reference() -> Self {
        Experiment {
            true_line: Line { intercept: 1.0, slope: 2.0 },
            grid: (1..=8).map(f64::from).collect(),
            noise_scales: vec![1.0, 1.0, 2.0, 3.0, 1.0, 2.0, 3.0, 1.0],
            replicate_count: 10,
            chi_square: ChiSquareKind::Squared,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let result = self._validate();
        if let Err(e) = &result {
            debug!("Rejected experiment: {}", e);
        }
        result
    }

    fn _validate(&self) -> Result<()> {
        check_same_len("grid", self.grid.len(), "noise scales", self.noise_scales.len())?;
        if self.grid.len() < 3 {
            return Err(RegressionError::TooFewPoints(self.grid.len()));
        }
        if self.replicate_count < 2 {
            return Err(RegressionError::TooFewReplicates(self.replicate_count));
        }
        check_finite("true line", &[self.true_line.intercept, self.true_line.slope])?;
        check_finite("grid", &self.grid)?;
        check_positive("noise scales", &self.noise_scales)?;
        Ok(())
    }

    /// Copy with every noise scale multiplied by `factor`.
    pub fn with_noise_factor(&self, factor: f64) -> Self {
        Experiment {
            noise_scales: self.noise_scales.iter().map(|s| s * factor).collect(),
            ..self.clone()
        }
    }

    /// Generate, summarize, fit, and evaluate.
    ///
    /// The configuration is validated before anything is drawn from `rng`.
    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Outcome> {
        self.validate()?;

        let replicates = dataset::generate(
            &self.true_line,
            &self.grid,
            &self.noise_scales,
            self.replicate_count,
            rng,
        )?;
        let summary = replicates.summarize();
        if let Some(index) = summary.std_dev.iter().position(|&sd| sd == 0.0) {
            return Err(RegressionError::ZeroObservedSpread { index });
        }

        let x = &self.grid[..];
        let fit = fit::fit_line(x, &summary.mean, &summary.std_dev)?;
        let chi_square = fit::chi_square(x, &summary.mean, &summary.std_dev, &fit.line, self.chi_square)?;

        Ok(Outcome { x: x.to_vec(), replicates, summary, fit, chi_square })
    }
}

impl Outcome {
    pub fn plot_data(&self) -> PlotData {
        PlotData {
            x: self.x.clone(),
            y: self.summary.mean.clone(),
            error: self.summary.std_dev.clone(),
            fitted: self.x.iter().map(|&x| self.fit.line.eval(x)).collect(),
        }
    }
}
