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

//! Statistics of fit results over many independently simulated datasets.

use crate::Result;
use crate::error::RegressionError;
use crate::experiment::Experiment;

use rand::Rng;
use serde::Serialize;

/// Single-pass mean and variance (Welford's algorithm).
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct RunningStats {
    count: usize,
    mean: f64,
    m2: f64,
}

impl RunningStats {
    pub fn new() -> Self { Self::default() }

    pub fn push(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    pub fn count(&self) -> usize { self.count }

    /// NaN when empty.
    pub fn mean(&self) -> f64 {
        match self.count {
            0 => std::f64::NAN,
            _ => self.mean,
        }
    }

    /// Sample variance; NaN for fewer than two values.
    pub fn variance(&self) -> f64 {
        match self.count {
            0 | 1 => std::f64::NAN,
            n => self.m2 / (n - 1) as f64,
        }
    }

    pub fn std_dev(&self) -> f64 { self.variance().sqrt() }

    /// Standard error of the mean.
    pub fn std_error(&self) -> f64 { self.std_dev() / (self.count as f64).sqrt() }
}

#[derive(Serialize)]
#[derive(Debug, Copy, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct StatsSummary {
    pub mean: f64,
    pub std_dev: f64,
    pub std_error: f64,
}

impl From<RunningStats> for StatsSummary {
    fn from(stats: RunningStats) -> Self {
        StatsSummary {
            mean: stats.mean(),
            std_dev: stats.std_dev(),
            std_error: stats.std_error(),
        }
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct TrialStats {
    pub intercept: RunningStats,
    pub slope: RunningStats,
    pub reduced_chi_square: RunningStats,
}

/// Run the experiment `n_trials` times in sequence on the same generator.
pub fn run_trials<R: Rng + ?Sized>(
    experiment: &Experiment,
    n_trials: usize,
    rng: &mut R,
) -> Result<TrialStats> {
    if n_trials < 2 {
        return Err(RegressionError::TooFewTrials(n_trials));
    }
    experiment.validate()?;

    let mut stats = TrialStats::default();
    for trial in 0..n_trials {
        let outcome = experiment.run(rng)?;
        trace!("trial {}: {:?}", trial, outcome.fit.line);

        stats.intercept.push(outcome.fit.line.intercept);
        stats.slope.push(outcome.fit.line.slope);
        stats.reduced_chi_square.push(outcome.chi_square.reduced());
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn running_stats_match_two_pass() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let mut stats = RunningStats::new();
        assert!(stats.mean().is_nan());
        for &v in &values {
            stats.push(v);
        }
        assert_eq!(stats.count(), 8);
        assert_close!(stats.mean(), 5.0);
        assert_close!(stats.variance(), 32.0 / 7.0);
        assert_close!(stats.std_error(), f64::sqrt(32.0 / 7.0 / 8.0));
    }

    #[test]
    fn single_value_has_no_spread() {
        let mut stats = RunningStats::new();
        stats.push(3.0);
        assert_eq!(stats.mean(), 3.0);
        assert!(stats.variance().is_nan());
    }

    #[test]
    fn too_few_trials() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            run_trials(&Experiment::reference(), 1, &mut rng).unwrap_err(),
            RegressionError::TooFewTrials(1),
        );
    }

    // Doubling every noise scale quarters the weights.  The expected
    // coefficients must not move, while their spread doubles.
    #[test]
    fn weight_sensitivity() {
        let n_trials = 1000;
        let reference = Experiment::reference();
        let base = run_trials(&reference, n_trials, &mut StdRng::seed_from_u64(1)).unwrap();
        let doubled = run_trials(&reference.with_noise_factor(2.0), n_trials, &mut StdRng::seed_from_u64(2)).unwrap();

        for stats in &[base, doubled] {
            assert_eq!(stats.slope.count(), n_trials);
            assert_close!(abs=5.0 * stats.slope.std_error(), stats.slope.mean(), 2.0);
            assert_close!(abs=5.0 * stats.intercept.std_error(), stats.intercept.mean(), 1.0);
        }

        let slope_ratio = doubled.slope.std_dev() / base.slope.std_dev();
        let intercept_ratio = doubled.intercept.std_dev() / base.intercept.std_dev();
        assert!(1.7 < slope_ratio && slope_ratio < 2.35, "{}", slope_ratio);
        assert!(1.7 < intercept_ratio && intercept_ratio < 2.35, "{}", intercept_ratio);

        // the reduced chi-square is scale invariant
        assert_close!(rel=0.15, doubled.reduced_chi_square.mean(), base.reduced_chi_square.mean());
    }
}
