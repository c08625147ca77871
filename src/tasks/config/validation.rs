//! Post-processing that turns deserialized settings into something the engine can run.

use crate::Settings;
use failure::Error;
use linfit_regression::{Experiment, Line};

/// Settings that have been checked by the regression engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSettings {
    pub experiment: Experiment,
    pub seed: Option<u64>,
}

impl Settings {
    pub fn validate(self) -> Result<ValidatedSettings, Error> {
        let Settings {
            true_intercept, true_slope, grid, noise_scales,
            replicate_count, seed, chi_square,
        } = self;

        let experiment = Experiment {
            true_line: Line { intercept: true_intercept, slope: true_slope },
            grid,
            noise_scales,
            replicate_count,
            chi_square,
        };
        experiment.validate()?;

        Ok(ValidatedSettings { experiment, seed })
    }
}
