/* ********************************************************************** **
**  This file is part of linfit.                                          **
**                                                                        **
**  linfit is free software: you can redistribute it and/or modify it     **
**  under the terms of the GNU General Public License as published by the **
**  Free Software Foundation, either version 3 of the License, or (at     **
**  your option) any later version.                                       **
**                                                                        **
**      http://www.gnu.org/licenses/                                      **
**                                                                        **
** Do note that, while the whole of linfit is licensed under the GPL,     **
** many parts of it are licensed under more permissive terms.             **
** ********************************************************************** */

use crate::FailResult;
use crate::filetypes::{FitJson, Json, Save, TrialsJson, TrialsRow};
use crate::ui::color::ColorByRange;

use linfit_regression::{run_trials, Outcome};
use linfit_tasks_config::ValidatedSettings;

use ansi_term::{Colour, Style};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::Path;

/// Every run is seeded so that it can be reproduced from the log.
fn resolve_seed(seed: Option<u64>) -> u64 {
    match seed {
        Some(seed) => seed,
        None => {
            let seed = rand::random();
            info!("No seed was configured; using seed {}.", seed);
            seed
        },
    }
}

/// Simulate one dataset, fit it, and report the results.
pub fn run_fit(settings: &ValidatedSettings, output: Option<&Path>) -> FailResult<FitJson> {
    let ValidatedSettings { experiment, seed } = settings;
    let seed = resolve_seed(*seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let outcome = experiment.run(&mut rng)?;
    log_outcome(&outcome);
    info!(
        "True values: intercept = {}, slope = {}",
        experiment.true_line.intercept, experiment.true_line.slope,
    );

    let json = FitJson::new(seed, experiment.true_line, &outcome);
    if let Some(path) = output {
        Json(&json).save(path)?;
        info!("Wrote plot data to '{}'", path.display());
    }
    Ok(json)
}

fn log_outcome(outcome: &Outcome) {
    for (x, row) in outcome.x.iter().zip(outcome.replicates.rows()) {
        trace!("Values at x = {}: {:?}", x, row);
    }
    debug!("X values: {:?}", outcome.x);
    debug!("Mean Y values: {:?}", outcome.summary.mean);
    debug!("Y standard deviation: {:?}", outcome.summary.std_dev);

    let fit = &outcome.fit;
    info!(
        "Fitted values: intercept = {} +/- {}, slope = {} +/- {}",
        fit.line.intercept, fit.intercept_error,
        fit.line.slope, fit.slope_error,
    );

    let chi2 = &outcome.chi_square;
    let reduced = chi2.reduced();
    info!("chi2/NDF = {} / {} = {} ({:?})", chi2.value, chi2.ndf, chi2_colors().paint_as(&reduced, reduced), chi2.kind);
}

/// Highlights a reduced chi-square far from 1.
fn chi2_colors() -> ColorByRange<f64> {
    ColorByRange::new(vec![
        (3.0, Colour::Red.bold()),
        (0.2, Style::new()),
    ], Colour::Yellow.normal())
}

/// Repeat the experiment at each noise factor and report the spread of the fits.
pub fn run_fit_trials(
    settings: &ValidatedSettings,
    n_trials: usize,
    noise_factors: &[f64],
    output: Option<&Path>,
) -> FailResult<TrialsJson> {
    let ValidatedSettings { experiment, seed } = settings;
    let seed = resolve_seed(*seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut rows = vec![];
    for &factor in noise_factors {
        let stats = run_trials(&experiment.with_noise_factor(factor), n_trials, &mut rng)?;
        info!(
            "noise x{}: intercept = {:.5} (sd {:.5}), slope = {:.5} (sd {:.5}), mean chi2/NDF = {:.4}",
            factor,
            stats.intercept.mean(), stats.intercept.std_dev(),
            stats.slope.mean(), stats.slope.std_dev(),
            stats.reduced_chi_square.mean(),
        );
        rows.push(TrialsRow::new(factor, &stats));
    }

    let json = TrialsJson { seed, trials: n_trials, rows };
    if let Some(path) = output {
        Json(&json).save(path)?;
        info!("Wrote trial statistics to '{}'", path.display());
    }
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use linfit_tasks_config::Settings;

    fn seeded(seed: u64) -> ValidatedSettings {
        Settings { seed: Some(seed), ..Settings::default() }.validate().unwrap()
    }

    #[test]
    fn seeded_fits_are_reproducible() {
        let a = run_fit(&seeded(10), None).unwrap();
        let b = run_fit(&seeded(10), None).unwrap();
        let c = run_fit(&seeded(11), None).unwrap();
        assert_eq!(a, b);
        assert_ne!(a.y, c.y);
        assert_eq!(a.seed, 10);
        assert_eq!(a.chi_square.ndf, 6);
    }

    #[test]
    fn trials_report_each_factor() {
        let json = run_fit_trials(&seeded(3), 50, &[1.0, 2.0, 4.0], None).unwrap();
        assert_eq!(json.trials, 50);
        let factors: Vec<_> = json.rows.iter().map(|row| row.noise_factor).collect();
        assert_eq!(factors, vec![1.0, 2.0, 4.0]);
        assert!(json.rows[0].slope.std_dev < json.rows[2].slope.std_dev);
    }

    #[test]
    fn single_trial_is_an_error() {
        assert!(run_fit_trials(&seeded(3), 1, &[1.0], None).is_err());
    }
}
