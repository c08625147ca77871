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

//! Files written for the benefit of plotting scripts.

use crate::FailResult;

use linfit_regression::{ChiSquare, ChiSquareKind, Line, LineFit, Outcome, StatsSummary, TrialStats};
use path_abs::{FileRead, FileWrite};
use serde::{Serialize, Deserialize};
use std::path::Path;

pub trait Load: Sized {
    fn load<P: AsRef<Path>>(path: P) -> FailResult<Self>;
}

pub trait Save {
    fn save<P: AsRef<Path>>(&self, path: P) -> FailResult<()>;
}

/// Adapter for `Load`/`Save` that serializes as JSON.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Json<T: ?Sized>(pub T);

impl<T> Load for Json<T> where T: for<'de> Deserialize<'de> {
    fn load<P: AsRef<Path>>(path: P) -> FailResult<Json<T>>
    {Ok(serde_json::from_reader(FileRead::open(path)?)?).map(Json)}
}

impl<T> Save for Json<T> where T: Serialize {
    fn save<P: AsRef<Path>>(&self, path: P) -> FailResult<()>
    {Ok(serde_json::to_writer_pretty(FileWrite::create(path)?, &self.0)?)}
}

/// Output of `linfit`.  `x`, `y`, `error` and `fitted` are parallel.
#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct FitJson {
    pub seed: u64,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub error: Vec<f64>,
    pub fitted: Vec<f64>,
    pub fit: FitCoefficients,
    pub true_line: Line,
    pub chi_square: ChiSquareJson,
}

#[derive(Serialize, Deserialize)]
#[derive(Debug, Copy, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct FitCoefficients {
    pub intercept: f64,
    pub slope: f64,
    pub intercept_error: f64,
    pub slope_error: f64,
    pub covariance: f64,
}

#[derive(Serialize, Deserialize)]
#[derive(Debug, Copy, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ChiSquareJson {
    pub kind: ChiSquareKind,
    pub value: f64,
    pub ndf: usize,
    pub reduced: f64,
}

impl FitJson {
    pub fn new(seed: u64, true_line: Line, outcome: &Outcome) -> Self {
        let plot = outcome.plot_data();
        FitJson {
            seed,
            x: plot.x,
            y: plot.y,
            error: plot.error,
            fitted: plot.fitted,
            fit: outcome.fit.into(),
            true_line,
            chi_square: outcome.chi_square.into(),
        }
    }
}

impl From<LineFit> for FitCoefficients {
    fn from(fit: LineFit) -> Self {
        FitCoefficients {
            intercept: fit.line.intercept,
            slope: fit.line.slope,
            intercept_error: fit.intercept_error,
            slope_error: fit.slope_error,
            covariance: fit.covariance,
        }
    }
}

impl From<ChiSquare> for ChiSquareJson {
    fn from(chi2: ChiSquare) -> Self {
        ChiSquareJson {
            kind: chi2.kind,
            value: chi2.value,
            ndf: chi2.ndf,
            reduced: chi2.reduced(),
        }
    }
}

/// Output of `linfit-trials`.
#[derive(Serialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct TrialsJson {
    pub seed: u64,
    pub trials: usize,
    pub rows: Vec<TrialsRow>,
}

#[derive(Serialize)]
#[derive(Debug, Copy, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct TrialsRow {
    pub noise_factor: f64,
    pub intercept: StatsSummary,
    pub slope: StatsSummary,
    pub reduced_chi_square: StatsSummary,
}

impl TrialsRow {
    pub fn new(noise_factor: f64, stats: &TrialStats) -> Self {
        TrialsRow {
            noise_factor,
            intercept: stats.intercept.into(),
            slope: stats.slope.into(),
            reduced_chi_square: stats.reduced_chi_square.into(),
        }
    }
}
