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

//! Weighted linear regression of simulated replicate measurements.
//!
//! The pipeline is `generate -> summarize -> fit -> evaluate`, and is
//! packaged up as [`Experiment::run`].  Each stage is also exposed on its
//! own so that callers can feed in data that did not come from the
//! generator.
//!
//! Fit coefficients always refer to the model `y = intercept + slope * x`.

#[macro_use] extern crate log;
#[cfg(test)] #[macro_use] extern crate linfit_assert_close;

pub mod dataset;
pub mod fit;
pub mod trials;
mod experiment;
mod error;

pub use crate::dataset::{generate, Replicates, Summary};
pub use crate::error::RegressionError;
pub use crate::experiment::{Experiment, Outcome, PlotData};
pub use crate::fit::{chi_square, fit_line, ChiSquare, ChiSquareKind, Line, LineFit};
pub use crate::trials::{run_trials, RunningStats, StatsSummary, TrialStats};

pub type Result<T> = std::result::Result<T, RegressionError>;
