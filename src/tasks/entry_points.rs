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
use crate::cmd;
use crate::ui::cfg_merging::ConfigSources;
use crate::ui::cli_deserialize::CliDeserialize;
use crate::ui::logging::GlobalLogger;

use clap::{App, Arg, ArgMatches};
use failure::bail;
use linfit_tasks_config::{Settings, ValidatedSettings, YamlRead};
use std::ffi::OsStr;
use std::path::PathBuf;

fn wrap_result_main<F>(main: F)
where F: FnOnce() -> FailResult<()>,
{
    main().unwrap_or_else(|e| {
        // errors in argument parsing happen before the logger exists
        if log::max_level() == log::LevelFilter::Off {
            for cause in e.iter_chain() {
                eprintln!("ERROR: {}", cause);
            }
            std::process::exit(1);
        }

        for cause in e.iter_chain() {
            error!("{}", cause);
        }

        if std::env::var_os("RUST_BACKTRACE") == Some(OsStr::new("1").to_owned()) {
            error!("{}", e.backtrace());
        }
        std::process::exit(1);
    });
}

/// Arguments shared by every entry point.
struct CommonArgs {
    settings: ValidatedSettings,
    verbosity: u64,
    log_file: Option<PathBuf>,
    output: Option<PathBuf>,
}

impl CliDeserialize for CommonArgs {
    fn _augment_clap_app<'a, 'b>(app: App<'a, 'b>) -> App<'a, 'b> {
        app.args(&[
            Arg::with_name("config")
                .short("c").long("config").value_name("CONFIG")
                .takes_value(true).multiple(true).number_of_values(1)
                .help("\
                    config yaml, provided as either a filepath, or as an embedded literal \
                    written as '--config KEY:VALID_YAML' or '--config :VALID_YAML'. \
                    When provided multiple times, later values take precedence. \
                    Omitted settings take the values of the eight-point reference scenario.\
                "),
            Arg::with_name("seed")
                .long("seed").value_name("SEED").takes_value(true)
                .help("seed for the random number generator (overrides the config)"),
            Arg::with_name("output")
                .short("o").long("output").value_name("OUTPUT").takes_value(true)
                .help("write results to this JSON file"),
            Arg::with_name("log")
                .long("log").value_name("LOGFILE").takes_value(true)
                .help("also write the log to this file"),
            Arg::with_name("verbose")
                .short("v").long("verbose").multiple(true)
                .help("log every replicate and the intermediate sums"),
        ])
    }

    fn _resolve_args(m: &ArgMatches<'_>) -> FailResult<Self> {
        let sources = ConfigSources::resolve_from_args(m.values_of("config").into_iter().flatten())?;
        let mut settings = Settings::from_value(sources.into_effective_yaml())?;
        if let Some(seed) = m.value_of("seed") {
            settings.seed = Some(seed.parse()?);
        }

        Ok(CommonArgs {
            settings: settings.validate()?,
            verbosity: m.occurrences_of("verbose"),
            log_file: m.value_of("log").map(PathBuf::from),
            output: m.value_of("output").map(PathBuf::from),
        })
    }
}

impl CommonArgs {
    fn start_logging(&self) -> FailResult<()> {
        let mut logger = GlobalLogger::default();
        logger.verbosity(self.verbosity);
        if let Some(path) = &self.log_file {
            logger.path(path);
        }
        logger.apply()
    }
}

struct TrialArgs {
    n_trials: usize,
    noise_factors: Vec<f64>,
}

impl CliDeserialize for TrialArgs {
    fn _augment_clap_app<'a, 'b>(app: App<'a, 'b>) -> App<'a, 'b> {
        app.args(&[
            Arg::with_name("trials")
                .short("n").long("trials").value_name("TRIALS").takes_value(true)
                .help("number of datasets simulated per noise factor [default: 1000]"),
            Arg::with_name("noise_factor")
                .long("noise-factor").value_name("FACTOR")
                .takes_value(true).multiple(true).number_of_values(1)
                .help("multiply every noise scale by this factor; may be repeated [default: 1 and 2]"),
        ])
    }

    fn _resolve_args(m: &ArgMatches<'_>) -> FailResult<Self> {
        let n_trials = match m.value_of("trials") {
            Some(s) => s.parse()?,
            None => 1000,
        };
        let noise_factors = match m.values_of("noise_factor") {
            Some(values) => values.map(|s| s.parse()).collect::<Result<Vec<f64>, _>>()?,
            None => vec![1.0, 2.0],
        };
        if let Some(&bad) = noise_factors.iter().find(|&&k| !(k > 0.0 && k.is_finite())) {
            bail!("noise factors must be positive (got {})", bad);
        }
        Ok(TrialArgs { n_trials, noise_factors })
    }
}

// -------------------------------------------------------------------------------------

pub fn linfit() {
    wrap_result_main(|| {
        let (app, de) = CommonArgs::augment_clap_app({
            App::new("linfit")
                .version(env!("CARGO_PKG_VERSION"))
                .about("Simulate noisy measurements of a line and fit them by weighted least squares.")
        });
        let args = de.resolve_args(&app.get_matches())?;
        args.start_logging()?;

        cmd::run_fit(&args.settings, args.output.as_deref())?;
        Ok(())
    });
}

pub fn linfit_trials() {
    wrap_result_main(|| {
        let (app, de) = <(CommonArgs, TrialArgs)>::augment_clap_app({
            App::new("linfit-trials")
                .version(env!("CARGO_PKG_VERSION"))
                .about("Measure the spread of weighted line fits over many simulated datasets.")
        });
        let (args, trial_args) = de.resolve_args(&app.get_matches())?;
        args.start_logging()?;

        cmd::run_fit_trials(
            &args.settings,
            trial_args.n_trials,
            &trial_args.noise_factors,
            args.output.as_deref(),
        )?;
        Ok(())
    });
}
