use crate::FailResult;
use crate::ui::color::paint;

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;
use log::{Level, LevelFilter, Record};

/// Logging setup shared by `linfit` and `linfit-trials`.
///
/// Every record goes to stdout (and to the log file, if one is set) as
///
/// ```text
/// [   0.012s][linfit_tasks::cmd][INFO] Fitted intercept: ...
/// ```
///
/// What gets through depends on the verbosity:
///
/// | target                          | quiet   | `-v`    |
/// |---------------------------------|---------|---------|
/// | `linfit_tasks::cmd`             | `Debug` | `Trace` |
/// | `linfit_regression`             | `Debug` | `Trace` |
/// | rest of `linfit_tasks`, config  | `Debug` | `Debug` |
/// | dependencies                    | `Info`  | `Info`  |
///
/// At `Trace`, `cmd` prints every replicate and the regression crate
/// prints its weighted sums.
#[derive(Debug, Clone, Default)]
pub struct GlobalLogger {
    path: Option<PathBuf>,
    verbosity: Verbosity,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Verbosity { Quiet, Loud }

impl Default for Verbosity {
    fn default() -> Self { Verbosity::Quiet }
}

impl Verbosity {
    /// Level for the targets that report per-replicate detail.
    fn detail_level(self) -> LevelFilter {
        match self {
            Verbosity::Quiet => LevelFilter::Debug,
            Verbosity::Loud => LevelFilter::Trace,
        }
    }
}

impl GlobalLogger {
    /// Copy the log into this file, truncating it.
    pub fn path<P: AsRef<Path>>(&mut self, path: P) -> &mut Self
    { self.path = Some(path.as_ref().to_owned()); self }

    /// The number of `-v` flags.  There is only one louder level, so any
    /// nonzero count selects it.
    pub fn verbosity(&mut self, count: u64) -> &mut Self
    {
        self.verbosity = if count > 0 { Verbosity::Loud } else { Verbosity::Quiet };
        self
    }

    /// Install the global logger.  Fails if one is already installed.
    pub fn apply(&mut self) -> FailResult<()>
    {
        let start = Instant::now();
        let detail = self.verbosity.detail_level();

        let mut dispatch = fern::Dispatch::new()
            .format(move |out, message, record| {
                out.finish(format_args!("{} {}", RecordPrefix { start, record }, message))
            })
            .level(LevelFilter::Info)
            .level_for("linfit_tasks", LevelFilter::Debug)
            .level_for("linfit_tasks_config", LevelFilter::Debug)
            .level_for("linfit_tasks::cmd", detail)
            .level_for("linfit_regression", detail)
            .chain(std::io::stdout());

        if let Some(path) = &self.path {
            dispatch = dispatch.chain(fern::log_file(path)?);
        }
        dispatch.apply()?;
        Ok(())
    }
}

/// `[elapsed][target][LEVEL]`
struct RecordPrefix<'a, 'r> {
    start: Instant,
    record: &'a Record<'r>,
}

impl fmt::Display for RecordPrefix<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let t = self.start.elapsed();
        write!(f, "[{:>4}.{:03}s][{}][{}]",
            t.as_secs(),
            t.subsec_millis(),
            self.record.target(),
            ColorizedLevel(self.record.level()),
        )
    }
}

#[derive(Debug, Copy, Clone)]
pub struct ColorizedLevel(pub Level);
impl fmt::Display for ColorizedLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let style = match self.0 {
            Level::Error => ansi_term::Colour::Red.bold(),
            Level::Warn  => ansi_term::Colour::Red.normal(),
            Level::Info  => ansi_term::Colour::Cyan.bold(),
            Level::Debug => ansi_term::Colour::Yellow.dimmed(),
            Level::Trace => ansi_term::Colour::Cyan.normal(),
        };
        write!(f, "{}", paint(style, self.0))
    }
}
