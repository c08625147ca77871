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

//! The application layer of linfit: configuration sources, logging,
//! output files, and the entry points of the binaries.

#[macro_use] extern crate log;

pub type FailResult<T> = Result<T, failure::Error>;

pub mod entry_points;
pub mod filetypes;
mod cmd;

mod ui {
    pub mod cfg_merging;
    pub mod cli_deserialize;
    pub mod color;
    pub mod logging;
}

pub use crate::cmd::{run_fit, run_fit_trials};
pub use crate::ui::cfg_merging::ConfigSources;
pub use crate::ui::logging::GlobalLogger;
