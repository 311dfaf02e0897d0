/* This file is part of EcoSphere DAO
 *
 * Copyright (C) 2024-2026 EcoSphere DAO contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as
 * published by the Free Software Foundation, either version 3 of the
 * License, or (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use std::{
    env,
    fs::{self, File},
    io::Write,
    path::Path,
};

use log::info;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};

use crate::{util::path::expand_path, Result};

/// Map `-v` occurrences to a log level.
pub fn get_log_level(verbosity_level: u8) -> LevelFilter {
    match verbosity_level {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Build the logger config. `LOG_TARGETS` holds a comma-separated list
/// of targets to show, or to hide when prefixed with `!`.
pub fn get_log_config(verbosity_level: u8) -> Config {
    let mut cfg = ConfigBuilder::new();
    let _ = cfg.set_time_offset_to_local();

    if verbosity_level < 2 {
        cfg.set_target_level(LevelFilter::Off);
        cfg.set_thread_level(LevelFilter::Off);
    }

    if let Ok(targets) = env::var("LOG_TARGETS") {
        for target in targets.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            match target.strip_prefix('!') {
                Some(ignored) => cfg.add_filter_ignore(ignored.to_string()),
                None => cfg.add_filter_allow(target.to_string()),
            };
        }
    }

    cfg.build()
}

/// Initialize terminal logging, plus file logging if `log_path` is set.
pub fn init_logger(verbosity_level: u8, log_path: Option<&str>) -> Result<()> {
    let log_level = get_log_level(verbosity_level);
    let log_config = get_log_config(verbosity_level);
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        log_level,
        log_config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];

    let log_path = match log_path.filter(|p| !p.is_empty()) {
        Some(p) => {
            let log_path = expand_path(p)?;
            if let Some(parent) = log_path.parent() {
                fs::create_dir_all(parent)?;
            }
            loggers.push(WriteLogger::new(log_level, log_config, File::create(&log_path)?));
            Some(log_path)
        }
        None => None,
    };

    CombinedLogger::init(loggers)?;
    if let Some(log_path) = log_path {
        info!(target: "ecosphere", "Logging to {}", log_path.display());
    }

    Ok(())
}

/// Write the default config file at `path` if nothing is there yet.
pub fn spawn_config(path: &Path, contents: &[u8]) -> Result<()> {
    if path.exists() {
        return Ok(())
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    file.write_all(contents)?;
    println!("Config file created in {}. Defaults target a local dev node.", path.display());

    Ok(())
}
