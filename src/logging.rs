//! File logging.
//!
//! Stdout is the interactive surface, so log records go to a file chosen with
//! `--log`. Without it no logger is installed and the `log` macros are no-ops.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use log::LevelFilter;
use simplelog::{Config, ConfigBuilder, WriteLogger};

/// Truncate `path` and send all records at `Debug` (or `Trace` when
/// `verbose`) and above to it.
pub fn init_file_logger(path: &Path, verbose: bool) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    let level = if verbose { LevelFilter::Trace } else { LevelFilter::Debug };
    WriteLogger::init(level, new_config(), file).context("logger already initialized")?;
    log::info!("logging to {} at {}", path.display(), level);
    Ok(())
}

fn new_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_thread_level(LevelFilter::Off)
        .build()
}
