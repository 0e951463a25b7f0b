//! Session configuration, built from the command line.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::shell::render::DEFAULT_LINE_WIDTH;

/// Commands the checker reports as valid unless told otherwise.
pub const DEFAULT_COMMANDS: &[&str] = &["ls", "mkdir", "cd"];
/// History entries skipped by PageUp / PageDown.
pub const DEFAULT_PAGE_STEP: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub valid_commands: BTreeSet<String>,
    /// Columns blanked on every redraw.
    pub line_width: usize,
    pub page_step: usize,
    /// Start with per-keystroke tracing enabled.
    pub debug: bool,
    pub log_file: Option<PathBuf>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            valid_commands: DEFAULT_COMMANDS.iter().map(|c| c.to_string()).collect(),
            line_width: DEFAULT_LINE_WIDTH,
            page_step: DEFAULT_PAGE_STEP,
            debug: false,
            log_file: None,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Interactive(ShellConfig),
    Help,
    Version,
}

impl ShellConfig {
    /// Parse arguments (without the program name).
    pub fn from_args<I, S>(args: I) -> Result<Invocation>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = ShellConfig::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_ref() {
                "-h" | "--help" => return Ok(Invocation::Help),
                "-v" | "--version" => return Ok(Invocation::Version),
                "--debug" => config.debug = true,
                "--log" => {
                    let Some(path) = args.next() else {
                        bail!("--log requires a file argument");
                    };
                    config.log_file = Some(PathBuf::from(path.as_ref()));
                }
                other => bail!("unknown option: {}", other),
            }
        }
        Ok(Invocation::Interactive(config))
    }

    pub fn is_valid_command(&self, line: &str) -> bool {
        self.valid_commands.contains(line)
    }
}
