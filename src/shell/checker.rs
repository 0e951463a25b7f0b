//! Command checking for accepted lines and Tab hints.
//!
//! The editor does not interpret lines. It hands each accepted line (and the
//! current line on Tab) to a [`CommandChecker`] and only acts on the
//! returned [`Verdict`].

use std::collections::BTreeSet;
use std::io::{self, Write};

use colored::Colorize;
use log::{debug, info};
use rustyline::completion::{Completer, Pair};
use rustyline::Context;

use super::history::HistoryStore;
use super::render::BELL;
use crate::config::ShellConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Continue,
    Stop,
}

/// Session state lent to the checker for the duration of one call.
pub struct CheckContext<'a> {
    pub history: &'a mut HistoryStore,
    /// Terminal output. The terminal is in raw mode, so lines end in `\r\n`.
    pub out: &'a mut dyn Write,
    pub debug: &'a mut bool,
}

pub trait CommandChecker {
    /// Handle an accepted line. The line has already been committed to
    /// history.
    fn check(&mut self, line: &str, ctx: CheckContext<'_>) -> io::Result<Verdict>;

    /// Tab pressed on `line`. Must not assume the line was committed.
    fn hint(&mut self, _line: &str, _ctx: CheckContext<'_>) -> io::Result<()> {
        Ok(())
    }
}

/// Checker backed by a fixed table of known commands.
///
/// Besides table lookups it understands `q`/`quit`, `history`, `debug_` and
/// the `!!` / `!N` repeat syntax.
#[derive(Debug, Clone)]
pub struct ValidatingChecker {
    commands: BTreeSet<String>,
}

impl ValidatingChecker {
    pub fn new<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { commands: commands.into_iter().map(Into::into).collect() }
    }

    pub fn from_config(config: &ShellConfig) -> Self {
        Self { commands: config.valid_commands.clone() }
    }

    pub fn is_valid(&self, command: &str) -> bool {
        self.commands.contains(command)
    }

    fn run(&self, command: &str, ctx: CheckContext<'_>) -> io::Result<Verdict> {
        match command {
            "q" | "quit" => {
                info!("checker: quit requested");
                return Ok(Verdict::Stop);
            }
            "history" => {
                for (i, entry) in ctx.history.entries().iter().enumerate() {
                    write!(ctx.out, "{}:{}\r\n", i, entry)?;
                }
            }
            "debug_" => {
                *ctx.debug = !*ctx.debug;
                let state = if *ctx.debug { "on" } else { "off" };
                write!(ctx.out, "debug tracing {}\r\n", state)?;
            }
            cmd if self.is_valid(cmd) => {
                write!(ctx.out, "{}\r\n", "Valid command".green())?;
            }
            cmd => debug!("checker: unknown command {:?}", cmd),
        }
        Ok(Verdict::Continue)
    }
}

impl CommandChecker for ValidatingChecker {
    fn check(&mut self, line: &str, ctx: CheckContext<'_>) -> io::Result<Verdict> {
        let line = line.trim();
        if !line.starts_with('!') {
            return self.run(line, ctx);
        }

        let repeated = match ctx.history.repeat_for_latest(line) {
            Ok(entry) => entry.to_string(),
            Err(e) => {
                debug!("checker: {}: {}", line, e);
                ctx.out.write_all(BELL.as_bytes())?;
                return Ok(Verdict::Continue);
            }
        };
        write!(ctx.out, "Repeat:{}\r\n", repeated)?;
        ctx.history.substitute_latest(&repeated);
        self.run(&repeated, ctx)
    }

    fn hint(&mut self, line: &str, ctx: CheckContext<'_>) -> io::Result<()> {
        let trimmed = line.trim();
        if trimmed.starts_with('!') {
            match ctx.history.repeat(trimmed) {
                Ok(entry) => write!(ctx.out, "Repeat:{}\r\n", entry)?,
                Err(_) => ctx.out.write_all(BELL.as_bytes())?,
            }
            return Ok(());
        }
        if self.is_valid(trimmed) {
            write!(ctx.out, "{}\r\n", "Valid command".green())?;
            return Ok(());
        }

        let history = rustyline::history::DefaultHistory::new();
        let rl_ctx = Context::new(&history);
        if let Ok((_start, candidates)) = self.complete(line, line.len(), &rl_ctx) {
            if !candidates.is_empty() {
                let mut out = String::new();
                for candidate in &candidates {
                    out.push_str(&candidate.display);
                    out.push_str("  ");
                }
                write!(ctx.out, "{}\r\n", out.trim_end())?;
            }
        }
        Ok(())
    }
}

impl Completer for ValidatingChecker {
    type Candidate = Pair;

    /// Complete the first word against the command table.
    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line_to_cursor = &line[..pos];
        let word = line_to_cursor.trim_start();
        if word.contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }
        let start = pos - word.len();
        let candidates = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(word))
            .map(|cmd| Pair { display: cmd.clone(), replacement: cmd.clone() })
            .collect();
        Ok((start, candidates))
    }
}
