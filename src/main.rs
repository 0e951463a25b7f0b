//! ase - minimal interactive shell
//!
//! Usage:
//!   ase                  Interactive shell
//!   ase --log FILE       Write debug logs to FILE
//!   ase --debug          Start with keystroke tracing on

use std::env;
use std::io;

use anyhow::{Context, Result};
use colored::Colorize;

use ase_shell::config::{Invocation, ShellConfig};
use ase_shell::interrupt::Interrupt;
use ase_shell::shell::{LineEditor, ValidatingChecker};
use ase_shell::{logging, terminal};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();

    let config = match ShellConfig::from_args(&args) {
        Ok(Invocation::Interactive(config)) => config,
        Ok(Invocation::Help) => {
            print_help();
            return Ok(());
        }
        Ok(Invocation::Version) => {
            println!("ase v{}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Err(e) => {
            eprintln!("ase: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(path) = &config.log_file {
        logging::init_file_logger(path, config.debug)?;
    }

    if let Err(e) = run_repl(&config) {
        eprintln!("{}: {:#}", "error".red(), e);
        std::process::exit(1);
    }
    Ok(())
}

fn print_help() {
    println!("{}", "ase - minimal interactive shell".bold());
    println!();
    println!("Usage:");
    println!("  ase                  Start interactive shell");
    println!("  ase --log FILE       Write debug logs to FILE");
    println!("  ase --debug          Start with keystroke tracing on");
    println!("  ase -h, --help       Show this help");
    println!("  ase -v, --version    Show version");
    println!();
    println!("Keys:");
    println!("  Up/Down              Browse history");
    println!("  PgUp/PgDn            Jump through history");
    println!("  Ctrl+A/Ctrl+E        Start/end of line");
    println!("  Ctrl+K               Clear line");
    println!("  Tab                  Check the current line");
    println!();
    println!("Commands: q, quit, history, debug_, !!, !N");
}

fn print_banner(config: &ShellConfig) {
    let known: Vec<&str> = config.valid_commands.iter().map(String::as_str).collect();
    println!("{} v{}", "ase".bold().cyan(), env!("CARGO_PKG_VERSION"));
    println!(
        "  {} to exit, {} to list history, known commands: {}",
        "q".green(),
        "history".green(),
        known.join(", ").yellow()
    );
}

fn run_repl(config: &ShellConfig) -> Result<()> {
    print_banner(config);

    let interrupt = Interrupt::new();
    interrupt.install().context("installing SIGINT handler")?;

    {
        let stdin = io::stdin();
        let stdout = io::stdout();
        let checker = ValidatingChecker::from_config(config);
        let mut editor =
            LineEditor::new(stdin.lock(), stdout.lock(), checker, config).with_interrupt(interrupt);

        if terminal::stdin_is_tty() {
            let _raw = terminal::RawModeGuard::acquire().context("entering raw mode")?;
            editor.run().context("reading input")?;
        } else {
            editor.run().context("reading input")?;
        }
    }

    println!("Goodbye!");
    Ok(())
}
