//! ase - minimal interactive shell front-end
//!
//! Features:
//! - Raw keystroke editing with cursor movement
//! - Up/Down and PageUp/PageDown history recall
//! - `!!` / `!N` history repeat
//! - Scoped raw terminal mode, SIGINT-proof input loop

pub mod config;
pub mod interrupt;
pub mod logging;
pub mod shell;
pub mod terminal;

pub use config::ShellConfig;
pub use shell::LineEditor;
