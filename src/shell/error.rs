//! Advisory editing errors.
//!
//! None of these are fatal. The editor answers every one of them with a bell
//! and leaves buffer and history untouched.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EditError {
    /// Backspace with nothing before the cursor.
    #[error("nothing to erase")]
    NoOp,
    #[error("cursor already at start of line")]
    AtStart,
    #[error("cursor already at end of line")]
    AtEnd,
    #[error("already at oldest history entry")]
    AtOldest,
    #[error("already at newest history entry")]
    AtNewest,
    /// `!N` / `!!` names an entry that does not exist.
    #[error("history index out of range")]
    OutOfRange,
}

pub type EditResult<T> = Result<T, EditError>;
