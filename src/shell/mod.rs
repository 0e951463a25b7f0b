//! Line-editing core

pub mod buffer;
pub mod checker;
pub mod editor;
pub mod error;
pub mod history;
pub mod input;
pub mod keys;
pub mod render;

pub use buffer::{LineBuffer, Motion};
pub use checker::{CheckContext, CommandChecker, ValidatingChecker, Verdict};
pub use editor::LineEditor;
pub use error::EditError;
pub use history::HistoryStore;
pub use input::{InputEvent, RawInput};
pub use keys::{EscapeDecoder, Key};
pub use render::Renderer;
