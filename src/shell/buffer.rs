//! Editable command line: a byte sequence plus an independent cursor.
//!
//! Cursor arithmetic is byte-oriented. Multi-byte characters occupy several
//! cursor positions.

use super::error::{EditError, EditResult};

/// Cursor motions understood by [`LineBuffer::move_cursor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Start,
    End,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LineBuffer {
    contents: Vec<u8>,
    cursor: usize,
}

impl LineBuffer {
    pub fn new() -> Self { Self::default() }

    pub fn cursor(&self) -> usize { self.cursor }
    pub fn len(&self) -> usize { self.contents.len() }
    pub fn is_empty(&self) -> bool { self.contents.is_empty() }
    pub fn as_bytes(&self) -> &[u8] { &self.contents }

    /// Snapshot of the contents as text. Invalid UTF-8 is replaced.
    pub fn as_string(&self) -> String {
        String::from_utf8_lossy(&self.contents).into_owned()
    }

    pub fn insert(&mut self, c: u8) {
        self.contents.insert(self.cursor, c);
        self.cursor += 1;
    }

    /// Backspace.
    pub fn erase_before(&mut self) -> EditResult<()> {
        if self.cursor == 0 {
            return Err(EditError::NoOp);
        }
        self.cursor -= 1;
        self.contents.remove(self.cursor);
        Ok(())
    }

    /// Forward delete of the byte under the cursor.
    pub fn erase_at(&mut self) -> EditResult<()> {
        if self.cursor >= self.contents.len() {
            return Err(EditError::AtEnd);
        }
        self.contents.remove(self.cursor);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.contents.clear();
        self.cursor = 0;
    }

    /// Replace the whole line; the cursor lands after the new text.
    pub fn replace_with(&mut self, s: &str) {
        self.contents.clear();
        self.contents.extend_from_slice(s.as_bytes());
        self.cursor = self.contents.len();
    }

    pub fn move_cursor(&mut self, motion: Motion) -> EditResult<()> {
        match motion {
            Motion::Left => {
                if self.cursor == 0 {
                    return Err(EditError::AtStart);
                }
                self.cursor -= 1;
            }
            Motion::Right => {
                if self.cursor == self.contents.len() {
                    return Err(EditError::AtEnd);
                }
                self.cursor += 1;
            }
            Motion::Start => self.cursor = 0,
            Motion::End => self.cursor = self.contents.len(),
        }
        Ok(())
    }
}
