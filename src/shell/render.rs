//! In-place repaint of the prompt line.

use std::io::{self, Write};

use crossterm::{
    queue,
    style::Print,
    terminal::{Clear, ClearType},
};

pub const BELL: &str = "\x07";
pub const DEFAULT_LINE_WIDTH: usize = 80;

/// Repaints `prompt + buffer` on the current terminal row.
///
/// Holds no state between calls besides the configured blanking width, so a
/// repeated redraw with the same arguments produces the same bytes.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    line_width: usize,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(DEFAULT_LINE_WIDTH)
    }
}

impl Renderer {
    pub fn new(line_width: usize) -> Self {
        Self { line_width }
    }

    pub fn redraw<W: Write>(&self, out: &mut W, prompt: &str, buffer: &[u8], cursor: usize) -> io::Result<()> {
        let cursor = cursor.min(buffer.len());
        // One extra column covers the byte a backspace just removed.
        let blanks = self.line_width.max(prompt.len() + buffer.len() + 1);
        queue!(out, Print('\r'), Print(" ".repeat(blanks)), Print('\r'), Print(prompt))?;
        // Raw bytes, so the backspace count below matches what was written.
        out.write_all(buffer)?;
        // Anything past the blanked width, left over from a longer line.
        queue!(out, Clear(ClearType::UntilNewLine), Print("\x08".repeat(buffer.len() - cursor)))?;
        out.flush()
    }

    pub fn bell<W: Write>(&self, out: &mut W) -> io::Result<()> {
        queue!(out, Print(BELL))?;
        out.flush()
    }

    pub fn newline<W: Write>(&self, out: &mut W) -> io::Result<()> {
        queue!(out, Print("\r\n"))?;
        out.flush()
    }
}
