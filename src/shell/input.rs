//! Raw byte input for the line editor.
//!
//! [`RawInput`] turns a byte stream (stdin in raw mode, or a test script) into
//! one [`InputEvent`] per call, running escape sequences through
//! [`EscapeDecoder`].

use std::io::{self, ErrorKind, Read};

use log::trace;

use super::keys::{EscapeDecoder, Key, Step, ESC};

pub const CTRL_A: u8 = 0x01;
pub const CTRL_E: u8 = 0x05;
pub const BACKSPACE: u8 = 0x08;
pub const TAB: u8 = 0x09;
pub const LINE_FEED: u8 = b'\n';
pub const KILL_LINE: u8 = 0x0b;
pub const CARRIAGE_RETURN: u8 = b'\r';
pub const DEL: u8 = 0x7f;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Printable byte, inserted as-is.
    Char(u8),
    /// `\r` or `\n`.
    EndOfLine(u8),
    /// BS or DEL.
    Backspace(u8),
    Tab,
    KillLine,
    /// Decoded escape sequence.
    Key(Key),
    /// Control byte bound to a key (Ctrl+A as Home, Ctrl+E as End).
    CtrlKey(u8, Key),
    /// Any other control byte.
    Control(u8),
}

impl InputEvent {
    /// Classify a byte that is not the start of an escape sequence.
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            CARRIAGE_RETURN | LINE_FEED => InputEvent::EndOfLine(byte),
            BACKSPACE | DEL => InputEvent::Backspace(byte),
            TAB => InputEvent::Tab,
            KILL_LINE => InputEvent::KillLine,
            CTRL_A => InputEvent::CtrlKey(byte, Key::Home),
            CTRL_E => InputEvent::CtrlKey(byte, Key::End),
            b if b < ESC => InputEvent::Control(b),
            b => InputEvent::Char(b),
        }
    }

    /// First input byte of the event; ESC for escape sequences.
    pub fn lead_byte(&self) -> u8 {
        match *self {
            InputEvent::Char(b)
            | InputEvent::EndOfLine(b)
            | InputEvent::Backspace(b)
            | InputEvent::CtrlKey(b, _)
            | InputEvent::Control(b) => b,
            InputEvent::Tab => TAB,
            InputEvent::KillLine => KILL_LINE,
            InputEvent::Key(_) => ESC,
        }
    }
}

pub struct RawInput<R> {
    reader: R,
    decoder: EscapeDecoder,
    /// Byte handed back by the decoder, dispatched before reading again.
    pending: Option<u8>,
}

impl<R: Read> RawInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, decoder: EscapeDecoder::new(), pending: None }
    }

    /// Block for the next event. `Ok(None)` means the input is closed.
    pub fn next_event(&mut self) -> io::Result<Option<InputEvent>> {
        let byte = match self.pending.take() {
            Some(b) => b,
            None => match self.read_byte()? {
                Some(b) => b,
                None => return Ok(None),
            },
        };
        if byte != ESC {
            return Ok(Some(InputEvent::from_byte(byte)));
        }
        let key = self.read_escape()?;
        trace!("input: escape sequence -> {:?}", key);
        Ok(Some(InputEvent::Key(key)))
    }

    fn read_escape(&mut self) -> io::Result<Key> {
        loop {
            let Some(byte) = self.read_byte()? else {
                return Ok(self.decoder.finish());
            };
            match self.decoder.feed(byte) {
                Step::Pending => continue,
                Step::Done(key) => return Ok(key),
                Step::Rejected(b) => {
                    self.pending = Some(b);
                    return Ok(Key::Unrecognized);
                }
            }
        }
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.reader.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                // A signal landed mid-read; nothing was consumed.
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(bytes: &[u8]) -> Vec<InputEvent> {
        let mut input = RawInput::new(bytes);
        let mut out = Vec::new();
        while let Some(ev) = input.next_event().unwrap() {
            out.push(ev);
        }
        out
    }

    #[test]
    fn test_plain_bytes() {
        assert_eq!(
            events(b"ls\r"),
            vec![InputEvent::Char(b'l'), InputEvent::Char(b's'), InputEvent::EndOfLine(b'\r')]
        );
    }

    #[test]
    fn test_control_bytes() {
        assert_eq!(
            events(&[BACKSPACE, DEL, TAB, KILL_LINE, CTRL_A, CTRL_E, 0x03, b'\n']),
            vec![
                InputEvent::Backspace(BACKSPACE),
                InputEvent::Backspace(DEL),
                InputEvent::Tab,
                InputEvent::KillLine,
                InputEvent::CtrlKey(CTRL_A, Key::Home),
                InputEvent::CtrlKey(CTRL_E, Key::End),
                InputEvent::Control(0x03),
                InputEvent::EndOfLine(b'\n'),
            ]
        );
    }

    #[test]
    fn test_escape_sequences() {
        assert_eq!(
            events(b"\x1b[A\x1b[3~\x1b[D"),
            vec![
                InputEvent::Key(Key::Up),
                InputEvent::Key(Key::Delete),
                InputEvent::Key(Key::Left),
            ]
        );
    }

    #[test]
    fn test_rejected_byte_is_redispatched() {
        assert_eq!(
            events(b"\x1bq"),
            vec![InputEvent::Key(Key::Unrecognized), InputEvent::Char(b'q')]
        );
    }

    #[test]
    fn test_truncated_escape_at_eof() {
        assert_eq!(events(b"\x1b["), vec![InputEvent::Key(Key::Unrecognized)]);
        assert_eq!(events(b"\x1b"), vec![InputEvent::Key(Key::Unrecognized)]);
    }

    #[test]
    fn test_lead_bytes() {
        let leads: Vec<u8> = events(b"a\r\x7f\t\x0b\x05\x1b[A\x02").iter().map(InputEvent::lead_byte).collect();
        assert_eq!(leads, vec![b'a', b'\r', DEL, TAB, KILL_LINE, CTRL_E, ESC, 0x02]);
    }

    #[test]
    fn test_high_bytes_are_printable() {
        assert_eq!(events(&[0xc3, 0xa9]), vec![InputEvent::Char(0xc3), InputEvent::Char(0xa9)]);
    }
}
