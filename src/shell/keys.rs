//! Escape-sequence decoding for cursor and editing keys.
//!
//! The decoder is fed the bytes that follow ESC one at a time. It never
//! buffers more than two of them and never errors: anything it does not
//! understand resolves to [`Key::Unrecognized`].

pub const ESC: u8 = 0x1b;

/// Symbolic keys produced by escape sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Right,
    Left,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,
    Unrecognized,
}

/// Outcome of feeding one byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// More bytes are needed.
    Pending,
    Done(Key),
    /// The byte after ESC was not `[`. The sequence is unrecognized and the
    /// byte must be dispatched as ordinary input.
    Rejected(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    Start,
    Bracket,
    Digit(u8),
    /// `ESC [ [` (Linux console function keys); swallow one more byte.
    DoubleBracket,
}

#[derive(Debug, Default)]
pub struct EscapeDecoder {
    state: State,
}

impl EscapeDecoder {
    pub fn new() -> Self { Self::default() }

    pub fn feed(&mut self, byte: u8) -> Step {
        let step = match (self.state, byte) {
            (State::Start, b'[') => {
                self.state = State::Bracket;
                return Step::Pending;
            }
            (State::Start, other) => Step::Rejected(other),
            (State::Bracket, b'A') => Step::Done(Key::Up),
            (State::Bracket, b'B') => Step::Done(Key::Down),
            (State::Bracket, b'C') => Step::Done(Key::Right),
            (State::Bracket, b'D') => Step::Done(Key::Left),
            (State::Bracket, b'[') => {
                self.state = State::DoubleBracket;
                return Step::Pending;
            }
            (State::Bracket, d) if d.is_ascii_digit() => {
                self.state = State::Digit(d);
                return Step::Pending;
            }
            (State::Bracket, _) => Step::Done(Key::Unrecognized),
            (State::Digit(d), b'~') => Step::Done(tilde_key(d)),
            (State::Digit(_), _) | (State::DoubleBracket, _) => Step::Done(Key::Unrecognized),
        };
        self.state = State::Start;
        step
    }

    /// Input ended in the middle of a sequence.
    pub fn finish(&mut self) -> Key {
        self.state = State::Start;
        Key::Unrecognized
    }
}

fn tilde_key(digit: u8) -> Key {
    match digit {
        b'1' => Key::Home,
        b'2' => Key::Insert,
        b'3' => Key::Delete,
        b'4' => Key::End,
        b'5' => Key::PageUp,
        b'6' => Key::PageDown,
        _ => Key::Unrecognized,
    }
}
