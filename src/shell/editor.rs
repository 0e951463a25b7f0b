//! The line editor: input events in, buffer and history edits out.
//!
//! Every event is handled to completion before the next read. Invalid edits
//! (backspace at column 0, Up at the oldest entry, ...) ring the bell and
//! change nothing. The loop only ends on a `Stop` verdict from the checker or
//! when the input closes.

use std::io::{self, Read, Write};

use log::{debug, info, trace};

use super::buffer::{LineBuffer, Motion};
use super::checker::{CheckContext, CommandChecker, Verdict};
use super::error::EditResult;
use super::history::HistoryStore;
use super::input::{InputEvent, RawInput};
use super::keys::Key;
use super::render::Renderer;
use crate::config::ShellConfig;
use crate::interrupt::Interrupt;

/// What an event did, deciding what gets written afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Redraw,
    Bell,
    Ignored,
    Stop,
}

pub struct LineEditor<R, W, C> {
    input: RawInput<R>,
    out: W,
    buffer: LineBuffer,
    history: HistoryStore,
    renderer: Renderer,
    checker: C,
    interrupt: Interrupt,
    page_step: usize,
    debug: bool,
}

impl<R: Read, W: Write, C: CommandChecker> LineEditor<R, W, C> {
    pub fn new(reader: R, out: W, checker: C, config: &ShellConfig) -> Self {
        Self {
            input: RawInput::new(reader),
            out,
            buffer: LineBuffer::new(),
            history: HistoryStore::new(),
            renderer: Renderer::new(config.line_width),
            checker,
            interrupt: Interrupt::new(),
            page_step: config.page_step,
            debug: config.debug,
        }
    }

    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    pub fn buffer(&self) -> &LineBuffer { &self.buffer }
    pub fn history(&self) -> &HistoryStore { &self.history }
    pub fn output(&self) -> &W { &self.out }
    pub fn is_debug(&self) -> bool { self.debug }

    pub fn prompt(&self) -> String {
        format!("ase[{}]> ", self.history.len())
    }

    /// Read and handle events until the checker says stop or input closes.
    pub fn run(&mut self) -> io::Result<()> {
        self.redraw()?;
        loop {
            let Some(event) = self.input.next_event()? else {
                info!("editor: input closed");
                return self.renderer.newline(&mut self.out);
            };
            if self.handle_event(event)? == Verdict::Stop {
                return Ok(());
            }
        }
    }

    /// Apply one event and repaint as needed.
    pub fn handle_event(&mut self, event: InputEvent) -> io::Result<Verdict> {
        let outcome = self.dispatch(event)?;
        if self.interrupt.take() {
            info!("editor: interrupt received, ignoring");
        }
        match outcome {
            Outcome::Stop => return Ok(Verdict::Stop),
            Outcome::Bell => self.renderer.bell(&mut self.out)?,
            Outcome::Redraw | Outcome::Ignored => {}
        }
        if self.debug {
            write!(
                self.out,
                "\r\nc:{} | pos:{} | size:{}\r\n",
                event.lead_byte(),
                self.buffer.cursor(),
                self.buffer.len()
            )?;
        }
        if outcome == Outcome::Redraw || self.debug {
            self.redraw()?;
        }
        Ok(Verdict::Continue)
    }

    fn dispatch(&mut self, event: InputEvent) -> io::Result<Outcome> {
        let outcome = match event {
            InputEvent::Char(c) => {
                self.buffer.insert(c);
                Outcome::Redraw
            }
            InputEvent::EndOfLine(_) => return self.accept_line(),
            InputEvent::Backspace(_) => advise(self.buffer.erase_before()),
            InputEvent::Tab => {
                self.renderer.newline(&mut self.out)?;
                let line = self.buffer.as_string();
                self.checker.hint(
                    &line,
                    CheckContext { history: &mut self.history, out: &mut self.out, debug: &mut self.debug },
                )?;
                Outcome::Redraw
            }
            InputEvent::KillLine => {
                self.buffer.clear();
                Outcome::Redraw
            }
            InputEvent::Key(key) | InputEvent::CtrlKey(_, key) => self.handle_key(key),
            InputEvent::Control(b) => {
                trace!("editor: ignoring control byte {:#04x}", b);
                Outcome::Ignored
            }
        };
        Ok(outcome)
    }

    fn handle_key(&mut self, key: Key) -> Outcome {
        match key {
            Key::Up => {
                let current = self.buffer.as_string();
                load(&mut self.buffer, self.history.recall_previous(&current))
            }
            Key::Down => load(&mut self.buffer, self.history.recall_next()),
            Key::PageUp => {
                let current = self.buffer.as_string();
                load(&mut self.buffer, self.history.page_previous(self.page_step, &current))
            }
            Key::PageDown => load(&mut self.buffer, self.history.page_next(self.page_step)),
            Key::Right => advise(self.buffer.move_cursor(Motion::Right)),
            Key::Left => advise(self.buffer.move_cursor(Motion::Left)),
            Key::Home => advise(self.buffer.move_cursor(Motion::Start)),
            Key::End => advise(self.buffer.move_cursor(Motion::End)),
            Key::Delete => advise(self.buffer.erase_at()),
            Key::Insert | Key::Unrecognized => {
                trace!("editor: ignoring {:?}", key);
                Outcome::Ignored
            }
        }
    }

    fn accept_line(&mut self) -> io::Result<Outcome> {
        self.renderer.newline(&mut self.out)?;
        let line = self.buffer.as_string();
        self.buffer.clear();
        self.history.reset_browse();
        if line.is_empty() {
            return Ok(Outcome::Redraw);
        }

        self.history.commit(&line);
        debug!("editor: accepted {:?} as entry {}", line, self.history.len() - 1);
        let verdict = self.checker.check(
            &line,
            CheckContext { history: &mut self.history, out: &mut self.out, debug: &mut self.debug },
        )?;
        Ok(match verdict {
            Verdict::Stop => Outcome::Stop,
            Verdict::Continue => Outcome::Redraw,
        })
    }

    fn redraw(&mut self) -> io::Result<()> {
        let prompt = self.prompt();
        self.renderer.redraw(&mut self.out, &prompt, self.buffer.as_bytes(), self.buffer.cursor())
    }
}

fn advise(result: EditResult<()>) -> Outcome {
    match result {
        Ok(()) => Outcome::Redraw,
        Err(e) => {
            debug!("editor: bell ({})", e);
            Outcome::Bell
        }
    }
}

/// Put a recalled history line into the buffer.
fn load(buffer: &mut LineBuffer, recalled: EditResult<&str>) -> Outcome {
    match recalled {
        Ok(line) => {
            buffer.replace_with(line);
            Outcome::Redraw
        }
        Err(e) => {
            debug!("editor: bell ({})", e);
            Outcome::Bell
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::checker::ValidatingChecker;
    use crate::shell::render::BELL;

    const UP: &[u8] = b"\x1b[A";
    const DOWN: &[u8] = b"\x1b[B";
    const RIGHT: &[u8] = b"\x1b[C";
    const LEFT: &[u8] = b"\x1b[D";

    /// Records every line and hint it is given; stops on `q`.
    #[derive(Default)]
    struct Recorder {
        checked: Vec<String>,
        hinted: Vec<String>,
    }

    impl CommandChecker for Recorder {
        fn check(&mut self, line: &str, _ctx: CheckContext<'_>) -> io::Result<Verdict> {
            self.checked.push(line.to_string());
            Ok(if line == "q" { Verdict::Stop } else { Verdict::Continue })
        }

        fn hint(&mut self, line: &str, _ctx: CheckContext<'_>) -> io::Result<()> {
            self.hinted.push(line.to_string());
            Ok(())
        }
    }

    type TestEditor<C> = LineEditor<&'static [u8], Vec<u8>, C>;

    fn editor<C: CommandChecker>(checker: C) -> TestEditor<C> {
        LineEditor::new(&b""[..], Vec::new(), checker, &ShellConfig::default())
    }

    fn feed<C: CommandChecker>(editor: &mut TestEditor<C>, bytes: &[u8]) -> Verdict {
        let mut input = RawInput::new(bytes);
        while let Some(event) = input.next_event().unwrap() {
            if editor.handle_event(event).unwrap() == Verdict::Stop {
                return Verdict::Stop;
            }
        }
        Verdict::Continue
    }

    fn output<C>(editor: &TestEditor<C>) -> String {
        String::from_utf8_lossy(&editor.out).into_owned()
    }

    #[test]
    fn test_typing_fills_buffer() {
        let mut ed = editor(Recorder::default());
        feed(&mut ed, b"hello");
        assert_eq!(ed.buffer().as_string(), "hello");
        assert_eq!(ed.buffer().cursor(), 5);
        assert!(output(&ed).ends_with("ase[0]> hello\x1b[K"));
    }

    #[test]
    fn test_enter_commits_and_checks() {
        let mut ed = editor(Recorder::default());
        assert_eq!(ed.prompt(), "ase[0]> ");
        feed(&mut ed, b"ls\r");
        assert_eq!(ed.history().entries(), &["ls".to_string()]);
        assert_eq!(ed.checker.checked, vec!["ls".to_string()]);
        assert!(ed.buffer().is_empty());
        assert_eq!(ed.prompt(), "ase[1]> ");
        assert!(output(&ed).ends_with("ase[1]> \x1b[K"));
    }

    #[test]
    fn test_empty_enter_skips_checker() {
        let mut ed = editor(Recorder::default());
        feed(&mut ed, b"\r\n");
        assert!(ed.history().is_empty());
        assert!(ed.checker.checked.is_empty());
        assert!(output(&ed).ends_with("ase[0]> \x1b[K"));
    }

    #[test]
    fn test_history_browsing() {
        let mut ed = editor(Recorder::default());
        feed(&mut ed, b"ls\rmkdir\r");

        feed(&mut ed, UP);
        assert_eq!(ed.buffer().as_string(), "mkdir");
        feed(&mut ed, UP);
        assert_eq!(ed.buffer().as_string(), "ls");
        assert_eq!(ed.buffer().cursor(), 2);
        feed(&mut ed, DOWN);
        assert_eq!(ed.buffer().as_string(), "mkdir");
        feed(&mut ed, DOWN);
        assert_eq!(ed.buffer().as_string(), "");

        ed.out.clear();
        feed(&mut ed, DOWN);
        assert_eq!(output(&ed), BELL);
        assert_eq!(ed.buffer().as_string(), "");
    }

    #[test]
    fn test_up_then_down_restores_typed_line() {
        let mut ed = editor(Recorder::default());
        feed(&mut ed, b"ls\rcd /tm");
        feed(&mut ed, UP);
        assert_eq!(ed.buffer().as_string(), "ls");
        feed(&mut ed, DOWN);
        assert_eq!(ed.buffer().as_string(), "cd /tm");
    }

    #[test]
    fn test_cleared_recall_returns_to_live_line() {
        let mut ed = editor(Recorder::default());
        feed(&mut ed, b"ls\rmkdir\r");
        feed(&mut ed, UP);
        feed(&mut ed, UP);
        assert_eq!(ed.buffer().as_string(), "ls");
        feed(&mut ed, b"\x0b\r");
        assert!(!ed.history().is_browsing());
        assert_eq!(ed.history().len(), 2);

        feed(&mut ed, b"cd");
        feed(&mut ed, UP);
        assert_eq!(ed.buffer().as_string(), "mkdir");
        feed(&mut ed, DOWN);
        assert_eq!(ed.buffer().as_string(), "cd");
    }

    #[test]
    fn test_shrinking_long_line_clears_tail() {
        let mut ed = editor(Recorder::default());
        feed(&mut ed, &[b'x'; 100]);
        ed.out.clear();
        feed(&mut ed, b"\x0b");
        assert!(ed.buffer().is_empty());
        assert!(output(&ed).ends_with("ase[0]> \x1b[K"));
    }

    #[test]
    fn test_up_at_oldest_rings_bell() {
        let mut ed = editor(Recorder::default());
        ed.out.clear();
        feed(&mut ed, UP);
        assert_eq!(output(&ed), BELL);
    }

    #[test]
    fn test_backspace_on_empty_rings_bell() {
        let mut ed = editor(Recorder::default());
        feed(&mut ed, b"\x7f");
        assert_eq!(output(&ed), BELL);
        assert!(ed.buffer().is_empty());
    }

    #[test]
    fn test_backspace_mid_line() {
        let mut ed = editor(Recorder::default());
        feed(&mut ed, b"abcd");
        feed(&mut ed, LEFT);
        feed(&mut ed, b"\x08");
        assert_eq!(ed.buffer().as_string(), "abd");
        assert_eq!(ed.buffer().cursor(), 2);
        assert!(output(&ed).ends_with("ase[0]> abd\x1b[K\x08"));
    }

    #[test]
    fn test_repeat_last_command() {
        let mut ed = editor(ValidatingChecker::from_config(&ShellConfig::default()));
        feed(&mut ed, b"ls\r!!\r");
        assert_eq!(ed.history().entries(), &["ls".to_string(), "ls".to_string()]);
        assert!(output(&ed).contains("Repeat:ls"));
    }

    #[test]
    fn test_insert_after_moving_left() {
        let mut ed = editor(Recorder::default());
        feed(&mut ed, b"abc\x01");
        feed(&mut ed, RIGHT);
        assert_eq!(ed.buffer().cursor(), 1);
        feed(&mut ed, LEFT);
        feed(&mut ed, b"x");
        assert_eq!(ed.buffer().as_string(), "xabc");
        assert_eq!(ed.buffer().cursor(), 1);
    }

    #[test]
    fn test_cursor_bounds_ring_bell() {
        let mut ed = editor(Recorder::default());
        feed(&mut ed, b"ab");
        ed.out.clear();
        feed(&mut ed, RIGHT);
        assert_eq!(output(&ed), BELL);
        feed(&mut ed, b"\x01");
        ed.out.clear();
        feed(&mut ed, LEFT);
        assert_eq!(output(&ed), BELL);
        assert_eq!(ed.buffer().cursor(), 0);
    }

    #[test]
    fn test_home_end_keys() {
        let mut ed = editor(Recorder::default());
        feed(&mut ed, b"echo");
        feed(&mut ed, b"\x1b[1~");
        assert_eq!(ed.buffer().cursor(), 0);
        feed(&mut ed, b"\x1b[4~");
        assert_eq!(ed.buffer().cursor(), 4);
        feed(&mut ed, b"\x01");
        assert_eq!(ed.buffer().cursor(), 0);
        feed(&mut ed, b"\x05");
        assert_eq!(ed.buffer().cursor(), 4);
    }

    #[test]
    fn test_delete_key() {
        let mut ed = editor(Recorder::default());
        feed(&mut ed, b"abc\x01\x1b[3~");
        assert_eq!(ed.buffer().as_string(), "bc");
        assert_eq!(ed.buffer().cursor(), 0);
    }

    #[test]
    fn test_kill_line() {
        let mut ed = editor(Recorder::default());
        feed(&mut ed, b"rm -rf /\x0b");
        assert!(ed.buffer().is_empty());
        assert!(ed.history().is_empty());
    }

    #[test]
    fn test_tab_forwards_without_mutation() {
        let mut ed = editor(Recorder::default());
        feed(&mut ed, b"mk\t");
        assert_eq!(ed.checker.hinted, vec!["mk".to_string()]);
        assert!(ed.checker.checked.is_empty());
        assert_eq!(ed.buffer().as_string(), "mk");
        assert!(ed.history().is_empty());
    }

    #[test]
    fn test_page_keys() {
        let mut ed = editor(Recorder::default());
        for i in 0..7 {
            feed(&mut ed, format!("cmd{}\r", i).as_bytes());
        }
        feed(&mut ed, b"\x1b[5~");
        assert_eq!(ed.buffer().as_string(), "cmd2");
        feed(&mut ed, b"\x1b[5~");
        assert_eq!(ed.buffer().as_string(), "cmd0");
        feed(&mut ed, b"\x1b[6~");
        assert_eq!(ed.buffer().as_string(), "cmd5");
        feed(&mut ed, b"\x1b[6~");
        assert_eq!(ed.buffer().as_string(), "cmd6");
    }

    #[test]
    fn test_ignored_input_writes_nothing() {
        let mut ed = editor(Recorder::default());
        feed(&mut ed, &[0x03, 0x10]);
        feed(&mut ed, b"\x1b[2~\x1b[Z");
        assert!(ed.out.is_empty());
    }

    #[test]
    fn test_unrecognized_escape_redispatches_byte() {
        let mut ed = editor(Recorder::default());
        feed(&mut ed, b"\x1bx");
        assert_eq!(ed.buffer().as_string(), "x");
    }

    #[test]
    fn test_stop_verdict_ends_run() {
        let script: &'static [u8] = b"ls\rq\rmkdir\r";
        let mut ed = LineEditor::new(script, Vec::new(), Recorder::default(), &ShellConfig::default());
        ed.run().unwrap();
        assert_eq!(ed.checker.checked, vec!["ls".to_string(), "q".to_string()]);
        assert_eq!(ed.history().len(), 2);
    }

    #[test]
    fn test_run_ends_when_input_closes() {
        let script: &'static [u8] = b"ls\rpartial";
        let mut ed = LineEditor::new(script, Vec::new(), Recorder::default(), &ShellConfig::default());
        ed.run().unwrap();
        assert_eq!(ed.history().len(), 1);
        assert_eq!(ed.buffer().as_string(), "partial");
        assert!(output(&ed).starts_with('\r'));
        assert!(output(&ed).ends_with("\r\n"));
    }

    #[test]
    fn test_interrupt_leaves_state_alone() {
        let interrupt = Interrupt::new();
        let mut ed = editor(Recorder::default()).with_interrupt(interrupt.clone());
        feed(&mut ed, b"ls\rcd");
        interrupt.mark_seen();
        feed(&mut ed, b"x");
        assert!(!interrupt.seen());
        assert_eq!(ed.buffer().as_string(), "cdx");
        assert_eq!(ed.history().len(), 1);
    }

    #[test]
    fn test_debug_tracing() {
        let mut ed = editor(ValidatingChecker::from_config(&ShellConfig::default()));
        feed(&mut ed, b"debug_\r");
        assert!(ed.is_debug());
        ed.out.clear();
        feed(&mut ed, b"a");
        assert!(output(&ed).contains("\r\nc:97 | pos:1 | size:1\r\n"));
        assert!(output(&ed).ends_with("ase[1]> a\x1b[K"));

        ed.out.clear();
        feed(&mut ed, LEFT);
        assert!(output(&ed).contains("c:27 | pos:0 | size:1"));
        ed.out.clear();
        feed(&mut ed, b"\x05");
        assert!(output(&ed).contains("c:5 | pos:1 | size:1"));
    }
}
