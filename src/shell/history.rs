//! Session command history with Up/Down recall.
//!
//! Entries are append-only. Only the browse index moves during recall; it
//! equals `len()` at the live position (editing a fresh line).

use log::trace;

use super::error::{EditError, EditResult};

#[derive(Debug, Default)]
pub struct HistoryStore {
    entries: Vec<String>,
    browse_index: usize,
    /// Line being typed when browsing started, handed back on the way out.
    draft: String,
}

impl HistoryStore {
    pub fn new() -> Self { Self::default() }

    pub fn entries(&self) -> &[String] { &self.entries }
    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
    pub fn browse_index(&self) -> usize { self.browse_index }
    pub fn is_browsing(&self) -> bool { self.browse_index < self.entries.len() }

    /// Append an accepted line and return to the live position.
    pub fn commit(&mut self, line: &str) {
        if line.is_empty() {
            return;
        }
        self.entries.push(line.to_string());
        self.browse_index = self.entries.len();
        self.draft.clear();
    }

    /// Overwrite the text of the most recent entry.
    pub fn substitute_latest(&mut self, line: &str) -> bool {
        match self.entries.last_mut() {
            Some(last) => {
                *last = line.to_string();
                true
            }
            None => false,
        }
    }

    /// Drop any browse position and draft, back to the live line.
    pub fn reset_browse(&mut self) {
        self.browse_index = self.entries.len();
        self.draft.clear();
    }

    /// Step one entry back (Up). `current` is kept as the draft when leaving
    /// the live position.
    pub fn recall_previous(&mut self, current: &str) -> EditResult<&str> {
        if self.browse_index == 0 {
            return Err(EditError::AtOldest);
        }
        self.leave_live(current);
        self.browse_index -= 1;
        trace!("history: recall previous -> {}", self.browse_index);
        Ok(self.entries[self.browse_index].as_str())
    }

    /// Step one entry forward (Down). Moving past the newest entry lands on
    /// the live position and yields the saved draft.
    pub fn recall_next(&mut self) -> EditResult<&str> {
        if !self.is_browsing() {
            return Err(EditError::AtNewest);
        }
        self.browse_index += 1;
        trace!("history: recall next -> {}", self.browse_index);
        if self.browse_index == self.entries.len() {
            return Ok(self.draft.as_str());
        }
        Ok(self.entries[self.browse_index].as_str())
    }

    /// Jump `step` entries back (PageUp), stopping at the oldest entry.
    pub fn page_previous(&mut self, step: usize, current: &str) -> EditResult<&str> {
        if self.browse_index == 0 {
            return Err(EditError::AtOldest);
        }
        self.leave_live(current);
        self.browse_index = self.browse_index.saturating_sub(step.max(1));
        trace!("history: page previous -> {}", self.browse_index);
        Ok(self.entries[self.browse_index].as_str())
    }

    /// Jump `step` entries forward (PageDown), stopping at the newest entry.
    pub fn page_next(&mut self, step: usize) -> EditResult<&str> {
        let newest = match self.entries.len().checked_sub(1) {
            Some(newest) if self.browse_index < newest => newest,
            _ => return Err(EditError::AtNewest),
        };
        self.browse_index = (self.browse_index + step.max(1)).min(newest);
        trace!("history: page next -> {}", self.browse_index);
        Ok(self.entries[self.browse_index].as_str())
    }

    /// Resolve a repeat selector: `!!` is the newest entry, `!N` is entry N.
    pub fn repeat(&self, selector: &str) -> EditResult<&str> {
        self.resolve(selector, self.entries.len())
    }

    /// Resolve a selector that was itself just committed, so it only sees
    /// the entries before it.
    pub fn repeat_for_latest(&self, selector: &str) -> EditResult<&str> {
        self.resolve(selector, self.entries.len().saturating_sub(1))
    }

    fn resolve(&self, selector: &str, limit: usize) -> EditResult<&str> {
        let rest = selector.strip_prefix('!').ok_or(EditError::OutOfRange)?;
        let index = if rest == "!" {
            limit.checked_sub(1)
        } else {
            rest.trim().parse::<usize>().ok()
        };
        index
            .filter(|i| *i < limit)
            .map(|i| self.entries[i].as_str())
            .ok_or(EditError::OutOfRange)
    }

    fn leave_live(&mut self, current: &str) {
        if !self.is_browsing() {
            self.draft = current.to_string();
        }
    }
}
