//! Editable action-item board.
//!
//! # Responsibility
//! - Hold the ordered action items extracted from an AI response.
//! - Apply positional edits made during review.
//! - Render the archival text form stored with a record.
//!
//! # Invariants
//! - Item identity is its position; edits shift later positions.
//! - Out-of-range positions are rejected, never clamped.
//! - Rendered numbering is 1-based and contiguous in current board order.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Combining mark appended to each character of a completed item.
pub const STRIKE_THROUGH_MARK: char = '\u{0336}';
/// Glyph appended to the line of a completed item.
pub const COMPLETION_GLYPH: &str = "✅";

/// One atomic action item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskItem {
    pub done: bool,
    pub description: String,
}

impl TaskItem {
    /// Creates an open (not done) item.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            done: false,
            description: description.into(),
        }
    }
}

/// Positional board operation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    IndexOutOfRange { index: usize, len: usize },
}

impl Display for BoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "task index {index} is out of range for board of {len}")
            }
        }
    }
}

impl Error for BoardError {}

/// Ordered, mutable collection of [`TaskItem`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskBoard {
    items: Vec<TaskItem>,
}

impl TaskBoard {
    /// Builds a board with one open item per line, in input order.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: lines.into_iter().map(TaskItem::new).collect(),
        }
    }

    pub fn items(&self) -> &[TaskItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items currently marked done.
    pub fn done_count(&self) -> usize {
        self.items.iter().filter(|item| item.done).count()
    }

    /// Replaces the description at `index`.
    pub fn edit(&mut self, index: usize, description: impl Into<String>) -> Result<(), BoardError> {
        let item = self.item_mut(index)?;
        item.description = description.into();
        Ok(())
    }

    /// Flips the done flag at `index` and returns the new value.
    pub fn toggle(&mut self, index: usize) -> Result<bool, BoardError> {
        let item = self.item_mut(index)?;
        item.done = !item.done;
        Ok(item.done)
    }

    /// Inserts `item` before position `at`; `at == len` appends.
    pub fn insert(&mut self, at: usize, item: TaskItem) -> Result<(), BoardError> {
        if at > self.items.len() {
            return Err(BoardError::IndexOutOfRange {
                index: at,
                len: self.items.len(),
            });
        }
        self.items.insert(at, item);
        Ok(())
    }

    /// Appends `item` at the end of the board.
    pub fn push(&mut self, item: TaskItem) {
        self.items.push(item);
    }

    /// Removes and returns the item at `index`.
    pub fn remove(&mut self, index: usize) -> Result<TaskItem, BoardError> {
        self.check_index(index)?;
        Ok(self.items.remove(index))
    }

    /// Moves the item at `from` so that it ends up at position `to`.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), BoardError> {
        self.check_index(from)?;
        self.check_index(to)?;
        let item = self.items.remove(from);
        self.items.insert(to, item);
        Ok(())
    }

    /// Renders the board as archival text, one numbered line per item.
    ///
    /// Done items have every description character followed by
    /// [`STRIKE_THROUGH_MARK`] and end with [`COMPLETION_GLYPH`]. The output is
    /// display-only and is not parsed back.
    pub fn render(&self) -> String {
        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| render_line(index + 1, item))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn check_index(&self, index: usize) -> Result<(), BoardError> {
        if index >= self.items.len() {
            return Err(BoardError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(())
    }

    fn item_mut(&mut self, index: usize) -> Result<&mut TaskItem, BoardError> {
        let len = self.items.len();
        self.items
            .get_mut(index)
            .ok_or(BoardError::IndexOutOfRange { index, len })
    }
}

fn render_line(position: usize, item: &TaskItem) -> String {
    if !item.done {
        return format!("{position}. {}", item.description);
    }
    format!(
        "{position}. {} {COMPLETION_GLYPH}",
        strike_through(&item.description)
    )
}

fn strike_through(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 3);
    for ch in text.chars() {
        out.push(ch);
        out.push(STRIKE_THROUGH_MARK);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{strike_through, STRIKE_THROUGH_MARK};

    #[test]
    fn strike_through_marks_every_char() {
        let struck = strike_through("ab c");
        assert_eq!(struck.chars().filter(|c| *c == STRIKE_THROUGH_MARK).count(), 4);
        assert_eq!(struck, "a\u{336}b\u{336} \u{336}c\u{336}");
    }

    #[test]
    fn strike_through_handles_multibyte() {
        assert_eq!(strike_through("跳舞"), "跳\u{336}舞\u{336}");
    }
}
