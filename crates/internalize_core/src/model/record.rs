//! Internalization record domain model.
//!
//! # Responsibility
//! - Define the unit appended to the row store after review.
//! - Own the fixed column order used when writing and reading rows.
//!
//! # Invariants
//! - `user_note` is non-empty after trimming; no record exists otherwise.
//! - Records are immutable once built.
//! - `to_row()` output always matches `RECORD_COLUMNS` positionally.

use crate::model::task_board::TaskBoard;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Header row of the record sheet, in write order.
pub const RECORD_COLUMNS: [&str; 6] = ["date", "category", "note", "actions", "analysis", "source"];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Record construction and decoding errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    /// The personal note is empty or whitespace-only.
    EmptyNote,
    /// A stored row lacks one of `RECORD_COLUMNS`.
    MissingColumn(&'static str),
    /// A stored row carries an unparsable date.
    InvalidDate(String),
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyNote => write!(f, "personal note cannot be empty"),
            Self::MissingColumn(column) => write!(f, "record row is missing column `{column}`"),
            Self::InvalidDate(value) => {
                write!(f, "invalid record date `{value}`; expected YYYY-MM-DD")
            }
        }
    }
}

impl Error for RecordValidationError {}

/// Returns the trimmed personal note, rejecting blank input.
///
/// Callers can run this before any AI round trip; `finalize` applies it again.
pub fn validate_note(user_note: &str) -> Result<&str, RecordValidationError> {
    let note = user_note.trim();
    if note.is_empty() {
        return Err(RecordValidationError::EmptyNote);
    }
    Ok(note)
}

/// One persisted capture: AI analysis, reviewed actions and the user's note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InternalizationRecord {
    date: NaiveDate,
    category: String,
    user_note: String,
    action_summary: String,
    analysis_text: String,
    raw_source: String,
}

impl InternalizationRecord {
    /// Finalizes a reviewed board and note into a record.
    ///
    /// The board is rendered at this point; later board edits do not affect
    /// the record.
    pub fn finalize(
        date: NaiveDate,
        category: impl Into<String>,
        user_note: &str,
        board: &TaskBoard,
        analysis_text: impl Into<String>,
        raw_source: impl Into<String>,
    ) -> Result<Self, RecordValidationError> {
        let note = validate_note(user_note)?;

        Ok(Self {
            date,
            category: category.into(),
            user_note: note.to_string(),
            action_summary: board.render(),
            analysis_text: analysis_text.into(),
            raw_source: raw_source.into(),
        })
    }

    /// Decodes a stored row keyed by column name.
    pub fn from_row(row: &BTreeMap<String, String>) -> Result<Self, RecordValidationError> {
        let field = |column: &'static str| {
            row.get(column)
                .cloned()
                .ok_or(RecordValidationError::MissingColumn(column))
        };

        let date_text = field(RECORD_COLUMNS[0])?;
        let date = NaiveDate::parse_from_str(date_text.trim(), DATE_FORMAT)
            .map_err(|_| RecordValidationError::InvalidDate(date_text.clone()))?;
        let user_note = field(RECORD_COLUMNS[2])?;
        if user_note.trim().is_empty() {
            return Err(RecordValidationError::EmptyNote);
        }

        Ok(Self {
            date,
            category: field(RECORD_COLUMNS[1])?,
            user_note,
            action_summary: field(RECORD_COLUMNS[3])?,
            analysis_text: field(RECORD_COLUMNS[4])?,
            raw_source: field(RECORD_COLUMNS[5])?,
        })
    }

    /// Field values in `RECORD_COLUMNS` order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.date.format(DATE_FORMAT).to_string(),
            self.category.clone(),
            self.user_note.clone(),
            self.action_summary.clone(),
            self.analysis_text.clone(),
            self.raw_source.clone(),
        ]
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn user_note(&self) -> &str {
        &self.user_note
    }

    /// Rendered task board text.
    pub fn action_summary(&self) -> &str {
        &self.action_summary
    }

    pub fn analysis_text(&self) -> &str {
        &self.analysis_text
    }

    /// Original pasted content.
    pub fn raw_source(&self) -> &str {
        &self.raw_source
    }
}
