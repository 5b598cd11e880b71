//! Capture workflow service.
//!
//! # Responsibility
//! - Run one submit-review-save cycle: content to AI, parse, review, persist.
//! - Hold in-progress state in an explicit `CaptureSession` instead of any
//!   process-wide state.
//! - Read stored records back for review.
//!
//! # Invariants
//! - Blank content never reaches the AI collaborator.
//! - A blank personal note never reaches the row store.
//! - Upstream failures (AI, store) are returned unchanged inside `CaptureError`.
//! - Saving twice appends two rows; there is no dedup key.

use crate::ai::{GenerationError, GenerationRequest, ImagePayload, TextGenerator};
use crate::model::record::{InternalizationRecord, RecordValidationError};
use crate::model::task_board::TaskBoard;
use crate::parser::response::{ParsedAnalysis, ResponseParser};
use crate::prompt::build_analysis_prompt;
use crate::repo::sheet_repo::{RepoError, RowStore};
use chrono::{Local, NaiveDate};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Workflow error. Validation variants are recoverable by the user; the rest
/// wrap upstream failures.
#[derive(Debug)]
pub enum CaptureError {
    /// Submitted content is blank.
    EmptyContent,
    /// Record could not be built (e.g. blank personal note).
    InvalidRecord(RecordValidationError),
    /// AI collaborator failed.
    Generation(GenerationError),
    /// Row store failed.
    Store(RepoError),
}

impl CaptureError {
    /// Whether the user can fix this by changing their input.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::EmptyContent | Self::InvalidRecord(_))
    }
}

impl Display for CaptureError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyContent => write!(f, "content cannot be empty"),
            Self::InvalidRecord(err) => write!(f, "{err}"),
            Self::Generation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CaptureError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::EmptyContent => None,
            Self::InvalidRecord(err) => Some(err),
            Self::Generation(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<RecordValidationError> for CaptureError {
    fn from(value: RecordValidationError) -> Self {
        Self::InvalidRecord(value)
    }
}

impl From<GenerationError> for CaptureError {
    fn from(value: GenerationError) -> Self {
        Self::Generation(value)
    }
}

impl From<RepoError> for CaptureError {
    fn from(value: RepoError) -> Self {
        Self::Store(value)
    }
}

/// In-progress state of one capture cycle.
///
/// Created by `CaptureService::analyze`, edited during review, and read by
/// `CaptureService::save`. Drop it after saving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSession {
    raw_source: String,
    analysis: ParsedAnalysis,
    board: TaskBoard,
}

impl CaptureSession {
    /// Starts a session from pasted content and its parsed AI response.
    pub fn new(raw_source: impl Into<String>, analysis: ParsedAnalysis) -> Self {
        let board = analysis.to_board();
        Self {
            raw_source: raw_source.into(),
            analysis,
            board,
        }
    }

    pub fn raw_source(&self) -> &str {
        &self.raw_source
    }

    pub fn analysis(&self) -> &ParsedAnalysis {
        &self.analysis
    }

    pub fn category(&self) -> &str {
        &self.analysis.category
    }

    pub fn board(&self) -> &TaskBoard {
        &self.board
    }

    /// Mutable board for review edits.
    pub fn board_mut(&mut self) -> &mut TaskBoard {
        &mut self.board
    }
}

/// Capture workflow over an AI collaborator and a row store.
pub struct CaptureService<G: TextGenerator, S: RowStore> {
    generator: G,
    store: S,
    parser: ResponseParser,
    model: String,
}

impl<G: TextGenerator, S: RowStore> CaptureService<G, S> {
    pub fn new(generator: G, store: S, parser: ResponseParser, model: impl Into<String>) -> Self {
        Self {
            generator,
            store,
            parser,
            model: model.into(),
        }
    }

    /// Sends content to the AI and opens a review session on the response.
    ///
    /// # Errors
    /// - `EmptyContent` when `content` is blank (no AI call is made).
    /// - `Generation` when the AI collaborator fails.
    pub fn analyze(
        &self,
        content: &str,
        image: Option<ImagePayload>,
    ) -> Result<CaptureSession, CaptureError> {
        if content.trim().is_empty() {
            warn!("event=capture_analyze module=service status=rejected reason=empty_content");
            return Err(CaptureError::EmptyContent);
        }

        let request = GenerationRequest {
            model: self.model.clone(),
            prompt: build_analysis_prompt(
                content,
                self.parser.taxonomy(),
                self.parser.delimiters(),
            ),
            image,
        };
        let response = self.generator.generate(&request)?;
        Ok(self.open_session(content, &response))
    }

    /// Opens a review session on an already obtained AI response.
    pub fn open_session(&self, content: &str, response: &str) -> CaptureSession {
        let analysis = self.parser.parse(response);
        info!(
            "event=capture_analyze module=service status=ok has_action_block={} tasks={}",
            analysis.has_action_block,
            analysis.raw_action_lines.len()
        );
        CaptureSession::new(content, analysis)
    }

    /// Finalizes the session with today's local date and appends it.
    pub fn save(
        &self,
        session: &CaptureSession,
        user_note: &str,
    ) -> Result<InternalizationRecord, CaptureError> {
        self.save_on(session, user_note, Local::now().date_naive())
    }

    /// Finalizes the session with an explicit date and appends it.
    ///
    /// # Errors
    /// - `InvalidRecord(EmptyNote)` when the note is blank; the store is untouched.
    /// - `Store` when the append fails.
    pub fn save_on(
        &self,
        session: &CaptureSession,
        user_note: &str,
        date: NaiveDate,
    ) -> Result<InternalizationRecord, CaptureError> {
        let record = match InternalizationRecord::finalize(
            date,
            session.category(),
            user_note,
            session.board(),
            session.analysis().analysis_text.clone(),
            session.raw_source(),
        ) {
            Ok(record) => record,
            Err(err) => {
                warn!("event=capture_save module=service status=rejected reason={err}");
                return Err(err.into());
            }
        };

        self.store.append_row(&record.to_row())?;
        info!(
            "event=capture_save module=service status=ok tasks={} tasks_done={}",
            session.board().len(),
            session.board().done_count()
        );
        Ok(record)
    }

    /// Stored records, newest first.
    pub fn recent_records(&self) -> Result<Vec<InternalizationRecord>, CaptureError> {
        let rows = self.store.read_all()?;
        let mut records = rows
            .iter()
            .map(InternalizationRecord::from_row)
            .collect::<Result<Vec<_>, _>>()?;
        records.reverse();
        Ok(records)
    }
}
