//! Core logic for the knowledge internalization workflow.
//! This crate owns response parsing, task review and record finalization.

pub mod ai;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod parser;
pub mod prompt;
pub mod repo;
pub mod service;

pub use ai::{
    GeminiClient, GenerationError, GenerationRequest, GenerationResult, ImagePayload,
    TextGenerator,
};
pub use config::{api_key_from_env, AppConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::record::{
    validate_note, InternalizationRecord, RecordValidationError, RECORD_COLUMNS,
};
pub use model::task_board::{BoardError, TaskBoard, TaskItem};
pub use model::taxonomy::{Taxonomy, TaxonomyError};
pub use parser::normalize::normalize_action_line;
pub use parser::response::{parse_response, Delimiters, ParsedAnalysis, ResponseParser};
pub use prompt::build_analysis_prompt;
pub use repo::sheet_repo::{RepoError, RepoResult, RowStore, SheetRow, SqliteSheetStore};
pub use service::capture_service::{CaptureError, CaptureService, CaptureSession};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
