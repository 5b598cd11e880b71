//! Domain model for the capture-review-save cycle.
//!
//! # Responsibility
//! - Define the taxonomy, the editable task board and the persisted record.
//! - Keep every business invariant checkable without storage or network.
//!
//! # Invariants
//! - A record is only built from a non-empty personal note.
//! - Task items are addressed by position, not by a stable id.

pub mod record;
pub mod task_board;
pub mod taxonomy;
