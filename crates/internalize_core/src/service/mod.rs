//! Workflow services.
//!
//! # Responsibility
//! - Orchestrate parser, task board, AI collaborator and row store into the
//!   submit-review-save cycle.
//! - Keep callers decoupled from storage and network details.

pub mod capture_service;
