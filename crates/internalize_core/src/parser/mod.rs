//! Parsing of free-form AI output into structured analysis.
//!
//! # Responsibility
//! - Apply the delimiter protocol to raw responses.
//! - Normalize extracted action lines.
//!
//! # Invariants
//! - Nothing in this module returns an error for malformed AI output.

pub mod normalize;
pub mod response;
