//! Row-store contracts and persistence implementations.
//!
//! # Responsibility
//! - Define the append-only row store the capture workflow writes to.
//! - Keep SQLite query details out of the service layer.
//!
//! # Invariants
//! - Stores never update or delete rows.
//! - Appended rows must match the stored header positionally.

pub mod sheet_repo;
