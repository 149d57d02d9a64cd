//! Period value model.
//!
//! # Responsibility
//! - Define the month-aligned `Period` value used by every time-bounded
//!   case record.
//! - Parse textual period notation for operator input.
//!
//! # Invariants
//! - Every live `Period` is closed, finite and month-aligned.
//! - `Period` is immutable; derived values are new instances.

pub mod notation;
pub mod period;
