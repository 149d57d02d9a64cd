//! Timeline reconciliation over period-bound records.
//!
//! # Responsibility
//! - Define the record capabilities a caller's domain type must provide.
//! - Overlay records by recency into one non-overlapping timeline.
//!
//! # See also
//! - `crate::ops::period_set` for the set operations used on segment periods.

pub mod reconcile;
pub mod record;
