//! Period algebra and timeline reconciliation for case management.
//! Every time-bounded case record builds on the month-aligned `Period`
//! defined here.

pub mod config;
pub mod logging;
pub mod model;
pub mod ops;
pub mod timeline;

pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::notation::{parse_period, parse_period_unbounded, PeriodParseError};
pub use model::period::{CannotMergeError, MonthIter, Period, PeriodError, MAX_PERIOD_MONTHS};
pub use ops::period_set::{
    contains_all, fully_covered_by, gaps, has_overlapping, is_contiguous, reduce_to_minimal_span,
    span, subtract, subtract_all,
};
pub use timeline::reconcile::{Timeline, TimelineSegment};
pub use timeline::record::{FunctionalEq, RecordId, TimedEntry, TimedRecord};

/// Minimal health-check API for smoke checks.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
