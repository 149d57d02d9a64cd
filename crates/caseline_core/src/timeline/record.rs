//! Record capabilities consumed by timeline reconciliation.
//!
//! # Responsibility
//! - Describe what a period-bound record must expose to be overlaid.
//! - Provide `TimedEntry<T>` for callers without their own record type.
//!
//! # Invariants
//! - `reclip` only narrows the period (and owned nested periods) and assigns
//!   a fresh identity; every other attribute is carried over unchanged.
//! - Derived `PartialEq` is identity-aware; `FunctionalEq` ignores identity.

use crate::model::period::Period;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for period-bound records.
pub type RecordId = Uuid;

/// Period-bound record that can take part in `Timeline::reconcile`.
pub trait TimedRecord {
    /// Tie-breaker when two records share a recency key.
    type Id: Ord;
    /// Larger values are more recent and win overlaps.
    type Recency: Ord;

    fn id(&self) -> Self::Id;
    fn period(&self) -> Period;
    fn recency(&self) -> Self::Recency;

    /// Copy of `self` restricted to `period`, which lies inside
    /// `self.period()`. The copy gets a new identity.
    fn reclip(&self, period: Period) -> Self
    where
        Self: Sized;
}

/// Content equality that ignores identity and other bookkeeping fields.
pub trait FunctionalEq {
    fn functionally_equal(&self, other: &Self) -> bool;
}

/// Generic period-bound record ordered by creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedEntry<T> {
    id: RecordId,
    period: Period,
    created_at: DateTime<Utc>,
    payload: T,
}

impl<T> TimedEntry<T> {
    /// Creates an entry with a generated identity.
    pub fn new(period: Period, created_at: DateTime<Utc>, payload: T) -> Self {
        Self::with_id(Uuid::new_v4(), period, created_at, payload)
    }

    /// Creates an entry with a caller-provided identity.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(id: RecordId, period: Period, created_at: DateTime<Utc>, payload: T) -> Self {
        Self {
            id,
            period,
            created_at,
            payload,
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    pub fn into_payload(self) -> T {
        self.payload
    }
}

impl<T: Clone> TimedRecord for TimedEntry<T> {
    type Id = RecordId;
    type Recency = DateTime<Utc>;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn period(&self) -> Period {
        self.period
    }

    fn recency(&self) -> Self::Recency {
        self.created_at
    }

    fn reclip(&self, period: Period) -> Self {
        debug_assert!(
            self.period.contains(period),
            "reclip target {period} must lie inside {}",
            self.period
        );
        Self {
            id: Uuid::new_v4(),
            period,
            created_at: self.created_at,
            payload: self.payload.clone(),
        }
    }
}

impl<T: PartialEq> FunctionalEq for TimedEntry<T> {
    fn functionally_equal(&self, other: &Self) -> bool {
        self.period == other.period && self.payload == other.payload
    }
}

#[cfg(test)]
mod tests {
    use super::{FunctionalEq, TimedEntry, TimedRecord};
    use crate::model::period::Period;
    use chrono::{TimeZone, Utc};

    #[test]
    fn reclip_narrows_period_and_assigns_new_id() {
        let created_at = Utc
            .with_ymd_and_hms(2021, 1, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp");
        let year = Period::for_year(2021).expect("2021");
        let march = Period::for_month(2021, 3).expect("march");
        let entry = TimedEntry::new(year, created_at, "sats=høy".to_string());

        let clipped = entry.reclip(march);

        assert_eq!(clipped.period(), march);
        assert_ne!(clipped.id(), entry.id());
        assert_eq!(clipped.created_at(), entry.created_at());
        assert_eq!(clipped.payload(), entry.payload());
        assert_ne!(clipped, entry);
        assert!(!clipped.functionally_equal(&entry));
        assert!(clipped.functionally_equal(&entry.reclip(march)));
    }
}
