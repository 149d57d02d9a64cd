//! Recency-ordered overlay of period-bound records.
//!
//! # Responsibility
//! - Collapse overlapping records into one non-overlapping timeline where the
//!   most recent record wins every month it covers.
//!
//! # Invariants
//! - Segments are ordered by start and pairwise non-overlapping.
//! - Segment periods lie inside the window and cover exactly the months of
//!   the window that some record covers.
//! - Equal recency keys fall back to record id, then input position; the
//!   larger value wins.
//!
//! Works on the month grid: each month of the window gets one winner, and
//! runs of equal winners become one reclipped segment.

use crate::model::period::{month_index, Period};
use crate::ops::period_set;
use crate::timeline::record::TimedRecord;
use chrono::NaiveDate;
use log::debug;

/// One piece of a reconciled timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineSegment<T> {
    period: Period,
    record: T,
}

impl<T> TimelineSegment<T> {
    pub fn period(&self) -> Period {
        self.period
    }

    /// The winning record, reclipped to `period`.
    pub fn record(&self) -> &T {
        &self.record
    }

    pub fn into_record(self) -> T {
        self.record
    }
}

/// Reconciled, gap-aware view of records over a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline<T> {
    window: Period,
    segments: Vec<TimelineSegment<T>>,
}

impl<T: TimedRecord> Timeline<T> {
    /// Overlays `records` onto `window`, most recent record winning.
    ///
    /// Never fails. Months no record covers are left out; `gaps` lists them.
    pub fn reconcile(window: Period, records: &[T]) -> Self {
        let window_start = month_index(window.fra_og_med());
        let month_count = window.month_count() as usize;

        let keys: Vec<(T::Recency, T::Id)> = records
            .iter()
            .map(|record| (record.recency(), record.id()))
            .collect();
        let mut order: Vec<usize> = (0..records.len()).collect();
        // Why: equal recency falls back to the greater id, then the later
        // input position, so the same records always pick the same winner.
        order.sort_by(|&a, &b| keys[a].cmp(&keys[b]).then(a.cmp(&b)));

        // Why: one slot per window month; painting oldest first lets each
        // later record overwrite exactly the months it covers.
        let mut winners: Vec<Option<usize>> = vec![None; month_count];
        for &index in &order {
            let Some(clipped) = records[index].period().intersect(window) else {
                continue;
            };
            let from = (month_index(clipped.fra_og_med()) - window_start) as usize;
            let to = from + clipped.month_count() as usize;
            winners[from..to].fill(Some(index));
        }

        let mut segments = Vec::new();
        let mut offset = 0;
        while offset < month_count {
            let Some(winner) = winners[offset] else {
                offset += 1;
                continue;
            };
            let run_end = winners[offset..]
                .iter()
                .position(|candidate| *candidate != Some(winner))
                .map_or(month_count, |len| offset + len);
            if let Some(period) = Period::from_month_span(
                window_start + offset as i64,
                window_start + run_end as i64 - 1,
            ) {
                segments.push(TimelineSegment {
                    period,
                    record: records[winner].reclip(period),
                });
            }
            offset = run_end;
        }

        let uncovered = winners.iter().filter(|winner| winner.is_none()).count();
        debug!(
            "event=timeline_reconcile module=timeline status=ok window={} records={} segments={} uncovered_months={}",
            window,
            records.len(),
            segments.len(),
            uncovered
        );

        Self { window, segments }
    }
}

impl<T> Timeline<T> {
    pub fn window(&self) -> Period {
        self.window
    }

    pub fn segments(&self) -> &[TimelineSegment<T>] {
        &self.segments
    }

    pub fn into_segments(self) -> Vec<TimelineSegment<T>> {
        self.segments
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimelineSegment<T>> {
        self.segments.iter()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segment periods in chronological order.
    pub fn periods(&self) -> Vec<Period> {
        self.segments.iter().map(TimelineSegment::period).collect()
    }

    /// Parts of the window no record covered.
    pub fn gaps(&self) -> Vec<Period> {
        period_set::gaps(self.window, &self.periods())
    }

    /// Returns whether the segments tile the whole window.
    pub fn is_complete(&self) -> bool {
        self.gaps().is_empty()
    }

    /// Segment covering `date`, if any.
    pub fn segment_at(&self, date: NaiveDate) -> Option<&TimelineSegment<T>> {
        let index = self
            .segments
            .partition_point(|segment| segment.period.til_og_med() < date);
        self.segments
            .get(index)
            .filter(|segment| segment.period.contains_date(date))
    }
}

impl<T> IntoIterator for Timeline<T> {
    type Item = TimelineSegment<T>;
    type IntoIter = std::vec::IntoIter<TimelineSegment<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Timeline<T> {
    type Item = &'a TimelineSegment<T>;
    type IntoIter = std::slice::Iter<'a, TimelineSegment<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}
