//! Month-aligned closed date interval.
//!
//! # Responsibility
//! - Define the `Period` value shared by every time-bounded case record.
//! - Validate construction input and expose the relational algebra
//!   (containment, overlap, adjacency, intersection, shift, merge, subtract).
//!
//! # Invariants
//! - `fra_og_med` is the first day of its month.
//! - `til_og_med` is the last day of its month.
//! - `fra_og_med <= til_og_med`.
//! - Periods built from caller input span at most `MAX_PERIOD_MONTHS` months.
//!
//! # See also
//! - `crate::ops::period_set` for operations over collections of periods.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::{max, min};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::iter::FusedIterator;

/// Upper bound on the number of months a caller-supplied period may span.
pub const MAX_PERIOD_MONTHS: u32 = 12;

/// Leading text of the `create` panic message.
pub(crate) const CREATE_PANIC_PREFIX: &str = "invalid period";
/// Trailing text of the `shift` panic message.
pub(crate) const SHIFT_PANIC_SUFFIX: &str = "leaves the calendar";

/// Inclusive range of whole calendar months `[fra_og_med, til_og_med]`.
///
/// Equality, ordering and hashing use the two bounds only. Ordering sorts by
/// start, then by end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawPeriod")]
pub struct Period {
    fra_og_med: NaiveDate,
    til_og_med: NaiveDate,
}

/// Unvalidated wire shape; converted through `Period::try_create_unbounded`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPeriod {
    fra_og_med: NaiveDate,
    til_og_med: NaiveDate,
}

impl TryFrom<RawPeriod> for Period {
    type Error = PeriodError;

    fn try_from(value: RawPeriod) -> Result<Self, Self::Error> {
        Self::try_create_unbounded(value.fra_og_med, value.til_og_med)
    }
}

/// Recoverable construction errors.
///
/// Checks run in declaration order; the first failing check is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodError {
    StartNotFirstDayOfMonth,
    StartAfterEnd,
    EndNotLastDayOfMonth,
    TooManyMonths { months: u32 },
}

impl Display for PeriodError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StartNotFirstDayOfMonth => {
                write!(f, "period start must be the first day of a month")
            }
            Self::StartAfterEnd => write!(f, "period start must not be after period end"),
            Self::EndNotLastDayOfMonth => write!(f, "period end must be the last day of a month"),
            Self::TooManyMonths { months } => write!(
                f,
                "period spans {months} months; at most {MAX_PERIOD_MONTHS} are allowed"
            ),
        }
    }
}

impl Error for PeriodError {}

/// Returned by `Period::merge` when the two periods neither overlap nor touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CannotMergeError {
    pub left: Period,
    pub right: Period,
}

impl Display for CannotMergeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "cannot merge {} with {}: periods are neither overlapping nor adjacent",
            self.left, self.right
        )
    }
}

impl Error for CannotMergeError {}

impl Period {
    /// Creates a period from bounds the caller already knows to be valid.
    ///
    /// # Panics
    /// Panics when any construction invariant fails, including the
    /// `MAX_PERIOD_MONTHS` ceiling. Use `try_create` for unchecked input.
    pub fn create(fra_og_med: NaiveDate, til_og_med: NaiveDate) -> Self {
        match Self::try_create(fra_og_med, til_og_med) {
            Ok(period) => period,
            Err(err) => panic!("{CREATE_PANIC_PREFIX} {fra_og_med}..{til_og_med}: {err}"),
        }
    }

    /// Creates a period, reporting the first violated invariant.
    ///
    /// Check order: start alignment, ordering, end alignment, month ceiling.
    pub fn try_create(fra_og_med: NaiveDate, til_og_med: NaiveDate) -> Result<Self, PeriodError> {
        let period = Self::try_create_unbounded(fra_og_med, til_og_med)?;
        let months = period.month_count();
        if months > MAX_PERIOD_MONTHS {
            return Err(PeriodError::TooManyMonths { months });
        }
        Ok(period)
    }

    /// Same checks as `try_create` without the month ceiling.
    ///
    /// Unions of valid periods may legitimately span more than a year; this is
    /// the entry point for such derived values and for deserialisation.
    pub fn try_create_unbounded(
        fra_og_med: NaiveDate,
        til_og_med: NaiveDate,
    ) -> Result<Self, PeriodError> {
        if fra_og_med.day() != 1 {
            return Err(PeriodError::StartNotFirstDayOfMonth);
        }
        if fra_og_med > til_og_med {
            return Err(PeriodError::StartAfterEnd);
        }
        if last_day_of_month(til_og_med) != til_og_med {
            return Err(PeriodError::EndNotLastDayOfMonth);
        }
        Ok(Self::from_bounds(fra_og_med, til_og_med))
    }

    /// Single-month period, or `None` for an out-of-range year or month.
    pub fn for_month(year: i32, month: u32) -> Option<Self> {
        let fra_og_med = NaiveDate::from_ymd_opt(year, month, 1)?;
        Some(Self::from_bounds(fra_og_med, last_day_of_month(fra_og_med)))
    }

    /// January through December of `year`.
    pub fn for_year(year: i32) -> Option<Self> {
        Some(Self::from_bounds(
            NaiveDate::from_ymd_opt(year, 1, 1)?,
            NaiveDate::from_ymd_opt(year, 12, 31)?,
        ))
    }

    /// Builds a period from month indices (`year * 12 + month0`), inclusive.
    pub(crate) fn from_month_span(first: i64, last: i64) -> Option<Self> {
        if first > last {
            return None;
        }
        let fra_og_med = first_day_of_month_index(first)?;
        let til_og_med = last_day_of_month(first_day_of_month_index(last)?);
        Some(Self::from_bounds(fra_og_med, til_og_med))
    }

    #[inline]
    fn from_bounds(fra_og_med: NaiveDate, til_og_med: NaiveDate) -> Self {
        debug_assert!(fra_og_med.day() == 1, "start must be first day of month");
        debug_assert!(fra_og_med <= til_og_med, "start must not be after end");
        debug_assert!(
            last_day_of_month(til_og_med) == til_og_med,
            "end must be last day of month"
        );
        Self {
            fra_og_med,
            til_og_med,
        }
    }

    /// First day of the period (inclusive).
    #[inline]
    pub fn fra_og_med(&self) -> NaiveDate {
        self.fra_og_med
    }

    /// Last day of the period (inclusive).
    #[inline]
    pub fn til_og_med(&self) -> NaiveDate {
        self.til_og_med
    }

    /// Number of calendar months spanned, counting both ends.
    pub fn month_count(&self) -> u32 {
        let span = month_index(self.til_og_med) - month_index(self.fra_og_med) + 1;
        u32::try_from(span).unwrap_or(u32::MAX)
    }

    /// Iterates the single-month periods of `self` in ascending order.
    pub fn months(&self) -> MonthIter {
        MonthIter {
            front: month_index(self.fra_og_med),
            back: month_index(self.til_og_med) + 1,
        }
    }

    /// Decomposes `self` into one period per calendar month, ascending.
    pub fn to_months(&self) -> Vec<Period> {
        self.months().collect()
    }

    pub fn first_month(&self) -> Period {
        Self::from_bounds(self.fra_og_med, last_day_of_month(self.fra_og_med))
    }

    pub fn last_month(&self) -> Period {
        Self::from_bounds(first_day_of_month(self.til_og_med), self.til_og_med)
    }

    pub fn is_single_month(&self) -> bool {
        month_index(self.fra_og_med) == month_index(self.til_og_med)
    }

    /// Returns whether `date` falls inside `self`, bounds inclusive.
    #[inline]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.fra_og_med <= date && date <= self.til_og_med
    }

    /// Returns whether `other` lies entirely inside `self`.
    #[inline]
    pub fn contains(&self, other: Period) -> bool {
        self.fra_og_med <= other.fra_og_med && other.til_og_med <= self.til_og_med
    }

    /// Returns whether every item lies entirely inside `self`.
    ///
    /// Vacuously true for an empty slice.
    pub fn contains_all(&self, items: &[Period]) -> bool {
        items.iter().all(|item| self.contains(*item))
    }

    /// Returns whether the two periods share at least one day.
    #[inline]
    pub fn overlaps(&self, other: Period) -> bool {
        self.fra_og_med <= other.til_og_med && other.fra_og_med <= self.til_og_med
    }

    /// Returns whether the periods do not overlap and one starts in the month
    /// right after the other ends. A period is never adjacent to itself.
    pub fn is_adjacent_to(&self, other: Period) -> bool {
        if self.overlaps(other) {
            return false;
        }
        month_index(self.til_og_med) + 1 == month_index(other.fra_og_med)
            || month_index(other.til_og_med) + 1 == month_index(self.fra_og_med)
    }

    #[inline]
    pub fn starts_before(&self, other: Period) -> bool {
        self.fra_og_med < other.fra_og_med
    }

    #[inline]
    pub fn starts_after(&self, other: Period) -> bool {
        self.fra_og_med > other.fra_og_med
    }

    #[inline]
    pub fn starts_same_time(&self, other: Period) -> bool {
        self.fra_og_med == other.fra_og_med
    }

    #[inline]
    pub fn starts_same_time_or_after(&self, other: Period) -> bool {
        self.fra_og_med >= other.fra_og_med
    }

    #[inline]
    pub fn starts_same_time_or_before(&self, other: Period) -> bool {
        self.fra_og_med <= other.fra_og_med
    }

    #[inline]
    pub fn ends_before(&self, other: Period) -> bool {
        self.til_og_med < other.til_og_med
    }

    #[inline]
    pub fn ends_after(&self, other: Period) -> bool {
        self.til_og_med > other.til_og_med
    }

    #[inline]
    pub fn ends_same_time(&self, other: Period) -> bool {
        self.til_og_med == other.til_og_med
    }

    #[inline]
    pub fn ends_same_time_or_before(&self, other: Period) -> bool {
        self.til_og_med <= other.til_og_med
    }

    #[inline]
    pub fn ends_same_time_or_after(&self, other: Period) -> bool {
        self.til_og_med >= other.til_og_med
    }

    /// Returns whether the end of `self` falls inside `other`.
    pub fn ends_within(&self, other: Period) -> bool {
        other.fra_og_med <= self.til_og_med && self.til_og_med <= other.til_og_med
    }

    /// Returns whether `self` ends strictly before `other` starts.
    #[inline]
    pub fn is_before(&self, other: Period) -> bool {
        self.til_og_med < other.fra_og_med
    }

    /// Returns whether `self` starts strictly after `other` ends.
    #[inline]
    pub fn is_after(&self, other: Period) -> bool {
        self.fra_og_med > other.til_og_med
    }

    /// Common part of the two periods, or `None` when they do not overlap.
    pub fn intersect(&self, other: Period) -> Option<Period> {
        let fra_og_med = max(self.fra_og_med, other.fra_og_med);
        let til_og_med = min(self.til_og_med, other.til_og_med);
        (fra_og_med <= til_og_med).then(|| Self::from_bounds(fra_og_med, til_og_med))
    }

    /// Moves both bounds by `months` whole months; negative moves backwards.
    ///
    /// Returns `None` when the result falls outside the supported calendar.
    pub fn checked_shift(&self, months: i32) -> Option<Period> {
        let offset = i64::from(months);
        Self::from_month_span(
            month_index(self.fra_og_med) + offset,
            month_index(self.til_og_med) + offset,
        )
    }

    /// Moves both bounds by `months` whole months; negative moves backwards.
    ///
    /// # Panics
    /// Panics when the result falls outside the supported calendar.
    pub fn shift(&self, months: i32) -> Period {
        self.checked_shift(months)
            .unwrap_or_else(|| panic!("shifting {self} by {months} months {SHIFT_PANIC_SUFFIX}"))
    }

    /// Smallest period covering both inputs, when they overlap or touch.
    pub fn merge(&self, other: Period) -> Result<Period, CannotMergeError> {
        if self.overlaps(other) || self.is_adjacent_to(other) {
            // Why: the union of two in-ceiling periods can reach 24 months,
            // so derived values skip `try_create` and its ceiling.
            Ok(Self::from_bounds(
                min(self.fra_og_med, other.fra_og_med),
                max(self.til_og_med, other.til_og_med),
            ))
        } else {
            Err(CannotMergeError {
                left: *self,
                right: other,
            })
        }
    }

    /// The parts of `self` not covered by `other`, in chronological order.
    ///
    /// Yields `[self]` when disjoint, nothing when fully covered, one piece
    /// when clipped at one end and two when `other` sits strictly inside.
    pub fn subtract(&self, other: Period) -> Vec<Period> {
        if !self.overlaps(other) {
            return vec![*self];
        }

        let mut pieces = Vec::with_capacity(2);
        if self.fra_og_med < other.fra_og_med {
            if let Some(til_og_med) = other.fra_og_med.pred_opt() {
                pieces.push(Self::from_bounds(self.fra_og_med, til_og_med));
            }
        }
        if self.til_og_med > other.til_og_med {
            if let Some(fra_og_med) = other.til_og_med.succ_opt() {
                pieces.push(Self::from_bounds(fra_og_med, self.til_og_med));
            }
        }
        pieces
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.fra_og_med, self.til_og_med)
    }
}

/// Iterator over the single-month periods of a `Period`.
#[derive(Debug, Clone)]
pub struct MonthIter {
    front: i64,
    back: i64,
}

impl Iterator for MonthIter {
    type Item = Period;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let month = Period::from_month_span(self.front, self.front)?;
        self.front += 1;
        Some(month)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.back - self.front).unwrap_or(0);
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for MonthIter {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let month = Period::from_month_span(self.back - 1, self.back - 1)?;
        self.back -= 1;
        Some(month)
    }
}

impl ExactSizeIterator for MonthIter {}

impl FusedIterator for MonthIter {}

impl IntoIterator for Period {
    type Item = Period;
    type IntoIter = MonthIter;

    fn into_iter(self) -> Self::IntoIter {
        self.months()
    }
}

/// Months since year zero: `year * 12 + month0`.
#[inline]
pub(crate) fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

fn first_day_of_month_index(index: i64) -> Option<NaiveDate> {
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    let month = u32::try_from(index.rem_euclid(12)).ok()? + 1;
    NaiveDate::from_ymd_opt(year, month, 1)
}

pub(crate) fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub(crate) fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    [31, 30, 29, 28]
        .into_iter()
        .find_map(|day| date.with_day(day))
        .unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::{Period, PeriodError, MAX_PERIOD_MONTHS};
    use chrono::NaiveDate;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
    }

    fn period(from: (i32, u32), to: (i32, u32)) -> Period {
        let end = Period::for_month(to.0, to.1).expect("valid end month");
        Period::create(date(from.0, from.1, 1), end.til_og_med())
    }

    #[test]
    fn try_create_reports_start_alignment_before_ordering() {
        let err = Period::try_create(date(2021, 5, 10), date(2021, 1, 31))
            .expect_err("misaligned start must fail");
        assert_eq!(err, PeriodError::StartNotFirstDayOfMonth);
    }

    #[test]
    fn try_create_reports_ordering_before_end_alignment() {
        let err = Period::try_create(date(2021, 5, 1), date(2021, 1, 15))
            .expect_err("reversed range must fail");
        assert_eq!(err, PeriodError::StartAfterEnd);
    }

    #[test]
    fn try_create_rejects_misaligned_end() {
        let err = Period::try_create(date(2021, 1, 1), date(2021, 2, 27))
            .expect_err("misaligned end must fail");
        assert_eq!(err, PeriodError::EndNotLastDayOfMonth);
    }

    #[test]
    fn try_create_accepts_leap_day_end() {
        let period = Period::try_create(date(2024, 2, 1), date(2024, 2, 29))
            .expect("leap day is the last day of february 2024");
        assert!(period.is_single_month());
    }

    #[test]
    fn ceiling_accepts_twelve_and_rejects_thirteen_months() {
        assert!(Period::try_create(date(2021, 1, 1), date(2021, 12, 31)).is_ok());
        let err = Period::try_create(date(2021, 1, 1), date(2022, 1, 31))
            .expect_err("thirteen months must fail");
        assert_eq!(err, PeriodError::TooManyMonths { months: 13 });
        assert!(Period::try_create_unbounded(date(2021, 1, 1), date(2022, 1, 31)).is_ok());
        assert_eq!(MAX_PERIOD_MONTHS, 12);
    }

    #[test]
    #[should_panic(expected = "at most 12")]
    fn create_panics_on_thirteen_months() {
        let _ = Period::create(date(2021, 1, 1), date(2022, 1, 31));
    }

    #[test]
    #[should_panic(expected = "first day of a month")]
    fn create_panics_on_misaligned_start() {
        let _ = Period::create(date(2021, 1, 2), date(2021, 1, 31));
    }

    #[test]
    fn month_decomposition_matches_bounds() {
        let year = period((2021, 1), (2021, 12));
        let months = year.to_months();
        assert_eq!(months.len(), 12);
        assert_eq!(year.month_count(), 12);
        assert_eq!(months[0], Period::for_month(2021, 1).expect("january"));
        assert_eq!(months[11].til_og_med(), date(2021, 12, 31));
        assert_eq!(year.months().next_back(), Some(year.last_month()));
        assert_eq!(year.months().len(), 12);
    }

    #[test]
    fn months_cross_year_boundary() {
        let winter = period((2020, 11), (2021, 2));
        let starts: Vec<_> = winter.months().map(|m| m.fra_og_med()).collect();
        assert_eq!(
            starts,
            vec![
                date(2020, 11, 1),
                date(2020, 12, 1),
                date(2021, 1, 1),
                date(2021, 2, 1)
            ]
        );
    }

    #[test]
    fn adjacency_is_symmetric_and_excludes_self() {
        let jan = period((2021, 1), (2021, 1));
        let feb = period((2021, 2), (2021, 2));
        let apr = period((2021, 4), (2021, 4));
        assert!(jan.is_adjacent_to(feb));
        assert!(feb.is_adjacent_to(jan));
        assert!(!jan.is_adjacent_to(apr));
        assert!(!jan.is_adjacent_to(jan));
        assert!(jan.overlaps(jan));
    }

    #[test]
    fn ordering_predicates_compare_single_bounds() {
        let a = period((2021, 1), (2021, 6));
        let b = period((2021, 3), (2021, 6));
        assert!(a.starts_before(b));
        assert!(b.starts_after(a));
        assert!(!a.starts_same_time(b));
        assert!(b.starts_same_time_or_after(a));
        assert!(a.starts_same_time_or_before(b));
        assert!(a.ends_same_time(b));
        assert!(a.ends_same_time_or_before(b));
        assert!(a.ends_same_time_or_after(b));
        assert!(!a.ends_before(b));
        assert!(!a.ends_after(b));
    }

    #[test]
    fn ends_within_and_strict_order() {
        let first = period((2021, 1), (2021, 4));
        let second = period((2021, 3), (2021, 8));
        let later = period((2021, 5), (2021, 8));
        assert!(first.ends_within(second));
        assert!(!second.ends_within(first));
        assert!(first.is_before(later));
        assert!(later.is_after(first));
        assert!(!first.is_before(second));
    }

    #[test]
    fn intersect_returns_common_months() {
        let a = period((2021, 1), (2021, 6));
        let b = period((2021, 4), (2021, 9));
        assert_eq!(a.intersect(b), Some(period((2021, 4), (2021, 6))));
        assert_eq!(a.intersect(period((2021, 7), (2021, 8))), None);
    }

    #[test]
    fn shift_moves_both_bounds_across_years() {
        let feb = period((2021, 2), (2021, 2));
        assert_eq!(feb.shift(12), period((2022, 2), (2022, 2)));
        assert_eq!(
            period((2021, 1), (2021, 3)).shift(-2),
            period((2020, 11), (2021, 1))
        );
        assert_eq!(feb.shift(0), feb);
        assert_eq!(feb.checked_shift(i32::MAX), None);
    }

    #[test]
    fn merge_identical_returns_same_period() {
        let p = period((2021, 1), (2021, 3));
        assert_eq!(p.merge(p), Ok(p));
    }

    #[test]
    fn merge_rejects_gap() {
        let summer = period((2021, 6), (2021, 7));
        let autumn = period((2021, 10), (2021, 12));
        let err = summer.merge(autumn).expect_err("gap must not merge");
        assert_eq!(err.left, summer);
        assert_eq!(err.right, autumn);
        assert!(err.to_string().contains("neither overlapping nor adjacent"));
    }

    #[test]
    fn subtract_covers_the_four_cases() {
        let year = period((2021, 1), (2021, 12));
        assert_eq!(year.subtract(period((2022, 1), (2022, 3))), vec![year]);
        assert!(period((2021, 3), (2021, 4)).subtract(year).is_empty());
        assert_eq!(
            year.subtract(period((2021, 6), (2021, 6))),
            vec![period((2021, 1), (2021, 5)), period((2021, 7), (2021, 12))]
        );
        assert_eq!(
            year.subtract(period((2021, 10), (2022, 2))),
            vec![period((2021, 1), (2021, 9))]
        );
    }

    #[test]
    fn display_uses_iso_dates() {
        assert_eq!(
            period((2021, 1), (2021, 2)).to_string(),
            "2021-01-01..2021-02-28"
        );
    }
}
