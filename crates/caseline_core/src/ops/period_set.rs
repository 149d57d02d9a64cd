//! Operations over collections of periods.
//!
//! # Responsibility
//! - Subtract, reduce and compare sets of `Period` values.
//!
//! # Invariants
//! - Inputs are never mutated; every result is a fresh `Vec`.
//! - Reduced output is sorted by start and contains no overlapping or
//!   adjacent pair.

use crate::model::period::Period;

/// The parts of `base` not covered by `remove`, in chronological order.
pub fn subtract(base: Period, remove: Period) -> Vec<Period> {
    base.subtract(remove)
}

/// Removes every period in `removals` from every period in `bases`.
///
/// Pieces are grouped by base in input order; each group is chronological.
pub fn subtract_all(bases: &[Period], removals: &[Period]) -> Vec<Period> {
    bases
        .iter()
        .flat_map(|base| {
            removals.iter().fold(vec![*base], |remaining, removal| {
                remaining
                    .into_iter()
                    .flat_map(|piece| piece.subtract(*removal))
                    .collect()
            })
        })
        .collect()
}

/// Smallest ordered set of periods covering exactly the same days as the
/// input. Overlapping, adjacent and duplicate periods collapse into one.
pub fn reduce_to_minimal_span(periods: &[Period]) -> Vec<Period> {
    let mut sorted = periods.to_vec();
    sorted.sort_unstable();

    let mut reduced: Vec<Period> = Vec::with_capacity(sorted.len());
    for period in sorted {
        if let Some(last) = reduced.last_mut() {
            if let Ok(merged) = last.merge(period) {
                *last = merged;
                continue;
            }
        }
        reduced.push(period);
    }
    reduced
}

/// Returns whether `candidates` reduce to exactly `target`.
///
/// Gaps, partial coverage and coverage reaching past either bound of
/// `target` all yield `false`.
pub fn fully_covered_by(target: Period, candidates: &[Period]) -> bool {
    matches!(reduce_to_minimal_span(candidates).as_slice(), [only] if *only == target)
}

/// Returns whether each item lies entirely inside at least one container.
///
/// An item straddling two touching containers is not contained.
pub fn contains_all(container: &[Period], items: &[Period]) -> bool {
    items
        .iter()
        .all(|item| container.iter().any(|outer| outer.contains(*item)))
}

/// Returns whether any two periods in the slice share a day.
pub fn has_overlapping(periods: &[Period]) -> bool {
    let mut sorted = periods.to_vec();
    sorted.sort_unstable();

    let mut latest_end = None;
    for period in sorted {
        if latest_end.is_some_and(|end| period.fra_og_med() <= end) {
            return true;
        }
        latest_end = latest_end.max(Some(period.til_og_med()));
    }
    false
}

/// Smallest single period covering every input, gaps included.
pub fn span(periods: &[Period]) -> Option<Period> {
    let first = periods.iter().map(Period::fra_og_med).min()?;
    let last = periods.iter().map(Period::til_og_med).max()?;
    // Why: a span is derived, not caller input; the month ceiling does not apply.
    Period::try_create_unbounded(first, last).ok()
}

/// Returns whether the input is non-empty and covers one unbroken range.
pub fn is_contiguous(periods: &[Period]) -> bool {
    reduce_to_minimal_span(periods).len() == 1
}

/// Parts of `window` covered by none of `periods`, minimal and ordered.
pub fn gaps(window: Period, periods: &[Period]) -> Vec<Period> {
    reduce_to_minimal_span(&subtract_all(&[window], periods))
}
