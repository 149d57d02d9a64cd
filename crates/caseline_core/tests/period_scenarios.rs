use caseline_core::{
    fully_covered_by, reduce_to_minimal_span, span, subtract, CannotMergeError, Period,
    PeriodError,
};
use chrono::NaiveDate;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

fn month(month: u32) -> Period {
    Period::for_month(2021, month).expect("valid 2021 month")
}

fn months(from: u32, to: u32) -> Period {
    Period::create(month(from).fra_og_med(), month(to).til_og_med())
}

#[test]
fn misaligned_start_is_reported() {
    let err = Period::try_create(date(2021, 1, 10), date(2021, 12, 31))
        .expect_err("start on the 10th must fail");
    assert_eq!(err, PeriodError::StartNotFirstDayOfMonth);
}

#[test]
fn consecutive_months_reduce_to_one_period() {
    let reduced = reduce_to_minimal_span(&[month(1), month(2), month(3), month(4)]);
    assert_eq!(reduced, vec![Period::create(date(2021, 1, 1), date(2021, 4, 30))]);
}

#[test]
fn coverage_beyond_target_is_not_full_coverage() {
    let target = Period::create(date(2021, 2, 1), date(2021, 12, 31));
    let candidates = [
        Period::create(date(2021, 1, 1), date(2021, 6, 30)),
        Period::create(date(2021, 7, 1), date(2021, 12, 31)),
    ];
    assert!(!fully_covered_by(target, &candidates));
}

#[test]
fn removing_june_from_the_year_leaves_two_pieces() {
    let year = Period::create(date(2021, 1, 1), date(2021, 12, 31));
    let june = Period::create(date(2021, 6, 1), date(2021, 6, 30));
    assert_eq!(
        subtract(year, june),
        vec![
            Period::create(date(2021, 1, 1), date(2021, 5, 31)),
            Period::create(date(2021, 7, 1), date(2021, 12, 31)),
        ]
    );
}

#[test]
fn periods_with_a_gap_cannot_merge() {
    let summer = Period::create(date(2021, 6, 1), date(2021, 7, 31));
    let autumn = Period::create(date(2021, 10, 1), date(2021, 12, 31));
    assert_eq!(
        summer.merge(autumn),
        Err(CannotMergeError {
            left: summer,
            right: autumn,
        })
    );
}

#[test]
fn identical_periods_touch_by_overlap_not_adjacency() {
    let p = months(3, 8);
    assert!(p.overlaps(p));
    assert!(!p.is_adjacent_to(p));
    assert!(p.contains(p));
    assert_eq!(p.merge(p), Ok(p));
}

#[test]
fn adjacent_periods_merge_across_year_boundary() {
    let autumn = Period::create(date(2020, 9, 1), date(2020, 12, 31));
    let spring = Period::create(date(2021, 1, 1), date(2021, 4, 30));
    assert!(autumn.is_adjacent_to(spring));
    assert_eq!(
        autumn.merge(spring),
        Ok(Period::create(date(2020, 9, 1), date(2021, 4, 30)))
    );
}

#[test]
fn merged_result_may_exceed_the_construction_ceiling() {
    let merged = months(1, 12)
        .merge(Period::for_month(2022, 1).expect("january 2022"))
        .expect("adjacent periods merge");
    assert_eq!(merged.month_count(), 13);
    assert_eq!(
        Period::try_create(merged.fra_og_med(), merged.til_og_med()),
        Err(PeriodError::TooManyMonths { months: 13 })
    );

    let june_2022 = Period::for_month(2022, 6).expect("june 2022");
    let spanned = span(&[months(1, 3), june_2022]).expect("non-empty input");
    assert_eq!(spanned.month_count(), 18);
    assert_eq!(spanned.til_og_med(), june_2022.til_og_med());
}

#[test]
fn twelve_month_span_is_accepted_and_thirteen_rejected() {
    assert!(Period::try_create(date(2021, 3, 1), date(2022, 2, 28)).is_ok());
    assert_eq!(
        Period::try_create(date(2021, 3, 1), date(2022, 3, 31)),
        Err(PeriodError::TooManyMonths { months: 13 })
    );
}

#[test]
fn contains_date_uses_inclusive_bounds() {
    let p = months(2, 3);
    assert!(p.contains_date(date(2021, 2, 1)));
    assert!(p.contains_date(date(2021, 3, 31)));
    assert!(!p.contains_date(date(2021, 1, 31)));
    assert!(!p.contains_date(date(2021, 4, 1)));
}
