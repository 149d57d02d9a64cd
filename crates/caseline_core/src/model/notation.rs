//! Textual period notation.
//!
//! # Responsibility
//! - Parse operator/CLI input into validated `Period` values.
//!
//! # Invariants
//! - `parse_period` (and `FromStr`) results pass `Period::try_create`, month
//!   ceiling included.
//! - `parse_period_unbounded` skips the ceiling only. Derived values such as a
//!   reduction longer than 12 months re-read through it, not `parse_period`.
//! - Every `Display` output parses back through `parse_period_unbounded`.
//!
//! Accepted forms:
//! - `2021-03` (one month)
//! - `2021-01..2021-12` (month range)
//! - `2021-01-01..2021-12-31` or `2021-01-01/2021-12-31` (date range)

use crate::model::period::{last_day_of_month, Period, PeriodError};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static MONTH_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})-(\d{2})(?:\.\.(\d{4})-(\d{2}))?$").expect("valid month range regex")
});
static DATE_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2})(?:\.\.|/)(\d{4}-\d{2}-\d{2})$")
        .expect("valid date range regex")
});

/// Notation parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodParseError {
    InvalidFormat(String),
    InvalidDate(String),
    Invalid(PeriodError),
}

impl Display for PeriodParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFormat(input) => write!(
                f,
                "unrecognised period `{input}`; expected YYYY-MM, YYYY-MM..YYYY-MM or YYYY-MM-DD..YYYY-MM-DD"
            ),
            Self::InvalidDate(input) => write!(f, "invalid calendar date in `{input}`"),
            Self::Invalid(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PeriodParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::InvalidFormat(_) | Self::InvalidDate(_) => None,
        }
    }
}

impl From<PeriodError> for PeriodParseError {
    fn from(value: PeriodError) -> Self {
        Self::Invalid(value)
    }
}

impl FromStr for Period {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_period(s)
    }
}

/// Parses one period from its textual notation.
pub fn parse_period(input: &str) -> Result<Period, PeriodParseError> {
    parse_with(input, Period::try_create)
}

/// Parses notation without the month ceiling.
///
/// Use for text produced by `Display` on algebra results (merges, reductions,
/// spans), which may legitimately exceed `MAX_PERIOD_MONTHS`.
pub fn parse_period_unbounded(input: &str) -> Result<Period, PeriodParseError> {
    parse_with(input, Period::try_create_unbounded)
}

fn parse_with(
    input: &str,
    build: fn(NaiveDate, NaiveDate) -> Result<Period, PeriodError>,
) -> Result<Period, PeriodParseError> {
    let trimmed = input.trim();

    if let Some(caps) = DATE_RANGE_RE.captures(trimmed) {
        let fra_og_med = parse_date(&caps[1])?;
        let til_og_med = parse_date(&caps[2])?;
        return Ok(build(fra_og_med, til_og_med)?);
    }

    if let Some(caps) = MONTH_RANGE_RE.captures(trimmed) {
        let fra_og_med = month_start(&caps[1], &caps[2], trimmed)?;
        let end_month = match (caps.get(3), caps.get(4)) {
            (Some(year), Some(month)) => month_start(year.as_str(), month.as_str(), trimmed)?,
            _ => fra_og_med,
        };
        return Ok(build(fra_og_med, last_day_of_month(end_month))?);
    }

    Err(PeriodParseError::InvalidFormat(trimmed.to_string()))
}

fn parse_date(value: &str) -> Result<NaiveDate, PeriodParseError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| PeriodParseError::InvalidDate(value.to_string()))
}

fn month_start(year: &str, month: &str, input: &str) -> Result<NaiveDate, PeriodParseError> {
    let invalid = || PeriodParseError::InvalidDate(input.to_string());
    let year = year.parse::<i32>().map_err(|_| invalid())?;
    let month = month.parse::<u32>().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)
}
