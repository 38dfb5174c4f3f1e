//! Month range calculation - pure calendar math for agreement date ranges.
//!
//! An agreement's effective range is `[beginning_date, ending_date]`: the
//! start date normalized to the first of its month and the end date
//! normalized to the last of its month. `months` enumerates the first-of-month
//! dates the recurring budget covers; a month is included only while its last
//! day falls strictly before the ending date, so the trailing month is
//! deliberately excluded even though `within_range` still reports its days as
//! in range for spend aggregation (retainer billing resets at month starts).

use chrono::{Datelike, Duration, Months, NaiveDate};
use std::ops::RangeInclusive;

/// A (year, month) pair indexing one calendar month of budgets.
///
/// Two months are equal iff year and month match. This is the in-code twin of
/// the nullable `year`/`month` columns on budget rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthKey {
    /// Calendar year
    pub year: i32,
    /// Calendar month, 1-12
    pub month: i32,
}

impl MonthKey {
    /// The month containing `date`.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month() as i32,
        }
    }

    /// First day of this month, or None for an out-of-range month number.
    #[must_use]
    pub fn first_day(self) -> Option<NaiveDate> {
        u32::try_from(self.month)
            .ok()
            .and_then(|month| NaiveDate::from_ymd_opt(self.year, month, 1))
    }

    /// Whether a budget row's nullable `(year, month)` columns name this month.
    #[must_use]
    pub fn matches(self, year: Option<i32>, month: Option<i32>) -> bool {
        year == Some(self.year) && month == Some(self.month)
    }
}

/// First day of the month containing `date`.
#[must_use]
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last day of the month containing `date`.
#[must_use]
pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    first_of_month(date) + Months::new(1) - Duration::days(1)
}

/// The agreement's start date normalized to the first of its month.
#[must_use]
pub fn beginning_date(start_date: Option<NaiveDate>) -> Option<NaiveDate> {
    start_date.map(first_of_month)
}

/// The agreement's end date normalized to the last of its month.
#[must_use]
pub fn ending_date(end_date: Option<NaiveDate>) -> Option<NaiveDate> {
    end_date.map(end_of_month)
}

/// The inclusive day range covered by the agreement, or None when either
/// bound is absent or the normalized bounds are inverted.
#[must_use]
pub fn date_range(
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Option<RangeInclusive<NaiveDate>> {
    let begin = beginning_date(start_date)?;
    let finish = ending_date(end_date)?;
    (begin <= finish).then_some(begin..=finish)
}

/// Whether `date` falls inside the agreement's effective range.
/// False whenever either bound is absent.
#[must_use]
pub fn within_range(
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    date: NaiveDate,
) -> bool {
    date_range(start_date, end_date).is_some_and(|range| range.contains(&date))
}

/// Ordered first-of-month dates covered by the recurring budget.
///
/// Starts at `beginning_date` and advances one calendar month at a time,
/// including a month only while its last day is strictly before
/// `ending_date`. Empty if either bound is absent. The trailing month is
/// always excluded: for a 2010-01-01..2010-03-31 agreement the result is
/// `[2010-01-01, 2010-02-01]`.
#[must_use]
pub fn months(start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) -> Vec<NaiveDate> {
    let (Some(begin), Some(finish)) = (beginning_date(start_date), ending_date(end_date)) else {
        return Vec::new();
    };

    let mut covered = Vec::new();
    let mut current = begin;
    while end_of_month(current) < finish {
        covered.push(current);
        current = current + Months::new(1);
    }
    covered
}

/// The subsequence of [`months`] strictly before `date`.
#[must_use]
pub fn months_before(
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    date: NaiveDate,
) -> Vec<NaiveDate> {
    months(start_date, end_date)
        .into_iter()
        .filter(|month| *month < date)
        .collect()
}

/// The subsequence of [`months`] strictly after `date`.
#[must_use]
pub fn months_after(
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    date: NaiveDate,
) -> Vec<NaiveDate> {
    months(start_date, end_date)
        .into_iter()
        .filter(|month| *month > date)
        .collect()
}
