// YearMonth module
// A calendar month without a day component

use std::fmt;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::utils::date::last_day_of_month;

/// A (year, month) pair. Ordering is chronological.
///
/// Years are limited to the range `NaiveDate` can represent, so every value
/// has a first and a last day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "YearMonthParts")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

#[derive(Deserialize)]
struct YearMonthParts {
    year: i32,
    month: u32,
}

impl TryFrom<YearMonthParts> for YearMonth {
    type Error = String;

    fn try_from(parts: YearMonthParts) -> Result<Self, Self::Error> {
        Self::new(parts.year, parts.month)
    }
}

impl YearMonth {
    /// Create a year-month, validating the month number.
    ///
    /// # Examples
    /// ```
    /// use agenda_calendar::models::year_month::YearMonth;
    ///
    /// let ym = YearMonth::new(2024, 12).unwrap();
    /// assert_eq!(ym.plus_months(2), YearMonth::new(2025, 2).unwrap());
    /// ```
    pub fn new(year: i32, month: u32) -> Result<Self, String> {
        if !(1..=12).contains(&month) {
            return Err(format!("Month must be between 1 and 12, got {}", month));
        }
        let (earliest, latest) = (Self::earliest(), Self::latest());
        if !(earliest.year..=latest.year).contains(&year) {
            return Err(format!(
                "Year must be between {} and {}, got {}",
                earliest.year, latest.year, year
            ));
        }
        Ok(Self { year, month })
    }

    /// First month `NaiveDate` can represent.
    pub fn earliest() -> Self {
        Self::from_date(NaiveDate::MIN)
    }

    /// Last month `NaiveDate` can represent.
    pub fn latest() -> Self {
        Self::from_date(NaiveDate::MAX)
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn current() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Shift by `months`, saturating at [`earliest`](Self::earliest) and
    /// [`latest`](Self::latest).
    pub fn plus_months(self, months: i32) -> Self {
        let total = (self.index() + i64::from(months))
            .clamp(Self::earliest().index(), Self::latest().index());
        Self {
            year: total.div_euclid(12) as i32,
            month: total.rem_euclid(12) as u32 + 1,
        }
    }

    pub fn minus_months(self, months: i32) -> Self {
        self.plus_months(months.saturating_neg())
    }

    /// Number of whole months from `self` to `other` (negative if `other` is earlier).
    pub fn months_until(&self, other: YearMonth) -> i32 {
        (other.year - self.year) * 12 + (other.month as i32 - self.month as i32)
    }

    pub fn length_of_month(&self) -> u32 {
        last_day_of_month(self.year, self.month)
    }

    pub fn first_day(&self) -> NaiveDate {
        // year and month are validated on construction
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, self.length_of_month())
            .unwrap_or(NaiveDate::MIN)
    }

    /// Every day of the month in order.
    pub fn days(&self) -> Vec<NaiveDate> {
        self.first_day()
            .iter_days()
            .take(self.length_of_month() as usize)
            .collect()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    fn index(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
