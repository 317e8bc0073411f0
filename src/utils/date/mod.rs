// Date utility functions
// Calendar arithmetic shared by the schedule builder, the pager and the month grid

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};

/// Calendar date of an absolute timestamp as seen from `tz`.
pub fn local_date_in<Tz: TimeZone>(instant: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

pub fn last_day_of_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

/// Moves `current` by `delta_months`, clamping the day to the target month's length.
pub fn shift_month_preserving_day(current: NaiveDate, delta_months: i32) -> NaiveDate {
    let total_months = (current.year() * 12) + (current.month() as i32 - 1) + delta_months;
    let new_year = total_months.div_euclid(12);
    let new_month = total_months.rem_euclid(12) as u32 + 1;
    let day = current.day().min(last_day_of_month(new_year, new_month));
    NaiveDate::from_ymd_opt(new_year, new_month, day).unwrap_or(current)
}

/// First day of the week containing `date`.
///
/// `first_day_of_week` follows the settings convention: 0 = Sunday, 1 = Monday, ...
pub fn start_of_week(date: NaiveDate, first_day_of_week: u8) -> NaiveDate {
    let first = weekday_from_index(first_day_of_week);
    let days_back = (7 + date.weekday().num_days_from_sunday() as i64
        - first.num_days_from_sunday() as i64)
        % 7;
    date - Duration::days(days_back)
}

/// UTC instants covering the days `first..=last` in every zone: one day of
/// padding on each side.
pub fn padded_utc_bounds(first: NaiveDate, last: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = (first - Duration::days(1)).and_time(NaiveTime::MIN);
    let end = (last + Duration::days(2)).and_time(NaiveTime::MIN) - Duration::seconds(1);
    (Utc.from_utc_datetime(&start), Utc.from_utc_datetime(&end))
}

pub fn weekday_from_index(index: u8) -> Weekday {
    match index % 7 {
        0 => Weekday::Sun,
        1 => Weekday::Mon,
        2 => Weekday::Tue,
        3 => Weekday::Wed,
        4 => Weekday::Thu,
        5 => Weekday::Fri,
        _ => Weekday::Sat,
    }
}
