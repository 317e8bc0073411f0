//! Converts months plus flat event/holiday lists into ordered schedule items.

use chrono::{Local, NaiveDate, TimeZone};

use crate::models::event::Event;
use crate::models::holiday::Holiday;
use crate::models::schedule_item::ScheduleItem;
use crate::models::year_month::YearMonth;

const DAYS_PER_WEEK: usize = 7;

/// Build schedule items using the machine's local zone.
pub fn build_schedule_items(
    months: &[YearMonth],
    events: &[Event],
    holidays: &[Holiday],
) -> Vec<ScheduleItem> {
    build_schedule_items_in(months, events, holidays, &Local)
}

/// Build schedule items, assigning events to days as seen from `tz`.
///
/// Each month contributes a header, then week headers over runs of seven days
/// starting at the 1st, then one `DayEvents` per day that has anything on it.
/// Scans every event for every day; fine for personal calendar volumes.
pub fn build_schedule_items_in<Tz: TimeZone>(
    months: &[YearMonth],
    events: &[Event],
    holidays: &[Holiday],
    tz: &Tz,
) -> Vec<ScheduleItem> {
    let mut months = months.to_vec();
    months.sort_unstable();
    months.dedup();

    // Resolve each event's local day once rather than once per day.
    let event_days: Vec<(NaiveDate, &Event)> = events
        .iter()
        .map(|event| (event.day_in(tz), event))
        .collect();

    let mut items = Vec::new();

    for month in months {
        items.push(ScheduleItem::MonthHeader(month));

        for week in month.days().chunks(DAYS_PER_WEEK) {
            let (Some(first), Some(last)) = (week.first(), week.last()) else {
                continue;
            };
            items.push(ScheduleItem::WeekHeader {
                start: *first,
                end: *last,
            });

            for day in week {
                let mut day_events: Vec<Event> = event_days
                    .iter()
                    .filter(|(event_day, _)| event_day == day)
                    .map(|(_, event)| (*event).clone())
                    .collect();
                let day_holidays: Vec<Holiday> = holidays
                    .iter()
                    .filter(|holiday| holiday.date == *day)
                    .cloned()
                    .collect();

                if day_events.is_empty() && day_holidays.is_empty() {
                    continue;
                }

                day_events.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.title.cmp(&b.title)));
                items.push(ScheduleItem::DayEvents {
                    date: *day,
                    events: day_events,
                    holidays: day_holidays,
                });
            }
        }
    }

    items
}
