//! Compact month grid used by the top-bar month dropdown.
//!
//! Each cell carries at most [`MAX_DOTS`] indicator dots plus a count of
//! whatever did not fit.

use chrono::{Duration, Local, NaiveDate, TimeZone};

use crate::models::event::Event;
use crate::models::holiday::Holiday;
use crate::models::year_month::YearMonth;
use crate::utils::date::start_of_week;

pub const MAX_DOTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DotKind {
    Holiday,
    Event { color: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DayIndicator {
    pub dots: Vec<DotKind>,
    pub overflow: usize,
}

impl DayIndicator {
    pub fn is_empty(&self) -> bool {
        self.dots.is_empty()
    }

    pub fn total(&self) -> usize {
        self.dots.len() + self.overflow
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGridCell {
    pub date: NaiveDate,
    pub in_month: bool,
    pub is_today: bool,
    pub is_selected: bool,
    pub indicator: DayIndicator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub month: YearMonth,
    pub weeks: Vec<Vec<MonthGridCell>>,
}

impl MonthGrid {
    pub fn build(
        month: YearMonth,
        first_day_of_week: u8,
        events: &[Event],
        holidays: &[Holiday],
        selected: NaiveDate,
    ) -> Self {
        let today = Local::now().date_naive();
        Self::build_in(month, first_day_of_week, events, holidays, selected, today, &Local)
    }

    pub fn build_in<Tz: TimeZone>(
        month: YearMonth,
        first_day_of_week: u8,
        events: &[Event],
        holidays: &[Holiday],
        selected: NaiveDate,
        today: NaiveDate,
        tz: &Tz,
    ) -> Self {
        let grid_start = start_of_week(month.first_day(), first_day_of_week);
        let grid_end = month.last_day();

        let mut timed: Vec<(NaiveDate, &Event)> = events
            .iter()
            .map(|event| (event.day_in(tz), event))
            .filter(|(day, _)| *day >= grid_start)
            .collect();
        timed.sort_by(|a, b| a.1.start.cmp(&b.1.start));

        let mut weeks = Vec::new();
        let mut week_start = grid_start;
        while week_start <= grid_end {
            let week = (0..7)
                .map(|offset| {
                    let date = week_start + Duration::days(offset);
                    MonthGridCell {
                        date,
                        in_month: month.contains(date),
                        is_today: date == today,
                        is_selected: date == selected,
                        indicator: indicator_for(date, &timed, holidays),
                    }
                })
                .collect();
            weeks.push(week);
            week_start += Duration::days(7);
        }

        Self { month, weeks }
    }

    pub fn cell(&self, date: NaiveDate) -> Option<&MonthGridCell> {
        self.weeks.iter().flatten().find(|cell| cell.date == date)
    }
}

fn indicator_for(date: NaiveDate, events: &[(NaiveDate, &Event)], holidays: &[Holiday]) -> DayIndicator {
    let holiday_dots = holidays
        .iter()
        .filter(|holiday| holiday.date == date)
        .map(|_| DotKind::Holiday);
    let event_dots = events
        .iter()
        .filter(|(day, _)| *day == date)
        .map(|(_, event)| DotKind::Event {
            color: event.color.clone(),
        });

    let all: Vec<DotKind> = holiday_dots.chain(event_dots).collect();
    let overflow = all.len().saturating_sub(MAX_DOTS);
    let dots = all.into_iter().take(MAX_DOTS).collect();
    DayIndicator { dots, overflow }
}
