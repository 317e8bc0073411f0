// Schedule item module
// One row of the virtualized agenda list

use chrono::NaiveDate;

use crate::models::event::Event;
use crate::models::holiday::Holiday;
use crate::models::year_month::YearMonth;

#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleItem {
    MonthHeader(YearMonth),
    WeekHeader {
        start: NaiveDate,
        end: NaiveDate,
    },
    DayEvents {
        date: NaiveDate,
        events: Vec<Event>,
        holidays: Vec<Holiday>,
    },
}

impl ScheduleItem {
    /// Stable identity for list diffing; unchanged when items are spliced around it.
    pub fn key(&self) -> String {
        match self {
            ScheduleItem::MonthHeader(month) => format!("month-{}", month),
            ScheduleItem::WeekHeader { start, end } => format!(
                "week-{}-{}",
                start.format("%Y-%m-%d"),
                end.format("%Y-%m-%d")
            ),
            ScheduleItem::DayEvents { date, .. } => format!("day-{}", date.format("%Y-%m-%d")),
        }
    }

    /// The date this item sorts under.
    pub fn date(&self) -> NaiveDate {
        match self {
            ScheduleItem::MonthHeader(month) => month.first_day(),
            ScheduleItem::WeekHeader { start, .. } => *start,
            ScheduleItem::DayEvents { date, .. } => *date,
        }
    }

    /// Ordering key: date first, then header before week before day.
    pub fn sort_key(&self) -> (NaiveDate, u8) {
        let rank = match self {
            ScheduleItem::MonthHeader(_) => 0,
            ScheduleItem::WeekHeader { .. } => 1,
            ScheduleItem::DayEvents { .. } => 2,
        };
        (self.date(), rank)
    }

    pub fn is_month_header(&self, month: YearMonth) -> bool {
        matches!(self, ScheduleItem::MonthHeader(m) if *m == month)
    }
}
