// View Types
// Different calendar view modes

use serde::{Deserialize, Serialize};

use super::swipe::PageUnit;

/// Calendar view types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CalendarView {
    #[default]
    Month,
    Week,
    Day,
    ThreeDay,
    Schedule,
}

impl CalendarView {
    pub const ALL: [CalendarView; 5] = [
        CalendarView::Month,
        CalendarView::Week,
        CalendarView::Day,
        CalendarView::ThreeDay,
        CalendarView::Schedule,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CalendarView::Month => "Month",
            CalendarView::Week => "Week",
            CalendarView::Day => "Day",
            CalendarView::ThreeDay => "ThreeDay",
            CalendarView::Schedule => "Schedule",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|view| view.as_str().eq_ignore_ascii_case(value.trim()))
    }

    /// Paging unit of the swipeable views; the schedule scrolls instead.
    pub fn page_unit(&self) -> Option<PageUnit> {
        match self {
            CalendarView::Month => Some(PageUnit::Month),
            CalendarView::Week => Some(PageUnit::Days(7)),
            CalendarView::Day => Some(PageUnit::Days(1)),
            CalendarView::ThreeDay => Some(PageUnit::Days(3)),
            CalendarView::Schedule => None,
        }
    }
}
