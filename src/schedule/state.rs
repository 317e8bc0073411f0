use chrono::{Local, NaiveDate, TimeZone};

use super::builder::build_schedule_items_in;
use super::month_range::{MonthRange, DEFAULT_EXPANSION_MONTHS, DEFAULT_WINDOW_MONTHS};
use crate::models::event::Event;
use crate::models::holiday::Holiday;
use crate::models::schedule_item::ScheduleItem;
use crate::models::year_month::YearMonth;

/// Items from either edge at which the consumer should ask for more.
pub const LOAD_MORE_THRESHOLD: usize = 10;

/// Owns the materialised agenda list and grows it on demand.
///
/// Mutated only by its owner; callers use the counts returned by the
/// `load_more_*` methods to keep their scroll anchor in place.
pub struct ScheduleState<Tz: TimeZone = Local> {
    items: Vec<ScheduleItem>,
    month_range: MonthRange,
    initial_scroll_index: usize,
    events: Vec<Event>,
    holidays: Vec<Holiday>,
    expansion: u32,
    threshold: usize,
    tz: Tz,
}

impl ScheduleState<Local> {
    pub fn new(start: YearMonth, events: Vec<Event>, holidays: Vec<Holiday>) -> Self {
        Self::with_zone(start, events, holidays, Local)
    }
}

impl<Tz: TimeZone> ScheduleState<Tz> {
    pub fn with_zone(start: YearMonth, events: Vec<Event>, holidays: Vec<Holiday>, tz: Tz) -> Self {
        Self::with_window(
            start,
            events,
            holidays,
            tz,
            DEFAULT_WINDOW_MONTHS,
            DEFAULT_EXPANSION_MONTHS,
        )
    }

    pub fn with_window(
        start: YearMonth,
        events: Vec<Event>,
        holidays: Vec<Holiday>,
        tz: Tz,
        window_months: i32,
        expansion_months: u32,
    ) -> Self {
        let month_range = MonthRange::symmetric(start, window_months);
        let items = build_schedule_items_in(&month_range.months(), &events, &holidays, &tz);
        let initial_scroll_index = items
            .iter()
            .position(|item| item.is_month_header(start))
            .unwrap_or(0);

        log::debug!(
            "Schedule built for {} ({} months, {} items, initial index {})",
            start,
            month_range.months().len(),
            items.len(),
            initial_scroll_index
        );

        Self {
            items,
            month_range,
            initial_scroll_index,
            events,
            holidays,
            expansion: expansion_months,
            threshold: LOAD_MORE_THRESHOLD,
            tz,
        }
    }

    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn items(&self) -> &[ScheduleItem] {
        &self.items
    }

    pub fn month_range(&self) -> &MonthRange {
        &self.month_range
    }

    pub fn initial_scroll_index(&self) -> usize {
        self.initial_scroll_index
    }

    /// Reveal older months. Returns how many items were prepended.
    pub fn load_more_backward(&mut self) -> usize {
        self.month_range.expand_backward(self.expansion);
        let months = self.month_range.last_added_months_backward();
        let new_items = build_schedule_items_in(&months, &self.events, &self.holidays, &self.tz);
        let added = new_items.len();
        if added == 0 {
            return 0;
        }

        self.items.splice(0..0, new_items);
        self.initial_scroll_index += added;
        log::debug!(
            "Schedule expanded backward to {} (+{} items)",
            self.month_range.first_month(),
            added
        );
        added
    }

    /// Reveal newer months. Returns how many items were appended.
    pub fn load_more_forward(&mut self) -> usize {
        self.month_range.expand_forward(self.expansion);
        let months = self.month_range.last_added_months_forward();
        let new_items = build_schedule_items_in(&months, &self.events, &self.holidays, &self.tz);
        let added = new_items.len();
        self.items.extend(new_items);
        if added > 0 {
            log::debug!(
                "Schedule expanded forward to {} (+{} items)",
                self.month_range.last_month(),
                added
            );
        }
        added
    }

    pub fn should_load_backward(&self, first_visible_index: usize) -> bool {
        first_visible_index < self.threshold
    }

    pub fn should_load_forward(&self, last_visible_index: usize) -> bool {
        last_visible_index + self.threshold >= self.items.len()
    }

    /// Rebuild every item of the current window from a fresh data snapshot.
    pub fn replace_data(&mut self, events: Vec<Event>, holidays: Vec<Holiday>) {
        self.events = events;
        self.holidays = holidays;
        self.items = build_schedule_items_in(
            &self.month_range.months(),
            &self.events,
            &self.holidays,
            &self.tz,
        );
        let start = self.month_range.start();
        self.initial_scroll_index = self.index_of_month(start).unwrap_or(0);
    }

    pub fn index_of_month(&self, month: YearMonth) -> Option<usize> {
        self.items.iter().position(|item| item.is_month_header(month))
    }

    /// Index of the first item dated on or after `date`.
    pub fn index_of_date(&self, date: NaiveDate) -> Option<usize> {
        let index = self.items.partition_point(|item| item.date() < date);
        (index < self.items.len()).then_some(index)
    }
}
