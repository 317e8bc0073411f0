// Event module
// Calendar event model

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::utils::date::local_date_in;
use serde::{Deserialize, Serialize};

/// Calendar event belonging to one calendar.
///
/// Timed events are absolute instants. All-day events are stored from UTC
/// midnight of their calendar date and keep that date in every zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Option<i64>,
    /// Identity at the remote source; `None` for events created locally.
    pub remote_id: Option<String>,
    pub calendar_id: i64,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub all_day: bool,
    pub recurrence_rule: Option<String>, // opaque RRULE string
    pub reminders: Vec<u32>,             // minutes before start
    pub color: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Event {
    /// Create a new event with required fields
    ///
    /// # Arguments
    /// * `calendar_id` - Owning calendar
    /// * `title` - Event title (required, non-empty)
    /// * `start` - Event start time
    /// * `end` - Event end time
    ///
    /// # Examples
    /// ```
    /// use agenda_calendar::models::event::Event;
    /// use chrono::Utc;
    ///
    /// let start = Utc::now();
    /// let end = start + chrono::Duration::hours(1);
    /// let event = Event::new(1, "Team Meeting", start, end).unwrap();
    /// ```
    pub fn new(
        calendar_id: i64,
        title: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Self, String> {
        let event = Self {
            id: None,
            remote_id: None,
            calendar_id,
            title: title.into(),
            start,
            end,
            all_day: false,
            recurrence_rule: None,
            reminders: Vec::new(),
            color: None,
            created_at: None,
            updated_at: None,
        };
        event.validate()?;
        Ok(event)
    }

    /// Create a builder for constructing events with optional fields
    pub fn builder() -> EventBuilder {
        EventBuilder::new()
    }

    /// Validate the event
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Event title cannot be empty".to_string());
        }

        let ordered = if self.all_day {
            self.end >= self.start
        } else {
            self.end > self.start
        };
        if !ordered {
            return Err("Event end time must be after start time".to_string());
        }

        if let Some(ref color) = self.color {
            if !is_hex_color(color) {
                return Err("Color must be in hex format (#RRGGBB or #RGB)".to_string());
            }
        }

        Ok(())
    }

    /// Check if this is a recurring event
    pub fn is_recurring(&self) -> bool {
        self.recurrence_rule
            .as_deref()
            .is_some_and(|rule| !rule.trim().is_empty())
    }

    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }

    /// Day this event is listed under when viewed from `tz`.
    pub fn day_in<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        if self.all_day {
            self.start.date_naive()
        } else {
            local_date_in(&self.start, tz)
        }
    }
}

pub(crate) fn is_hex_color(color: &str) -> bool {
    color.starts_with('#')
        && (color.len() == 7 || color.len() == 4)
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Builder for creating events with optional fields
#[derive(Default)]
pub struct EventBuilder {
    calendar_id: Option<i64>,
    title: Option<String>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    all_day: bool,
    recurrence_rule: Option<String>,
    reminders: Vec<u32>,
    color: Option<String>,
}

impl EventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calendar_id(mut self, calendar_id: i64) -> Self {
        self.calendar_id = Some(calendar_id);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn start(mut self, start: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self
    }

    pub fn end(mut self, end: DateTime<Utc>) -> Self {
        self.end = Some(end);
        self
    }

    pub fn all_day(mut self, all_day: bool) -> Self {
        self.all_day = all_day;
        self
    }

    /// Set the recurrence rule (RRULE format, stored verbatim)
    pub fn recurrence_rule(mut self, rule: impl Into<String>) -> Self {
        self.recurrence_rule = Some(rule.into());
        self
    }

    /// Add a reminder `minutes` before the start
    pub fn reminder(mut self, minutes: u32) -> Self {
        self.reminders.push(minutes);
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Build the event
    pub fn build(self) -> Result<Event, String> {
        let calendar_id = self.calendar_id.ok_or("Event calendar is required")?;
        let title = self.title.ok_or("Event title is required")?;
        let start = self.start.ok_or("Event start time is required")?;
        let end = self.end.ok_or("Event end time is required")?;

        let mut reminders = self.reminders;
        reminders.sort_unstable();
        reminders.dedup();

        let event = Event {
            id: None,
            remote_id: None,
            calendar_id,
            title,
            start,
            end,
            all_day: self.all_day,
            recurrence_rule: self.recurrence_rule,
            reminders,
            color: self.color,
            created_at: None,
            updated_at: None,
        };

        event.validate()?;
        Ok(event)
    }
}
