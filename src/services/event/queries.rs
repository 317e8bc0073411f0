use super::shared::{map_event_row, with_reminders, EVENT_COLUMNS};
use super::EventService;
use crate::models::event::Event;
use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{self, params_from_iter};

impl<'a> EventService<'a> {
    /// List every event ordered by start date.
    pub fn list_all(&self) -> Result<Vec<Event>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM events ORDER BY start_datetime ASC",
            EVENT_COLUMNS
        ))?;

        let events = stmt
            .query_map([], map_event_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(with_reminders(self.conn, events)?)
    }

    /// Events overlapping `[start, end]`.
    pub fn find_by_date_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Event>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM events
             WHERE start_datetime <= ? AND end_datetime >= ?
             ORDER BY start_datetime ASC",
            EVENT_COLUMNS
        ))?;

        let events = stmt
            .query_map([end.to_rfc3339(), start.to_rfc3339()], map_event_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(with_reminders(self.conn, events)?)
    }

    /// Events in any of the given calendars.
    pub fn list_for_calendars(&self, calendar_ids: &[i64]) -> Result<Vec<Event>> {
        if calendar_ids.is_empty() {
            return Ok(vec![]);
        }

        let placeholders = vec!["?"; calendar_ids.len()].join(", ");
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM events WHERE calendar_id IN ({}) ORDER BY start_datetime ASC",
            EVENT_COLUMNS, placeholders
        ))?;

        let events = stmt
            .query_map(params_from_iter(calendar_ids.iter()), map_event_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(with_reminders(self.conn, events)?)
    }
}
