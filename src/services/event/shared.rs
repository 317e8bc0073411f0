use chrono::{DateTime, Utc};
use rusqlite::{self, params, Connection, Result, Row};

use crate::models::event::Event;

pub(crate) const EVENT_COLUMNS: &str = "id, calendar_id, title, start_datetime, end_datetime,
                    is_all_day, recurrence_rule, color, created_at, updated_at, remote_id";

pub(crate) fn to_utc_datetime(value: String) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

/// Maps an `EVENT_COLUMNS` row; reminders are filled in separately.
pub(crate) fn map_event_row(row: &Row<'_>) -> Result<Event> {
    Ok(Event {
        id: Some(row.get(0)?),
        remote_id: row.get(10)?,
        calendar_id: row.get(1)?,
        title: row.get(2)?,
        start: to_utc_datetime(row.get::<_, String>(3)?)?,
        end: to_utc_datetime(row.get::<_, String>(4)?)?,
        all_day: row.get::<_, i32>(5)? != 0,
        recurrence_rule: row.get(6)?,
        reminders: Vec::new(),
        color: row.get(7)?,
        created_at: Some(to_utc_datetime(row.get::<_, String>(8)?)?),
        updated_at: Some(to_utc_datetime(row.get::<_, String>(9)?)?),
    })
}

pub(crate) fn load_reminders(conn: &Connection, event_id: i64) -> Result<Vec<u32>> {
    let mut stmt = conn.prepare_cached(
        "SELECT minutes_before FROM event_reminders WHERE event_id = ?1 ORDER BY minutes_before ASC",
    )?;
    let reminders = stmt
        .query_map([event_id], |row| row.get::<_, u32>(0))?
        .collect::<Result<Vec<_>>>()?;
    Ok(reminders)
}

pub(crate) fn replace_reminders(conn: &Connection, event_id: i64, reminders: &[u32]) -> Result<()> {
    conn.execute("DELETE FROM event_reminders WHERE event_id = ?1", [event_id])?;
    let mut stmt = conn.prepare_cached(
        "INSERT OR IGNORE INTO event_reminders (event_id, minutes_before) VALUES (?1, ?2)",
    )?;
    for minutes in reminders {
        stmt.execute(params![event_id, minutes])?;
    }
    Ok(())
}

/// Attach stored reminders to freshly mapped events.
pub(crate) fn with_reminders(conn: &Connection, mut events: Vec<Event>) -> Result<Vec<Event>> {
    for event in events.iter_mut() {
        if let Some(id) = event.id {
            event.reminders = load_reminders(conn, id)?;
        }
    }
    Ok(events)
}
