use super::shared::{load_reminders, map_event_row, replace_reminders, EVENT_COLUMNS};
use super::EventService;
use crate::models::event::Event;
use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use rusqlite::{self, params};

impl<'a> EventService<'a> {
    /// Create a new event in the database.
    pub fn create(&self, mut event: Event) -> Result<Event> {
        event.validate().map_err(|e| anyhow!(e))?;

        let now = Utc::now();
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO events (
                calendar_id, title, start_datetime, end_datetime, is_all_day,
                recurrence_rule, color, created_at, updated_at, remote_id
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                event.calendar_id,
                event.title,
                event.start.to_rfc3339(),
                event.end.to_rfc3339(),
                event.all_day as i32,
                event.recurrence_rule,
                event.color,
                now.to_rfc3339(),
                now.to_rfc3339(),
                event.remote_id,
            ],
        )
        .context("Failed to insert event")?;

        let id = tx.last_insert_rowid();
        replace_reminders(&tx, id, &event.reminders).context("Failed to store reminders")?;
        tx.commit().context("Failed to commit event")?;

        event.id = Some(id);
        event.created_at = Some(now);
        event.updated_at = Some(now);

        Ok(event)
    }

    /// Insert or refresh a synced event, matched on `(calendar_id, remote_id)`.
    /// Returns the local id. Events without a remote id are rejected.
    pub fn upsert(&self, event: &Event) -> Result<i64> {
        let remote_id = event
            .remote_id
            .as_deref()
            .ok_or_else(|| anyhow!("Remote ID is required for upsert"))?;
        event.validate().map_err(|e| anyhow!(e))?;

        let now = Utc::now().to_rfc3339();
        let tx = self.conn.unchecked_transaction()?;
        let id: i64 = tx
            .query_row(
                "INSERT INTO events (
                    remote_id, calendar_id, title, start_datetime, end_datetime, is_all_day,
                    recurrence_rule, color, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
                ON CONFLICT(calendar_id, remote_id) DO UPDATE SET
                    title = excluded.title,
                    start_datetime = excluded.start_datetime,
                    end_datetime = excluded.end_datetime,
                    is_all_day = excluded.is_all_day,
                    recurrence_rule = excluded.recurrence_rule,
                    color = excluded.color,
                    updated_at = excluded.updated_at
                RETURNING id",
                params![
                    remote_id,
                    event.calendar_id,
                    event.title,
                    event.start.to_rfc3339(),
                    event.end.to_rfc3339(),
                    event.all_day as i32,
                    event.recurrence_rule,
                    event.color,
                    now,
                ],
                |row| row.get(0),
            )
            .context("Failed to upsert event")?;
        replace_reminders(&tx, id, &event.reminders).context("Failed to store reminders")?;
        tx.commit().context("Failed to commit event")?;

        Ok(id)
    }

    /// Retrieve an event by ID.
    pub fn get(&self, id: i64) -> Result<Option<Event>> {
        let result = self.conn.query_row(
            &format!("SELECT {} FROM events WHERE id = ?", EVENT_COLUMNS),
            [id],
            map_event_row,
        );

        match result {
            Ok(mut event) => {
                event.reminders = load_reminders(self.conn, id)?;
                Ok(Some(event))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Update an existing event.
    pub fn update(&self, event: &Event) -> Result<()> {
        let id = event
            .id
            .ok_or_else(|| anyhow!("Event ID is required for update"))?;
        event.validate().map_err(|e| anyhow!(e))?;

        let tx = self.conn.unchecked_transaction()?;
        let rows_affected = tx
            .execute(
                "UPDATE events SET
                    calendar_id = ?, title = ?, start_datetime = ?, end_datetime = ?,
                    is_all_day = ?, recurrence_rule = ?, color = ?, updated_at = ?,
                    remote_id = ?
                 WHERE id = ?",
                params![
                    event.calendar_id,
                    event.title,
                    event.start.to_rfc3339(),
                    event.end.to_rfc3339(),
                    event.all_day as i32,
                    event.recurrence_rule,
                    event.color,
                    Utc::now().to_rfc3339(),
                    event.remote_id,
                    id,
                ],
            )
            .context("Failed to update event")?;

        if rows_affected == 0 {
            return Err(anyhow!("Event with id {} not found", id));
        }

        replace_reminders(&tx, id, &event.reminders).context("Failed to store reminders")?;
        tx.commit().context("Failed to commit event")?;
        Ok(())
    }

    /// Delete an event by ID. Reminders go with it.
    pub fn delete(&self, id: i64) -> Result<()> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM events WHERE id = ?", [id])
            .context("Failed to delete event")?;

        if rows_affected == 0 {
            return Err(anyhow!("Event with id {} not found", id));
        }

        Ok(())
    }
}
