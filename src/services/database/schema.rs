use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn initialize_schema(conn: &Connection) -> Result<()> {
    create_users_table(conn)?;
    create_calendars_table(conn)?;
    create_events_table(conn)?;
    create_event_reminders_table(conn)?;
    create_holidays_table(conn)?;
    Ok(())
}

fn create_users_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create users table")?;

    Ok(())
}

fn create_calendars_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS calendars (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            remote_id TEXT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            color TEXT NOT NULL,
            is_visible INTEGER NOT NULL DEFAULT 1,
            is_primary INTEGER NOT NULL DEFAULT 0
        )",
        [],
    )
    .context("Failed to create calendars table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_calendars_user ON calendars(user_id)",
        [],
    )
    .context("Failed to create calendars index")?;

    // NULL remote ids (local calendars) never collide.
    conn.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_calendars_remote ON calendars(user_id, remote_id)",
        [],
    )
    .context("Failed to create calendars remote index")?;

    Ok(())
}

fn create_events_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            remote_id TEXT,
            calendar_id INTEGER NOT NULL REFERENCES calendars(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            start_datetime TEXT NOT NULL,
            end_datetime TEXT NOT NULL,
            is_all_day INTEGER NOT NULL DEFAULT 0,
            recurrence_rule TEXT,
            color TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )
    .context("Failed to create events table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_events_start ON events(start_datetime)",
        [],
    )
    .context("Failed to create events index")?;

    conn.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_events_remote ON events(calendar_id, remote_id)",
        [],
    )
    .context("Failed to create events remote index")?;

    Ok(())
}

fn create_event_reminders_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS event_reminders (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            event_id INTEGER NOT NULL REFERENCES events(id) ON DELETE CASCADE,
            minutes_before INTEGER NOT NULL,
            UNIQUE(event_id, minutes_before)
        )",
        [],
    )
    .context("Failed to create event_reminders table")?;

    Ok(())
}

fn create_holidays_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS holidays (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            date TEXT NOT NULL,
            country_code TEXT NOT NULL,
            fetched_at TEXT
        )",
        [],
    )
    .context("Failed to create holidays table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_holidays_country_date ON holidays(country_code, date)",
        [],
    )
    .context("Failed to create holidays index")?;

    Ok(())
}
