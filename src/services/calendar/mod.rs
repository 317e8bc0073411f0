//! Calendar persistence, including the visibility toggle used as a view filter.

use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::models::calendar::Calendar;

const CALENDAR_COLUMNS: &str = "id, remote_id, user_id, name, color, is_visible, is_primary";

pub struct CalendarService<'a> {
    conn: &'a Connection,
}

impl<'a> CalendarService<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn create(&self, mut calendar: Calendar) -> Result<Calendar> {
        calendar.validate().map_err(|e| anyhow!(e))?;

        self.conn
            .execute(
                "INSERT INTO calendars (remote_id, user_id, name, color, is_visible, is_primary)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    calendar.remote_id,
                    calendar.user_id,
                    calendar.name,
                    calendar.color,
                    calendar.is_visible as i32,
                    calendar.is_primary as i32,
                ],
            )
            .context("Failed to insert calendar")?;

        calendar.id = Some(self.conn.last_insert_rowid());
        Ok(calendar)
    }

    /// Insert or refresh a synced calendar, matched on `(user_id, remote_id)`,
    /// and return its local id.
    ///
    /// Local visibility wins over the remote copy for calendars we already know.
    pub fn upsert(&self, calendar: &Calendar) -> Result<i64> {
        let remote_id = calendar
            .remote_id
            .as_deref()
            .ok_or_else(|| anyhow!("Remote ID is required for upsert"))?;
        calendar.validate().map_err(|e| anyhow!(e))?;

        self.conn
            .query_row(
                "INSERT INTO calendars (remote_id, user_id, name, color, is_visible, is_primary)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(user_id, remote_id) DO UPDATE SET
                    name = excluded.name,
                    color = excluded.color,
                    is_primary = excluded.is_primary
                 RETURNING id",
                params![
                    remote_id,
                    calendar.user_id,
                    calendar.name,
                    calendar.color,
                    calendar.is_visible as i32,
                    calendar.is_primary as i32,
                ],
                |row| row.get(0),
            )
            .context("Failed to upsert calendar")
    }

    pub fn get(&self, id: i64) -> Result<Option<Calendar>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM calendars WHERE id = ?1", CALENDAR_COLUMNS),
                [id],
                map_calendar_row,
            )
            .optional()
            .context("Failed to load calendar")
    }

    pub fn list_for_user(&self, user_id: i64) -> Result<Vec<Calendar>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM calendars WHERE user_id = ?1 ORDER BY is_primary DESC, name ASC",
            CALENDAR_COLUMNS
        ))?;
        let calendars = stmt
            .query_map([user_id], map_calendar_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(calendars)
    }

    pub fn list_all(&self) -> Result<Vec<Calendar>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM calendars ORDER BY user_id ASC, is_primary DESC, name ASC",
            CALENDAR_COLUMNS
        ))?;
        let calendars = stmt
            .query_map([], map_calendar_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(calendars)
    }

    pub fn set_visibility(&self, id: i64, visible: bool) -> Result<()> {
        let rows_affected = self
            .conn
            .execute(
                "UPDATE calendars SET is_visible = ?1 WHERE id = ?2",
                params![visible as i32, id],
            )
            .context("Failed to update calendar visibility")?;

        if rows_affected == 0 {
            return Err(anyhow!("Calendar with id {} not found", id));
        }
        Ok(())
    }

    /// Flip visibility and return the new value.
    pub fn toggle_visibility(&self, id: i64) -> Result<bool> {
        let calendar = self
            .get(id)?
            .ok_or_else(|| anyhow!("Calendar with id {} not found", id))?;
        let visible = !calendar.is_visible;
        self.set_visibility(id, visible)?;
        Ok(visible)
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM calendars WHERE id = ?1", [id])
            .context("Failed to delete calendar")?;

        if rows_affected == 0 {
            return Err(anyhow!("Calendar with id {} not found", id));
        }
        Ok(())
    }
}

fn map_calendar_row(row: &Row<'_>) -> Result<Calendar, rusqlite::Error> {
    Ok(Calendar {
        id: Some(row.get(0)?),
        remote_id: row.get(1)?,
        user_id: row.get(2)?,
        name: row.get(3)?,
        color: row.get(4)?,
        is_visible: row.get::<_, i32>(5)? != 0,
        is_primary: row.get::<_, i32>(6)? != 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::User;
    use crate::services::database::Database;
    use crate::services::user::UserService;

    fn setup() -> (Database, i64) {
        let db = Database::open_initialized(":memory:").unwrap();
        let user = UserService::new(db.connection())
            .create(User::new("Owner"))
            .unwrap();
        (db, user.id.unwrap())
    }

    #[test]
    fn test_create_and_list() {
        let (db, user_id) = setup();
        let service = CalendarService::new(db.connection());

        service.create(Calendar::new(user_id, "Work")).unwrap();
        service
            .create(Calendar {
                is_primary: true,
                ..Calendar::new(user_id, "Personal")
            })
            .unwrap();

        let names: Vec<String> = service
            .list_for_user(user_id)
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Personal", "Work"]);
    }

    #[test]
    fn test_toggle_visibility() {
        let (db, user_id) = setup();
        let service = CalendarService::new(db.connection());
        let calendar = service.create(Calendar::new(user_id, "Work")).unwrap();
        let id = calendar.id.unwrap();

        assert!(!service.toggle_visibility(id).unwrap());
        assert!(!service.get(id).unwrap().unwrap().is_visible);
        assert!(service.toggle_visibility(id).unwrap());
    }

    #[test]
    fn test_create_requires_existing_user() {
        let (db, _) = setup();
        let service = CalendarService::new(db.connection());
        assert!(service.create(Calendar::new(999, "Orphan")).is_err());
    }

    #[test]
    fn test_upsert_keeps_local_visibility() {
        let (db, user_id) = setup();
        let service = CalendarService::new(db.connection());
        let mut calendar = Calendar::new(user_id, "Remote");
        calendar.remote_id = Some("cal-1".to_string());
        let id = service.upsert(&calendar).unwrap();
        service.set_visibility(id, false).unwrap();

        calendar.name = "Remote (renamed)".to_string();
        calendar.is_visible = true;
        assert_eq!(service.upsert(&calendar).unwrap(), id);

        let stored = service.get(id).unwrap().unwrap();
        assert_eq!(stored.name, "Remote (renamed)");
        assert_eq!(stored.remote_id.as_deref(), Some("cal-1"));
        assert!(!stored.is_visible);
        assert_eq!(service.list_for_user(user_id).unwrap().len(), 1);
    }

    #[test]
    fn test_upsert_leaves_local_calendars_alone() {
        let (db, user_id) = setup();
        let service = CalendarService::new(db.connection());
        let local = service.create(Calendar::new(user_id, "Local")).unwrap();

        let mut remote = Calendar::new(user_id, "Remote");
        remote.id = local.id;
        remote.remote_id = Some("cal-1".to_string());
        let id = service.upsert(&remote).unwrap();

        assert_ne!(Some(id), local.id);
        assert_eq!(service.get(local.id.unwrap()).unwrap().unwrap().name, "Local");
        assert!(service.upsert(&Calendar::new(user_id, "No remote id")).is_err());
    }
}
