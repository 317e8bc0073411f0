//! Calendar event service entry point.
//! Provides database-backed CRUD and range queries organized across focused submodules.

use rusqlite::Connection;

pub mod crud;
pub mod queries;
mod shared;

/// Service for managing calendar events stored in SQLite.
pub struct EventService<'a> {
    pub(crate) conn: &'a Connection,
}

impl<'a> EventService<'a> {
    /// Create a new EventService with a database connection
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::calendar::Calendar;
    use crate::models::event::Event;
    use crate::models::user::User;
    use crate::services::calendar::CalendarService;
    use crate::services::database::Database;
    use crate::services::user::UserService;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn setup_test_db() -> (Database, i64) {
        let db = Database::open_initialized(":memory:").unwrap();
        let user = UserService::new(db.connection())
            .create(User::new("Tester"))
            .unwrap();
        let calendar = CalendarService::new(db.connection())
            .create(Calendar::new(user.id.unwrap(), "Personal"))
            .unwrap();
        (db, calendar.id.unwrap())
    }

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap()
    }

    fn sample_event(calendar_id: i64) -> Event {
        Event::new(calendar_id, "Test Event", base_time(), base_time() + Duration::hours(1)).unwrap()
    }

    #[test]
    fn test_create_event() {
        let (db, calendar_id) = setup_test_db();
        let service = EventService::new(db.connection());

        let created = service.create(sample_event(calendar_id)).unwrap();
        assert!(created.id.is_some());
        assert!(created.created_at.is_some());
        assert!(created.updated_at.is_some());
    }

    #[test]
    fn test_create_event_unknown_calendar_fails() {
        let (db, _) = setup_test_db();
        let service = EventService::new(db.connection());
        assert!(service.create(sample_event(999)).is_err());
    }

    #[test]
    fn test_get_event_round_trips_fields() {
        let (db, calendar_id) = setup_test_db();
        let service = EventService::new(db.connection());

        let event = Event::builder()
            .calendar_id(calendar_id)
            .title("Weekly Meeting")
            .start(base_time())
            .end(base_time() + Duration::hours(1))
            .recurrence_rule("FREQ=WEEKLY;BYDAY=MO")
            .reminder(15)
            .reminder(60)
            .color("#FF5733")
            .build()
            .unwrap();
        let created = service.create(event).unwrap();

        let found = service.get(created.id.unwrap()).unwrap().unwrap();
        assert_eq!(found.title, "Weekly Meeting");
        assert_eq!(found.start, base_time());
        assert_eq!(found.recurrence_rule.as_deref(), Some("FREQ=WEEKLY;BYDAY=MO"));
        assert_eq!(found.reminders, vec![15, 60]);
        assert_eq!(found.color.as_deref(), Some("#FF5733"));
    }

    #[test]
    fn test_get_nonexistent_event() {
        let (db, _) = setup_test_db();
        let service = EventService::new(db.connection());
        assert!(service.get(999).unwrap().is_none());
    }

    #[test]
    fn test_update_event_replaces_reminders() {
        let (db, calendar_id) = setup_test_db();
        let service = EventService::new(db.connection());

        let mut event = sample_event(calendar_id);
        event.reminders = vec![5];
        let mut event = service.create(event).unwrap();
        event.title = "Updated Title".to_string();
        event.reminders = vec![10, 30];

        service.update(&event).unwrap();

        let updated = service.get(event.id.unwrap()).unwrap().unwrap();
        assert_eq!(updated.title, "Updated Title");
        assert_eq!(updated.reminders, vec![10, 30]);
    }

    #[test]
    fn test_update_nonexistent_event() {
        let (db, calendar_id) = setup_test_db();
        let service = EventService::new(db.connection());

        let mut event = sample_event(calendar_id);
        event.id = Some(999);
        assert!(service.update(&event).is_err());
    }

    #[test]
    fn test_delete_event_removes_reminders() {
        let (db, calendar_id) = setup_test_db();
        let service = EventService::new(db.connection());

        let mut event = sample_event(calendar_id);
        event.reminders = vec![10];
        let id = service.create(event).unwrap().id.unwrap();

        service.delete(id).unwrap();

        assert!(service.get(id).unwrap().is_none());
        let remaining: i64 = db
            .connection()
            .query_row("SELECT COUNT(*) FROM event_reminders", [], |row| row.get(0))
            .unwrap();
        assert_eq!(remaining, 0);
    }

    #[test]
    fn test_delete_nonexistent_event() {
        let (db, _) = setup_test_db();
        let service = EventService::new(db.connection());
        assert!(service.delete(999).is_err());
    }

    #[test]
    fn test_find_by_date_range() {
        let (db, calendar_id) = setup_test_db();
        let service = EventService::new(db.connection());
        let now = base_time();

        for (title, offset) in [("Past", -2), ("Current", 0), ("Future", 2)] {
            let start = now + Duration::days(offset);
            service
                .create(Event::new(calendar_id, title, start, start + Duration::hours(1)).unwrap())
                .unwrap();
        }

        let events = service
            .find_by_date_range(now - Duration::hours(1), now + Duration::hours(2))
            .unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Current");
    }

    #[test]
    fn test_upsert_inserts_then_updates() {
        let (db, calendar_id) = setup_test_db();
        let service = EventService::new(db.connection());

        let mut event = sample_event(calendar_id);
        event.remote_id = Some("remote-1".to_string());
        let id = service.upsert(&event).unwrap();

        event.title = "Renamed".to_string();
        event.reminders = vec![5];
        assert_eq!(service.upsert(&event).unwrap(), id);

        let all = service.list_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "Renamed");
        assert_eq!(all[0].remote_id.as_deref(), Some("remote-1"));
        assert_eq!(all[0].reminders, vec![5]);
    }

    #[test]
    fn test_upsert_never_touches_local_events() {
        let (db, calendar_id) = setup_test_db();
        let service = EventService::new(db.connection());
        let local = service.create(sample_event(calendar_id)).unwrap();

        let mut synced = sample_event(calendar_id);
        synced.id = local.id;
        synced.remote_id = Some("remote-1".to_string());
        synced.title = "From server".to_string();
        let id = service.upsert(&synced).unwrap();

        assert_ne!(Some(id), local.id);
        let kept = service.get(local.id.unwrap()).unwrap().unwrap();
        assert_eq!(kept.title, local.title);
        assert_eq!(kept.remote_id, None);
        assert_eq!(service.list_all().unwrap().len(), 2);
    }

    #[test]
    fn test_upsert_requires_remote_id() {
        let (db, calendar_id) = setup_test_db();
        let service = EventService::new(db.connection());
        assert!(service.upsert(&sample_event(calendar_id)).is_err());
    }

    #[test]
    fn test_list_for_calendars() {
        let (db, calendar_id) = setup_test_db();
        let service = EventService::new(db.connection());
        service.create(sample_event(calendar_id)).unwrap();

        assert_eq!(service.list_for_calendars(&[calendar_id]).unwrap().len(), 1);
        assert!(service.list_for_calendars(&[]).unwrap().is_empty());
        assert!(service.list_for_calendars(&[calendar_id + 1]).unwrap().is_empty());
    }
}
