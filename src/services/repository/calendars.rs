use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::models::calendar::Calendar;
use crate::models::event::Event;
use crate::models::user::User;
use crate::services::calendar::CalendarService;
use crate::services::event::EventService;
use crate::services::remote::RemoteCalendarApi;
use crate::services::user::UserService;

use super::error::RepositoryResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub calendars: usize,
    pub events: usize,
}

/// Users, calendars and events: remote sync plus local CRUD, with every
/// failure mapped onto [`RepositoryError`](super::error::RepositoryError).
pub struct CalendarRepository<'a> {
    conn: &'a Connection,
    remote: &'a dyn RemoteCalendarApi,
}

impl<'a> CalendarRepository<'a> {
    pub fn new(conn: &'a Connection, remote: &'a dyn RemoteCalendarApi) -> Self {
        Self { conn, remote }
    }

    pub fn users(&self) -> RepositoryResult<Vec<User>> {
        Ok(UserService::new(self.conn).list_all()?)
    }

    pub fn create_user(&self, user: User) -> RepositoryResult<User> {
        Ok(UserService::new(self.conn).create(user)?)
    }

    /// Removes the user with all of their calendars, events and reminders.
    pub fn delete_user(&self, user_id: i64) -> RepositoryResult<()> {
        Ok(UserService::new(self.conn).delete(user_id)?)
    }

    /// Pull the user's calendars and their events in `[start, end]` from the
    /// remote source into the local store.
    ///
    /// Remote records are matched on their remote ids, so events created
    /// locally are never overwritten by a sync.
    pub fn sync_user(
        &self,
        user_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepositoryResult<SyncSummary> {
        let calendars = self.remote.list_calendars(user_id)?;
        let calendar_service = CalendarService::new(self.conn);
        let event_service = EventService::new(self.conn);

        let mut summary = SyncSummary::default();
        for calendar in &calendars {
            let Some(remote_id) = calendar.remote_id.as_deref() else {
                log::warn!("Skipping remote calendar '{}' without a remote id", calendar.name);
                continue;
            };
            let local_id = calendar_service.upsert(&Calendar {
                user_id,
                ..calendar.clone()
            })?;
            summary.calendars += 1;

            for mut event in self.remote.list_events(remote_id, start, end)? {
                event.calendar_id = local_id;
                event_service.upsert(&event)?;
                summary.events += 1;
            }
        }

        log::info!(
            "Synced user {}: {} calendars, {} events",
            user_id,
            summary.calendars,
            summary.events
        );
        Ok(summary)
    }

    pub fn calendars_for(&self, user_id: i64) -> RepositoryResult<Vec<Calendar>> {
        Ok(CalendarService::new(self.conn).list_for_user(user_id)?)
    }

    /// Events of all the user's calendars, hidden ones included.
    pub fn events_for(&self, user_id: i64) -> RepositoryResult<Vec<Event>> {
        let ids: Vec<i64> = self
            .calendars_for(user_id)?
            .into_iter()
            .filter_map(|c| c.id)
            .collect();
        Ok(EventService::new(self.conn).list_for_calendars(&ids)?)
    }

    /// Events of the user's visible calendars.
    pub fn visible_events_for(&self, user_id: i64) -> RepositoryResult<Vec<Event>> {
        let ids: Vec<i64> = self
            .calendars_for(user_id)?
            .into_iter()
            .filter(|c| c.is_visible)
            .filter_map(|c| c.id)
            .collect();
        Ok(EventService::new(self.conn).list_for_calendars(&ids)?)
    }

    /// Flip a calendar's visibility and return the new value.
    pub fn toggle_calendar_visibility(&self, calendar_id: i64) -> RepositoryResult<bool> {
        Ok(CalendarService::new(self.conn).toggle_visibility(calendar_id)?)
    }

    pub fn create_event(&self, event: Event) -> RepositoryResult<Event> {
        Ok(EventService::new(self.conn).create(event)?)
    }

    pub fn update_event(&self, event: &Event) -> RepositoryResult<()> {
        Ok(EventService::new(self.conn).update(event)?)
    }

    pub fn delete_event(&self, event_id: i64) -> RepositoryResult<()> {
        Ok(EventService::new(self.conn).delete(event_id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::database::Database;
    use crate::services::remote::{DummyCalendarApi, MockRemoteCalendarApi};
    use crate::services::repository::error::RepositoryError;
    use chrono::TimeZone;

    fn june() -> (DateTime<Utc>, DateTime<Utc>) {
        (
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 30, 23, 59, 59).unwrap(),
        )
    }

    #[test]
    fn test_sync_user_from_dummy_backend() {
        let db = Database::open_initialized(":memory:").unwrap();
        let remote = DummyCalendarApi::new();
        let repo = CalendarRepository::new(db.connection(), &remote);
        let user = repo.create_user(User::new("Ada")).unwrap();
        let user_id = user.id.unwrap();
        let (start, end) = june();

        let summary = repo.sync_user(user_id, start, end).unwrap();
        assert_eq!(summary.calendars, 2);
        assert!(summary.events > 0);

        // Re-syncing is idempotent.
        repo.sync_user(user_id, start, end).unwrap();
        assert_eq!(repo.visible_events_for(user_id).unwrap().len(), summary.events);
    }

    #[test]
    fn test_hidden_calendars_are_filtered() {
        let db = Database::open_initialized(":memory:").unwrap();
        let remote = DummyCalendarApi::new();
        let repo = CalendarRepository::new(db.connection(), &remote);
        let user_id = repo.create_user(User::new("Ada")).unwrap().id.unwrap();
        let (start, end) = june();
        repo.sync_user(user_id, start, end).unwrap();

        let work = repo
            .calendars_for(user_id)
            .unwrap()
            .into_iter()
            .find(|c| c.name == "Work")
            .unwrap();
        assert!(!repo.toggle_calendar_visibility(work.id.unwrap()).unwrap());

        let visible = repo.visible_events_for(user_id).unwrap();
        assert!(!visible.is_empty());
        assert!(visible.iter().all(|e| e.calendar_id != work.id.unwrap()));
    }

    #[test]
    fn test_sync_preserves_local_visibility() {
        let db = Database::open_initialized(":memory:").unwrap();
        let remote = DummyCalendarApi::new();
        let repo = CalendarRepository::new(db.connection(), &remote);
        let user_id = repo.create_user(User::new("Ada")).unwrap().id.unwrap();
        let (start, end) = june();
        repo.sync_user(user_id, start, end).unwrap();

        let personal_id = repo
            .calendars_for(user_id)
            .unwrap()
            .into_iter()
            .find(|c| c.name == "Personal")
            .and_then(|c| c.id)
            .unwrap();
        repo.toggle_calendar_visibility(personal_id).unwrap();
        repo.sync_user(user_id, start, end).unwrap();

        let personal = repo
            .calendars_for(user_id)
            .unwrap()
            .into_iter()
            .find(|c| c.id == Some(personal_id))
            .unwrap();
        assert!(!personal.is_visible);
    }

    #[test]
    fn test_local_events_survive_later_syncs() {
        let db = Database::open_initialized(":memory:").unwrap();
        let remote = DummyCalendarApi::new();
        let repo = CalendarRepository::new(db.connection(), &remote);
        let user_id = repo.create_user(User::new("Ada")).unwrap().id.unwrap();
        let (start, end) = june();
        repo.sync_user(user_id, start, end).unwrap();

        let work_id = repo
            .calendars_for(user_id)
            .unwrap()
            .into_iter()
            .find(|c| c.name == "Work")
            .and_then(|c| c.id)
            .unwrap();
        let mut local_ids = Vec::new();
        for i in 0..40 {
            let begin = start + chrono::Duration::hours(i);
            let finish = begin + chrono::Duration::minutes(30);
            let event = Event::new(work_id, format!("Local {}", i), begin, finish).unwrap();
            local_ids.push(repo.create_event(event).unwrap().id.unwrap());
        }

        let july = (
            Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 7, 31, 23, 59, 59).unwrap(),
        );
        repo.sync_user(user_id, july.0, july.1).unwrap();
        repo.sync_user(user_id, start, end).unwrap();

        let events = repo.events_for(user_id).unwrap();
        for (i, id) in local_ids.iter().enumerate() {
            let event = events.iter().find(|e| e.id == Some(*id)).unwrap();
            assert_eq!(event.title, format!("Local {}", i));
            assert_eq!(event.remote_id, None);
        }
        let local_count = events.iter().filter(|e| e.remote_id.is_none()).count();
        assert_eq!(local_count, 40);
    }

    #[test]
    fn test_synced_events_point_at_local_calendars() {
        let db = Database::open_initialized(":memory:").unwrap();
        let remote = DummyCalendarApi::new();
        let repo = CalendarRepository::new(db.connection(), &remote);
        let user_id = repo.create_user(User::new("Ada")).unwrap().id.unwrap();
        let (start, end) = june();
        repo.sync_user(user_id, start, end).unwrap();

        let ids: Vec<i64> = repo
            .calendars_for(user_id)
            .unwrap()
            .into_iter()
            .filter_map(|c| c.id)
            .collect();
        let events = repo.events_for(user_id).unwrap();
        assert!(!events.is_empty());
        assert!(events.iter().all(|e| ids.contains(&e.calendar_id)));
    }

    #[test]
    fn test_remote_failure_is_passed_through() {
        let db = Database::open_initialized(":memory:").unwrap();
        let mut remote = MockRemoteCalendarApi::new();
        remote
            .expect_list_calendars()
            .returning(|_| Err(RepositoryError::Unauthorized));
        remote.expect_list_events().never();

        let repo = CalendarRepository::new(db.connection(), &remote);
        let (start, end) = june();
        assert_eq!(repo.sync_user(1, start, end), Err(RepositoryError::Unauthorized));
    }

    #[test]
    fn test_sync_for_unknown_user_is_conflict() {
        let db = Database::open_initialized(":memory:").unwrap();
        let remote = DummyCalendarApi::new();
        let repo = CalendarRepository::new(db.connection(), &remote);
        let (start, end) = june();

        // Calendars reference a user that does not exist locally.
        assert_eq!(repo.sync_user(42, start, end), Err(RepositoryError::Conflict));
    }

    #[test]
    fn test_event_crud_maps_errors() {
        let db = Database::open_initialized(":memory:").unwrap();
        let remote = DummyCalendarApi::new();
        let repo = CalendarRepository::new(db.connection(), &remote);

        assert!(matches!(repo.delete_event(999), Err(RepositoryError::Unknown(_))));
    }

    #[test]
    fn test_delete_user_removes_synced_data() {
        let db = Database::open_initialized(":memory:").unwrap();
        let remote = DummyCalendarApi::new();
        let repo = CalendarRepository::new(db.connection(), &remote);
        let user_id = repo.create_user(User::new("Ada")).unwrap().id.unwrap();
        let (start, end) = june();
        repo.sync_user(user_id, start, end).unwrap();

        repo.delete_user(user_id).unwrap();

        assert!(repo.users().unwrap().is_empty());
        assert!(repo.calendars_for(user_id).unwrap().is_empty());
        assert!(repo.events_for(user_id).unwrap().is_empty());
    }
}
