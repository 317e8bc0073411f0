// Test fixtures - reusable test data
// Provides consistent test data across all test files

#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Sample dates for testing
pub mod dates {
    use super::*;

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn at(y: i32, m: u32, d: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, hour, minute, 0).unwrap()
    }

    /// Returns Monday, June 3, 2024 at 09:00 UTC
    pub fn monday_morning() -> DateTime<Utc> {
        at(2024, 6, 3, 9, 0)
    }

    /// Returns Feb 29, 2024 (leap year)
    pub fn leap_day_2024() -> NaiveDate {
        date(2024, 2, 29)
    }
}

/// Sample events for testing
pub mod events {
    use super::*;
    use agenda_calendar::models::event::Event;
    use chrono::Duration;

    /// A one-hour event in `calendar_id`.
    pub fn hour_long(calendar_id: i64, title: &str, start: DateTime<Utc>) -> Event {
        Event::new(calendar_id, title, start, start + Duration::hours(1)).unwrap()
    }

    /// The same event with an id, as if it came back from the store.
    pub fn stored(id: i64, calendar_id: i64, title: &str, start: DateTime<Utc>) -> Event {
        let mut event = hour_long(calendar_id, title, start);
        event.id = Some(id);
        event
    }
}

/// Sample holidays for testing
pub mod holidays {
    use super::dates::date;
    use agenda_calendar::models::holiday::Holiday;

    pub fn us_2024() -> Vec<Holiday> {
        vec![
            Holiday::new("New Year's Day", date(2024, 1, 1), "US"),
            Holiday::new("Juneteenth", date(2024, 6, 19), "US"),
            Holiday::new("Independence Day", date(2024, 7, 4), "US"),
            Holiday::new("Christmas Day", date(2024, 12, 25), "US"),
        ]
    }
}

/// File-backed databases in a temporary directory
pub mod db {
    use agenda_calendar::models::calendar::Calendar;
    use agenda_calendar::models::user::User;
    use agenda_calendar::services::calendar::CalendarService;
    use agenda_calendar::services::database::Database;
    use agenda_calendar::services::user::UserService;
    use tempfile::TempDir;

    pub struct TestDb {
        // Keeps the directory alive for the test's duration.
        pub dir: TempDir,
        pub path: String,
        pub db: Database,
    }

    pub fn temp_db() -> TestDb {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("agenda.db").to_string_lossy().to_string();
        let db = Database::open_initialized(&path).unwrap();
        TestDb { dir, path, db }
    }

    /// Creates a user with one visible calendar; returns (user_id, calendar_id).
    pub fn seed_user(db: &Database, name: &str) -> (i64, i64) {
        let user = UserService::new(db.connection())
            .create(User::new(name))
            .unwrap();
        let user_id = user.id.unwrap();
        let calendar = CalendarService::new(db.connection())
            .create(Calendar::new(user_id, "Personal"))
            .unwrap();
        (user_id, calendar.id.unwrap())
    }
}
