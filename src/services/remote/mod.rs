//! Remote data sources behind trait seams so repositories can be exercised
//! against mocks or the bundled dummy backend.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::models::calendar::Calendar;
use crate::models::event::Event;
use crate::models::holiday::Holiday;
use crate::services::repository::error::RepositoryResult;

pub mod dummy;
pub mod holiday_api;
mod wire;

pub use dummy::DummyCalendarApi;
pub use holiday_api::HttpHolidayApi;

/// Calendar source shareable with worker threads.
pub type SharedCalendarApi = Arc<dyn RemoteCalendarApi + Send + Sync>;
/// Holiday provider shareable with worker threads.
pub type SharedHolidayApi = Arc<dyn HolidayApi + Send + Sync>;

/// Public holiday provider.
#[cfg_attr(test, mockall::automock)]
pub trait HolidayApi {
    fn fetch_holidays(&self, country_code: &str, year: i32) -> RepositoryResult<Vec<Holiday>>;
}

/// Source of a user's calendars and their events.
///
/// Returned records are identified by `remote_id` only. Local ids, including
/// an event's `calendar_id`, are assigned when they are stored.
#[cfg_attr(test, mockall::automock)]
pub trait RemoteCalendarApi {
    fn list_calendars(&self, user_id: i64) -> RepositoryResult<Vec<Calendar>>;

    /// Events of one remote calendar overlapping `[start, end]`.
    fn list_events(
        &self,
        calendar_remote_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepositoryResult<Vec<Event>>;
}
