//! Repository boundary between the UI and the services/remote sources.
//! Everything crossing it is a [`RepositoryError`].

pub mod calendars;
pub mod error;
pub mod holidays;

pub use calendars::{CalendarRepository, SyncSummary};
pub use error::{RepositoryError, RepositoryResult};
pub use holidays::{HolidayLoad, HolidayRepository};
