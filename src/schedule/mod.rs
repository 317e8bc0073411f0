//! Schedule (agenda) engine: an infinite, lazily expanded list of month
//! headers, week headers and per-day event groups.

pub mod builder;
pub mod month_range;
pub mod state;

pub use builder::{build_schedule_items, build_schedule_items_in};
pub use month_range::MonthRange;
pub use state::{ScheduleState, LOAD_MORE_THRESHOLD};
