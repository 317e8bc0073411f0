// UI module exports
// Toolkit-independent view state: the app shell, the swipe pager and the month grid

pub mod app;
pub mod month_grid;
pub mod swipe;
pub mod view_type;

pub use app::CalendarApp;
pub use view_type::CalendarView;
