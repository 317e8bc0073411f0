use chrono::NaiveDate;

use crate::models::calendar::Calendar;
use crate::models::event::Event;
use crate::models::holiday::Holiday;
use crate::models::user::User;
use crate::ui::view_type::CalendarView;

/// Immutable snapshot handed to the views.
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    pub users: Vec<User>,
    pub selected_user_id: Option<i64>,
    pub calendars: Vec<Calendar>,
    /// Events of visible calendars only, ordered by start.
    pub events: Vec<Event>,
    pub holidays: Vec<Holiday>,
    pub selected_date: NaiveDate,
    pub current_view: CalendarView,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl UiState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            users: Vec::new(),
            selected_user_id: None,
            calendars: Vec::new(),
            events: Vec::new(),
            holidays: Vec::new(),
            selected_date: today,
            current_view: CalendarView::default(),
            is_loading: false,
            error_message: None,
        }
    }

    pub fn selected_user(&self) -> Option<&User> {
        let id = self.selected_user_id?;
        self.users.iter().find(|user| user.id == Some(id))
    }

    pub fn calendar(&self, id: i64) -> Option<&Calendar> {
        self.calendars.iter().find(|calendar| calendar.id == Some(id))
    }
}
