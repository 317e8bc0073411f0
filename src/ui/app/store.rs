//! Single owner of the UI state.
//!
//! Every mutation goes through [`CalendarStore::apply`]; views read debounced
//! snapshots from [`CalendarStore::poll`] or from a subscribed channel.

use chrono::NaiveDate;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use super::debounce::Debounced;
use super::state::UiState;
use crate::models::calendar::Calendar;
use crate::models::event::Event;
use crate::models::holiday::Holiday;
use crate::models::user::User;
use crate::services::repository::RepositoryError;
use crate::ui::view_type::CalendarView;

#[derive(Debug, Clone, PartialEq)]
pub enum StoreUpdate {
    UsersLoaded(Vec<User>),
    UserSelected(Option<i64>),
    /// Calendars of `user_id`; ignored unless that user is still selected.
    CalendarsLoaded { user_id: i64, calendars: Vec<Calendar> },
    /// All events of `user_id`'s calendars, visible or not. Ignored unless
    /// that user is still selected.
    EventsLoaded { user_id: i64, events: Vec<Event> },
    HolidaysLoaded(Vec<Holiday>),
    CalendarVisibilityChanged { calendar_id: i64, visible: bool },
    EventSaved(Event),
    EventDeleted(i64),
    DateSelected(NaiveDate),
    ViewChanged(CalendarView),
    Loading(bool),
    Failed(RepositoryError),
    ErrorDismissed,
}

pub struct CalendarStore {
    state: UiState,
    all_events: Vec<Event>,
    snapshots: Debounced<UiState>,
    subscribers: Vec<Sender<UiState>>,
}

impl CalendarStore {
    pub fn new(today: NaiveDate, debounce: Duration) -> Self {
        Self {
            state: UiState::new(today),
            all_events: Vec::new(),
            snapshots: Debounced::new(debounce),
            subscribers: Vec::new(),
        }
    }

    /// Latest state, ahead of the debounced snapshots.
    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn apply(&mut self, update: StoreUpdate, now: Instant) {
        match update {
            StoreUpdate::UsersLoaded(users) => {
                let selected_still_exists = self
                    .state
                    .selected_user_id
                    .map(|id| users.iter().any(|u| u.id == Some(id)))
                    .unwrap_or(false);
                if !selected_still_exists {
                    self.state.selected_user_id = users.first().and_then(|u| u.id);
                }
                self.state.users = users;
            }
            StoreUpdate::UserSelected(user_id) => {
                if self.state.selected_user_id != user_id {
                    self.state.selected_user_id = user_id;
                    self.state.calendars.clear();
                    self.all_events.clear();
                }
            }
            StoreUpdate::CalendarsLoaded { user_id, calendars } => {
                if !self.is_selected(user_id) {
                    log::debug!("Dropping calendars of unselected user {}", user_id);
                    return;
                }
                self.state.calendars = calendars;
            }
            StoreUpdate::EventsLoaded { user_id, mut events } => {
                if !self.is_selected(user_id) {
                    log::debug!("Dropping events of unselected user {}", user_id);
                    return;
                }
                events.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.title.cmp(&b.title)));
                self.all_events = events;
            }
            StoreUpdate::HolidaysLoaded(holidays) => {
                self.state.holidays = holidays;
            }
            StoreUpdate::CalendarVisibilityChanged {
                calendar_id,
                visible,
            } => {
                if let Some(calendar) = self
                    .state
                    .calendars
                    .iter_mut()
                    .find(|c| c.id == Some(calendar_id))
                {
                    calendar.is_visible = visible;
                }
            }
            StoreUpdate::EventSaved(event) => {
                match self
                    .all_events
                    .iter_mut()
                    .find(|e| e.id.is_some() && e.id == event.id)
                {
                    Some(existing) => *existing = event,
                    None => self.all_events.push(event),
                }
                self.all_events
                    .sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.title.cmp(&b.title)));
            }
            StoreUpdate::EventDeleted(event_id) => {
                self.all_events.retain(|e| e.id != Some(event_id));
            }
            StoreUpdate::DateSelected(date) => {
                self.state.selected_date = date;
            }
            StoreUpdate::ViewChanged(view) => {
                self.state.current_view = view;
            }
            StoreUpdate::Loading(loading) => {
                self.state.is_loading = loading;
            }
            StoreUpdate::Failed(err) => {
                log::warn!("Store received failure: {}", err);
                self.state.error_message = Some(err.user_message());
                self.state.is_loading = false;
            }
            StoreUpdate::ErrorDismissed => {
                self.state.error_message = None;
            }
        }

        self.refresh_visible_events();
        self.snapshots.push(self.state.clone(), now);
    }

    /// Debounced snapshot, also forwarded to every live subscriber.
    pub fn poll(&mut self, now: Instant) -> Option<UiState> {
        let snapshot = self.snapshots.poll(now)?;
        self.publish(&snapshot);
        Some(snapshot)
    }

    /// Publish any pending snapshot now.
    pub fn flush(&mut self) -> Option<UiState> {
        let snapshot = self.snapshots.flush()?;
        self.publish(&snapshot);
        Some(snapshot)
    }

    /// Receiver of every snapshot emitted from now on.
    pub fn subscribe(&mut self) -> Receiver<UiState> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    fn publish(&mut self, snapshot: &UiState) {
        self.subscribers
            .retain(|subscriber| subscriber.send(snapshot.clone()).is_ok());
    }

    fn is_selected(&self, user_id: i64) -> bool {
        self.state.selected_user_id == Some(user_id)
    }

    fn refresh_visible_events(&mut self) {
        let calendars = &self.state.calendars;
        self.state.events = self
            .all_events
            .iter()
            .filter(|event| {
                calendars
                    .iter()
                    .find(|c| c.id == Some(event.calendar_id))
                    .map(|c| c.is_visible)
                    .unwrap_or(false)
            })
            .cloned()
            .collect();
    }
}
