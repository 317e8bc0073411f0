//! Headless application shell: owns the store, the background loader and the
//! swipe pager, and turns user intents into store updates. A UI toolkit drives
//! it by calling [`CalendarApp::frame`] once per frame and drawing the snapshot.

mod context;
mod debounce;
mod loader;
mod state;
mod store;

pub use context::AppContext;
pub use debounce::Debounced;
pub use loader::{BackgroundLoader, CancelToken, RefreshRequest};
pub use state::UiState;
pub use store::{CalendarStore, StoreUpdate};

use chrono::{NaiveDate, TimeZone};
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use crate::models::event::Event;
use crate::models::year_month::YearMonth;
use crate::schedule::ScheduleState;
use crate::services::repository::RepositoryResult;
use crate::ui::month_grid::MonthGrid;
use crate::ui::swipe::{PageUnit, SwipePager};
use crate::ui::view_type::CalendarView;

pub struct CalendarApp {
    context: AppContext,
    store: CalendarStore,
    loader: BackgroundLoader,
    pager: SwipePager,
    synced_user: Option<i64>,
    pending_refresh: Option<CancelToken>,
}

impl CalendarApp {
    pub fn new(context: AppContext, today: NaiveDate, page_width: f32) -> Self {
        let config = context.config();
        let unit = CalendarView::default()
            .page_unit()
            .unwrap_or(PageUnit::Month);
        let pager = SwipePager::new(unit, today, page_width)
            .with_first_day_of_week(config.first_day_of_week)
            .with_threshold_ratio(config.swipe.commit_threshold)
            .with_settle_duration(config.settle_duration());
        let store = CalendarStore::new(today, config.debounce());
        let loader = context.loader();

        Self {
            context,
            store,
            loader,
            pager,
            synced_user: None,
            pending_refresh: None,
        }
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    /// Latest state, ahead of debouncing.
    pub fn state(&self) -> &UiState {
        self.store.state()
    }

    pub fn subscribe(&mut self) -> Receiver<UiState> {
        self.store.subscribe()
    }

    pub fn pager(&self) -> &SwipePager {
        &self.pager
    }

    /// Gesture input goes straight to the pager; the outcome is picked up by
    /// the next [`CalendarApp::frame`].
    pub fn pager_mut(&mut self) -> &mut SwipePager {
        &mut self.pager
    }

    /// Kick off the initial user load.
    pub fn start(&mut self, now: Instant) {
        self.store.apply(StoreUpdate::Loading(true), now);
        self.loader.load_users();
    }

    pub fn select_user(&mut self, user_id: i64, now: Instant) {
        self.store.apply(StoreUpdate::UserSelected(Some(user_id)), now);
        self.refresh(now);
    }

    /// Re-sync the selected user around the selected month. A refresh still
    /// in flight is cancelled first.
    pub fn refresh(&mut self, now: Instant) {
        if let Some(previous) = self.pending_refresh.take() {
            previous.cancel();
        }

        let state = self.store.state();
        let Some(user_id) = state.selected_user_id else {
            return;
        };
        let center = YearMonth::from_date(state.selected_date);
        let window = self.context.config().schedule.window_months;

        self.store.apply(StoreUpdate::Loading(true), now);
        let token = self.loader.refresh(RefreshRequest {
            user_id,
            first: center.minus_months(window),
            last: center.plus_months(window),
        });
        self.pending_refresh = Some(token);
        self.synced_user = Some(user_id);
    }

    pub fn select_view(&mut self, view: CalendarView, now: Instant) {
        if let Some(unit) = view.page_unit() {
            self.pager.set_unit(unit);
        }
        self.store.apply(StoreUpdate::ViewChanged(view), now);
    }

    pub fn select_date(&mut self, date: NaiveDate, now: Instant) {
        self.pager.select(date);
        self.store
            .apply(StoreUpdate::DateSelected(self.pager.selected()), now);
    }

    pub fn go_to_today(&mut self, today: NaiveDate, now: Instant) {
        self.pager.jump_to(today);
        self.store.apply(StoreUpdate::DateSelected(today), now);
    }

    pub fn toggle_calendar(&mut self, calendar_id: i64, now: Instant) {
        let result = self
            .context
            .calendar_repository()
            .toggle_calendar_visibility(calendar_id);
        let update = match result {
            Ok(visible) => StoreUpdate::CalendarVisibilityChanged {
                calendar_id,
                visible,
            },
            Err(err) => StoreUpdate::Failed(err),
        };
        self.store.apply(update, now);
    }

    /// Create the event when it has no id yet, update it otherwise.
    pub fn save_event(&mut self, event: Event, now: Instant) -> RepositoryResult<Event> {
        let repo = self.context.calendar_repository();
        let result = match event.id {
            Some(_) => repo.update_event(&event).map(|_| event),
            None => repo.create_event(event),
        };

        match &result {
            Ok(saved) => self.store.apply(StoreUpdate::EventSaved(saved.clone()), now),
            Err(err) => self.store.apply(StoreUpdate::Failed(err.clone()), now),
        }
        result
    }

    pub fn delete_event(&mut self, event_id: i64, now: Instant) -> RepositoryResult<()> {
        let result = self.context.calendar_repository().delete_event(event_id);
        match &result {
            Ok(()) => self.store.apply(StoreUpdate::EventDeleted(event_id), now),
            Err(err) => self.store.apply(StoreUpdate::Failed(err.clone()), now),
        }
        result
    }

    pub fn dismiss_error(&mut self, now: Instant) {
        self.store.apply(StoreUpdate::ErrorDismissed, now);
    }

    /// Per-frame work: drain background results, advance the pager animation
    /// by `elapsed`, and return a snapshot when one is due.
    pub fn frame(&mut self, now: Instant, elapsed: Duration) -> Option<UiState> {
        for update in self.loader.poll() {
            self.store.apply(update, now);
        }

        let selected_user = self.store.state().selected_user_id;
        if selected_user.is_some() && selected_user != self.synced_user {
            self.refresh(now);
        }

        if let Some(change) = self.pager.tick(elapsed) {
            log::debug!(
                "Page changed {:?} to {} (selected {})",
                change.direction,
                change.anchor,
                change.selected
            );
            self.store
                .apply(StoreUpdate::DateSelected(change.selected), now);
        }

        self.store.poll(now)
    }

    /// Agenda list for the current snapshot, centred on the selected month.
    pub fn schedule_in<Tz: TimeZone>(&self, tz: Tz) -> ScheduleState<Tz> {
        let state = self.store.state();
        let schedule = &self.context.config().schedule;
        ScheduleState::with_window(
            YearMonth::from_date(state.selected_date),
            state.events.clone(),
            state.holidays.clone(),
            tz,
            schedule.window_months,
            schedule.expansion_months,
        )
        .with_threshold(schedule.load_more_threshold)
    }

    /// Month grid of the selected month.
    pub fn month_grid_in<Tz: TimeZone>(&self, today: NaiveDate, tz: &Tz) -> MonthGrid {
        let state = self.store.state();
        MonthGrid::build_in(
            YearMonth::from_date(state.selected_date),
            self.context.config().first_day_of_week,
            &state.events,
            &state.holidays,
            state.selected_date,
            today,
            tz,
        )
    }
}
