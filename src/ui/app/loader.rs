//! Background loading on worker threads.
//!
//! Each job opens its own database connection and reports back through an
//! mpsc channel that the UI thread drains once per frame with [`BackgroundLoader::poll`].
//! Results of cancelled jobs are discarded.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use crate::models::year_month::YearMonth;
use crate::services::database::Database;
use crate::services::holiday::HolidayService;
use crate::services::remote::{SharedCalendarApi, SharedHolidayApi};
use crate::services::repository::{CalendarRepository, HolidayRepository, RepositoryError};
use crate::utils::date::padded_utc_bounds;

use super::store::StoreUpdate;

#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Sync one user's data for the months `first..=last`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshRequest {
    pub user_id: i64,
    pub first: YearMonth,
    pub last: YearMonth,
}

struct Job {
    token: CancelToken,
    rx: Receiver<Vec<StoreUpdate>>,
}

#[derive(Clone)]
struct Sources {
    db_path: String,
    country_code: String,
    remote: SharedCalendarApi,
    holidays: Option<SharedHolidayApi>,
}

pub struct BackgroundLoader {
    sources: Sources,
    jobs: Vec<Job>,
}

impl BackgroundLoader {
    pub fn new(
        db_path: impl Into<String>,
        country_code: impl Into<String>,
        remote: SharedCalendarApi,
        holidays: Option<SharedHolidayApi>,
    ) -> Self {
        Self {
            sources: Sources {
                db_path: db_path.into(),
                country_code: country_code.into(),
                remote,
                holidays,
            },
            jobs: Vec::new(),
        }
    }

    pub fn load_users(&mut self) -> CancelToken {
        self.spawn(|sources, _token| {
            let db = match Database::open_initialized(&sources.db_path) {
                Ok(db) => db,
                Err(err) => return vec![StoreUpdate::Failed(err.into())],
            };
            let repo = CalendarRepository::new(db.connection(), sources.remote.as_ref());
            match repo.users() {
                Ok(users) => vec![StoreUpdate::UsersLoaded(users)],
                Err(err) => vec![StoreUpdate::Failed(err)],
            }
        })
    }

    /// Sync from the remote source, then publish calendars, events and
    /// holidays. A failed sync still publishes what the local store holds.
    pub fn refresh(&mut self, request: RefreshRequest) -> CancelToken {
        self.spawn(move |sources, token| run_refresh(sources, token, request))
    }

    /// Drain finished jobs. Call once per frame.
    pub fn poll(&mut self) -> Vec<StoreUpdate> {
        let mut updates = Vec::new();

        self.jobs.retain(|job| match job.rx.try_recv() {
            Ok(result) => {
                if !job.token.is_cancelled() {
                    updates.extend(result);
                }
                false
            }
            Err(TryRecvError::Empty) => !job.token.is_cancelled(),
            Err(TryRecvError::Disconnected) => {
                if !job.token.is_cancelled() {
                    updates.push(StoreUpdate::Failed(RepositoryError::Unknown(
                        "Loader worker disconnected unexpectedly".to_string(),
                    )));
                }
                false
            }
        });

        updates
    }

    pub fn in_flight(&self) -> usize {
        self.jobs.len()
    }

    pub fn cancel_all(&mut self) {
        for job in self.jobs.drain(..) {
            job.token.cancel();
        }
    }

    fn spawn<F>(&mut self, work: F) -> CancelToken
    where
        F: FnOnce(&Sources, &CancelToken) -> Vec<StoreUpdate> + Send + 'static,
    {
        let token = CancelToken::new();
        let (tx, rx) = mpsc::channel();
        let sources = self.sources.clone();
        let worker_token = token.clone();

        thread::spawn(move || {
            let updates = work(&sources, &worker_token);
            if worker_token.is_cancelled() {
                log::debug!("Discarding result of cancelled load");
                return;
            }
            let _ = tx.send(updates);
        });

        self.jobs.push(Job {
            token: token.clone(),
            rx,
        });
        token
    }
}

impl Drop for BackgroundLoader {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

fn run_refresh(sources: &Sources, token: &CancelToken, request: RefreshRequest) -> Vec<StoreUpdate> {
    let mut updates = Vec::new();

    let db = match Database::open_initialized(&sources.db_path) {
        Ok(db) => db,
        Err(err) => {
            return vec![StoreUpdate::Failed(err.into()), StoreUpdate::Loading(false)];
        }
    };
    let conn = db.connection();
    let repo = CalendarRepository::new(conn, sources.remote.as_ref());
    let (start, end) = padded_utc_bounds(request.first.first_day(), request.last.last_day());

    if let Err(err) = repo.sync_user(request.user_id, start, end) {
        log::warn!("Sync for user {} failed: {}", request.user_id, err);
        updates.push(StoreUpdate::Failed(err));
    }
    if token.is_cancelled() {
        return updates;
    }

    match repo.calendars_for(request.user_id) {
        Ok(calendars) => updates.push(StoreUpdate::CalendarsLoaded {
            user_id: request.user_id,
            calendars,
        }),
        Err(err) => updates.push(StoreUpdate::Failed(err)),
    }
    match repo.events_for(request.user_id) {
        Ok(events) => updates.push(StoreUpdate::EventsLoaded {
            user_id: request.user_id,
            events,
        }),
        Err(err) => updates.push(StoreUpdate::Failed(err)),
    }
    if token.is_cancelled() {
        return updates;
    }

    match &sources.holidays {
        Some(api) => {
            let load = HolidayRepository::new(conn, api.as_ref()).load_span(
                &sources.country_code,
                request.first,
                request.last,
            );
            updates.push(StoreUpdate::HolidaysLoaded(load.holidays));
            if let Some(err) = load.error {
                updates.push(StoreUpdate::Failed(err));
            }
        }
        None => {
            let cached = HolidayService::new(conn).list_between(
                &sources.country_code,
                request.first.first_day(),
                request.last.last_day(),
            );
            match cached {
                Ok(holidays) => updates.push(StoreUpdate::HolidaysLoaded(holidays)),
                Err(err) => updates.push(StoreUpdate::Failed(err.into())),
            }
        }
    }

    updates.push(StoreUpdate::Loading(false));
    updates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::holiday::Holiday;
    use crate::models::user::User;
    use crate::services::remote::{DummyCalendarApi, HolidayApi};
    use crate::services::repository::RepositoryResult;
    use crate::services::user::UserService;
    use chrono::NaiveDate;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    struct FixedHolidays;

    impl HolidayApi for FixedHolidays {
        fn fetch_holidays(&self, country_code: &str, year: i32) -> RepositoryResult<Vec<Holiday>> {
            let date = NaiveDate::from_ymd_opt(year, 6, 19).unwrap();
            Ok(vec![Holiday::new("Juneteenth", date, country_code)])
        }
    }

    fn setup() -> (TempDir, String, i64) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("loader.db").to_string_lossy().to_string();
        let db = Database::open_initialized(&path).unwrap();
        let user = UserService::new(db.connection()).create(User::new("Ada")).unwrap();
        (dir, path, user.id.unwrap())
    }

    fn drain(loader: &mut BackgroundLoader) -> Vec<StoreUpdate> {
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut updates = Vec::new();
        while loader.in_flight() > 0 && Instant::now() < deadline {
            updates.extend(loader.poll());
            thread::sleep(Duration::from_millis(10));
        }
        updates
    }

    fn june() -> RefreshRequest {
        let month = YearMonth::new(2024, 6).unwrap();
        RefreshRequest {
            user_id: 0,
            first: month,
            last: month,
        }
    }

    #[test]
    fn test_refresh_publishes_synced_data() {
        let (_dir, path, user_id) = setup();
        let mut loader = BackgroundLoader::new(
            path,
            "US",
            Arc::new(DummyCalendarApi::new()),
            Some(Arc::new(FixedHolidays)),
        );

        loader.refresh(RefreshRequest { user_id, ..june() });
        let updates = drain(&mut loader);

        assert!(updates.iter().any(|u| matches!(u, StoreUpdate::CalendarsLoaded { calendars, .. } if calendars.len() == 2)));
        assert!(updates.iter().any(|u| matches!(u, StoreUpdate::EventsLoaded { events, .. } if !events.is_empty())));
        assert!(updates
            .iter()
            .any(|u| matches!(u, StoreUpdate::HolidaysLoaded(h) if h.len() == 1)));
        assert_eq!(updates.last(), Some(&StoreUpdate::Loading(false)));
        assert!(!updates.iter().any(|u| matches!(u, StoreUpdate::Failed(_))));
    }

    #[test]
    fn test_failed_sync_still_publishes_local_data() {
        let (_dir, path, user_id) = setup();
        let mut loader = BackgroundLoader::new(
            path,
            "US",
            Arc::new(DummyCalendarApi::failing(RepositoryError::NoConnectivity)),
            None,
        );

        loader.refresh(RefreshRequest { user_id, ..june() });
        let updates = drain(&mut loader);

        assert_eq!(updates.first(), Some(&StoreUpdate::Failed(RepositoryError::NoConnectivity)));
        assert!(updates.contains(&StoreUpdate::CalendarsLoaded {
            user_id,
            calendars: vec![],
        }));
        assert!(updates.contains(&StoreUpdate::HolidaysLoaded(vec![])));
    }

    #[test]
    fn test_cancelled_job_results_are_discarded() {
        let (_dir, path, user_id) = setup();
        let mut loader =
            BackgroundLoader::new(path, "US", Arc::new(DummyCalendarApi::new()), None);

        let token = loader.refresh(RefreshRequest { user_id, ..june() });
        token.cancel();

        assert!(drain(&mut loader).is_empty());
        assert_eq!(loader.in_flight(), 0);
    }

    #[test]
    fn test_load_users() {
        let (_dir, path, _) = setup();
        let mut loader =
            BackgroundLoader::new(path, "US", Arc::new(DummyCalendarApi::new()), None);

        loader.load_users();
        let updates = drain(&mut loader);

        match updates.as_slice() {
            [StoreUpdate::UsersLoaded(users)] => assert_eq!(users[0].name, "Ada"),
            other => panic!("unexpected updates: {:?}", other),
        }
    }
}
