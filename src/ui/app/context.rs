use anyhow::{Context, Result};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::database::Database;
use crate::services::holiday::HolidayService;
use crate::services::remote::{
    DummyCalendarApi, HttpHolidayApi, SharedCalendarApi, SharedHolidayApi,
};
use crate::services::repository::{CalendarRepository, HolidayRepository};

use super::loader::BackgroundLoader;

/// Shared access point for services and resources that multiple app modules need.
pub struct AppContext {
    database: Database,
    config: AppConfig,
    remote: SharedCalendarApi,
    holiday_api: Option<SharedHolidayApi>,
}

impl AppContext {
    pub fn new(
        database: Database,
        config: AppConfig,
        remote: SharedCalendarApi,
        holiday_api: Option<SharedHolidayApi>,
    ) -> Self {
        Self {
            database,
            config,
            remote,
            holiday_api,
        }
    }

    /// Open the configured database and wire up the remote sources. The holiday
    /// provider is only used when an API key is configured.
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let db_path = config.resolved_database_path()?;
        let database = Database::open_initialized(&db_path.to_string_lossy())
            .with_context(|| format!("Failed to open database at {}", db_path.display()))?;

        let holiday_api: Option<SharedHolidayApi> = match config.holiday_api_key() {
            Some(key) => {
                let api = HttpHolidayApi::new(config.holidays.base_url.clone(), key)?;
                Some(Arc::new(api))
            }
            None => {
                log::info!("No holiday API key configured; using cached holidays only");
                None
            }
        };

        Ok(Self::new(
            database,
            config,
            Arc::new(DummyCalendarApi::new()),
            holiday_api,
        ))
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn calendar_repository(&self) -> CalendarRepository<'_> {
        CalendarRepository::new(self.database.connection(), self.remote.as_ref())
    }

    pub fn holiday_repository(&self) -> Option<HolidayRepository<'_>> {
        self.holiday_api
            .as_ref()
            .map(|api| HolidayRepository::new(self.database.connection(), api.as_ref()))
    }

    pub fn holiday_service(&self) -> HolidayService<'_> {
        HolidayService::new(self.database.connection())
    }

    /// Loader whose workers open their own connection to this database.
    pub fn loader(&self) -> BackgroundLoader {
        BackgroundLoader::new(
            self.database.path(),
            self.config.holidays.country_code.clone(),
            Arc::clone(&self.remote),
            self.holiday_api.clone(),
        )
    }
}
