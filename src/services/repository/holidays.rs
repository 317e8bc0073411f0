use rusqlite::Connection;

use crate::models::holiday::Holiday;
use crate::models::year_month::YearMonth;
use crate::services::holiday::HolidayService;
use crate::services::remote::HolidayApi;

use super::error::{RepositoryError, RepositoryResult};

/// Holidays for a span of years together with the first fetch failure, if any.
/// Years that failed to refresh are served from the cache.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HolidayLoad {
    pub holidays: Vec<Holiday>,
    pub error: Option<RepositoryError>,
}

/// Remote holiday provider backed by the local cache.
pub struct HolidayRepository<'a> {
    conn: &'a Connection,
    api: &'a dyn HolidayApi,
}

impl<'a> HolidayRepository<'a> {
    pub fn new(conn: &'a Connection, api: &'a dyn HolidayApi) -> Self {
        Self { conn, api }
    }

    /// Cached holidays only; never touches the network.
    pub fn cached(&self, country_code: &str, year: i32) -> RepositoryResult<Vec<Holiday>> {
        Ok(HolidayService::new(self.conn).list_for_year(country_code, year)?)
    }

    /// Fetch `year` from the provider and replace the cached copy.
    pub fn refresh(&self, country_code: &str, year: i32) -> RepositoryResult<Vec<Holiday>> {
        let holidays = self.api.fetch_holidays(country_code, year)?;
        HolidayService::new(self.conn).replace_for_year(country_code, year, &holidays)?;
        self.cached(country_code, year)
    }

    /// Holidays covering every year touched by `first..=last`.
    pub fn load_span(&self, country_code: &str, first: YearMonth, last: YearMonth) -> HolidayLoad {
        let mut load = HolidayLoad::default();
        if last < first {
            return load;
        }

        for year in first.year()..=last.year() {
            match self.refresh(country_code, year) {
                Ok(holidays) => load.holidays.extend(holidays),
                Err(err) => {
                    log::warn!(
                        "Holiday refresh for {} {} failed, using cache: {}",
                        country_code,
                        year,
                        err
                    );
                    match self.cached(country_code, year) {
                        Ok(cached) => load.holidays.extend(cached),
                        Err(cache_err) => {
                            log::error!("Holiday cache read failed: {}", cache_err);
                        }
                    }
                    load.error.get_or_insert(err);
                }
            }
        }

        load.holidays
            .retain(|h| h.date >= first.first_day() && h.date <= last.last_day());
        load
    }
}
