use anyhow::{Context, Result};
use reqwest::blocking::Client;
use std::thread;
use std::time::Duration;

use super::wire::parse_holidays;
use super::HolidayApi;
use crate::models::holiday::Holiday;
use crate::services::repository::error::{RepositoryError, RepositoryResult};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Blocking HTTP client for the public holiday provider.
pub struct HttpHolidayApi {
    client: Client,
    base_url: String,
    api_key: String,
    max_response_bytes: usize,
    max_retries: usize,
    retry_delay_ms: u64,
}

impl HttpHolidayApi {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, api_key, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build holiday HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            max_response_bytes: 2 * 1024 * 1024,
            max_retries: 2,
            retry_delay_ms: 400,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/holidays", self.base_url)
    }

    fn fetch_once(&self, country_code: &str, year: i32) -> RepositoryResult<Vec<Holiday>> {
        let year = year.to_string();
        let response = self
            .client
            .get(self.endpoint())
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("country", country_code),
                ("year", year.as_str()),
            ])
            .send()?;

        let status = response.status().as_u16();
        if let Some(err) = RepositoryError::from_status(status) {
            return Err(err);
        }

        if let Some(content_length) = response.content_length() {
            if content_length as usize > self.max_response_bytes {
                return Err(RepositoryError::PayloadTooLarge);
            }
        }

        let bytes = response.bytes()?;
        if bytes.len() > self.max_response_bytes {
            return Err(RepositoryError::PayloadTooLarge);
        }

        parse_holidays(&bytes)
    }
}

impl HolidayApi for HttpHolidayApi {
    fn fetch_holidays(&self, country_code: &str, year: i32) -> RepositoryResult<Vec<Holiday>> {
        let country = country_code.to_uppercase();
        let mut attempt = 0;

        loop {
            match self.fetch_once(&country, year) {
                Ok(holidays) => {
                    log::info!(
                        "Fetched {} holidays for {} {} from {}",
                        holidays.len(),
                        country,
                        year,
                        self.base_url
                    );
                    return Ok(holidays);
                }
                Err(err) if err.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    log::warn!(
                        "Holiday fetch attempt {} for {} {} failed: {}",
                        attempt,
                        country,
                        year,
                        err
                    );
                    thread::sleep(Duration::from_millis(self.retry_delay_ms));
                }
                Err(err) => return Err(err),
            }
        }
    }
}
