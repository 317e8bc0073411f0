//! Application configuration loaded from `config.toml`.
//!
//! The file lives in the platform config directory unless
//! `AGENDA_CALENDAR_CONFIG` points elsewhere. A missing file yields defaults;
//! a malformed or invalid one is an error.

use anyhow::{anyhow, Context, Result};
use chrono_tz::Tz;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::schedule::{month_range, LOAD_MORE_THRESHOLD};
use crate::ui::swipe::{COMMIT_THRESHOLD_RATIO, SETTLE_DURATION};

pub const CONFIG_ENV: &str = "AGENDA_CALENDAR_CONFIG";
pub const DEFAULT_HOLIDAY_BASE_URL: &str = "https://calendarific.com/api/v2";
const DEFAULT_DATABASE_FILE: &str = "agenda_calendar.db";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite file; defaults to the platform data directory.
    pub database_path: Option<PathBuf>,
    /// IANA zone name such as `Europe/Berlin`; the system zone when unset.
    pub timezone: Option<String>,
    /// 0 = Sunday .. 6 = Saturday
    pub first_day_of_week: u8,
    pub holidays: HolidayApiConfig,
    pub schedule: ScheduleConfig,
    pub swipe: SwipeConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HolidayApiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub country_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub window_months: i32,
    pub expansion_months: u32,
    pub load_more_threshold: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwipeConfig {
    pub commit_threshold: f32,
    pub settle_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub debounce_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            timezone: None,
            first_day_of_week: 0, // Sunday
            holidays: HolidayApiConfig::default(),
            schedule: ScheduleConfig::default(),
            swipe: SwipeConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

impl Default for HolidayApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_HOLIDAY_BASE_URL.to_string(),
            api_key: None,
            country_code: "US".to_string(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            window_months: month_range::DEFAULT_WINDOW_MONTHS,
            expansion_months: month_range::DEFAULT_EXPANSION_MONTHS,
            load_more_threshold: LOAD_MORE_THRESHOLD,
        }
    }
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            commit_threshold: COMMIT_THRESHOLD_RATIO,
            settle_ms: SETTLE_DURATION.as_millis() as u64,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { debounce_ms: 300 }
    }
}

impl AppConfig {
    /// Where the config file is read from: `AGENDA_CALENDAR_CONFIG` first,
    /// then the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }
        project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load from [`AppConfig::default_path`], falling back to defaults when no
    /// file exists.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            Some(path) => {
                log::info!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            None => {
                log::warn!("No home directory found, using default config");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;
        config
            .validate()
            .map_err(|e| anyhow!("Invalid config at {}: {}", path.display(), e))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file at {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.first_day_of_week > 6 {
            return Err("first_day_of_week must be between 0 (Sunday) and 6 (Saturday)".to_string());
        }

        if let Some(name) = &self.timezone {
            parse_timezone(name)?;
        }

        let country = &self.holidays.country_code;
        if country.len() != 2 || !country.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(format!("holidays.country_code '{}' is not a two-letter code", country));
        }

        if !(self.holidays.base_url.starts_with("https://")
            || self.holidays.base_url.starts_with("http://"))
        {
            return Err("holidays.base_url must be an http(s) URL".to_string());
        }

        if self.schedule.window_months < 1 {
            return Err("schedule.window_months must be at least 1".to_string());
        }

        if self.schedule.expansion_months == 0 {
            return Err("schedule.expansion_months must be at least 1".to_string());
        }

        if !(self.swipe.commit_threshold > 0.0 && self.swipe.commit_threshold < 1.0) {
            return Err("swipe.commit_threshold must be between 0 and 1".to_string());
        }

        Ok(())
    }

    /// Configured zone, or `None` for the system zone.
    pub fn zone(&self) -> Result<Option<Tz>> {
        self.timezone
            .as_deref()
            .map(|name| parse_timezone(name).map_err(|e| anyhow!(e)))
            .transpose()
    }

    /// Configured database file, or `agenda_calendar.db` in the platform data
    /// directory.
    pub fn resolved_database_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }

        match project_dirs() {
            Some(dirs) => {
                let data_dir = dirs.data_dir();
                fs::create_dir_all(data_dir)
                    .with_context(|| format!("Failed to create {}", data_dir.display()))?;
                Ok(data_dir.join(DEFAULT_DATABASE_FILE))
            }
            None => Ok(PathBuf::from(DEFAULT_DATABASE_FILE)),
        }
    }

    /// API key for the holiday provider, if configured and non-blank.
    pub fn holiday_api_key(&self) -> Option<&str> {
        self.holidays
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn settle_duration(&self) -> Duration {
        Duration::from_millis(self.swipe.settle_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.store.debounce_ms)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "AgendaCalendar", "AgendaCalendar")
}

fn parse_timezone(name: &str) -> Result<Tz, String> {
    name.parse::<Tz>()
        .map_err(|e| format!("Unknown timezone '{}': {}", name, e))
}
