// Holiday provider payloads.
// The provider answers `{ meta, response }`; on failure `response` is an empty array.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::holiday::Holiday;
use crate::services::repository::error::{RepositoryError, RepositoryResult};

#[derive(Debug, Deserialize)]
pub(crate) struct HolidayEnvelope {
    pub meta: Meta,
    #[serde(default)]
    pub response: ResponseBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Meta {
    pub code: u16,
    #[serde(default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub error_detail: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ResponseBody {
    Holidays { holidays: Vec<HolidayDto> },
    Empty(Vec<serde_json::Value>),
}

impl Default for ResponseBody {
    fn default() -> Self {
        ResponseBody::Empty(Vec::new())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct HolidayDto {
    pub name: String,
    pub country: CountryDto,
    pub date: HolidayDateDto,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CountryDto {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HolidayDateDto {
    pub iso: String,
    #[serde(default)]
    pub datetime: Option<DateParts>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DateParts {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl HolidayDto {
    /// Calendar day of the holiday. Timed entries (`2024-03-10T02:00:00-05:00`)
    /// keep the day as published rather than shifting through UTC.
    fn observed_date(&self) -> Option<NaiveDate> {
        if let Some(parts) = &self.date.datetime {
            if let Some(date) = NaiveDate::from_ymd_opt(parts.year, parts.month, parts.day) {
                return Some(date);
            }
        }
        self.date
            .iso
            .get(..10)
            .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
    }

    fn into_holiday(self) -> RepositoryResult<Holiday> {
        let date = self.observed_date().ok_or_else(|| {
            RepositoryError::Serialization(format!(
                "Holiday '{}' has an invalid date '{}'",
                self.name, self.date.iso
            ))
        })?;
        Ok(Holiday::new(self.name, date, self.country.id))
    }
}

/// Decode a provider response body into holidays, deduplicated by id.
pub(crate) fn parse_holidays(body: &[u8]) -> RepositoryResult<Vec<Holiday>> {
    let envelope: HolidayEnvelope = serde_json::from_slice(body)?;

    if let Some(err) = RepositoryError::from_status(envelope.meta.code) {
        log::warn!(
            "Holiday provider reported {}: {}",
            envelope.meta.code,
            envelope
                .meta
                .error_detail
                .as_deref()
                .or(envelope.meta.error_type.as_deref())
                .unwrap_or("no detail")
        );
        return Err(err);
    }

    let dtos = match envelope.response {
        ResponseBody::Holidays { holidays } => holidays,
        ResponseBody::Empty(_) => Vec::new(),
    };

    let mut holidays = dtos
        .into_iter()
        .map(HolidayDto::into_holiday)
        .collect::<RepositoryResult<Vec<_>>>()?;
    holidays.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
    holidays.dedup_by(|a, b| a.id == b.id);
    Ok(holidays)
}
