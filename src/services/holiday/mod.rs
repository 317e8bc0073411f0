//! Local holiday cache.
//!
//! Holidays are replaced per (country, year) whenever a remote fetch succeeds so
//! stale entries removed upstream do not linger.

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, Row};

use crate::models::holiday::Holiday;

pub struct HolidayService<'a> {
    conn: &'a Connection,
}

impl<'a> HolidayService<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Replace the cached holidays of `country_code` for `year`.
    pub fn replace_for_year(&self, country_code: &str, year: i32, holidays: &[Holiday]) -> Result<usize> {
        let (first, last) = year_bounds(year)?;
        let country = country_code.to_uppercase();
        let fetched_at = Utc::now().to_rfc3339();

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM holidays WHERE country_code = ?1 AND date BETWEEN ?2 AND ?3",
            params![country, first, last],
        )
        .context("Failed to clear cached holidays")?;

        let mut stored = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO holidays (id, name, date, country_code, fetched_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for holiday in holidays
                .iter()
                .filter(|h| h.country_code == country && h.date >= first && h.date <= last)
            {
                stmt.execute(params![
                    holiday.id,
                    holiday.name,
                    holiday.date,
                    holiday.country_code,
                    fetched_at,
                ])
                .with_context(|| format!("Failed to cache holiday {}", holiday.id))?;
                stored += 1;
            }
        }
        tx.commit().context("Failed to commit holiday cache")?;

        log::debug!("Cached {} holidays for {} {}", stored, country, year);
        Ok(stored)
    }

    pub fn list_for_year(&self, country_code: &str, year: i32) -> Result<Vec<Holiday>> {
        let (first, last) = year_bounds(year)?;
        self.list_between(country_code, first, last)
    }

    pub fn list_between(&self, country_code: &str, first: NaiveDate, last: NaiveDate) -> Result<Vec<Holiday>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, date, country_code FROM holidays
             WHERE country_code = ?1 AND date BETWEEN ?2 AND ?3
             ORDER BY date ASC, name ASC",
        )?;
        let holidays = stmt
            .query_map(
                params![country_code.to_uppercase(), first, last],
                map_holiday_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to load cached holidays")?;
        Ok(holidays)
    }

    pub fn list_all(&self) -> Result<Vec<Holiday>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, date, country_code FROM holidays ORDER BY date ASC, name ASC",
        )?;
        let holidays = stmt
            .query_map([], map_holiday_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(holidays)
    }
}

fn year_bounds(year: i32) -> Result<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, 1, 1).context("Year out of range")?;
    let last = NaiveDate::from_ymd_opt(year, 12, 31).context("Year out of range")?;
    Ok((first, last))
}

fn map_holiday_row(row: &Row<'_>) -> Result<Holiday, rusqlite::Error> {
    Ok(Holiday {
        id: row.get(0)?,
        name: row.get(1)?,
        date: row.get(2)?,
        country_code: row.get(3)?,
    })
}
