// Holiday module
// Read-only public holidays fetched from a remote source

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Holiday {
    pub id: String,
    pub name: String,
    /// Observed calendar day; holidays are whole-day and zone independent.
    pub date: NaiveDate,
    pub country_code: String,
}

impl Holiday {
    pub fn new(name: impl Into<String>, date: NaiveDate, country_code: impl Into<String>) -> Self {
        let name = name.into();
        let country_code = country_code.into().to_uppercase();
        let id = Self::make_id(&name, date, &country_code);
        Self {
            id,
            name,
            date,
            country_code,
        }
    }

    /// Deterministic id, stable across refetches of the same holiday.
    ///
    /// Letters and digits of any script are kept; a name with none falls back
    /// to a hash of the name so distinct names never share an id.
    pub fn make_id(name: &str, date: NaiveDate, country_code: &str) -> String {
        let slug = name
            .chars()
            .flat_map(|c| {
                let keep = if c.is_alphanumeric() { c } else { '-' };
                keep.to_lowercase()
            })
            .collect::<String>()
            .split('-')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("-");
        let slug = if slug.is_empty() {
            format!("h{:016x}", fnv1a(name.as_bytes()))
        } else {
            slug
        };

        format!(
            "{}-{}-{}",
            country_code.to_uppercase(),
            date.format("%Y%m%d"),
            slug
        )
    }
}

/// 64-bit FNV-1a; unlike `DefaultHasher` its output never changes between builds.
fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(0x0000_0100_0000_01b3)
    })
}
