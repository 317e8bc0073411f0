use serde::{Deserialize, Serialize};

use crate::models::event::is_hex_color;

pub const DEFAULT_CALENDAR_COLOR: &str = "#3B82F6";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    pub id: Option<i64>,
    /// Identity at the remote source; `None` for local calendars.
    pub remote_id: Option<String>,
    pub user_id: i64,
    pub name: String,
    pub color: String,
    pub is_visible: bool,
    pub is_primary: bool,
}

impl Calendar {
    pub fn new(user_id: i64, name: impl Into<String>) -> Self {
        Self {
            id: None,
            remote_id: None,
            user_id,
            name: name.into(),
            color: DEFAULT_CALENDAR_COLOR.to_string(),
            is_visible: true,
            is_primary: false,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Calendar name cannot be empty".to_string());
        }

        if !is_hex_color(&self.color) {
            return Err("Calendar color must be in hex format (#RRGGBB or #RGB)".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_calendar_defaults() {
        let calendar = Calendar::new(1, "Personal");
        assert!(calendar.is_visible);
        assert!(!calendar.is_primary);
        assert!(calendar.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_name() {
        let calendar = Calendar {
            name: "  ".to_string(),
            ..Calendar::new(1, "x")
        };
        assert!(calendar.validate().is_err());
    }

    #[test]
    fn test_validate_bad_color() {
        let calendar = Calendar {
            color: "blue".to_string(),
            ..Calendar::new(1, "Work")
        };
        assert!(calendar.validate().is_err());
    }
}
