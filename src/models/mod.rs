// Module exports for models

pub mod calendar;
pub mod event;
pub mod holiday;
pub mod schedule_item;
pub mod user;
pub mod year_month;
