// Agenda Calendar Library
// Exports all modules for testing and reuse

pub mod config;
pub mod models;
pub mod schedule;
pub mod services;
pub mod ui;
pub mod utils;
