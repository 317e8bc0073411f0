// Service module exports
// One service per persisted entity, plus remote sources and the repository boundary.

pub mod calendar;
pub mod database;
pub mod event;
pub mod holiday;
pub mod remote;
pub mod repository;
pub mod user;
