//! Core data service for the Madrasati school portal.
//! This crate owns the portal's records, credentials and visibility rules.

pub mod auth;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use auth::{Account, PasswordHash, Role};
pub use config::{ConfigError, ConflictPolicy, NotFoundPolicy, PortalConfig};
pub use db::{DbError, DbResult};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::book::Book;
pub use model::catalog::{GradeLevel, Period, Subject, Weekday};
pub use model::notification::{Notification, NotificationKind};
pub use model::parent::{parse_seat_numbers, Parent};
pub use model::schedule::{ScheduleDay, WeekSchedule};
pub use model::student::{ScoreBand, Student};
pub use model::teacher::Teacher;
pub use model::validation::ValidationError;
pub use repo::{RepoError, RepoResult};
pub use service::portal_service::SchoolPortal;
pub use service::targeting::Viewer;
pub use store::{Store, StoreError, Table};

/// Minimal health-check API for hosts probing the core.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
