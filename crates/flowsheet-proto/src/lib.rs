//! Shared types for the flowsheet console: backend records, configuration,
//! platform paths and the backend HTTP client.

pub mod api;
pub mod config;
pub mod platform;
pub mod records;
