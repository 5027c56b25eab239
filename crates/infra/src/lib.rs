//! # Payline Infrastructure
//!
//! Adapters behind the ports defined in `payline-core`:
//! - SQLite persistence (r2d2 pool, repositories)
//! - HTTP time source and the simulated payroll sink
//! - Background integration scheduler
//! - Configuration loading and tracing setup

pub mod clock;
pub mod config;
pub mod database;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod observability;
pub mod scheduling;

pub use clock::SystemClock;
pub use database::{
    DbManager, SqliteFailedExportQueue, SqliteRunLogRepository, SqliteTimeRecordRepository,
};
pub use errors::InfraError;
pub use http::HttpClient;
pub use integrations::{HttpTimeSource, SimulatedPayrollSink};
pub use scheduling::{IntegrationJob, IntegrationScheduler, IntegrationSchedulerConfig};
