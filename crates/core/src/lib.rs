//! # Payline Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (traits) for storage, the time source, the payroll sink
//!   and the clock
//! - Validation, aggregation, metrics and health rules
//! - The integration orchestration service
//!
//! ## Architecture Principles
//! - Only depends on `payline-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits

pub mod health;
pub mod integration;
pub mod payroll;
pub mod validation;

// Re-export specific items to avoid ambiguity
pub use integration::ports::{
    Clock, FailedExportQueue, PayrollSink, RunLogRepository, TimeRecordRepository, TimeSource,
};
pub use integration::IntegrationService;
pub use payroll::{PayrollAggregator, RateTable};
