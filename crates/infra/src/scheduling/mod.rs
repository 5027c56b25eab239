//! Background scheduling of integration cycles.
//!
//! The scheduler owns one tokio task with explicit start/stop, a
//! cancellation token and a join handle.

pub mod error;
pub mod integration_scheduler;

pub use error::{SchedulerError, SchedulerResult};
pub use integration_scheduler::{
    IntegrationJob, IntegrationScheduler, IntegrationSchedulerConfig,
};
