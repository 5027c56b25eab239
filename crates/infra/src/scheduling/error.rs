//! Scheduler error types

use payline_domain::PaylineError;
use thiserror::Error;

use crate::errors::InfraError;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Scheduler already running")]
    AlreadyRunning,

    #[error("Scheduler not running")]
    NotRunning,

    /// Rejected scheduler settings
    #[error("Invalid scheduler configuration: {0}")]
    InvalidConfig(String),

    #[error("Operation timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Task join failed: {0}")]
    TaskJoinFailed(String),
}

impl From<SchedulerError> for InfraError {
    fn from(err: SchedulerError) -> Self {
        let payline_err = match err {
            SchedulerError::AlreadyRunning
            | SchedulerError::NotRunning
            | SchedulerError::InvalidConfig(_) => PaylineError::InvalidInput(err.to_string()),
            SchedulerError::Timeout { .. } | SchedulerError::TaskJoinFailed(_) => {
                PaylineError::Internal(err.to_string())
            }
        };
        InfraError(payline_err)
    }
}

impl From<SchedulerError> for PaylineError {
    fn from(err: SchedulerError) -> Self {
        InfraError::from(err).into()
    }
}

pub type SchedulerResult<T> = Result<T, SchedulerError>;
