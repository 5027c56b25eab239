//! Port interfaces for the integration pipeline

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use payline_domain::{
    DailyHoursQuery, DayHours, FailedExport, NewRunLogEntry, NewTimeRecord, PayrollSummary,
    Result, RunLogEntry, RunOperation, TimeRecord, WorkerHours,
};

/// Persistence for time records
#[async_trait]
pub trait TimeRecordRepository: Send + Sync {
    /// Persist a batch of records atomically. Either every record is stored
    /// or none is.
    async fn insert_batch(&self, records: &[NewTimeRecord]) -> Result<usize>;

    /// Persist a single record and return it with its identifier
    async fn insert(&self, record: &NewTimeRecord) -> Result<TimeRecord>;

    /// Sum hours per worker, optionally restricted to one customer label
    async fn hours_by_worker(&self, customer_label: Option<&str>) -> Result<Vec<WorkerHours>>;

    /// All records of one worker ordered by date
    async fn find_by_worker(&self, worker_id: i64) -> Result<Vec<TimeRecord>>;

    /// Sum hours per day within the query bounds
    async fn daily_hours(&self, query: &DailyHoursQuery) -> Result<Vec<DayHours>>;

    async fn count(&self) -> Result<u64>;

    /// Distinct customer labels, sorted
    async fn customer_labels(&self) -> Result<Vec<String>>;
}

/// Append-only integration run log
#[async_trait]
pub trait RunLogRepository: Send + Sync {
    async fn append(&self, entry: &NewRunLogEntry) -> Result<RunLogEntry>;

    /// Newest entries first
    async fn recent(&self, limit: usize) -> Result<Vec<RunLogEntry>>;

    /// Most recent entry for an operation, successful or not
    async fn latest(&self, operation: RunOperation) -> Result<Option<RunLogEntry>>;

    /// Most recent successful entry for an operation
    async fn latest_success(&self, operation: RunOperation) -> Result<Option<RunLogEntry>>;

    /// Failed entries of any operation logged at or after `since`
    async fn count_failures_since(&self, since: DateTime<Utc>) -> Result<u64>;
}

/// Queue of exports waiting to be retried
#[async_trait]
pub trait FailedExportQueue: Send + Sync {
    async fn enqueue(&self, payload: &str, failed_at: DateTime<Utc>) -> Result<FailedExport>;

    /// Queued entries, oldest first
    async fn list(&self) -> Result<Vec<FailedExport>>;

    async fn remove(&self, id: i64) -> Result<()>;

    async fn increment_retry(&self, id: i64) -> Result<()>;

    async fn count(&self) -> Result<u64>;
}

/// Upstream system that supplies time records
#[async_trait]
pub trait TimeSource: Send + Sync {
    /// Fetch candidate records dated `today`. Any failure yields an error,
    /// never a partial batch.
    async fn fetch(&self, today: NaiveDate) -> Result<Vec<NewTimeRecord>>;

    /// Human-readable description of how upstream data maps to records
    fn mapping_description(&self) -> String {
        "Upstream records are imported as-is.".to_string()
    }
}

/// Downstream payroll system
#[async_trait]
pub trait PayrollSink: Send + Sync {
    /// Hand a batch of summaries to the sink
    async fn deliver(&self, summaries: &[PayrollSummary]) -> Result<()>;

    /// Deliver a previously failed export again
    async fn redeliver(&self, entry: &FailedExport) -> Result<()>;
}

/// Source of the current instant
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar day in UTC
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}
