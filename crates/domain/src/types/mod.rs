//! Domain types and models
//!
//! Persisted entities (time records, run log entries, failed exports) live
//! next to the derived values computed from them on every request.

pub mod failed_export;
pub mod integration;
pub mod payroll;
pub mod run_log;
pub mod time_record;

pub use failed_export::FailedExport;
pub use integration::{
    Dashboard, DataQualityReport, ExportResult, HealthReport, HealthStatus, HoursChart,
    ImportResult,
};
pub use payroll::{
    ActivitySnapshot, ActivityTrend, EmployeeMetrics, ExportPreview, PayrollSummary, WorkerMonth,
};
pub use run_log::{LogOutcome, LogQuery, LogRange, NewRunLogEntry, RunLogEntry, RunOperation};
pub use time_record::{
    DailyHoursQuery, DayHours, ManualEntry, NewTimeRecord, RecordSource, TimeRecord, WorkerHours,
};
