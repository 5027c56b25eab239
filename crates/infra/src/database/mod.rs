//! SQLite persistence for time records, run logs and failed exports.

pub mod failed_export_repository;
pub mod manager;
pub mod run_log_repository;
pub mod time_record_repository;

pub use failed_export_repository::SqliteFailedExportQueue;
pub use manager::{DbManager, SqliteConnection, SqlitePool};
pub use run_log_repository::SqliteRunLogRepository;
pub use time_record_repository::SqliteTimeRecordRepository;
