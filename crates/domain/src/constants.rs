//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Tenant labels
pub const DEFAULT_CUSTOMER_LABEL: &str = "Demo customer";
pub const MANUAL_CUSTOMER_LABEL: &str = "Manual entry";

// Time source mapping
pub const MAX_IMPORT_BATCH: usize = 30;
pub const PLACEHOLDER_HOURS_MODULUS: i64 = 5;
pub const PLACEHOLDER_HOURS_BASE: i64 = 5;

// Validation bounds
pub const MIN_RECORD_HOURS: f64 = 0.0;
pub const MAX_RECORD_HOURS: f64 = 24.0;

// Payroll valuation (percent values; see `payroll` types for the decimal rates)
pub const TAX_RATE_PERCENT: u32 = 32;
pub const COMMISSION_RATE_PERCENT: u32 = 5;
pub const DEFAULT_HOURLY_RATE: u32 = 280;

// Activity trend windows
pub const TREND_WINDOW_DAYS: i64 = 7;
pub const TREND_THRESHOLD_PERCENT: u32 = 10;

// Health evaluation
pub const HEALTH_RECENT_RUN_HOURS: i64 = 2;
pub const HEALTH_FAILURE_WINDOW_HOURS: i64 = 24;

// Run log consumption
pub const RECENT_LOG_LIMIT: usize = 50;
pub const DASHBOARD_CHART_DAYS: i64 = 7;

// Scheduling and sink simulation
pub const DEFAULT_SCHEDULER_INTERVAL_SECS: u64 = 600;
pub const DEFAULT_SINK_LATENCY_MS: u64 = 300;
pub const DEFAULT_SINK_RETRY_LATENCY_MS: u64 = 200;

// Run log messages
pub const EMPTY_EXPORT_PAYLOAD: &str = "No data to export.";
pub const EMPTY_EXPORT_MESSAGE: &str = "No data to export – queued.";
