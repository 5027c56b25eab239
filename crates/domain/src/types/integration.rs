//! Pipeline results and monitoring views

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::payroll::PayrollSummary;
use super::run_log::RunLogEntry;

/// Outcome of one import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImportResult {
    pub imported: usize,
    pub invalid: usize,
}

impl ImportResult {
    /// Run log message recorded for a successful import.
    pub fn log_message(&self) -> String {
        format!("Imported {} entries, {} invalid.", self.imported, self.invalid)
    }

    /// Recover the counts from a message produced by [`Self::log_message`].
    pub fn parse_log_message(message: &str) -> Option<Self> {
        let rest = message.strip_prefix("Imported ")?;
        let (imported, rest) = rest.split_once(" entries, ")?;
        let invalid = rest.strip_suffix(" invalid.")?;
        Some(Self { imported: imported.trim().parse().ok()?, invalid: invalid.trim().parse().ok()? })
    }
}

/// Outcome of one export run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExportResult {
    pub exported_count: usize,
    pub failed_queued: usize,
    pub success: bool,
}

impl ExportResult {
    pub fn delivered(exported_count: usize) -> Self {
        Self { exported_count, failed_queued: 0, success: true }
    }

    /// Nothing was delivered and one entry went to the failure queue.
    pub fn queued() -> Self {
        Self { exported_count: 0, failed_queued: 1, success: false }
    }
}

/// Coarse health classification of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HealthStatus {
    NoData,
    Healthy,
    Degraded,
    AttentionNeeded,
}

crate::impl_label_conversions!(HealthStatus {
    NoData => "No data yet",
    Healthy => "Healthy",
    Degraded => "Degraded",
    AttentionNeeded => "Attention needed",
});

impl HealthStatus {
    pub const fn description(&self) -> &'static str {
        match self {
            Self::NoData => "Run your first import to start monitoring integrations.",
            Self::Healthy => "Imports and exports are running as expected.",
            Self::Degraded => "Some operations have failed recently, but data is still flowing.",
            Self::AttentionNeeded => "No recent successful runs. Investigate the integration log.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub description: String,
    pub last_import: Option<DateTime<Utc>>,
    pub last_export: Option<DateTime<Utc>>,
    pub failures_last_24h: u64,
}

/// Daily hour totals, one point per label.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HoursChart {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// Everything the monitoring overview shows in one read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub summaries: Vec<PayrollSummary>,
    pub logs: Vec<RunLogEntry>,
    pub total_employees: usize,
    pub total_hours: f64,
    pub total_payout: Decimal,
    pub failed_exports_queued: u64,
    pub hours_chart: HoursChart,
    pub health: HealthReport,
}

/// Import data quality overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataQualityReport {
    pub last_import_at: Option<DateTime<Utc>>,
    pub last_import_invalid: Option<usize>,
    pub validation_rules: Vec<String>,
    pub mapping_description: String,
}
