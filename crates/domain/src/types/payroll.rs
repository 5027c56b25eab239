//! Derived payroll figures
//!
//! Nothing in this module is persisted. Every value is recomputed from the
//! stored time records when it is requested.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::time_record::DayHours;

/// Aggregated hours and pay for one worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollSummary {
    pub worker_id: i64,
    pub total_hours: f64,
    /// Year-month (`YYYY-MM`) of the evaluation, not of the records.
    pub period: String,
    pub hourly_rate: Decimal,
    pub total_pay: Decimal,
    pub customer_label: String,
}

/// Direction of a worker's recent activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ActivityTrend {
    Increasing,
    Decreasing,
    #[default]
    Stable,
}

crate::impl_label_conversions!(ActivityTrend {
    Increasing => "Increasing",
    Decreasing => "Decreasing",
    Stable => "Stable",
});

/// Activity over a worker's full record history.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ActivitySnapshot {
    pub average_hours_per_day: f64,
    pub first_entry: Option<NaiveDate>,
    pub last_entry: Option<NaiveDate>,
    pub trend: ActivityTrend,
}

/// Payroll breakdown for a single worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeMetrics {
    pub worker_id: i64,
    pub period: String,
    pub total_hours: f64,
    pub hourly_rate: Decimal,
    pub gross_pay: Decimal,
    pub tax_amount: Decimal,
    pub commission_amount: Decimal,
    pub net_pay: Decimal,
    pub tax_rate_percent: Decimal,
    pub commission_rate_percent: Decimal,
    pub activity: ActivitySnapshot,
}

/// What an export would hand to the sink right now.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportPreview {
    /// `None` when the preview covers every tenant.
    pub customer_label: Option<String>,
    pub summaries: Vec<PayrollSummary>,
    pub batch_id: String,
    pub generated_at: DateTime<Utc>,
}

impl ExportPreview {
    pub fn total_employees(&self) -> usize {
        self.summaries.len()
    }

    pub fn total_hours(&self) -> f64 {
        self.summaries.iter().map(|s| s.total_hours).sum()
    }

    pub fn total_payout(&self) -> Decimal {
        self.summaries.iter().map(|s| s.total_pay).sum()
    }
}

/// One worker's hours for a calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerMonth {
    pub worker_id: i64,
    /// `YYYY-MM`
    pub month: String,
    /// Days with at least one record, ascending.
    pub days: Vec<DayHours>,
    pub total_hours: f64,
    pub hourly_rate: Decimal,
    pub gross_pay: Decimal,
}
