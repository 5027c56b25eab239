//! Time record types
//!
//! A `TimeRecord` is one worker's hours on one calendar day. Records are
//! written once (by an import or a manual entry) and never updated.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CUSTOMER_LABEL, MANUAL_CUSTOMER_LABEL};

/// Where a time record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordSource {
    /// Pulled from the external time source by an import.
    External,
    /// Entered by hand through the manual-add operation.
    Manual,
}

crate::impl_label_conversions!(RecordSource {
    External => "API",
    Manual => "Manual",
});

/// Persisted time record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeRecord {
    pub id: i64,
    pub worker_id: i64,
    pub date: NaiveDate,
    pub hours: f64,
    pub source: RecordSource,
    pub customer_label: String,
}

/// Candidate time record that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTimeRecord {
    pub worker_id: i64,
    pub date: NaiveDate,
    pub hours: f64,
    pub source: RecordSource,
    pub customer_label: String,
}

impl NewTimeRecord {
    /// Candidate produced by the external time source.
    pub fn external(
        worker_id: i64,
        date: NaiveDate,
        hours: f64,
        customer_label: Option<String>,
    ) -> Self {
        Self {
            worker_id,
            date,
            hours,
            source: RecordSource::External,
            customer_label: non_blank(customer_label)
                .unwrap_or_else(|| DEFAULT_CUSTOMER_LABEL.to_string()),
        }
    }

    /// Attach the database identifier assigned on insert.
    pub fn with_id(self, id: i64) -> TimeRecord {
        TimeRecord {
            id,
            worker_id: self.worker_id,
            date: self.date,
            hours: self.hours,
            source: self.source,
            customer_label: self.customer_label,
        }
    }
}

/// Hand-entered time record as submitted by a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualEntry {
    pub worker_id: i64,
    pub date: NaiveDate,
    pub hours: f64,
    #[serde(default)]
    pub customer_label: Option<String>,
}

impl ManualEntry {
    /// Convert into a candidate record: the source is always `Manual` and a
    /// blank label falls back to the manual-entry tenant.
    pub fn into_candidate(self) -> NewTimeRecord {
        NewTimeRecord {
            worker_id: self.worker_id,
            date: self.date,
            hours: self.hours,
            source: RecordSource::Manual,
            customer_label: non_blank(self.customer_label)
                .unwrap_or_else(|| MANUAL_CUSTOMER_LABEL.to_string()),
        }
    }
}

/// Summed hours for one worker, as returned by the grouping query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerHours {
    pub worker_id: i64,
    pub total_hours: f64,
    /// Present when every grouped record carries the same customer label.
    pub customer_label: Option<String>,
}

/// Total hours recorded on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayHours {
    pub date: NaiveDate,
    pub total_hours: f64,
}

/// Filter for per-day hour sums. Both bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DailyHoursQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub worker_id: Option<i64>,
    pub customer_label: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
