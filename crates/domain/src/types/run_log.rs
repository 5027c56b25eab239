//! Integration run log types

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Pipeline operation recorded in the run log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunOperation {
    Import,
    Export,
    Retry,
    ManualAdd,
}

crate::impl_label_conversions!(RunOperation {
    Import => "Import",
    Export => "Export",
    Retry => "Retry",
    ManualAdd => "ManualAdd",
});

/// Persisted run log entry. Entries are append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunLogEntry {
    pub id: i64,
    pub run_at: DateTime<Utc>,
    pub operation: RunOperation,
    pub success: bool,
    pub message: Option<String>,
}

/// Run log entry waiting to be appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRunLogEntry {
    pub run_at: DateTime<Utc>,
    pub operation: RunOperation,
    pub success: bool,
    pub message: Option<String>,
}

impl NewRunLogEntry {
    pub fn succeeded(
        operation: RunOperation,
        run_at: DateTime<Utc>,
        message: impl Into<String>,
    ) -> Self {
        Self { run_at, operation, success: true, message: Some(message.into()) }
    }

    pub fn failed(
        operation: RunOperation,
        run_at: DateTime<Utc>,
        message: impl Into<String>,
    ) -> Self {
        Self { run_at, operation, success: false, message: Some(message.into()) }
    }

    pub fn with_id(self, id: i64) -> RunLogEntry {
        RunLogEntry {
            id,
            run_at: self.run_at,
            operation: self.operation,
            success: self.success,
            message: self.message,
        }
    }
}

/// Outcome filter for log queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogOutcome {
    Success,
    Failed,
}

crate::impl_label_conversions!(LogOutcome {
    Success => "success",
    Failed => "failed",
});

impl LogOutcome {
    pub fn matches(self, success: bool) -> bool {
        match self {
            Self::Success => success,
            Self::Failed => !success,
        }
    }
}

/// Time window filter for log queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LogRange {
    LastHour,
    LastDay,
    LastWeek,
    #[default]
    All,
}

crate::impl_label_conversions!(LogRange {
    LastHour => "1h",
    LastDay => "24h",
    LastWeek => "7d",
    All => "all",
});

impl LogRange {
    /// Lower bound (inclusive) of the window ending at `now`.
    pub fn since(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::LastHour => Some(now - Duration::hours(1)),
            Self::LastDay => Some(now - Duration::hours(24)),
            Self::LastWeek => Some(now - Duration::days(7)),
            Self::All => None,
        }
    }
}

/// Filter applied to the most recent run log entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LogQuery {
    pub operation: Option<RunOperation>,
    pub outcome: Option<LogOutcome>,
    #[serde(default)]
    pub range: LogRange,
}

impl LogQuery {
    pub fn matches(&self, entry: &RunLogEntry, now: DateTime<Utc>) -> bool {
        if self.operation.is_some_and(|op| op != entry.operation) {
            return false;
        }
        if self.outcome.is_some_and(|outcome| !outcome.matches(entry.success)) {
            return false;
        }
        self.range.since(now).map_or(true, |since| entry.run_at >= since)
    }
}
