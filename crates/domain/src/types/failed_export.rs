//! Failed export queue entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Export attempt waiting in the failure queue.
///
/// `payload` holds the failure cause rather than the exported data; a retry
/// hands the entry back to the sink as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedExport {
    pub id: i64,
    pub payload: String,
    pub failed_at: DateTime<Utc>,
    pub retry_count: u32,
}
