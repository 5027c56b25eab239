//! Integration health evaluation

use chrono::{DateTime, Duration, Utc};
use payline_domain::constants::HEALTH_RECENT_RUN_HOURS;
use payline_domain::{HealthReport, HealthStatus};

/// Classify pipeline health from the last import/export instants and the
/// number of failed runs in the last 24 hours.
///
/// Rules are checked in order and the first match wins:
///
/// 1. no import and no export: [`HealthStatus::NoData`]
/// 2. no failures, both import and export recent: [`HealthStatus::Healthy`]
/// 3. some failures, import or export recent: [`HealthStatus::Degraded`]
/// 4. anything else: [`HealthStatus::AttentionNeeded`]
///
/// "Recent" means strictly after `now - 2h`.
pub fn evaluate(
    last_import: Option<DateTime<Utc>>,
    last_export: Option<DateTime<Utc>>,
    failures_last_24h: u64,
    now: DateTime<Utc>,
) -> HealthReport {
    let status = classify(last_import, last_export, failures_last_24h, now);

    HealthReport {
        status,
        description: status.description().to_string(),
        last_import,
        last_export,
        failures_last_24h,
    }
}

fn classify(
    last_import: Option<DateTime<Utc>>,
    last_export: Option<DateTime<Utc>>,
    failures: u64,
    now: DateTime<Utc>,
) -> HealthStatus {
    if last_import.is_none() && last_export.is_none() {
        return HealthStatus::NoData;
    }

    let cutoff = now - Duration::hours(HEALTH_RECENT_RUN_HOURS);
    let recent = |instant: Option<DateTime<Utc>>| instant.is_some_and(|at| at > cutoff);
    let import_recent = recent(last_import);
    let export_recent = recent(last_export);

    if failures == 0 && import_recent && export_recent {
        HealthStatus::Healthy
    } else if failures > 0 && (import_recent || export_recent) {
        HealthStatus::Degraded
    } else {
        HealthStatus::AttentionNeeded
    }
}
