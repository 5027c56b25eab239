//! Payroll aggregation
//!
//! Groups persisted time records by worker and values them with the
//! immutable [`RateTable`]. Summaries are recomputed on every call.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use payline_domain::constants::{DEFAULT_CUSTOMER_LABEL, DEFAULT_HOURLY_RATE};
use payline_domain::{PaylineError, PayrollSummary, Result, WorkerHours};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use tracing::debug;

use crate::integration::ports::TimeRecordRepository;

/// Hourly rate per worker, with a fallback for workers not listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateTable {
    rates: HashMap<i64, Decimal>,
    default_rate: Decimal,
}

impl RateTable {
    pub fn new(rates: HashMap<i64, Decimal>, default_rate: Decimal) -> Self {
        Self { rates, default_rate }
    }

    /// Rates used in production.
    pub fn standard() -> Self {
        let rates = [(1, 250), (2, 260), (3, 275), (4, 280), (5, 290)]
            .into_iter()
            .map(|(worker_id, rate)| (worker_id, Decimal::from(rate)))
            .collect();
        Self::new(rates, Decimal::from(DEFAULT_HOURLY_RATE))
    }

    pub fn rate_for(&self, worker_id: i64) -> Decimal {
        self.rates.get(&worker_id).copied().unwrap_or(self.default_rate)
    }

    pub fn default_rate(&self) -> Decimal {
        self.default_rate
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Year-month label of the evaluation instant.
pub fn period_label(now: DateTime<Utc>) -> String {
    now.format("%Y-%m").to_string()
}

/// Convert summed hours into an exact decimal for pay arithmetic.
pub fn hours_to_decimal(hours: f64) -> Result<Decimal> {
    Decimal::from_f64(hours)
        .ok_or_else(|| PaylineError::Internal(format!("hours total {hours} is not representable")))
}

/// Builds payroll summaries from stored time records.
pub struct PayrollAggregator {
    records: Arc<dyn TimeRecordRepository>,
    rates: Arc<RateTable>,
}

impl PayrollAggregator {
    pub fn new(records: Arc<dyn TimeRecordRepository>, rates: Arc<RateTable>) -> Self {
        Self { records, rates }
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// One summary per worker with records, ordered by worker id.
    pub async fn summarize(
        &self,
        customer_label: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Vec<PayrollSummary>> {
        let rows = self.records.hours_by_worker(customer_label).await?;
        debug!(workers = rows.len(), tenant = ?customer_label, "aggregating payroll");
        build_summaries(&rows, &self.rates, customer_label, &period_label(now))
    }
}

/// Value grouped hours. Pure part of [`PayrollAggregator::summarize`].
pub fn build_summaries(
    rows: &[WorkerHours],
    rates: &RateTable,
    customer_label: Option<&str>,
    period: &str,
) -> Result<Vec<PayrollSummary>> {
    let mut summaries = rows
        .iter()
        .map(|row| {
            let hourly_rate = rates.rate_for(row.worker_id);
            let total_pay = hourly_rate * hours_to_decimal(row.total_hours)?;
            let label = customer_label
                .map(str::to_string)
                .or_else(|| row.customer_label.clone())
                .unwrap_or_else(|| DEFAULT_CUSTOMER_LABEL.to_string());

            Ok(PayrollSummary {
                worker_id: row.worker_id,
                total_hours: row.total_hours,
                period: period.to_string(),
                hourly_rate,
                total_pay,
                customer_label: label,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    summaries.sort_by_key(|s| s.worker_id);
    Ok(summaries)
}
