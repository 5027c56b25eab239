//! Stand-in for the downstream payroll system.
//!
//! Deliveries always succeed after a fixed latency. Swap in a real adapter
//! behind [`PayrollSink`] to talk to an actual payroll provider.

use std::time::Duration;

use async_trait::async_trait;
use payline_core::PayrollSink;
use payline_domain::{FailedExport, PayrollSummary, Result, SinkConfig};
use tracing::{debug, info, instrument};

#[derive(Debug, Clone)]
pub struct SimulatedPayrollSink {
    latency: Duration,
    retry_latency: Duration,
}

impl SimulatedPayrollSink {
    pub fn new(latency: Duration, retry_latency: Duration) -> Self {
        Self { latency, retry_latency }
    }

    pub fn from_config(config: &SinkConfig) -> Self {
        Self::new(
            Duration::from_millis(config.latency_ms),
            Duration::from_millis(config.retry_latency_ms),
        )
    }
}

#[async_trait]
impl PayrollSink for SimulatedPayrollSink {
    #[instrument(skip_all, fields(employees = summaries.len()))]
    async fn deliver(&self, summaries: &[PayrollSummary]) -> Result<()> {
        tokio::time::sleep(self.latency).await;
        for summary in summaries {
            debug!(
                worker_id = summary.worker_id,
                period = %summary.period,
                total_pay = %summary.total_pay,
                "payroll line accepted"
            );
        }
        info!("payroll batch delivered");
        Ok(())
    }

    #[instrument(skip_all, fields(failed_export_id = entry.id, retry_count = entry.retry_count))]
    async fn redeliver(&self, entry: &FailedExport) -> Result<()> {
        tokio::time::sleep(self.retry_latency).await;
        info!("failed export redelivered");
        Ok(())
    }
}
