//! Integration orchestration service - core business logic
//!
//! Every pipeline operation (import, export, retry, manual add) records its
//! outcome in the run log and converts lower-level failures into a result
//! value. Read operations (summaries, health, metrics, dashboard) return
//! store errors to the caller unchanged.

use std::sync::Arc;

use chrono::{Datelike, Duration, Months, NaiveDate};
use payline_domain::constants::{
    DASHBOARD_CHART_DAYS, EMPTY_EXPORT_MESSAGE, EMPTY_EXPORT_PAYLOAD, HEALTH_FAILURE_WINDOW_HOURS,
    RECENT_LOG_LIMIT,
};
use payline_domain::{
    DailyHoursQuery, Dashboard, DataQualityReport, EmployeeMetrics, ExportPreview, ExportResult,
    HealthReport, HoursChart, ImportResult, LogQuery, ManualEntry, NewRunLogEntry, NewTimeRecord,
    PaylineError, PayrollSummary, Result, RunLogEntry, RunOperation, TimeRecord, WorkerMonth,
};
use rust_decimal::Decimal;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use super::ports::{
    Clock, FailedExportQueue, PayrollSink, RunLogRepository, TimeRecordRepository, TimeSource,
};
use crate::health;
use crate::payroll::{aggregator, employee_metrics, PayrollAggregator, RateTable};
use crate::validation;

/// Orchestrates imports, exports and retries over the configured ports.
pub struct IntegrationService {
    records: Arc<dyn TimeRecordRepository>,
    run_log: Arc<dyn RunLogRepository>,
    failed_exports: Arc<dyn FailedExportQueue>,
    time_source: Arc<dyn TimeSource>,
    sink: Arc<dyn PayrollSink>,
    clock: Arc<dyn Clock>,
    aggregator: PayrollAggregator,
}

impl IntegrationService {
    /// Create a service that values hours with [`RateTable::standard`].
    pub fn new(
        records: Arc<dyn TimeRecordRepository>,
        run_log: Arc<dyn RunLogRepository>,
        failed_exports: Arc<dyn FailedExportQueue>,
        time_source: Arc<dyn TimeSource>,
        sink: Arc<dyn PayrollSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let aggregator =
            PayrollAggregator::new(Arc::clone(&records), Arc::new(RateTable::standard()));
        Self { records, run_log, failed_exports, time_source, sink, clock, aggregator }
    }

    /// Replace the rate table used for valuation.
    pub fn with_rate_table(mut self, rates: Arc<RateTable>) -> Self {
        self.aggregator = PayrollAggregator::new(Arc::clone(&self.records), rates);
        self
    }

    // ------------------------------------------------------------------
    // Pipeline operations
    // ------------------------------------------------------------------

    /// Pull records from the time source, keep the valid ones and persist
    /// them in a single batch.
    ///
    /// On any fetch or persistence failure nothing is stored, a failed
    /// `Import` entry is logged and `{0, 0}` is returned.
    #[instrument(skip(self))]
    pub async fn import(&self) -> ImportResult {
        match self.try_import().await {
            Ok(result) => {
                info!(imported = result.imported, invalid = result.invalid, "import completed");
                self.record_run(NewRunLogEntry::succeeded(
                    RunOperation::Import,
                    self.clock.now(),
                    result.log_message(),
                ))
                .await;
                result
            }
            Err(err) => {
                error!(error = %err, error_type = err.label(), "import failed");
                self.record_run(NewRunLogEntry::failed(
                    RunOperation::Import,
                    self.clock.now(),
                    err.to_string(),
                ))
                .await;
                ImportResult::default()
            }
        }
    }

    async fn try_import(&self) -> Result<ImportResult> {
        let today = self.clock.today();
        let candidates = self.time_source.fetch(today).await?;

        let (valid, invalid): (Vec<NewTimeRecord>, Vec<NewTimeRecord>) =
            candidates.into_iter().partition(|candidate| validation::is_valid(candidate, today));

        for candidate in &invalid {
            warn!(
                worker_id = candidate.worker_id,
                violations = %validation::validate(candidate, today).join(", "),
                "skipping invalid time record"
            );
        }

        let imported = if valid.is_empty() { 0 } else { self.records.insert_batch(&valid).await? };

        Ok(ImportResult { imported, invalid: invalid.len() })
    }

    /// Hand the current payroll summaries to the sink.
    ///
    /// An empty summary set or a sink failure puts one entry in the failure
    /// queue and logs a failed `Export`.
    #[instrument(skip(self))]
    pub async fn export(&self, customer_label: Option<&str>) -> ExportResult {
        let tenant = normalize_tenant(customer_label);

        let summaries = match self.aggregator.summarize(tenant, self.clock.now()).await {
            Ok(summaries) => summaries,
            Err(err) => {
                error!(error = %err, "failed to build payroll summaries for export");
                let reason = err.to_string();
                return self.queue_failed_export(&reason, &reason).await;
            }
        };

        if summaries.is_empty() {
            warn!("no payroll data to export");
            return self.queue_failed_export(EMPTY_EXPORT_PAYLOAD, EMPTY_EXPORT_MESSAGE).await;
        }

        match self.sink.deliver(&summaries).await {
            Ok(()) => {
                let exported = summaries.len();
                info!(exported, "export delivered");
                self.record_run(NewRunLogEntry::succeeded(
                    RunOperation::Export,
                    self.clock.now(),
                    format!("Exported {exported} employees."),
                ))
                .await;
                ExportResult::delivered(exported)
            }
            Err(err) => {
                error!(error = %err, error_type = err.label(), "export delivery failed");
                let reason = err.to_string();
                self.queue_failed_export(&reason, &reason).await
            }
        }
    }

    async fn queue_failed_export(&self, payload: &str, message: &str) -> ExportResult {
        let now = self.clock.now();
        let queued = match self.failed_exports.enqueue(payload, now).await {
            Ok(entry) => {
                debug!(failed_export_id = entry.id, "queued failed export");
                1
            }
            Err(err) => {
                error!(error = %err, "failed to queue failed export");
                0
            }
        };

        self.record_run(NewRunLogEntry::failed(RunOperation::Export, now, message)).await;
        ExportResult { exported_count: 0, failed_queued: queued, success: false }
    }

    /// Redeliver every queued export once.
    ///
    /// Delivered entries are removed and logged as successful `Retry` runs.
    /// Entries that fail again stay queued with an incremented retry count
    /// and produce no run log entry. Returns the number of entries removed.
    #[instrument(skip(self))]
    pub async fn retry_failed_exports(&self) -> usize {
        let queued = match self.failed_exports.list().await {
            Ok(queued) => queued,
            Err(err) => {
                error!(error = %err, "failed to load failed export queue");
                return 0;
            }
        };

        let mut retried = 0;
        for entry in &queued {
            if let Err(err) = self.sink.redeliver(entry).await {
                warn!(
                    failed_export_id = entry.id,
                    retry_count = entry.retry_count + 1,
                    error = %err,
                    "retry failed"
                );
                if let Err(err) = self.failed_exports.increment_retry(entry.id).await {
                    error!(failed_export_id = entry.id, error = %err, "failed to bump retry count");
                }
                continue;
            }

            if let Err(err) = self.failed_exports.remove(entry.id).await {
                error!(failed_export_id = entry.id, error = %err, "failed to dequeue retried export");
                continue;
            }

            retried += 1;
            self.record_run(NewRunLogEntry::succeeded(
                RunOperation::Retry,
                self.clock.now(),
                format!("Retried payload {}", entry.id),
            ))
            .await;
        }

        info!(queued = queued.len(), retried, "retry pass completed");
        retried
    }

    /// Validate and persist a hand-entered record.
    ///
    /// Validation failures return [`PaylineError::Validation`] and leave both
    /// the store and the run log untouched.
    #[instrument(skip(self, entry), fields(worker_id = entry.worker_id))]
    pub async fn manual_add(&self, entry: ManualEntry) -> Result<TimeRecord> {
        let candidate = entry.into_candidate();
        let violations = validation::validate(&candidate, self.clock.today());
        if !violations.is_empty() {
            debug!(?violations, "manual entry rejected");
            return Err(PaylineError::Validation(violations));
        }

        match self.records.insert(&candidate).await {
            Ok(record) => {
                info!(record_id = record.id, "manual entry stored");
                self.record_run(NewRunLogEntry::succeeded(
                    RunOperation::ManualAdd,
                    self.clock.now(),
                    format!("Manual entry for employee {}", record.worker_id),
                ))
                .await;
                Ok(record)
            }
            Err(err) => {
                error!(error = %err, "failed to store manual entry");
                self.record_run(NewRunLogEntry::failed(
                    RunOperation::ManualAdd,
                    self.clock.now(),
                    err.to_string(),
                ))
                .await;
                Err(err)
            }
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub async fn current_summaries(
        &self,
        customer_label: Option<&str>,
    ) -> Result<Vec<PayrollSummary>> {
        self.aggregator.summarize(normalize_tenant(customer_label), self.clock.now()).await
    }

    /// The most recent run log entries, newest first.
    pub async fn logs(&self) -> Result<Vec<RunLogEntry>> {
        self.run_log.recent(RECENT_LOG_LIMIT).await
    }

    /// Filter the most recent run log entries.
    pub async fn query_logs(&self, query: &LogQuery) -> Result<Vec<RunLogEntry>> {
        let now = self.clock.now();
        let mut entries = self.logs().await?;
        entries.retain(|entry| query.matches(entry, now));
        Ok(entries)
    }

    pub async fn health(&self) -> Result<HealthReport> {
        let now = self.clock.now();
        let last_import = self.run_log.latest(RunOperation::Import).await?.map(|e| e.run_at);
        let last_export = self.run_log.latest(RunOperation::Export).await?.map(|e| e.run_at);
        let failures = self
            .run_log
            .count_failures_since(now - Duration::hours(HEALTH_FAILURE_WINDOW_HOURS))
            .await?;

        Ok(health::evaluate(last_import, last_export, failures, now))
    }

    /// Pay breakdown and activity for one worker, `None` if the worker has
    /// no records.
    pub async fn metrics(&self, worker_id: i64) -> Result<Option<EmployeeMetrics>> {
        let summaries = self.aggregator.summarize(None, self.clock.now()).await?;
        let Some(summary) = summaries.into_iter().find(|s| s.worker_id == worker_id) else {
            return Ok(None);
        };

        let records = self.records.find_by_worker(worker_id).await?;
        Ok(Some(employee_metrics(&summary, &records, self.clock.today())))
    }

    pub async fn dashboard(&self, customer_label: Option<&str>) -> Result<Dashboard> {
        let tenant = normalize_tenant(customer_label);
        let summaries = self.current_summaries(tenant).await?;
        let logs = self.logs().await?;
        let failed_exports_queued = self.failed_exports.count().await?;
        let hours_chart = self.hours_chart(tenant).await?;
        let health = self.health().await?;

        Ok(Dashboard {
            total_employees: summaries.len(),
            total_hours: summaries.iter().map(|s| s.total_hours).sum(),
            total_payout: summaries.iter().map(|s| s.total_pay).sum(),
            summaries,
            logs,
            failed_exports_queued,
            hours_chart,
            health,
        })
    }

    /// Daily hours for the last week, zero-filled, labelled `dd Mon`.
    async fn hours_chart(&self, customer_label: Option<&str>) -> Result<HoursChart> {
        let today = self.clock.today();
        let from = today - Duration::days(DASHBOARD_CHART_DAYS - 1);
        let daily = self
            .records
            .daily_hours(&DailyHoursQuery {
                from: Some(from),
                to: Some(today),
                worker_id: None,
                customer_label: customer_label.map(str::to_string),
            })
            .await?;

        let mut chart = HoursChart::default();
        for day in from.iter_days().take_while(|day| *day <= today) {
            chart.labels.push(day.format("%d %b").to_string());
            chart.values.push(
                daily.iter().find(|d| d.date == day).map_or(0.0, |d| d.total_hours),
            );
        }
        Ok(chart)
    }

    pub async fn export_preview(&self, customer_label: Option<&str>) -> Result<ExportPreview> {
        let tenant = normalize_tenant(customer_label);
        Ok(ExportPreview {
            customer_label: tenant.map(str::to_string),
            summaries: self.current_summaries(tenant).await?,
            batch_id: Uuid::new_v4().simple().to_string(),
            generated_at: self.clock.now(),
        })
    }

    pub async fn data_quality(&self) -> Result<DataQualityReport> {
        let last_import = self.run_log.latest(RunOperation::Import).await?;
        let last_success = self.run_log.latest_success(RunOperation::Import).await?;

        Ok(DataQualityReport {
            last_import_at: last_import.map(|entry| entry.run_at),
            last_import_invalid: last_success
                .and_then(|entry| entry.message)
                .and_then(|message| ImportResult::parse_log_message(&message))
                .map(|result| result.invalid),
            validation_rules: validation::RULES.iter().map(|rule| (*rule).to_string()).collect(),
            mapping_description: self.time_source.mapping_description(),
        })
    }

    /// Per-day hours of one worker for `month` (`YYYY-MM`).
    ///
    /// A missing or unparseable month falls back to the current month.
    pub async fn worker_month(&self, worker_id: i64, month: Option<&str>) -> Result<WorkerMonth> {
        let today = self.clock.today();
        let start = month.and_then(parse_month).unwrap_or_else(|| first_of_month(today));
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .ok_or_else(|| PaylineError::InvalidInput(format!("month out of range: {start}")))?;

        let days = self
            .records
            .daily_hours(&DailyHoursQuery {
                from: Some(start),
                to: Some(end),
                worker_id: Some(worker_id),
                customer_label: None,
            })
            .await?;

        let total_hours: f64 = days.iter().map(|d| d.total_hours).sum();
        let hourly_rate = self.aggregator.rates().rate_for(worker_id);
        let gross_pay: Decimal = hourly_rate * aggregator::hours_to_decimal(total_hours)?;

        Ok(WorkerMonth {
            worker_id,
            month: start.format("%Y-%m").to_string(),
            days,
            total_hours,
            hourly_rate,
            gross_pay,
        })
    }

    /// Distinct customer labels present in the store.
    pub async fn tenants(&self) -> Result<Vec<String>> {
        self.records.customer_labels().await
    }

    async fn record_run(&self, entry: NewRunLogEntry) {
        if let Err(err) = self.run_log.append(&entry).await {
            error!(
                operation = %entry.operation,
                success = entry.success,
                error = %err,
                "failed to append run log entry"
            );
        }
    }
}

/// Treat a blank label or `"All"` as no tenant filter.
pub fn normalize_tenant(customer_label: Option<&str>) -> Option<&str> {
    customer_label
        .map(str::trim)
        .filter(|label| !label.is_empty() && !label.eq_ignore_ascii_case("all"))
}

fn parse_month(month: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", month.trim()), "%Y-%m-%d").ok()
}

fn first_of_month(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}
