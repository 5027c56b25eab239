//! In-memory port implementations for testing
//!
//! Each double keeps its state behind a `Mutex` so tests can inspect what the
//! service wrote and inject failures between calls.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use payline_core::{
    Clock, FailedExportQueue, PayrollSink, RunLogRepository, TimeRecordRepository, TimeSource,
};
use payline_domain::{
    DailyHoursQuery, DayHours, FailedExport, NewRunLogEntry, NewTimeRecord, PaylineError,
    PayrollSummary, Result as DomainResult, RunLogEntry, RunOperation, TimeRecord, WorkerHours,
};

/// In-memory mock for `TimeRecordRepository`.
#[derive(Default)]
pub struct InMemoryTimeRecords {
    rows: Mutex<Vec<TimeRecord>>,
    fail_writes: AtomicBool,
}

impl InMemoryTimeRecords {
    pub fn seed(&self, records: &[NewTimeRecord]) {
        let mut rows = self.rows.lock().unwrap();
        for record in records {
            let id = rows.len() as i64 + 1;
            rows.push(record.clone().with_id(id));
        }
    }

    /// Make every subsequent write fail with a database error.
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    pub fn all(&self) -> Vec<TimeRecord> {
        self.rows.lock().unwrap().clone()
    }

    fn check_writable(&self) -> DomainResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PaylineError::Database("disk I/O error".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl TimeRecordRepository for InMemoryTimeRecords {
    async fn insert_batch(&self, records: &[NewTimeRecord]) -> DomainResult<usize> {
        self.check_writable()?;
        self.seed(records);
        Ok(records.len())
    }

    async fn insert(&self, record: &NewTimeRecord) -> DomainResult<TimeRecord> {
        self.check_writable()?;
        let mut rows = self.rows.lock().unwrap();
        let stored = record.clone().with_id(rows.len() as i64 + 1);
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn hours_by_worker(&self, customer_label: Option<&str>) -> DomainResult<Vec<WorkerHours>> {
        let rows = self.rows.lock().unwrap();
        let mut grouped: BTreeMap<i64, (f64, HashSet<String>)> = BTreeMap::new();
        for row in rows.iter().filter(|r| customer_label.map_or(true, |l| r.customer_label == l)) {
            let entry = grouped.entry(row.worker_id).or_default();
            entry.0 += row.hours;
            entry.1.insert(row.customer_label.clone());
        }

        Ok(grouped
            .into_iter()
            .map(|(worker_id, (total_hours, labels))| WorkerHours {
                worker_id,
                total_hours,
                customer_label: if labels.len() == 1 { labels.into_iter().next() } else { None },
            })
            .collect())
    }

    async fn find_by_worker(&self, worker_id: i64) -> DomainResult<Vec<TimeRecord>> {
        let mut found: Vec<TimeRecord> =
            self.all().into_iter().filter(|r| r.worker_id == worker_id).collect();
        found.sort_by_key(|r| (r.date, r.id));
        Ok(found)
    }

    async fn daily_hours(&self, query: &DailyHoursQuery) -> DomainResult<Vec<DayHours>> {
        let mut grouped: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for row in self.all() {
            if query.from.is_some_and(|from| row.date < from)
                || query.to.is_some_and(|to| row.date > to)
                || query.worker_id.is_some_and(|id| row.worker_id != id)
                || query.customer_label.as_ref().is_some_and(|l| &row.customer_label != l)
            {
                continue;
            }
            *grouped.entry(row.date).or_default() += row.hours;
        }

        Ok(grouped.into_iter().map(|(date, total_hours)| DayHours { date, total_hours }).collect())
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.rows.lock().unwrap().len() as u64)
    }

    async fn customer_labels(&self) -> DomainResult<Vec<String>> {
        let mut labels: Vec<String> = self.all().into_iter().map(|r| r.customer_label).collect();
        labels.sort();
        labels.dedup();
        Ok(labels)
    }
}

/// In-memory mock for `RunLogRepository`.
#[derive(Default)]
pub struct InMemoryRunLog {
    entries: Mutex<Vec<RunLogEntry>>,
}

impl InMemoryRunLog {
    pub fn all(&self) -> Vec<RunLogEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn of(&self, operation: RunOperation) -> Vec<RunLogEntry> {
        self.all().into_iter().filter(|e| e.operation == operation).collect()
    }

    /// Append an entry directly, bypassing the service.
    pub fn push(&self, operation: RunOperation, success: bool, run_at: DateTime<Utc>, message: &str) {
        let mut entries = self.entries.lock().unwrap();
        let id = entries.len() as i64 + 1;
        entries.push(RunLogEntry {
            id,
            run_at,
            operation,
            success,
            message: Some(message.to_string()),
        });
    }

    fn newest_first(&self) -> Vec<RunLogEntry> {
        let mut entries = self.all();
        entries.sort_by(|a, b| b.run_at.cmp(&a.run_at).then(b.id.cmp(&a.id)));
        entries
    }
}

#[async_trait]
impl RunLogRepository for InMemoryRunLog {
    async fn append(&self, entry: &NewRunLogEntry) -> DomainResult<RunLogEntry> {
        let mut entries = self.entries.lock().unwrap();
        let stored = entry.clone().with_id(entries.len() as i64 + 1);
        entries.push(stored.clone());
        Ok(stored)
    }

    async fn recent(&self, limit: usize) -> DomainResult<Vec<RunLogEntry>> {
        Ok(self.newest_first().into_iter().take(limit).collect())
    }

    async fn latest(&self, operation: RunOperation) -> DomainResult<Option<RunLogEntry>> {
        Ok(self.newest_first().into_iter().find(|e| e.operation == operation))
    }

    async fn latest_success(&self, operation: RunOperation) -> DomainResult<Option<RunLogEntry>> {
        Ok(self.newest_first().into_iter().find(|e| e.operation == operation && e.success))
    }

    async fn count_failures_since(&self, since: DateTime<Utc>) -> DomainResult<u64> {
        Ok(self.all().iter().filter(|e| !e.success && e.run_at >= since).count() as u64)
    }
}

/// In-memory mock for `FailedExportQueue`.
#[derive(Default)]
pub struct InMemoryFailedExports {
    entries: Mutex<Vec<FailedExport>>,
    next_id: Mutex<i64>,
}

impl InMemoryFailedExports {
    pub fn all(&self) -> Vec<FailedExport> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl FailedExportQueue for InMemoryFailedExports {
    async fn enqueue(&self, payload: &str, failed_at: DateTime<Utc>) -> DomainResult<FailedExport> {
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let entry =
            FailedExport { id: *next_id, payload: payload.to_string(), failed_at, retry_count: 0 };
        self.entries.lock().unwrap().push(entry.clone());
        Ok(entry)
    }

    async fn list(&self) -> DomainResult<Vec<FailedExport>> {
        Ok(self.all())
    }

    async fn remove(&self, id: i64) -> DomainResult<()> {
        self.entries.lock().unwrap().retain(|e| e.id != id);
        Ok(())
    }

    async fn increment_retry(&self, id: i64) -> DomainResult<()> {
        let mut entries = self.entries.lock().unwrap();
        let entry = entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| PaylineError::NotFound(format!("failed export {id}")))?;
        entry.retry_count += 1;
        Ok(())
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.entries.lock().unwrap().len() as u64)
    }
}

/// Time source returning a canned response on every call.
pub struct StubTimeSource {
    response: DomainResult<Vec<NewTimeRecord>>,
}

impl StubTimeSource {
    pub fn returning(records: Vec<NewTimeRecord>) -> Self {
        Self { response: Ok(records) }
    }

    pub fn failing(message: &str) -> Self {
        Self { response: Err(PaylineError::Network(message.to_string())) }
    }
}

#[async_trait]
impl TimeSource for StubTimeSource {
    async fn fetch(&self, _today: NaiveDate) -> DomainResult<Vec<NewTimeRecord>> {
        self.response.clone()
    }

    fn mapping_description(&self) -> String {
        "stub mapping".to_string()
    }
}

/// Sink that records deliveries and fails on demand.
#[derive(Default)]
pub struct RecordingSink {
    delivered: Mutex<Vec<Vec<PayrollSummary>>>,
    redelivered: Mutex<Vec<i64>>,
    fail_delivery: Mutex<Option<String>>,
    failing_redeliveries: Mutex<HashSet<i64>>,
}

impl RecordingSink {
    pub fn fail_delivery_with(&self, message: &str) {
        *self.fail_delivery.lock().unwrap() = Some(message.to_string());
    }

    pub fn fail_redelivery_of(&self, id: i64) {
        self.failing_redeliveries.lock().unwrap().insert(id);
    }

    pub fn delivered(&self) -> Vec<Vec<PayrollSummary>> {
        self.delivered.lock().unwrap().clone()
    }

    pub fn redelivered(&self) -> Vec<i64> {
        self.redelivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl PayrollSink for RecordingSink {
    async fn deliver(&self, summaries: &[PayrollSummary]) -> DomainResult<()> {
        if let Some(message) = self.fail_delivery.lock().unwrap().clone() {
            return Err(PaylineError::Network(message));
        }
        self.delivered.lock().unwrap().push(summaries.to_vec());
        Ok(())
    }

    async fn redeliver(&self, entry: &FailedExport) -> DomainResult<()> {
        if self.failing_redeliveries.lock().unwrap().contains(&entry.id) {
            return Err(PaylineError::Network(format!("sink rejected payload {}", entry.id)));
        }
        self.redelivered.lock().unwrap().push(entry.id);
        Ok(())
    }
}

/// Clock frozen at a given instant; tests move it explicitly.
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(now) }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
