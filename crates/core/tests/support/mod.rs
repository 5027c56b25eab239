//! Shared test helpers for `payline-core` integration tests.
//!
//! In-memory implementations of every port plus a [`Harness`] that wires
//! them into an [`IntegrationService`], so scenario tests can focus on
//! behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod doubles;

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use payline_core::IntegrationService;
use payline_domain::{NewTimeRecord, RecordSource};

pub use doubles::{
    FixedClock, InMemoryFailedExports, InMemoryRunLog, InMemoryTimeRecords, RecordingSink,
    StubTimeSource,
};

/// 14 March 2025, 12:00 UTC.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap()
}

pub fn fixed_today() -> NaiveDate {
    fixed_now().date_naive()
}

pub fn external(worker_id: i64, date: NaiveDate, hours: f64) -> NewTimeRecord {
    NewTimeRecord::external(worker_id, date, hours, None)
}

pub fn manual(worker_id: i64, date: NaiveDate, hours: f64, label: &str) -> NewTimeRecord {
    NewTimeRecord {
        worker_id,
        date,
        hours,
        source: RecordSource::Manual,
        customer_label: label.to_string(),
    }
}

/// Service under test together with handles to its collaborators.
pub struct Harness {
    pub service: IntegrationService,
    pub records: Arc<InMemoryTimeRecords>,
    pub run_log: Arc<InMemoryRunLog>,
    pub failed_exports: Arc<InMemoryFailedExports>,
    pub time_source: Arc<StubTimeSource>,
    pub sink: Arc<RecordingSink>,
    pub clock: Arc<FixedClock>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_time_source(StubTimeSource::returning(Vec::new()))
    }

    pub fn with_time_source(time_source: StubTimeSource) -> Self {
        let records = Arc::new(InMemoryTimeRecords::default());
        let run_log = Arc::new(InMemoryRunLog::default());
        let failed_exports = Arc::new(InMemoryFailedExports::default());
        let time_source = Arc::new(time_source);
        let sink = Arc::new(RecordingSink::default());
        let clock = Arc::new(FixedClock::new(fixed_now()));

        let service = IntegrationService::new(
            records.clone(),
            run_log.clone(),
            failed_exports.clone(),
            time_source.clone(),
            sink.clone(),
            clock.clone(),
        );

        Self { service, records, run_log, failed_exports, time_source, sink, clock }
    }
}
