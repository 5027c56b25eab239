//! Application context - dependency injection container

use std::sync::Arc;

use payline_core::{
    Clock, FailedExportQueue, IntegrationService, PayrollSink, RunLogRepository,
    TimeRecordRepository, TimeSource,
};
use payline_domain::{Config, Result};
use payline_infra::scheduling::SchedulerResult;
use payline_infra::{
    DbManager, HttpTimeSource, IntegrationJob, IntegrationScheduler, IntegrationSchedulerConfig,
    SimulatedPayrollSink, SqliteFailedExportQueue, SqliteRunLogRepository,
    SqliteTimeRecordRepository, SystemClock,
};

type DynTimeRecordRepository = dyn TimeRecordRepository + Send + Sync + 'static;
type DynRunLogRepository = dyn RunLogRepository + Send + Sync + 'static;
type DynFailedExportQueue = dyn FailedExportQueue + Send + Sync + 'static;

/// Holds the configuration, the database and every wired service.
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub records: Arc<DynTimeRecordRepository>,
    pub run_log: Arc<DynRunLogRepository>,
    pub failed_exports: Arc<DynFailedExportQueue>,
    pub integration: Arc<IntegrationService>,
}

impl AppContext {
    /// Open the database, apply the schema and wire the integration service.
    pub fn new(config: Config) -> Result<Self> {
        let db = Arc::new(DbManager::from_config(&config.database)?);
        db.run_migrations()?;
        db.health_check()?;

        let records: Arc<DynTimeRecordRepository> =
            Arc::new(SqliteTimeRecordRepository::new(Arc::clone(&db)));
        let run_log: Arc<DynRunLogRepository> =
            Arc::new(SqliteRunLogRepository::new(Arc::clone(&db)));
        let failed_exports: Arc<DynFailedExportQueue> =
            Arc::new(SqliteFailedExportQueue::new(Arc::clone(&db)));

        let time_source: Arc<dyn TimeSource> =
            Arc::new(HttpTimeSource::from_config(&config.time_source)?);
        let sink: Arc<dyn PayrollSink> = Arc::new(SimulatedPayrollSink::from_config(&config.sink));
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let integration = Arc::new(IntegrationService::new(
            Arc::<DynTimeRecordRepository>::clone(&records),
            Arc::<DynRunLogRepository>::clone(&run_log),
            Arc::<DynFailedExportQueue>::clone(&failed_exports),
            time_source,
            sink,
            clock,
        ));

        tracing::info!(
            db_path = %db.path().display(),
            time_source = %config.time_source.url,
            "application context ready"
        );

        Ok(Self { config, db, records, run_log, failed_exports, integration })
    }

    /// Scheduler driving the integration service at the configured interval.
    ///
    /// The scheduler is returned stopped.
    pub fn scheduler(&self) -> SchedulerResult<IntegrationScheduler> {
        let job: Arc<dyn IntegrationJob> = self.integration.clone();
        IntegrationScheduler::new(job, IntegrationSchedulerConfig::from(&self.config.scheduler))
    }
}
