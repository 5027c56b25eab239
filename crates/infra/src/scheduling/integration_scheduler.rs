//! Periodic import/export scheduler.
//!
//! Runs one integration cycle immediately on start, then one per interval
//! until stopped. Every cycle executes in its own spawned task, so a cycle
//! that panics is logged and the loop carries on.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use payline_infra::scheduling::{
//!     IntegrationJob, IntegrationScheduler, IntegrationSchedulerConfig,
//! };
//!
//! # async fn example(job: Arc<dyn IntegrationJob>) -> Result<(), Box<dyn std::error::Error>> {
//! let mut scheduler = IntegrationScheduler::new(job, IntegrationSchedulerConfig::default())?;
//! scheduler.start().await?;
//! // ... application runs ...
//! scheduler.stop().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use payline_core::IntegrationService;
use payline_domain::SchedulerConfig;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

use crate::scheduling::error::{SchedulerError, SchedulerResult};

/// One unit of scheduled integration work.
#[async_trait]
pub trait IntegrationJob: Send + Sync {
    async fn run(&self);
}

#[async_trait]
impl IntegrationJob for IntegrationService {
    /// Import from the time source, then export everything to payroll.
    async fn run(&self) {
        let imported = self.import().await;
        let exported = self.export(None).await;
        info!(
            imported = imported.imported,
            invalid = imported.invalid,
            exported = exported.exported_count,
            failed_queued = exported.failed_queued,
            "integration cycle finished"
        );
    }
}

type TaskHandle = Arc<Mutex<Option<JoinHandle<()>>>>;

#[derive(Debug, Clone)]
pub struct IntegrationSchedulerConfig {
    /// Pause between the end of one cycle and the start of the next.
    pub interval: Duration,
    /// How long `stop` waits for the loop (and a cycle in flight) to finish.
    pub stop_timeout: Duration,
}

impl Default for IntegrationSchedulerConfig {
    fn default() -> Self {
        Self::from(&SchedulerConfig::default())
    }
}

impl From<&SchedulerConfig> for IntegrationSchedulerConfig {
    fn from(config: &SchedulerConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.interval_seconds),
            stop_timeout: Duration::from_secs(30),
        }
    }
}

pub struct IntegrationScheduler {
    job: Arc<dyn IntegrationJob>,
    config: IntegrationSchedulerConfig,
    cancellation_token: CancellationToken,
    task_handle: TaskHandle,
}

impl IntegrationScheduler {
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidConfig`] for a zero interval.
    pub fn new(
        job: Arc<dyn IntegrationJob>,
        config: IntegrationSchedulerConfig,
    ) -> SchedulerResult<Self> {
        if config.interval.is_zero() {
            return Err(SchedulerError::InvalidConfig("interval must be positive".into()));
        }

        Ok(Self {
            job,
            config,
            cancellation_token: CancellationToken::new(),
            task_handle: Arc::new(Mutex::new(None)),
        })
    }

    /// Spawn the background loop.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::AlreadyRunning`] if the loop is active.
    #[instrument(skip(self), fields(interval_secs = self.config.interval.as_secs()))]
    pub async fn start(&mut self) -> SchedulerResult<()> {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }

        // Fresh token so the scheduler can be restarted after a stop.
        self.cancellation_token = CancellationToken::new();

        let job = Arc::clone(&self.job);
        let interval = self.config.interval;
        let cancel = self.cancellation_token.clone();
        let handle = tokio::spawn(async move {
            Self::run_loop(job, interval, cancel).await;
        });

        *self.task_handle.lock().await = Some(handle);
        info!("integration scheduler started");
        Ok(())
    }

    /// Cancel the loop and wait for it to finish.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::NotRunning`] if nothing is running, or
    /// [`SchedulerError::Timeout`] if the loop does not finish in time (the
    /// task is aborted in that case).
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> SchedulerResult<()> {
        if !self.is_running() {
            return Err(SchedulerError::NotRunning);
        }

        self.cancellation_token.cancel();

        if let Some(mut handle) = self.task_handle.lock().await.take() {
            let join_timeout = self.config.stop_timeout;
            match tokio::time::timeout(join_timeout, &mut handle).await {
                Ok(joined) => {
                    joined.map_err(|err| SchedulerError::TaskJoinFailed(err.to_string()))?
                }
                Err(_) => {
                    handle.abort();
                    return Err(SchedulerError::Timeout { seconds: join_timeout.as_secs() });
                }
            }
        }

        info!("integration scheduler stopped");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.task_handle
            .try_lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(|handle| !handle.is_finished()))
            .unwrap_or(false)
    }

    /// Run a single cycle now, outside the loop.
    pub async fn run_cycle(&self) {
        Self::run_isolated(Arc::clone(&self.job)).await;
    }

    async fn run_loop(
        job: Arc<dyn IntegrationJob>,
        interval: Duration,
        cancel: CancellationToken,
    ) {
        loop {
            if cancel.is_cancelled() {
                break;
            }

            Self::run_isolated(Arc::clone(&job)).await;

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("integration loop cancelled");
                    break;
                }
                _ = tokio::time::sleep(interval) => {}
            }
        }
    }

    async fn run_isolated(job: Arc<dyn IntegrationJob>) {
        let started = Instant::now();
        match tokio::spawn(async move { job.run().await }).await {
            Ok(()) => {
                debug!(elapsed_ms = started.elapsed().as_millis() as u64, "integration cycle done");
            }
            Err(err) if err.is_panic() => error!(error = %err, "integration cycle panicked"),
            Err(err) => error!(error = %err, "integration cycle cancelled"),
        }
    }
}
