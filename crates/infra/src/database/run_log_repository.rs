//! SQLite-backed integration run log.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use payline_core::RunLogRepository;
use payline_domain::{NewRunLogEntry, Result as DomainResult, RunLogEntry, RunOperation};
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Row};
use tokio::task;

use super::manager::{i64_to_u64, map_join_error, map_sql_error, usize_to_i64, DbManager};

/// Append-only run log stored in `integration_run_logs`.
pub struct SqliteRunLogRepository {
    db: Arc<DbManager>,
}

impl SqliteRunLogRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    async fn latest_matching(
        &self,
        operation: RunOperation,
        successful_only: bool,
    ) -> DomainResult<Option<RunLogEntry>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Option<RunLogEntry>> {
            let conn = db.get_connection()?;
            conn.query_row(
                LATEST_SQL,
                params![operation.as_str(), successful_only],
                map_run_log_row,
            )
            .optional()
            .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl RunLogRepository for SqliteRunLogRepository {
    async fn append(&self, entry: &NewRunLogEntry) -> DomainResult<RunLogEntry> {
        let db = Arc::clone(&self.db);
        let entry = entry.clone();

        task::spawn_blocking(move || -> DomainResult<RunLogEntry> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO integration_run_logs (run_at, operation, success, message)
                 VALUES (?1, ?2, ?3, ?4)",
                params![entry.run_at, entry.operation.as_str(), entry.success, entry.message],
            )
            .map_err(map_sql_error)?;
            let id = conn.last_insert_rowid();
            Ok(entry.with_id(id))
        })
        .await
        .map_err(map_join_error)?
    }

    async fn recent(&self, limit: usize) -> DomainResult<Vec<RunLogEntry>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let db = Arc::clone(&self.db);
        let limit = usize_to_i64(limit);

        task::spawn_blocking(move || -> DomainResult<Vec<RunLogEntry>> {
            let conn = db.get_connection()?;
            let mut stmt = conn.prepare(RECENT_SQL).map_err(map_sql_error)?;
            let rows = stmt.query_map(params![limit], map_run_log_row).map_err(map_sql_error)?;
            rows.collect::<rusqlite::Result<Vec<_>>>().map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn latest(&self, operation: RunOperation) -> DomainResult<Option<RunLogEntry>> {
        self.latest_matching(operation, false).await
    }

    async fn latest_success(&self, operation: RunOperation) -> DomainResult<Option<RunLogEntry>> {
        self.latest_matching(operation, true).await
    }

    async fn count_failures_since(&self, since: DateTime<Utc>) -> DomainResult<u64> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<u64> {
            let conn = db.get_connection()?;
            conn.query_row(
                "SELECT COUNT(*) FROM integration_run_logs WHERE success = 0 AND run_at >= ?1",
                params![since],
                |row| row.get::<_, i64>(0),
            )
            .map(i64_to_u64)
            .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

const RECENT_SQL: &str = "SELECT id, run_at, operation, success, message
    FROM integration_run_logs
    ORDER BY run_at DESC, id DESC
    LIMIT ?1";

const LATEST_SQL: &str = "SELECT id, run_at, operation, success, message
    FROM integration_run_logs
    WHERE operation = ?1 AND (?2 = 0 OR success = 1)
    ORDER BY run_at DESC, id DESC
    LIMIT 1";

fn map_run_log_row(row: &Row<'_>) -> rusqlite::Result<RunLogEntry> {
    let operation_raw: String = row.get(2)?;
    let operation = operation_raw.parse::<RunOperation>().map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::from(err))
    })?;

    Ok(RunLogEntry {
        id: row.get(0)?,
        run_at: row.get(1)?,
        operation,
        success: row.get(3)?,
        message: row.get(4)?,
    })
}
