//! SQLite-backed failed export queue.
//!
//! Entries leave the queue only through `remove`, which the orchestration
//! service calls after a successful redelivery.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use payline_core::FailedExportQueue;
use payline_domain::{FailedExport, PaylineError, Result as DomainResult};
use rusqlite::{params, Row};
use tokio::task;
use tracing::warn;

use super::manager::{i64_to_u64, map_join_error, map_sql_error, DbManager};

pub struct SqliteFailedExportQueue {
    db: Arc<DbManager>,
}

impl SqliteFailedExportQueue {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    /// Run a single-row UPDATE/DELETE and report a missing row as not found.
    async fn execute_for_id(&self, sql: &'static str, id: i64) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            let changed = conn.execute(sql, params![id]).map_err(map_sql_error)?;
            if changed == 0 {
                warn!(failed_export_id = id, "failed export not found");
                return Err(PaylineError::NotFound(format!("failed export {id}")));
            }
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl FailedExportQueue for SqliteFailedExportQueue {
    async fn enqueue(&self, payload: &str, failed_at: DateTime<Utc>) -> DomainResult<FailedExport> {
        let db = Arc::clone(&self.db);
        let payload = payload.to_string();

        task::spawn_blocking(move || -> DomainResult<FailedExport> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO failed_exports (payload, failed_at, retry_count) VALUES (?1, ?2, 0)",
                params![payload, failed_at],
            )
            .map_err(map_sql_error)?;

            Ok(FailedExport { id: conn.last_insert_rowid(), payload, failed_at, retry_count: 0 })
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list(&self) -> DomainResult<Vec<FailedExport>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<FailedExport>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(
                    "SELECT id, payload, failed_at, retry_count FROM failed_exports
                     ORDER BY failed_at ASC, id ASC",
                )
                .map_err(map_sql_error)?;
            let rows = stmt.query_map([], map_failed_export_row).map_err(map_sql_error)?;
            rows.collect::<rusqlite::Result<Vec<_>>>().map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn remove(&self, id: i64) -> DomainResult<()> {
        self.execute_for_id("DELETE FROM failed_exports WHERE id = ?1", id).await
    }

    async fn increment_retry(&self, id: i64) -> DomainResult<()> {
        self.execute_for_id(
            "UPDATE failed_exports SET retry_count = retry_count + 1 WHERE id = ?1",
            id,
        )
        .await
    }

    async fn count(&self) -> DomainResult<u64> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<u64> {
            let conn = db.get_connection()?;
            conn.query_row("SELECT COUNT(*) FROM failed_exports", [], |row| row.get::<_, i64>(0))
                .map(i64_to_u64)
                .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn map_failed_export_row(row: &Row<'_>) -> rusqlite::Result<FailedExport> {
    Ok(FailedExport {
        id: row.get(0)?,
        payload: row.get(1)?,
        failed_at: row.get(2)?,
        retry_count: row.get(3)?,
    })
}
