//! SQLite-backed implementation of the time record repository port.

use std::sync::Arc;

use async_trait::async_trait;
use payline_core::TimeRecordRepository;
use payline_domain::{
    DailyHoursQuery, DayHours, NewTimeRecord, RecordSource, Result as DomainResult, TimeRecord,
    WorkerHours,
};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use tokio::task;
use tracing::debug;

use super::manager::{i64_to_u64, map_join_error, map_sql_error, DbManager};

pub struct SqliteTimeRecordRepository {
    db: Arc<DbManager>,
}

impl SqliteTimeRecordRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    fn insert_row(conn: &Connection, record: &NewTimeRecord) -> rusqlite::Result<i64> {
        conn.execute(
            INSERT_SQL,
            params![
                record.worker_id,
                record.date,
                record.hours,
                record.source.as_str(),
                record.customer_label,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    async fn with_connection<T, F>(&self, f: F) -> DomainResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> DomainResult<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> DomainResult<T> {
            let mut conn = db.get_connection()?;
            f(&mut conn)
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl TimeRecordRepository for SqliteTimeRecordRepository {
    async fn insert_batch(&self, records: &[NewTimeRecord]) -> DomainResult<usize> {
        let records = records.to_vec();

        self.with_connection(move |conn| {
            let tx = conn.transaction().map_err(map_sql_error)?;
            for record in &records {
                Self::insert_row(&tx, record).map_err(map_sql_error)?;
            }
            tx.commit().map_err(map_sql_error)?;
            debug!(inserted = records.len(), "time record batch committed");
            Ok(records.len())
        })
        .await
    }

    async fn insert(&self, record: &NewTimeRecord) -> DomainResult<TimeRecord> {
        let record = record.clone();

        self.with_connection(move |conn| {
            let id = Self::insert_row(conn, &record).map_err(map_sql_error)?;
            Ok(record.with_id(id))
        })
        .await
    }

    async fn hours_by_worker(&self, customer_label: Option<&str>) -> DomainResult<Vec<WorkerHours>> {
        let customer_label = customer_label.map(str::to_string);

        self.with_connection(move |conn| {
            let mut stmt = conn.prepare(HOURS_BY_WORKER_SQL).map_err(map_sql_error)?;
            let rows = stmt
                .query_map(params![customer_label], |row| {
                    Ok(WorkerHours {
                        worker_id: row.get(0)?,
                        total_hours: row.get(1)?,
                        customer_label: row.get(2)?,
                    })
                })
                .map_err(map_sql_error)?;
            rows.collect::<rusqlite::Result<Vec<_>>>().map_err(map_sql_error)
        })
        .await
    }

    async fn find_by_worker(&self, worker_id: i64) -> DomainResult<Vec<TimeRecord>> {
        self.with_connection(move |conn| {
            let mut stmt = conn.prepare(FIND_BY_WORKER_SQL).map_err(map_sql_error)?;
            let rows =
                stmt.query_map(params![worker_id], map_time_record_row).map_err(map_sql_error)?;
            rows.collect::<rusqlite::Result<Vec<_>>>().map_err(map_sql_error)
        })
        .await
    }

    async fn daily_hours(&self, query: &DailyHoursQuery) -> DomainResult<Vec<DayHours>> {
        let query = query.clone();

        self.with_connection(move |conn| {
            let mut stmt = conn.prepare(DAILY_HOURS_SQL).map_err(map_sql_error)?;
            let rows = stmt
                .query_map(
                    params![query.from, query.to, query.worker_id, query.customer_label],
                    |row| Ok(DayHours { date: row.get(0)?, total_hours: row.get(1)? }),
                )
                .map_err(map_sql_error)?;
            rows.collect::<rusqlite::Result<Vec<_>>>().map_err(map_sql_error)
        })
        .await
    }

    async fn count(&self) -> DomainResult<u64> {
        self.with_connection(|conn| {
            conn.query_row("SELECT COUNT(*) FROM time_records", [], |row| row.get::<_, i64>(0))
                .map(i64_to_u64)
                .map_err(map_sql_error)
        })
        .await
    }

    async fn customer_labels(&self) -> DomainResult<Vec<String>> {
        self.with_connection(|conn| {
            let mut stmt = conn
                .prepare("SELECT DISTINCT customer_label FROM time_records ORDER BY customer_label")
                .map_err(map_sql_error)?;
            let rows = stmt.query_map([], |row| row.get(0)).map_err(map_sql_error)?;
            rows.collect::<rusqlite::Result<Vec<String>>>().map_err(map_sql_error)
        })
        .await
    }
}

const INSERT_SQL: &str = "INSERT INTO time_records (worker_id, date, hours, source, customer_label)
    VALUES (?1, ?2, ?3, ?4, ?5)";

const HOURS_BY_WORKER_SQL: &str = "SELECT
        worker_id,
        SUM(hours),
        CASE WHEN COUNT(DISTINCT customer_label) = 1 THEN MIN(customer_label) END
    FROM time_records
    WHERE ?1 IS NULL OR customer_label = ?1
    GROUP BY worker_id
    ORDER BY worker_id";

const FIND_BY_WORKER_SQL: &str = "SELECT id, worker_id, date, hours, source, customer_label
    FROM time_records
    WHERE worker_id = ?1
    ORDER BY date ASC, id ASC";

const DAILY_HOURS_SQL: &str = "SELECT date, SUM(hours)
    FROM time_records
    WHERE (?1 IS NULL OR date >= ?1)
      AND (?2 IS NULL OR date <= ?2)
      AND (?3 IS NULL OR worker_id = ?3)
      AND (?4 IS NULL OR customer_label = ?4)
    GROUP BY date
    ORDER BY date ASC";

fn map_time_record_row(row: &Row<'_>) -> rusqlite::Result<TimeRecord> {
    let source_raw: String = row.get(4)?;
    let source = source_raw.parse::<RecordSource>().map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::from(err))
    })?;

    Ok(TimeRecord {
        id: row.get(0)?,
        worker_id: row.get(1)?,
        date: row.get(2)?,
        hours: row.get(3)?,
        source,
        customer_label: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use payline_domain::PaylineError;
    use tempfile::TempDir;

    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn record(worker_id: i64, date: NaiveDate, hours: f64, label: &str) -> NewTimeRecord {
        NewTimeRecord::external(worker_id, date, hours, Some(label.to_string()))
    }

    async fn setup_repository() -> (SqliteTimeRecordRepository, Arc<DbManager>, TempDir) {
        let temp_dir = TempDir::new().expect("temp dir created");
        let manager = DbManager::new(temp_dir.path().join("test.db"), 2).expect("manager created");
        manager.run_migrations().expect("migrations applied");
        let manager = Arc::new(manager);
        let repo = SqliteTimeRecordRepository::new(Arc::clone(&manager));
        (repo, manager, temp_dir)
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn insert_batch_and_sum_per_worker() {
        let (repo, _manager, _temp_dir) = setup_repository().await;

        let inserted = repo
            .insert_batch(&[
                record(7, day(1), 6.0, "Acme AS"),
                record(7, day(2), 7.0, "Acme AS"),
                record(7, day(3), 8.0, "Acme AS"),
                record(2, day(3), 4.5, "Globex"),
            ])
            .await
            .expect("batch inserted");
        assert_eq!(inserted, 4);

        let hours = repo.hours_by_worker(None).await.expect("grouped");
        assert_eq!(hours.len(), 2);
        assert_eq!(hours[0].worker_id, 2);
        assert_eq!(hours[1].worker_id, 7);
        assert!((hours[1].total_hours - 21.0).abs() < f64::EPSILON);
        assert_eq!(hours[1].customer_label.as_deref(), Some("Acme AS"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn mixed_labels_group_without_label() {
        let (repo, _manager, _temp_dir) = setup_repository().await;
        repo.insert_batch(&[record(1, day(1), 2.0, "Acme AS"), record(1, day(2), 3.0, "Globex")])
            .await
            .expect("batch inserted");

        let all = repo.hours_by_worker(None).await.expect("grouped");
        assert_eq!(all[0].customer_label, None);

        let globex = repo.hours_by_worker(Some("Globex")).await.expect("grouped");
        assert_eq!(globex.len(), 1);
        assert!((globex[0].total_hours - 3.0).abs() < f64::EPSILON);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn batch_is_atomic() {
        let (repo, _manager, _temp_dir) = setup_repository().await;

        let result = repo
            .insert_batch(&[record(1, day(1), 8.0, "Acme AS"), record(2, day(1), 99.0, "Acme AS")])
            .await;

        assert!(matches!(result, Err(PaylineError::InvalidInput(_))));
        assert_eq!(repo.count().await.expect("count"), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn insert_returns_identifier_and_round_trips() {
        let (repo, _manager, _temp_dir) = setup_repository().await;
        let manual = NewTimeRecord {
            worker_id: 3,
            date: day(10),
            hours: 7.25,
            source: RecordSource::Manual,
            customer_label: "Manual entry".into(),
        };

        let stored = repo.insert(&manual).await.expect("inserted");
        assert!(stored.id > 0);

        let found = repo.find_by_worker(3).await.expect("found");
        assert_eq!(found, vec![stored]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn find_by_worker_orders_by_date() {
        let (repo, _manager, _temp_dir) = setup_repository().await;
        repo.insert_batch(&[
            record(4, day(9), 1.0, "a"),
            record(4, day(2), 2.0, "a"),
            record(5, day(1), 3.0, "a"),
        ])
        .await
        .expect("batch inserted");

        let dates: Vec<NaiveDate> =
            repo.find_by_worker(4).await.expect("found").into_iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day(2), day(9)]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn daily_hours_respects_all_filters() {
        let (repo, _manager, _temp_dir) = setup_repository().await;
        repo.insert_batch(&[
            record(1, day(1), 1.0, "Acme AS"),
            record(1, day(2), 2.0, "Acme AS"),
            record(2, day(2), 4.0, "Globex"),
            record(1, day(5), 8.0, "Acme AS"),
        ])
        .await
        .expect("batch inserted");

        let range = DailyHoursQuery { from: Some(day(2)), to: Some(day(4)), ..Default::default() };
        let days = repo.daily_hours(&range).await.expect("daily");
        assert_eq!(days, vec![DayHours { date: day(2), total_hours: 6.0 }]);

        let worker = DailyHoursQuery { worker_id: Some(1), ..Default::default() };
        assert_eq!(repo.daily_hours(&worker).await.expect("daily").len(), 3);

        let tenant =
            DailyHoursQuery { customer_label: Some("Globex".into()), ..Default::default() };
        let days = repo.daily_hours(&tenant).await.expect("daily");
        assert_eq!(days, vec![DayHours { date: day(2), total_hours: 4.0 }]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn customer_labels_are_distinct_and_sorted() {
        let (repo, _manager, _temp_dir) = setup_repository().await;
        repo.insert_batch(&[
            record(1, day(1), 1.0, "Globex"),
            record(2, day(1), 1.0, "Acme AS"),
            record(3, day(1), 1.0, "Globex"),
        ])
        .await
        .expect("batch inserted");

        assert_eq!(repo.customer_labels().await.expect("labels"), vec!["Acme AS", "Globex"]);
    }
}
