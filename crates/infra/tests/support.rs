//! Shared fixtures for infra integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use payline_core::IntegrationService;
use payline_infra::{
    DbManager, HttpClient, HttpTimeSource, SimulatedPayrollSink, SqliteFailedExportQueue,
    SqliteRunLogRepository, SqliteTimeRecordRepository, SystemClock,
};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Temporary database that lives as long as the wrapper.
pub struct TestDatabase {
    pub manager: Arc<DbManager>,
    _temp_dir: TempDir,
}

impl TestDatabase {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let manager = DbManager::new(temp_dir.path().join("payline-test.db"), 4)
            .expect("db manager should be created");
        manager.run_migrations().expect("schema should apply");

        Self { manager: Arc::new(manager), _temp_dir: temp_dir }
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

/// Service wired to SQLite, a mocked user directory and a zero-latency sink.
pub struct Pipeline {
    pub service: IntegrationService,
    pub server: MockServer,
    pub db: TestDatabase,
}

impl Pipeline {
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let db = TestDatabase::new();

        let time_source = HttpTimeSource::new(
            HttpClient::builder().timeout(Duration::from_secs(5)).build().expect("http client"),
            format!("{}/users", server.uri()),
            30,
        );
        let service = IntegrationService::new(
            Arc::new(SqliteTimeRecordRepository::new(Arc::clone(&db.manager))),
            Arc::new(SqliteRunLogRepository::new(Arc::clone(&db.manager))),
            Arc::new(SqliteFailedExportQueue::new(Arc::clone(&db.manager))),
            Arc::new(time_source),
            Arc::new(SimulatedPayrollSink::new(Duration::ZERO, Duration::ZERO)),
            Arc::new(SystemClock),
        );

        Self { service, server, db }
    }

    /// Serve `users` with ids `ids`, all employed by `company`.
    pub async fn serve_users(&self, ids: &[i64], company: &str) {
        let users: Vec<_> =
            ids.iter().map(|id| json!({ "id": id, "company": { "name": company } })).collect();
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "users": users })))
            .mount(&self.server)
            .await;
    }

    pub async fn serve_status(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    pub fn count_rows(&self, table: &str) -> i64 {
        let conn = self.db.manager.get_connection().expect("connection");
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .expect("count")
    }
}
