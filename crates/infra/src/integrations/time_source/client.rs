use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use payline_core::TimeSource;
use payline_domain::constants::{PLACEHOLDER_HOURS_BASE, PLACEHOLDER_HOURS_MODULUS};
use payline_domain::{NewTimeRecord, PaylineError, Result, TimeSourceConfig};
use reqwest::Method;
use tracing::{debug, info, instrument};

use super::types::{UpstreamUser, UserListResponse};
use crate::errors::InfraError;
use crate::http::HttpClient;

/// Time source that maps users of a remote directory to time records.
pub struct HttpTimeSource {
    http_client: HttpClient,
    url: String,
    batch_size: usize,
}

impl HttpTimeSource {
    pub fn new(http_client: HttpClient, url: impl Into<String>, batch_size: usize) -> Self {
        Self { http_client, url: url.into(), batch_size }
    }

    /// Build the HTTP client and source from configuration.
    pub fn from_config(config: &TimeSourceConfig) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.max(1)))
            .build()?;
        Ok(Self::new(http_client, config.url.clone(), config.batch_size))
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl TimeSource for HttpTimeSource {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self, today: NaiveDate) -> Result<Vec<NewTimeRecord>> {
        let response =
            self.http_client.send(self.http_client.request(Method::GET, &self.url)).await?;
        let response = response.error_for_status().map_err(into_payline)?;
        let body: UserListResponse = response.json().await.map_err(into_payline)?;

        let records: Vec<NewTimeRecord> = body
            .users
            .iter()
            .take(self.batch_size)
            .map(|user| map_user(user, today))
            .collect();

        debug!(received = body.users.len(), mapped = records.len(), "mapped upstream users");
        info!(count = records.len(), "fetched time records");
        Ok(records)
    }

    fn mapping_description(&self) -> String {
        format!(
            "Up to {} users from {} become one record each, dated the import day. \
             worker_id = user id, hours = (id mod {}) + {}, source = API, \
             customer = company name (or \"Demo customer\").",
            self.batch_size, self.url, PLACEHOLDER_HOURS_MODULUS, PLACEHOLDER_HOURS_BASE
        )
    }
}

fn map_user(user: &UpstreamUser, today: NaiveDate) -> NewTimeRecord {
    let hours = (user.id % PLACEHOLDER_HOURS_MODULUS) + PLACEHOLDER_HOURS_BASE;
    NewTimeRecord::external(user.id, today, hours as f64, user.company_name())
}

fn into_payline(err: reqwest::Error) -> PaylineError {
    PaylineError::from(InfraError::from(err))
}
