//! Configuration management

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_SCHEDULER_INTERVAL_SECS, DEFAULT_SINK_LATENCY_MS, DEFAULT_SINK_RETRY_LATENCY_MS,
    MAX_IMPORT_BATCH,
};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub time_source: TimeSourceConfig,
    pub sink: SinkConfig,
    pub scheduler: SchedulerConfig,
    pub logging: LoggingConfig,
}

/// Database configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: "payline.db".to_string(), pool_size: 4 }
    }
}

/// External time source configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeSourceConfig {
    pub url: String,
    pub timeout_seconds: u64,
    /// Maximum number of users mapped per import.
    pub batch_size: usize,
}

impl Default for TimeSourceConfig {
    fn default() -> Self {
        Self {
            url: "https://dummyjson.com/users".to_string(),
            timeout_seconds: 15,
            batch_size: MAX_IMPORT_BATCH,
        }
    }
}

/// Simulated payroll sink configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    pub latency_ms: u64,
    pub retry_latency_ms: u64,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            latency_ms: DEFAULT_SINK_LATENCY_MS,
            retry_latency_ms: DEFAULT_SINK_RETRY_LATENCY_MS,
        }
    }
}

/// Background scheduler configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub interval_seconds: u64,
    pub enabled: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { interval_seconds: DEFAULT_SCHEDULER_INTERVAL_SECS, enabled: true }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Fallback filter directive when `RUST_LOG` is unset.
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}
