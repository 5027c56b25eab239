//! Configuration loader
//!
//! ## Loading Strategy
//! 1. `.env` is read into the process environment (if present)
//! 2. Environment variables (`PAYLINE_*`) are tried first
//! 3. Otherwise a `config.toml` / `config.json` file is probed
//! 4. With neither, built-in defaults apply
//!
//! ## Environment Variables
//! `PAYLINE_DB_PATH` is the trigger: when it is set, configuration comes from
//! the environment and every other variable is optional.
//! - `PAYLINE_DB_PATH`, `PAYLINE_DB_POOL_SIZE`
//! - `PAYLINE_TIME_SOURCE_URL`, `PAYLINE_TIME_SOURCE_TIMEOUT`,
//!   `PAYLINE_TIME_SOURCE_BATCH_SIZE`
//! - `PAYLINE_SINK_LATENCY_MS`, `PAYLINE_SINK_RETRY_LATENCY_MS`
//! - `PAYLINE_SCHEDULER_INTERVAL`, `PAYLINE_SCHEDULER_ENABLED`
//! - `PAYLINE_LOG_LEVEL`, `PAYLINE_LOG_JSON`
//!
//! ## File Locations
//! Probed in order: the working directory (`config.*`, `payline.*`), its
//! parent and grandparent, then the same set next to the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use payline_domain::{Config, PaylineError, Result};

const CONFIG_FILE_NAMES: [&str; 4] = ["config.toml", "config.json", "payline.toml", "payline.json"];

/// Load configuration: environment first, then a config file, then defaults.
///
/// # Errors
/// Returns `PaylineError::Config` when a variable or file is present but
/// invalid. Missing sources are not errors.
pub fn load() -> Result<Config> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "loaded .env file");
    }

    match load_from_env() {
        Ok(config) => {
            tracing::info!("configuration loaded from environment variables");
            Ok(config)
        }
        Err(PaylineError::NotFound(_)) => match probe_config_paths() {
            Some(path) => load_from_file(Some(path)),
            None => {
                tracing::info!("no configuration found, using defaults");
                Ok(Config::default())
            }
        },
        Err(err) => Err(err),
    }
}

/// Build configuration from `PAYLINE_*` variables over defaults.
///
/// # Errors
/// `PaylineError::NotFound` if `PAYLINE_DB_PATH` is unset,
/// `PaylineError::Config` if any variable fails to parse.
pub fn load_from_env() -> Result<Config> {
    let db_path = std::env::var("PAYLINE_DB_PATH").map_err(|_| {
        PaylineError::NotFound("environment variable PAYLINE_DB_PATH".to_string())
    })?;

    let mut config = Config::default();
    config.database.path = db_path;

    if let Some(pool_size) = env_parse("PAYLINE_DB_POOL_SIZE")? {
        config.database.pool_size = pool_size;
    }
    if let Some(url) = env_var("PAYLINE_TIME_SOURCE_URL") {
        config.time_source.url = url;
    }
    if let Some(timeout) = env_parse("PAYLINE_TIME_SOURCE_TIMEOUT")? {
        config.time_source.timeout_seconds = timeout;
    }
    if let Some(batch_size) = env_parse("PAYLINE_TIME_SOURCE_BATCH_SIZE")? {
        config.time_source.batch_size = batch_size;
    }
    if let Some(latency) = env_parse("PAYLINE_SINK_LATENCY_MS")? {
        config.sink.latency_ms = latency;
    }
    if let Some(latency) = env_parse("PAYLINE_SINK_RETRY_LATENCY_MS")? {
        config.sink.retry_latency_ms = latency;
    }
    if let Some(interval) = env_parse("PAYLINE_SCHEDULER_INTERVAL")? {
        config.scheduler.interval_seconds = interval;
    }
    config.scheduler.enabled = env_bool("PAYLINE_SCHEDULER_ENABLED", config.scheduler.enabled);
    if let Some(level) = env_var("PAYLINE_LOG_LEVEL") {
        config.logging.level = level;
    }
    config.logging.json = env_bool("PAYLINE_LOG_JSON", config.logging.json);

    Ok(config)
}

/// Load configuration from a file.
///
/// If `path` is `None`, probes the standard locations.
///
/// # Errors
/// Returns `PaylineError::Config` if the file is missing, unreadable or
/// malformed.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(PaylineError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            PaylineError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| PaylineError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| PaylineError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| PaylineError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(PaylineError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// First existing config file among the standard locations.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd.clone());
        roots.push(cwd.join(".."));
        roots.push(cwd.join("../.."));
    }

    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf))
    {
        roots.push(exe_dir.clone());
        roots.push(exe_dir.join(".."));
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.is_file())
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_var(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| PaylineError::Config(format!("Invalid value for {key}: {e}")))
        })
        .transpose()
}

/// Accepts `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive).
fn env_bool(key: &str, default: bool) -> bool {
    env_var(key)
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
