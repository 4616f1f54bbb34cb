use std::fs::OpenOptions;

use anyhow::{anyhow, Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Send tracing output to the configured log file.
///
/// The returned guard flushes pending lines when dropped and must outlive the app.
pub fn init(config: &Config) -> Result<WorkerGuard> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("failed to open log file {}", config.log_file.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = EnvFilter::try_new(directive(config, rust_log.as_deref()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))?;

    Ok(guard)
}

/// Pick the filter: `--log-level`, then RUST_LOG, then LOG_LEVEL or its default.
fn directive<'a>(config: &'a Config, rust_log: Option<&'a str>) -> &'a str {
    config
        .log_level_override
        .as_deref()
        .or(rust_log.filter(|value| !value.trim().is_empty()))
        .unwrap_or(config.log_level.as_str())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn config(log_level: &str, log_level_override: Option<&str>) -> Config {
        Config {
            database_url: "sqlite://clients.db".to_string(),
            log_file: PathBuf::from("client_dashboard.log"),
            log_level: log_level.to_string(),
            log_level_override: log_level_override.map(str::to_string),
        }
    }

    #[test]
    fn cli_level_beats_rust_log() {
        assert_eq!(directive(&config("info", Some("debug")), Some("warn")), "debug");
    }

    #[test]
    fn rust_log_beats_configured_level() {
        assert_eq!(directive(&config("info", None), Some("warn")), "warn");
    }

    #[test]
    fn configured_level_is_the_fallback() {
        assert_eq!(directive(&config("info", None), None), "info");
        assert_eq!(directive(&config("info", None), Some("  ")), "info");
    }
}
