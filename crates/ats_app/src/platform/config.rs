use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use ats_engine::{GatewaySettings, SeedSettings};
use ats_logging::{LevelFilter, LogDestination, DEFAULT_LOG_FILE};
use serde::{Deserialize, Serialize};

pub(crate) const DEFAULT_CONFIG_FILE: &str = "ats.ron";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum LogTarget {
    File,
    Terminal,
    Both,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct LogConfig {
    pub target: LogTarget,
    pub file: PathBuf,
    /// `off`, `error`, `warn`, `info`, `debug` or `trace`.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            target: LogTarget::File,
            file: PathBuf::from(DEFAULT_LOG_FILE),
            level: "info".to_string(),
        }
    }
}

impl LogConfig {
    pub fn destination(&self) -> LogDestination {
        match self.target {
            LogTarget::File => LogDestination::File(self.file.clone()),
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both(self.file.clone()),
        }
    }

    /// Unknown level names fall back to `info`.
    pub fn level_filter(&self) -> LevelFilter {
        self.level.trim().parse().unwrap_or(LevelFilter::Info)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    /// Where the store snapshot lives.
    pub data_dir: PathBuf,
    /// Seeds both data generation and fault injection. `None` draws from OS entropy.
    pub seed: Option<u64>,
    pub seed_data: SeedSettings,
    pub gateway: GatewaySettings,
    /// Base URL of an HTTP backend for job reordering. `None` uses the local gateway.
    ///
    /// Meant for exercising a reorder service. Jobs are still listed from and
    /// saved to the local store, so orders accepted remotely are not kept
    /// locally and the next reload shows the local order again.
    pub reorder_endpoint: Option<String>,
    pub tick_ms: u64,
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            seed: None,
            seed_data: SeedSettings::default(),
            gateway: GatewaySettings::default(),
            reorder_endpoint: None,
            tick_ms: 75,
            log: LogConfig::default(),
        }
    }
}

impl AppConfig {
    /// Reads `path` if given (it must exist), otherwise `./ats.ron` if present,
    /// otherwise defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("reading config {}", path.display()))
            }
        };
        ron::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ats.ron");
        fs::write(
            &path,
            r#"(
                seed: Some(7),
                seed_data: (candidates: 50),
                gateway: (rollback_delay_ms: 0, failure_rates: (reorder_job: 0.5)),
                log: (target: Terminal, level: "debug"),
            )"#,
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();

        assert_eq!(config.seed, Some(7));
        assert_eq!(config.seed_data.candidates, 50);
        assert_eq!(config.seed_data.jobs, 25);
        assert_eq!(config.gateway.rollback_delay_ms, 0);
        assert_eq!(config.gateway.failure_rates.reorder_job, 0.5);
        assert_eq!(config.gateway.failure_rates.create_job, 0.05);
        assert_eq!(config.log.destination(), LogDestination::Terminal);
        assert_eq!(config.log.level_filter(), LevelFilter::Debug);
        assert_eq!(config.tick_ms, 75);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(AppConfig::load(Some(&temp.path().join("nope.ron"))).is_err());
    }

    #[test]
    fn remote_reordering_is_opt_in() {
        assert_eq!(AppConfig::default().reorder_endpoint, None);

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ats.ron");
        fs::write(&path, r#"(reorder_endpoint: Some("http://127.0.0.1:9000"))"#).unwrap();
        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.reorder_endpoint.as_deref(), Some("http://127.0.0.1:9000"));
        assert_eq!(config.data_dir, PathBuf::from("."));
    }

    #[test]
    fn bad_level_falls_back_to_info() {
        let log = LogConfig {
            level: "loud".into(),
            ..LogConfig::default()
        };
        assert_eq!(log.level_filter(), LevelFilter::Info);
    }
}
