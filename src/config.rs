use serde::{Deserialize, Deserializer};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::fleet::SchedulerConfig;
use crate::missions::{ClassificationError, FleetPlan, FleetPlanConfig};
use crate::store::{DirectoryStore, MemoryStore, Store};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
    #[error("invalid fleet table: {0}")]
    Fleet(#[from] ClassificationError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub scheduler: SchedulerSettings,
    #[serde(default)]
    pub fleet: FleetPlanConfig,
    #[serde(default)]
    pub web: WebConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreConfig {
    #[default]
    Memory,
    Directory { path: PathBuf },
}

impl StoreConfig {
    pub fn open(&self) -> Arc<dyn Store> {
        match self {
            StoreConfig::Memory => Arc::new(MemoryStore::new()),
            StoreConfig::Directory { path } => Arc::new(DirectoryStore::new(path.clone())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SchedulerSettings {
    #[serde(default = "default_tick", deserialize_with = "humantime_duration")]
    pub tick: Duration,
    #[serde(
        default = "default_satellite_timeout",
        deserialize_with = "humantime_duration"
    )]
    pub satellite_timeout: Duration,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            tick: default_tick(),
            satellite_timeout: default_satellite_timeout(),
        }
    }
}

impl From<SchedulerSettings> for SchedulerConfig {
    fn from(settings: SchedulerSettings) -> Self {
        SchedulerConfig {
            tick: settings.tick,
            satellite_timeout: settings.satellite_timeout,
        }
    }
}

fn default_tick() -> Duration {
    Duration::from_secs(1)
}

fn default_satellite_timeout() -> Duration {
    Duration::from_secs(2)
}

fn humantime_duration<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom)
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            enabled: default_enabled(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_enabled() -> bool {
    true
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.scheduler.tick.is_zero() {
            return Err(ConfigError::Invalid("scheduler.tick must be positive".into()));
        }
        if self.scheduler.satellite_timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "scheduler.satellite_timeout must be positive".into(),
            ));
        }
        self.fleet_plan()?;
        Ok(())
    }

    pub fn fleet_plan(&self) -> Result<FleetPlan, ConfigError> {
        Ok(FleetPlan::from_config(&self.fleet)?)
    }
}
