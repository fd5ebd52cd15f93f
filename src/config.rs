use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::MonitorError;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub devices: DevicesConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonitorConfig {
    /// Tick period in milliseconds; must be positive.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Explicit server address; the server's default when unset.
    #[serde(default)]
    pub server: Option<String>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            server: None,
        }
    }
}

fn default_tick_ms() -> u64 {
    1000
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct DevicesConfig {
    /// Sink index to watch.
    #[serde(default)]
    pub output: u32,
    /// Source index to watch.
    #[serde(default)]
    pub input: u32,
}

impl Config {
    pub fn load() -> Result<Self, figment::Error> {
        let dirs = ProjectDirs::from("com", "pulsewatch", "pulsewatch")
            .expect("Failed to determine project directories");

        let config_path = dirs.config_dir().join("config.toml");

        let figment = Figment::new()
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("PULSEWATCH_").split("__"));

        let config: Config = figment.extract()?;

        Ok(config)
    }

    pub fn load_from_path(path: PathBuf) -> Result<Self, figment::Error> {
        let figment = Figment::new().merge(Toml::file(path));

        let config: Config = figment.extract()?;

        Ok(config)
    }

    /// The tick period as a duration; a zero period is rejected.
    pub fn period(&self) -> Result<Duration, MonitorError> {
        if self.monitor.tick_ms == 0 {
            return Err(MonitorError::Config(
                "tick_ms must be greater than zero".to_string(),
            ));
        }
        Ok(Duration::from_millis(self.monitor.tick_ms))
    }
}
