use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Runtime configuration for the bridge daemon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub settings: SettingsConfig,
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsConfig {
    /// JSON settings file the registry persists into.
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Seconds between simulated reading rounds.
    pub interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settings: SettingsConfig {
                path: default_settings_path(),
            },
            simulation: SimulationConfig { interval_secs: 30 },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("SENSOR_SETTINGS_PATH") {
            config.settings.path = PathBuf::from(path);
        }
        if let Ok(interval) = std::env::var("SIMULATION_INTERVAL_SECS")
            && let Ok(secs) = interval.parse()
        {
            config.simulation.interval_secs = secs;
        }

        config
    }
}

/// Default settings location under the platform config directory.
pub fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sensor-bridge")
        .join("settings.json")
}
