//! Layered settings (file, then environment)

use alerting::AlertConfig;
use calibration::CaptureSchedule;
use detection::{PostureConfig, ProximityConfig};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Environment variable prefix, e.g. `POSTURE__ALERT__COOLDOWN_MS`
pub const ENV_PREFIX: &str = "POSTURE";

/// Settings errors
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Settings for every component of the monitor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorSettings {
    pub proximity: ProximityConfig,
    pub posture: PostureConfig,
    pub alert: AlertConfig,
    pub capture: CaptureSchedule,
}

impl MonitorSettings {
    /// Load from an optional file, overridden by `POSTURE__*` variables
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        load_settings(path)
    }
}

/// Deserialize any settings type from an optional file plus the environment.
///
/// A missing file is not an error; absent keys keep their serde defaults.
pub fn load_settings<T: DeserializeOwned>(path: Option<&Path>) -> Result<T, SettingsError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path).required(false));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
