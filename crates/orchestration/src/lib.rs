//! Frame Orchestration
//!
//! Feeds each observation through the system in a fixed order:
//! - Calibration mode routes frames to the capture session only
//! - Otherwise proximity first, then posture when a reference exists
//! - At most one dispatcher call and one alert per frame

mod monitor;
mod settings;

pub use monitor::{FrameReport, Mode, Monitor};
pub use settings::{load_settings, MonitorSettings, SettingsError};
