//! Posture Monitor Replay - Main Entry Point
//!
//! Usage: `posture-replay [INPUT]`, reading JSON lines from stdin when
//! `INPUT` is absent.

mod input;
mod logging;

use alerting::{ChannelEffects, Clock, EffectCommand, ManualClock, SystemClock};
use anyhow::{Context, Result};
use logging::{init_logging, LogSettings};
use orchestration::{load_settings, Mode, Monitor, MonitorSettings};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use storage::{InMemoryReferenceStore, JsonFileReferenceStore, ReferenceStore};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{info, warn};

/// Settings file used when `POSTURE_CONFIG` is unset
const DEFAULT_CONFIG: &str = "posture-monitor.toml";

/// Replay-only options (`[replay]` table)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ReplayOptions {
    /// Capture a reference from the first frames before monitoring
    calibrate_first: bool,
    /// Directory of the JSON reference store; in-memory when unset
    reference_dir: Option<PathBuf>,
    /// Time frames by arrival on the wall clock instead of `t_ms`
    live: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ReplaySettings {
    #[serde(flatten)]
    monitor: MonitorSettings,
    replay: ReplayOptions,
    log: LogSettings,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::var_os("POSTURE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let settings: ReplaySettings =
        load_settings(Some(config_path.as_path())).context("Failed to load settings")?;

    init_logging(&settings.log);
    info!("=== Posture Monitor Replay v{} ===", env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn ReferenceStore> = match &settings.replay.reference_dir {
        Some(dir) => Arc::new(JsonFileReferenceStore::new(dir.clone())),
        None => Arc::new(InMemoryReferenceStore::new()),
    };

    let (effects, mut receiver) = ChannelEffects::channel();
    let presenter = tokio::spawn(async move {
        while let Some(command) = receiver.recv().await {
            present(&command);
        }
    });

    let recorded = Arc::new(ManualClock::new(0));
    let clock: Arc<dyn Clock> = if settings.replay.live {
        info!("Live timing: recorded timestamps are ignored");
        Arc::new(SystemClock::new())
    } else {
        recorded.clone()
    };
    let recorded = (!settings.replay.live).then_some(recorded.as_ref());
    let mut monitor = Monitor::new(settings.monitor, store, clock, Arc::new(effects));

    match std::env::args().nth(1) {
        Some(path) => {
            let file = tokio::fs::File::open(&path)
                .await
                .with_context(|| format!("Failed to open {}", path))?;
            replay(BufReader::new(file), &mut monitor, recorded, settings.replay.calibrate_first).await?;
        }
        None => {
            let stdin = tokio::io::stdin();
            replay(BufReader::new(stdin), &mut monitor, recorded, settings.replay.calibrate_first).await?;
        }
    }

    let dispatcher = monitor.dispatcher();
    info!(
        "Replay finished: {} alerts fired, {} suppressed",
        dispatcher.fired_count(),
        dispatcher.suppressed_count()
    );

    // Closing the effect channel ends the presenter
    drop(monitor);
    presenter.await?;
    Ok(())
}

/// Feed every frame to the monitor. With a `recorded` clock, time follows
/// each frame's `t_ms`; otherwise the monitor's own clock is used.
async fn replay<R>(
    reader: R,
    monitor: &mut Monitor,
    recorded: Option<&ManualClock>,
    calibrate_first: bool,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut line_no = 0usize;
    let mut started = false;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let (t_ms, observation) = match input::parse_line(&line) {
            Ok(Some(frame)) => frame,
            Ok(None) => continue,
            Err(e) => {
                warn!("Skipping line {}: {:#}", line_no, e);
                continue;
            }
        };
        if let Some(clock) = recorded {
            clock.set(t_ms);
        }

        if !started {
            started = true;
            monitor.start_monitoring();
            if calibrate_first {
                for progress in monitor.begin_capture() {
                    info!("Capture: {:?}", progress);
                }
            }
        }

        let report = monitor.process(&observation);
        for progress in &report.progress {
            info!("Capture: {:?}", progress);
        }
        if let Some(alert) = &report.alert {
            info!("[{} ms] Alert ({}): {}", t_ms, alert.variant.as_str(), alert.reason);
        }
    }

    if monitor.mode() == Mode::Calibrating {
        warn!("Recording ended before the capture finished");
        monitor.abandon_capture();
    }
    if let Some(reference) = monitor.reference() {
        info!("Reference ratio {:.3}", reference.ratio());
    }
    Ok(())
}

fn present(command: &EffectCommand) {
    match command {
        EffectCommand::Flash { color, duration_ms } => {
            info!("Flash {} for {} ms", color.css(), duration_ms)
        }
        EffectCommand::Tone(tone) => {
            info!("Tone {} Hz for {} ms", tone.frequency_hz, tone.total_ms())
        }
        EffectCommand::Toast { message } => info!("Toast: {}", message),
    }
}
