//! Alert side-effect channels

use crate::{ToneEnvelope, ToneError};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

/// Full-screen flash colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashColor {
    /// Normal alerts
    Alert,
    /// Low-confidence alerts
    Caution,
}

impl FlashColor {
    /// CSS colour for the overlay
    pub fn css(&self) -> &'static str {
        match self {
            FlashColor::Alert => "rgba(255, 59, 48, 0.35)",
            FlashColor::Caution => "rgba(255, 204, 0, 0.30)",
        }
    }
}

/// One requested effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum EffectCommand {
    Flash { color: FlashColor, duration_ms: u64 },
    Tone(ToneEnvelope),
    Toast { message: String },
}

/// Presentation side of the dispatcher. Implementations must return
/// promptly; the dispatcher only requests effects, it never waits for them.
pub trait AlertEffects: Send + Sync {
    /// Flash the screen, reverting on its own after `duration`
    fn flash(&self, color: FlashColor, duration: Duration);

    /// Start a synthesized tone
    fn play_tone(&self, tone: &ToneEnvelope) -> Result<(), ToneError>;

    /// Show a notification
    fn toast(&self, message: &str);
}

/// Effects forwarded over an unbounded channel to a presentation task
#[derive(Debug, Clone)]
pub struct ChannelEffects {
    sender: mpsc::UnboundedSender<EffectCommand>,
}

impl ChannelEffects {
    /// Create the sink and the receiver the presentation task drains
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<EffectCommand>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    fn send(&self, command: EffectCommand) -> bool {
        match self.sender.send(command) {
            Ok(()) => true,
            Err(e) => {
                debug!("Effect dropped, presentation task gone: {:?}", e.0);
                false
            }
        }
    }
}

impl AlertEffects for ChannelEffects {
    fn flash(&self, color: FlashColor, duration: Duration) {
        self.send(EffectCommand::Flash {
            color,
            duration_ms: duration.as_millis() as u64,
        });
    }

    fn play_tone(&self, tone: &ToneEnvelope) -> Result<(), ToneError> {
        if self.send(EffectCommand::Tone(tone.clone())) {
            Ok(())
        } else {
            Err(ToneError::Unavailable)
        }
    }

    fn toast(&self, message: &str) {
        self.send(EffectCommand::Toast {
            message: message.to_string(),
        });
    }
}

/// Records every requested effect (for assertions)
#[derive(Debug, Default)]
pub struct RecordingEffects {
    commands: Mutex<Vec<EffectCommand>>,
    block_tone: AtomicBool,
}

impl RecordingEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `play_tone` fail as if autoplay were blocked
    pub fn set_tone_blocked(&self, blocked: bool) {
        self.block_tone.store(blocked, Ordering::Relaxed);
    }

    /// Snapshot of recorded commands in request order
    pub fn commands(&self) -> Vec<EffectCommand> {
        self.commands.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn flashes(&self) -> Vec<FlashColor> {
        self.commands()
            .into_iter()
            .filter_map(|c| match c {
                EffectCommand::Flash { color, .. } => Some(color),
                _ => None,
            })
            .collect()
    }

    pub fn tone_count(&self) -> usize {
        self.commands()
            .iter()
            .filter(|c| matches!(c, EffectCommand::Tone(_)))
            .count()
    }

    pub fn toasts(&self) -> Vec<String> {
        self.commands()
            .into_iter()
            .filter_map(|c| match c {
                EffectCommand::Toast { message } => Some(message),
                _ => None,
            })
            .collect()
    }

    fn record(&self, command: EffectCommand) {
        if let Ok(mut commands) = self.commands.lock() {
            commands.push(command);
        }
    }
}

impl AlertEffects for RecordingEffects {
    fn flash(&self, color: FlashColor, duration: Duration) {
        self.record(EffectCommand::Flash {
            color,
            duration_ms: duration.as_millis() as u64,
        });
    }

    fn play_tone(&self, tone: &ToneEnvelope) -> Result<(), ToneError> {
        if self.block_tone.load(Ordering::Relaxed) {
            return Err(ToneError::Blocked("no user gesture yet".to_string()));
        }
        self.record(EffectCommand::Tone(tone.clone()));
        Ok(())
    }

    fn toast(&self, message: &str) {
        self.record(EffectCommand::Toast {
            message: message.to_string(),
        });
    }
}
