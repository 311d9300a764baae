//! Alert Dispatcher Implementation

use crate::{AlertEffects, Clock, FlashColor, ToneEnvelope};
use detection::{AlertEvent, AlertVariant};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Dispatcher configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Minimum time between two fired alerts, any source (ms)
    pub cooldown_ms: u64,
    /// Flash duration before reverting (ms)
    pub flash_ms: u64,
    /// Tone played with normal alerts
    pub tone: ToneEnvelope,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 60_000,
            flash_ms: 650,
            tone: ToneEnvelope::default(),
        }
    }
}

impl AlertConfig {
    /// Short cooldown for local development
    pub fn development() -> Self {
        Self {
            cooldown_ms: 5_000,
            ..Default::default()
        }
    }

    /// Development settings when served from a loopback host
    pub fn for_host(host: &str) -> Self {
        match host {
            "localhost" | "127.0.0.1" | "::1" | "[::1]" => Self::development(),
            _ => Self::default(),
        }
    }
}

/// Global-cooldown gate in front of the effect channels
pub struct AlertDispatcher {
    config: AlertConfig,
    clock: Arc<dyn Clock>,
    effects: Arc<dyn AlertEffects>,
    /// Time of the last fired alert
    last_fired_ms: Option<u64>,
    fired_count: usize,
    suppressed_count: usize,
}

impl AlertDispatcher {
    /// Create a new dispatcher
    pub fn new(config: AlertConfig, clock: Arc<dyn Clock>, effects: Arc<dyn AlertEffects>) -> Self {
        info!("Creating alert dispatcher with cooldown {} ms", config.cooldown_ms);
        Self {
            config,
            clock,
            effects,
            last_fired_ms: None,
            fired_count: 0,
            suppressed_count: 0,
        }
    }

    /// Fire an alert unless still cooling down; returns whether it fired.
    ///
    /// Suppression changes nothing. Tone failures are swallowed and never
    /// stop the flash or toast.
    pub fn trigger(&mut self, variant: AlertVariant, reason: &str) -> bool {
        let now = self.clock.now_ms();

        if let Some(last) = self.last_fired_ms {
            let elapsed = now.saturating_sub(last);
            if elapsed < self.config.cooldown_ms {
                debug!(
                    "Alert suppressed: in cooldown ({} of {} ms)",
                    elapsed, self.config.cooldown_ms
                );
                self.suppressed_count += 1;
                return false;
            }
        }

        self.last_fired_ms = Some(now);
        self.fired_count += 1;
        let flash = Duration::from_millis(self.config.flash_ms);

        match variant {
            AlertVariant::Normal => {
                self.effects.flash(FlashColor::Alert, flash);
                if let Err(e) = self.effects.play_tone(&self.config.tone) {
                    warn!("Alert tone skipped: {}", e);
                }
                self.effects.toast(reason);
            }
            AlertVariant::LowConfidence => {
                self.effects.flash(FlashColor::Caution, flash);
            }
        }

        info!("Alert fired ({}): {}", variant.as_str(), reason);
        true
    }

    /// Fire a detector event
    pub fn dispatch(&mut self, event: &AlertEvent) -> bool {
        self.trigger(event.variant, &event.reason)
    }

    /// Alerts fired so far
    pub fn fired_count(&self) -> usize {
        self.fired_count
    }

    /// Alerts dropped by the cooldown so far
    pub fn suppressed_count(&self) -> usize {
        self.suppressed_count
    }
}
