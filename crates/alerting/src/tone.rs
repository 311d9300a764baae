//! Synthesized alert tone

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use thiserror::Error;

/// Reasons a tone could not be played
#[derive(Debug, Clone, Error)]
pub enum ToneError {
    /// Output refused before user interaction (autoplay policy)
    #[error("Audio output blocked: {0}")]
    Blocked(String),

    /// No audio sink available
    #[error("Audio output unavailable")]
    Unavailable,
}

/// Sine oscillator with a linear attack/sustain/release envelope.
///
/// Gain starts and ends at zero so playback has no audible click.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneEnvelope {
    pub frequency_hz: f64,
    pub attack_ms: f64,
    pub sustain_ms: f64,
    pub release_ms: f64,
    /// Gain held during sustain (0-1)
    pub peak_gain: f64,
}

impl Default for ToneEnvelope {
    fn default() -> Self {
        Self {
            frequency_hz: 880.0,
            attack_ms: 10.0,
            sustain_ms: 90.0,
            release_ms: 30.0,
            peak_gain: 0.2,
        }
    }
}

impl ToneEnvelope {
    /// Attack + sustain + release
    pub fn total_ms(&self) -> f64 {
        self.attack_ms + self.sustain_ms + self.release_ms
    }

    /// Envelope gain at `t_ms` after onset
    pub fn gain_at(&self, t_ms: f64) -> f64 {
        let release_start = self.attack_ms + self.sustain_ms;

        if t_ms <= 0.0 || t_ms >= self.total_ms() {
            0.0
        } else if t_ms < self.attack_ms {
            self.peak_gain * t_ms / self.attack_ms
        } else if t_ms < release_start {
            self.peak_gain
        } else {
            self.peak_gain * (self.total_ms() - t_ms) / self.release_ms
        }
    }

    /// Render mono samples, including both zero-gain endpoints
    pub fn render(&self, sample_rate: u32) -> Vec<f32> {
        let rate = f64::from(sample_rate);
        let last = (self.total_ms() * rate / 1000.0).round() as usize;

        (0..=last)
            .map(|i| {
                if i == last {
                    return 0.0;
                }
                let t = i as f64 / rate;
                (self.gain_at(t * 1000.0) * (TAU * self.frequency_hz * t).sin()) as f32
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_shape() {
        let tone = ToneEnvelope::default();
        assert_eq!(tone.frequency_hz, 880.0);
        assert!((tone.total_ms() - 130.0).abs() < 1e-9);
    }

    #[test]
    fn test_envelope_segments() {
        let tone = ToneEnvelope::default();
        assert_eq!(tone.gain_at(0.0), 0.0);
        assert!((tone.gain_at(5.0) - 0.1).abs() < 1e-12);
        assert_eq!(tone.gain_at(50.0), 0.2);
        assert!((tone.gain_at(115.0) - 0.1).abs() < 1e-12);
        assert_eq!(tone.gain_at(130.0), 0.0);
        assert_eq!(tone.gain_at(500.0), 0.0);
    }

    #[test]
    fn test_render_starts_and_ends_silent() {
        let tone = ToneEnvelope::default();
        let samples = tone.render(48_000);

        // 130 ms at 48 kHz plus the closing endpoint
        assert_eq!(samples.len(), 6_241);
        assert_eq!(samples[0], 0.0);
        assert_eq!(*samples.last().unwrap(), 0.0);
        assert!(samples.iter().all(|s| s.abs() <= 0.2 + 1e-6));
        assert!(samples.iter().any(|s| s.abs() > 0.19));
    }
}
