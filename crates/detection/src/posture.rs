//! Shoulder-rounding detector and composite posture score

use crate::{AlertEvent, AlertPayload, AlertVariant, LatchState, PostureConfig};
use landmarks::{average_depth, head_tilt_delta, triangle_ratio, Observation, ReferencePose};
use ring_buffer::MovingAverage;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Continuous 0-100 posture feedback (higher is better).
///
/// Advisory only; alert emission uses the raw ratio-drop test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostureScore {
    pub overall: f64,
    pub ratio_component: f64,
    pub z_component: f64,
    /// Live/reference head delta clamped to 0-1
    pub head_tilt_confidence: f64,
}

/// Detects forward shoulder rounding relative to the reference pose
#[derive(Debug, Clone)]
pub struct PostureDetector {
    config: PostureConfig,
    ratio: MovingAverage,
    head_delta: MovingAverage,
    depth: MovingAverage,
    latch: LatchState,
    score: Option<PostureScore>,
}

impl PostureDetector {
    pub fn new(config: PostureConfig) -> Self {
        let window = config.smoothing_window;
        Self {
            config,
            ratio: MovingAverage::new(window),
            head_delta: MovingAverage::new(window),
            depth: MovingAverage::new(window),
            latch: LatchState::default(),
            score: None,
        }
    }

    /// Evaluate one observation against the reference; returns an event on
    /// the rising edge. Always refreshes the posture score when the
    /// triangle is visible.
    pub fn update(&mut self, observation: &Observation, reference: &ReferencePose) -> Option<AlertEvent> {
        let triangle = match observation.triangle() {
            Some(triangle) => triangle,
            None => {
                self.reset();
                return None;
            }
        };
        let (nose, left, right) = (&triangle.nose, &triangle.left_shoulder, &triangle.right_shoulder);

        let live_ratio = self.ratio.push(triangle_ratio(nose, left, right));
        let live_head = self.head_delta.push(head_tilt_delta(nose, left, right));
        let live_depth = match average_depth(&triangle) {
            Some(depth) => Some(self.depth.push(depth)),
            None => self.depth.mean(),
        };

        let reference_ratio = reference.ratio();
        let reference_head = reference.head_tilt_delta();
        let head_delta_ratio = if reference_head <= 0.0 {
            1.0
        } else {
            live_head / reference_head
        };

        self.score = Some(self.compute_score(
            live_ratio,
            reference_ratio,
            live_depth,
            reference.average_depth(),
            head_delta_ratio,
        ));

        let bad = live_ratio > 0.0
            && live_ratio < reference_ratio * (1.0 - self.config.ratio_drop_threshold);
        if !self.latch.observe(bad, self.config.trigger_frames) {
            return None;
        }

        // A dropped head also narrows the triangle
        let (variant, reason) = if head_delta_ratio < self.config.head_tilt_confidence {
            (
                AlertVariant::LowConfidence,
                "Posture may be slipping (head is tilted down)",
            )
        } else {
            (AlertVariant::Normal, "Shoulders rounding forward")
        };

        debug!(
            "Posture alert ready: ratio {:.3} vs {:.3}, head {:.2}, streak {}",
            live_ratio,
            reference_ratio,
            head_delta_ratio,
            self.latch.streak()
        );

        Some(AlertEvent {
            variant,
            reason: reason.to_string(),
            payload: AlertPayload::Posture {
                live_ratio,
                reference_ratio,
                head_delta_ratio,
            },
        })
    }

    fn compute_score(
        &self,
        live_ratio: f64,
        reference_ratio: f64,
        live_depth: Option<f64>,
        reference_depth: Option<f64>,
        head_delta_ratio: f64,
    ) -> PostureScore {
        // A 50% drop maps to zero
        let ratio_component = if reference_ratio > 0.0 {
            let drop = (reference_ratio - live_ratio) / reference_ratio;
            (100.0 - drop * 200.0).clamp(0.0, 100.0)
        } else {
            100.0
        };

        let z_component = match (live_depth, reference_depth) {
            (Some(live), Some(baseline)) if self.config.depth_deviation_threshold > 0.0 => {
                // More negative z is closer to the camera
                let closer = (baseline - live).max(0.0);
                (100.0 - closer / self.config.depth_deviation_threshold * 100.0).clamp(0.0, 100.0)
            }
            _ => 100.0,
        };

        let head_tilt_confidence = head_delta_ratio.clamp(0.0, 1.0);
        let depth_weight = (self.config.depth_weight * head_tilt_confidence).clamp(0.0, 1.0);
        let overall = ratio_component * (1.0 - depth_weight) + z_component * depth_weight;

        PostureScore {
            overall,
            ratio_component,
            z_component,
            head_tilt_confidence,
        }
    }

    /// Mark the last event as shown
    pub fn acknowledge(&mut self) {
        self.latch.acknowledge();
    }

    /// Clear smoothing windows, streak, latch, and score
    pub fn reset(&mut self) {
        self.ratio.reset();
        self.head_delta.reset();
        self.depth.reset();
        self.latch.reset();
        self.score = None;
    }

    /// Score from the most recent frame with a visible triangle
    pub fn score(&self) -> Option<PostureScore> {
        self.score
    }

    pub fn latch(&self) -> &LatchState {
        &self.latch
    }
}

impl Default for PostureDetector {
    fn default() -> Self {
        Self::new(PostureConfig::default())
    }
}
