//! Hand-near-face detector

use crate::{AlertEvent, AlertPayload, AlertVariant, LatchState, ProximityConfig};
use landmarks::{mean_depth, FaceRect, Landmark, Observation};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Measurements from the most recent evaluated frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProximityReading {
    /// Nearest hand-to-face distance divided by face size
    pub normalized_distance: f64,
    /// Larger side of the face bounding rectangle
    pub face_size: f64,
    /// Absolute hand/face mean depth gap, when both have depth
    pub depth_gap: Option<f64>,
    pub near: bool,
}

/// Detects a hand held close to the face
#[derive(Debug, Clone, Default)]
pub struct ProximityDetector {
    config: ProximityConfig,
    latch: LatchState,
    last_reading: Option<ProximityReading>,
}

impl ProximityDetector {
    pub fn new(config: ProximityConfig) -> Self {
        Self {
            config,
            latch: LatchState::default(),
            last_reading: None,
        }
    }

    /// Evaluate one observation; returns an event on the rising edge
    pub fn update(&mut self, observation: &Observation) -> Option<AlertEvent> {
        let reading = match self.measure(observation) {
            Some(reading) => reading,
            None => {
                self.reset();
                return None;
            }
        };
        self.last_reading = Some(reading);

        if !self.latch.observe(reading.near, self.config.trigger_frames) {
            return None;
        }

        let (variant, reason) = if reading.face_size < self.config.min_face_size {
            (
                AlertVariant::LowConfidence,
                "Possible hand near face (face too small to be sure)",
            )
        } else {
            (AlertVariant::Normal, "Hand near face")
        };

        debug!(
            "Proximity alert ready: distance {:.3}, face {:.3}, streak {}",
            reading.normalized_distance,
            reading.face_size,
            self.latch.streak()
        );

        Some(AlertEvent {
            variant,
            reason: reason.to_string(),
            payload: AlertPayload::Proximity {
                normalized_distance: reading.normalized_distance,
                face_size: reading.face_size,
            },
        })
    }

    /// `None` means there is no usable signal this frame
    fn measure(&self, observation: &Observation) -> Option<ProximityReading> {
        if observation.face.is_empty() || !observation.has_hand() {
            return None;
        }

        let face = FaceRect::from_landmarks(&observation.face)?;
        let face_size = face.size();
        if face_size == 0.0 {
            return None;
        }

        // Each hand is classified on its own; any passing hand counts
        let readings = observation.hands().filter_map(|hand| {
            let normalized_distance = face.min_distance(hand)? / face_size;
            let depth_gap = depth_gap(&observation.face, hand);
            let depth_ok = depth_gap.map_or(true, |gap| gap <= self.config.depth_threshold);
            Some(ProximityReading {
                normalized_distance,
                face_size,
                depth_gap,
                near: normalized_distance <= self.config.distance_threshold && depth_ok,
            })
        });

        // Prefer a near hand, then the closer one
        readings.min_by(|a, b| {
            b.near
                .cmp(&a.near)
                .then(a.normalized_distance.total_cmp(&b.normalized_distance))
        })
    }

    /// Mark the last event as shown
    pub fn acknowledge(&mut self) {
        self.latch.acknowledge();
    }

    /// Clear streak, latch, and last reading
    pub fn reset(&mut self) {
        self.latch.reset();
        self.last_reading = None;
    }

    pub fn last_reading(&self) -> Option<&ProximityReading> {
        self.last_reading.as_ref()
    }

    pub fn latch(&self) -> &LatchState {
        &self.latch
    }
}

fn depth_gap(face: &[Landmark], hand: &[Landmark]) -> Option<f64> {
    Some((mean_depth(hand)? - mean_depth(face)?).abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face() -> Vec<Landmark> {
        // 0.2 wide, 0.25 tall
        vec![
            Landmark::new(0.4, 0.2),
            Landmark::new(0.6, 0.2),
            Landmark::new(0.5, 0.45),
        ]
    }

    fn small_face() -> Vec<Landmark> {
        // 0.05 wide
        vec![
            Landmark::new(0.45, 0.2),
            Landmark::new(0.5, 0.2),
            Landmark::new(0.47, 0.25),
        ]
    }

    fn near_hand() -> Vec<Landmark> {
        vec![Landmark::new(0.62, 0.3), Landmark::new(0.75, 0.5)]
    }

    fn far_hand() -> Vec<Landmark> {
        vec![Landmark::new(0.9, 0.9)]
    }

    fn observation(face: Vec<Landmark>, left: Vec<Landmark>, right: Vec<Landmark>) -> Observation {
        Observation {
            face,
            left_hand: left,
            right_hand: right,
            ..Default::default()
        }
    }

    #[test]
    fn test_fires_once_on_third_near_frame() {
        let mut detector = ProximityDetector::default();
        let obs = observation(face(), near_hand(), vec![]);

        assert!(detector.update(&obs).is_none());
        assert!(detector.update(&obs).is_none());

        let event = detector.update(&obs).expect("third frame emits");
        assert_eq!(event.variant, AlertVariant::Normal);
        match event.payload {
            AlertPayload::Proximity { normalized_distance, face_size } => {
                assert!((normalized_distance - 0.08).abs() < 1e-9);
                assert!((face_size - 0.25).abs() < 1e-9);
            }
            other => panic!("unexpected payload: {:?}", other),
        }

        detector.acknowledge();
        for _ in 0..10 {
            assert!(detector.update(&obs).is_none());
        }
    }

    #[test]
    fn test_retrigger_after_clear() {
        let mut detector = ProximityDetector::default();
        let near = observation(face(), near_hand(), vec![]);
        let far = observation(face(), far_hand(), vec![]);

        for _ in 0..3 {
            detector.update(&near);
        }
        detector.acknowledge();

        assert!(detector.update(&far).is_none());
        assert!(!detector.latch().is_latched());

        assert!(detector.update(&near).is_none());
        assert!(detector.update(&near).is_none());
        assert!(detector.update(&near).is_some());
    }

    #[test]
    fn test_unacknowledged_event_repeats() {
        let mut detector = ProximityDetector::default();
        let obs = observation(face(), near_hand(), vec![]);

        for _ in 0..2 {
            detector.update(&obs);
        }
        assert!(detector.update(&obs).is_some());
        // Suppressed downstream, so no acknowledgement
        assert!(detector.update(&obs).is_some());
    }

    #[test]
    fn test_small_face_is_low_confidence() {
        let mut detector = ProximityDetector::default();
        let obs = observation(small_face(), vec![], vec![Landmark::new(0.505, 0.22)]);

        detector.update(&obs);
        detector.update(&obs);
        let event = detector.update(&obs).unwrap();
        assert_eq!(event.variant, AlertVariant::LowConfidence);
    }

    #[test]
    fn test_nearest_hand_wins() {
        let mut detector = ProximityDetector::default();
        let obs = observation(face(), far_hand(), near_hand());

        detector.update(&obs);
        let reading = detector.last_reading().unwrap();
        assert!(reading.near);
        assert!((reading.normalized_distance - 0.08).abs() < 1e-9);
    }

    #[test]
    fn test_depth_gate_blocks_hand_in_front() {
        let mut detector = ProximityDetector::default();
        let face: Vec<_> = face().into_iter().map(|p| Landmark::with_depth(p.x, p.y, -0.1)).collect();
        let hand = vec![Landmark::with_depth(0.62, 0.3, -0.4)];
        let obs = observation(face, hand, vec![]);

        for _ in 0..5 {
            assert!(detector.update(&obs).is_none());
        }
        let reading = detector.last_reading().unwrap();
        assert!(!reading.near);
        assert!((reading.depth_gap.unwrap() - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_depth_gate_open_without_depth() {
        let mut detector = ProximityDetector::default();
        let face: Vec<_> = face().into_iter().map(|p| Landmark::with_depth(p.x, p.y, -0.1)).collect();
        let obs = observation(face, near_hand(), vec![]);

        detector.update(&obs);
        let reading = detector.last_reading().unwrap();
        assert_eq!(reading.depth_gap, None);
        assert!(reading.near);
    }

    #[test]
    fn test_missing_regions_reset() {
        let mut detector = ProximityDetector::default();
        let near = observation(face(), near_hand(), vec![]);
        detector.update(&near);
        detector.update(&near);
        assert_eq!(detector.latch().streak(), 2);

        assert!(detector.update(&observation(vec![], near_hand(), vec![])).is_none());
        assert_eq!(detector.latch().streak(), 0);
        assert!(detector.last_reading().is_none());

        detector.update(&near);
        assert!(detector.update(&observation(face(), vec![], vec![])).is_none());
        assert_eq!(detector.latch().streak(), 0);
    }

    #[test]
    fn test_zero_size_face_resets() {
        let mut detector = ProximityDetector::default();
        let point_face = vec![Landmark::new(0.5, 0.3), Landmark::new(0.5, 0.3)];
        let obs = observation(point_face, vec![Landmark::new(0.5, 0.3)], vec![]);

        for _ in 0..5 {
            assert!(detector.update(&obs).is_none());
        }
        assert!(detector.last_reading().is_none());
    }

    #[test]
    fn test_depth_gate_is_per_hand() {
        let mut detector = ProximityDetector::default();
        let face: Vec<_> = face().into_iter().map(|p| Landmark::with_depth(p.x, p.y, -0.1)).collect();
        // Left hand touches the face outline but is far in front of it
        let left = vec![Landmark::with_depth(0.6, 0.3, -0.5)];
        // Right hand is a little further out in 2D but at face depth
        let right = vec![Landmark::with_depth(0.64, 0.3, -0.12)];
        let obs = observation(face, left, right);

        detector.update(&obs);
        let reading = detector.last_reading().unwrap();
        assert!(reading.near);
        assert!((reading.normalized_distance - 0.16).abs() < 1e-9);
        assert!((reading.depth_gap.unwrap() - 0.02).abs() < 1e-9);

        detector.update(&obs);
        assert!(detector.update(&obs).is_some());
    }

    #[test]
    fn test_reading_reports_nearest_when_no_hand_is_near() {
        let mut detector = ProximityDetector::default();
        let obs = observation(face(), vec![Landmark::new(0.9, 0.3)], far_hand());

        detector.update(&obs);
        let reading = detector.last_reading().unwrap();
        assert!(!reading.near);
        // (0.9, 0.3) is 0.3 from the right edge
        assert!((reading.normalized_distance - 1.2).abs() < 1e-9);
    }
}
