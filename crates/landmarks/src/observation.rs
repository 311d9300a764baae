//! Per-frame observations and boundary normalization

use crate::{Landmark, ObservationError, Triangle};
use serde::{Deserialize, Serialize};

/// Current observation schema version
pub const OBSERVATION_VERSION: u32 = 1;

/// Landmark as emitted by the external detector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawLandmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: Option<f64>,
}

/// Detector payload before normalization. Any region may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawObservation {
    #[serde(default)]
    pub version: Option<u32>,
    #[serde(default)]
    pub pose: Option<Vec<RawLandmark>>,
    #[serde(default)]
    pub left_hand: Option<Vec<RawLandmark>>,
    #[serde(default)]
    pub right_hand: Option<Vec<RawLandmark>>,
    #[serde(default)]
    pub face: Option<Vec<RawLandmark>>,
}

/// Normalized observation handed to the detectors.
///
/// Every region is present; an empty vector means "not detected this frame".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub pose: Vec<Landmark>,
    pub left_hand: Vec<Landmark>,
    pub right_hand: Vec<Landmark>,
    pub face: Vec<Landmark>,
}

impl Observation {
    /// Nose + shoulders, if all three pose landmarks are present
    pub fn triangle(&self) -> Option<Triangle> {
        Triangle::from_pose(&self.pose)
    }

    /// At least one hand was detected
    pub fn has_hand(&self) -> bool {
        !self.left_hand.is_empty() || !self.right_hand.is_empty()
    }

    /// Present hand sets, left first
    pub fn hands(&self) -> impl Iterator<Item = &[Landmark]> {
        [self.left_hand.as_slice(), self.right_hand.as_slice()]
            .into_iter()
            .filter(|hand| !hand.is_empty())
    }
}

fn normalize_region(
    region: &'static str,
    raw: Option<Vec<RawLandmark>>,
) -> Result<Vec<Landmark>, ObservationError> {
    raw.unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(index, p)| {
            if !p.x.is_finite() || !p.y.is_finite() {
                return Err(ObservationError::NonFinite { region, index });
            }
            Ok(Landmark {
                x: p.x,
                y: p.y,
                // Unusable depth degrades to "no depth signal"
                z: p.z.filter(|z| z.is_finite()),
            })
        })
        .collect()
}

impl TryFrom<RawObservation> for Observation {
    type Error = ObservationError;

    fn try_from(raw: RawObservation) -> Result<Self, Self::Error> {
        let version = raw.version.unwrap_or(OBSERVATION_VERSION);
        if version != OBSERVATION_VERSION {
            return Err(ObservationError::UnsupportedVersion {
                found: version,
                expected: OBSERVATION_VERSION,
            });
        }

        Ok(Self {
            pose: normalize_region("pose", raw.pose)?,
            left_hand: normalize_region("left hand", raw.left_hand)?,
            right_hand: normalize_region("right hand", raw.right_hand)?,
            face: normalize_region("face", raw.face)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_regions_become_empty() {
        let raw: RawObservation = serde_json::from_str(r#"{"pose": [{"x": 0.5, "y": 0.5}]}"#).unwrap();
        let obs = Observation::try_from(raw).unwrap();
        assert_eq!(obs.pose.len(), 1);
        assert!(obs.face.is_empty());
        assert!(!obs.has_hand());
        assert!(obs.triangle().is_none());
    }

    #[test]
    fn test_camel_case_hands() {
        let raw: RawObservation = serde_json::from_str(
            r#"{"version": 1, "leftHand": [{"x": 0.1, "y": 0.2, "z": -0.05}], "rightHand": []}"#,
        )
        .unwrap();
        let obs = Observation::try_from(raw).unwrap();
        assert_eq!(obs.left_hand[0].z, Some(-0.05));
        assert_eq!(obs.hands().count(), 1);
    }

    #[test]
    fn test_rejects_unknown_version() {
        let raw = RawObservation {
            version: Some(2),
            ..Default::default()
        };
        assert_eq!(
            Observation::try_from(raw),
            Err(ObservationError::UnsupportedVersion { found: 2, expected: 1 })
        );
    }

    #[test]
    fn test_rejects_non_finite_coordinates() {
        let raw = RawObservation {
            face: Some(vec![
                RawLandmark { x: 0.4, y: 0.2, z: None },
                RawLandmark { x: f64::NAN, y: 0.2, z: None },
            ]),
            ..Default::default()
        };
        assert_eq!(
            Observation::try_from(raw),
            Err(ObservationError::NonFinite { region: "face", index: 1 })
        );
    }

    #[test]
    fn test_non_finite_depth_is_dropped() {
        let raw = RawObservation {
            right_hand: Some(vec![RawLandmark { x: 0.4, y: 0.2, z: Some(f64::INFINITY) }]),
            ..Default::default()
        };
        let obs = Observation::try_from(raw).unwrap();
        assert_eq!(obs.right_hand[0].z, None);
    }
}
