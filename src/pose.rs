// src/pose.rs
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// BlazePose landmark names the heuristics look up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeypointName {
    Nose,
    LeftWrist,
    RightWrist,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl KeypointName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
        }
    }
}

/// A named landmark in frame pixel coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub name: String,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl Keypoint {
    pub fn new(name: impl Into<String>, x: f64, y: f64, score: Option<f64>) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            score,
        }
    }

    pub fn position(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }

    /// Score, treating a missing or zero score as no score at all.
    pub fn confidence(&self) -> Option<f64> {
        self.score.filter(|s| *s != 0.0)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// One detected body. Keypoint order is significant: the first one is the
/// reference point used as the player's position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub keypoints: Vec<Keypoint>,
}

impl Pose {
    pub fn new(keypoints: Vec<Keypoint>) -> Self {
        Self { keypoints }
    }

    pub fn keypoint(&self, name: KeypointName) -> Option<&Keypoint> {
        let name = name.as_str();
        self.keypoints.iter().find(|kp| kp.name == name)
    }

    /// Keypoint that is present and carries a non-zero score.
    pub fn scored(&self, name: KeypointName) -> Option<(&Keypoint, f64)> {
        self.keypoint(name)
            .and_then(|kp| kp.confidence().map(|score| (kp, score)))
    }

    pub fn reference(&self) -> Option<&Keypoint> {
        self.keypoints.first()
    }

    pub fn reference_position(&self) -> Option<Point2<f64>> {
        self.reference().map(Keypoint::position)
    }

    pub fn is_finite(&self) -> bool {
        self.keypoints.iter().all(Keypoint::is_finite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pose() -> Pose {
        Pose::new(vec![
            Keypoint::new("nose", 100.0, 50.0, Some(0.9)),
            Keypoint::new("left_ankle", 95.0, 240.0, Some(0.0)),
            Keypoint::new("right_ankle", 110.0, 238.0, None),
            Keypoint::new("left_knee", 96.0, 180.0, Some(0.8)),
        ])
    }

    #[test]
    fn test_lookup_by_name() {
        let pose = sample_pose();
        let knee = pose.keypoint(KeypointName::LeftKnee).unwrap();
        assert_eq!(knee.y, 180.0);
        assert!(pose.keypoint(KeypointName::RightWrist).is_none());
    }

    #[test]
    fn test_zero_or_missing_score_is_unscored() {
        let pose = sample_pose();
        assert!(pose.keypoint(KeypointName::LeftAnkle).is_some());
        assert!(pose.scored(KeypointName::LeftAnkle).is_none());
        assert!(pose.scored(KeypointName::RightAnkle).is_none());
        let (_, score) = pose.scored(KeypointName::LeftKnee).unwrap();
        assert!((score - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_reference_is_first_keypoint() {
        let pose = sample_pose();
        assert_eq!(pose.reference_position(), Some(Point2::new(100.0, 50.0)));
        assert_eq!(Pose::default().reference_position(), None);
    }

    #[test]
    fn test_non_finite_detection() {
        let mut pose = sample_pose();
        assert!(pose.is_finite());
        pose.keypoints[2].x = f64::NAN;
        assert!(!pose.is_finite());
    }

    #[test]
    fn test_deserialize_without_score() {
        let kp: Keypoint = serde_json::from_str(r#"{"name":"nose","x":1.0,"y":2.0}"#).unwrap();
        assert_eq!(kp.score, None);
    }
}
