// src/ball.rs - Ball position inferred from body kinematics
use nalgebra::Point2;
use tracing::debug;

use crate::config::AnalyzerConfig;
use crate::pose::{Keypoint, KeypointName, Pose};

/// Last known ball position; `None` until the ball has been seen once.
pub type BallPosition = Option<Point2<f64>>;

/// Which heuristic produced a fresh ball estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallCue {
    Kick,
    Dribble,
    GoalkeeperHands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Both legs with scored knee and ankle keypoints.
struct Legs<'a> {
    left_knee: &'a Keypoint,
    right_knee: &'a Keypoint,
    left_ankle: (&'a Keypoint, f64),
    right_ankle: (&'a Keypoint, f64),
}

impl<'a> Legs<'a> {
    fn from_pose(pose: &'a Pose) -> Option<Self> {
        Some(Self {
            left_knee: pose.scored(KeypointName::LeftKnee)?.0,
            right_knee: pose.scored(KeypointName::RightKnee)?.0,
            left_ankle: pose.scored(KeypointName::LeftAnkle)?,
            right_ankle: pose.scored(KeypointName::RightAnkle)?,
        })
    }
}

pub struct BallEstimator {
    kick_separation: f64,
    lateral_offset: f64,
    vertical_offset: f64,
    dribble_drop: f64,
    min_score: f64,
    edge_margin: f64,
}

impl BallEstimator {
    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self {
            kick_separation: config.kick_separation_px,
            lateral_offset: config.kick_lateral_offset_px,
            vertical_offset: config.ball_vertical_offset_px,
            dribble_drop: config.dribble_drop_px,
            min_score: config.min_keypoint_score,
            edge_margin: config.goalkeeper_edge_margin_px,
        }
    }

    /// New ball position for this frame, or `previous` untouched when no
    /// pose gives a usable cue.
    pub fn estimate(&self, poses: &[&Pose], previous: BallPosition, frame_width: f64) -> BallPosition {
        match self.detect(poses, frame_width) {
            Some((position, cue)) => {
                debug!("Ball at ({:.1}, {:.1}) from {:?}", position.x, position.y, cue);
                Some(position)
            }
            None => previous,
        }
    }

    /// Runs the cues in priority order. Field players are scanned first, in
    /// slot order, and the first pose that shows a kick or a dribble wins;
    /// only then is the goalkeeper consulted.
    pub fn detect(&self, poses: &[&Pose], frame_width: f64) -> Option<(Point2<f64>, BallCue)> {
        for pose in poses {
            let Some(legs) = Legs::from_pose(pose) else {
                continue;
            };
            if let Some(position) = self.kick(&legs) {
                return Some((position, BallCue::Kick));
            }
            if let Some(position) = self.dribble(pose, &legs) {
                return Some((position, BallCue::Dribble));
            }
        }

        let goalkeeper = self.find_goalkeeper(poses, frame_width)?;
        self.goalkeeper_hands(goalkeeper)
            .map(|position| (position, BallCue::GoalkeeperHands))
    }

    fn kick(&self, legs: &Legs) -> Option<Point2<f64>> {
        let left_lift = (legs.left_knee.y - legs.left_ankle.0.y).abs();
        let right_lift = (legs.right_knee.y - legs.right_ankle.0.y).abs();
        if left_lift <= self.kick_separation && right_lift <= self.kick_separation {
            return None;
        }

        let (side, (ankle, score)) = if left_lift > right_lift {
            (Side::Left, legs.left_ankle)
        } else {
            (Side::Right, legs.right_ankle)
        };
        if score <= self.min_score {
            return None;
        }

        let direction = match side {
            Side::Left => -1.0,
            Side::Right => 1.0,
        };
        Some(Point2::new(
            ankle.x + direction * self.lateral_offset,
            ankle.y + self.vertical_offset,
        ))
    }

    fn dribble(&self, pose: &Pose, legs: &Legs) -> Option<Point2<f64>> {
        let reference = pose.reference()?;
        let floor = reference.y + self.dribble_drop;
        let (left, left_score) = legs.left_ankle;
        let (right, right_score) = legs.right_ankle;

        let is_low = left.y > floor || right.y > floor;
        if !is_low || (left_score <= self.min_score && right_score <= self.min_score) {
            return None;
        }

        let best = if left_score > right_score { left } else { right };
        Some(Point2::new(best.x, best.y + self.vertical_offset))
    }

    /// First pose whose nose sits near either side edge of the frame.
    fn find_goalkeeper<'a>(&self, poses: &[&'a Pose], frame_width: f64) -> Option<&'a Pose> {
        poses.iter().copied().find(|pose| {
            pose.keypoint(KeypointName::Nose).is_some_and(|nose| {
                nose.x < self.edge_margin || nose.x > frame_width - self.edge_margin
            })
        })
    }

    fn goalkeeper_hands(&self, goalkeeper: &Pose) -> Option<Point2<f64>> {
        let (left, left_score) = goalkeeper.scored(KeypointName::LeftWrist)?;
        let (right, right_score) = goalkeeper.scored(KeypointName::RightWrist)?;
        if left_score <= self.min_score && right_score <= self.min_score {
            return None;
        }
        let best = if left_score > right_score { left } else { right };
        Some(best.position())
    }
}
