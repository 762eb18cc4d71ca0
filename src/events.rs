// src/events.rs - Possession, pass and goal classification
use nalgebra::{distance, Point2};

use crate::ball::BallPosition;
use crate::config::{AnalyzerConfig, GoalTrigger};

/// Possession state of one player across the previous and current ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PossessionChange {
    pub had: bool,
    pub has: bool,
}

impl PossessionChange {
    pub fn recovered(&self) -> bool {
        !self.had && self.has
    }

    pub fn lost(&self) -> bool {
        self.had && !self.has
    }
}

pub struct EventDetector {
    possession_radius: f64,
    pass_speed: f64,
    goal_width_fraction: f64,
    goal_height_fraction: f64,
    goal_trigger: GoalTrigger,
}

impl EventDetector {
    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self {
            possession_radius: config.possession_radius_px,
            pass_speed: config.pass_speed_px,
            goal_width_fraction: config.goal_width_fraction,
            goal_height_fraction: config.goal_height_fraction,
            goal_trigger: config.goal_trigger,
        }
    }

    pub fn within_reach(&self, player: &Point2<f64>, ball: &Point2<f64>) -> bool {
        distance(player, ball) < self.possession_radius
    }

    /// "Had" compares the player's current position against the previous
    /// ball, not the player's previous position. Changing this shifts the
    /// lost/recovered counts.
    pub fn possession(
        &self,
        player: &Point2<f64>,
        previous_ball: BallPosition,
        ball: &Point2<f64>,
    ) -> PossessionChange {
        PossessionChange {
            had: previous_ball.is_some_and(|prev| self.within_reach(player, &prev)),
            has: self.within_reach(player, ball),
        }
    }

    /// Frame-to-frame ball displacement above the pass speed, whoever holds it.
    pub fn is_pass(&self, previous_ball: BallPosition, ball: BallPosition) -> bool {
        match (previous_ball, ball) {
            (Some(prev), Some(curr)) => distance(&prev, &curr) > self.pass_speed,
            _ => false,
        }
    }

    /// Goal mouths are strips at both side edges, vertically centered.
    pub fn in_goal_mouth(&self, ball: &Point2<f64>, frame_width: f64, frame_height: f64) -> bool {
        let mouth_width = frame_width * self.goal_width_fraction;
        let mouth_height = frame_height * self.goal_height_fraction;
        let top = (frame_height - mouth_height) / 2.0;
        let bottom = (frame_height + mouth_height) / 2.0;

        let in_band = ball.y > top && ball.y < bottom;
        in_band && (ball.x < mouth_width || ball.x > frame_width - mouth_width)
    }

    /// Whether this frame adds a goal, given where the ball was last frame.
    pub fn counts_goal(&self, inside: bool, was_inside: bool) -> bool {
        match self.goal_trigger {
            GoalTrigger::Level => inside,
            GoalTrigger::Edge => inside && !was_inside,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> EventDetector {
        EventDetector::from_config(&AnalyzerConfig::default())
    }

    #[test]
    fn test_possession_within_radius() {
        let player = Point2::new(110.0, 205.0);
        let ball = Point2::new(100.0, 200.0);
        assert!(detector().within_reach(&player, &ball));
        assert!(!detector().within_reach(&Point2::new(140.0, 200.0), &ball));
    }

    #[test]
    fn test_possession_transitions() {
        let det = detector();
        let player = Point2::new(100.0, 100.0);

        let change = det.possession(&player, None, &Point2::new(105.0, 100.0));
        assert!(change.recovered());

        let change = det.possession(&player, Some(Point2::new(105.0, 100.0)), &Point2::new(300.0, 100.0));
        assert!(change.lost());

        let change = det.possession(&player, Some(Point2::new(105.0, 100.0)), &Point2::new(95.0, 100.0));
        assert!(!change.lost() && !change.recovered());
        assert!(change.has);
    }

    #[test]
    fn test_pass_threshold() {
        let det = detector();
        let prev = Some(Point2::new(100.0, 200.0));
        assert!(det.is_pass(prev, Some(Point2::new(100.0, 260.0))));
        assert!(!det.is_pass(prev, Some(Point2::new(100.0, 250.0))));
        assert!(!det.is_pass(None, Some(Point2::new(100.0, 260.0))));
        assert!(!det.is_pass(prev, None));
    }

    #[test]
    fn test_goal_mouths() {
        let det = detector();
        assert!(det.in_goal_mouth(&Point2::new(30.0, 300.0), 1000.0, 600.0));
        assert!(det.in_goal_mouth(&Point2::new(970.0, 300.0), 1000.0, 600.0));
        assert!(!det.in_goal_mouth(&Point2::new(50.0, 300.0), 1000.0, 600.0));
        assert!(!det.in_goal_mouth(&Point2::new(30.0, 50.0), 1000.0, 600.0));
        assert!(!det.in_goal_mouth(&Point2::new(500.0, 300.0), 1000.0, 600.0));
    }

    #[test]
    fn test_goal_trigger_modes() {
        let level = detector();
        assert!(level.counts_goal(true, true));
        assert!(level.counts_goal(true, false));

        let edge = EventDetector::from_config(&AnalyzerConfig {
            goal_trigger: GoalTrigger::Edge,
            ..AnalyzerConfig::default()
        });
        assert!(edge.counts_goal(true, false));
        assert!(!edge.counts_goal(true, true));
        assert!(!edge.counts_goal(false, true));
    }
}
