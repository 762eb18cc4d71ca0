// src/stats.rs - Running match statistics
use nalgebra::{distance, Point2};
use serde::{Deserialize, Serialize};

use crate::ball::BallPosition;
use crate::error::AnalysisError;
use crate::events::EventDetector;
use crate::pose::Pose;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Roster slot the player's poses are written to.
    pub id: usize,
    pub position: Point2<f64>,
    pub distance_covered: f64,
    /// Frames in which the player was within reach of the ball.
    pub possession: u64,
    pub passes: u64,
    pub ball_lost: u64,
    pub ball_recovered: u64,
}

impl PlayerStats {
    fn new(id: usize, position: Point2<f64>) -> Self {
        Self {
            id,
            position,
            distance_covered: 0.0,
            possession: 0,
            passes: 0,
            ball_lost: 0,
            ball_recovered: 0,
        }
    }
}

/// Possession split in whole percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Possession {
    pub team1: u32,
    pub team2: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStats {
    pub players: Vec<PlayerStats>,
    pub goals: u64,
    pub total_passes: u64,
    pub possession: Possession,
    pub timestamp: f64,
}

impl GameStats {
    /// Snapshot at the start of a session.
    pub fn initial() -> Self {
        Self {
            players: Vec::new(),
            goals: 0,
            total_passes: 0,
            possession: Possession { team1: 50, team2: 50 },
            timestamp: 0.0,
        }
    }

    /// Snapshot returned for a frame whose statistics could not be computed.
    pub fn reset() -> Self {
        Self {
            possession: Possession { team1: 0, team2: 0 },
            ..Self::initial()
        }
    }

    pub fn is_reset(&self) -> bool {
        *self == Self::reset()
    }
}

/// What one frame contributes to the running totals.
pub struct FrameObservation<'a> {
    pub poses: &'a [(usize, &'a Pose)],
    pub ball: BallPosition,
    pub frame_width: f64,
    pub frame_height: f64,
    pub timestamp: f64,
}

#[derive(Debug, Clone)]
struct MatchState {
    players: Vec<Option<PlayerStats>>,
    goals: u64,
    total_passes: u64,
    possession: Possession,
    previous_ball: BallPosition,
    ball_in_goal: bool,
    timestamp: f64,
}

/// Owns the session's accumulated statistics.
pub struct StatsAggregator {
    state: MatchState,
    events: EventDetector,
}

impl StatsAggregator {
    pub fn new(roster_size: usize, events: EventDetector) -> Self {
        let initial = GameStats::initial();
        Self {
            state: MatchState {
                players: vec![None; roster_size],
                goals: initial.goals,
                total_passes: initial.total_passes,
                possession: initial.possession,
                previous_ball: None,
                ball_in_goal: false,
                timestamp: initial.timestamp,
            },
            events,
        }
    }

    pub fn previous_ball(&self) -> BallPosition {
        self.state.previous_ball
    }

    /// Folds one frame into the totals. The update is applied to a copy and
    /// committed only if the whole frame succeeds.
    pub fn fold(&mut self, frame: &FrameObservation) -> Result<GameStats, AnalysisError> {
        let mut staged = self.state.clone();
        staged.apply(&self.events, frame)?;
        self.state = staged;
        Ok(self.snapshot())
    }

    pub fn snapshot(&self) -> GameStats {
        GameStats {
            players: self.state.players.iter().flatten().cloned().collect(),
            goals: self.state.goals,
            total_passes: self.state.total_passes,
            possession: self.state.possession,
            timestamp: self.state.timestamp,
        }
    }
}

impl MatchState {
    fn apply(&mut self, events: &EventDetector, frame: &FrameObservation) -> Result<(), AnalysisError> {
        if frame.ball.is_some_and(|b| !(b.x.is_finite() && b.y.is_finite())) {
            return Err(AnalysisError::NonFiniteCoordinate("ball estimate"));
        }

        let is_pass = events.is_pass(self.previous_ball, frame.ball);

        for &(slot, pose) in frame.poses {
            let Some(position) = pose.reference_position() else {
                continue;
            };
            if !(position.x.is_finite() && position.y.is_finite()) {
                return Err(AnalysisError::NonFiniteCoordinate("player position"));
            }
            let player = self
                .players
                .get_mut(slot)
                .ok_or(AnalysisError::SlotOutOfRange(slot))?;

            if let Some(stats) = player.as_mut() {
                stats.distance_covered += distance(&stats.position, &position);
            }
            let stats = player.get_or_insert_with(|| PlayerStats::new(slot, position));
            stats.position = position;

            let Some(ball) = frame.ball else {
                continue;
            };
            let change = events.possession(&position, self.previous_ball, &ball);
            if change.has {
                stats.possession += 1;
                if is_pass {
                    stats.passes += 1;
                    self.total_passes += 1;
                }
            }
            if change.lost() {
                stats.ball_lost += 1;
            } else if change.recovered() {
                stats.ball_recovered += 1;
            }
        }

        if let Some(ball) = frame.ball {
            let inside = events.in_goal_mouth(&ball, frame.frame_width, frame.frame_height);
            if events.counts_goal(inside, self.ball_in_goal) {
                self.goals += 1;
            }
            self.ball_in_goal = inside;
            self.previous_ball = Some(ball);
        }

        self.update_possession();
        self.timestamp = frame.timestamp;
        Ok(())
    }

    fn update_possession(&mut self) {
        let half = self.players.len() / 2;
        let (team1, total) = self
            .players
            .iter()
            .flatten()
            .fold((0u64, 0u64), |(team1, total), p| {
                let own = if p.id < half { p.possession } else { 0 };
                (team1 + own, total + p.possession)
            });
        if total == 0 {
            return;
        }
        let team1_pct = ((team1 as f64 / total as f64) * 100.0).round() as u32;
        self.possession = Possession {
            team1: team1_pct,
            team2: 100 - team1_pct,
        };
    }
}
