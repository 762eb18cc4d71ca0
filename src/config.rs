// src/config.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::error::SetupError;

/// How a ball sitting inside a goal mouth is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalTrigger {
    /// Every frame with the ball inside a goal mouth counts as a goal.
    #[default]
    Level,
    /// Only the frame where the ball enters a goal mouth counts.
    Edge,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub roster_size: usize,
    pub sample_interval: u64,
    pub kick_separation_px: f64,
    pub kick_lateral_offset_px: f64,
    pub ball_vertical_offset_px: f64,
    pub dribble_drop_px: f64,
    pub min_keypoint_score: f64,
    pub goalkeeper_edge_margin_px: f64,
    pub possession_radius_px: f64,
    pub pass_speed_px: f64,
    pub goal_width_fraction: f64,
    pub goal_height_fraction: f64,
    pub goal_trigger: GoalTrigger,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            roster_size: 22,
            sample_interval: 10,
            kick_separation_px: 50.0,
            kick_lateral_offset_px: 20.0,
            ball_vertical_offset_px: 10.0,
            dribble_drop_px: 150.0,
            min_keypoint_score: 0.7,
            goalkeeper_edge_margin_px: 100.0,
            possession_radius_px: 30.0,
            pass_speed_px: 50.0,
            goal_width_fraction: 0.05,
            goal_height_fraction: 0.25,
            goal_trigger: GoalTrigger::Level,
        }
    }
}

impl AnalyzerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: AnalyzerConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Using default analyzer config: {:#}", e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), SetupError> {
        if self.roster_size == 0 {
            return Err(SetupError::InvalidConfig("roster_size must be at least 1".into()));
        }
        if self.sample_interval == 0 {
            return Err(SetupError::InvalidConfig("sample_interval must be at least 1".into()));
        }
        for (name, value) in [
            ("goal_width_fraction", self.goal_width_fraction),
            ("goal_height_fraction", self.goal_height_fraction),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(SetupError::InvalidConfig(format!(
                    "{name} must be in (0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}
