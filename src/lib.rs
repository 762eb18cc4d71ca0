//! Match statistics for team sports, inferred frame by frame from human pose
//! detections: player movement, possession, passes and goals.
//!
//! A session is a [`tracking::MatchAnalyzer`] wrapping some
//! [`detector::PoseDetector`]; each call to `analyze_frame` returns the
//! running [`stats::GameStats`].

pub mod ball;
pub mod buffer;
pub mod config;
pub mod data;
pub mod detector;
pub mod error;
pub mod events;
pub mod pose;
pub mod stats;
pub mod tracking;
pub mod video;

pub use config::{AnalyzerConfig, GoalTrigger};
pub use detector::{PoseDetector, PoseScript, ScriptedDetector};
pub use error::{AnalysisError, DetectError, SetupError};
pub use stats::{GameStats, PlayerStats, Possession};
pub use tracking::MatchAnalyzer;
pub use video::Frame;
