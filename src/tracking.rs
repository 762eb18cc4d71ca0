// src/tracking.rs - Per-session analysis pipeline
use tracing::{debug, info, warn};

use crate::ball::BallEstimator;
use crate::buffer::PoseBuffer;
use crate::config::AnalyzerConfig;
use crate::detector::PoseDetector;
use crate::error::{AnalysisError, DetectError, SetupError};
use crate::events::EventDetector;
use crate::pose::Pose;
use crate::stats::{FrameObservation, GameStats, StatsAggregator};
use crate::video::Frame;

/// Everything one analysis session owns: the detector, the pose cache and
/// the running statistics. Create one per video, drop it when done.
pub struct MatchAnalyzer<D: PoseDetector> {
    detector: D,
    initialized: bool,
    buffer: PoseBuffer,
    ball: BallEstimator,
    aggregator: StatsAggregator,
}

impl<D: PoseDetector> MatchAnalyzer<D> {
    pub fn new(detector: D, config: AnalyzerConfig) -> Result<Self, SetupError> {
        config.validate()?;
        Ok(Self {
            detector,
            initialized: false,
            buffer: PoseBuffer::new(config.roster_size, config.sample_interval),
            ball: BallEstimator::from_config(&config),
            aggregator: StatsAggregator::new(config.roster_size, EventDetector::from_config(&config)),
        })
    }

    /// Brings up the pose model. Must succeed before frames produce detections.
    pub async fn initialize(&mut self) -> Result<(), SetupError> {
        if self.initialized {
            debug!("Pose detector already initialized");
            return Ok(());
        }
        info!("Initializing pose detector...");
        self.detector.initialize().await?;
        self.initialized = true;
        info!("Pose detector initialized");
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.initialized
    }

    /// Analyzes one frame. A frame that fails for any reason yields
    /// [`GameStats::reset`] and leaves the accumulated totals as they were.
    pub async fn analyze_frame(&mut self, frame: &Frame) -> GameStats {
        match self.try_analyze_frame(frame).await {
            Ok(stats) => stats,
            Err(e) => {
                warn!("Error analyzing frame {}: {}", frame.sequence, e);
                GameStats::reset()
            }
        }
    }

    pub async fn try_analyze_frame(&mut self, frame: &Frame) -> Result<GameStats, AnalysisError> {
        if let Some(pose) = self.detect(frame).await? {
            if !pose.is_finite() {
                return Err(AnalysisError::NonFiniteCoordinate("detected pose"));
            }
            self.buffer.assign(pose);
        }

        let poses: Vec<(usize, &Pose)> = self.buffer.poses().collect();
        let bodies: Vec<&Pose> = poses.iter().map(|(_, pose)| *pose).collect();
        let ball = self
            .ball
            .estimate(&bodies, self.aggregator.previous_ball(), frame.width_px());

        self.aggregator.fold(&FrameObservation {
            poses: &poses,
            ball,
            frame_width: frame.width_px(),
            frame_height: frame.height_px(),
            timestamp: frame.timestamp,
        })
    }

    /// Runs the detector on sampling frames only. The frame counter moves
    /// on every call, whatever the outcome.
    async fn detect(&mut self, frame: &Frame) -> Result<Option<Pose>, DetectError> {
        let sampling = self.buffer.is_sampling_frame();
        self.buffer.advance_frame();
        if !sampling {
            return Ok(None);
        }
        if !self.initialized {
            warn!("Frame {} analyzed before the pose detector was ready", frame.sequence);
            return Ok(None);
        }
        self.detector.estimate(frame).await
    }

    /// Statistics as of the last successfully analyzed frame.
    pub fn snapshot(&self) -> GameStats {
        self.aggregator.snapshot()
    }

    pub fn frames_seen(&self) -> u64 {
        self.buffer.frame_counter()
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Releases the pose model. Safe to call more than once, and a no-op
    /// when the detector never finished initializing.
    pub fn dispose(&mut self) {
        if self.initialized {
            info!("Shutting down pose detector...");
            self.detector.dispose();
            self.initialized = false;
        }
    }
}

impl<D: PoseDetector> Drop for MatchAnalyzer<D> {
    fn drop(&mut self) {
        self.dispose();
    }
}
