// src/detector.rs - Pose detection capability and a replaying implementation
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{DetectError, SetupError};
use crate::pose::Pose;
use crate::video::Frame;

/// The pose model as seen by the analyzer.
///
/// `estimate` is the only call the pipeline awaits; it returns at most one
/// pose per frame. `dispose` must tolerate being called on a detector that
/// never finished `initialize`.
#[async_trait]
pub trait PoseDetector: Send {
    async fn initialize(&mut self) -> Result<(), SetupError>;

    async fn estimate(&mut self, frame: &Frame) -> Result<Option<Pose>, DetectError>;

    fn dispose(&mut self);
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptedDetection {
    pub frame: u64,
    pub pose: Pose,
}

/// A recorded detection run: the video's geometry plus the pose the model
/// produced at given frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoseScript {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub frame_count: u64,
    #[serde(default)]
    pub detections: Vec<ScriptedDetection>,
    /// Frames on which the detector reports a failure.
    #[serde(default)]
    pub faults: Vec<u64>,
}

impl PoseScript {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read pose script {}", path.display()))?;
        let script: PoseScript = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse pose script {}", path.display()))?;
        if script.fps <= 0.0 {
            anyhow::bail!("Pose script {} has a non-positive fps", path.display());
        }
        Ok(script)
    }

    /// Playback frames in order, without pixels.
    pub fn frames(&self) -> impl Iterator<Item = Frame> + '_ {
        (0..self.frame_count).map(move |i| {
            Frame::without_raster(self.width, self.height, i, i as f64 / self.fps)
        })
    }
}

/// Replays a [`PoseScript`], keyed by frame sequence number.
pub struct ScriptedDetector {
    poses: HashMap<u64, Pose>,
    faults: HashSet<u64>,
    initialized: bool,
    disposed: bool,
    calls: u64,
}

impl ScriptedDetector {
    pub fn new(script: &PoseScript) -> Self {
        Self {
            poses: script
                .detections
                .iter()
                .map(|d| (d.frame, d.pose.clone()))
                .collect(),
            faults: script.faults.iter().copied().collect(),
            initialized: false,
            disposed: false,
            calls: 0,
        }
    }

    /// Number of `estimate` calls served so far.
    pub fn calls(&self) -> u64 {
        self.calls
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

#[async_trait]
impl PoseDetector for ScriptedDetector {
    async fn initialize(&mut self) -> Result<(), SetupError> {
        if self.disposed {
            return Err(SetupError::ModelLoad("detector was already disposed".into()));
        }
        self.initialized = true;
        info!("Scripted detector ready ({} recorded poses)", self.poses.len());
        Ok(())
    }

    async fn estimate(&mut self, frame: &Frame) -> Result<Option<Pose>, DetectError> {
        if self.disposed {
            return Err(DetectError::Disposed);
        }
        if !self.initialized {
            return Err(DetectError::NotInitialized);
        }
        self.calls += 1;
        if self.faults.contains(&frame.sequence) {
            return Err(DetectError::Estimation {
                frame: frame.sequence,
                reason: "scripted fault".into(),
            });
        }
        let pose = self.poses.get(&frame.sequence).cloned();
        debug!("Detected poses on frame {}: {}", frame.sequence, usize::from(pose.is_some()));
        Ok(pose)
    }

    fn dispose(&mut self) {
        if !self.disposed {
            self.poses.clear();
            self.disposed = true;
            self.initialized = false;
        }
    }
}
