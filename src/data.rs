// src/data.rs
use crate::stats::GameStats;
use anyhow::{Context, Result};
use chrono::Local;
use csv::Writer;
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
struct TimelineRecord {
    frame: usize,
    timestamp: f64,
    analyzed: bool,
    goals: u64,
    total_passes: u64,
    team1_possession: u32,
    team2_possession: u32,
    active_players: usize,
}

#[derive(Debug, Serialize)]
struct PlayerRecord {
    id: usize,
    team: u8,
    x: f64,
    y: f64,
    distance_covered: f64,
    possession_frames: u64,
    passes: u64,
    ball_lost: u64,
    ball_recovered: u64,
}

/// Collects the snapshot of every analyzed frame and writes them out at the
/// end of a session.
pub struct DataExporter {
    output_dir: PathBuf,
    session_name: String,
    roster_size: usize,
    snapshots: Vec<GameStats>,
}

impl DataExporter {
    pub fn new(output_dir: impl AsRef<Path>, session_name: Option<String>, roster_size: usize) -> Self {
        let session_name = session_name.unwrap_or_else(|| {
            format!("session_{}", Local::now().format("%Y%m%d_%H%M%S"))
        });

        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            session_name,
            roster_size,
            snapshots: Vec::new(),
        }
    }

    pub fn add_frame(&mut self, stats: GameStats) {
        self.snapshots.push(stats);
    }

    pub fn frame_count(&self) -> usize {
        self.snapshots.len()
    }

    pub fn session_dir(&self) -> PathBuf {
        self.output_dir.join(&self.session_name)
    }

    /// Last snapshot that was not a faulted frame.
    pub fn final_stats(&self) -> GameStats {
        self.snapshots
            .iter()
            .rev()
            .find(|s| !s.is_reset())
            .cloned()
            .unwrap_or_else(GameStats::initial)
    }

    fn create_session_file(&self, name: &str) -> Result<(PathBuf, File)> {
        let path = self.session_dir().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let file = File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
        Ok((path, file))
    }

    pub fn export_timeline_csv(&self) -> Result<PathBuf> {
        let (path, file) = self.create_session_file("timeline.csv")?;
        let mut writer = Writer::from_writer(file);

        for (frame, stats) in self.snapshots.iter().enumerate() {
            writer.serialize(TimelineRecord {
                frame,
                timestamp: stats.timestamp,
                analyzed: !stats.is_reset(),
                goals: stats.goals,
                total_passes: stats.total_passes,
                team1_possession: stats.possession.team1,
                team2_possession: stats.possession.team2,
                active_players: stats.players.len(),
            })?;
        }

        writer.flush()?;
        Ok(path)
    }

    pub fn export_players_csv(&self) -> Result<PathBuf> {
        let (path, file) = self.create_session_file("players.csv")?;
        let mut writer = Writer::from_writer(file);
        let half = self.roster_size / 2;

        for player in self.final_stats().players {
            writer.serialize(PlayerRecord {
                id: player.id,
                team: if player.id < half { 1 } else { 2 },
                x: player.position.x,
                y: player.position.y,
                distance_covered: player.distance_covered,
                possession_frames: player.possession,
                passes: player.passes,
                ball_lost: player.ball_lost,
                ball_recovered: player.ball_recovered,
            })?;
        }

        writer.flush()?;
        Ok(path)
    }

    pub fn export_summary_json(&self) -> Result<PathBuf> {
        let (path, file) = self.create_session_file("summary.json")?;
        serde_json::to_writer_pretty(file, &self.final_stats())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}
