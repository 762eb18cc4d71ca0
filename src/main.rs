// src/main.rs
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pitch_analyzer::data::DataExporter;
use pitch_analyzer::{AnalyzerConfig, GoalTrigger, MatchAnalyzer, PoseScript, ScriptedDetector};

#[derive(Parser)]
#[command(name = "pitch_analyzer")]
#[command(about = "Derive match statistics from a recorded pose script", long_about = None)]
struct Cli {
    /// Pose script JSON (video geometry plus per-frame detections)
    script: PathBuf,

    /// Analyzer config JSON; defaults are used for anything missing
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory that receives the session folder
    #[arg(long)]
    output: Option<PathBuf>,

    /// Session folder name (defaults to a timestamp)
    #[arg(long)]
    session: Option<String>,

    /// Count a goal only when the ball enters the goal mouth
    #[arg(long, default_value = "false")]
    edge_goals: bool,
}

fn default_output_dir() -> PathBuf {
    directories::UserDirs::new()
        .and_then(|dirs| dirs.document_dir().map(|p| p.join("PitchAnalyzer")))
        .unwrap_or_else(|| PathBuf::from("./output"))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AnalyzerConfig::load(path)?,
        None => AnalyzerConfig::default(),
    };
    if cli.edge_goals {
        config.goal_trigger = GoalTrigger::Edge;
    }

    let script = PoseScript::load(&cli.script)?;
    info!(
        "Replaying {} frames ({}x{} @ {} fps) from {}",
        script.frame_count,
        script.width,
        script.height,
        script.fps,
        cli.script.display()
    );

    let roster_size = config.roster_size;
    let mut analyzer = MatchAnalyzer::new(ScriptedDetector::new(&script), config)?;
    analyzer
        .initialize()
        .await
        .context("Failed to initialize the pose detector")?;

    let output_dir = cli.output.unwrap_or_else(default_output_dir);
    let mut exporter = DataExporter::new(&output_dir, cli.session, roster_size);

    for frame in script.frames() {
        let stats = analyzer.analyze_frame(&frame).await;
        exporter.add_frame(stats);
    }

    let summary = exporter.final_stats();
    info!(
        "Finished at {:.2}s: {} goals, {} passes, possession {}% / {}%, {} players tracked",
        summary.timestamp,
        summary.goals,
        summary.total_passes,
        summary.possession.team1,
        summary.possession.team2,
        summary.players.len()
    );

    let timeline = exporter.export_timeline_csv()?;
    let players = exporter.export_players_csv()?;
    let json = exporter.export_summary_json()?;
    info!("Exported {}", timeline.display());
    info!("Exported {}", players.display());
    info!("Exported {}", json.display());

    analyzer.dispose();
    Ok(())
}
