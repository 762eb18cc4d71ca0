use std::path::PathBuf;

use pitch_analyzer::{AnalyzerConfig, GameStats, MatchAnalyzer, PoseScript, Possession, ScriptedDetector};

fn demo_script() -> PoseScript {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/replay.json");
    PoseScript::load(path).unwrap()
}

async fn replay(script: &PoseScript) -> (Vec<GameStats>, u64) {
    let mut analyzer = MatchAnalyzer::new(ScriptedDetector::new(script), AnalyzerConfig::default()).unwrap();
    analyzer.initialize().await.unwrap();

    let mut snapshots = Vec::new();
    for frame in script.frames() {
        snapshots.push(analyzer.analyze_frame(&frame).await);
    }
    let calls = analyzer.detector().calls();
    analyzer.dispose();
    assert!(analyzer.detector().is_disposed());
    (snapshots, calls)
}

#[tokio::test]
async fn test_demo_replay() {
    let script = demo_script();
    let (snapshots, calls) = replay(&script).await;

    assert_eq!(snapshots.len(), 40);
    assert_eq!(calls, 4);

    // The detector fails on frame 20; that frame alone reports the reset shape.
    assert!(snapshots[20].is_reset());
    assert!(snapshots.iter().enumerate().all(|(i, s)| i == 20 || !s.is_reset()));

    let last = snapshots.last().unwrap();
    let ids: Vec<usize> = last.players.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![0, 1, 2]);

    // The kicker in slot 1 shadows the goalkeeper that arrives later, so
    // the ball stays at the kicker's foot from frame 10 on.
    let kicker = &last.players[1];
    assert_eq!(kicker.possession, 29);
    assert_eq!(kicker.ball_recovered, 1);
    assert_eq!(kicker.ball_lost, 0);
    assert_eq!(last.total_passes, 0);
    assert_eq!(last.goals, 0);
    assert_eq!(last.possession, Possession { team1: 100, team2: 0 });
    assert!((last.timestamp - 39.0 / 25.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_possession_held_at_default_until_first_touch() {
    let script = demo_script();
    let (snapshots, _) = replay(&script).await;
    for stats in &snapshots[..10] {
        assert_eq!(stats.possession, Possession { team1: 50, team2: 50 });
    }
    assert_eq!(snapshots[10].possession, Possession { team1: 100, team2: 0 });
}
