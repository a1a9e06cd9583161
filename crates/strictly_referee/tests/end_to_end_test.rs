//! End-to-end tests driving the real peer binaries.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use strictly_referee::{
    ChannelId, GameConfig, GameEvent, GameMode, Orchestrator, Outcome, PeerError, PeerSpec,
    Player, SessionError, attach,
};

fn bot_config(dir: &Path) -> GameConfig {
    GameConfig::default()
        .with_channel_dir(dir.to_path_buf())
        .with_bot_executable(PathBuf::from(env!("CARGO_BIN_EXE_ttt-bot")))
        .with_ordered_bot_executable(PathBuf::from(env!("CARGO_BIN_EXE_ttt-bot-ordered")))
}

#[tokio::test]
async fn test_bot_vs_bot_reaches_a_result() {
    let dir = tempfile::tempdir().unwrap();
    let orchestrator = Orchestrator::new(bot_config(dir.path()));

    let mut moves = 0;
    let mut invalid = 0;
    let outcome = orchestrator
        .run(GameMode::BotVsBot, |event| match event {
            GameEvent::MoveMade { .. } => moves += 1,
            GameEvent::InvalidMove { .. } => invalid += 1,
            _ => {}
        })
        .await
        .unwrap();

    assert_eq!(invalid, 0);
    assert!((5..=9).contains(&moves));
    if let Outcome::Won { player, .. } = &outcome {
        assert!(player == "Bot1" || player == "Bot2");
    }

    // Nothing left behind in the channel directory.
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_attached_bot_answers_and_terminates_twice() {
    let dir = tempfile::tempdir().unwrap();
    let id = ChannelId::for_seat(dir.path(), "Bot2");
    let spec = PeerSpec::new(
        "Bot2".into(),
        PathBuf::from(env!("CARGO_BIN_EXE_ttt-bot-ordered")),
    );

    let mut endpoint = attach(&spec, id.clone(), 512, Duration::from_secs(10))
        .await
        .unwrap();
    assert!(endpoint.is_attached());
    assert_eq!(endpoint.request_move("XO       \n").await.unwrap(), "2\n");
    assert_eq!(endpoint.request_move("XOXOXOXO \n").await.unwrap(), "8\n");

    endpoint.terminate().await;
    endpoint.terminate().await;
    assert!(!endpoint.is_attached());
    assert!(endpoint.request_move("         \n").await.is_err());
    assert!(!id.path().exists());
}

#[tokio::test]
async fn test_missing_peer_program_aborts_setup() {
    let dir = tempfile::tempdir().unwrap();
    let config = bot_config(dir.path()).with_ordered_bot_executable(dir.path().join("missing"));

    let err = Orchestrator::new(config)
        .run(GameMode::BotVsBot, |_| {})
        .await
        .unwrap_err();

    match &err {
        SessionError::Setup { peer, source } => {
            assert_eq!(peer, "Bot2");
            assert!(matches!(source, PeerError::Spawn { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.peer(), Some("Bot2"));
}

/// Launcher that appends each peer's pid to `pid_file` before running it.
fn recording_launcher(pid_file: &Path, redirect: &str) -> Vec<String> {
    vec![
        "sh".into(),
        "-c".into(),
        format!(r#"echo $$ >> '{}'; exec "$@" {}"#, pid_file.display(), redirect),
        "sh".into(),
    ]
}

fn recorded_pids(pid_file: &Path) -> Vec<String> {
    std::fs::read_to_string(pid_file)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

fn is_running(pid: &str) -> bool {
    std::process::Command::new("sh")
        .args(["-c", &format!("kill -0 {} 2>/dev/null", pid)])
        .status()
        .unwrap()
        .success()
}

#[tokio::test]
async fn test_setup_abort_terminates_attached_peer() {
    let dir = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    let pid_file = scratch.path().join("pids");
    let config = bot_config(dir.path())
        .with_ordered_bot_executable(scratch.path().join("missing"))
        .with_launcher(recording_launcher(&pid_file, ""));

    let err = Orchestrator::new(config)
        .run(GameMode::BotVsBot, |_| {})
        .await
        .unwrap_err();

    // The shell starts, so the missing program shows up as an early exit.
    match &err {
        SessionError::Setup { peer, source } => {
            assert_eq!(peer, "Bot2");
            assert!(matches!(source, PeerError::ExitedEarly { .. }), "{source}");
        }
        other => panic!("unexpected error: {other}"),
    }

    let pids = recorded_pids(&pid_file);
    assert_eq!(pids.len(), 2);
    for pid in &pids {
        assert!(!is_running(pid), "peer {pid} still running");
    }
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_peer_dropping_mid_game_terminates_both_peers() {
    let dir = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    let pid_file = scratch.path().join("pids");
    // The human peer reads end-of-file for its first move and quits.
    let config = bot_config(dir.path())
        .with_human_executable(PathBuf::from(env!("CARGO_BIN_EXE_ttt-human")))
        .with_launcher(recording_launcher(&pid_file, "< /dev/null"));

    let err = Orchestrator::new(config)
        .run(GameMode::HumanVsBot, |_| {})
        .await
        .unwrap_err();

    match &err {
        SessionError::Communication { peer, .. } => assert_eq!(peer, "Human1"),
        other => panic!("unexpected error: {other}"),
    }

    let pids = recorded_pids(&pid_file);
    assert_eq!(pids.len(), 2);
    for pid in &pids {
        assert!(!is_running(pid), "peer {pid} still running");
    }
}

#[tokio::test]
async fn test_cancel_during_setup_leaves_nothing_behind() {
    let dir = tempfile::tempdir().unwrap();
    // Every peer sleeps instead of attaching; the attach timeout stays at 30s.
    let config = bot_config(dir.path()).with_launcher(vec![
        "sh".into(),
        "-c".into(),
        "exec sleep 30".into(),
        "sh".into(),
    ]);

    let started = Instant::now();
    let err = Orchestrator::new(config)
        .run_until(
            GameMode::BotVsBot,
            |_| {},
            tokio::time::sleep(Duration::from_millis(300)),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::Interrupted), "{err}");
    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
