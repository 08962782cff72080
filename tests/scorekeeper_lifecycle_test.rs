//! Scorekeeper behavior against the mock backend: persist-then-apply,
//! lifecycle gating, and replay consistency between incremental updates
//! and a fresh load.

use artel_ledger::datasource::{MockBackend, ParticipantRecord};
use artel_ledger::domain::{default_catalog, BallColor, QueueAlgorithm};
use artel_ledger::{
    AppError, EntryPatch, Game, GameId, GameStatus, ParticipantId, Rubles, Scorekeeper, Session,
    SessionId, Template, TemplateId,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Arc;
use uuid::Uuid;

fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 18, 0, 0).unwrap()
}

fn game_id() -> GameId {
    GameId::new(Uuid::from_u128(0x6A))
}

fn session_id() -> SessionId {
    SessionId::new(Uuid::from_u128(0x5E))
}

fn template_id() -> TemplateId {
    TemplateId::new(Uuid::from_u128(0x7E))
}

fn pid(n: u128) -> ParticipantId {
    ParticipantId::new(Uuid::from_u128(n))
}

fn make_game() -> Game {
    Game {
        id: game_id(),
        session_id: session_id(),
        game_number: 2,
        status: GameStatus::InProgress,
        started_at: start_time(),
        completed_at: None,
        winner_participant_id: None,
    }
}

fn make_session() -> Session {
    Session {
        id: session_id(),
        template_id: Some(template_id()),
        name: "Friday kolkhoz".to_string(),
        status: "in_progress".to_string(),
        created_at: start_time() - Duration::hours(1),
    }
}

fn make_template(price: i64) -> Template {
    Template {
        id: template_id(),
        ball_catalog: default_catalog(),
        point_value_rubles: Some(Rubles::from_whole(price)),
        queue_algorithm: QueueAlgorithm::Manual,
        balls_to_win: Some(8),
    }
}

fn participant(n: u128, name: &str, queue: u32) -> ParticipantRecord {
    ParticipantRecord {
        id: pid(n),
        display_name: name.to_string(),
        current_score: 0,
        session_balance_rubles: None,
        queue_position: Some(queue),
    }
}

fn make_backend(price: i64) -> Arc<MockBackend> {
    Arc::new(
        MockBackend::new()
            .with_game(make_game())
            .with_session(make_session())
            .with_template(make_template(price))
            .with_participants(vec![
                participant(1, "Igor", 0),
                participant(2, "Sasha", 1),
            ])
            .with_completion_at(start_time() + Duration::seconds(900)),
    )
}

async fn load(backend: &Arc<MockBackend>) -> Scorekeeper {
    Scorekeeper::load(backend.clone(), game_id(), Rubles::from_whole(10))
        .await
        .expect("load failed")
}

#[tokio::test]
async fn test_pot_and_foul_drive_the_scoreboard() {
    let backend = make_backend(50);
    let mut keeper = load(&backend).await;

    let now = start_time() + Duration::seconds(65);
    let entry = keeper
        .pot_ball(pid(1), BallColor::Yellow, None, now)
        .await
        .unwrap();
    assert_eq!(entry.timestamp.to_string(), "1:05");
    assert_eq!(entry.description, "Igor potted the yellow ball (+2)");

    keeper
        .record_foul(pid(2), Some("scratch".to_string()), now + Duration::seconds(30))
        .await
        .unwrap();

    let players = keeper.players();
    assert_eq!(players[0].points, 2);
    assert_eq!(players[0].money, Rubles::from_whole(100));
    assert_eq!(players[1].points, -1);
    assert_eq!(players[1].money, Rubles::from_whole(-50));
    assert_eq!(players[1].fouls[0].tag.as_deref(), Some("scratch"));

    // The settlement is the chained circle and nets to zero.
    let settlement = keeper.settlement();
    assert_eq!(settlement[0].net_rubles, Rubles::from_whole(150));
    assert_eq!(settlement[1].net_rubles, Rubles::from_whole(-150));
}

#[tokio::test]
async fn test_incremental_state_matches_fresh_load() {
    let backend = make_backend(25);
    let mut keeper = load(&backend).await;

    let now = start_time() + Duration::seconds(100);
    let ball = keeper
        .pot_ball(pid(1), BallColor::Black, None, now)
        .await
        .unwrap();
    keeper.record_foul(pid(1), None, now).await.unwrap();
    keeper
        .pot_ball(pid(2), BallColor::Blue, None, now)
        .await
        .unwrap();
    keeper.remove_event(ball.id).await.unwrap();

    // A brand new scorekeeper replaying the persisted log must agree on
    // every number, even though the elapsed stamps were assigned from
    // different observation instants.
    let reloaded = load(&backend).await;
    let a = keeper.players();
    let b = reloaded.players();
    for (x, y) in a.iter().zip(b.iter()) {
        assert_eq!(x.points, y.points);
        assert_eq!(x.money, y.money);
        assert_eq!(x.balls.len(), y.balls.len());
        assert_eq!(x.fouls.len(), y.fouls.len());
    }
}

#[tokio::test]
async fn test_backend_failure_leaves_log_untouched() {
    let backend = make_backend(50);
    let mut keeper = load(&backend).await;
    let now = start_time() + Duration::seconds(10);

    keeper
        .pot_ball(pid(1), BallColor::Green, None, now)
        .await
        .unwrap();
    let before_players = keeper.players().to_vec();
    let before_len = keeper.log_entries().len();

    backend.set_fail_mutations(true);
    let err = keeper
        .pot_ball(pid(1), BallColor::Black, None, now)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Backend(_)));

    let err = keeper.remove_event(keeper.log_entries()[0].id).await.unwrap_err();
    assert!(matches!(err, AppError::Backend(_)));

    assert_eq!(keeper.log_entries().len(), before_len);
    assert_eq!(keeper.players(), before_players.as_slice());
    assert!(!keeper.log_entries()[0].is_deleted);
}

#[tokio::test]
async fn test_unknown_participant_and_ball_are_rejected_before_persist() {
    let backend = make_backend(50);
    let mut keeper = load(&backend).await;
    let now = start_time();

    let err = keeper
        .pot_ball(pid(99), BallColor::Black, None, now)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // White is the cue ball: present in the catalog, never scoring.
    let err = keeper
        .pot_ball(pid(1), BallColor::White, None, now)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    assert_eq!(backend.event_count(), 0);
}

#[tokio::test]
async fn test_completion_freezes_everything() {
    let backend = make_backend(50);
    let mut keeper = load(&backend).await;
    let now = start_time() + Duration::seconds(30);

    keeper
        .pot_ball(pid(2), BallColor::Pink, None, now)
        .await
        .unwrap();
    let ball_id = keeper.log_entries()[0].id;

    let result = keeper.complete().await.unwrap();
    assert_eq!(result.winner_participant_id, Some(pid(2)));
    assert_eq!(result.game_duration.to_string(), "15:00");
    assert_eq!(result.total_balls, 1);
    assert_eq!(keeper.game().status, GameStatus::Completed);
    assert_eq!(keeper.game().winner_participant_id, Some(pid(2)));

    // The timer no longer advances.
    assert_eq!(
        keeper.elapsed_at(start_time() + Duration::hours(5)).to_string(),
        "15:00"
    );

    // Every mutation now trips the lifecycle gate, log untouched.
    let err = keeper
        .pot_ball(pid(1), BallColor::Yellow, None, now)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));
    let err = keeper.remove_event(ball_id).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));
    let err = keeper
        .amend_event(ball_id, EntryPatch::default())
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));
    assert_eq!(keeper.log_entries().len(), 1);

    // Completing twice is rejected and the snapshot survives verbatim.
    let err = keeper.complete().await.unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));
    assert_eq!(keeper.result(), Some(&result));
}

#[tokio::test]
async fn test_cancel_is_terminal_without_statistics() {
    let backend = make_backend(50);
    let mut keeper = load(&backend).await;
    let now = start_time() + Duration::seconds(120);

    keeper.cancel(now).unwrap();
    assert_eq!(keeper.game().status, GameStatus::Cancelled);
    assert_eq!(keeper.result(), None);

    let err = keeper
        .record_foul(pid(1), None, now)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));

    let err = keeper.complete().await.unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));
}

#[tokio::test]
async fn test_template_correction_applies_retroactively() {
    let backend = make_backend(10);
    let mut keeper = load(&backend).await;
    let now = start_time() + Duration::seconds(10);

    keeper
        .pot_ball(pid(1), BallColor::Yellow, None, now)
        .await
        .unwrap();
    assert_eq!(keeper.players()[0].money, Rubles::from_whole(20));

    // The price was entered wrong; the template gets fixed mid-game.
    backend.set_template(make_template(50));
    keeper.refresh_template().await.unwrap();

    assert_eq!(keeper.players()[0].points, 2);
    assert_eq!(keeper.players()[0].money, Rubles::from_whole(100));
    assert_eq!(keeper.settlement()[0].rubles_earned, Rubles::from_whole(100));
}

#[tokio::test]
async fn test_amend_touches_display_fields_and_foul_tags() {
    let backend = make_backend(50);
    let mut keeper = load(&backend).await;
    let now = start_time() + Duration::seconds(10);

    let foul = keeper.record_foul(pid(1), None, now).await.unwrap();
    let amended = keeper
        .amend_event(
            foul.id,
            EntryPatch {
                description: Some("touched the cue ball".to_string()),
                tag: Some(Some("scratch".to_string())),
            },
        )
        .unwrap();
    assert_eq!(amended.description, "touched the cue ball");

    // The tag flows through the re-projection into the foul record.
    assert_eq!(keeper.players()[0].fouls[0].tag.as_deref(), Some("scratch"));
    // Scoring is untouched.
    assert_eq!(keeper.players()[0].points, -1);

    let err = keeper
        .amend_event(
            artel_ledger::EventId::new(Uuid::from_u128(0xDEAD)),
            EntryPatch::default(),
        )
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_loading_a_completed_game_rebuilds_its_result() {
    let backend = make_backend(50);
    let mut keeper = load(&backend).await;
    let now = start_time() + Duration::seconds(30);

    keeper
        .pot_ball(pid(1), BallColor::Brown, None, now)
        .await
        .unwrap();
    let completed = keeper.complete().await.unwrap();

    let reloaded = load(&backend).await;
    assert_eq!(reloaded.game().status, GameStatus::Completed);
    let rebuilt = reloaded.result().expect("completed game has a result");
    assert_eq!(rebuilt.winner_participant_id, completed.winner_participant_id);
    assert_eq!(rebuilt.total_balls, completed.total_balls);
    assert_eq!(rebuilt.game_duration, completed.game_duration);
}
