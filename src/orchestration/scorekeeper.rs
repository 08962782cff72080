//! The per-game coordinator: owns the consistent snapshot of roster, log,
//! catalog, and pricing, gates every mutation on the game lifecycle, and
//! re-runs the projection after each change.
//!
//! Mutations persist to the backend first and touch local state only once
//! the backend call has returned with its assigned id. A failed persist
//! leaves the log exactly as it was.

use crate::datasource::{GameBackend, NewGameEvent, NewGameEventKind, RawGameEvent};
use crate::domain::{
    default_catalog, resolve_ball, BallColor, BallSpec, EventId, EventKind, Game, GameId,
    GameStatus, GameTime, LogEntry, ParticipantId, Player, Rubles, Session, Template,
};
use crate::engine::{
    build_result, project, resolve_point_value, settle, GameClock, GameResult, SettlementLine,
};
use crate::error::AppError;
use crate::ledger::{EntryPatch, EventLog};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

pub struct Scorekeeper {
    backend: Arc<dyn GameBackend>,
    game: Game,
    session: Session,
    template: Option<Template>,
    catalog: Vec<BallSpec>,
    default_point_value: Rubles,
    clock: GameClock,
    log: EventLog,
    players: Vec<Player>,
    result: Option<GameResult>,
}

impl Scorekeeper {
    /// Fetch everything a game needs from the backend and replay its log.
    pub async fn load(
        backend: Arc<dyn GameBackend>,
        game_id: GameId,
        default_point_value: Rubles,
    ) -> Result<Self, AppError> {
        let game = backend.get_game(game_id).await?;
        let (session, participants, mut raw_events) = futures::try_join!(
            backend.get_session(game.session_id),
            backend.get_participants(game.session_id),
            backend.get_game_events(game_id),
        )?;
        let template = match session.template_id {
            Some(template_id) => Some(backend.get_template(template_id).await?),
            None => None,
        };

        let catalog = template
            .as_ref()
            .map(|t| t.ball_catalog.clone())
            .unwrap_or_else(default_catalog);

        let clock = match game.completed_at {
            Some(completed_at) => GameClock::with_completed(game.started_at, completed_at),
            None => GameClock::new(game.started_at),
        };

        let roster: Vec<Player> = participants
            .into_iter()
            .map(|p| Player::new(p.id, p.display_name, p.queue_position))
            .collect();

        raw_events.sort_by_key(|e| (e.created_at, e.sequence_number));
        let mut log = EventLog::new();
        for raw in &raw_events {
            let Some(entry) = convert_raw_event(raw, &clock, &roster) else {
                continue;
            };
            if let Err(err) = log.append(entry) {
                warn!(event_id = %raw.id, %err, "skipping backend event");
            }
        }

        let mut keeper = Scorekeeper {
            backend,
            game,
            session,
            template,
            catalog,
            default_point_value,
            clock,
            log,
            players: roster,
            result: None,
        };
        keeper.reproject();

        if keeper.game.status == GameStatus::Completed {
            let duration = keeper.clock.frozen_duration().unwrap_or_default();
            keeper.result = Some(build_result(&keeper.players, duration));
        }

        info!(
            game_id = %keeper.game.id,
            players = keeper.players.len(),
            events = keeper.log.len(),
            status = %keeper.game.status,
            "game loaded"
        );
        Ok(keeper)
    }

    /// The point price, resolved fresh on every call so a template
    /// correction takes effect on the next recomputation.
    pub fn point_value(&self) -> Rubles {
        resolve_point_value(&self.session, self.template.as_ref(), self.default_point_value)
    }

    fn reproject(&mut self) {
        let point_value = self.point_value();
        let active = self.log.active_entries();
        let projected = project(&self.players, &active, &self.catalog, point_value);
        drop(active);
        self.players = projected;
    }

    fn ensure_in_progress(&self) -> Result<(), AppError> {
        if self.game.status.is_terminal() {
            return Err(AppError::InvalidState(format!(
                "game already {}",
                self.game.status
            )));
        }
        Ok(())
    }

    /// Record a potted ball for a player, observed at `now`.
    pub async fn pot_ball(
        &mut self,
        participant_id: ParticipantId,
        color: BallColor,
        tag: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<LogEntry, AppError> {
        self.ensure_in_progress()?;
        let name = self.player_name(participant_id)?;
        let spec = resolve_ball(&self.catalog, color).ok_or_else(|| {
            AppError::BadRequest(format!("the {} ball does not score in this game", color))
        })?;
        let points = spec.points;

        let appended = self
            .backend
            .add_game_event(
                self.game.id,
                NewGameEvent {
                    participant_id,
                    kind: NewGameEventKind::BallPotted { color, points },
                    tag: tag.clone(),
                },
            )
            .await?;

        let entry = LogEntry::new(
            appended.id,
            EventKind::Ball { color },
            participant_id,
            name.clone(),
            format!("{} potted the {} ball (+{})", name, color, points),
            points,
            self.clock.elapsed_at(now),
            name,
            tag,
        );
        self.log.append(entry.clone())?;
        self.reproject();
        Ok(entry)
    }

    /// Record a foul for a player, observed at `now`.
    pub async fn record_foul(
        &mut self,
        participant_id: ParticipantId,
        tag: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<LogEntry, AppError> {
        self.ensure_in_progress()?;
        let name = self.player_name(participant_id)?;

        let appended = self
            .backend
            .add_game_event(
                self.game.id,
                NewGameEvent {
                    participant_id,
                    kind: NewGameEventKind::Foul,
                    tag: tag.clone(),
                },
            )
            .await?;

        let entry = LogEntry::new(
            appended.id,
            EventKind::Foul,
            participant_id,
            name.clone(),
            format!("{} committed a foul (-1)", name),
            -1,
            self.clock.elapsed_at(now),
            name,
            tag,
        );
        self.log.append(entry.clone())?;
        self.reproject();
        Ok(entry)
    }

    /// Soft-delete an event and replay the log without it.
    pub async fn remove_event(&mut self, event_id: EventId) -> Result<(), AppError> {
        self.ensure_in_progress()?;
        if !self.log.contains(event_id) {
            return Err(AppError::NotFound(format!("log entry {}", event_id)));
        }
        self.backend
            .delete_game_event(self.game.id, event_id)
            .await?;
        self.log.soft_delete(event_id)?;
        self.reproject();
        Ok(())
    }

    /// Amend the display fields of an event. Local-only: the backend
    /// contract carries no edit call, and scoring fields are untouchable
    /// by design.
    pub fn amend_event(
        &mut self,
        event_id: EventId,
        patch: EntryPatch,
    ) -> Result<LogEntry, AppError> {
        self.ensure_in_progress()?;
        let entry = self.log.edit(event_id, patch)?.clone();
        // Tags ride along into the projected foul records.
        self.reproject();
        Ok(entry)
    }

    /// Complete the game: persist, freeze the clock, and compute the
    /// statistics snapshot exactly once.
    pub async fn complete(&mut self) -> Result<GameResult, AppError> {
        self.ensure_in_progress()?;
        let completed = self.backend.complete_game(self.game.id).await?;

        self.clock.freeze(completed.completed_at);
        self.game.status = GameStatus::Completed;
        self.game.completed_at = self.clock.completed_at();

        // Last read-through of the price before the numbers freeze.
        self.reproject();
        let duration = self.clock.frozen_duration().unwrap_or_default();
        let result = build_result(&self.players, duration);
        self.game.winner_participant_id = result.winner_participant_id;
        self.result = Some(result.clone());

        info!(game_id = %self.game.id, duration = %duration, "game completed");
        Ok(result)
    }

    /// Cancel the game: freeze the log, compute nothing.
    ///
    /// The backend contract has no cancel call, so this is local state
    /// only.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> Result<(), AppError> {
        self.ensure_in_progress()?;
        self.clock.freeze(now);
        self.game.status = GameStatus::Cancelled;
        self.game.completed_at = self.clock.completed_at();
        info!(game_id = %self.game.id, "game cancelled");
        Ok(())
    }

    /// Re-fetch the template and replay, picking up a catalog or price
    /// correction made mid-game.
    pub async fn refresh_template(&mut self) -> Result<(), AppError> {
        let Some(template_id) = self.session.template_id else {
            return Ok(());
        };
        let template = self.backend.get_template(template_id).await?;
        self.catalog = template.ball_catalog.clone();
        self.template = Some(template);
        self.reproject();
        Ok(())
    }

    fn player_name(&self, participant_id: ParticipantId) -> Result<String, AppError> {
        self.players
            .iter()
            .find(|p| p.id == participant_id)
            .map(|p| p.display_name.clone())
            .ok_or_else(|| {
                AppError::NotFound(format!("participant {} is not in this game", participant_id))
            })
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn log_entries(&self) -> &[LogEntry] {
        self.log.entries()
    }

    /// The live circular settlement at the current point price.
    pub fn settlement(&self) -> Vec<SettlementLine> {
        settle(&self.players, self.point_value())
    }

    /// The frozen statistics snapshot, present once completed.
    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    pub fn elapsed_at(&self, now: DateTime<Utc>) -> GameTime {
        self.clock.elapsed_at(now)
    }
}

impl std::fmt::Debug for Scorekeeper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scorekeeper")
            .field("game", &self.game.id)
            .field("status", &self.game.status)
            .field("players", &self.players.len())
            .field("events", &self.log.len())
            .finish()
    }
}

/// Convert a persisted backend event into a log entry.
///
/// Event types outside the scoring vocabulary are dropped with a warning;
/// one unrecognized record must never poison the rest of the replay.
fn convert_raw_event(raw: &RawGameEvent, clock: &GameClock, roster: &[Player]) -> Option<LogEntry> {
    let kind = match raw.event_type.as_str() {
        "ball_potted" | "shot" => {
            let Some(color) = raw.event_data.ball_color else {
                warn!(event_id = %raw.id, "ball event without a color, skipping");
                return None;
            };
            EventKind::Ball { color }
        }
        "foul" => EventKind::Foul,
        "turn_end" => EventKind::Turn,
        "game_start" => EventKind::GameStart,
        other => {
            warn!(event_id = %raw.id, event_type = other, "unrecognized event type, skipping");
            return None;
        }
    };

    let player_name = roster
        .iter()
        .find(|p| p.id == raw.participant_id)
        .map(|p| p.display_name.clone())
        .unwrap_or_default();
    let points = match kind {
        EventKind::Ball { .. } => raw.event_data.ball_points.unwrap_or(0),
        EventKind::Foul => -1,
        _ => 0,
    };

    Some(LogEntry {
        id: raw.id,
        kind,
        participant_id: raw.participant_id,
        player_name: player_name.clone(),
        description: raw.event_data.description.clone().unwrap_or_default(),
        points,
        timestamp: clock.elapsed_at(raw.created_at),
        added_by: raw.added_by.clone().unwrap_or(player_name),
        tag: raw.event_data.tag.clone(),
        is_deleted: raw.is_deleted,
    })
}
