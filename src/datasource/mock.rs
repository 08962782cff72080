//! Mock backend for tests: no network, deterministic ids, scriptable
//! failures.

use super::{
    AppendedEvent, BackendError, CompletedGame, GameBackend, NewGameEvent, NewGameEventKind,
    ParticipantRecord, RawEventData, RawGameEvent,
};
use crate::domain::{
    EventId, Game, GameId, GameStatus, Session, SessionId, Template, TemplateId,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Default)]
struct MockState {
    game: Option<Game>,
    session: Option<Session>,
    template: Option<Template>,
    participants: Vec<ParticipantRecord>,
    events: Vec<RawGameEvent>,
    next_sequence: i64,
    fail_mutations: bool,
    completion_at: Option<DateTime<Utc>>,
    deleted_event_ids: Vec<EventId>,
}

/// In-memory stand-in for the backend services.
///
/// Mutations are applied to the internal state, so a fresh load after a
/// series of appends and deletes observes exactly what a real backend
/// would report. Ids and timestamps are deterministic.
#[derive(Debug, Default)]
pub struct MockBackend {
    state: Mutex<MockState>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_game(self, game: Game) -> Self {
        self.state.lock().unwrap().game = Some(game);
        self
    }

    pub fn with_session(self, session: Session) -> Self {
        self.state.lock().unwrap().session = Some(session);
        self
    }

    pub fn with_template(self, template: Template) -> Self {
        self.state.lock().unwrap().template = Some(template);
        self
    }

    pub fn with_participants(self, participants: Vec<ParticipantRecord>) -> Self {
        self.state.lock().unwrap().participants = participants;
        self
    }

    pub fn with_event(self, event: RawGameEvent) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.next_sequence = state.next_sequence.max(event.sequence_number + 1);
            state.events.push(event);
        }
        self
    }

    /// Fix the completion instant returned by `complete_game`.
    pub fn with_completion_at(self, at: DateTime<Utc>) -> Self {
        self.state.lock().unwrap().completion_at = Some(at);
        self
    }

    /// Make every subsequent mutation fail with a network error.
    pub fn set_fail_mutations(&self, fail: bool) {
        self.state.lock().unwrap().fail_mutations = fail;
    }

    /// Replace the stored template (a mid-game template correction).
    pub fn set_template(&self, template: Template) {
        self.state.lock().unwrap().template = Some(template);
    }

    /// Event ids passed to `delete_game_event` so far.
    pub fn deleted_event_ids(&self) -> Vec<EventId> {
        self.state.lock().unwrap().deleted_event_ids.clone()
    }

    pub fn event_count(&self) -> usize {
        self.state.lock().unwrap().events.len()
    }

    fn check_mutations_allowed(state: &MockState) -> Result<(), BackendError> {
        if state.fail_mutations {
            return Err(BackendError::Network(
                "mock backend is offline".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl GameBackend for MockBackend {
    async fn get_game(&self, game_id: GameId) -> Result<Game, BackendError> {
        let state = self.state.lock().unwrap();
        state
            .game
            .clone()
            .filter(|g| g.id == game_id)
            .ok_or_else(|| BackendError::NotFound(format!("game {}", game_id)))
    }

    async fn get_session(&self, session_id: SessionId) -> Result<Session, BackendError> {
        let state = self.state.lock().unwrap();
        state
            .session
            .clone()
            .filter(|s| s.id == session_id)
            .ok_or_else(|| BackendError::NotFound(format!("session {}", session_id)))
    }

    async fn get_template(&self, template_id: TemplateId) -> Result<Template, BackendError> {
        let state = self.state.lock().unwrap();
        state
            .template
            .clone()
            .filter(|t| t.id == template_id)
            .ok_or_else(|| BackendError::NotFound(format!("template {}", template_id)))
    }

    async fn get_participants(
        &self,
        _session_id: SessionId,
    ) -> Result<Vec<ParticipantRecord>, BackendError> {
        Ok(self.state.lock().unwrap().participants.clone())
    }

    async fn get_game_events(&self, _game_id: GameId) -> Result<Vec<RawGameEvent>, BackendError> {
        Ok(self.state.lock().unwrap().events.clone())
    }

    async fn add_game_event(
        &self,
        _game_id: GameId,
        event: NewGameEvent,
    ) -> Result<AppendedEvent, BackendError> {
        let mut state = self.state.lock().unwrap();
        Self::check_mutations_allowed(&state)?;

        let sequence = state.next_sequence;
        state.next_sequence += 1;

        let base = state
            .game
            .as_ref()
            .map(|g| g.started_at)
            .unwrap_or_else(Utc::now);
        let created_at = base + Duration::seconds(sequence);
        let id = EventId::new(Uuid::from_u128(0xA000 + sequence as u128));

        let (event_type, event_data) = match event.kind {
            NewGameEventKind::BallPotted { color, points } => (
                "ball_potted".to_string(),
                RawEventData {
                    ball_color: Some(color),
                    ball_points: Some(points),
                    tag: event.tag,
                    description: None,
                },
            ),
            NewGameEventKind::Foul => (
                "foul".to_string(),
                RawEventData {
                    tag: event.tag,
                    ..RawEventData::default()
                },
            ),
        };

        state.events.push(RawGameEvent {
            id,
            event_type,
            participant_id: event.participant_id,
            event_data,
            sequence_number: sequence,
            created_at,
            is_deleted: false,
            added_by: None,
        });

        Ok(AppendedEvent {
            id,
            sequence_number: sequence,
            created_at,
        })
    }

    async fn delete_game_event(
        &self,
        _game_id: GameId,
        event_id: EventId,
    ) -> Result<(), BackendError> {
        let mut state = self.state.lock().unwrap();
        Self::check_mutations_allowed(&state)?;

        let event = state
            .events
            .iter_mut()
            .find(|e| e.id == event_id)
            .ok_or_else(|| BackendError::NotFound(format!("event {}", event_id)))?;
        event.is_deleted = true;
        state.deleted_event_ids.push(event_id);
        Ok(())
    }

    async fn complete_game(&self, game_id: GameId) -> Result<CompletedGame, BackendError> {
        let mut state = self.state.lock().unwrap();
        Self::check_mutations_allowed(&state)?;

        let completion_at = state.completion_at;
        let game = state
            .game
            .as_mut()
            .filter(|g| g.id == game_id)
            .ok_or_else(|| BackendError::NotFound(format!("game {}", game_id)))?;
        let completed_at = completion_at.unwrap_or_else(Utc::now);
        game.status = GameStatus::Completed;
        game.completed_at = Some(completed_at);

        Ok(CompletedGame {
            status: GameStatus::Completed,
            completed_at,
            winner_participant_id: None,
        })
    }
}
