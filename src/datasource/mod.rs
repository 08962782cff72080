//! Backend abstraction for the game, session, and template services.
//!
//! The ledger owns no persistence of its own: games, rosters, templates,
//! and the event records themselves all live behind these calls. Event
//! ids are assigned by the backend, and local state only changes after a
//! call has returned successfully.

use crate::domain::{
    BallColor, EventId, Game, GameId, GameStatus, ParticipantId, Rubles, Session, SessionId,
    Template, TemplateId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod http;
pub mod mock;

pub use http::HttpGameBackend;
pub use mock::MockBackend;

/// Error type for backend operations.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// Network error (connection refused, timeout, DNS failure).
    #[error("Network error: {0}")]
    Network(String),
    /// Non-success HTTP status from the backend.
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },
    /// Invalid JSON or a response that does not match the contract.
    #[error("Parse error: {0}")]
    Parse(String),
    /// The referenced entity does not exist on the backend.
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Error: {0}")]
    Other(String),
}

/// A session participant as the session service reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    pub id: ParticipantId,
    pub display_name: String,
    #[serde(default)]
    pub current_score: i64,
    #[serde(default)]
    pub session_balance_rubles: Option<Rubles>,
    #[serde(default)]
    pub queue_position: Option<u32>,
}

/// The typed payload of a persisted game event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEventData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ball_color: Option<BallColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ball_points: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A game event exactly as the game service stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawGameEvent {
    pub id: EventId,
    pub event_type: String,
    pub participant_id: ParticipantId,
    #[serde(default)]
    pub event_data: RawEventData,
    pub sequence_number: i64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_by: Option<String>,
}

/// A new event to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGameEvent {
    pub participant_id: ParticipantId,
    pub kind: NewGameEventKind,
    pub tag: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NewGameEventKind {
    BallPotted { color: BallColor, points: i64 },
    Foul,
}

/// What the backend returns for a persisted event. The id here is the one
/// all later delete/amend calls must reference.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppendedEvent {
    pub id: EventId,
    pub sequence_number: i64,
    pub created_at: DateTime<Utc>,
}

/// Completion acknowledgement from the game service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CompletedGame {
    pub status: GameStatus,
    pub completed_at: DateTime<Utc>,
    #[serde(default)]
    pub winner_participant_id: Option<ParticipantId>,
}

/// The narrow contract the scoring core consumes from the backend
/// services.
///
/// Read calls may be retried by implementations; mutations must not be —
/// a failed append or delete is surfaced to the caller and retried only
/// by an explicit user action.
#[async_trait]
pub trait GameBackend: Send + Sync + fmt::Debug {
    async fn get_game(&self, game_id: GameId) -> Result<Game, BackendError>;

    async fn get_session(&self, session_id: SessionId) -> Result<Session, BackendError>;

    async fn get_template(&self, template_id: TemplateId) -> Result<Template, BackendError>;

    async fn get_participants(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<ParticipantRecord>, BackendError>;

    /// All events for a game, including soft-deleted ones.
    async fn get_game_events(&self, game_id: GameId) -> Result<Vec<RawGameEvent>, BackendError>;

    async fn add_game_event(
        &self,
        game_id: GameId,
        event: NewGameEvent,
    ) -> Result<AppendedEvent, BackendError>;

    async fn delete_game_event(
        &self,
        game_id: GameId,
        event_id: EventId,
    ) -> Result<(), BackendError>;

    async fn complete_game(&self, game_id: GameId) -> Result<CompletedGame, BackendError>;
}
