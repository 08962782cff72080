//! Game, session, and template snapshots.

use crate::domain::{BallSpec, GameId, ParticipantId, Rubles, SessionId, TemplateId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a single game.
///
/// `in_progress` is the only state that admits log mutation; both other
/// states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    Completed,
    Cancelled,
}

impl GameStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::InProgress => "in_progress",
            GameStatus::Completed => "completed",
            GameStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One scored round within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: GameId,
    pub session_id: SessionId,
    pub game_number: u32,
    pub status: GameStatus,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner_participant_id: Option<ParticipantId>,
}

/// Session snapshot as fetched from the backend. The name still matters:
/// legacy sessions encode the point price in free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: SessionId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<TemplateId>,
    pub name: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// How the turn/payment queue is generated for each new game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueAlgorithm {
    AlwaysRandom,
    RandomNoRepeat,
    Manual,
}

/// Template snapshot: ball catalog, pricing, and queue rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: TemplateId,
    pub ball_catalog: Vec<BallSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_value_rubles: Option<Rubles>,
    pub queue_algorithm: QueueAlgorithm,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balls_to_win: Option<u32>,
}
