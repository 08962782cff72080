//! Log entries, the source of truth for all scoring.

use crate::domain::{BallColor, EventId, GameTime, ParticipantId};
use serde::{Deserialize, Serialize};

/// What a log entry records.
///
/// A ball pot carries the resolved color so replay never has to re-derive
/// it from the free-text description. Only `Ball` and `Foul` affect
/// scoring; `Turn` and `GameStart` are informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    Ball { color: BallColor },
    Foul,
    Turn,
    GameStart,
}

impl EventKind {
    /// Whether replaying this entry can change points or money.
    pub fn is_scoring(&self) -> bool {
        matches!(self, EventKind::Ball { .. } | EventKind::Foul)
    }
}

/// One record of the append-only game log.
///
/// Entries are soft-deleted, never removed: a deleted entry stays visible
/// for audit but is excluded from the projection. `description` and
/// `points` are display caches; the projection recomputes scoring from
/// `kind` alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: EventId,
    #[serde(flatten)]
    pub kind: EventKind,
    pub participant_id: ParticipantId,
    pub player_name: String,
    pub description: String,
    pub points: i64,
    pub timestamp: GameTime,
    pub added_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    pub is_deleted: bool,
}

impl LogEntry {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: EventId,
        kind: EventKind,
        participant_id: ParticipantId,
        player_name: String,
        description: String,
        points: i64,
        timestamp: GameTime,
        added_by: String,
        tag: Option<String>,
    ) -> Self {
        LogEntry {
            id,
            kind,
            participant_id,
            player_name,
            description,
            points,
            timestamp,
            added_by,
            tag,
            is_deleted: false,
        }
    }
}
