use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Deserializer};

use crate::api::AppState;
use crate::domain::{BallColor, EventId, GameId, LogEntry, ParticipantId};
use crate::error::AppError;
use crate::ledger::EntryPatch;

/// A scoring action to record. Only balls and fouls come in over the API;
/// system entries (`turn`, `game_start`) are backend-originated.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventPayload {
    Ball { color: BallColor },
    Foul,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddEventRequest {
    pub participant_id: ParticipantId,
    pub event: EventPayload,
    #[serde(default)]
    pub tag: Option<String>,
}

pub async fn add_event(
    Path(game_id): Path<GameId>,
    State(state): State<AppState>,
    Json(request): Json<AddEventRequest>,
) -> Result<(StatusCode, Json<LogEntry>), AppError> {
    let mut games = state.lock_games().await;
    let keeper = state.ensure_loaded(&mut games, game_id).await?;

    let entry = match request.event {
        EventPayload::Ball { color } => {
            keeper
                .pot_ball(request.participant_id, color, request.tag, Utc::now())
                .await?
        }
        EventPayload::Foul => {
            keeper
                .record_foul(request.participant_id, request.tag, Utc::now())
                .await?
        }
    };

    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn delete_event(
    Path((game_id, event_id)): Path<(GameId, EventId)>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let mut games = state.lock_games().await;
    let keeper = state.ensure_loaded(&mut games, game_id).await?;
    keeper.remove_event(event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Unknown fields are rejected outright: scoring fields (`points`, the
/// event kind, the participant) cannot be amended, only the display
/// fields below. A scoring correction is a delete plus a fresh event.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AmendEventRequest {
    #[serde(default)]
    pub description: Option<String>,
    /// Absent field: leave the tag alone. Explicit `null`: clear it.
    #[serde(default, deserialize_with = "some_nullable")]
    pub tag: Option<Option<String>>,
}

fn some_nullable<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

pub async fn amend_event(
    Path((game_id, event_id)): Path<(GameId, EventId)>,
    State(state): State<AppState>,
    Json(request): Json<AmendEventRequest>,
) -> Result<Json<LogEntry>, AppError> {
    let mut games = state.lock_games().await;
    let keeper = state.ensure_loaded(&mut games, game_id).await?;
    let entry = keeper.amend_event(
        event_id,
        EntryPatch {
            description: request.description,
            tag: request.tag,
        },
    )?;
    Ok(Json(entry))
}
