use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::AppState;
use crate::domain::{GameId, GameStatus, ParticipantId, Rubles};
use crate::engine::{GameResult, SettlementLine};
use crate::error::AppError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementResponse {
    pub point_value: Rubles,
    pub lines: Vec<SettlementLine>,
}

/// Live settlement preview at the current scores.
pub async fn get_settlement(
    Path(game_id): Path<GameId>,
    State(state): State<AppState>,
) -> Result<Json<SettlementResponse>, AppError> {
    let mut games = state.lock_games().await;
    let keeper = state.ensure_loaded(&mut games, game_id).await?;

    Ok(Json(SettlementResponse {
        point_value: keeper.point_value(),
        lines: keeper.settlement(),
    }))
}

/// Frozen statistics; available once the game is completed.
pub async fn get_result(
    Path(game_id): Path<GameId>,
    State(state): State<AppState>,
) -> Result<Json<GameResult>, AppError> {
    let mut games = state.lock_games().await;
    let keeper = state.ensure_loaded(&mut games, game_id).await?;
    keeper
        .result()
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("game {} is not completed", game_id)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResponse {
    pub status: GameStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner_participant_id: Option<ParticipantId>,
    pub statistics: GameResult,
}

pub async fn complete_game(
    Path(game_id): Path<GameId>,
    State(state): State<AppState>,
) -> Result<Json<CompletionResponse>, AppError> {
    let mut games = state.lock_games().await;
    let keeper = state.ensure_loaded(&mut games, game_id).await?;
    let statistics = keeper.complete().await?;
    let game = keeper.game();

    Ok(Json(CompletionResponse {
        status: game.status,
        completed_at: game.completed_at,
        winner_participant_id: game.winner_participant_id,
        statistics,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelResponse {
    pub status: GameStatus,
}

pub async fn cancel_game(
    Path(game_id): Path<GameId>,
    State(state): State<AppState>,
) -> Result<Json<CancelResponse>, AppError> {
    let mut games = state.lock_games().await;
    let keeper = state.ensure_loaded(&mut games, game_id).await?;
    keeper.cancel(Utc::now())?;

    Ok(Json(CancelResponse {
        status: keeper.game().status,
    }))
}
