use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::api::AppState;
use crate::domain::{GameId, GameStatus, GameTime, LogEntry, Player, Rubles, SessionId};
use crate::error::AppError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreboardResponse {
    pub game_id: GameId,
    pub session_id: SessionId,
    pub game_number: u32,
    pub status: GameStatus,
    pub elapsed: GameTime,
    pub point_value: Rubles,
    pub players: Vec<Player>,
}

pub async fn get_scoreboard(
    Path(game_id): Path<GameId>,
    State(state): State<AppState>,
) -> Result<Json<ScoreboardResponse>, AppError> {
    let mut games = state.lock_games().await;
    let keeper = state.ensure_loaded(&mut games, game_id).await?;
    let game = keeper.game();

    Ok(Json(ScoreboardResponse {
        game_id: game.id,
        session_id: game.session_id,
        game_number: game.game_number,
        status: game.status,
        elapsed: keeper.elapsed_at(Utc::now()),
        point_value: keeper.point_value(),
        players: keeper.players().to_vec(),
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogResponse {
    pub entries: Vec<LogEntry>,
    pub total: usize,
}

/// The full audit log, deleted entries included.
pub async fn get_log(
    Path(game_id): Path<GameId>,
    State(state): State<AppState>,
) -> Result<Json<LogResponse>, AppError> {
    let mut games = state.lock_games().await;
    let keeper = state.ensure_loaded(&mut games, game_id).await?;
    let entries = keeper.log_entries().to_vec();

    Ok(Json(LogResponse {
        total: entries.len(),
        entries,
    }))
}
