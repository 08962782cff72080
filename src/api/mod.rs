pub mod events;
pub mod health;
pub mod results;
pub mod scoreboard;

use crate::config::Config;
use crate::datasource::GameBackend;
use crate::domain::GameId;
use crate::error::AppError;
use crate::orchestration::Scorekeeper;
use axum::{
    routing::{delete, get, post},
    Router,
};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};

/// Shared state: the backend client and the registry of loaded games.
///
/// The registry lock is coarse on purpose — the scoring model is
/// single-user, single-device, and a projection must never interleave
/// with another mutation of the same game.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn GameBackend>,
    pub config: Config,
    games: Arc<Mutex<HashMap<GameId, Scorekeeper>>>,
}

impl AppState {
    pub fn new(backend: Arc<dyn GameBackend>, config: Config) -> Self {
        Self {
            backend,
            config,
            games: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn lock_games(
        &self,
    ) -> tokio::sync::MutexGuard<'_, HashMap<GameId, Scorekeeper>> {
        self.games.lock().await
    }

    /// Fetch a game into the registry on first touch.
    pub async fn ensure_loaded<'a>(
        &self,
        games: &'a mut HashMap<GameId, Scorekeeper>,
        game_id: GameId,
    ) -> Result<&'a mut Scorekeeper, AppError> {
        match games.entry(game_id) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(slot) => {
                let keeper = Scorekeeper::load(
                    self.backend.clone(),
                    game_id,
                    self.config.default_point_value,
                )
                .await?;
                Ok(slot.insert(keeper))
            }
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route(
            "/v1/games/:game_id/scoreboard",
            get(scoreboard::get_scoreboard),
        )
        .route("/v1/games/:game_id/log", get(scoreboard::get_log))
        .route(
            "/v1/games/:game_id/settlement",
            get(results::get_settlement),
        )
        .route("/v1/games/:game_id/result", get(results::get_result))
        .route("/v1/games/:game_id/events", post(events::add_event))
        .route(
            "/v1/games/:game_id/events/:event_id",
            delete(events::delete_event).patch(events::amend_event),
        )
        .route("/v1/games/:game_id/complete", post(results::complete_game))
        .route("/v1/games/:game_id/cancel", post(results::cancel_game))
        .layer(cors)
        .with_state(state)
}
