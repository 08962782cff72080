//! HTTP client for the game/session/template services behind the API
//! gateway.

use super::{
    AppendedEvent, BackendError, CompletedGame, GameBackend, NewGameEvent, NewGameEventKind,
    ParticipantRecord, RawGameEvent,
};
use crate::domain::{EventId, Game, GameId, Session, SessionId, Template, TemplateId};
use async_trait::async_trait;
use backoff::future::retry;
use backoff::ExponentialBackoff;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Backend client speaking the gateway's JSON API.
///
/// Reads retry transient failures with exponential backoff. Mutations
/// (append, delete, complete) are sent exactly once: a failed mutation
/// must surface to the user, never silently repeat.
#[derive(Debug, Clone)]
pub struct HttpGameBackend {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct EventListEnvelope {
    events: Vec<RawGameEvent>,
}

impl HttpGameBackend {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let url = self.url(path);
        let backoff = ExponentialBackoff {
            max_elapsed_time: Some(Duration::from_secs(15)),
            ..Default::default()
        };

        retry(backoff, || async {
            debug!(%url, "backend GET");
            let response = self.client.get(&url).send().await.map_err(|e| {
                backoff::Error::transient(BackendError::Network(e.to_string()))
            })?;
            Self::decode(response).await
        })
        .await
    }

    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, backoff::Error<BackendError>> {
        let status = response.status();
        if status.as_u16() == 404 {
            return Err(backoff::Error::permanent(BackendError::NotFound(
                "backend returned 404".to_string(),
            )));
        }
        if status.is_server_error() {
            return Err(backoff::Error::transient(BackendError::Http {
                status: status.as_u16(),
                message: "Server error".to_string(),
            }));
        }
        if !status.is_success() {
            return Err(backoff::Error::permanent(BackendError::Http {
                status: status.as_u16(),
                message: "Client error".to_string(),
            }));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| backoff::Error::permanent(BackendError::Parse(e.to_string())))
    }

    /// One-shot request for mutations; no retry.
    async fn send_once<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, BackendError> {
        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        Self::decode(response).await.map_err(|e| match e {
            backoff::Error::Permanent(err) => err,
            backoff::Error::Transient { err, .. } => err,
        })
    }
}

#[async_trait]
impl GameBackend for HttpGameBackend {
    async fn get_game(&self, game_id: GameId) -> Result<Game, BackendError> {
        self.get_json(&format!("/games/{}", game_id)).await
    }

    async fn get_session(&self, session_id: SessionId) -> Result<Session, BackendError> {
        self.get_json(&format!("/sessions/{}", session_id)).await
    }

    async fn get_template(&self, template_id: TemplateId) -> Result<Template, BackendError> {
        self.get_json(&format!("/templates/{}", template_id)).await
    }

    async fn get_participants(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<ParticipantRecord>, BackendError> {
        self.get_json(&format!("/sessions/{}/players", session_id))
            .await
    }

    async fn get_game_events(&self, game_id: GameId) -> Result<Vec<RawGameEvent>, BackendError> {
        let envelope: EventListEnvelope =
            self.get_json(&format!("/games/{}/events", game_id)).await?;
        Ok(envelope.events)
    }

    async fn add_game_event(
        &self,
        game_id: GameId,
        event: NewGameEvent,
    ) -> Result<AppendedEvent, BackendError> {
        let (event_type, event_data) = match event.kind {
            NewGameEventKind::BallPotted { color, points } => (
                "ball_potted",
                json!({
                    "ball_color": color,
                    "ball_points": points,
                    "tag": event.tag,
                }),
            ),
            NewGameEventKind::Foul => ("foul", json!({ "tag": event.tag })),
        };
        let body = json!({
            "event_type": event_type,
            "participant_id": event.participant_id,
            "event_data": event_data,
        });

        let url = self.url(&format!("/games/{}/events", game_id));
        debug!(%url, event_type, "backend POST event");
        self.send_once(self.client.post(&url).json(&body)).await
    }

    async fn delete_game_event(
        &self,
        game_id: GameId,
        event_id: EventId,
    ) -> Result<(), BackendError> {
        let url = self.url(&format!("/games/{}/events/{}", game_id, event_id));
        debug!(%url, "backend DELETE event");
        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Err(BackendError::NotFound("backend returned 404".to_string()));
        }
        if !status.is_success() {
            return Err(BackendError::Http {
                status: status.as_u16(),
                message: "Delete failed".to_string(),
            });
        }
        Ok(())
    }

    async fn complete_game(&self, game_id: GameId) -> Result<CompletedGame, BackendError> {
        let url = self.url(&format!("/games/{}/complete", game_id));
        debug!(%url, "backend POST complete");
        self.send_once(self.client.post(&url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let backend = HttpGameBackend::new("http://localhost:8000/".to_string());
        assert_eq!(
            backend.url("/games/abc"),
            "http://localhost:8000/api/v1/games/abc"
        );
    }
}
