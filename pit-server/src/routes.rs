//! HTTP route handlers for the invocation protocol.
//!
//! | Route              | Agent call      |
//! |--------------------|-----------------|
//! | `GET /health`      | none            |
//! | `GET /info`        | identity only   |
//! | `POST /move`       | `make_move`     |
//! | `POST /game-start` | `on_game_start` |
//! | `POST /game-end`   | `on_game_end`   |
//!
//! Anything else, including a known path with the wrong method, is a 404.
//! Bodies beyond axum's default limit (2 MB) are rejected as malformed.

use axum::Router;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::response::Json;
use axum::routing::{get, post};
use pit_agent::{AgentInfo, GameResult, GameState, MoveResponse};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::state::AppState;

/// Build the router for one agent.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health).fallback(not_found))
        .route("/info", get(info).fallback(not_found))
        .route("/move", post(make_move).fallback(not_found))
        .route("/game-start", post(game_start).fallback(not_found))
        .route("/game-end", post(game_end).fallback(not_found))
        .fallback(not_found)
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct Status {
    pub status: &'static str,
}

const OK: Status = Status { status: "ok" };

async fn health() -> Json<Status> {
    Json(OK)
}

/// GET /info - the agent's immutable identity.
async fn info(State(state): State<AppState>) -> Json<AgentInfo> {
    Json(state.info().clone())
}

/// POST /move - body `{"gameState": {...}}`.
async fn make_move(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<MoveResponse>, ApiError> {
    let game_state = GameState::new(object_field(&body?, "gameState")?);
    let response = state
        .call("make_move", move |agent| agent.make_move(&game_state))
        .await?;
    Ok(Json(response))
}

/// POST /game-start - body `{"gameState": {...}}`.
async fn game_start(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Status>, ApiError> {
    let game_state = GameState::new(object_field(&body?, "gameState")?);
    state
        .call("on_game_start", move |agent| agent.on_game_start(&game_state))
        .await?;
    Ok(Json(OK))
}

/// POST /game-end - body `{"result": {...}}`.
async fn game_end(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Status>, ApiError> {
    let result = GameResult::new(object_field(&body?, "result")?);
    state
        .call("on_game_end", move |agent| agent.on_game_end(&result))
        .await?;
    Ok(Json(OK))
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Parse `body` as a JSON object and take the object stored under `key`.
fn object_field(body: &[u8], key: &str) -> Result<Map<String, Value>, ApiError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::MalformedRequest(format!("body is not valid JSON: {e}")))?;
    let Value::Object(mut envelope) = value else {
        return Err(ApiError::MalformedRequest(
            "body must be a JSON object".to_string(),
        ));
    };
    match envelope.remove(key) {
        Some(Value::Object(fields)) => Ok(fields),
        Some(_) => Err(ApiError::MalformedRequest(format!(
            "`{key}` must be a JSON object"
        ))),
        None => Err(ApiError::MalformedRequest(format!("missing `{key}`"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_field_extracts_nested_object() {
        let fields = object_field(br#"{"gameState": {"fen": "x"}}"#, "gameState").expect("field");
        assert_eq!(fields.get("fen"), Some(&Value::from("x")));
    }

    #[test]
    fn object_field_rejects_bad_bodies() {
        for (body, needle) in [
            (&b""[..], "not valid JSON"),
            (&b"[1]"[..], "must be a JSON object"),
            (&br#"{"state": {}}"#[..], "missing `gameState`"),
            (&br#"{"gameState": 3}"#[..], "`gameState` must be a JSON object"),
        ] {
            let err = object_field(body, "gameState").expect_err("malformed");
            assert!(err.to_string().contains(needle), "{err} should mention {needle}");
        }
    }
}
