//! Wire-level data shapes exchanged with the orchestrator.
//!
//! These types define the stable JSON contract of the invocation protocol.
//! Payloads are opaque bags of keys; game-specific meaning is layered on top
//! by typed views such as [`crate::core::chess::ChessState`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::error::AgentError;

/// Game an agent plays. Fixed for the lifetime of an agent instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    Chess,
    Trivia,
    Debate,
}

impl GameType {
    pub fn as_str(self) -> &'static str {
        match self {
            GameType::Chess => "chess",
            GameType::Trivia => "trivia",
            GameType::Debate => "debate",
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameType {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chess" => Ok(GameType::Chess),
            "trivia" => Ok(GameType::Trivia),
            "debate" => Ok(GameType::Debate),
            other => Err(AgentError::Unsupported(format!("game type `{other}`"))),
        }
    }
}

/// Per-turn context supplied by the orchestrator.
///
/// Must be a JSON object; its keys are not interpreted by the runtime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameState(Map<String, Value>);

impl GameState {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl TryFrom<Value> for GameState {
    type Error = AgentError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(AgentError::InvalidState(format!(
                "game state must be an object, got {}",
                json_kind(&other)
            ))),
        }
    }
}

/// How a game ended. Passed through to `on_game_end` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameResult(Map<String, Value>);

impl GameResult {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

/// An agent's answer to a move request.
///
/// `trash_talk` is omitted from the JSON entirely when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveResponse {
    pub action: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trash_talk: Option<String>,
}

impl MoveResponse {
    pub fn new(action: Value) -> Self {
        Self {
            action,
            trash_talk: None,
        }
    }

    /// Build a response from any serializable action.
    pub fn from_action<A: Serialize>(action: &A) -> Result<Self, AgentError> {
        let action = serde_json::to_value(action)
            .map_err(|e| AgentError::InvalidState(format!("serialize action: {e}")))?;
        Ok(Self::new(action))
    }

    /// Attach commentary. Blank strings count as no commentary.
    pub fn with_trash_talk(mut self, line: Option<String>) -> Self {
        self.trash_talk = line.filter(|l| !l.trim().is_empty());
        self
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
