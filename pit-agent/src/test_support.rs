//! Test-only agents and builders.

use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use crate::agent::Agent;
use crate::core::chess::LegalMove;
use crate::core::error::AgentError;
use crate::core::types::{GameResult, GameState, GameType, MoveResponse};

/// Build a legal move with SAN.
pub fn legal(from: &str, to: &str, san: &str) -> LegalMove {
    LegalMove {
        from: from.to_string(),
        to: to.to_string(),
        promotion: None,
        san: san.to_string(),
    }
}

/// Build a game state from a JSON object literal.
pub fn chess_state(value: Value) -> GameState {
    match GameState::try_from(value) {
        Ok(state) => state,
        Err(err) => panic!("test state must be an object: {err}"),
    }
}

/// One recorded agent call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GameStart,
    Move,
    GameEnd,
}

/// Agent that records every call and answers with a fixed action.
///
/// Fails `make_move` with `InvalidState` when the state carries an empty
/// `validMoves` list, like a real bot would.
#[derive(Debug, Clone, Default)]
pub struct RecordingAgent {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl RecordingAgent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared view of the call log; stays valid after the agent is boxed.
    pub fn calls(&self) -> Arc<Mutex<Vec<Call>>> {
        Arc::clone(&self.calls)
    }

    fn record(&self, call: Call) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl Agent for RecordingAgent {
    fn name(&self) -> &str {
        "Recorder"
    }

    fn description(&self) -> &str {
        "Records lifecycle calls"
    }

    fn game_type(&self) -> GameType {
        GameType::Chess
    }

    fn make_move(&mut self, state: &GameState) -> Result<MoveResponse, AgentError> {
        if state
            .get("validMoves")
            .and_then(Value::as_array)
            .is_some_and(Vec::is_empty)
        {
            return Err(AgentError::no_legal_moves());
        }
        self.record(Call::Move);
        Ok(MoveResponse::new(json!({"from": "e2", "to": "e4"})))
    }

    fn on_game_start(&mut self, _state: &GameState) -> Result<(), AgentError> {
        self.record(Call::GameStart);
        Ok(())
    }

    fn on_game_end(&mut self, _result: &GameResult) -> Result<(), AgentError> {
        self.record(Call::GameEnd);
        Ok(())
    }
}
