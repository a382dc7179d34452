//! The capability set every bot implements.
//!
//! Per game the orchestrator follows
//! `Idle -> game-start -> AwaitingMove -> (move)* -> game-end -> Idle`.
//! Nothing enforces that order: a runtime dispatches calls as they arrive, so
//! an agent must behave sanely when `make_move` comes before any game start
//! or after a game end.

use serde::Serialize;

use crate::core::error::AgentError;
use crate::core::types::{GameResult, GameState, GameType, MoveResponse};

/// A turn-based game bot.
///
/// Calls against one instance are never concurrent; a runtime serializes
/// them, so implementations may keep plain mutable per-game state.
pub trait Agent: Send {
    /// Display name. Must not change after construction.
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Must return the same value on every call.
    fn game_type(&self) -> GameType;

    /// Choose an action for the current turn.
    ///
    /// Returns [`AgentError::InvalidState`] when the state has no legal moves.
    /// Failures of external collaborators must be handled inside the agent.
    fn make_move(&mut self, state: &GameState) -> Result<MoveResponse, AgentError>;

    /// Called once per game before its first move.
    fn on_game_start(&mut self, _state: &GameState) -> Result<(), AgentError> {
        Ok(())
    }

    /// Called once per game after its last move, or on abrupt termination.
    fn on_game_end(&mut self, _result: &GameResult) -> Result<(), AgentError> {
        Ok(())
    }
}

/// Immutable identity of an agent, as reported by `GET /info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentInfo {
    pub name: String,
    pub description: String,
    pub game_type: GameType,
}

impl AgentInfo {
    pub fn of(agent: &dyn Agent) -> Self {
        Self {
            name: agent.name().to_string(),
            description: agent.description().to_string(),
            game_type: agent.game_type(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Passive;

    impl Agent for Passive {
        fn name(&self) -> &str {
            "Passive"
        }

        fn description(&self) -> &str {
            ""
        }

        fn game_type(&self) -> GameType {
            GameType::Trivia
        }

        fn make_move(&mut self, _state: &GameState) -> Result<MoveResponse, AgentError> {
            Err(AgentError::Unsupported("trivia answers".to_string()))
        }
    }

    #[test]
    fn hooks_default_to_no_op() {
        let mut agent = Passive;
        agent.on_game_start(&GameState::default()).expect("start");
        agent.on_game_end(&GameResult::default()).expect("end");
        assert!(agent.make_move(&GameState::default()).is_err());
    }

    #[test]
    fn info_serializes_wire_names() {
        let info = AgentInfo::of(&Passive);
        let encoded = serde_json::to_value(&info).expect("serialize");
        assert_eq!(
            encoded,
            json!({"name": "Passive", "description": "", "gameType": "trivia"})
        );
    }
}
