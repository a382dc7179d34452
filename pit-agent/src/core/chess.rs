//! Typed chess view over an opaque [`GameState`].
//!
//! Only the fields chess bots act on are decoded. Everything else in the
//! state stays in the original map and is ignored. Only `validMoves` must be
//! well formed; an informational field of the wrong type reads as absent.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::core::error::AgentError;
use crate::core::types::GameState;

/// A legal move as supplied by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalMove {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<String>,
    /// Standard algebraic notation, e.g. `Nxe5+`.
    #[serde(default)]
    pub san: String,
}

impl LegalMove {
    pub fn is_capture(&self) -> bool {
        self.san.contains('x')
    }

    /// Check or checkmate.
    pub fn is_check(&self) -> bool {
        self.san.contains('+') || self.san.contains('#')
    }

    pub fn matches(&self, from: &str, to: &str, promotion: Option<&str>) -> bool {
        self.from == from && self.to == to && self.promotion.as_deref() == promotion
    }

    pub fn action(&self) -> ChessAction {
        ChessAction {
            from: self.from.clone(),
            to: self.to.clone(),
            promotion: self.promotion.clone(),
        }
    }
}

/// The chess action returned to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChessAction {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<String>,
}

/// Chess fields recognised in a [`GameState`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChessState {
    /// `white` or `black`.
    #[serde(deserialize_with = "string_or_absent")]
    pub your_color: Option<String>,
    /// Current position in FEN.
    #[serde(deserialize_with = "string_or_absent")]
    pub fen: Option<String>,
    pub valid_moves: Vec<LegalMove>,
}

impl ChessState {
    /// Decode the chess view. A missing `validMoves` decodes as empty.
    pub fn from_state(state: &GameState) -> Result<Self, AgentError> {
        serde_json::from_value(Value::Object(state.fields().clone()))
            .map_err(|e| AgentError::InvalidState(format!("chess state: {e}")))
    }

    /// Like [`ChessState::from_state`] but rejects states without legal moves.
    pub fn playable(state: &GameState) -> Result<Self, AgentError> {
        let chess = Self::from_state(state)?;
        if chess.valid_moves.is_empty() {
            return Err(AgentError::no_legal_moves());
        }
        Ok(chess)
    }
}

fn string_or_absent<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}
