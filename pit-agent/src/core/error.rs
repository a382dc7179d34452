//! Errors an agent may raise across the protocol boundary.

use thiserror::Error;

/// Failure raised by an [`Agent`](crate::agent::Agent) call.
///
/// The runtime never retries these; they are reported to the orchestrator as
/// a failed request and the agent keeps serving.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The game state has no legal moves or cannot be used for move selection.
    #[error("invalid game state: {0}")]
    InvalidState(String),

    /// The agent does not implement the requested capability.
    #[error("unsupported: {0}")]
    Unsupported(String),
}

impl AgentError {
    pub fn no_legal_moves() -> Self {
        AgentError::InvalidState("no valid moves available".to_string())
    }
}
