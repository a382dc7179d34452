use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::info;

use super::banter::Banter;
use crate::agent::Agent;
use crate::core::chess::ChessState;
use crate::core::error::AgentError;
use crate::core::types::{GameResult, GameState, GameType, MoveResponse};
use crate::policy::{FirstLegal, MovePolicy, Turn};

/// A chess bot assembled from a move policy, a commentary pool and an RNG.
///
/// Per-game state is a move counter, reset on every game start.
pub struct ChessAgent<P, R = StdRng> {
    name: String,
    description: String,
    policy: P,
    banter: Banter,
    rng: R,
    moves_played: u32,
}

impl<P: MovePolicy> ChessAgent<P, StdRng> {
    /// Deterministic tie-breaks and commentary for a given seed.
    pub fn seeded(
        name: impl Into<String>,
        description: impl Into<String>,
        policy: P,
        seed: u64,
    ) -> Self {
        Self::with_rng(name, description, policy, StdRng::seed_from_u64(seed))
    }
}

impl<P: MovePolicy, R: RngCore + Send> ChessAgent<P, R> {
    pub fn with_rng(
        name: impl Into<String>,
        description: impl Into<String>,
        policy: P,
        rng: R,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            policy,
            banter: Banter::silent(),
            rng,
            moves_played: 0,
        }
    }

    /// Replace the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_banter(mut self, banter: Banter) -> Self {
        self.banter = banter;
        self
    }

    pub fn moves_played(&self) -> u32 {
        self.moves_played
    }
}

impl<R: RngCore + Send> ChessAgent<FirstLegal, R> {
    /// Generic chess bot using the default policy.
    pub fn first_legal(name: impl Into<String>, description: impl Into<String>, rng: R) -> Self {
        Self::with_rng(name, description, FirstLegal, rng)
    }
}

impl<P: MovePolicy, R: RngCore + Send> Agent for ChessAgent<P, R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn game_type(&self) -> GameType {
        GameType::Chess
    }

    fn make_move(&mut self, state: &GameState) -> Result<MoveResponse, AgentError> {
        let chess = ChessState::playable(state)?;
        self.moves_played += 1;

        let turn = Turn {
            state: &chess,
            ply: self.moves_played,
        };
        let chosen = self
            .policy
            .choose(turn, &mut self.rng)
            .ok_or_else(AgentError::no_legal_moves)?;

        let response = MoveResponse::from_action(&chosen.action())?;
        Ok(response.with_trash_talk(self.banter.pick(&mut self.rng)))
    }

    fn on_game_start(&mut self, state: &GameState) -> Result<(), AgentError> {
        self.moves_played = 0;
        let color = state
            .get("yourColor")
            .and_then(|c| c.as_str())
            .unwrap_or("unknown");
        info!(agent = %self.name, color, "game started");
        Ok(())
    }

    fn on_game_end(&mut self, result: &GameResult) -> Result<(), AgentError> {
        let winner = result
            .get("winner")
            .and_then(|w| w.as_str())
            .unwrap_or("unknown");
        info!(
            agent = %self.name,
            moves = self.moves_played,
            winner,
            "game ended"
        );
        Ok(())
    }
}
