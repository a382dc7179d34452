//! Move-selection policies.
//!
//! A policy decides which legal move to play; a bot composes one with its
//! own bookkeeping and commentary. Swapping the policy swaps the playing
//! strength without touching transport or lifecycle code.

use rand::RngCore;

use crate::core::chess::{ChessState, LegalMove};

mod engine;
mod first_legal;
mod heuristic;

pub use engine::Engine;
pub use first_legal::FirstLegal;
pub use heuristic::Heuristic;

/// What a policy sees when asked for a move.
#[derive(Debug, Clone, Copy)]
pub struct Turn<'a> {
    pub state: &'a ChessState,
    /// 1-based count of moves this agent has been asked for in the game.
    pub ply: u32,
}

impl<'a> Turn<'a> {
    pub fn moves(&self) -> &'a [LegalMove] {
        &self.state.valid_moves
    }
}

/// Chooses one of the legal moves of a turn.
///
/// Callers guarantee `turn.moves()` is non-empty. Ties are broken with `rng`
/// so tests can inject a seeded source.
pub trait MovePolicy: Send {
    fn choose<'a>(&mut self, turn: Turn<'a>, rng: &mut dyn RngCore) -> Option<&'a LegalMove>;
}
