//! Reference bots.
//!
//! Each one is a [`ChessAgent`] with a different policy and commentary. They
//! exist to show the contract in use, not to play well.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::io::engine::EngineSettings;
use crate::policy::{Engine, FirstLegal, Heuristic};

mod banter;
mod chess;

pub use banter::Banter;
pub use chess::ChessAgent;

/// Seeded RNG, or one seeded from OS entropy.
pub fn rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Always plays the first legal move. Says nothing.
pub fn first_move_bot(seed: Option<u64>) -> ChessAgent<FirstLegal> {
    ChessAgent::first_legal(
        "First Move Bot",
        "Plays the first legal move it is offered",
        rng(seed),
    )
}

/// Captures, checks and central pawn pushes, with occasional taunts.
pub fn simple_bot(seed: Option<u64>) -> ChessAgent<Heuristic> {
    ChessAgent::with_rng(
        "Simple Bot",
        "A basic chess bot for testing",
        Heuristic::default(),
        rng(seed),
    )
    .with_banter(Banter::taunts())
}

/// Asks an external UCI engine for every move, falling back to random play.
pub fn engine_bot(settings: EngineSettings, seed: Option<u64>) -> ChessAgent<Engine> {
    ChessAgent::with_rng(
        "Stockfish Bot",
        "Powered by the Stockfish chess engine",
        Engine::new(settings),
        rng(seed),
    )
    .with_banter(Banter::engine())
}
