use rand::RngCore;
use rand::seq::SliceRandom;
use tracing::{debug, warn};

use super::{MovePolicy, Turn};
use crate::core::chess::LegalMove;
use crate::io::engine::{EngineError, EngineSettings, best_move};

/// Delegates to an external UCI engine, one process per move.
///
/// Any engine failure (spawn error, timeout, garbage output, illegal
/// suggestion) is logged and replaced by a uniformly random legal move.
#[derive(Debug, Clone)]
pub struct Engine {
    settings: EngineSettings,
}

impl Engine {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    fn consult<'a>(&self, turn: Turn<'a>) -> Result<&'a LegalMove, EngineError> {
        let fen = turn
            .state
            .fen
            .as_deref()
            .filter(|fen| !fen.trim().is_empty())
            .ok_or(EngineError::MissingPosition)?;

        let suggestion = best_move(&self.settings, fen)?;
        let promotion = suggestion.promotion.as_deref();
        turn.moves()
            .iter()
            .find(|mv| mv.matches(&suggestion.from, &suggestion.to, promotion))
            .ok_or_else(|| {
                EngineError::IllegalMove(format!(
                    "{}{}{}",
                    suggestion.from,
                    suggestion.to,
                    promotion.unwrap_or("")
                ))
            })
    }
}

impl MovePolicy for Engine {
    fn choose<'a>(&mut self, turn: Turn<'a>, rng: &mut dyn RngCore) -> Option<&'a LegalMove> {
        match self.consult(turn) {
            Ok(mv) => {
                debug!(from = %mv.from, to = %mv.to, "engine move");
                Some(mv)
            }
            Err(err) => {
                warn!(err = %err, "engine failed, falling back to a random move");
                turn.moves().choose(rng)
            }
        }
    }
}
