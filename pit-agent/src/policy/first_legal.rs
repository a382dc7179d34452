use rand::RngCore;

use super::{MovePolicy, Turn};
use crate::core::chess::LegalMove;

/// Default chess policy: always the first legal move listed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstLegal;

impl MovePolicy for FirstLegal {
    fn choose<'a>(&mut self, turn: Turn<'a>, _rng: &mut dyn RngCore) -> Option<&'a LegalMove> {
        turn.moves().first()
    }
}
