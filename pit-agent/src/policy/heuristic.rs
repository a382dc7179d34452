use rand::RngCore;
use rand::seq::SliceRandom;

use super::{MovePolicy, Turn};
use crate::core::chess::LegalMove;

/// Squares the heuristic prefers to occupy early in a game.
pub const CENTER_SQUARES: [&str; 6] = ["e4", "d4", "e5", "d5", "c4", "f4"];

/// Own moves (counting the current one) below which central moves are favoured.
pub const OPENING_WINDOW: u32 = 10;

/// Tiered preferences: captures, then checks, then central squares during the
/// opening, then anything. Ties within a tier are broken uniformly at random.
#[derive(Debug, Clone)]
pub struct Heuristic {
    opening_window: u32,
}

impl Heuristic {
    pub fn new(opening_window: u32) -> Self {
        Self { opening_window }
    }

    fn in_opening(&self, ply: u32) -> bool {
        ply < self.opening_window
    }
}

impl Default for Heuristic {
    fn default() -> Self {
        Self::new(OPENING_WINDOW)
    }
}

impl MovePolicy for Heuristic {
    fn choose<'a>(&mut self, turn: Turn<'a>, rng: &mut dyn RngCore) -> Option<&'a LegalMove> {
        let moves = turn.moves();

        let captures = tier(moves, LegalMove::is_capture);
        if let Some(mv) = captures.choose(rng).copied() {
            return Some(mv);
        }

        let checks = tier(moves, LegalMove::is_check);
        if let Some(mv) = checks.choose(rng).copied() {
            return Some(mv);
        }

        if self.in_opening(turn.ply) {
            let central = tier(moves, |mv| CENTER_SQUARES.contains(&mv.to.as_str()));
            if let Some(mv) = central.choose(rng).copied() {
                return Some(mv);
            }
        }

        moves.choose(rng)
    }
}

fn tier(moves: &[LegalMove], keep: impl Fn(&LegalMove) -> bool) -> Vec<&LegalMove> {
    moves.iter().filter(|mv| keep(*mv)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chess::ChessState;
    use crate::test_support::legal;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn pick(moves: Vec<LegalMove>, ply: u32, seed: u64) -> LegalMove {
        let state = ChessState {
            valid_moves: moves,
            ..ChessState::default()
        };
        let mut rng = StdRng::seed_from_u64(seed);
        Heuristic::default()
            .choose(Turn { state: &state, ply }, &mut rng)
            .cloned()
            .expect("move")
    }

    #[test]
    fn capture_beats_everything_else() {
        for seed in 0..16 {
            let chosen = pick(
                vec![
                    legal("e2", "e4", "e4"),
                    legal("d2", "d4", "dxe5"),
                    legal("f1", "b5", "Bb5+"),
                ],
                1,
                seed,
            );
            assert_eq!(chosen.san, "dxe5");
        }
    }

    #[test]
    fn check_beats_quiet_central_moves() {
        for seed in 0..16 {
            let chosen = pick(
                vec![legal("e2", "e4", "e4"), legal("d1", "h5", "Qh5#")],
                1,
                seed,
            );
            assert_eq!(chosen.san, "Qh5#");
        }
    }

    #[test]
    fn central_squares_only_matter_in_the_opening() {
        let moves = vec![legal("a2", "a3", "a3"), legal("e2", "e4", "e4")];
        for seed in 0..16 {
            assert_eq!(pick(moves.clone(), 1, seed).to, "e4");
        }

        let late: Vec<String> = (0..64)
            .map(|seed| pick(moves.clone(), OPENING_WINDOW, seed).to)
            .collect();
        assert!(late.iter().any(|to| to == "a3"));
        assert!(late.iter().any(|to| to == "e4"));
    }

    #[test]
    fn ties_are_broken_by_the_injected_rng() {
        let moves = vec![
            legal("b1", "c3", "Nxc3"),
            legal("g1", "f3", "Nxf3"),
            legal("d1", "d8", "Qxd8"),
        ];
        let first = pick(moves.clone(), 1, 7);
        let again = pick(moves, 1, 7);
        assert_eq!(first, again);
    }
}
