use rand::RngCore;
use rand::seq::SliceRandom;

/// Pool of trash-talk lines. `None` entries make the bot stay quiet.
#[derive(Debug, Clone, Default)]
pub struct Banter {
    lines: Vec<Option<String>>,
}

impl Banter {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(|line| line.map(Into::into)).collect(),
        }
    }

    /// Never says anything.
    pub fn silent() -> Self {
        Self::default()
    }

    /// Taunts of the heuristic bot; quiet about a quarter of the time.
    pub fn taunts() -> Self {
        Self::new([
            Some("Claws out!"),
            Some("Is that really your best move?"),
            Some("My circuits are barely warming up."),
            Some("Interesting choice... for a hatchling."),
            Some("You're making this too easy."),
            Some("Into the Pit with you!"),
            None,
            None,
        ])
    }

    /// Lines of the engine-backed bot.
    pub fn engine() -> Self {
        Self::new([
            Some("Calculated. Precise. Inevitable."),
            Some("My evaluation says +3. Your evaluation says 'hope'."),
            Some("The engine sees all. Into the Pit!"),
        ])
    }

    pub fn pick(&self, rng: &mut dyn RngCore) -> Option<String> {
        self.lines.choose(rng).cloned().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn silent_banter_never_speaks() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!((0..32).all(|_| Banter::silent().pick(&mut rng).is_none()));
    }

    #[test]
    fn taunts_mix_lines_and_silence() {
        let banter = Banter::taunts();
        let mut rng = StdRng::seed_from_u64(11);
        let picks: Vec<Option<String>> = (0..200).map(|_| banter.pick(&mut rng)).collect();
        assert!(picks.iter().any(Option::is_none));
        assert!(picks.iter().flatten().all(|line| !line.is_empty()));
        assert!(picks.iter().flatten().count() > 0);
    }
}
