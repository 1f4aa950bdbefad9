//! Baseline predictors without any tables.

use rand::prelude::*;
use rand::rngs::StdRng;

use crate::Outcome;
use crate::predictor::SimplePredictor;

/// A simple predictor with no state: always predict 'taken'.
#[derive(Clone, Copy, Debug, Default)]
pub struct TakenPredictor;
impl SimplePredictor for TakenPredictor {
    fn name(&self) -> &'static str { "TakenPredictor" }
    fn predict(&mut self) -> Outcome { Outcome::T }
}

/// A simple predictor with no state: always predict 'not-taken'.
#[derive(Clone, Copy, Debug, Default)]
pub struct NotTakenPredictor;
impl SimplePredictor for NotTakenPredictor {
    fn name(&self) -> &'static str { "NotTakenPredictor" }
    fn predict(&mut self) -> Outcome { Outcome::N }
}

/// Randomly predict an outcome.
///
/// Seeded explicitly so that repeated runs over the same trace agree.
#[derive(Clone, Debug)]
pub struct RandomPredictor {
    rng: StdRng,
}
impl RandomPredictor {
    pub fn new(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}
impl SimplePredictor for RandomPredictor {
    fn name(&self) -> &'static str { "RandomPredictor" }
    fn predict(&mut self) -> Outcome { self.rng.gen::<bool>().into() }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fixed_baselines() {
        assert_eq!(TakenPredictor.predict(), Outcome::T);
        assert_eq!(NotTakenPredictor.predict(), Outcome::N);
    }

    #[test]
    fn random_is_reproducible() {
        let mut a = RandomPredictor::new(7);
        let mut b = RandomPredictor::new(7);
        let xs: Vec<Outcome> = (0..64).map(|_| a.predict()).collect();
        let ys: Vec<Outcome> = (0..64).map(|_| b.predict()).collect();
        assert_eq!(xs, ys);
        assert!(xs.contains(&Outcome::T));
        assert!(xs.contains(&Outcome::N));
    }
}
