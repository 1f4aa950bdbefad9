//! Implementation of a "gshare" predictor.

use log::trace;

use crate::Outcome;
use crate::history::*;
use crate::predictor::*;

/// A single [PatternHistoryTable] indexed by the program counter XOR'ed with
/// global history.
///
/// See "Combining Branch Predictors" (McFarling, 1993).
#[derive(Clone, Debug)]
pub struct Gshare {
    /// Global history
    ghr: HistoryRegister,

    /// Table of counters
    pht: PatternHistoryTable,
}
impl Gshare {
    /// Create a predictor using 'ghistory_bits' bits of global history.
    /// The table has `2^ghistory_bits` entries in the weakly not-taken state.
    pub fn new(ghistory_bits: usize) -> Self {
        Self {
            ghr: HistoryRegister::new(ghistory_bits),
            pht: PatternHistoryTable::new(
                ghistory_bits, SaturatingCounter::WeaklyNotTaken
            ),
        }
    }

    pub fn ghr(&self) -> &HistoryRegister { &self.ghr }
    pub fn pht(&self) -> &PatternHistoryTable { &self.pht }

    /// Form an index from the low bits of the program counter and the
    /// current global history.
    pub fn index(&self, pc: u32) -> usize {
        let mask = self.pht.index_mask();
        (pc as usize & mask) ^ (self.ghr.value() & mask)
    }
}

impl BranchPredictor for Gshare {
    fn name(&self) -> &'static str { "Gshare" }

    fn predict(&mut self, pc: u32) -> Outcome {
        self.pht.predict(self.index(pc))
    }

    fn train(&mut self, pc: u32, outcome: Outcome) {
        // The index must be formed before global history is updated
        let idx = self.index(pc);
        trace!("gshare: pc={:08x} ghr={} idx={:x} {:?}", pc, self.ghr, idx, outcome);
        self.pht.update(idx, outcome);
        self.ghr.push(outcome);
    }

    fn reset(&mut self) {
        self.ghr.reset();
        self.pht.reset(SaturatingCounter::WeaklyNotTaken);
    }

    fn storage_bits(&self) -> usize {
        self.pht.storage_bits() + self.ghr.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::prelude::*;
    use rand::rngs::StdRng;

    #[test]
    fn end_to_end_constant_branch() {
        let mut p = Gshare::new(4);
        let pc = 0x4;

        // First training uses index (0x4 ^ 0) with a weakly not-taken counter
        assert_eq!(p.index(pc), 0x4);
        assert_eq!(p.predict(pc), Outcome::N);
        p.train(pc, Outcome::T);
        assert_eq!(*p.pht().get_entry(0x4), SaturatingCounter::WeaklyTaken);

        let mut predictions = Vec::new();
        for _ in 0..4 {
            predictions.push(p.predict(pc));
            p.train(pc, Outcome::T);
        }

        // Once history is all ones, the branch keeps using index (0x4 ^ 0xf)
        assert_eq!(p.ghr().value(), 0xf);
        assert_eq!(p.index(pc), 0xb);
        assert_eq!(*p.pht().get_entry(0xb), SaturatingCounter::WeaklyTaken);
        for _ in 0..8 {
            p.train(pc, Outcome::T);
        }
        assert_eq!(*p.pht().get_entry(0xb), SaturatingCounter::StronglyTaken);
        assert_eq!(p.predict(pc), Outcome::T);
        assert_eq!(predictions, vec![Outcome::N; 4]);
    }

    #[test]
    fn converges_within_three_trainings() {
        // With a single branch and a constant not-taken outcome, global
        // history stays at zero and the index never changes.
        let mut p = Gshare::new(8);
        let pc = 0x1234_5678;
        let idx = p.index(pc);
        for _ in 0..3 {
            p.train(pc, Outcome::N);
            assert_eq!(p.index(pc), idx);
        }
        assert_eq!(*p.pht().get_entry(idx), SaturatingCounter::StronglyNotTaken);
        for _ in 0..16 {
            assert_eq!(p.predict(pc), Outcome::N);
            p.train(pc, Outcome::N);
        }
    }

    #[test]
    fn converges_on_a_fixed_index() {
        // Constant taken branch: index settles once history fills with ones.
        let mut p = Gshare::new(6);
        let pc = 0x80;
        for _ in 0..6 {
            p.train(pc, Outcome::T);
        }
        let idx = p.index(pc);
        let mut trainings = 0;
        while p.predict(pc) != Outcome::T || !p.pht().get_entry(idx).is_strong() {
            p.train(pc, Outcome::T);
            trainings += 1;
            assert_eq!(p.index(pc), idx);
        }
        assert!(trainings <= 3);
    }

    #[test]
    fn deterministic() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let trace: Vec<(u32, Outcome)> = (0..4096)
            .map(|_| (rng.gen_range(0..256) * 4, rng.gen::<bool>().into()))
            .collect();

        let run = |trace: &[(u32, Outcome)]| {
            let mut p = Gshare::new(10);
            trace.iter().map(|(pc, outcome)| {
                let pred = p.predict(*pc);
                p.train(*pc, *outcome);
                pred
            }).collect::<Vec<Outcome>>()
        };
        assert_eq!(run(&trace), run(&trace));
    }

    #[test]
    fn history_is_masked() {
        let mut p = Gshare::new(3);
        for _ in 0..100 {
            p.train(0, Outcome::T);
        }
        assert_eq!(p.ghr().value(), 0b111);
        p.reset();
        assert_eq!(p.ghr().value(), 0);
        assert_eq!(p.predict(0), Outcome::N);
        assert_eq!(p.storage_bits(), 8 * 2 + 3);
    }
}
