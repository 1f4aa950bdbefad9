//! Implementation of a pattern history table (PHT).

use crate::Outcome;
use crate::predictor::*;

/// A table of [SaturatingCounter] indexed by some history pattern.
///
/// Every branch that produces the same index shares the same counter.
#[derive(Clone, Debug)]
pub struct PatternHistoryTable {
    /// Table of counters
    data: Vec<SaturatingCounter>,

    /// Number of index bits
    index_bits: usize,
}
impl PatternHistoryTable {
    /// Create a table with `2^index_bits` counters in the state 'init'.
    pub fn new(index_bits: usize, init: SaturatingCounter) -> Self {
        Self {
            data: vec![init; 1 << index_bits],
            index_bits,
        }
    }

    pub fn index_bits(&self) -> usize { self.index_bits }

    /// Get the number of storage bits.
    pub fn storage_bits(&self) -> usize {
        self.data.len() * SaturatingCounter::STORAGE_BITS
    }

    /// Return the predicted direction of the counter at 'idx'.
    pub fn predict(&self, idx: usize) -> Outcome {
        self.get_entry(idx).predict()
    }

    /// Update the counter at 'idx' with the resolved outcome.
    pub fn update(&mut self, idx: usize, outcome: Outcome) {
        self.get_entry_mut(idx).update(outcome);
    }

    /// Return all counters to 'init'.
    pub fn reset(&mut self, init: SaturatingCounter) {
        self.data.fill(init);
    }
}

impl PredictorTable for PatternHistoryTable {
    type Input = usize;
    type Entry = SaturatingCounter;

    fn size(&self) -> usize { self.data.len() }

    fn get_index(&self, pattern: usize) -> usize {
        pattern & self.index_mask()
    }

    fn get_entry(&self, idx: usize) -> &SaturatingCounter {
        &self.data[idx & self.index_mask()]
    }

    fn get_entry_mut(&mut self, idx: usize) -> &mut SaturatingCounter {
        let index = idx & self.index_mask();
        &mut self.data[index]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sized_by_index_bits() {
        let pht = PatternHistoryTable::new(4, SaturatingCounter::WeaklyNotTaken);
        assert_eq!(pht.size(), 16);
        assert_eq!(pht.index_mask(), 0xf);
        assert_eq!(pht.storage_bits(), 32);
        assert_eq!(pht.get_index(0x1234), 0x4);
    }

    #[test]
    fn entries_are_independent() {
        let mut pht = PatternHistoryTable::new(2, SaturatingCounter::WeaklyNotTaken);
        pht.update(1, Outcome::T);
        assert_eq!(pht.predict(1), Outcome::T);
        assert_eq!(pht.predict(0), Outcome::N);
        assert_eq!(pht.predict(2), Outcome::N);

        // Indices alias modulo the table size
        assert_eq!(pht.predict(5), Outcome::T);

        pht.reset(SaturatingCounter::WeaklyNotTaken);
        assert_eq!(pht.predict(1), Outcome::N);
    }
}
