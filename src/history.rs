//! Branch history registers.

use bitvec::prelude::*;
use crate::branch::Outcome;

/// A shift register of branch outcomes.
///
/// Bit 0 is always the most recent outcome. Shifting a new outcome in moves
/// every bit toward the back of the register and the oldest bit falls off the
/// end, so only the most recent `len` outcomes are ever retained.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryRegister {
    data: BitVec<usize, Lsb0>,
    len: usize,
}

// NOTE: This *reverses* the all of the bits and presents them in a format
// where the leftmost bit is the most-significant (index n) and the rightmost
// bit is the least-significant (index 0).
impl std::fmt::Display for HistoryRegister {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let x: String = self.data.as_bitslice().iter().by_vals()
            .map(|b| if b { '1' } else { '0' })
            .rev()
            .collect();
        write!(f, "{}", x)
    }
}

impl HistoryRegister {
    /// Create a register with the specified length in bits.
    /// All bits in the register are initialized to zero.
    pub fn new(len: usize) -> Self {
        assert!(len > 0, "history register must hold at least one bit");
        Self {
            data: bitvec![usize, Lsb0; 0; len],
            len,
        }
    }

    pub fn len(&self) -> usize { self.len }

    /// Clear all history.
    pub fn reset(&mut self) {
        self.data.fill(false);
    }
}

impl HistoryRegister {
    /// Shift the register by one bit and insert 'outcome' as the newest bit.
    pub fn push(&mut self, outcome: Outcome) {
        self.data.shift_right(1);
        self.data.set(0, outcome.is_taken());
    }

    /// Return the outcome 'n' branches ago (index 0 is the most recent).
    pub fn get(&self, n: usize) -> Outcome {
        Outcome::from(self.data[n])
    }

    /// Iterate over the recorded outcomes, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = Outcome> + '_ {
        self.data.iter().by_vals().map(Outcome::from)
    }

    /// Return the register as an integer, where bit 0 is the most recent
    /// outcome. Only valid for registers no wider than a [usize].
    pub fn value(&self) -> usize {
        assert!(self.len <= usize::BITS as usize);
        self.data.load_le::<usize>()
    }
}
