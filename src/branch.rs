//! Types for representing branches and branch outcomes.

use bitvec::prelude::*;

/// A branch outcome.
#[repr(u32)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Outcome {
    /// Not taken
    #[default]
    N = 0,
    /// Taken
    T = 1
}

impl Outcome {
    /// Convert a sequence of bits into outcomes ('1' is taken).
    pub fn vec_from_bits(bits: &BitSlice) -> Vec<Self> {
        bits.iter().by_vals().map(Self::from).collect()
    }

    /// Returns 'true' if this outcome is 'taken'.
    pub fn is_taken(self) -> bool {
        matches!(self, Self::T)
    }

    /// The outcome as a single history bit (taken is '1').
    pub fn as_bit(self) -> usize {
        self as usize
    }

    /// The outcome as a signed perceptron input (taken is '+1').
    pub fn as_sign(self) -> i32 {
        match self {
            Self::T => 1,
            Self::N => -1,
        }
    }
}

impl std::fmt::Debug for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::T => "t",
            Self::N => "n",
        };
        write!(f, "{}", s)
    }
}

impl std::ops::Not for Outcome {
    type Output = Self;
    fn not(self) -> Self {
        match self {
            Self::N => Self::T,
            Self::T => Self::N,
        }
    }
}

impl From<bool> for Outcome {
    fn from(x: bool) -> Self {
        match x {
            true => Self::T,
            false => Self::N
        }
    }
}
impl From<Outcome> for bool {
    fn from(x: Outcome) -> Self {
        x.is_taken()
    }
}

/// A record of some resolved conditional branch in a trace.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct BranchRecord {
    /// The program counter value for this branch
    pub pc: u32,

    /// The outcome evaluated for this branch
    pub outcome: Outcome,
}
impl BranchRecord {
    pub fn new(pc: u32, outcome: Outcome) -> Self {
        Self { pc, outcome }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn outcome_bool_conversions() {
        assert_eq!(Outcome::from(true), Outcome::T);
        assert_eq!(Outcome::from(false), Outcome::N);
        assert!(bool::from(Outcome::T));
        assert!(!bool::from(Outcome::N));
        assert_eq!(!Outcome::T, Outcome::N);
    }

    #[test]
    fn outcome_from_bits() {
        let bits = bitvec![1, 0, 0, 1];
        let v = Outcome::vec_from_bits(&bits);
        assert_eq!(v, vec![Outcome::T, Outcome::N, Outcome::N, Outcome::T]);
        assert_eq!(Outcome::T.as_sign(), 1);
        assert_eq!(Outcome::N.as_sign(), -1);
        assert_eq!(Outcome::T.as_bit(), 1);
    }
}
