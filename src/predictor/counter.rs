//! Implementation of a 2-bit saturating counter.

use crate::Outcome;
use crate::predictor::StatefulPredictor;

/// A 2-bit saturating counter used to follow the behavior of a branch.
///
/// Only the four legal states are representable. Moving past either end of
/// the range leaves the counter where it is.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum SaturatingCounter {
    StronglyNotTaken = 0,
    #[default]
    WeaklyNotTaken = 1,
    WeaklyTaken = 2,
    StronglyTaken = 3,
}
impl SaturatingCounter {
    /// Number of storage bits for a single counter.
    pub const STORAGE_BITS: usize = 2;

    /// The numeric value of this state.
    pub fn value(self) -> u8 { self as u8 }

    /// Move one state toward [SaturatingCounter::StronglyTaken].
    pub fn increment(&mut self) {
        *self = match *self {
            Self::StronglyNotTaken => Self::WeaklyNotTaken,
            Self::WeaklyNotTaken => Self::WeaklyTaken,
            Self::WeaklyTaken | Self::StronglyTaken => Self::StronglyTaken,
        };
    }

    /// Move one state toward [SaturatingCounter::StronglyNotTaken].
    pub fn decrement(&mut self) {
        *self = match *self {
            Self::StronglyNotTaken | Self::WeaklyNotTaken => {
                Self::StronglyNotTaken
            },
            Self::WeaklyTaken => Self::WeaklyNotTaken,
            Self::StronglyTaken => Self::WeaklyTaken,
        };
    }

    /// Returns 'true' if the counter is in one of the two 'strong' states.
    pub fn is_strong(self) -> bool {
        matches!(self, Self::StronglyNotTaken | Self::StronglyTaken)
    }
}

impl StatefulPredictor for SaturatingCounter {
    fn name(&self) -> &'static str { "SaturatingCounter" }
    fn predict(&self) -> Outcome {
        Outcome::from(self.value() >= Self::WeaklyTaken.value())
    }
    fn reset(&mut self) {
        *self = Self::default();
    }
    fn update(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::T => self.increment(),
            Outcome::N => self.decrement(),
        }
    }
}
