//! Implementations of different branch predictors.

pub mod table;
pub mod simple;
pub mod counter;
pub mod pht;
pub mod gshare;
pub mod tournament;
pub mod perceptron;
pub mod config;

pub use table::*;
pub use simple::*;
pub use counter::*;
pub use pht::*;
pub use gshare::*;
pub use tournament::*;
pub use perceptron::*;
pub use config::*;

use crate::Outcome;

/// Interface to a "trivial" predictor that guesses an outcome without
/// accepting feedback from the rest of the machine.
pub trait SimplePredictor {
    fn name(&self) -> &'static str;
    fn predict(&mut self) -> Outcome;
}

/// Interface to a predictor with some internal state which is only subject to
/// change by the correct branch outcome.
pub trait StatefulPredictor {
    fn name(&self) -> &'static str;

    /// Reset the internal state of the predictor.
    fn reset(&mut self);

    /// Return the current predicted outcome.
    fn predict(&self) -> Outcome;

    /// Update the internal state of the predictor with the correct outcome.
    fn update(&mut self, outcome: Outcome);
}

/// Interface to a conditional branch predictor driven by a trace.
///
/// The caller must present branches in program order: each call to
/// [BranchPredictor::train] resolves the branch passed to the most recent
/// call to [BranchPredictor::predict].
pub trait BranchPredictor {
    fn name(&self) -> &'static str;

    /// Predict the direction of the branch at 'pc'.
    fn predict(&mut self, pc: u32) -> Outcome;

    /// Update the predictor with the resolved outcome of the branch at 'pc'.
    fn train(&mut self, pc: u32, outcome: Outcome);

    /// Return every table to its initial state.
    fn reset(&mut self);

    /// Get the [approximate] number of storage bits.
    fn storage_bits(&self) -> usize;
}

/// A predictor selected by [PredictorConfig], fixed for the lifetime of a run.
#[derive(Clone, Debug)]
pub enum Predictor {
    Static(TakenPredictor),
    Gshare(Gshare),
    Tournament(Tournament),
    Custom(PerceptronPredictor),
}
impl Predictor {
    /// Returns the kind of predictor in use.
    pub fn kind(&self) -> PredictorKind {
        match self {
            Self::Static(_) => PredictorKind::Static,
            Self::Gshare(_) => PredictorKind::Gshare,
            Self::Tournament(_) => PredictorKind::Tournament,
            Self::Custom(_) => PredictorKind::Custom,
        }
    }
}

impl BranchPredictor for Predictor {
    fn name(&self) -> &'static str {
        match self {
            Self::Static(p) => SimplePredictor::name(p),
            Self::Gshare(p) => p.name(),
            Self::Tournament(p) => p.name(),
            Self::Custom(p) => p.name(),
        }
    }

    fn predict(&mut self, pc: u32) -> Outcome {
        match self {
            Self::Static(p) => SimplePredictor::predict(p),
            Self::Gshare(p) => p.predict(pc),
            Self::Tournament(p) => p.predict(pc),
            Self::Custom(p) => p.predict(pc),
        }
    }

    fn train(&mut self, pc: u32, outcome: Outcome) {
        match self {
            Self::Static(_) => {},
            Self::Gshare(p) => p.train(pc, outcome),
            Self::Tournament(p) => p.train(pc, outcome),
            Self::Custom(p) => p.train(pc, outcome),
        }
    }

    fn reset(&mut self) {
        match self {
            Self::Static(_) => {},
            Self::Gshare(p) => p.reset(),
            Self::Tournament(p) => p.reset(),
            Self::Custom(p) => p.reset(),
        }
    }

    fn storage_bits(&self) -> usize {
        match self {
            Self::Static(_) => 0,
            Self::Gshare(p) => p.storage_bits(),
            Self::Tournament(p) => p.storage_bits(),
            Self::Custom(p) => p.storage_bits(),
        }
    }
}
