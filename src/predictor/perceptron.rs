//! Implementation of a perceptron predictor.

use log::trace;

use crate::Outcome;
use crate::history::*;
use crate::predictor::*;

/// Inclusive bounds for a saturating signed weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeightRange {
    pub min: i16,
    pub max: i16,
}
impl WeightRange {
    /// The range of a two's complement integer with 'bits' bits.
    pub fn from_bits(bits: u32) -> Self {
        assert!((2..=16).contains(&bits));
        let max = ((1i32 << (bits - 1)) - 1) as i16;
        let min = (-(1i32 << (bits - 1))) as i16;
        Self { min, max }
    }

    /// Add 'adj' to 'w', saturating at either bound.
    fn step(&self, w: i16, adj: i32) -> i16 {
        (i32::from(w) + adj).clamp(i32::from(self.min), i32::from(self.max)) as i16
    }
}

/// Perceptron [with integer weights].
///
/// See the following papers:
///
/// - "Dynamic Branch Prediction with Perceptrons" (Jiménez and Lin, 2001)
/// - "Neural Methods for Dynamic Branch Prediction" (Jiménez and Lin, 2002)
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Perceptron {
    pub bias: i16,
    pub weights: Vec<i16>,
}
impl Perceptron {
    pub fn new(len: usize) -> Self {
        Self { bias: 0, weights: vec![0; len] }
    }

    /// Reset the state.
    pub fn reset(&mut self) {
        self.bias = 0;
        self.weights.fill(0);
    }

    /// Return a reference to the list of weights.
    pub fn weights(&self) -> &[i16] {
        &self.weights
    }

    /// Given some history, compute the output value.
    /// A taken history bit adds its weight, a not-taken bit subtracts it.
    pub fn output(&self, history: &HistoryRegister) -> i32 {
        history.iter().zip(self.weights.iter())
            .fold(i32::from(self.bias), |sum, (h, w)| {
                sum + h.as_sign() * i32::from(*w)
            })
    }

    /// Given some outcome, adjust the weights.
    ///
    /// When a bit in the history matches the outcome, increment the
    /// corresponding weight. Otherwise, decrement the corresponding weight.
    pub fn train(&mut self, history: &HistoryRegister, outcome: Outcome,
        range: WeightRange)
    {
        self.bias = range.step(self.bias, outcome.as_sign());
        for (w, h) in self.weights.iter_mut().zip(history.iter()) {
            let adj = if h == outcome { 1 } else { -1 };
            *w = range.step(*w, adj);
        }
    }
}

/// State carried from [PerceptronPredictor::predict] to the following
/// [PerceptronPredictor::train] for the same branch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PendingPrediction {
    /// The predicted direction
    pub outcome: Outcome,

    /// The output was too close to zero to be trusted
    pub needs_training: bool,
}

/// A table of [Perceptron] selected by a hash of the program counter, all
/// sharing one window of global history.
///
/// Training occurs after a misprediction, or when the magnitude of the
/// output is below some threshold.
///
/// The perceptron trained by [PerceptronPredictor::train] is the one chosen
/// by the program counter, but whether to train at all is decided by the
/// most recent call to [PerceptronPredictor::predict]. Callers must train
/// each branch immediately after predicting it.
#[derive(Clone, Debug)]
pub struct PerceptronPredictor {
    cfg: PerceptronConfig,
    table: Vec<Perceptron>,
    history: HistoryRegister,
    range: WeightRange,
    theta: i32,
    pending: PendingPrediction,
}
impl PerceptronPredictor {
    pub fn new(cfg: PerceptronConfig) -> Self {
        Self {
            table: vec![Perceptron::new(cfg.history_len); cfg.table_size],
            history: HistoryRegister::new(cfg.history_len),
            range: WeightRange::from_bits(cfg.weight_bits),
            theta: cfg.threshold(),
            pending: PendingPrediction::default(),
            cfg,
        }
    }

    pub fn config(&self) -> &PerceptronConfig { &self.cfg }
    pub fn threshold(&self) -> i32 { self.theta }
    pub fn history(&self) -> &HistoryRegister { &self.history }
    pub fn pending(&self) -> PendingPrediction { self.pending }
    pub fn weight_range(&self) -> WeightRange { self.range }

    /// Select a perceptron for the branch at 'pc'.
    ///
    /// The product is computed in 32-bit wrapping arithmetic.
    pub fn index(&self, pc: u32) -> usize {
        pc.wrapping_mul(self.cfg.multiplier) as usize % self.cfg.table_size
    }

    /// Returns the perceptron selected by 'pc'.
    pub fn perceptron(&self, pc: u32) -> &Perceptron {
        &self.table[self.index(pc)]
    }

    /// Returns the output value of the perceptron selected by 'pc'.
    pub fn output(&self, pc: u32) -> i32 {
        self.perceptron(pc).output(&self.history)
    }
}

impl BranchPredictor for PerceptronPredictor {
    fn name(&self) -> &'static str { "Perceptron" }

    fn predict(&mut self, pc: u32) -> Outcome {
        let out = self.output(pc);
        let outcome = if out >= 0 { Outcome::T } else { Outcome::N };
        self.pending = PendingPrediction {
            outcome,
            needs_training: out > -self.theta && out < self.theta,
        };
        outcome
    }

    fn train(&mut self, pc: u32, outcome: Outcome) {
        let idx = self.index(pc);
        let miss = self.pending.outcome != outcome;
        if miss || self.pending.needs_training {
            trace!("perceptron: train idx={} miss={} {:?}", idx, miss, outcome);
            self.table[idx].train(&self.history, outcome, self.range);
        }
        self.history.push(outcome);
    }

    fn reset(&mut self) {
        self.table.iter_mut().for_each(Perceptron::reset);
        self.history.reset();
        self.pending = PendingPrediction::default();
    }

    fn storage_bits(&self) -> usize {
        self.cfg.storage_bits()
    }
}
