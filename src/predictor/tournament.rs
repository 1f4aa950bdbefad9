//! Implementation of a "tournament" predictor.

use log::trace;

use crate::Outcome;
use crate::history::*;
use crate::predictor::*;

/// Identifies which sub-predictor the chooser selects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TournamentProvider {
    /// The per-branch (local history) predictor
    Local,
    /// The global history predictor
    Global,
}
impl From<SaturatingCounter> for TournamentProvider {
    fn from(ctr: SaturatingCounter) -> Self {
        match ctr.predict() {
            Outcome::N => Self::Local,
            Outcome::T => Self::Global,
        }
    }
}

/// Container for output from [Tournament::lookup], including both
/// sub-predictions and the state used to produce them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TournamentPrediction {
    /// The sub-predictor selected by the chooser
    pub provider: TournamentProvider,

    /// Predicted direction from the local predictor
    pub local: Outcome,

    /// Predicted direction from the global predictor
    pub global: Outcome,

    /// Index into the local history table
    pub pc_idx: usize,

    /// Local history (index into the local PHT)
    pub lhist: usize,

    /// Global history (index into the global PHT and the chooser)
    pub ghist: usize,
}
impl TournamentPrediction {
    /// The predicted direction from the selected provider.
    pub fn outcome(&self) -> Outcome {
        match self.provider {
            TournamentProvider::Local => self.local,
            TournamentProvider::Global => self.global,
        }
    }
}

/// A hybrid predictor choosing between a local history predictor and a
/// global history predictor.
///
/// - The local history table records the recent outcomes of each branch
///   (indexed by the low bits of the program counter).
/// - The local PHT is indexed by local history.
/// - The global PHT is indexed by global history.
/// - The chooser is indexed by global history, and its counters drift
///   toward whichever sub-predictor was correct when the other was wrong.
///
/// See "Combining Branch Predictors" (McFarling, 1993) and the Alpha 21264.
#[derive(Clone, Debug)]
pub struct Tournament {
    ghr: HistoryRegister,
    lbht: Vec<usize>,
    lpht: PatternHistoryTable,
    gpht: PatternHistoryTable,
    chooser: PatternHistoryTable,

    lhistory_bits: usize,
    pc_index_bits: usize,
}
impl Tournament {
    /// Counters in both PHTs start weakly not-taken.
    pub const PHT_INIT: SaturatingCounter = SaturatingCounter::WeaklyNotTaken;

    /// Chooser counters start out weakly preferring the global predictor.
    pub const CHOOSER_INIT: SaturatingCounter = SaturatingCounter::WeaklyTaken;

    pub fn new(ghistory_bits: usize, lhistory_bits: usize, pc_index_bits: usize)
        -> Self
    {
        Self {
            ghr: HistoryRegister::new(ghistory_bits),
            lbht: vec![0; 1 << pc_index_bits],
            lpht: PatternHistoryTable::new(lhistory_bits, Self::PHT_INIT),
            gpht: PatternHistoryTable::new(ghistory_bits, Self::PHT_INIT),
            chooser: PatternHistoryTable::new(ghistory_bits, Self::CHOOSER_INIT),
            lhistory_bits,
            pc_index_bits,
        }
    }

    pub fn ghr(&self) -> &HistoryRegister { &self.ghr }
    pub fn chooser(&self) -> &PatternHistoryTable { &self.chooser }
    pub fn local_pht(&self) -> &PatternHistoryTable { &self.lpht }
    pub fn global_pht(&self) -> &PatternHistoryTable { &self.gpht }

    /// Returns the local history recorded for the branch at 'pc'.
    pub fn local_history(&self, pc: u32) -> usize {
        self.lbht[pc as usize & mask(self.pc_index_bits)]
    }

    /// Read every table for the branch at 'pc' without changing any state.
    pub fn lookup(&self, pc: u32) -> TournamentPrediction {
        let ghist = self.gpht.get_index(self.ghr.value());
        let pc_idx = pc as usize & mask(self.pc_index_bits);
        let lhist = self.lpht.get_index(self.lbht[pc_idx]);
        TournamentPrediction {
            provider: TournamentProvider::from(*self.chooser.get_entry(ghist)),
            local: self.lpht.predict(lhist),
            global: self.gpht.predict(ghist),
            pc_idx,
            lhist,
            ghist,
        }
    }
}

impl BranchPredictor for Tournament {
    fn name(&self) -> &'static str { "Tournament" }

    fn predict(&mut self, pc: u32) -> Outcome {
        self.lookup(pc).outcome()
    }

    fn train(&mut self, pc: u32, outcome: Outcome) {
        // Every decision below is made with the state from before this
        // branch was resolved.
        let p = self.lookup(pc);
        trace!("tournament: pc={:08x} {:?} {:?}", pc, p, outcome);

        let chooser = self.chooser.get_entry_mut(p.ghist);
        match (p.global == outcome, p.local == outcome) {
            (true, false) => chooser.increment(),
            (false, true) => chooser.decrement(),
            _ => {},
        }

        self.gpht.update(p.ghist, outcome);
        self.lpht.update(p.lhist, outcome);

        let lhist = &mut self.lbht[p.pc_idx];
        *lhist = ((*lhist << 1) | outcome.as_bit()) & mask(self.lhistory_bits);

        self.ghr.push(outcome);
    }

    fn reset(&mut self) {
        self.ghr.reset();
        self.lbht.fill(0);
        self.lpht.reset(Self::PHT_INIT);
        self.gpht.reset(Self::PHT_INIT);
        self.chooser.reset(Self::CHOOSER_INIT);
    }

    fn storage_bits(&self) -> usize {
        self.ghr.len()
            + self.lbht.len() * self.lhistory_bits
            + self.lpht.storage_bits()
            + self.gpht.storage_bits()
            + self.chooser.storage_bits()
    }
}
