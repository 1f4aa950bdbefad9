//! Helpers for collecting statistics.

use std::collections::*;
use std::fmt;

use bitvec::prelude::*;
use itertools::*;

use crate::branch::*;

/// Container for recording simple statistics while evaluating some model.
#[derive(Clone, Debug, Default)]
pub struct BranchStats {
    /// Per-branch statistics (indexed by program counter value).
    pub data: BTreeMap<u32, BranchData>,

    /// Number of correct predictions
    pub global_hits: usize,

    /// Number of times any branch instruction was executed
    pub global_brns: usize,
}
impl BranchStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the global hit rate.
    pub fn hit_rate(&self) -> f64 {
        if self.global_brns == 0 { return 0.0; }
        self.global_hits as f64 / self.global_brns as f64
    }

    /// Return the global misprediction rate [as a percentage].
    pub fn miss_rate_percent(&self) -> f64 {
        if self.global_brns == 0 { return 0.0; }
        100.0 * self.global_miss() as f64 / self.global_brns as f64
    }

    /// Return the global hit count.
    pub fn global_hits(&self) -> usize { self.global_hits }

    /// Return the global miss count.
    pub fn global_miss(&self) -> usize { self.global_brns - self.global_hits }

    /// Return the total branch count.
    pub fn global_brns(&self) -> usize { self.global_brns }

    /// Update global statistics.
    pub fn update_global(&mut self, record: &BranchRecord, prediction: Outcome) {
        let hit = prediction == record.outcome;
        self.global_brns += 1;
        if hit { self.global_hits += 1; }
    }

    /// Update per-branch statistics.
    pub fn update_per_branch(&mut self,
        record: &BranchRecord, prediction: Outcome)
    {
        let hit = prediction == record.outcome;
        let data = self.get_mut(record.pc);
        data.occ += 1;
        data.pat.push(record.outcome.into());
        if hit { data.hits += 1; }
    }

    /// Update both global and per-branch statistics.
    pub fn update(&mut self, record: &BranchRecord, prediction: Outcome) {
        self.update_global(record, prediction);
        self.update_per_branch(record, prediction);
    }

    /// Returns a reference to data collected for a particular branch.
    pub fn get(&self, pc: u32) -> Option<&BranchData> {
        self.data.get(&pc)
    }

    /// Returns a mutable reference to data collected for a particular branch.
    /// Creates a new entry if one doesn't already exist.
    pub fn get_mut(&mut self, pc: u32) -> &mut BranchData {
        self.data.entry(pc).or_default()
    }

    /// Returns the number of unique observed branch instructions.
    pub fn num_unique_branches(&self) -> usize {
        self.data.len()
    }

    /// Returns the number of branches that only occur once.
    pub fn num_single_occurence(&self) -> usize {
        self.data.values().filter(|entry| entry.occ == 1).count()
    }

    /// Returns the number of branches that are always taken
    pub fn num_always_taken(&self) -> usize {
        self.data.values().filter(|entry| entry.is_always_taken()).count()
    }

    /// Returns the number of branches that are never taken
    pub fn num_never_taken(&self) -> usize {
        self.data.values().filter(|entry| entry.is_never_taken()).count()
    }

    /// Returns the 'n' most frequently executed branches.
    pub fn get_common_branches(&self, n: usize) -> Vec<(u32, &BranchData)> {
        self.data.iter()
            .sorted_by(|x, y| x.1.occ.cmp(&y.1.occ))
            .rev()
            .take(n)
            .map(|(pc, s)| (*pc, s))
            .collect()
    }

    /// Returns up to 'n' frequently executed branches that are predicted
    /// correctly no more than 'max_rate' of the time.
    pub fn get_low_rate_branches(&self, n: usize, min_occ: usize, max_rate: f64)
        -> Vec<(u32, &BranchData)>
    {
        self.data.iter()
            .filter(|(_, s)| s.occ >= min_occ && s.hit_rate() <= max_rate)
            .sorted_by(|x, y| x.1.occ.cmp(&y.1.occ))
            .rev()
            .take(n)
            .map(|(pc, s)| (*pc, s))
            .collect()
    }
}

impl fmt::Display for BranchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Branches:        {:10}", self.global_brns())?;
        writeln!(f, "Incorrect:       {:10}", self.global_miss())?;
        write!(f, "Misprediction Rate: {:10.3}", self.miss_rate_percent())
    }
}

/// Container for per-branch statistics.
#[derive(Clone, Debug, Default)]
pub struct BranchData {
    /// Number of times this branch was encountered.
    pub occ: usize,

    /// Number of correct predictions for this branch.
    pub hits: usize,

    /// Record of all observed outcomes for this branch.
    pub pat: BitVec,
}
impl BranchData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the hit rate for this branch.
    pub fn hit_rate(&self) -> f64 {
        if self.occ == 0 { return 0.0; }
        self.hits as f64 / self.occ as f64
    }

    pub fn is_always_taken(&self) -> bool {
        self.pat.count_ones() == self.pat.len()
    }

    pub fn is_never_taken(&self) -> bool {
        self.pat.count_zeros() == self.pat.len()
    }

    pub fn times_taken(&self) -> usize {
        self.pat.count_ones()
    }

    /// Returns the most recent 'n' outcomes, oldest first.
    pub fn recent_outcomes(&self, n: usize) -> Vec<Outcome> {
        let start = self.pat.len().saturating_sub(n);
        Outcome::vec_from_bits(&self.pat[start..])
    }

    // NOTE: Remember that this isn't too useful apart from telling you
    // whether some sequence of outcomes is mixed or uniform.
    pub fn shannon_entropy(&self) -> f64 {
        let n   = self.pat.len() as f64;
        let n_t = self.pat.count_ones();
        let n_f = self.pat.count_zeros();

        let p_t = (n_t as f64) / n;
        let p_f = (n_f as f64) / n;

        let res = -(p_t * p_t.log2() + p_f * p_f.log2());
        if res.is_nan() { 0.0 } else { res }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn record(pc: u32, taken: bool) -> BranchRecord {
        BranchRecord::new(pc, taken.into())
    }

    #[test]
    fn global_counts() {
        let mut stat = BranchStats::new();
        stat.update(&record(0x10, true), Outcome::T);
        stat.update(&record(0x10, false), Outcome::T);
        stat.update(&record(0x20, false), Outcome::N);
        stat.update(&record(0x20, false), Outcome::T);

        assert_eq!(stat.global_brns(), 4);
        assert_eq!(stat.global_hits(), 2);
        assert_eq!(stat.global_miss(), 2);
        assert!((stat.hit_rate() - 0.5).abs() < 1e-9);
        assert!((stat.miss_rate_percent() - 50.0).abs() < 1e-9);
        assert_eq!(stat.num_unique_branches(), 2);
        assert_eq!(stat.num_never_taken(), 1);
        assert_eq!(stat.num_always_taken(), 0);
    }

    #[test]
    fn empty_stats() {
        let stat = BranchStats::new();
        assert_eq!(stat.hit_rate(), 0.0);
        assert_eq!(stat.miss_rate_percent(), 0.0);
        assert_eq!(
            stat.to_string(),
            "Branches:                 0\nIncorrect:                0\nMisprediction Rate:      0.000"
        );
    }

    #[test]
    fn per_branch_data() {
        let mut stat = BranchStats::new();
        for i in 0..10 {
            stat.update(&record(0x4, i % 2 == 0), Outcome::T);
        }
        stat.update(&record(0x8, true), Outcome::T);

        let data = stat.get(0x4).unwrap();
        assert_eq!(data.occ, 10);
        assert_eq!(data.hits, 5);
        assert_eq!(data.times_taken(), 5);
        assert!((data.shannon_entropy() - 1.0).abs() < 1e-9);
        assert_eq!(data.recent_outcomes(3), vec![Outcome::N, Outcome::T, Outcome::N]);
        assert_eq!(stat.num_single_occurence(), 1);

        let common = stat.get_common_branches(1);
        assert_eq!(common[0].0, 0x4);

        let low = stat.get_low_rate_branches(4, 2, 0.55);
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].0, 0x4);
        assert_eq!(stat.get(0x8).unwrap().shannon_entropy(), 0.0);
    }
}
