//! Driving a predictor with a trace.

use log::trace;

use crate::branch::*;
use crate::predictor::*;
use crate::stats::*;

/// Predict and then train every record in 'records', in order, recording
/// each prediction in 'stat'.
pub fn replay(p: &mut impl BranchPredictor, records: &[BranchRecord],
    stat: &mut BranchStats)
{
    for record in records {
        let prediction = p.predict(record.pc);
        trace!("{:08x} pred={:?} actual={:?}", record.pc, prediction, record.outcome);
        stat.update(record, prediction);
        p.train(record.pc, record.outcome);
    }
}

/// Like [replay], but only collecting global statistics.
pub fn replay_global(p: &mut impl BranchPredictor, records: &[BranchRecord])
    -> BranchStats
{
    let mut stat = BranchStats::new();
    for record in records {
        let prediction = p.predict(record.pc);
        stat.update_global(record, prediction);
        p.train(record.pc, record.outcome);
    }
    stat
}

/// Evaluate a [SimplePredictor] over 'records'.
pub fn replay_simple(p: &mut impl SimplePredictor, records: &[BranchRecord])
    -> BranchStats
{
    let mut stat = BranchStats::new();
    for record in records {
        stat.update_global(record, p.predict());
    }
    stat
}
