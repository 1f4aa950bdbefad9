use std::io::Cursor;

use bpsim::*;
use bpsim::stats::*;

/// Two nested loops: the inner loop branch is taken three times out of four,
/// and the outer loop branch is always taken.
fn loop_trace(iters: usize) -> String {
    let mut text = String::from("# pc outcome\n");
    for _ in 0..iters {
        for i in 0..4 {
            text.push_str(&format!("0x4010 {}\n", if i < 3 { 1 } else { 0 }));
        }
        text.push_str("4020 t\n");
    }
    text
}

#[test]
fn every_mode_replays_a_trace() {
    let trace = Trace::from_reader("loops", Cursor::new(loop_trace(400))).unwrap();
    assert_eq!(trace.num_entries(), 2000);

    for kind in PredictorKind::ALL {
        let mut p = PredictorConfig::new(kind).build().unwrap();
        assert_eq!(p.kind(), kind);

        let mut stat = BranchStats::new();
        replay(&mut p, trace.as_slice(), &mut stat);
        assert_eq!(stat.global_brns(), 2000);
        assert_eq!(stat.num_unique_branches(), 2);

        match kind {
            // Always taken: only the loop exits miss
            PredictorKind::Static => assert_eq!(stat.global_miss(), 400),
            _ => assert!(stat.hit_rate() > 0.95, "{}: {}", kind, stat.hit_rate()),
        }
    }
}

#[test]
fn described_predictors_match_built_ones() {
    let records = Trace::from_reader("loops", Cursor::new(loop_trace(100)))
        .unwrap()
        .data;

    let cfg: PredictorConfig = "gshare:8".parse().unwrap();
    let mut built = cfg.build().unwrap();
    let mut direct = Gshare::new(8);
    let a = replay_global(&mut built, &records);
    let b = replay_global(&mut direct, &records);
    assert_eq!(a.global_hits(), b.global_hits());

    let cfg: PredictorConfig = "tournament:6:4:4".parse().unwrap();
    let a = replay_global(&mut cfg.build().unwrap(), &records);
    let b = replay_global(&mut Tournament::new(6, 4, 4), &records);
    assert_eq!(a.global_hits(), b.global_hits());
}

#[test]
fn reset_replays_identically() {
    let records = Trace::from_reader("loops", Cursor::new(loop_trace(50)))
        .unwrap()
        .data;
    for kind in PredictorKind::ALL {
        let mut p = PredictorConfig::new(kind).build().unwrap();
        let first = replay_global(&mut p, &records);
        p.reset();
        let second = replay_global(&mut p, &records);
        assert_eq!(first.global_hits(), second.global_hits(), "{}", kind);
    }
}

#[test]
fn invalid_configurations_are_rejected() {
    let cfg = PredictorConfig {
        ghistory_bits: 0,
        ..PredictorConfig::new(PredictorKind::Gshare)
    };
    assert!(matches!(cfg.build(), Err(ConfigError::ZeroWidth { .. })));

    // Unused fields are not checked
    let cfg = PredictorConfig {
        ghistory_bits: 0,
        ..PredictorConfig::new(PredictorKind::Static)
    };
    assert!(cfg.build().is_ok());

    assert!("custom:20:0".parse::<PredictorConfig>().unwrap().build().is_err());
    assert!("gshare:x".parse::<PredictorConfig>().is_err());
}

#[test]
fn truncated_replay_reports_branch_summary() {
    let trace = Trace::from_reader("loops", Cursor::new(loop_trace(100))).unwrap();
    let records = trace.as_slice_trunc(250);
    assert_eq!(records.len(), 250);

    let mut p = PredictorConfig::new(PredictorKind::Static).build().unwrap();
    let mut stat = BranchStats::new();
    replay(&mut p, records, &mut stat);
    assert_eq!(stat.global_brns(), 250);
    assert_eq!(stat.global_miss(), 50);

    // The outer loop branch is always taken, the inner one is mixed
    assert_eq!(stat.num_always_taken(), 1);
    assert_eq!(stat.num_never_taken(), 0);
    assert_eq!(stat.num_single_occurence(), 0);

    let common = stat.get_common_branches(2);
    assert_eq!(common[0].0, 0x4010);
    assert_eq!(common[0].1.occ, 200);
    assert_eq!(common[0].1.times_taken(), 150);
    assert_eq!(common[1].0, 0x4020);
    assert_eq!(
        common[0].1.recent_outcomes(4),
        vec![Outcome::T, Outcome::T, Outcome::T, Outcome::N]
    );
}
