//! Compare baselines and predictor configurations over one or more traces.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::info;

use bpsim::*;
use bpsim::stats::*;

#[derive(Parser)]
#[command(name = "sweep", version, about = "Sweep predictor configurations over traces")]
struct Args {
    /// Trace files
    #[arg(required = true)]
    traces: Vec<PathBuf>,

    /// Largest gshare history width to evaluate
    #[arg(long, default_value_t = 16)]
    max_bits: usize,

    /// Seed for the random baseline
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Only replay the first N records of each trace
    #[arg(long)]
    limit: Option<usize>,

    /// Skip traces with fewer records than this
    #[arg(long, default_value_t = 100)]
    min_records: usize,
}

fn print_row(name: &str, stat: &BranchStats) {
    println!("  {:24} Global hit rate: {}/{} ({:.2}% correct) ({} misses)",
        name,
        stat.global_hits(),
        stat.global_brns(),
        stat.hit_rate() * 100.0,
        stat.global_miss()
    );
}

fn run_simple(records: &[BranchRecord], mut p: impl SimplePredictor) {
    let stat = replay_simple(&mut p, records);
    print_row(p.name(), &stat);
}

fn run_config(records: &[BranchRecord], cfg: PredictorConfig) -> Result<()> {
    let mut p = cfg.build()?;
    let stat = replay_global(&mut p, records);
    print_row(&cfg.to_string(), &stat);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();
    let args = Args::parse();

    for trace in TraceSet::new_from_slice(&args.traces) {
        let trace = trace?;
        if trace.num_entries() < args.min_records {
            info!("skipping {} ({} records)", trace.name(), trace.num_entries());
            continue;
        }
        println!("[*] {}, {} records", trace.name(), trace.num_entries());
        let records = trace.as_slice_trunc(args.limit.unwrap_or(usize::MAX));

        run_simple(records, TakenPredictor);
        run_simple(records, NotTakenPredictor);
        run_simple(records, RandomPredictor::new(args.seed));

        for bits in 1..=args.max_bits {
            run_config(records, PredictorConfig {
                ghistory_bits: bits,
                ..PredictorConfig::new(PredictorKind::Gshare)
            })?;
        }
        run_config(records, PredictorConfig::new(PredictorKind::Tournament))?;
        run_config(records, PredictorConfig::new(PredictorKind::Custom))?;
        println!();
    }
    Ok(())
}
