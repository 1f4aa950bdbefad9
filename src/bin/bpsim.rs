//! Replay a branch trace through a single predictor and report accuracy.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use bpsim::*;
use bpsim::stats::*;

#[derive(Parser)]
#[command(name = "bpsim", version, about = "Replay a branch trace through a predictor")]
struct Args {
    /// Trace file with one '<pc> <outcome>' pair per line [default: stdin]
    trace: Option<PathBuf>,

    /// Predictor: 'static', 'gshare:<ghist>', 'tournament:<ghist>:<lhist>:<index>',
    /// or 'custom[:<history>:<entries>:<weight bits>]'
    #[arg(short, long, default_value = "static", allow_hyphen_values = true)]
    predictor: PredictorConfig,

    /// Print debug output and the least accurate branches
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    /// Number of branches listed in each '--verbose' section
    #[arg(long, default_value_t = 16)]
    worst: usize,

    /// Only replay the first N records of the trace
    #[arg(long)]
    limit: Option<usize>,
}

fn print_branch(pc: u32, data: &BranchData) {
    let pat: String = data.recent_outcomes(32).iter()
        .map(|o| format!("{:?}", o))
        .collect();
    println!("  {:08x} {:8}/{:8} ({:.4}) taken={:8} H={:.2} {}",
        pc, data.hits, data.occ, data.hit_rate(),
        data.times_taken(), data.shannon_entropy(), pat
    );
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(level)
    ).init();

    let trace = match &args.trace {
        Some(path) if path.as_os_str() != "-" => Trace::from_file(path)?,
        _ => Trace::from_reader("stdin", io::stdin().lock())?,
    };
    info!("loaded {} records from {}", trace.num_entries(), trace.name());

    let mut p = args.predictor.build()
        .with_context(|| format!("invalid predictor '{}'", args.predictor))?;
    info!("{}: {} storage bits", p.name(), p.storage_bits());

    let records = match args.limit {
        Some(limit) => trace.as_slice_trunc(limit),
        None => trace.as_slice(),
    };

    let mut stat = BranchStats::new();
    replay(&mut p, records, &mut stat);
    println!("{}", stat);

    if args.verbose {
        println!();
        println!("Unique branches:   {:10}", stat.num_unique_branches());
        println!("Single occurrence: {:10}", stat.num_single_occurence());
        println!("Always taken:      {:10}", stat.num_always_taken());
        println!("Never taken:       {:10}", stat.num_never_taken());

        println!("Most common branches:");
        for (pc, data) in stat.get_common_branches(args.worst) {
            print_branch(pc, data);
        }
        println!("Low hit-rate branches:");
        for (pc, data) in stat.get_low_rate_branches(args.worst, 100, 0.9) {
            print_branch(pc, data);
        }
    }
    Ok(())
}
