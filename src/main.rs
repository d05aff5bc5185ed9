//! IFRS 16 lease calculator CLI
//!
//! Reads a batch upload CSV and writes the present value summary, the
//! consolidated liability amortization schedule and the consolidated ROU
//! depreciation schedule.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use log::info;

use ifrs16_lease::context::DEFAULT_OPERATOR;
use ifrs16_lease::contract::load_contracts;
use ifrs16_lease::{BatchConfig, BatchReport, BatchRunner, RunContext};

#[derive(Debug, Parser)]
#[command(name = "ifrs16", version, about = "IFRS 16 lease calculator")]
struct Args {
    /// Batch upload CSV with one lease contract per row
    input: PathBuf,

    /// Directory for the three output CSV files
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Operator name stamped on every output row
    #[arg(long, default_value = DEFAULT_OPERATOR)]
    operator: String,

    /// Run date stamped on every output row (YYYY-MM-DD, default today)
    #[arg(long)]
    run_date: Option<NaiveDate>,

    /// Abort on the first invalid contract instead of skipping it
    #[arg(long)]
    fail_fast: bool,

    /// Value contracts in parallel
    #[arg(long)]
    parallel: bool,

    /// Print the report as JSON to stdout instead of writing CSV files
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let context = match args.run_date {
        Some(date) => RunContext::new(args.operator.clone(), date),
        None => RunContext::today(args.operator.clone()),
    };
    let config = BatchConfig {
        fail_fast: args.fail_fast,
        parallel: args.parallel,
    };

    let loaded = load_contracts(&args.input, config.fail_fast)
        .with_context(|| format!("failed to load contracts from {}", args.input.display()))?;
    info!("loaded {} contracts from {}", loaded.contracts.len(), args.input.display());

    let outcome = BatchRunner::new(context, config)
        .run_loaded(&loaded)
        .context("batch valuation failed")?;

    let mut report = BatchReport::from_outcome(&outcome);
    let mut failures: Vec<String> = loaded.rejected.iter().map(|f| f.to_string()).collect();
    failures.append(&mut report.failures);
    report.failures = failures;

    if args.json {
        report.write_json(io::stdout().lock()).context("failed to write JSON report")?;
        println!();
    } else {
        let paths = report
            .write_csv_dir(&args.output_dir)
            .with_context(|| format!("failed to write reports to {}", args.output_dir.display()))?;

        println!("IFRS 16 Lease Calculator");
        println!("========================\n");
        println!("{:<30} {:>10} {:>12} {:>16}", "Lease", "Currency", "Frequency", "Present Value");
        println!("{}", "-".repeat(71));
        for row in &report.summary {
            println!(
                "{:<30} {:>10} {:>12} {:>16.2}",
                row.lease_name, row.currency, row.payment_frequency, row.present_value
            );
        }
        println!();
        for path in &paths {
            println!("Written: {}", path.display());
        }
    }

    if !report.failures.is_empty() {
        eprintln!("\n{} contract(s) skipped:", report.failures.len());
        for failure in &report.failures {
            eprintln!("  {}", failure);
        }
    }

    Ok(())
}
