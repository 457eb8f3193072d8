//! CLI tool for running Piet programs
//!
//! ## Environment Variables
//! - `PIET_MAX_STEPS`: Step budget (default: unbounded)
//! - `PIET_HISTORY_LIMIT`: Instructions kept for `--debug` (default: 1000)
//! - `RUST_LOG`: Log filter (default: `piet_runtime=info,piet_core=warn`)

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use piet_runtime::{PietRuntime, RuntimeConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "piet-run")]
#[command(author = "Silvano Neto <dev@silvanoneto.com>")]
#[command(version = "2026.1.16")]
#[command(about = "Run a Piet program stored as a JSON codel grid", long_about = None)]
struct Args {
    /// Grid file to run
    file: PathBuf,

    /// Abort after this many moves (0 = unbounded)
    #[arg(short, long, env = "PIET_MAX_STEPS")]
    max_steps: Option<u64>,

    /// Print a summary of the final state to stderr
    #[arg(short, long, default_value_t = false)]
    debug: bool,

    /// Log every executed instruction
    #[arg(short, long, default_value_t = false)]
    trace: bool,
}

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "piet_runtime=info,piet_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("❌ Runtime error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// `Ok(true)` when the program completed
fn run(args: &Args) -> anyhow::Result<bool> {
    let config = RuntimeConfig {
        max_steps: args.max_steps.filter(|&n| n > 0),
        debug: args.debug,
        trace_instructions: args.trace,
        ..RuntimeConfig::from_env()
    };

    let mut runtime = PietRuntime::new(config);
    runtime
        .load_file(&args.file)
        .with_context(|| format!("loading {}", args.file.display()))?;

    let report = runtime.run()?;
    if !report.is_success() {
        eprintln!("❌ {}", report.outcome.message);
    }
    Ok(report.is_success())
}
