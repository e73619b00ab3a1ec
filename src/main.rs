use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use stack_it_now::config::AppConfig;
use stack_it_now::optimizer::GridPlanner;
use stack_it_now::runner::{self, BatchOptions};

/// Default benchmark input when no path is given.
const DEFAULT_INPUT: &str = "example_data/benchmark_data/bed-bpp_v1.json";

/// Batch runner for the bed-bpp load-planning benchmark
#[derive(Parser)]
#[command(name = "stack-it-now")]
#[command(about = "Plans each benchmark order into a single container and reports the placements")]
struct Args {
    /// Path to the benchmark order file
    input: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Optional path for the machine-readable packing-plan document
    #[arg(long)]
    plan_out: Option<PathBuf>,
}

fn main() -> ExitCode {
    if let Err(err) = dotenvy::dotenv() {
        if !matches!(err, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("⚠️ Konnte .env nicht laden: {}", err);
        }
    }

    let args = Args::parse();

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = AppConfig::from_env();
    let input = args.input.unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));

    println!("🚀 stack-it-now startet...");
    println!("used the source file: {}", input.display());

    let planner = GridPlanner::new(config.optimizer.placement_config());
    let options = BatchOptions {
        input,
        output: config.output.file().to_path_buf(),
        plan_out: args.plan_out,
    };

    match runner::run_batch(&options, &planner) {
        Ok(summary) => {
            info!(
                orders = summary.orders,
                loaded = summary.loaded,
                not_loaded = summary.not_loaded,
                "batch finished"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("batch aborted: {err}");
            ExitCode::FAILURE
        }
    }
}
