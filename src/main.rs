#![forbid(unsafe_code)]

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use matbench::{BenchConfig, BenchResult, BenchRunner};

#[derive(Parser, Debug)]
#[command(name = "matbench")]
#[command(
    about = "Cross-check and cycle benchmark for dense matrix multiply/invert",
    long_about = None
)]
struct Cli {
    /// Path to a TOML file overriding the built-in benchmark matrix
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the CSV report to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Number of independent engine invocations (each fully reset)
    #[arg(long, default_value_t = 1)]
    runs: u32,

    /// Override the generator seed
    #[arg(long)]
    seed: Option<u32>,

    /// Enable verbose logging (or set MATBENCH_LOG)
    #[arg(long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let env = std::env::var("MATBENCH_LOG").unwrap_or_else(|_| {
        if verbose {
            "matbench=debug".to_string()
        } else {
            "matbench=info".to_string()
        }
    });
    let _ = tracing_subscriber::fmt()
        .with_span_events(FmtSpan::ACTIVE)
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_env_filter(EnvFilter::new(env))
        .try_init();
}

fn run(cli: Cli) -> BenchResult<()> {
    let mut config = match &cli.config {
        Some(path) => BenchConfig::load(path)?,
        None => BenchConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    let mut runner = BenchRunner::new(config)?;
    let mut sink: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(std::io::stdout()),
    };

    let runs = cli.runs.max(1);
    for run_index in 0..runs {
        info!(run = run_index + 1, of = runs, "engine invocation");
        runner.run(&mut sink);
    }
    Ok(())
}

fn main() {
    color_eyre::install().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}
