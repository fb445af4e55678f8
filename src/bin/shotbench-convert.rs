//! Benchmark HTML-to-image latency through an external conversion binary.

use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shotbench::exec::{ConvertRenderer, DEFAULT_CONVERT_BIN};
use shotbench::harness::{self, BenchOptions, DEFAULT_ITERATIONS};

#[derive(Parser)]
#[command(
    name = "shotbench-convert",
    about = "Benchmark HTML-to-image rendering through an external conversion binary"
)]
struct Cli {
    /// Path to the HTML document to render
    html_file: PathBuf,

    /// Number of timed iterations
    #[arg(
        short = 'i',
        long = "iterations",
        default_value_t = DEFAULT_ITERATIONS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    iterations: u32,

    /// Tolerate failed iterations instead of aborting the run
    #[arg(long = "keep-going")]
    keep_going: bool,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shotbench=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = err.print();
            process::exit(code);
        }
    };

    if let Err(err) = run(cli) {
        eprintln!("shotbench-convert: {}", err);
        process::exit(1);
    }
}

fn run(cli: Cli) -> shotbench::Result<()> {
    // The input path is handed to the child process as-is; the document is
    // never read into memory here.
    println!(
        "Running the benchmark using {} with {} iterations…",
        DEFAULT_CONVERT_BIN, cli.iterations
    );

    let mut renderer = ConvertRenderer::new(cli.html_file.clone());
    let options = BenchOptions::new(cli.iterations).keep_going(cli.keep_going);
    let report = harness::run(&mut renderer, &options)?;
    println!("{}", report.summary());
    Ok(())
}
