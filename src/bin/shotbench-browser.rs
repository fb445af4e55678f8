//! Benchmark HTML-to-image latency through a headless browser driven over
//! the DevTools protocol.

use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shotbench::cdp::{BrowserRenderer, LaunchMode};
use shotbench::harness::{self, BenchOptions, DEFAULT_ITERATIONS};

#[derive(Parser)]
#[command(
    name = "shotbench-browser",
    about = "Benchmark HTML-to-image rendering through a headless browser"
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

    /// Connect to an already-running browser instance
    #[arg(short = 'c', long = "connect")]
    connect: bool,

    /// Use the alternate rendering engine variant
    #[arg(short = 'f', long = "alt-engine")]
    alt_engine: bool,

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
        eprintln!("shotbench-browser: {}", err);
        process::exit(1);
    }
}

fn run(cli: Cli) -> shotbench::Result<()> {
    let html = shotbench::load_html(&cli.html_file)?;
    let mode = LaunchMode::from_flags(cli.connect, cli.alt_engine)?;

    match &mode {
        LaunchMode::Connect { ws_url } => {
            println!("Running the benchmark against the browser instance at {}…", ws_url);
        }
        LaunchMode::LaunchAlt { binary } => {
            println!(
                "Running the benchmark using the alternate engine at {}…",
                binary.display()
            );
        }
        LaunchMode::Launch => {
            println!("Running the benchmark with a freshly launched browser per iteration…");
        }
    }

    let mut renderer = BrowserRenderer::new(&html, mode);
    let options = BenchOptions::new(cli.iterations).keep_going(cli.keep_going);
    let report = harness::run(&mut renderer, &options)?;
    println!("{}", report.summary());
    Ok(())
}
