//! Benchmark HTML-to-image latency through a hosted screenshot API.

use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shotbench::harness::{self, BenchOptions, DEFAULT_ITERATIONS};
use shotbench::hosted::{ApiConfig, HostedRenderer, ResponseMode};

#[derive(Parser)]
#[command(
    name = "shotbench-hosted",
    about = "Benchmark HTML-to-image rendering through a hosted screenshot API"
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

    /// Request an empty response body to skip downloading the screenshot
    #[arg(short = 'e', long = "empty-response")]
    empty_response: bool,

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
        eprintln!("shotbench-hosted: {}", err);
        process::exit(1);
    }
}

fn run(cli: Cli) -> shotbench::Result<()> {
    // Honor a .env file before the credential lookup.
    let _ = dotenvy::dotenv();
    let config = ApiConfig::from_env()?;

    let html = shotbench::load_html(&cli.html_file)?;
    let mode = if cli.empty_response {
        ResponseMode::Empty
    } else {
        ResponseMode::FullImage
    };

    match mode {
        ResponseMode::Empty => {
            println!(
                "Testing with {} iterations without downloading the image…",
                cli.iterations
            );
        }
        ResponseMode::FullImage => {
            println!(
                "Testing with {} iterations and image download…",
                cli.iterations
            );
        }
    }

    let mut renderer = HostedRenderer::new(html, config, mode)?;
    let options = BenchOptions::new(cli.iterations).keep_going(cli.keep_going);
    let report = harness::run(&mut renderer, &options)?;
    println!("{}", report.summary());
    Ok(())
}
