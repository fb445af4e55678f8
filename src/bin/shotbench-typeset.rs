//! Benchmark pure in-process HTML typesetting to SVG.

use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shotbench::harness::{self, BenchOptions, DEFAULT_ITERATIONS};
use shotbench::typeset::{TypesetRenderer, DEFAULT_FONT_FILE};

#[derive(Parser)]
#[command(
    name = "shotbench-typeset",
    about = "Benchmark in-process HTML layout and SVG rendering"
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
        eprintln!("shotbench-typeset: {}", err);
        process::exit(1);
    }
}

fn run(cli: Cli) -> shotbench::Result<()> {
    let html = shotbench::load_html(&cli.html_file)?;
    let font_path = PathBuf::from(shotbench::FONTS_DIR).join(DEFAULT_FONT_FILE);

    println!("Running a benchmark with {} iterations…", cli.iterations);

    let mut renderer = TypesetRenderer::new(&html, &font_path)?;
    let options = BenchOptions::new(cli.iterations).keep_going(cli.keep_going);
    let report = harness::run(&mut renderer, &options)?;
    println!("{}", report.summary());
    Ok(())
}
