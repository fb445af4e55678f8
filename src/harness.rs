//! The render-and-time benchmark loop shared by all backends.
//!
//! Iterations run strictly sequentially: the next render call begins only
//! after the previous iteration's timing and artifact handling complete.
//! The first iteration's output is kept at a fixed path under the
//! screenshots directory; later outputs go to a transient path and are
//! removed as soon as the measurement is recorded.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::{Error, RenderOutput, Renderer, Result};

/// Iteration count used when the CLI does not override it.
pub const DEFAULT_ITERATIONS: u32 = 100;

/// Immutable per-run settings, built once from CLI arguments.
#[derive(Debug, Clone)]
pub struct BenchOptions {
    /// Number of render calls to time.
    pub iterations: u32,
    /// Tolerate per-iteration render failures instead of aborting the run.
    pub keep_going: bool,
    /// Where the single permanent artifact is kept.
    pub screenshots_dir: PathBuf,
    /// Where non-first iterations write before immediate removal.
    pub transient_dir: PathBuf,
}

impl BenchOptions {
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations,
            keep_going: false,
            screenshots_dir: PathBuf::from(crate::SCREENSHOTS_DIR),
            transient_dir: std::env::temp_dir(),
        }
    }

    pub fn keep_going(mut self, yes: bool) -> Self {
        self.keep_going = yes;
        self
    }
}

/// Timing results of one completed run.
#[derive(Debug, Clone)]
pub struct BenchReport {
    /// The configured iteration count.
    pub attempted: u32,
    /// Iterations whose render call returned successfully.
    pub succeeded: u32,
    /// Total elapsed time across successful render calls.
    pub total: Duration,
    /// Per-iteration elapsed times, in iteration order, successes only.
    pub samples: Vec<Duration>,
}

impl BenchReport {
    /// Mean latency over the configured iteration count. Failed iterations
    /// contribute no elapsed time but still count in the divisor, matching
    /// the headline number the tools have always printed.
    pub fn mean_over_attempted_ms(&self) -> f64 {
        self.total.as_secs_f64() * 1000.0 / self.attempted as f64
    }

    /// Mean latency over successful iterations only. `None` when every
    /// iteration failed.
    pub fn mean_over_succeeded_ms(&self) -> Option<f64> {
        (self.succeeded > 0).then(|| self.total.as_secs_f64() * 1000.0 / self.succeeded as f64)
    }

    /// Human-readable summary printed at the end of a run.
    pub fn summary(&self) -> String {
        let mut out = format!(
            "Average time for {} iterations: {:.2} ms",
            self.attempted,
            self.mean_over_attempted_ms()
        );
        if self.succeeded < self.attempted {
            if let Some(ms) = self.mean_over_succeeded_ms() {
                out.push_str(&format!(
                    "\nAverage over {} successful iterations: {:.2} ms",
                    self.succeeded, ms
                ));
            }
        }
        out
    }
}

/// Run the timing loop: invoke the renderer `iterations` times, accumulate
/// elapsed wall-clock time per call, and apply the artifact policy.
///
/// Render failures abort the run unless `keep_going` is set, in which case
/// the failed iteration is logged and skipped. Artifact writes and cleanup
/// happen outside the timed window.
pub fn run<R: Renderer>(renderer: &mut R, options: &BenchOptions) -> Result<BenchReport> {
    if options.iterations == 0 {
        return Err(Error::Usage("iteration count must be a positive integer".into()));
    }

    for dir in [&options.screenshots_dir, &options.transient_dir] {
        fs::create_dir_all(dir)
            .map_err(|e| Error::Io(format!("Failed to create {}: {}", dir.display(), e)))?;
    }

    let permanent = options
        .screenshots_dir
        .join(format!("{}.{}", renderer.label(), renderer.artifact_ext()));

    let mut total = Duration::ZERO;
    let mut samples = Vec::with_capacity(options.iterations as usize);
    let mut succeeded = 0u32;

    for i in 0..options.iterations {
        let output_path = if i == 0 {
            permanent.clone()
        } else {
            options.transient_dir.join(format!(
                "{}-output-{}.{}",
                renderer.label(),
                i,
                renderer.artifact_ext()
            ))
        };

        let start = Instant::now();
        let outcome = renderer.render(&output_path);
        let elapsed = start.elapsed();

        let output = match outcome {
            Ok(output) => output,
            Err(err) => {
                if options.keep_going {
                    warn!(iteration = i, error = %err, "render failed, skipping iteration");
                    continue;
                }
                return Err(err);
            }
        };

        total += elapsed;
        samples.push(elapsed);
        succeeded += 1;

        match output {
            RenderOutput::Payload(bytes) => {
                fs::write(&output_path, &bytes).map_err(|e| {
                    Error::Io(format!("Failed to write {}: {}", output_path.display(), e))
                })?;
                if i == 0 {
                    info!(path = %output_path.display(), "first artifact saved");
                } else {
                    // Best-effort cleanup; a leftover file is not a run failure.
                    let _ = fs::remove_file(&output_path);
                }
            }
            RenderOutput::File => {
                if i == 0 {
                    info!(path = %output_path.display(), "first artifact saved");
                } else {
                    let _ = fs::remove_file(&output_path);
                }
            }
            RenderOutput::NoPayload => {}
        }
    }

    Ok(BenchReport {
        attempted: options.iterations,
        succeeded,
        total,
        samples,
    })
}
