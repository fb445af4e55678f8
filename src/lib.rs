//! Shotbench
//!
//! Latency benchmarks for HTML-to-image rendering backends. Each benchmark
//! binary reads one HTML document, feeds it to a pluggable renderer, times N
//! sequential render calls, keeps the first iteration's output under
//! `./screenshots/`, and prints the mean latency.
//!
//! # Backends
//!
//! - **cdp**: drives a headless browser over the DevTools protocol and
//!   screenshots the document body
//! - **typeset**: pure in-process block layout producing SVG output
//! - **hosted**: HTTP POST per iteration to a hosted screenshot API
//! - **exec**: spawns an external HTML-to-image conversion binary
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use shotbench::{RenderOutput, Renderer, Result};
//! use shotbench::harness::{self, BenchOptions};
//!
//! struct Solid;
//!
//! impl Renderer for Solid {
//!     fn label(&self) -> &str {
//!         "solid"
//!     }
//!
//!     fn artifact_ext(&self) -> &str {
//!         "svg"
//!     }
//!
//!     fn render(&mut self, _output_path: &Path) -> Result<RenderOutput> {
//!         Ok(RenderOutput::Payload(b"<svg xmlns='http://www.w3.org/2000/svg'/>".to_vec()))
//!     }
//! }
//!
//! # fn main() -> shotbench::Result<()> {
//! let mut options = BenchOptions::new(3);
//! options.screenshots_dir = std::env::temp_dir().join("shotbench-doc-example");
//! let report = harness::run(&mut Solid, &options)?;
//! println!("{}", report.summary());
//! # Ok(())
//! # }
//! ```

use std::path::Path;

pub mod error;
pub use error::{Error, Result};

pub mod harness;

#[cfg(feature = "cdp")]
pub mod cdp;

#[cfg(feature = "typeset")]
pub mod typeset;

#[cfg(feature = "hosted")]
pub mod hosted;

#[cfg(feature = "exec")]
pub mod exec;

/// Directory where each run keeps its single permanent artifact.
pub const SCREENSHOTS_DIR: &str = "./screenshots";

/// Directory holding the font asset used by the typeset backend.
pub const FONTS_DIR: &str = "./fonts";

/// Viewport dimensions
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// What a single render call produced.
#[derive(Debug, Clone)]
pub enum RenderOutput {
    /// Rendered bytes; the harness persists them per its artifact policy.
    Payload(Vec<u8>),
    /// The backend rendered but intentionally skipped the payload transfer.
    NoPayload,
    /// The backend already wrote its output to the path the harness requested.
    File,
}

/// Capability contract implemented by every rendering backend.
///
/// A renderer is constructed once per run with the document (or document
/// path) it will render, then invoked once per iteration by the harness.
pub trait Renderer {
    /// Short name used for artifact file stems and log lines.
    fn label(&self) -> &str;

    /// File extension of produced artifacts, without the dot.
    fn artifact_ext(&self) -> &str;

    /// Render the prepared document once.
    ///
    /// `output_path` is where the harness wants this iteration's artifact.
    /// Backends that hand back bytes may ignore it and return
    /// [`RenderOutput::Payload`]; backends that write files themselves must
    /// write to it and return [`RenderOutput::File`].
    fn render(&mut self, output_path: &Path) -> Result<RenderOutput>;
}

/// Read the input HTML document fully into memory, once per run.
pub fn load_html(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| Error::Io(format!("Failed to read {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_viewport() {
        let viewport = Viewport::default();
        assert_eq!(viewport.width, 1280);
        assert_eq!(viewport.height, 720);
    }

    #[test]
    fn test_load_html_missing_file() {
        let err = load_html(Path::new("/nonexistent/page.html")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
