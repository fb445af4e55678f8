//! External process backend.
//!
//! Spawns an HTML-to-image conversion binary per iteration, passing the
//! input HTML path and the output artifact path as arguments. The input is
//! never read into memory; the child does its own file I/O.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::{Error, RenderOutput, Renderer, Result};

/// Conversion binary used when none is configured.
pub const DEFAULT_CONVERT_BIN: &str = "wkhtmltoimage";

/// External-process-backed renderer.
pub struct ConvertRenderer {
    binary: PathBuf,
    input: PathBuf,
}

impl ConvertRenderer {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            binary: PathBuf::from(DEFAULT_CONVERT_BIN),
            input: input.into(),
        }
    }

    /// Substitute the conversion binary (used by tests).
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }
}

impl Renderer for ConvertRenderer {
    fn label(&self) -> &str {
        "convert"
    }

    fn artifact_ext(&self) -> &str {
        "png"
    }

    fn render(&mut self, output_path: &Path) -> Result<RenderOutput> {
        let output = Command::new(&self.binary)
            .arg(&self.input)
            .arg(output_path)
            .output()
            .map_err(|e| {
                Error::Render(format!("Failed to run {}: {}", self.binary.display(), e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Render(format!(
                "{} exited with {}: {}",
                self.binary.display(),
                output.status,
                stderr.trim()
            )));
        }

        Ok(RenderOutput::File)
    }
}
