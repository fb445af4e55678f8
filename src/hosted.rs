//! Hosted screenshot API backend.
//!
//! Issues one HTTP POST per iteration to the ScreenshotOne rendering
//! service. The access key is read from process configuration exactly once
//! at startup and carried in an explicit [`ApiConfig`], so the renderer is
//! testable without touching the process environment.

use std::path::Path;

use serde::Serialize;

use crate::{Error, RenderOutput, Renderer, Result};

/// Production endpoint of the hosted rendering service.
pub const API_ENDPOINT: &str = "https://api.screenshotone.com/take";

/// Environment variable holding the service access key.
pub const API_KEY_ENV: &str = "SCREENSHOTONE_API_KEY";

/// Connection settings for the hosted service, built once at startup.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub access_key: String,
    pub endpoint: String,
}

impl ApiConfig {
    /// Read the access key from the environment. Absence is fatal before
    /// any benchmarking begins.
    pub fn from_env() -> Result<Self> {
        let access_key = std::env::var(API_KEY_ENV)
            .map_err(|_| Error::Config(format!("{} is not set", API_KEY_ENV)))?;
        Ok(Self {
            access_key,
            endpoint: API_ENDPOINT.to_string(),
        })
    }

    /// Point the renderer at a different endpoint (used by tests).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

/// Whether the service should return the rendered image or an empty body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// Download the rendered PNG.
    FullImage,
    /// Ask the service to render but skip the payload transfer, isolating
    /// render-side latency from download latency.
    Empty,
}

impl ResponseMode {
    fn as_request_value(self) -> &'static str {
        match self {
            Self::FullImage => "by_format",
            Self::Empty => "empty",
        }
    }
}

#[derive(Serialize)]
struct TakeRequest<'a> {
    html: &'a str,
    format: &'a str,
    response_type: &'a str,
}

/// Hosted-API-backed renderer (blocking `reqwest` client).
pub struct HostedRenderer {
    client: reqwest::blocking::Client,
    config: ApiConfig,
    html: String,
    mode: ResponseMode,
}

impl HostedRenderer {
    /// Build the HTTP client once per run. No request timeout is set: a
    /// hung service call hangs the benchmark, like every other backend.
    pub fn new(html: String, config: ApiConfig, mode: ResponseMode) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| Error::Init(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            config,
            html,
            mode,
        })
    }
}

impl Renderer for HostedRenderer {
    fn label(&self) -> &str {
        "hosted"
    }

    fn artifact_ext(&self) -> &str {
        "png"
    }

    fn render(&mut self, _output_path: &Path) -> Result<RenderOutput> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .header("X-Access-Key", &self.config.access_key)
            .json(&TakeRequest {
                html: &self.html,
                format: "png",
                response_type: self.mode.as_request_value(),
            })
            .send()
            .map_err(|e| Error::Render(format!("Screenshot request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Render(format!(
                "Screenshot request returned {}",
                status
            )));
        }

        match self.mode {
            ResponseMode::Empty => Ok(RenderOutput::NoPayload),
            ResponseMode::FullImage => {
                let bytes = response
                    .bytes()
                    .map_err(|e| Error::Render(format!("Failed to read response body: {}", e)))?;
                Ok(RenderOutput::Payload(bytes.to_vec()))
            }
        }
    }
}
