//! Browser automation backend over the Chrome DevTools Protocol.
//!
//! Each render call acquires a browser (a freshly launched process, or an
//! attachment to an already-running instance), loads the in-memory HTML via
//! a `data:` URL, waits for the load to complete, and screenshots the
//! document body as a PNG.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use headless_chrome::protocol::cdp::Page;
use headless_chrome::{Browser, LaunchOptions};

use crate::{Error, RenderOutput, Renderer, Result, Viewport};

/// Fixed local control endpoint used in connect mode.
pub const BROWSER_WS_ENDPOINT: &str = "ws://localhost:3000";

/// Names the alternate browser binary used by [`LaunchMode::LaunchAlt`].
pub const ALT_BROWSER_ENV: &str = "SHOTBENCH_ALT_BROWSER";

/// How the renderer obtains a browser for each iteration.
#[derive(Debug, Clone)]
pub enum LaunchMode {
    /// Launch a fresh default-engine browser per iteration.
    Launch,
    /// Launch a fresh browser per iteration using an alternate engine binary.
    LaunchAlt { binary: PathBuf },
    /// Attach to a pre-running instance at the fixed control endpoint.
    Connect { ws_url: String },
}

impl LaunchMode {
    /// Resolve the mode from the CLI switches. The switches are independent;
    /// when both are given, connect wins and the alternate engine is ignored.
    pub fn from_flags(connect: bool, alt_engine: bool) -> Result<Self> {
        if connect {
            return Ok(Self::Connect {
                ws_url: BROWSER_WS_ENDPOINT.to_string(),
            });
        }
        if alt_engine {
            let binary = std::env::var_os(ALT_BROWSER_ENV)
                .map(PathBuf::from)
                .ok_or_else(|| {
                    Error::Config(format!(
                        "{} must point at the alternate browser binary",
                        ALT_BROWSER_ENV
                    ))
                })?;
            return Ok(Self::LaunchAlt { binary });
        }
        Ok(Self::Launch)
    }

    fn artifact_label(&self) -> &'static str {
        match self {
            Self::Launch => "browser-launch",
            Self::LaunchAlt { .. } => "browser-alt",
            Self::Connect { .. } => "browser-connect",
        }
    }
}

/// CDP-backed renderer (uses the `headless_chrome` crate).
pub struct BrowserRenderer {
    data_url: String,
    mode: LaunchMode,
    viewport: Viewport,
}

impl BrowserRenderer {
    /// Prepare a renderer for the given document. The HTML is encoded once
    /// into a `data:` URL; browsers are acquired per render call.
    pub fn new(html: &str, mode: LaunchMode) -> Self {
        Self {
            data_url: html_data_url(html),
            mode,
            viewport: Viewport::default(),
        }
    }

    fn acquire_browser(&self) -> Result<Browser> {
        match &self.mode {
            LaunchMode::Launch => {
                let options = LaunchOptions::default_builder()
                    .headless(true)
                    .window_size(Some((self.viewport.width, self.viewport.height)))
                    .build()
                    .map_err(|e| {
                        Error::Init(format!("Failed to build launch options: {}", e))
                    })?;
                Browser::new(options)
                    .map_err(|e| Error::Init(format!("Failed to launch browser: {}", e)))
            }
            LaunchMode::LaunchAlt { binary } => {
                let options = LaunchOptions::default_builder()
                    .headless(true)
                    .window_size(Some((self.viewport.width, self.viewport.height)))
                    .path(Some(binary.clone()))
                    .build()
                    .map_err(|e| {
                        Error::Init(format!("Failed to build launch options: {}", e))
                    })?;
                Browser::new(options).map_err(|e| {
                    Error::Init(format!(
                        "Failed to launch {}: {}",
                        binary.display(),
                        e
                    ))
                })
            }
            LaunchMode::Connect { ws_url } => Browser::connect(ws_url.clone())
                .map_err(|e| Error::Init(format!("Failed to connect to {}: {}", ws_url, e))),
        }
    }
}

impl Renderer for BrowserRenderer {
    fn label(&self) -> &str {
        self.mode.artifact_label()
    }

    fn artifact_ext(&self) -> &str {
        "png"
    }

    fn render(&mut self, _output_path: &Path) -> Result<RenderOutput> {
        let browser = self.acquire_browser()?;

        let tab = browser
            .new_tab()
            .map_err(|e| Error::Render(format!("Failed to open tab: {}", e)))?;

        tab.navigate_to(&self.data_url)
            .map_err(|e| Error::Render(format!("Navigation failed: {}", e)))?;
        tab.wait_until_navigated()
            .map_err(|e| Error::Render(format!("Wait for load failed: {}", e)))?;

        let png = {
            let body = tab
                .wait_for_element("body")
                .map_err(|e| Error::Render(format!("Document body not found: {}", e)))?;
            body.capture_screenshot(Page::CaptureScreenshotFormatOption::Png)
                .map_err(|e| Error::Render(format!("Screenshot failed: {}", e)))?
        };

        // Dropping the browser terminates a launched child process promptly;
        // in connect mode it only detaches from the shared instance.
        drop(tab);
        drop(browser);

        Ok(RenderOutput::Payload(png))
    }
}

fn html_data_url(html: &str) -> String {
    format!("data:text/html;charset=utf-8;base64,{}", STANDARD.encode(html))
}
