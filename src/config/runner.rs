//! Scenario runner configuration.
//!
//! Defaults match the checked-in `e2e/runner.json`. Values are layered:
//! defaults, then the JSON file, then CLI flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{NinError, NinResult, ResultExt};

/// Rendering engines a scenario can run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BrowserEngine {
    Chromium,
    Firefox,
    Webkit,
}

impl std::fmt::Display for BrowserEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BrowserEngine::Chromium => write!(f, "Chromium"),
            BrowserEngine::Firefox => write!(f, "Firefox"),
            BrowserEngine::Webkit => write!(f, "WebKit"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
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

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunnerConfig {
    /// Relative `navigate` URLs are resolved against this.
    pub base_url: String,

    /// Directory scanned for `*.scenario.json` files.
    pub test_dir: PathBuf,

    /// Upper bound for one whole scenario run.
    pub timeout_ms: u64,

    /// Limit for a single navigation.
    pub navigation_timeout_ms: u64,

    /// Limit for waiting on a control or a result container.
    pub action_timeout_ms: u64,

    /// Run without a visible browser window.
    pub headless: bool,

    pub viewport: Viewport,

    /// Delay before every browser action, for watching runs by eye.
    pub slow_mo_ms: u64,

    /// Each engine runs every scenario independently.
    pub engines: Vec<BrowserEngine>,

    /// Serve this directory on a local port and run against it instead of `base_url`.
    pub serve_dir: Option<PathBuf>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:1420".to_string(),
            test_dir: PathBuf::from("./e2e"),
            timeout_ms: 30_000,
            navigation_timeout_ms: 30_000,
            action_timeout_ms: 10_000,
            headless: false,
            viewport: Viewport::default(),
            slow_mo_ms: 50,
            engines: vec![BrowserEngine::Chromium],
            serve_dir: None,
        }
    }
}

impl RunnerConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> NinResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runner config {}", path.display()))?;
        let config: RunnerConfig = serde_json::from_str(&text)
            .map_err(|e| NinError::ConfigError(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> NinResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(NinError::ConfigError("baseUrl must not be empty".to_string()));
        }
        if self.engines.is_empty() {
            return Err(NinError::ConfigError("at least one engine is required".to_string()));
        }
        if self.timeout_ms == 0 || self.navigation_timeout_ms == 0 || self.action_timeout_ms == 0 {
            return Err(NinError::ConfigError("timeouts must be greater than zero".to_string()));
        }
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(NinError::ConfigError(format!(
                "invalid viewport {}x{}",
                self.viewport.width, self.viewport.height
            )));
        }
        if let Some(dir) = &self.serve_dir {
            if !dir.is_dir() {
                return Err(NinError::ConfigError(format!(
                    "serve directory {} does not exist",
                    dir.display()
                )));
            }
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    pub fn action_timeout(&self) -> Duration {
        Duration::from_millis(self.action_timeout_ms)
    }

    pub fn slow_mo(&self) -> Duration {
        Duration::from_millis(self.slow_mo_ms)
    }

    /// Absolute URLs pass through; anything else is joined onto `base_url`.
    pub fn resolve_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") || url.starts_with("about:") {
            return url.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            url.trim_start_matches('/')
        )
    }
}

/// Values given on the command line; `None` keeps the loaded value.
#[derive(Debug, Clone, Default)]
pub struct RunnerOverrides {
    pub base_url: Option<String>,
    pub test_dir: Option<PathBuf>,
    pub timeout_ms: Option<u64>,
    pub navigation_timeout_ms: Option<u64>,
    pub action_timeout_ms: Option<u64>,
    pub headless: Option<bool>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub slow_mo_ms: Option<u64>,
    pub engines: Vec<BrowserEngine>,
    pub serve_dir: Option<PathBuf>,
}

impl RunnerOverrides {
    pub fn apply(self, config: &mut RunnerConfig) {
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if let Some(test_dir) = self.test_dir {
            config.test_dir = test_dir;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
        if let Some(ms) = self.navigation_timeout_ms {
            config.navigation_timeout_ms = ms;
        }
        if let Some(ms) = self.action_timeout_ms {
            config.action_timeout_ms = ms;
        }
        if let Some(headless) = self.headless {
            config.headless = headless;
        }
        if let Some(width) = self.width {
            config.viewport.width = width;
        }
        if let Some(height) = self.height {
            config.viewport.height = height;
        }
        if let Some(slow_mo_ms) = self.slow_mo_ms {
            config.slow_mo_ms = slow_mo_ms;
        }
        if !self.engines.is_empty() {
            config.engines = self.engines;
        }
        if let Some(dir) = self.serve_dir {
            config.serve_dir = Some(dir);
        }
    }
}
