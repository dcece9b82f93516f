//! The browser capability the runner drives.
//!
//! Implementations only perform single probes and actions; waiting,
//! timeouts and slow-motion delays belong to the runner.

use crate::config::{BrowserEngine, RunnerConfig};
use crate::error::NinResult;

/// One browser session with a single page.
#[allow(async_fn_in_trait)]
pub trait Automation {
    async fn navigate(&mut self, url: &str) -> NinResult<()>;

    /// Whether a button whose visible text contains `label` is on the page right now.
    async fn has_control(&mut self, label: &str) -> NinResult<bool>;

    async fn click_control(&mut self, label: &str) -> NinResult<()>;

    /// Text content of the first element matching `selector`, `None` if absent.
    async fn text_content(&mut self, selector: &str) -> NinResult<Option<String>>;

    async fn close(self) -> NinResult<()>;
}

/// Opens fresh sessions, one per scenario run.
#[allow(async_fn_in_trait)]
pub trait AutomationLauncher {
    type Session: Automation;

    async fn launch(&self, engine: BrowserEngine, config: &RunnerConfig) -> NinResult<Self::Session>;
}
