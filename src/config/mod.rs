//! Configuration.
//!
//! - `AppConfig`: desktop host preferences behind a global `RwLock`
//! - `RunnerConfig`: scenario runner settings loaded from JSON and CLI flags

pub mod app;
pub mod runner;

pub use app::{AppConfig, APP_CONFIG};
pub use runner::{BrowserEngine, RunnerConfig, RunnerOverrides, Viewport};
