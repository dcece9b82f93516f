//! Declarative browser scenarios.
//!
//! A scenario is plain data: an ordered list of steps interpreted by
//! `ScenarioRunner` against an injected `Automation` capability. Scenario
//! files live in the runner's test directory as `*.scenario.json`.

pub mod automation;
#[cfg(feature = "browser")]
pub mod chromium;
pub mod report;
pub mod runner;
pub mod serve;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{NinError, NinResult, ResultExt};

pub use automation::{Automation, AutomationLauncher};
#[cfg(feature = "browser")]
pub use chromium::{ChromiumLauncher, ChromiumSession};
pub use report::{Outcome, RunReport, RunState, ScenarioFailure, ScenarioResult};
pub use runner::ScenarioRunner;
pub use serve::StaticServer;

/// File suffix picked up by `load_dir`.
pub const SCENARIO_SUFFIX: &str = ".scenario.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Step {
    /// Open a URL, relative URLs resolve against the configured base URL.
    Navigate { url: String },
    /// Wait for a button whose visible text contains `label`, then click it.
    ClickByLabel { label: String },
    /// Wait for the element matching `selector` and keep its text content.
    ReadText { selector: String },
    /// The last read text must contain `expected`.
    AssertContains { expected: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub steps: Vec<Step>,
}

impl Scenario {
    /// URL of the first navigation step.
    pub fn target_url(&self) -> Option<&str> {
        self.steps.iter().find_map(|step| match step {
            Step::Navigate { url } => Some(url.as_str()),
            _ => None,
        })
    }

    pub fn validate(&self) -> Result<(), ScenarioFailure> {
        if self.steps.is_empty() {
            return Err(ScenarioFailure::InvalidScenario(format!(
                "'{}' has no steps",
                self.name
            )));
        }
        if !matches!(self.steps[0], Step::Navigate { .. }) {
            return Err(ScenarioFailure::InvalidScenario(format!(
                "'{}' must start with a navigate step",
                self.name
            )));
        }

        let mut has_text = false;
        for step in &self.steps {
            match step {
                Step::ReadText { .. } => has_text = true,
                Step::AssertContains { .. } if !has_text => {
                    return Err(ScenarioFailure::InvalidScenario(format!(
                        "'{}' asserts before reading any text",
                        self.name
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
impl Scenario {
    /// Navigate, click the labeled control, read `selector`, assert `expected`.
    pub fn click_and_expect(
        name: impl Into<String>,
        url: impl Into<String>,
        label: impl Into<String>,
        selector: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            steps: vec![
                Step::Navigate { url: url.into() },
                Step::ClickByLabel {
                    label: label.into(),
                },
                Step::ReadText {
                    selector: selector.into(),
                },
                Step::AssertContains {
                    expected: expected.into(),
                },
            ],
        }
    }

    /// The cursor-move check against the application root.
    pub fn cursor_down() -> Self {
        Self::click_and_expect(
            "カーソルを下に移動",
            "/",
            "カーソルを下に移動",
            "#result",
            "カーソルを移動しました",
        )
    }
}

/// Load every `*.scenario.json` in `dir`, ordered by file name.
pub fn load_dir(dir: &Path) -> NinResult<Vec<Scenario>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read test directory {}", dir.display()))?;

    let mut paths: Vec<_> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.ends_with(SCENARIO_SUFFIX))
                .unwrap_or(false)
        })
        .collect();
    paths.sort();

    let mut scenarios = Vec::with_capacity(paths.len());
    for path in paths {
        let text = std::fs::read_to_string(&path)?;
        let scenario: Scenario = serde_json::from_str(&text)
            .map_err(|e| NinError::ConfigError(format!("{}: {}", path.display(), e)))?;
        scenario.validate()?;
        log::debug!("[E2E] loaded '{}' from {}", scenario.name, path.display());
        scenarios.push(scenario);
    }

    Ok(scenarios)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_down_shape() {
        let scenario = Scenario::cursor_down();
        assert_eq!(scenario.target_url(), Some("/"));
        assert!(scenario.validate().is_ok());
    }

    #[test]
    fn test_step_json_format() {
        let json = r##"{
            "name": "cursor",
            "steps": [
                { "action": "navigate", "url": "/" },
                { "action": "clickByLabel", "label": "カーソルを下に移動" },
                { "action": "readText", "selector": "#result" },
                { "action": "assertContains", "expected": "カーソルを移動しました" }
            ]
        }"##;
        let scenario: Scenario = serde_json::from_str(json).unwrap();
        assert_eq!(scenario.steps, Scenario::cursor_down().steps);
    }

    #[test]
    fn test_validate_rejects_assert_before_read() {
        let scenario = Scenario {
            name: "bad".to_string(),
            steps: vec![
                Step::Navigate {
                    url: "/".to_string(),
                },
                Step::AssertContains {
                    expected: "x".to_string(),
                },
            ],
        };
        assert!(matches!(
            scenario.validate(),
            Err(ScenarioFailure::InvalidScenario(_))
        ));
    }

    #[test]
    fn test_validate_rejects_missing_navigation() {
        let scenario = Scenario {
            name: "bad".to_string(),
            steps: vec![Step::ReadText {
                selector: "#result".to_string(),
            }],
        };
        assert!(scenario.validate().is_err());

        let empty = Scenario {
            name: "empty".to_string(),
            steps: vec![],
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_load_dir_only_reads_scenario_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("b.scenario.json"),
            serde_json::to_string(&Scenario::cursor_down()).unwrap(),
        )
        .unwrap();
        let mut other = Scenario::cursor_down();
        other.name = "first".to_string();
        std::fs::write(
            dir.path().join("a.scenario.json"),
            serde_json::to_string(&other).unwrap(),
        )
        .unwrap();
        std::fs::write(dir.path().join("runner.json"), "{}").unwrap();

        let scenarios = load_dir(dir.path()).unwrap();
        assert_eq!(scenarios.len(), 2);
        assert_eq!(scenarios[0].name, "first");
    }

    #[test]
    fn test_load_dir_reports_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("x.scenario.json"), "{ not json").unwrap();

        let err = load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, NinError::ConfigError(_)));
    }
}
