//! Run states, failures and the pass/fail report.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::config::BrowserEngine;

/// Where a single scenario run is.
///
/// `Pending → Navigating → WaitingForControl → Clicking → ReadingResult →
/// Asserting → {Passed | Failed}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunState {
    Pending,
    Navigating,
    WaitingForControl,
    Clicking,
    ReadingResult,
    Asserting,
    Passed,
    Failed,
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ScenarioFailure {
    #[error("Timed out after {timeout_ms}ms in {stage}")]
    Timeout { stage: RunState, timeout_ms: u64 },

    #[error("Expected text to contain {expected:?}, actual text was {actual:?}")]
    AssertionMismatch { expected: String, actual: String },

    #[error("Automation failed in {stage}: {message}")]
    Automation { stage: RunState, message: String },

    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed(ScenarioFailure),
}

/// Result of one scenario on one engine.
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    pub scenario: String,
    pub engine: BrowserEngine,
    pub outcome: Outcome,
    /// Every state the run entered, in order.
    pub trace: Vec<RunState>,
    pub elapsed: Duration,
}

impl ScenarioResult {
    pub fn passed(&self) -> bool {
        self.outcome == Outcome::Passed
    }
}

impl std::fmt::Display for ScenarioResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.outcome {
            Outcome::Passed => write!(
                f,
                "  ✓ [{}] {} ({}ms)",
                self.engine,
                self.scenario,
                self.elapsed.as_millis()
            ),
            Outcome::Failed(failure) => write!(
                f,
                "  ✘ [{}] {} ({}ms)\n      {}",
                self.engine,
                self.scenario,
                self.elapsed.as_millis(),
                failure
            ),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub results: Vec<ScenarioResult>,
}

impl RunReport {
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.results.len() - self.passed_count()
    }

    /// False for an empty report: running nothing is not a pass.
    pub fn all_passed(&self) -> bool {
        !self.results.is_empty() && self.failed_count() == 0
    }

    /// Process exit code for the CLI.
    pub fn exit_code(&self) -> i32 {
        if self.all_passed() {
            0
        } else {
            1
        }
    }
}

impl std::fmt::Display for RunReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for result in &self.results {
            writeln!(f, "{}", result)?;
        }
        write!(
            f,
            "\n  {} passed, {} failed",
            self.passed_count(),
            self.failed_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(outcome: Outcome) -> ScenarioResult {
        ScenarioResult {
            scenario: "カーソルを下に移動".to_string(),
            engine: BrowserEngine::Chromium,
            outcome,
            trace: vec![RunState::Pending],
            elapsed: Duration::from_millis(120),
        }
    }

    #[test]
    fn test_failure_messages() {
        let timeout = ScenarioFailure::Timeout {
            stage: RunState::Navigating,
            timeout_ms: 30_000,
        };
        assert_eq!(timeout.to_string(), "Timed out after 30000ms in Navigating");

        let mismatch = ScenarioFailure::AssertionMismatch {
            expected: "moved".to_string(),
            actual: "idle".to_string(),
        };
        let msg = mismatch.to_string();
        assert!(msg.contains("\"moved\""));
        assert!(msg.contains("\"idle\""));
    }

    #[test]
    fn test_report_counts_and_exit_code() {
        let report = RunReport {
            results: vec![
                result(Outcome::Passed),
                result(Outcome::Failed(ScenarioFailure::InvalidScenario(
                    "x".to_string(),
                ))),
            ],
        };
        assert_eq!(report.passed_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert!(!report.all_passed());
        assert_eq!(report.exit_code(), 1);

        let text = report.to_string();
        assert!(text.contains("✓ [Chromium]"));
        assert!(text.contains("✘ [Chromium]"));
        assert!(text.contains("1 passed, 1 failed"));
    }

    #[test]
    fn test_empty_report_fails() {
        let report = RunReport::default();
        assert!(!report.all_passed());
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn test_passing_report() {
        let report = RunReport {
            results: vec![result(Outcome::Passed)],
        };
        assert_eq!(report.exit_code(), 0);
    }
}
