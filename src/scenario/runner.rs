//! Scenario interpreter.
//!
//! Each scenario runs in a fresh session per engine. Waiting steps poll the
//! session until their timeout; the whole run is also bounded by the
//! scenario timeout. Failures are terminal, nothing is retried.

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, timeout, Instant};

use super::automation::{Automation, AutomationLauncher};
use super::report::{Outcome, RunReport, RunState, ScenarioFailure, ScenarioResult};
use super::{Scenario, Step};
use crate::config::{BrowserEngine, RunnerConfig};
use crate::error::NinResult;

/// Interval between probes while waiting for a control or a result.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// States entered by one run.
struct RunTrace {
    states: Vec<RunState>,
}

impl RunTrace {
    fn new() -> Self {
        Self {
            states: vec![RunState::Pending],
        }
    }

    fn enter(&mut self, state: RunState) {
        log::debug!("[E2E] -> {}", state);
        self.states.push(state);
    }

    fn current(&self) -> RunState {
        self.states.last().copied().unwrap_or(RunState::Pending)
    }
}

pub struct ScenarioRunner<L> {
    launcher: L,
    config: RunnerConfig,
}

impl<L: AutomationLauncher> ScenarioRunner<L> {
    pub fn new(launcher: L, config: RunnerConfig) -> Self {
        Self { launcher, config }
    }

    /// Run every scenario on every configured engine, in order.
    pub async fn run_all(&self, scenarios: &[Scenario]) -> RunReport {
        let mut report = RunReport::default();

        for engine in &self.config.engines {
            for scenario in scenarios {
                let result = self.run_on(*engine, scenario).await;
                log::info!("{}", result);
                report.results.push(result);
            }
        }

        report
    }

    /// Run one scenario in a freshly launched session.
    pub async fn run_on(&self, engine: BrowserEngine, scenario: &Scenario) -> ScenarioResult {
        let started = Instant::now();
        let mut trace = RunTrace::new();

        log::info!(
            "[E2E] [{}] {} ({})",
            engine,
            scenario.name,
            scenario.target_url().unwrap_or("no navigation")
        );

        let outcome = match scenario.validate() {
            Err(failure) => Outcome::Failed(failure),
            Ok(()) => match self.launcher.launch(engine, &self.config).await {
                Err(e) => Outcome::Failed(ScenarioFailure::Automation {
                    stage: RunState::Pending,
                    message: e.to_string(),
                }),
                Ok(mut session) => {
                    let outcome = match timeout(
                        self.config.timeout(),
                        self.drive(&mut session, scenario, &mut trace),
                    )
                    .await
                    {
                        Ok(Ok(())) => Outcome::Passed,
                        Ok(Err(failure)) => Outcome::Failed(failure),
                        Err(_) => Outcome::Failed(ScenarioFailure::Timeout {
                            stage: trace.current(),
                            timeout_ms: self.config.timeout_ms,
                        }),
                    };

                    if let Err(e) = session.close().await {
                        log::warn!("[E2E] failed to close {} session: {}", engine, e);
                    }
                    outcome
                }
            },
        };

        trace.enter(match outcome {
            Outcome::Passed => RunState::Passed,
            Outcome::Failed(_) => RunState::Failed,
        });

        ScenarioResult {
            scenario: scenario.name.clone(),
            engine,
            outcome,
            trace: trace.states,
            elapsed: started.elapsed(),
        }
    }

    async fn drive<A: Automation>(
        &self,
        session: &mut A,
        scenario: &Scenario,
        trace: &mut RunTrace,
    ) -> Result<(), ScenarioFailure> {
        let mut last_text: Option<String> = None;

        for step in &scenario.steps {
            match step {
                Step::Navigate { url } => {
                    trace.enter(RunState::Navigating);
                    self.slow_mo().await;
                    let url = self.config.resolve_url(url);
                    within(
                        RunState::Navigating,
                        self.config.navigation_timeout(),
                        session.navigate(&url),
                    )
                    .await?;
                }
                Step::ClickByLabel { label } => {
                    trace.enter(RunState::WaitingForControl);
                    within(
                        RunState::WaitingForControl,
                        self.config.action_timeout(),
                        wait_for_control(session, label),
                    )
                    .await?;

                    trace.enter(RunState::Clicking);
                    self.slow_mo().await;
                    session
                        .click_control(label)
                        .await
                        .map_err(|e| automation_failure(RunState::Clicking, e))?;
                }
                Step::ReadText { selector } => {
                    trace.enter(RunState::ReadingResult);
                    self.slow_mo().await;
                    let text = within(
                        RunState::ReadingResult,
                        self.config.action_timeout(),
                        wait_for_text(session, selector),
                    )
                    .await?;
                    last_text = Some(text);
                }
                Step::AssertContains { expected } => {
                    trace.enter(RunState::Asserting);
                    let actual = last_text.as_deref().ok_or_else(|| {
                        ScenarioFailure::InvalidScenario("nothing was read before asserting".to_string())
                    })?;
                    if !actual.contains(expected.as_str()) {
                        return Err(ScenarioFailure::AssertionMismatch {
                            expected: expected.clone(),
                            actual: actual.to_string(),
                        });
                    }
                }
            }
        }

        Ok(())
    }

    async fn slow_mo(&self) {
        if self.config.slow_mo_ms > 0 {
            sleep(self.config.slow_mo()).await;
        }
    }
}

async fn wait_for_control<A: Automation>(session: &mut A, label: &str) -> NinResult<()> {
    loop {
        if session.has_control(label).await? {
            return Ok(());
        }
        sleep(POLL_INTERVAL).await;
    }
}

async fn wait_for_text<A: Automation>(session: &mut A, selector: &str) -> NinResult<String> {
    loop {
        if let Some(text) = session.text_content(selector).await? {
            return Ok(text);
        }
        sleep(POLL_INTERVAL).await;
    }
}

/// Bound a step by `limit`, tagging errors with the stage they happened in.
async fn within<T>(
    stage: RunState,
    limit: Duration,
    step: impl Future<Output = NinResult<T>>,
) -> Result<T, ScenarioFailure> {
    match timeout(limit, step).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(automation_failure(stage, e)),
        Err(_) => Err(ScenarioFailure::Timeout {
            stage,
            timeout_ms: limit.as_millis() as u64,
        }),
    }
}

fn automation_failure(stage: RunState, e: crate::error::NinError) -> ScenarioFailure {
    ScenarioFailure::Automation {
        stage,
        message: e.to_string(),
    }
}
