//! Chrome DevTools Protocol backend (chromiumoxide).
//!
//! Only the Chromium engine can be driven over CDP; other engines fail at
//! launch so their results are reported separately.

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::handler::viewport::Viewport as CdpViewport;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;

use super::automation::{Automation, AutomationLauncher};
use crate::config::{BrowserEngine, RunnerConfig};
use crate::error::{NinError, NinResult, ResultExt};

/// Attribute placed on the control about to be clicked.
const CLICK_TARGET_ATTR: &str = "data-nin-click-target";

/// Elements that count as a labeled control.
const CONTROL_SELECTOR: &str =
    "button, [role=\"button\"], input[type=\"button\"], input[type=\"submit\"]";

#[derive(Debug, Default, Clone, Copy)]
pub struct ChromiumLauncher;

impl AutomationLauncher for ChromiumLauncher {
    type Session = ChromiumSession;

    async fn launch(&self, engine: BrowserEngine, config: &RunnerConfig) -> NinResult<ChromiumSession> {
        if engine != BrowserEngine::Chromium {
            return Err(NinError::AutomationError(format!(
                "{} cannot be driven over the DevTools protocol",
                engine
            )));
        }

        let mut builder = BrowserConfig::builder()
            .window_size(config.viewport.width, config.viewport.height)
            .viewport(CdpViewport {
                width: config.viewport.width,
                height: config.viewport.height,
                device_scale_factor: None,
                emulating_mobile: false,
                is_landscape: false,
                has_touch: false,
            })
            .request_timeout(config.navigation_timeout());
        if !config.headless {
            builder = builder.with_head();
        }
        let browser_config = builder.build().map_err(NinError::AutomationError)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .context("failed to launch Chromium")?;

        // The handler must be polled for the connection to make progress
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    log::debug!("[E2E] CDP handler stopped: {}", e);
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .context("failed to open a page")?;

        log::debug!(
            "[E2E] Chromium launched ({}x{}, headless: {})",
            config.viewport.width,
            config.viewport.height,
            config.headless
        );

        Ok(ChromiumSession {
            browser,
            page,
            handler_task,
        })
    }
}

/// Result of a text lookup; a bare `null` does not survive `into_value`.
#[derive(serde::Deserialize)]
struct TextProbe {
    found: bool,
    text: String,
}

pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
}

impl ChromiumSession {
    async fn eval<T: serde::de::DeserializeOwned>(&self, script: String) -> NinResult<T> {
        self.page
            .evaluate(script)
            .await
            .context("script evaluation failed")?
            .into_value::<T>()
            .context("unexpected script result")
    }
}

/// Script that finds visible controls containing `label` and applies `action` to the first.
fn control_script(label: &str, action: &str) -> NinResult<String> {
    let label = serde_json::to_string(label)?;
    let selector = serde_json::to_string(CONTROL_SELECTOR)?;
    Ok(format!(
        r#"(() => {{
    const label = {label};
    const visible = (el) => !!(el.offsetWidth || el.offsetHeight || el.getClientRects().length);
    const el = Array.from(document.querySelectorAll({selector}))
        .find((el) => visible(el) && (el.innerText || el.value || "").includes(label));
    if (!el) return false;
    {action}
    return true;
}})()"#
    ))
}

impl Automation for ChromiumSession {
    async fn navigate(&mut self, url: &str) -> NinResult<()> {
        log::debug!("[E2E] goto {}", url);
        self.page
            .goto(url)
            .await
            .with_context(|| format!("navigation to {} failed", url))?;
        Ok(())
    }

    async fn has_control(&mut self, label: &str) -> NinResult<bool> {
        self.eval(control_script(label, "")?).await
    }

    async fn click_control(&mut self, label: &str) -> NinResult<()> {
        let mark = format!(
            "document.querySelectorAll('[{attr}]').forEach((e) => e.removeAttribute('{attr}')); el.setAttribute('{attr}', '');",
            attr = CLICK_TARGET_ATTR
        );
        let found: bool = self.eval(control_script(label, &mark)?).await?;
        if !found {
            return Err(NinError::AutomationError(format!(
                "no control labeled {:?}",
                label
            )));
        }

        // A real mouse click on the marked element, not a synthetic DOM event
        self.page
            .find_element(format!("[{}]", CLICK_TARGET_ATTR))
            .await
            .context("marked control disappeared")?
            .click()
            .await
            .context("click failed")?;
        Ok(())
    }

    async fn text_content(&mut self, selector: &str) -> NinResult<Option<String>> {
        let script = format!(
            "(() => {{ const el = document.querySelector({}); return {{ found: !!el, text: el ? (el.textContent || \"\") : \"\" }}; }})()",
            serde_json::to_string(selector)?
        );
        let probe: TextProbe = self.eval(script).await?;
        Ok(probe.found.then_some(probe.text))
    }

    async fn close(mut self) -> NinResult<()> {
        let closed = self.browser.close().await.context("failed to close Chromium");
        let _ = self.browser.wait().await;
        self.handler_task.abort();
        closed.map(|_| ())
    }
}
