//! Chromium-backed page driver
//!
//! Launches a local Chrome/Chromium through the DevTools protocol and drives a
//! single tab. DOM reads and writes go through small in-page scripts; keyboard
//! input is dispatched as raw input events so it lands on whatever element the
//! page has focused.

use crate::config::BrowserConfig;
use crate::page::driver::{poll_for_element, DriverError, DriverResult, PageDriver};
use crate::page::selectors::js_string;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as ChromiumConfig};
use chromiumoxide::cdp::browser_protocol::input::{
    DispatchKeyEventParams, DispatchKeyEventType, InsertTextParams,
};
use chromiumoxide::error::CdpError;
use chromiumoxide::Page;
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Page driver controlling one Chromium tab
pub struct ChromiumDriver {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    poll_interval: Duration,
}

impl ChromiumDriver {
    /// Launches the browser and opens a blank tab
    ///
    /// # Arguments
    ///
    /// * `config` - Executable, window and timing settings
    ///
    /// # Returns
    ///
    /// * `Ok(ChromiumDriver)` - Browser is running and the tab is ready
    /// * `Err(DriverError::Launch)` - Chromium could not be started
    pub async fn launch(config: &BrowserConfig) -> DriverResult<Self> {
        let mut builder = ChromiumConfig::builder()
            .request_timeout(config.wait_timeout())
            .launch_timeout(Duration::from_secs(20));

        if !config.headless {
            builder = builder.with_head();
        }
        if let Some(executable) = &config.executable {
            builder = builder.chrome_executable(executable.clone());
        }

        let browser_config = builder.build().map_err(DriverError::Launch)?;
        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| DriverError::Launch(e.to_string()))?;

        // The protocol connection only makes progress while its event stream is polled
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    tracing::debug!("Browser event stream ended: {}", err);
                    break;
                }
            }
        });

        let page = browser.new_page("about:blank").await.map_err(backend)?;
        tracing::debug!("Chromium launched (headless: {})", config.headless);

        Ok(Self {
            browser,
            page,
            handler,
            poll_interval: config.poll_interval(),
        })
    }

    /// Closes the browser and stops the event loop
    pub async fn close(mut self) -> DriverResult<()> {
        self.browser.close().await.map_err(backend)?;
        if let Err(err) = self.browser.wait().await {
            tracing::warn!("Failed to reap browser process: {}", err);
        }
        self.handler.abort();
        Ok(())
    }

    /// Evaluates a script whose result is a boolean
    async fn eval_bool(&self, script: String) -> DriverResult<bool> {
        self.page
            .evaluate(script)
            .await
            .map_err(|e| DriverError::Script(e.to_string()))?
            .into_value::<bool>()
            .map_err(|e| DriverError::Script(e.to_string()))
    }

    /// Runs `body` against the first element matching `selector`
    ///
    /// `body` sees the element as `el`. Fails if nothing matches.
    async fn with_element(&self, selector: &str, body: &str) -> DriverResult<()> {
        let script = format!(
            "(() => {{ const el = document.querySelector({}); if (!el) return false; {} return true; }})()",
            js_string(selector),
            body
        );
        if self.eval_bool(script).await? {
            Ok(())
        } else {
            Err(not_found(selector))
        }
    }

    async fn element_exists(&self, selector: &str) -> DriverResult<bool> {
        let script = format!("document.querySelector({}) !== null", js_string(selector));
        self.eval_bool(script).await
    }

    async fn press_backspace(&self, kind: DispatchKeyEventType) -> DriverResult<()> {
        let params = DispatchKeyEventParams::builder()
            .r#type(kind)
            .key("Backspace")
            .code("Backspace")
            .windows_virtual_key_code(8)
            .native_virtual_key_code(8)
            .build()
            .map_err(DriverError::Backend)?;
        self.page.execute(params).await.map_err(backend)?;
        Ok(())
    }
}

#[async_trait]
impl PageDriver for ChromiumDriver {
    async fn navigate(&self, url: &str) -> DriverResult<()> {
        self.page.goto(url).await.map_err(backend)?;
        Ok(())
    }

    async fn click(&self, selector: &str) -> DriverResult<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| not_found(selector))?;
        element.click().await.map_err(backend)?;
        Ok(())
    }

    async fn select(&self, selector: &str, value: &str) -> DriverResult<()> {
        let body = format!(
            "el.value = {}; el.dispatchEvent(new Event('change', {{ bubbles: true }}));",
            js_string(value)
        );
        self.with_element(selector, &body).await
    }

    async fn type_text(&self, selector: &str, text: &str) -> DriverResult<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| not_found(selector))?;
        element
            .click()
            .await
            .map_err(backend)?
            .type_str(text)
            .await
            .map_err(backend)?;
        Ok(())
    }

    async fn clear_editable_flag(&self, selector: &str) -> DriverResult<()> {
        self.with_element(selector, "el.removeAttribute('readonly');")
            .await
    }

    async fn delete_character(&self) -> DriverResult<()> {
        self.press_backspace(DispatchKeyEventType::KeyDown).await?;
        self.press_backspace(DispatchKeyEventType::KeyUp).await
    }

    async fn type_keys(&self, text: &str) -> DriverResult<()> {
        self.page
            .execute(InsertTextParams::new(text))
            .await
            .map_err(backend)?;
        Ok(())
    }

    async fn set_hidden_value(&self, selector: &str, value: &str) -> DriverResult<()> {
        let body = format!("el.value = {};", js_string(value));
        self.with_element(selector, &body).await
    }

    async fn query_attribute(
        &self,
        selector: &str,
        attribute: &str,
    ) -> DriverResult<Option<String>> {
        // Serialized so a missing element and a missing attribute both arrive as null
        let script = format!(
            "JSON.stringify((() => {{ const el = document.querySelector({}); return el ? el.getAttribute({}) : null; }})())",
            js_string(selector),
            js_string(attribute)
        );
        let encoded = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| DriverError::Script(e.to_string()))?
            .into_value::<String>()
            .map_err(|e| DriverError::Script(e.to_string()))?;
        serde_json::from_str::<Option<String>>(&encoded)
            .map_err(|e| DriverError::Script(e.to_string()))
    }

    async fn wait_for_element(&self, selector: &str, timeout: Duration) -> DriverResult<()> {
        poll_for_element(selector, timeout, self.poll_interval, move || {
            self.element_exists(selector)
        })
        .await
    }

    async fn wait_for_navigation(&self, timeout: Duration) -> DriverResult<()> {
        match tokio::time::timeout(timeout, self.page.wait_for_navigation()).await {
            Ok(result) => {
                result.map_err(backend)?;
                Ok(())
            }
            Err(_) => Err(DriverError::NavigationTimeout { waited: timeout }),
        }
    }

    async fn evaluate(&self, script: &str) -> DriverResult<()> {
        self.page
            .evaluate(script.to_string())
            .await
            .map_err(|e| DriverError::Script(e.to_string()))?;
        Ok(())
    }
}

fn backend(err: CdpError) -> DriverError {
    DriverError::Backend(err.to_string())
}

fn not_found(selector: &str) -> DriverError {
    DriverError::ElementNotFound {
        selector: selector.to_string(),
    }
}
