//! Page driver capability surface
//!
//! The booking workflow only ever talks to the remote page through this
//! trait, so it can run against a real browser or a scripted fake.

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

/// Errors raised while interacting with the page
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    #[error("Element not found: {selector}")]
    ElementNotFound { selector: String },

    #[error("Timed out after {waited:?} waiting for {selector}")]
    Timeout { selector: String, waited: Duration },

    #[error("Timed out after {waited:?} waiting for the page to load")]
    NavigationTimeout { waited: Duration },

    #[error("Page script failed: {0}")]
    Script(String),

    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Browser protocol error: {0}")]
    Backend(String),
}

/// Result type alias for page driver operations
pub type DriverResult<T> = std::result::Result<T, DriverError>;

/// Interactions the booking workflow needs from a page
///
/// Every method is a suspension point; implementations resolve once the
/// interaction has been dispatched to the page.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Loads `url` in the page
    async fn navigate(&self, url: &str) -> DriverResult<()>;

    /// Clicks the element matching `selector`
    async fn click(&self, selector: &str) -> DriverResult<()>;

    /// Sets the value of a `<select>` element and fires its change event
    async fn select(&self, selector: &str, value: &str) -> DriverResult<()>;

    /// Focuses the element and types `text` into it
    async fn type_text(&self, selector: &str, text: &str) -> DriverResult<()>;

    /// Removes the `readonly` attribute from an input
    async fn clear_editable_flag(&self, selector: &str) -> DriverResult<()>;

    /// Presses Backspace on the focused element
    async fn delete_character(&self) -> DriverResult<()>;

    /// Types `text` into the focused element
    async fn type_keys(&self, text: &str) -> DriverResult<()>;

    /// Writes `value` into a hidden input without user events
    async fn set_hidden_value(&self, selector: &str, value: &str) -> DriverResult<()>;

    /// Reads an attribute of the first element matching `selector`
    ///
    /// Returns `Ok(None)` when no element matches or the attribute is absent.
    async fn query_attribute(&self, selector: &str, attribute: &str)
        -> DriverResult<Option<String>>;

    /// Waits until an element matching `selector` exists
    ///
    /// Fails with [`DriverError::Timeout`] once `timeout` has elapsed.
    async fn wait_for_element(&self, selector: &str, timeout: Duration) -> DriverResult<()>;

    /// Waits for a navigation started by the previous interaction to finish
    ///
    /// Returns at once when no navigation is in flight. Fails with
    /// [`DriverError::NavigationTimeout`] once `timeout` has elapsed.
    async fn wait_for_navigation(&self, timeout: Duration) -> DriverResult<()>;

    /// Pauses for a fixed duration
    async fn wait_fixed_delay(&self, delay: Duration) -> DriverResult<()> {
        tokio::time::sleep(delay).await;
        Ok(())
    }

    /// Runs a script in the page, discarding its result
    async fn evaluate(&self, script: &str) -> DriverResult<()>;
}

/// Polls `probe` until it reports the element present or `timeout` elapses
///
/// Script and protocol errors count as "not present yet": while a page is
/// being replaced its execution context disappears and evaluations fail until
/// the new document is ready. Any other error ends the wait.
pub(crate) async fn poll_for_element<F, Fut>(
    selector: &str,
    timeout: Duration,
    interval: Duration,
    mut probe: F,
) -> DriverResult<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = DriverResult<bool>>,
{
    let started = Instant::now();
    loop {
        match probe().await {
            Ok(true) => {
                tracing::trace!("{} appeared after {:?}", selector, started.elapsed());
                return Ok(());
            }
            Ok(false) => {}
            Err(err @ (DriverError::Script(_) | DriverError::Backend(_))) => {
                tracing::trace!("Polling {} again after: {}", selector, err);
            }
            Err(err) => return Err(err),
        }
        if started.elapsed() >= timeout {
            return Err(DriverError::Timeout {
                selector: selector.to_string(),
                waited: timeout,
            });
        }
        tokio::time::sleep(interval).await;
    }
}
