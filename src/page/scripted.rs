//! Scripted page driver
//!
//! Records every interaction instead of touching a browser and serves canned
//! flight listings. Used by the tests and by `--dry-run` to rehearse a booking.

use crate::page::driver::{DriverError, DriverResult, PageDriver};
use crate::page::selectors::{flight_listing, flight_select_button, DEPARTURE_ATTRIBUTE, FLIGHT_SLOT_COUNT};
use async_trait::async_trait;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// One recorded interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverCall {
    Navigate(String),
    Click(String),
    Select { selector: String, value: String },
    TypeText { selector: String, text: String },
    ClearEditableFlag(String),
    DeleteCharacter,
    TypeKeys(String),
    SetHiddenValue { selector: String, value: String },
    QueryAttribute { selector: String, attribute: String },
    WaitForElement(String),
    WaitForNavigation,
    WaitFixedDelay(Duration),
    Evaluate(String),
}

impl DriverCall {
    /// Selector the call targets, if any
    pub fn selector(&self) -> Option<&str> {
        let selector = match self {
            Self::Click(s)
            | Self::ClearEditableFlag(s)
            | Self::WaitForElement(s)
            | Self::Select { selector: s, .. }
            | Self::TypeText { selector: s, .. }
            | Self::SetHiddenValue { selector: s, .. }
            | Self::QueryAttribute { selector: s, .. } => s,
            Self::Navigate(_)
            | Self::DeleteCharacter
            | Self::TypeKeys(_)
            | Self::WaitForNavigation
            | Self::WaitFixedDelay(_)
            | Self::Evaluate(_) => return None,
        };
        Some(selector.as_str())
    }
}

impl fmt::Display for DriverCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Navigate(url) => write!(f, "navigate {}", url),
            Self::Click(s) => write!(f, "click {}", s),
            Self::Select { selector, value } => write!(f, "select {} = {:?}", selector, value),
            Self::TypeText { selector, text } => write!(f, "type {} <- {:?}", selector, text),
            Self::ClearEditableFlag(s) => write!(f, "make editable {}", s),
            Self::DeleteCharacter => write!(f, "press Backspace"),
            Self::TypeKeys(text) => write!(f, "type keys {:?}", text),
            Self::SetHiddenValue { selector, value } => {
                write!(f, "set hidden {} = {:?}", selector, value)
            }
            Self::QueryAttribute { selector, attribute } => {
                write!(f, "read {}[{}]", selector, attribute)
            }
            Self::WaitForElement(s) => write!(f, "wait for {}", s),
            Self::WaitForNavigation => write!(f, "wait for navigation"),
            Self::WaitFixedDelay(d) => write!(f, "pause {:?}", d),
            Self::Evaluate(script) => write!(f, "evaluate {}", script),
        }
    }
}

#[derive(Debug, Default)]
struct ScriptState {
    calls: Vec<DriverCall>,
    /// Flight selections made so far; picks the listing page being served
    selections: usize,
}

/// Page driver replaying canned listings and recording interactions
#[derive(Debug, Default)]
pub struct ScriptedDriver {
    listings: Vec<Vec<Option<String>>>,
    failing: HashSet<String>,
    state: Mutex<ScriptState>,
}

impl ScriptedDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a results page
    ///
    /// The first page is served until a flight is selected, then the next
    /// one, mirroring the outbound and return result views. Each entry is the
    /// departure attribute of a slot; `None` leaves the slot empty.
    pub fn with_listing<I, S>(mut self, slots: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        self.listings
            .push(slots.into_iter().map(|slot| slot.map(Into::into)).collect());
        self
    }

    /// Makes every interaction with `target` fail
    ///
    /// Waits time out; other calls report the element as missing. `target`
    /// may also be a URL passed to `navigate`.
    pub fn fail_on(mut self, target: impl Into<String>) -> Self {
        self.failing.insert(target.into());
        self
    }

    /// Returns a copy of the recorded interactions, oldest first
    pub fn calls(&self) -> Vec<DriverCall> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, call: DriverCall) {
        self.lock().calls.push(call);
    }

    fn check(&self, target: &str) -> DriverResult<()> {
        if self.failing.contains(target) {
            return Err(DriverError::ElementNotFound {
                selector: target.to_string(),
            });
        }
        Ok(())
    }

    fn listing_value(&self, selector: &str) -> Option<String> {
        let page = self.listings.get(self.lock().selections)?;
        let slot = (0..FLIGHT_SLOT_COUNT).find(|&slot| flight_listing(slot) == selector)?;
        page.get(slot).cloned().flatten()
    }
}

#[async_trait]
impl PageDriver for ScriptedDriver {
    async fn navigate(&self, url: &str) -> DriverResult<()> {
        self.record(DriverCall::Navigate(url.to_string()));
        self.check(url)
    }

    async fn click(&self, selector: &str) -> DriverResult<()> {
        self.record(DriverCall::Click(selector.to_string()));
        self.check(selector)?;
        if (0..FLIGHT_SLOT_COUNT).any(|slot| flight_select_button(slot) == selector) {
            self.lock().selections += 1;
        }
        Ok(())
    }

    async fn select(&self, selector: &str, value: &str) -> DriverResult<()> {
        self.record(DriverCall::Select {
            selector: selector.to_string(),
            value: value.to_string(),
        });
        self.check(selector)
    }

    async fn type_text(&self, selector: &str, text: &str) -> DriverResult<()> {
        self.record(DriverCall::TypeText {
            selector: selector.to_string(),
            text: text.to_string(),
        });
        self.check(selector)
    }

    async fn clear_editable_flag(&self, selector: &str) -> DriverResult<()> {
        self.record(DriverCall::ClearEditableFlag(selector.to_string()));
        self.check(selector)
    }

    async fn delete_character(&self) -> DriverResult<()> {
        self.record(DriverCall::DeleteCharacter);
        Ok(())
    }

    async fn type_keys(&self, text: &str) -> DriverResult<()> {
        self.record(DriverCall::TypeKeys(text.to_string()));
        Ok(())
    }

    async fn set_hidden_value(&self, selector: &str, value: &str) -> DriverResult<()> {
        self.record(DriverCall::SetHiddenValue {
            selector: selector.to_string(),
            value: value.to_string(),
        });
        self.check(selector)
    }

    async fn query_attribute(
        &self,
        selector: &str,
        attribute: &str,
    ) -> DriverResult<Option<String>> {
        self.record(DriverCall::QueryAttribute {
            selector: selector.to_string(),
            attribute: attribute.to_string(),
        });
        self.check(selector)?;
        if attribute != DEPARTURE_ATTRIBUTE {
            return Ok(None);
        }
        Ok(self.listing_value(selector))
    }

    async fn wait_for_element(&self, selector: &str, timeout: Duration) -> DriverResult<()> {
        self.record(DriverCall::WaitForElement(selector.to_string()));
        if self.failing.contains(selector) {
            return Err(DriverError::Timeout {
                selector: selector.to_string(),
                waited: timeout,
            });
        }
        Ok(())
    }

    async fn wait_for_navigation(&self, _timeout: Duration) -> DriverResult<()> {
        self.record(DriverCall::WaitForNavigation);
        Ok(())
    }

    async fn wait_fixed_delay(&self, delay: Duration) -> DriverResult<()> {
        self.record(DriverCall::WaitFixedDelay(delay));
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> DriverResult<()> {
        self.record(DriverCall::Evaluate(script.to_string()));
        Ok(())
    }
}
