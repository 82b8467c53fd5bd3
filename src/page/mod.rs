//! Page interaction module
//!
//! # Components
//!
//! - `PageDriver`: capability trait the booking workflow is written against
//! - `ChromiumDriver`: drives a local Chromium over the DevTools protocol
//! - `ScriptedDriver`: records interactions and serves canned listings
//! - `selectors`: element ids of the booking site

mod chromium;
mod driver;
mod scripted;
pub mod selectors;

pub use chromium::ChromiumDriver;
pub use driver::{DriverError, DriverResult, PageDriver};
pub use scripted::{DriverCall, ScriptedDriver};
