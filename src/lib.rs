//! Flight-Booker: an unattended round-trip booking runner
//!
//! This crate drives a fixed booking flow on an airline website: it picks the
//! first outbound and return flights whose departure falls inside a one-hour
//! window around the expected times, then fills passenger, contact and payment
//! details. The payment step is filled but never submitted.

pub mod booking;
pub mod config;
pub mod page;
pub mod window;

use thiserror::Error;

/// Main error type for Flight-Booker operations
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("No matching {leg} time found")]
    NoMatchingFlight { leg: booking::TripLeg },

    #[error("Stage '{stage}' failed: {source}")]
    Interaction {
        stage: booking::WorkflowStage,
        #[source]
        source: page::DriverError,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Browser error: {0}")]
    Driver(#[from] page::DriverError),

    #[error("Interrupted by user")]
    Interrupted,
}

impl BookingError {
    /// Returns the stage the run was aborted in, if the error came from one
    pub fn stage(&self) -> Option<booking::WorkflowStage> {
        match self {
            Self::NoMatchingFlight { leg } => Some(leg.selection_stage()),
            Self::Interaction { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Unknown card type code {0} (expected 1-4)")]
    UnknownCardType(u8),
}

/// Result type alias for Flight-Booker operations
pub type Result<T> = std::result::Result<T, BookingError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use booking::{BookingReport, TripLeg, WorkflowSequencer, WorkflowStage};
pub use config::BookingConfig;
pub use page::{DriverError, PageDriver};
pub use window::{format_date_range, TimeWindow, TimeWindowMatcher};
