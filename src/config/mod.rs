//! Configuration module for Flight-Booker
//!
//! This module handles loading, parsing, and validating the TOML booking file.
//! Everything the workflow needs (trip times, passengers, contact, payment and
//! browser settings) is read once and passed around as an immutable value.
//!
//! # Example
//!
//! ```no_run
//! use flight_booker::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("booking.toml")).unwrap();
//! println!("Booking for {} passengers", config.passengers.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BookingConfig, BrowserConfig, CardType, ContactConfig, GatewayConfig, Passenger,
    PaymentConfig, TripConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
