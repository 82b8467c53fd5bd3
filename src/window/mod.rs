//! Time window module
//!
//! Flight listings are compared against the expected times in a single
//! reference timezone (Asia/Taipei). This module owns that normalization:
//!
//! - `TimeWindow`: open one-hour-radius interval around an expected instant
//! - `TimeWindowMatcher`: resolves the window for a trip leg and tests listings
//! - `format_date_range`: renders the round-trip range typed into the search form

mod format;
mod matcher;

pub use format::format_date_range;
pub use matcher::{parse_listing_instant, TimeWindow, TimeWindowMatcher};

use chrono::FixedOffset;

/// Name of the zone every comparison and date is expressed in
pub const REFERENCE_TIMEZONE: &str = "Asia/Taipei";

/// Returns the reference timezone offset
///
/// Asia/Taipei has observed UTC+08:00 without daylight saving since 1980, so
/// a fixed offset is exact for any bookable date.
pub fn reference_timezone() -> FixedOffset {
    FixedOffset::east_opt(8 * 3600).expect("UTC+08:00 is a valid offset")
}
