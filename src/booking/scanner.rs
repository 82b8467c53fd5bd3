//! Flight candidate scanner
//!
//! A results page shows a fixed number of listing slots. The scanner walks
//! them in order and commits to the first one departing inside the leg's
//! acceptance window. It does not wait or retry: the caller must have waited
//! for the results view before scanning.

use crate::booking::{StageContext, TripLeg};
use crate::page::selectors::{flight_listing, DEPARTURE_ATTRIBUTE, FLIGHT_SLOT_COUNT};
use crate::page::PageDriver;
use crate::window::{parse_listing_instant, TimeWindowMatcher};
use crate::BookingError;
use chrono::{DateTime, FixedOffset};

/// A listing slot as read from the results page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlightCandidate {
    /// Zero-based position in the results list
    pub slot: usize,
    /// Listed departure; `None` when the slot holds no usable offer
    pub departure: Option<DateTime<FixedOffset>>,
}

/// Selects a flight listing for a trip leg
pub struct CandidateScanner<'a, D: PageDriver + ?Sized> {
    driver: &'a D,
    matcher: &'a TimeWindowMatcher,
}

impl<'a, D: PageDriver + ?Sized> CandidateScanner<'a, D> {
    pub fn new(driver: &'a D, matcher: &'a TimeWindowMatcher) -> Self {
        Self { driver, matcher }
    }

    /// Reads the listing in `slot`
    ///
    /// A departure value that cannot be parsed is logged and treated as an
    /// empty slot, so it can never be selected.
    pub async fn read_candidate(&self, leg: TripLeg, slot: usize) -> crate::Result<FlightCandidate> {
        let raw = self
            .driver
            .query_attribute(&flight_listing(slot), DEPARTURE_ATTRIBUTE)
            .await
            .during(leg.selection_stage())?;

        let departure = raw.as_deref().and_then(|value| {
            let parsed = parse_listing_instant(value);
            if parsed.is_none() {
                tracing::warn!("Slot {} has an unreadable departure time: {:?}", slot, value);
            }
            parsed
        });

        Ok(FlightCandidate { slot, departure })
    }

    /// Returns the first slot whose departure matches the leg's window
    ///
    /// # Returns
    ///
    /// * `Ok(slot)` - lowest-index matching slot
    /// * `Err(BookingError::NoMatchingFlight)` - all slots were empty or outside the window
    /// * `Err(BookingError::Interaction)` - a slot could not be read
    pub async fn select_candidate(&self, leg: TripLeg) -> crate::Result<usize> {
        let window = self.matcher.window(leg);
        tracing::debug!(
            "Scanning {} flights between {} and {} (exclusive)",
            leg,
            window.start(),
            window.end()
        );

        for slot in 0..FLIGHT_SLOT_COUNT {
            let candidate = self.read_candidate(leg, slot).await?;
            match candidate.departure {
                Some(departure) if self.matcher.matches(leg, departure) => {
                    tracing::info!("Selected {} flight in slot {} ({})", leg, slot, departure);
                    return Ok(slot);
                }
                Some(departure) => {
                    tracing::debug!("Slot {}: {} is outside the window", slot, departure);
                }
                None => {
                    tracing::debug!("Slot {}: no offer", slot);
                }
            }
        }

        Err(BookingError::NoMatchingFlight { leg })
    }
}
