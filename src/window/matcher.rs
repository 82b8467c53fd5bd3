use crate::booking::TripLeg;
use crate::config::TripConfig;
use crate::window::reference_timezone;
use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, TimeZone};

/// Offset-less layouts seen in listing attributes, tried in order
const CIVIL_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Open acceptance interval around an expected instant
///
/// Both bounds are exclusive: a listing exactly one hour before or after the
/// center is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    center: DateTime<FixedOffset>,
    radius: Duration,
}

impl TimeWindow {
    /// Builds the one-hour window around `expected`, normalized to the
    /// reference timezone
    pub fn around(expected: DateTime<FixedOffset>) -> Self {
        Self {
            center: expected.with_timezone(&reference_timezone()),
            radius: Duration::hours(1),
        }
    }

    pub fn center(&self) -> DateTime<FixedOffset> {
        self.center
    }

    /// Exclusive lower bound
    pub fn start(&self) -> DateTime<FixedOffset> {
        self.center - self.radius
    }

    /// Exclusive upper bound
    pub fn end(&self) -> DateTime<FixedOffset> {
        self.center + self.radius
    }

    /// Returns true if `candidate` lies strictly inside the window
    pub fn contains(&self, candidate: DateTime<FixedOffset>) -> bool {
        let candidate = candidate.with_timezone(&reference_timezone());
        self.start() < candidate && candidate < self.end()
    }
}

/// Decides whether a listed departure satisfies the expected time of a leg
#[derive(Debug, Clone, Copy)]
pub struct TimeWindowMatcher {
    outbound: TimeWindow,
    inbound: TimeWindow,
}

impl TimeWindowMatcher {
    /// Creates a matcher for the trip's expected departure and arrival
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::DateTime;
    /// use flight_booker::config::TripConfig;
    /// use flight_booker::{TimeWindowMatcher, TripLeg};
    ///
    /// let trip = TripConfig {
    ///     expected_departure: DateTime::parse_from_rfc3339("2023-10-05T08:00:00+08:00").unwrap(),
    ///     expected_arrival: DateTime::parse_from_rfc3339("2023-10-10T18:00:00+08:00").unwrap(),
    /// };
    /// let matcher = TimeWindowMatcher::new(&trip);
    ///
    /// // 00:30 UTC is 08:30 in Taipei
    /// let listed = DateTime::parse_from_rfc3339("2023-10-05T00:30:00Z").unwrap();
    /// assert!(matcher.matches(TripLeg::Outbound, listed));
    /// assert!(!matcher.matches(TripLeg::Return, listed));
    /// ```
    pub fn new(trip: &TripConfig) -> Self {
        Self {
            outbound: TimeWindow::around(trip.expected_departure),
            inbound: TimeWindow::around(trip.expected_arrival),
        }
    }

    /// Returns the acceptance window for `leg`
    pub fn window(&self, leg: TripLeg) -> &TimeWindow {
        match leg {
            TripLeg::Outbound => &self.outbound,
            TripLeg::Return => &self.inbound,
        }
    }

    /// Returns true if `candidate` is strictly within one hour of the leg's
    /// expected time
    pub fn matches(&self, leg: TripLeg, candidate: DateTime<FixedOffset>) -> bool {
        self.window(leg).contains(candidate)
    }
}

/// Parses the departure instant encoded on a flight listing
///
/// RFC 3339 values keep their own offset. Civil date-times without an offset
/// are taken to be reference-timezone local time, which is how the booking
/// site renders its schedule.
///
/// # Returns
///
/// * `Some(instant)` - normalized to the reference timezone
/// * `None` - the value is not a recognizable date-time
pub fn parse_listing_instant(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    let zone = reference_timezone();

    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&zone));
    }

    CIVIL_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .and_then(|civil| zone.from_local_datetime(&civil).single())
}
