use crate::window::reference_timezone;
use chrono::{DateTime, TimeZone};

/// Formats the round-trip range typed into the search form
///
/// Both instants are shifted to the reference timezone before the calendar
/// date is taken, so a late-evening UTC departure lands on the next day.
///
/// # Example
///
/// ```
/// use chrono::DateTime;
/// use flight_booker::format_date_range;
///
/// let dep = DateTime::parse_from_rfc3339("2023-10-05T08:00:00+08:00").unwrap();
/// let arr = DateTime::parse_from_rfc3339("2023-10-10T18:00:00+08:00").unwrap();
/// assert_eq!(format_date_range(&dep, &arr), "2023/10/05-2023/10/10");
/// ```
pub fn format_date_range<A, B>(departure: &DateTime<A>, arrival: &DateTime<B>) -> String
where
    A: TimeZone,
    B: TimeZone,
{
    let zone = reference_timezone();
    let start = departure.with_timezone(&zone).format("%Y/%m/%d");
    let end = arrival.with_timezone(&zone).format("%Y/%m/%d");
    format!("{}-{}", start, end)
}
