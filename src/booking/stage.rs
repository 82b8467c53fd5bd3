/// Workflow stage definitions
///
/// The booking flow is a fixed, linear sequence; this module names each step.
use std::fmt;

/// A step of the booking workflow, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WorkflowStage {
    // ===== Search form =====
    /// Load the booking widget page
    OpenGateway,

    /// Close the cookie policy banner
    DismissConsent,

    /// Switch the widget to round trip
    SelectRoundTrip,

    /// Choose the departure airport
    SelectOrigin,

    /// Enter the outbound and return dates
    SelectDateRange,

    /// Set the number of travelers
    SelectPassengerCount,

    /// Submit the search and wait for results
    Search,

    // ===== Flight choice =====
    /// Pick the outbound flight and fare quantity
    SelectOutboundFlight,

    /// Pick the return flight
    SelectInboundFlight,

    // ===== Checkout =====
    /// Accept the terms of carriage
    AcceptTerms,

    /// Fill one form row per passenger
    FillPassengers,

    /// Enter the contact phone and email
    FillContact,

    /// Enter card details (never submitted)
    FillPayment,
}

impl WorkflowStage {
    /// Number of stages in a complete run
    pub const COUNT: usize = 13;

    /// Returns all stages in execution order
    pub fn all_stages() -> [Self; Self::COUNT] {
        [
            Self::OpenGateway,
            Self::DismissConsent,
            Self::SelectRoundTrip,
            Self::SelectOrigin,
            Self::SelectDateRange,
            Self::SelectPassengerCount,
            Self::Search,
            Self::SelectOutboundFlight,
            Self::SelectInboundFlight,
            Self::AcceptTerms,
            Self::FillPassengers,
            Self::FillContact,
            Self::FillPayment,
        ]
    }

    /// One-based position in the workflow
    pub fn ordinal(&self) -> usize {
        *self as usize + 1
    }

    /// Returns true for the last stage of the workflow
    pub fn is_final(&self) -> bool {
        matches!(self, Self::FillPayment)
    }

    /// Short name used in logs and error messages
    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenGateway => "open_gateway",
            Self::DismissConsent => "dismiss_consent",
            Self::SelectRoundTrip => "select_round_trip",
            Self::SelectOrigin => "select_origin",
            Self::SelectDateRange => "select_date_range",
            Self::SelectPassengerCount => "select_passenger_count",
            Self::Search => "search",
            Self::SelectOutboundFlight => "select_outbound_flight",
            Self::SelectInboundFlight => "select_inbound_flight",
            Self::AcceptTerms => "accept_terms",
            Self::FillPassengers => "fill_passengers",
            Self::FillContact => "fill_contact",
            Self::FillPayment => "fill_payment",
        }
    }
}

impl fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
