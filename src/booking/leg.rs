use crate::booking::WorkflowStage;
use std::fmt;

/// One direction of the round trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TripLeg {
    /// Outbound flight, matched against the expected departure
    Outbound,
    /// Return flight, matched against the expected arrival
    Return,
}

impl TripLeg {
    /// Human-readable label used in failure messages
    pub fn label(&self) -> &'static str {
        match self {
            Self::Outbound => "departure",
            Self::Return => "return",
        }
    }

    /// Stage in which this leg's flight is chosen
    pub fn selection_stage(&self) -> WorkflowStage {
        match self {
            Self::Outbound => WorkflowStage::SelectOutboundFlight,
            Self::Return => WorkflowStage::SelectInboundFlight,
        }
    }
}

impl fmt::Display for TripLeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
