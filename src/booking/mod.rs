//! Booking workflow module
//!
//! This module contains the booking logic layered on top of the page driver:
//! - `TripLeg`: outbound or return direction
//! - `WorkflowStage`: the fixed sequence of booking steps
//! - `CandidateScanner`: picks the first listing inside a leg's time window
//! - `WorkflowSequencer`: runs every stage in order, stopping at the first failure

mod leg;
mod scanner;
mod sequencer;
mod stage;

pub use leg::TripLeg;
pub use scanner::{CandidateScanner, FlightCandidate};
pub use sequencer::{BookingReport, WorkflowSequencer};
pub use stage::WorkflowStage;

use crate::page::DriverResult;
use crate::BookingError;

/// Attaches the current stage to a page driver failure
pub(crate) trait StageContext<T> {
    fn during(self, stage: WorkflowStage) -> crate::Result<T>;
}

impl<T> StageContext<T> for DriverResult<T> {
    fn during(self, stage: WorkflowStage) -> crate::Result<T> {
        self.map_err(|source| BookingError::Interaction { stage, source })
    }
}
