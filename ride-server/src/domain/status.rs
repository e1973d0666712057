//! Booking status lifecycle.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Status of a booking.
///
/// The lifecycle is `SEARCHING → TRIP_ASSIGNED → INPROGRESS → COMPLETED`,
/// with `CANCELLED` reachable from any state that is not yet terminal.
/// The simulated backend only ever produces `SEARCHING` and `TRIP_ASSIGNED`;
/// the later states come from the live aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Searching,
    TripAssigned,
    #[serde(rename = "INPROGRESS")]
    InProgress,
    Completed,
    Cancelled,
    /// A status the aggregator reported that we don't model.
    #[serde(other)]
    Unknown,
}

impl BookingStatus {
    /// Returns the wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Searching => "SEARCHING",
            BookingStatus::TripAssigned => "TRIP_ASSIGNED",
            BookingStatus::InProgress => "INPROGRESS",
            BookingStatus::Completed => "COMPLETED",
            BookingStatus::Cancelled => "CANCELLED",
            BookingStatus::Unknown => "UNKNOWN",
        }
    }

    /// No further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    /// A driver has been found, or the booking has otherwise stopped
    /// waiting for one. Polling ends on these.
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            BookingStatus::TripAssigned
                | BookingStatus::InProgress
                | BookingStatus::Completed
                | BookingStatus::Cancelled
        )
    }

    /// Position along the forward path, `None` for states off that path.
    fn rank(&self) -> Option<u8> {
        match self {
            BookingStatus::Searching => Some(0),
            BookingStatus::TripAssigned => Some(1),
            BookingStatus::InProgress => Some(2),
            BookingStatus::Completed => Some(3),
            BookingStatus::Cancelled | BookingStatus::Unknown => None,
        }
    }

    /// Whether moving from `self` to `next` respects the lifecycle.
    ///
    /// Staying in the same state is allowed (a poll may observe it twice).
    /// Anything involving `Unknown` is allowed since we can't judge it.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        if *self == next {
            return true;
        }
        if self.is_terminal() {
            return false;
        }
        if *self == BookingStatus::Unknown || next == BookingStatus::Unknown {
            return true;
        }
        if next == BookingStatus::Cancelled {
            return true;
        }
        match (self.rank(), next.rank()) {
            (Some(from), Some(to)) => to > from,
            _ => false,
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
