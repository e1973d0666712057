//! Ride booking error types.

use serde_json::Value;

use crate::namma_yatri::UpstreamError;

/// Why a ride operation failed.
#[derive(Debug, thiserror::Error)]
pub enum RideError {
    /// The aggregator call failed (unreachable, error status, bad body).
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// The simulated backend has no booking with that id.
    #[error("Booking not found")]
    BookingNotFound,

    /// A search came back without any estimates.
    #[error("No rides available")]
    NoRidesAvailable,

    /// Polling gave up before a driver was assigned.
    #[error("Timeout waiting for driver assignment")]
    PollTimeout,
}

impl RideError {
    /// The value placed in the `error` field of a failure envelope.
    pub fn payload(&self) -> Value {
        match self {
            RideError::Upstream(e) => e.payload(),
            other => Value::String(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_messages() {
        assert_eq!(RideError::BookingNotFound.to_string(), "Booking not found");
        assert_eq!(RideError::NoRidesAvailable.to_string(), "No rides available");
        assert_eq!(
            RideError::PollTimeout.payload(),
            Value::String("Timeout waiting for driver assignment".into())
        );
    }

    #[test]
    fn upstream_payload_passes_through() {
        let body = serde_json::json!({"errorCode": "SEARCH_REQUEST_EXPIRED"});
        let err = RideError::from(UpstreamError::Api {
            status: 400,
            body: body.clone(),
        });
        assert_eq!(err.payload(), body);
    }
}
