//! Multi-step helpers built on the single-call operations.

use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::{BookingId, BookingStatus, Location, SessionToken};

use super::client::RideClient;
use super::error::RideError;
use super::reply::{BookingPlaced, BookingState};

impl RideClient {
    /// Search, give drivers `wait` to respond, then book the first estimate.
    ///
    /// A failed search is returned as-is. No estimates, or a failure while
    /// fetching them, is reported as [`RideError::NoRidesAvailable`].
    pub async fn book_ride_complete(
        &self,
        pickup: &Location,
        dropoff: &Location,
        wait: Duration,
        token: Option<&SessionToken>,
    ) -> Result<BookingPlaced, RideError> {
        let search = self.search_rides(pickup, dropoff, token).await?;

        tokio::time::sleep(wait).await;

        let estimates = match self.get_estimates(&search.search_id, token).await {
            Ok(list) => list.estimates,
            Err(e) => {
                debug!(search_id = %search.search_id, error = %e, "could not fetch estimates");
                Vec::new()
            }
        };

        // First offer wins; no ranking
        let first = estimates
            .into_iter()
            .next()
            .ok_or(RideError::NoRidesAvailable)?;

        self.select_estimate(&first.estimate_id, 0.0, token).await
    }

    /// Check a booking's status up to `max_attempts` times, `interval` apart,
    /// until a driver is assigned or the booking otherwise settles.
    ///
    /// A failed status call ends polling with that failure.
    pub async fn poll_booking_status(
        &self,
        booking_id: &BookingId,
        max_attempts: u32,
        interval: Duration,
        token: Option<&SessionToken>,
    ) -> Result<BookingState, RideError> {
        let mut last_seen: Option<BookingStatus> = None;

        for attempt in 1..=max_attempts {
            let state = self.get_booking_status(booking_id, token).await?;

            if let Some(prev) = last_seen {
                if !prev.can_transition_to(state.status) {
                    warn!(%booking_id, from = %prev, to = %state.status, "booking status went backwards");
                }
            }

            if state.status.is_settled() {
                debug!(%booking_id, attempt, status = %state.status, "booking settled");
                return Ok(state);
            }

            last_seen = Some(state.status);
            if attempt < max_attempts {
                tokio::time::sleep(interval).await;
            }
        }

        Err(RideError::PollTimeout)
    }
}
