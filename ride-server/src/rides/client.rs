//! Ride booking client.
//!
//! Wraps the Namma Yatri API with a simulated fallback. The client starts
//! live; the first time an OTP dispatch or ride search finds the aggregator
//! unreachable it switches to simulation for the rest of its life. Before
//! that, calls addressed to a simulated identifier are still served by the
//! simulation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::clock::Clock;
use crate::domain::{
    BookingId, BookingStatus, Estimate, EstimateId, Location, SearchId, SessionToken,
};
use crate::namma_yatri::{
    NammaYatriClient, SearchAccepted, SearchResults, SelectionAccepted, StatusSnapshot, decode,
};

use super::error::RideError;
use super::reply::{
    BookingPlaced, BookingState, Cancellation, EstimateList, OtpSent, OtpVerified, Places,
    SearchStarted,
};
use super::simulation::{
    SIMULATED_TOKEN, SimulatedBackend, demo_profile, otp_challenge, simulated_status,
    status_payload,
};

/// Ride booking client for one rider.
///
/// Holds the live/simulated mode flag and the simulated searches and
/// bookings. Clients share nothing with each other.
pub struct RideClient {
    upstream: NammaYatriClient,
    clock: Arc<dyn Clock>,
    simulated: AtomicBool,
    sim: RwLock<SimulatedBackend>,
}

impl RideClient {
    /// Create a client in live mode.
    pub fn new(upstream: NammaYatriClient, clock: Arc<dyn Clock>) -> Self {
        Self {
            upstream,
            clock,
            simulated: AtomicBool::new(false),
            sim: RwLock::new(SimulatedBackend::new()),
        }
    }

    /// Whether the client has switched to simulation.
    pub fn is_simulated(&self) -> bool {
        self.simulated.load(Ordering::SeqCst)
    }

    /// Switch to simulation for good.
    fn enter_simulation(&self) {
        if !self.simulated.swap(true, Ordering::SeqCst) {
            info!(
                base_url = self.upstream.base_url(),
                "switched to simulation mode"
            );
        }
    }

    /// Request an OTP for a mobile number.
    ///
    /// If the aggregator can't be reached the client switches to simulation
    /// and reports a simulated dispatch instead of failing.
    pub async fn send_otp(
        &self,
        mobile_number: &str,
        country_code: &str,
    ) -> Result<OtpSent, RideError> {
        if self.is_simulated() {
            return Ok(self.simulated_otp());
        }

        match self.upstream.get_token(mobile_number, country_code).await {
            Ok(data) => Ok(OtpSent {
                simulated: false,
                data,
            }),
            Err(e) if e.is_unreachable() => {
                warn!(error = %e, "Namma Yatri API unreachable, using simulation");
                self.enter_simulation();
                Ok(self.simulated_otp())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn simulated_otp(&self) -> OtpSent {
        OtpSent {
            simulated: true,
            data: otp_challenge(self.clock.now()),
        }
    }

    /// Exchange an OTP for a session credential.
    ///
    /// In simulation any OTP is accepted.
    pub async fn verify_otp(&self, otp: &str, device_token: &str) -> Result<OtpVerified, RideError> {
        if self.is_simulated() {
            return Ok(OtpVerified {
                simulated: true,
                token: Some(SessionToken::new(SIMULATED_TOKEN)),
                data: demo_profile(),
            });
        }

        let data = self.upstream.verify_token(otp, device_token).await?;
        let token = data
            .get("token")
            .and_then(Value::as_str)
            .map(SessionToken::new);

        Ok(OtpVerified {
            simulated: false,
            token,
            data,
        })
    }

    /// Place suggestions near a position. Always live.
    pub async fn autocomplete_location(
        &self,
        search_text: &str,
        lat: f64,
        lon: f64,
        token: Option<&SessionToken>,
    ) -> Result<Places, RideError> {
        let data = self
            .upstream
            .autocomplete(search_text, lat, lon, token)
            .await?;
        Ok(Places { data })
    }

    /// Start a ride search.
    ///
    /// Pickup addresses containing the demo marker are always simulated.
    /// If the aggregator is unreachable the client switches to simulation
    /// and serves this search from it.
    pub async fn search_rides(
        &self,
        pickup: &Location,
        dropoff: &Location,
        token: Option<&SessionToken>,
    ) -> Result<SearchStarted, RideError> {
        if self.is_simulated() || pickup.is_demo() {
            return Ok(self.simulated_search(pickup, dropoff).await);
        }

        match self.upstream.ride_search(pickup, dropoff, token).await {
            Ok(data) => {
                let accepted: SearchAccepted = decode(&data)?;
                Ok(SearchStarted {
                    simulated: false,
                    search_id: SearchId::Live(accepted.search_id),
                    data: Some(data),
                })
            }
            Err(e) if e.is_unreachable() => {
                warn!(error = %e, "Namma Yatri API unreachable, using simulation");
                self.enter_simulation();
                Ok(self.simulated_search(pickup, dropoff).await)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn simulated_search(&self, pickup: &Location, dropoff: &Location) -> SearchStarted {
        let now = self.clock.now();
        let mut sim = self.sim.write().await;
        let search_id =
            sim.record_search(pickup.clone(), dropoff.clone(), now, &mut rand::thread_rng());

        SearchStarted {
            simulated: true,
            search_id,
            data: None,
        }
    }

    /// Estimates collected for a search.
    pub async fn get_estimates(
        &self,
        search_id: &SearchId,
        token: Option<&SessionToken>,
    ) -> Result<EstimateList, RideError> {
        if self.is_simulated() || search_id.is_simulated() {
            let sim = self.sim.read().await;
            let estimates = sim.estimates_for(search_id, &mut rand::thread_rng());
            return Ok(EstimateList {
                simulated: true,
                estimates,
                data: None,
            });
        }

        let data = self.upstream.search_results(search_id, token).await?;
        let results: SearchResults = decode(&data)?;
        let estimates = results
            .estimates
            .unwrap_or_default()
            .iter()
            .filter_map(|raw| match decode::<Estimate>(raw) {
                Ok(estimate) => Some(estimate),
                Err(e) => {
                    warn!(%search_id, error = %e, "skipping unreadable estimate");
                    None
                }
            })
            .collect();

        Ok(EstimateList {
            simulated: false,
            estimates,
            data: Some(data),
        })
    }

    /// Accept an estimate, optionally adding a tip for the driver.
    pub async fn select_estimate(
        &self,
        estimate_id: &EstimateId,
        extra_fee: f64,
        token: Option<&SessionToken>,
    ) -> Result<BookingPlaced, RideError> {
        if self.is_simulated() || estimate_id.is_simulated() {
            let now = self.clock.now();
            let mut sim = self.sim.write().await;
            let booking_id = sim.place_booking(estimate_id, now, &mut rand::thread_rng());
            return Ok(BookingPlaced {
                simulated: true,
                booking_id,
                data: None,
            });
        }

        let data = self
            .upstream
            .select_estimate(estimate_id, extra_fee, token)
            .await?;
        let accepted: SelectionAccepted = decode(&data)?;

        Ok(BookingPlaced {
            simulated: false,
            booking_id: BookingId::Live(accepted.booking_id),
            data: Some(data),
        })
    }

    /// Current status of a booking.
    ///
    /// Simulated bookings report `TRIP_ASSIGNED`, with a driver, once their
    /// assignment time has passed.
    pub async fn get_booking_status(
        &self,
        booking_id: &BookingId,
        token: Option<&SessionToken>,
    ) -> Result<BookingState, RideError> {
        if self.is_simulated() || booking_id.is_simulated() {
            let now = self.clock.now();
            let sim = self.sim.read().await;
            let booking = sim.booking(booking_id).ok_or(RideError::BookingNotFound)?;
            let status = simulated_status(booking, now);
            return Ok(BookingState {
                simulated: true,
                status,
                data: status_payload(booking, status),
            });
        }

        let data = self.upstream.fetch_status(booking_id, token).await?;
        let snapshot: StatusSnapshot = decode(&data)?;

        Ok(BookingState {
            simulated: false,
            status: snapshot.status.unwrap_or(BookingStatus::Unknown),
            data,
        })
    }

    /// Cancel a booking. Cancelling a simulated booking twice is fine.
    pub async fn cancel_booking(
        &self,
        booking_id: &BookingId,
        reason: &str,
        token: Option<&SessionToken>,
    ) -> Result<Cancellation, RideError> {
        if self.is_simulated() || booking_id.is_simulated() {
            self.sim.write().await.cancel(booking_id);
            return Ok(Cancellation {
                simulated: true,
                data: None,
            });
        }

        let data = self
            .upstream
            .cancel_booking(booking_id, reason, token)
            .await?;

        Ok(Cancellation {
            simulated: false,
            data: Some(data),
        })
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
