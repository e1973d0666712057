//! In-memory stand-in for the aggregator.
//!
//! Used when the aggregator is unreachable or the demo frontend asks for it.
//! Searches and bookings live in per-client maps; booking status is derived
//! from the clock at read time by [`simulated_status`], so there is no
//! background timer to manage.

use std::collections::HashMap;
use std::ops::Range;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::{
    BookingId, BookingStatus, Coordinates, Estimate, EstimateId, FareRange, Location, SearchId,
    VehicleVariant,
};

/// Token handed out by simulated OTP verification.
pub const SIMULATED_TOKEN: &str = "sim_token_xyz_123";

/// OTP attempts reported by a simulated dispatch.
pub const OTP_ATTEMPTS: u32 = 3;

/// Milliseconds after booking before a simulated driver is assigned.
pub const ASSIGNMENT_DELAY_MS: i64 = 8000;

const BASE_FARE: Range<u32> = 150..250;
const AUTO_DURATION_SECS: Range<u32> = 900..1200;
const SEDAN_DURATION_SECS: f64 = 850.0;
const SEDAN_FARE_MULTIPLIER: f64 = 1.8;
const DISTANCE_M: f64 = 5400.0;
const ID_SUFFIX_LEN: usize = 6;

const DRIVER_POSITION: Coordinates = Coordinates {
    lat: 12.9720,
    lon: 77.5950,
};

/// A search recorded by the simulation.
#[derive(Debug, Clone)]
pub struct StoredSearch {
    pub pickup: Location,
    pub dropoff: Location,
    pub created_at: DateTime<Utc>,
}

/// A booking held by the simulation.
#[derive(Debug, Clone)]
pub struct SimulatedBooking {
    pub id: BookingId,
    /// Status at creation. The effective status comes from [`simulated_status`].
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub driver_assigned_at: DateTime<Utc>,
    pub vehicle_variant: VehicleVariant,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Driver {
    name: &'static str,
    mobile_number: &'static str,
    rating: f64,
}

#[derive(Debug, Serialize)]
struct AssignedVehicle {
    model: &'static str,
    variant: VehicleVariant,
    color: &'static str,
    number: &'static str,
}

/// Simulated searches and bookings for one client.
#[derive(Debug, Default)]
pub struct SimulatedBackend {
    searches: HashMap<SearchId, StoredSearch>,
    bookings: HashMap<BookingId, SimulatedBooking>,
}

impl SimulatedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a search and return its new identifier.
    pub fn record_search<R: Rng>(
        &mut self,
        pickup: Location,
        dropoff: Location,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> SearchId {
        let id = SearchId::Simulated(format!("sim_search_{}", random_suffix(rng)));
        self.searches.insert(
            id.clone(),
            StoredSearch {
                pickup,
                dropoff,
                created_at: now,
            },
        );
        id
    }

    pub fn search(&self, id: &SearchId) -> Option<&StoredSearch> {
        self.searches.get(id)
    }

    /// Two estimates for a search: an auto-rickshaw at a random base fare
    /// and a sedan at 1.8× that.
    ///
    /// An unknown search id is not an error; the estimates are made up
    /// either way.
    pub fn estimates_for<R: Rng>(&self, search_id: &SearchId, rng: &mut R) -> Vec<Estimate> {
        if self.search(search_id).is_none() {
            tracing::debug!(%search_id, "no stored search, generating estimates anyway");
        }

        let base = rng.gen_range(BASE_FARE);
        let base_fare = f64::from(base);

        vec![
            Estimate {
                estimate_id: EstimateId::Simulated(format!("sim_est_auto_{search_id}")),
                vehicle_variant: VehicleVariant::AutoRickshaw,
                estimated_fare: base_fare,
                estimated_duration: Some(f64::from(rng.gen_range(AUTO_DURATION_SECS))),
                estimated_distance: Some(DISTANCE_M),
                total_fare_range: Some(FareRange {
                    min_fare: base_fare - 5.0,
                    max_fare: base_fare + 10.0,
                }),
            },
            Estimate {
                estimate_id: EstimateId::Simulated(format!("sim_est_sedan_{search_id}")),
                vehicle_variant: VehicleVariant::Sedan,
                estimated_fare: base_fare * SEDAN_FARE_MULTIPLIER,
                estimated_duration: Some(SEDAN_DURATION_SECS),
                estimated_distance: Some(DISTANCE_M),
                total_fare_range: None,
            },
        ]
    }

    /// Book an estimate. A driver is assigned [`ASSIGNMENT_DELAY_MS`] later.
    pub fn place_booking<R: Rng>(
        &mut self,
        estimate_id: &EstimateId,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> BookingId {
        let id = BookingId::Simulated(format!("sim_book_{}", random_suffix(rng)));
        let booking = SimulatedBooking {
            id: id.clone(),
            status: BookingStatus::Searching,
            created_at: now,
            driver_assigned_at: now + Duration::milliseconds(ASSIGNMENT_DELAY_MS),
            vehicle_variant: variant_for_estimate(estimate_id),
        };
        self.bookings.insert(id.clone(), booking);
        id
    }

    pub fn booking(&self, id: &BookingId) -> Option<&SimulatedBooking> {
        self.bookings.get(id)
    }

    /// Drop a booking. Unknown ids are ignored.
    pub fn cancel(&mut self, id: &BookingId) -> Option<SimulatedBooking> {
        self.bookings.remove(id)
    }

    #[cfg(test)]
    pub fn search_count(&self) -> usize {
        self.searches.len()
    }

    #[cfg(test)]
    pub fn booking_count(&self) -> usize {
        self.bookings.len()
    }
}

/// Effective status of a simulated booking at `now`.
///
/// `SEARCHING` up to and including the assignment instant, `TRIP_ASSIGNED`
/// strictly after it.
pub fn simulated_status(booking: &SimulatedBooking, now: DateTime<Utc>) -> BookingStatus {
    if now > booking.driver_assigned_at {
        BookingStatus::TripAssigned
    } else {
        booking.status
    }
}

/// The `data` payload reported alongside a simulated status.
pub fn status_payload(booking: &SimulatedBooking, status: BookingStatus) -> Value {
    if status != BookingStatus::TripAssigned {
        return json!({ "status": status });
    }

    let driver = Driver {
        name: "Ravi Kumar",
        mobile_number: "+919876543211",
        rating: 4.8,
    };
    let vehicle = AssignedVehicle {
        model: "Bajaj RE",
        variant: booking.vehicle_variant,
        color: "Yellow",
        number: "KA01AB1234",
    };

    json!({
        "status": status,
        "driver": driver,
        "vehicle": vehicle,
        "driverLocation": DRIVER_POSITION,
    })
}

/// `{authId, attempts}` for a simulated OTP dispatch.
pub fn otp_challenge(now: DateTime<Utc>) -> Value {
    json!({
        "authId": format!("sim_auth_{}", now.timestamp_millis()),
        "attempts": OTP_ATTEMPTS,
    })
}

/// Profile returned by simulated OTP verification.
pub fn demo_profile() -> Value {
    json!({
        "person": {
            "id": "sim_user_1",
            "firstName": "Demo User",
            "mobileNumber": "+918420099237",
        }
    })
}

/// Auto-rickshaw when the estimate id mentions "auto", sedan otherwise.
fn variant_for_estimate(estimate_id: &EstimateId) -> VehicleVariant {
    if estimate_id.as_str().contains("auto") {
        VehicleVariant::AutoRickshaw
    } else {
        VehicleVariant::Sedan
    }
}

fn random_suffix<R: Rng>(rng: &mut R) -> String {
    (0..ID_SUFFIX_LEN)
        .map(|_| char::from(rng.sample(Alphanumeric)).to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_767_225_600_000).unwrap()
    }

    fn airport() -> Location {
        Location::new(12.9, 77.5, "Demo Airport")
    }

    fn mg_road() -> Location {
        Location::new(12.9716, 77.5946, "MG Road")
    }

    #[test]
    fn search_ids_carry_marker() {
        let mut sim = SimulatedBackend::new();
        let mut rng = StdRng::seed_from_u64(7);
        let id = sim.record_search(airport(), mg_road(), t0(), &mut rng);

        assert!(id.is_simulated());
        assert!(id.as_str().starts_with("sim_search_"));
        assert_eq!(id.as_str().len(), "sim_search_".len() + ID_SUFFIX_LEN);
        assert_eq!(sim.search(&id).map(|s| s.created_at), Some(t0()));
    }

    #[test]
    fn later_searches_do_not_replace_earlier_ones() {
        let mut sim = SimulatedBackend::new();
        let mut rng = StdRng::seed_from_u64(1);
        let first = sim.record_search(airport(), mg_road(), t0(), &mut rng);
        let second = sim.record_search(mg_road(), airport(), t0(), &mut rng);

        assert_ne!(first, second);
        assert_eq!(sim.search_count(), 2);
        assert!(sim.search(&first).is_some());
    }

    #[test]
    fn estimates_for_unknown_search_still_generated() {
        let sim = SimulatedBackend::new();
        let mut rng = StdRng::seed_from_u64(3);
        let estimates = sim.estimates_for(&SearchId::Simulated("sim_search_gone".into()), &mut rng);
        assert_eq!(estimates.len(), 2);
        assert_eq!(
            estimates[0].estimate_id.as_str(),
            "sim_est_auto_sim_search_gone"
        );
        assert_eq!(
            estimates[1].estimate_id.as_str(),
            "sim_est_sedan_sim_search_gone"
        );
    }

    #[test]
    fn variant_inferred_from_estimate_id() {
        assert_eq!(
            variant_for_estimate(&EstimateId::parse("sim_est_auto_x")),
            VehicleVariant::AutoRickshaw
        );
        assert_eq!(
            variant_for_estimate(&EstimateId::parse("sim_est_sedan_x")),
            VehicleVariant::Sedan
        );
        assert_eq!(
            variant_for_estimate(&EstimateId::parse("anything-else")),
            VehicleVariant::Sedan
        );
    }

    #[test]
    fn status_flips_strictly_after_assignment_time() {
        let mut sim = SimulatedBackend::new();
        let mut rng = StdRng::seed_from_u64(11);
        let id = sim.place_booking(&EstimateId::parse("sim_est_auto_q"), t0(), &mut rng);
        let booking = sim.booking(&id).unwrap();

        assert_eq!(
            booking.driver_assigned_at - booking.created_at,
            Duration::milliseconds(ASSIGNMENT_DELAY_MS)
        );
        assert_eq!(simulated_status(booking, t0()), BookingStatus::Searching);
        assert_eq!(
            simulated_status(booking, t0() + Duration::milliseconds(7999)),
            BookingStatus::Searching
        );
        assert_eq!(
            simulated_status(booking, t0() + Duration::milliseconds(8000)),
            BookingStatus::Searching
        );
        assert_eq!(
            simulated_status(booking, t0() + Duration::milliseconds(8001)),
            BookingStatus::TripAssigned
        );
    }

    #[test]
    fn assigned_payload_carries_driver_and_variant() {
        let mut sim = SimulatedBackend::new();
        let mut rng = StdRng::seed_from_u64(5);
        let id = sim.place_booking(&EstimateId::parse("sim_est_sedan_q"), t0(), &mut rng);
        let booking = sim.booking(&id).unwrap();

        let searching = status_payload(booking, BookingStatus::Searching);
        assert_eq!(searching, json!({"status": "SEARCHING"}));

        let assigned = status_payload(booking, BookingStatus::TripAssigned);
        assert_eq!(assigned["status"], "TRIP_ASSIGNED");
        assert_eq!(assigned["driver"]["name"], "Ravi Kumar");
        assert_eq!(assigned["driver"]["mobileNumber"], "+919876543211");
        assert_eq!(assigned["driver"]["rating"], 4.8);
        assert_eq!(assigned["vehicle"]["variant"], "SEDAN");
        assert_eq!(assigned["vehicle"]["number"], "KA01AB1234");
        assert_eq!(assigned["driverLocation"]["lat"], 12.9720);
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut sim = SimulatedBackend::new();
        let mut rng = StdRng::seed_from_u64(9);
        let id = sim.place_booking(&EstimateId::parse("sim_est_auto_q"), t0(), &mut rng);

        assert!(sim.cancel(&id).is_some());
        assert!(sim.cancel(&id).is_none());
        assert_eq!(sim.booking_count(), 0);
    }

    #[test]
    fn otp_challenge_shape() {
        let challenge = otp_challenge(t0());
        assert_eq!(challenge["attempts"], 3);
        assert_eq!(challenge["authId"], "sim_auth_1767225600000");
    }
}
